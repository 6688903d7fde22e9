use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::cue_formatter::{self, Cue};
use crate::errors::InputError;
use crate::interval::Interval;
use crate::timecode;

// @module: File and directory utilities

/// File name suffix identifying interval batches during directory scans
pub const INTERVAL_BATCH_SUFFIX: &str = ".intervals.json";

// @struct: Time value as written in a batch file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTime {
    Millis(u64),
    Timestamp(String),
}

impl RawTime {
    fn to_ms(&self) -> Result<u64, InputError> {
        match self {
            RawTime::Millis(ms) => Ok(*ms),
            RawTime::Timestamp(ts) => timecode::parse_timestamp(ts),
        }
    }
}

// @struct: Text value, either one block or explicit lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawText {
    Block(String),
    Lines(Vec<String>),
}

// @struct: One (start, end, text) triple as written in a batch file
#[derive(Debug, Deserialize)]
struct RawInterval {
    #[serde(alias = "start_ms")]
    start: RawTime,
    #[serde(alias = "end_ms")]
    end: RawTime,
    text: RawText,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    /// Parse a JSON array of `{start, end, text}` triples.
    ///
    /// Times are integer milliseconds or timestamp strings. Text is
    /// normalised with `Interval::from_text`; entries left without text are
    /// skipped. Start/end validity is the resolver's concern.
    pub fn parse_intervals_json(content: &str) -> Result<Vec<Interval>, InputError> {
        let raw: Vec<RawInterval> = serde_json::from_str(content)?;
        let mut intervals = Vec::with_capacity(raw.len());

        for (position, entry) in raw.into_iter().enumerate() {
            let start_ms = entry.start.to_ms()?;
            let end_ms = entry.end.to_ms()?;
            let text = match entry.text {
                RawText::Block(block) => block,
                RawText::Lines(lines) => lines.join("\n"),
            };

            let interval = Interval::from_text(start_ms, end_ms, &text);
            if !interval.has_text() {
                debug!("Skipping entry {} without text", position);
                continue;
            }
            intervals.push(interval);
        }

        Ok(intervals)
    }

    // @reads: Interval batch from a JSON file
    pub fn read_intervals<P: AsRef<Path>>(path: P) -> Result<Vec<Interval>> {
        let path = path.as_ref();
        let content = Self::read_to_string(path)?;
        Self::parse_intervals_json(&content)
            .with_context(|| format!("Failed to read intervals from {:?}", path))
    }

    // @writes: Cue blocks to a file, replacing it
    // @returns: Number of cues written
    pub fn write_cues_to_file<P, I>(path: P, cues: I) -> Result<usize>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = Cue>,
    {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {:?}", path))?;
        let mut writer = BufWriter::new(file);
        cue_formatter::write_cues(&mut writer, cues)
            .with_context(|| format!("Failed to write cues to {:?}", path))
    }

    // @generates: Output path for a batch, next to it
    // @params: input_file, extension
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let file_name = input_file
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();

        let stem = match file_name.strip_suffix(INTERVAL_BATCH_SUFFIX) {
            Some(stem) => stem.to_string(),
            None => input_file
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default(),
        };

        let mut output_filename = stem;
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        input_file.with_file_name(output_filename)
    }

    // @finds: Interval batch files under a directory, sorted
    pub fn find_interval_batches<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut batches = Vec::new();

        for entry in WalkDir::new(dir.as_ref()) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let is_batch = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().ends_with(INTERVAL_BATCH_SUFFIX));
            if is_batch {
                batches.push(path.to_path_buf());
            }
        }

        batches.sort();
        Ok(batches)
    }
}
