use anyhow::{anyhow, Context, Result};
use log::{error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::cue_formatter::{self, Cues};
use crate::file_utils::FileManager;
use crate::interval::Interval;
use crate::resolver::{IntervalResolver, Resolution};

// @module: Application controller for annotation-to-subtitle conversion

/// Result of converting one interval batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// Cues were written to `output`
    Written {
        output: PathBuf,
        cues: usize,
        dropped_invalid: usize,
    },
    /// Output already existed and overwriting was not requested
    Skipped { output: PathBuf },
}

/// Main application controller: read, resolve, format, write
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // @creates: Resolver from the resolver section of the config
    pub fn resolver(&self) -> IntervalResolver {
        IntervalResolver::new(self.config.resolver.clone())
    }

    /// Resolve a batch and wrap the result as a lazy cue sequence
    pub fn convert(&self, intervals: Vec<Interval>) -> Result<(Cues, Resolution)> {
        let mut resolution = self.resolver().resolve(intervals)?;
        let cues = cue_formatter::format(std::mem::take(&mut resolution.intervals))
            .starting_at(self.config.output.first_index);
        Ok((cues, resolution))
    }

    /// Convert a batch file and stream the cues to a writer
    pub fn run_to_writer<W: Write>(&self, input_file: &Path, writer: &mut W) -> Result<usize> {
        let intervals = FileManager::read_intervals(input_file)?;
        let (cues, _) = self
            .convert(intervals)
            .with_context(|| format!("Failed to resolve intervals from {:?}", input_file))?;
        cue_formatter::write_cues(writer, cues).context("Failed to write cues")
    }

    /// Convert one batch file.
    ///
    /// Without an explicit output path the cue file is written next to the
    /// input using the configured extension.
    pub fn run(
        &self,
        input_file: PathBuf,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<ConversionOutcome> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output = output_file.unwrap_or_else(|| {
            FileManager::generate_output_path(&input_file, &self.config.output.extension)
        });

        if output.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output);
            return Ok(ConversionOutcome::Skipped { output });
        }

        let intervals = FileManager::read_intervals(&input_file)?;
        let (cues, resolution) = self
            .convert(intervals)
            .with_context(|| format!("Failed to resolve intervals from {:?}", input_file))?;

        let written = FileManager::write_cues_to_file(&output, cues)?;
        info!("Success: {:?} ({} cues)", output, written);

        Ok(ConversionOutcome::Written {
            output,
            cues: written,
            dropped_invalid: resolution.dropped_invalid,
        })
    }

    /// Convert every interval batch found under a directory.
    ///
    /// A failing batch is logged and does not stop the others. Returns the
    /// outcomes of the batches that succeeded.
    pub fn run_folder(&self, input_dir: PathBuf, force_overwrite: bool) -> Result<Vec<ConversionOutcome>> {
        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let batches = FileManager::find_interval_batches(&input_dir)?;
        if batches.is_empty() {
            warn!("No interval batches found in directory: {:?}", input_dir);
        }

        let mut outcomes = Vec::with_capacity(batches.len());
        for batch in batches {
            info!("Processing batch: {:?}", batch);
            match self.run(batch.clone(), None, force_overwrite) {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => error!("Error processing {:?}: {:#}", batch, e),
            }
        }

        info!("Finished processing {} batch(es)", outcomes.len());
        Ok(outcomes)
    }
}
