/*!
 * Common test utilities for the annosub test suite
 */

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use annosub::Interval;

/// Installs a test logger so resolver diagnostics show up with --nocapture
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a batch with a partial overlap, mixing millisecond and timestamp times
pub fn create_test_batch(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"[
    {"start": 1000, "end": 4000, "text": "Hello"},
    {"start": "00:00:03,000", "end": "0:06.000", "text": "World"}
]"#;
    create_test_file(dir, filename, content)
}

/// Shorthand interval constructor
pub fn iv(start_ms: u64, end_ms: u64, text: &str) -> Interval {
    Interval::from_text(start_ms, end_ms, text)
}

/// Lines of text as owned strings
pub fn lines(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

/// Union of the half-open spans, as sorted disjoint (start, end) pairs
pub fn coverage(intervals: &[Interval]) -> Vec<(u64, u64)> {
    let mut spans: Vec<(u64, u64)> = intervals
        .iter()
        .filter(|i| i.start_ms < i.end_ms)
        .map(|i| (i.start_ms, i.end_ms))
        .collect();
    spans.sort();

    let mut merged: Vec<(u64, u64)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Asserts that no two intervals overlap, in any order
pub fn assert_disjoint(intervals: &[Interval]) {
    for (i, a) in intervals.iter().enumerate() {
        for b in intervals.iter().skip(i + 1) {
            assert!(a.end_ms <= b.start_ms, "{} overlaps {}", a, b);
        }
    }
}
