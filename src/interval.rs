use std::fmt;

use serde::{Deserialize, Serialize};

// @module: Timed text intervals

/// A half-open time span `[start_ms, end_ms)` carrying lines of text.
///
/// Field order matters: the derived ordering compares `(start, end, lines)`
/// lexicographically, with `start_ms` as the primary key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Interval {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms (exclusive)
    pub end_ms: u64,

    // @field: Text lines, in display order
    pub lines: Vec<String>,
}

impl Interval {
    /// Creates an interval without validating or normalising anything
    pub fn new(start_ms: u64, end_ms: u64, lines: Vec<String>) -> Self {
        Interval {
            start_ms,
            end_ms,
            lines,
        }
    }

    // @creates: Interval from a raw text block
    // @normalizes: Trims the block and drops whitespace-only lines
    pub fn from_text(start_ms: u64, end_ms: u64, text: &str) -> Self {
        let lines = text
            .trim()
            .split('\n')
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();

        Self::new(start_ms, end_ms, lines)
    }

    /// Whether the interval has a strictly positive length
    pub fn is_valid(&self) -> bool {
        self.start_ms < self.end_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Whether the two half-open spans share at least one millisecond
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }

    /// Text lines joined with newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn has_text(&self) -> bool {
        !self.lines.is_empty()
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}) {:?}", self.start_ms, self.end_ms, self.text())
    }
}
