use std::fmt;
use std::io::{self, Write};
use std::iter::{Enumerate, FusedIterator};
use std::vec;

use crate::interval::Interval;
use crate::timecode::format_timestamp;

// @module: Subtitle cue formatting

// @struct: Single numbered cue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    // @field: Sequence number, 0-based by default
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Text lines
    pub lines: Vec<String>,
}

impl Cue {
    /// Convert start time to formatted cue timestamp
    pub fn format_start_time(&self) -> String {
        format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted cue timestamp
    pub fn format_end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

/// Renders one block: index, time range, text lines, then a blank line
impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.lines.join("\n"))?;
        writeln!(f)
    }
}

/// Lazy, single-pass sequence of cues over resolved intervals.
///
/// Input is expected to be sorted and disjoint; nothing is re-validated here.
#[derive(Debug)]
pub struct Cues {
    inner: Enumerate<vec::IntoIter<Interval>>,
    first_index: usize,
}

impl Cues {
    /// Number cues from `first_index` instead of 0
    pub fn starting_at(mut self, first_index: usize) -> Self {
        self.first_index = first_index;
        self
    }
}

impl Iterator for Cues {
    type Item = Cue;

    fn next(&mut self) -> Option<Cue> {
        let (position, interval) = self.inner.next()?;
        Some(Cue {
            index: self.first_index + position,
            start_ms: interval.start_ms,
            end_ms: interval.end_ms,
            lines: interval.lines,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Cues {}

impl FusedIterator for Cues {}

/// Turn resolved intervals into cues indexed from 0
pub fn format(intervals: Vec<Interval>) -> Cues {
    Cues {
        inner: intervals.into_iter().enumerate(),
        first_index: 0,
    }
}

/// Stream cue blocks to a writer, returning how many were written
pub fn write_cues<W, I>(writer: &mut W, cues: I) -> io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = Cue>,
{
    let mut count = 0;
    for cue in cues {
        write!(writer, "{}", cue)?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Collect cue blocks into a single string
pub fn render_cues<I>(cues: I) -> String
where
    I: IntoIterator<Item = Cue>,
{
    cues.into_iter().map(|cue| cue.to_string()).collect()
}
