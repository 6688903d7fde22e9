use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::InputError;

// @module: Millisecond timecode conversion

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

// @const: Timestamp regex, hours optional, comma or dot before the fraction
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d{1,2}):(\d{1,2})[,.](\d{1,3})$").unwrap()
});

/// Format a timestamp in milliseconds to cue format (HH:MM:SS,mmm).
///
/// Integer arithmetic only. Hours are zero-padded to two digits and widen
/// past 99 hours.
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / MS_PER_HOUR;
    let minutes = (ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (ms % MS_PER_MINUTE) / MS_PER_SECOND;
    let millis = ms % MS_PER_SECOND;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Parse a timestamp to milliseconds.
///
/// Accepts `HH:MM:SS,mmm`, `HH:MM:SS.mmm` and the short `M:SS.mmm` form used
/// by annotation documents. The fraction is read as a millisecond count
/// exactly as written, so `0:01.5` is 1005 ms.
pub fn parse_timestamp(timestamp: &str) -> Result<u64, InputError> {
    let trimmed = timestamp.trim();
    let caps = TIMESTAMP_REGEX
        .captures(trimmed)
        .ok_or_else(|| InputError::InvalidTimestamp(timestamp.to_string()))?;

    let field = |idx: usize| -> Result<u64, InputError> {
        match caps.get(idx) {
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map_err(|_| InputError::InvalidTimestamp(timestamp.to_string())),
            None => Ok(0),
        }
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    let millis = field(4)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(InputError::InvalidTimeComponents(timestamp.to_string()));
    }

    hours
        .checked_mul(MS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * MS_PER_MINUTE + seconds * MS_PER_SECOND + millis))
        .ok_or_else(|| InputError::InvalidTimeComponents(timestamp.to_string()))
}
