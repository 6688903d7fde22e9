/*!
 * # annosub - Annotation spans to subtitle cues
 *
 * A Rust library that turns timed, possibly overlapping annotation text
 * spans into a well-formed sequence of subtitle cues.
 *
 * ## Features
 *
 * - Resolve arbitrarily overlapping intervals into a sorted, disjoint partition
 * - Merge the text of overlapping spans, earlier-starting text first
 * - Format the partition as a lazy sequence of numbered cue blocks
 * - Read interval batches from JSON (millisecond or timestamp times)
 * - Configurable handling of invalid input and a split budget
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `interval`: The timed text interval type
 * - `timecode`: Millisecond timestamp formatting and parsing
 * - `resolver`: Overlap resolution (pairwise splitting to a fixpoint)
 * - `cue_formatter`: Cue numbering and block layout
 * - `app_config`: Configuration management
 * - `file_utils`: Batch reading, cue writing and directory discovery
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod interval;
pub mod timecode;
pub mod resolver;
pub mod cue_formatter;
pub mod file_utils;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::Config;
pub use interval::Interval;
pub use resolver::{resolve, split_pair, IntervalResolver, Resolution};
pub use cue_formatter::{format, render_cues, write_cues, Cue, Cues};
pub use timecode::{format_timestamp, parse_timestamp};
pub use errors::{AppError, InputError, ResolveError};
