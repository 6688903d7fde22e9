/*!
 * Overlap resolution for timed text intervals.
 *
 * Annotations may overlap arbitrarily. Subtitle cues may not. This module
 * splits overlapping intervals pairwise until no overlap remains:
 * - The part of the earlier interval before the later one keeps its text
 * - The shared part carries both texts, earlier-starting text first
 * - The trailing part carries the later-starting interval's text
 *
 * The trailing part is labelled with the later-starting text even when the
 * earlier interval fully contains the later one.
 */

use log::{debug, trace, warn};

use crate::app_config::{InvalidIntervalPolicy, ResolverConfig};
use crate::errors::ResolveError;
use crate::interval::Interval;

/// Outcome of resolving one batch of intervals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Sorted, pairwise non-overlapping intervals
    pub intervals: Vec<Interval>,
    /// Input intervals dropped because `start >= end`
    pub dropped_invalid: usize,
    /// Number of pairwise splits performed
    pub splits: usize,
    /// Zero-length fragments discarded while splitting
    pub degenerate_fragments: usize,
}

/// Split two intervals into non-overlapping fragments.
///
/// Returns an empty vector when the intervals do not overlap. Otherwise
/// returns up to three fragments replacing both inputs; zero-length
/// fragments are left out.
pub fn split_pair(first: &Interval, second: &Interval) -> Vec<Interval> {
    // Ties keep the argument order
    let (earlier, later) = if second.start_ms < first.start_ms {
        (second, first)
    } else {
        (first, second)
    };

    if later.start_ms >= earlier.end_ms {
        return Vec::new();
    }

    let overlap_end = earlier.end_ms.min(later.end_ms);
    let tail_end = earlier.end_ms.max(later.end_ms);
    let merged: Vec<String> = earlier
        .lines
        .iter()
        .chain(later.lines.iter())
        .cloned()
        .collect();

    [
        Interval::new(earlier.start_ms, later.start_ms, earlier.lines.clone()),
        Interval::new(later.start_ms, overlap_end, merged),
        Interval::new(overlap_end, tail_end, later.lines.clone()),
    ]
    .into_iter()
    .filter(|fragment| fragment.start_ms != fragment.end_ms)
    .collect()
}

/// Resolves overlapping intervals into a sorted, disjoint partition
#[derive(Debug, Clone, Default)]
pub struct IntervalResolver {
    config: ResolverConfig,
}

impl IntervalResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a batch of intervals.
    ///
    /// Invalid intervals are handled according to the configured policy
    /// before the fixpoint loop starts. The loop fails with
    /// `ResolveError::NonTermination` once it exceeds `max_splits`.
    pub fn resolve(&self, intervals: Vec<Interval>) -> Result<Resolution, ResolveError> {
        let input_len = intervals.len();
        let (mut working, dropped_invalid) = self.admit(intervals)?;

        let mut splits = 0usize;
        let mut degenerate_fragments = 0usize;
        let mut i = 0usize;

        while i + 1 < working.len() {
            let hit = (i + 1..working.len()).find_map(|j| {
                let fragments = split_pair(&working[i], &working[j]);
                (!fragments.is_empty()).then_some((j, fragments))
            });

            match hit {
                Some((j, fragments)) => {
                    splits += 1;
                    if splits > self.config.max_splits {
                        return Err(ResolveError::NonTermination {
                            limit: self.config.max_splits,
                        });
                    }

                    trace!(
                        "Split {} and {} into {} fragment(s)",
                        working[i],
                        working[j],
                        fragments.len()
                    );
                    degenerate_fragments += 3 - fragments.len();
                    working = replace_pair(working, i, j, fragments);
                }
                None => i += 1,
            }
        }

        working.sort();

        debug!(
            "Resolved {} interval(s) into {} ({} split(s), {} dropped)",
            input_len,
            working.len(),
            splits,
            dropped_invalid
        );

        Ok(Resolution {
            intervals: working,
            dropped_invalid,
            splits,
            degenerate_fragments,
        })
    }

    // @validates: start < end for every input interval
    // @returns: Admitted intervals and the number dropped
    fn admit(&self, intervals: Vec<Interval>) -> Result<(Vec<Interval>, usize), ResolveError> {
        match self.config.invalid_policy {
            InvalidIntervalPolicy::Reject => {
                if let Some((index, interval)) =
                    intervals.iter().enumerate().find(|(_, iv)| !iv.is_valid())
                {
                    return Err(ResolveError::InvalidInterval {
                        index,
                        start_ms: interval.start_ms,
                        end_ms: interval.end_ms,
                    });
                }
                Ok((intervals, 0))
            }
            InvalidIntervalPolicy::Drop => {
                let before = intervals.len();
                let kept: Vec<Interval> = intervals.into_iter().filter(Interval::is_valid).collect();
                let dropped = before - kept.len();
                if dropped > 0 {
                    warn!("Dropped {} interval(s) with start >= end", dropped);
                }
                Ok((kept, dropped))
            }
        }
    }
}

// Rebuilds the working list without positions `i` and `j`, fragments appended
fn replace_pair(
    working: Vec<Interval>,
    i: usize,
    j: usize,
    fragments: Vec<Interval>,
) -> Vec<Interval> {
    working
        .into_iter()
        .enumerate()
        .filter(|(k, _)| *k != i && *k != j)
        .map(|(_, interval)| interval)
        .chain(fragments)
        .collect()
}

/// Resolve with the default configuration, rejecting invalid input
pub fn resolve(intervals: Vec<Interval>) -> Result<Vec<Interval>, ResolveError> {
    IntervalResolver::default()
        .resolve(intervals)
        .map(|resolution| resolution.intervals)
}
