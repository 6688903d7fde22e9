/*!
 * Tests for overlap resolution
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use annosub::app_config::{InvalidIntervalPolicy, ResolverConfig};
use annosub::{resolve, split_pair, Interval, IntervalResolver, ResolveError};
use crate::common::{self, assert_disjoint, coverage, iv, lines};

fn key(interval: &Interval) -> (u64, u64, String) {
    (interval.start_ms, interval.end_ms, interval.text())
}

fn keys(intervals: &[Interval]) -> Vec<(u64, u64, String)> {
    intervals.iter().map(key).collect()
}

fn k(start_ms: u64, end_ms: u64, text: &str) -> (u64, u64, String) {
    (start_ms, end_ms, text.to_string())
}

fn random_batch(rng: &mut StdRng) -> Vec<Interval> {
    let count = rng.random_range(1..12);
    (0..count)
        .map(|n| {
            let start = rng.random_range(0..20u64) * 500;
            let length = rng.random_range(1..10u64) * 500;
            iv(start, start + length, &format!("T{}", n))
        })
        .collect()
}

/// Partial overlap produces leading, shared and trailing fragments
#[test]
fn test_resolve_withPartialOverlap_shouldSplitIntoThreeFragments() {
    common::init_logging();
    let resolved = resolve(vec![iv(1000, 4000, "Hello"), iv(3000, 6000, "World")]).unwrap();

    assert_eq!(
        keys(&resolved),
        vec![
            k(1000, 3000, "Hello"),
            k(3000, 4000, "Hello\nWorld"),
            k(4000, 6000, "World"),
        ]
    );
}

/// The trailing fragment of a contained interval keeps the inner text
#[test]
fn test_resolve_withFullContainment_shouldLabelTrailingFragmentWithInnerText() {
    let resolved = resolve(vec![iv(0, 8000, "A"), iv(3000, 5000, "B")]).unwrap();

    assert_eq!(
        keys(&resolved),
        vec![k(0, 3000, "A"), k(3000, 5000, "A\nB"), k(5000, 8000, "B")]
    );
}

#[test]
fn test_resolve_withDisjointUnsortedInput_shouldOnlySort() {
    let resolved = resolve(vec![iv(2000, 3000, "B"), iv(0, 1000, "A")]).unwrap();
    assert_eq!(keys(&resolved), vec![k(0, 1000, "A"), k(2000, 3000, "B")]);
}

#[test]
fn test_resolve_withEmptyInput_shouldReturnEmpty() {
    assert!(resolve(Vec::new()).unwrap().is_empty());
}

#[test]
fn test_resolve_withSingleInterval_shouldReturnIt() {
    let resolved = resolve(vec![iv(5, 10, "only")]).unwrap();
    assert_eq!(keys(&resolved), vec![k(5, 10, "only")]);
}

#[test]
fn test_resolve_withLaterArgumentStartingFirst_shouldPutEarlierTextFirst() {
    let resolved = resolve(vec![iv(3000, 6000, "World"), iv(1000, 4000, "Hello")]).unwrap();
    assert_eq!(resolved[1].lines, lines(&["Hello", "World"]));
}

#[test]
fn test_resolve_withMultilineTexts_shouldConcatenateAllLines() {
    let resolved = resolve(vec![iv(0, 2000, "a1\na2"), iv(1000, 3000, "b1\nb2")]).unwrap();
    assert_eq!(resolved[1].lines, lines(&["a1", "a2", "b1", "b2"]));
}

/// Three chained partial overlaps resolve through repeated splitting
#[test]
fn test_resolve_withChainedOverlaps_shouldReachFixpoint() {
    let resolver = IntervalResolver::default();
    let resolution = resolver
        .resolve(vec![iv(0, 3000, "A"), iv(1000, 4000, "B"), iv(2000, 5000, "C")])
        .unwrap();

    assert_eq!(
        keys(&resolution.intervals),
        vec![
            k(0, 1000, "A"),
            k(1000, 2000, "A\nB"),
            k(2000, 3000, "A\nB\nC"),
            k(3000, 4000, "B\nC"),
            k(4000, 5000, "C"),
        ]
    );
    assert_eq!(resolution.splits, 3);
    assert_eq!(resolution.degenerate_fragments, 1);
    assert_eq!(resolution.dropped_invalid, 0);
}

/// Equal starts keep argument order and drop the empty leading fragment
#[test]
fn test_resolve_withEqualStarts_shouldDiscardZeroLengthFragment() {
    let resolver = IntervalResolver::default();
    let resolution = resolver
        .resolve(vec![iv(0, 2000, "A"), iv(0, 1000, "B")])
        .unwrap();

    assert_eq!(
        keys(&resolution.intervals),
        vec![k(0, 1000, "A\nB"), k(1000, 2000, "B")]
    );
    assert_eq!(resolution.degenerate_fragments, 1);
    assert!(resolution.intervals.iter().all(Interval::is_valid));
}

#[test]
fn test_resolve_withIdenticalIntervals_shouldMergeIntoOne() {
    let resolved = resolve(vec![iv(0, 1000, "X"), iv(0, 1000, "Y")]).unwrap();
    assert_eq!(keys(&resolved), vec![k(0, 1000, "X\nY")]);
}

#[test]
fn test_resolve_withZeroLengthInput_shouldRejectBeforeResolution() {
    let result = resolve(vec![iv(0, 1000, "A"), iv(500, 500, "empty")]);
    assert_eq!(
        result,
        Err(ResolveError::InvalidInterval { index: 1, start_ms: 500, end_ms: 500 })
    );
}

#[test]
fn test_resolve_withReversedInput_shouldRejectFirstOffender() {
    let result = resolve(vec![iv(3000, 1000, "bad"), iv(9, 2, "worse")]);
    assert_eq!(
        result,
        Err(ResolveError::InvalidInterval { index: 0, start_ms: 3000, end_ms: 1000 })
    );
}

#[test]
fn test_resolve_withDropPolicy_shouldFilterAndCountInvalid() {
    let resolver = IntervalResolver::new(ResolverConfig {
        invalid_policy: InvalidIntervalPolicy::Drop,
        ..ResolverConfig::default()
    });
    let resolution = resolver
        .resolve(vec![
            iv(0, 1000, "A"),
            iv(500, 500, "empty"),
            iv(800, 200, "reversed"),
            iv(2000, 3000, "B"),
        ])
        .unwrap();

    assert_eq!(resolution.dropped_invalid, 2);
    assert_eq!(keys(&resolution.intervals), vec![k(0, 1000, "A"), k(2000, 3000, "B")]);
}

#[test]
fn test_resolve_withTinyBudget_shouldFailWithNonTermination() {
    let resolver = IntervalResolver::new(ResolverConfig {
        max_splits: 2,
        ..ResolverConfig::default()
    });
    let result = resolver.resolve(vec![iv(0, 3000, "A"), iv(1000, 4000, "B"), iv(2000, 5000, "C")]);

    assert_eq!(result, Err(ResolveError::NonTermination { limit: 2 }));
}

#[test]
fn test_split_pair_withNoOverlap_shouldProduceNothing() {
    assert!(split_pair(&iv(0, 1000, "A"), &iv(2000, 3000, "B")).is_empty());
    assert!(split_pair(&iv(2000, 3000, "B"), &iv(0, 1000, "A")).is_empty());
}

#[test]
fn test_split_pair_withContainment_shouldMatchResolvedFragments() {
    let fragments = split_pair(&iv(3000, 5000, "B"), &iv(0, 8000, "A"));
    assert_eq!(
        keys(&fragments),
        vec![k(0, 3000, "A"), k(3000, 5000, "A\nB"), k(5000, 8000, "B")]
    );
}

#[test]
fn test_resolve_withRandomBatches_shouldNeverOverlap() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let resolved = resolve(random_batch(&mut rng)).unwrap();
        assert_disjoint(&resolved);
        assert!(resolved.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn test_resolve_withRandomBatches_shouldPreserveCoverage() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let batch = random_batch(&mut rng);
        let resolved = resolve(batch.clone()).unwrap();
        assert_eq!(coverage(&resolved), coverage(&batch));
    }
}

#[test]
fn test_resolve_withRandomBatches_shouldBeIdempotent() {
    let mut rng = StdRng::seed_from_u64(23);
    for _ in 0..200 {
        let once = resolve(random_batch(&mut rng)).unwrap();
        let twice = resolve(once.clone()).unwrap();
        assert_eq!(once, twice);
    }
}

#[test]
fn test_resolve_withPairwiseOverlap_shouldJoinTextsInStartOrder() {
    let mut rng = StdRng::seed_from_u64(31);
    for _ in 0..100 {
        let a_start = rng.random_range(0..1000u64);
        let b_start = a_start + rng.random_range(1..1000u64);
        let a_end = b_start + rng.random_range(1..1000u64);
        let b_end = b_start + rng.random_range(1..2000u64);

        let resolved = resolve(vec![iv(b_start, b_end, "later"), iv(a_start, a_end, "earlier")]).unwrap();
        let shared = resolved
            .iter()
            .find(|i| i.start_ms == b_start)
            .expect("shared fragment should start at the later start");
        assert_eq!(shared.text(), "earlier\nlater");
        assert_eq!(shared.end_ms, a_end.min(b_end));
    }
}
