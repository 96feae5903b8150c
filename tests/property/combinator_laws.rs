// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Stream Combinators
//!
//! Each combinator is driven with generated delivery sequences and compared
//! with a straightforward model of what it must emit.

use std::sync::Arc;
use std::time::Duration;

use cim_frp::clock::{Clock, ManualClock};
use cim_frp::frp::combinators::{barrier, filter_ok, filter_some, rate_limit, sequence};
use cim_frp::stream::{Stream, Subject};
use proptest::prelude::*;

use crate::fixtures::{Recorder, T0};

// ============================================================================
// Generators
// ============================================================================

/// One instant of a barrier timeline
#[derive(Debug, Clone, Copy)]
struct Instant {
    source: bool,
    separator: bool,
}

fn timeline() -> impl Strategy<Value = Vec<Instant>> {
    prop::collection::vec(
        (any::<bool>(), prop::bool::weighted(0.3))
            .prop_map(|(source, separator)| Instant { source, separator }),
        0..60,
    )
}

/// Gaps in milliseconds between consecutive items
fn gaps() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..1_500, 1..40)
}

fn outcomes() -> impl Strategy<Value = Vec<Result<i32, u8>>> {
    prop::collection::vec(
        prop_oneof![
            4 => any::<i32>().prop_map(Ok),
            1 => any::<u8>().prop_map(Err),
        ],
        0..30,
    )
}

// ============================================================================
// Models
// ============================================================================

/// Instants whose source item must pass the barrier: the first source item
/// of every window, where a source item is processed before a separator at
/// the same instant.
fn barrier_model(timeline: &[Instant], include_first: bool) -> Vec<usize> {
    let mut armed = include_first;
    let mut passed = Vec::new();
    for (at, instant) in timeline.iter().enumerate() {
        if instant.source && armed {
            passed.push(at);
        }
        if instant.source {
            armed = false;
        }
        if instant.separator {
            armed = true;
        }
    }
    passed
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Property: barrier passes exactly the first source item of each window
    #[test]
    fn prop_barrier_first_item_per_window(
        timeline in timeline(),
        include_first in any::<bool>(),
    ) {
        let source = Subject::new();
        let separators = Subject::new();
        let passed = Recorder::attach(&barrier(&source.stream(), &separators.stream(), include_first));

        for (at, instant) in timeline.iter().enumerate() {
            if instant.source {
                source.next(at);
            }
            if instant.separator {
                separators.next(());
            }
        }

        prop_assert_eq!(passed.values(), barrier_model(&timeline, include_first));
    }

    /// Property: rate_limit output is spaced by at least the interval, the
    /// first item always passes, and every dropped item fell inside the
    /// interval of the last passed one
    #[test]
    fn prop_rate_limit_spacing(gaps in gaps(), interval_ms in 1u64..1_000) {
        let clock = Arc::new(ManualClock::new(T0));
        let source = Subject::new();
        let passed = Recorder::attach(&rate_limit(
            &source.stream(),
            Duration::from_millis(interval_ms),
            clock.clone(),
        ));

        let interval = interval_ms as i64;
        let mut last_passed: Option<i64> = None;
        let mut expected = Vec::new();
        for gap in &gaps {
            clock.advance(Duration::from_millis(*gap));
            let now = clock.now();
            match last_passed {
                Some(last) if now - last < interval => {}
                _ => {
                    last_passed = Some(now);
                    expected.push(now);
                }
            }
            source.next(now);
        }

        let emitted = passed.values();
        prop_assert_eq!(emitted.first().copied(), Some(T0 + gaps[0] as i64));
        for pair in emitted.windows(2) {
            prop_assert!(pair[1] - pair[0] >= interval);
        }
        prop_assert_eq!(emitted, expected);
    }

    /// Property: sequence agrees with collecting the items into a `Result`
    #[test]
    fn prop_sequence_matches_collect(items in outcomes()) {
        let outcome = sequence(&Stream::from_iter(items.clone())).unwrap();
        let model: Result<Vec<i32>, u8> = items.into_iter().collect();

        match (outcome, model) {
            (Ok(successes), Ok(expected)) => {
                prop_assert_eq!(Recorder::attach(&successes).values(), expected);
            }
            (Err(failure), Err(expected)) => prop_assert_eq!(failure, expected),
            (outcome, model) => {
                prop_assert!(false, "sequence gave {:?}, model gave {:?}", outcome.is_ok(), model);
            }
        }
    }

    /// Property: filter_some agrees with `Iterator::flatten`
    #[test]
    fn prop_filter_some_matches_flatten(items in prop::collection::vec(any::<Option<u16>>(), 0..50)) {
        let passed = Recorder::attach(&filter_some(&Stream::from_iter(items.clone())));
        let model: Vec<u16> = items.into_iter().flatten().collect();
        prop_assert_eq!(passed.values(), model);
    }

    /// Property: filter_ok keeps every success in order
    #[test]
    fn prop_filter_ok_keeps_successes(items in outcomes()) {
        let passed = Recorder::attach(&filter_ok(&Stream::from_iter(items.clone())));
        let model: Vec<i32> = items.into_iter().filter_map(Result::ok).collect();
        prop_assert_eq!(passed.values(), model);
    }

    /// Property: stream map obeys the functor laws
    #[test]
    fn prop_stream_functor_laws(items in prop::collection::vec(any::<i16>(), 0..50)) {
        let source = Stream::from_iter(items.clone());
        let f = |x: i16| i32::from(x) * 3;
        let g = |x: i32| x - 7;

        let identity = Recorder::attach(&source.map(|x| x));
        let chained = Recorder::attach(&source.map(f).map(g));
        let fused = Recorder::attach(&source.map(move |x| g(f(x))));

        prop_assert_eq!(identity.values(), items);
        prop_assert_eq!(chained.values(), fused.values());
    }
}
