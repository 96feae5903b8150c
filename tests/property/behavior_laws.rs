// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Behaviors

use cim_frp::frp::{Behavior, Samplable, Signal};
use cim_frp::stream::Subject;
use proptest::prelude::*;

use crate::fixtures::Recorder;

/// Updates to one of two inputs
#[derive(Debug, Clone)]
enum Input {
    Left(i32),
    Right(i32),
}

fn inputs() -> impl Strategy<Value = Vec<Input>> {
    prop::collection::vec(
        prop_oneof![
            any::<i32>().prop_map(Input::Left),
            any::<i32>().prop_map(Input::Right),
        ],
        0..40,
    )
}

proptest! {
    /// Property: a stepped behavior holds the latest value and publishes
    /// every value once, in order
    #[test]
    fn prop_step_holds_latest(initial in any::<i64>(), values in prop::collection::vec(any::<i64>(), 0..40)) {
        let source = Subject::new();
        let behavior = Behavior::step(initial, &source.stream());
        let updates = Recorder::attach(&behavior.updates());

        for value in &values {
            source.next(*value);
        }

        prop_assert_eq!(behavior.value(), values.last().copied().unwrap_or(initial));
        prop_assert_eq!(updates.values(), values);
    }

    /// Property: scan agrees with `Iterator::fold`
    #[test]
    fn prop_scan_matches_fold(values in prop::collection::vec(any::<i32>(), 0..40)) {
        let source = Subject::new();
        let total = Behavior::scan(0i64, &source.stream(), |acc, x: i32| acc + i64::from(x));

        for value in &values {
            source.next(*value);
        }

        let model = values.iter().fold(0i64, |acc, x| acc + i64::from(*x));
        prop_assert_eq!(total.value(), model);
    }

    /// Property: combine2 always equals `f` of the latest input values and
    /// recomputes once per input update
    #[test]
    fn prop_combine2_tracks_latest(inputs in inputs()) {
        let left = Subject::new();
        let right = Subject::new();
        let combined = Behavior::combine2(
            &Behavior::step(0, &left.stream()),
            &Behavior::step(0, &right.stream()),
            |l: i32, r: i32| (l, r),
        );
        let updates = Recorder::attach(&combined.updates());

        let mut model = (0, 0);
        for input in &inputs {
            match input {
                Input::Left(v) => {
                    model.0 = *v;
                    left.next(*v);
                }
                Input::Right(v) => {
                    model.1 = *v;
                    right.next(*v);
                }
            }
            prop_assert_eq!(combined.value(), model);
        }
        prop_assert_eq!(updates.len(), inputs.len());
    }

    /// Property: behavior map obeys the functor laws
    #[test]
    fn prop_behavior_functor_laws(initial in any::<i16>(), values in prop::collection::vec(any::<i16>(), 0..20)) {
        let source = Subject::new();
        let behavior = Behavior::step(initial, &source.stream());
        let f = |x: i16| i32::from(x) * 2;
        let g = |x: i32| x + 1;

        let identity = Signal::map(&behavior, |x: i16| x);
        let chained = Signal::map(&Signal::map(&behavior, f), g);
        let fused = Signal::map(&behavior, move |x: i16| g(f(x)));

        for value in values {
            source.next(value);
            prop_assert_eq!(identity.sample(), behavior.sample());
            prop_assert_eq!(chained.sample(), fused.sample());
        }
    }
}
