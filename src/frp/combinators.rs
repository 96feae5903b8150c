// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream Combinators
//!
//! Free functions over streams. None of them hold state outside the streams
//! they return, and every stateful one folds over a serialized input.
//!
//! # Available Combinators
//!
//! ## Unwrapping
//! - `filter_some` - present values of an optional stream
//! - `filter_err` / `filter_ok` - one side of a `Result` stream
//! - `occurrences` - timing only, values discarded
//!
//! ## Domain Failures
//! - `bind_either` - short-circuit failures, chain successes in order
//! - `sequence` - block until complete, earliest failure or all successes
//! - `sequence_lazy` - the same outcome, delivered as a stream
//!
//! ## Sampling and Shaping
//! - `gate` - pass items while a `Behavior<bool>` is `true`
//! - `rate_limit` - at most one item per interval
//! - `barrier` - at most one item per window between separators
//!
//! ## Placement
//! - `observe_on` / `subscribe_on` - optional scheduler routing
//!
//! # Example
//!
//! ```rust
//! use cim_frp::frp::combinators::{filter_ok, sequence};
//! use cim_frp::stream::Stream;
//!
//! let parsed = Stream::from_iter(vec!["1", "x", "3"]).map(|s| s.parse::<i32>());
//!
//! let numbers = filter_ok(&parsed);
//! let all_or_first_failure = sequence(&parsed).unwrap();
//! assert!(all_or_first_failure.is_err());
//! # let _ = numbers;
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::TryStreamExt;

use super::behavior::Behavior;
use super::Time;
use crate::clock::{millis, Clock};
use crate::errors::FrpResult;
use crate::stream::{lock, Notification, Observer, Scheduler, Stream, Subscription, Value};

/// Present values, unwrapped
pub fn filter_some<T: Value>(source: &Stream<Option<T>>) -> Stream<T> {
    source.filter(Option::is_some).map(|item| match item {
        Some(value) => value,
        None => unreachable!("filter_some: absent value passed the filter"),
    })
}

/// Failure values of a `Result` stream, unwrapped
pub fn filter_err<R: Value, L: Value>(source: &Stream<Result<R, L>>) -> Stream<L> {
    source.filter(Result::is_err).map(|item| match item {
        Err(failure) => failure,
        Ok(_) => unreachable!("filter_err: success value passed the filter"),
    })
}

/// Success values of a `Result` stream, unwrapped
pub fn filter_ok<R: Value, L: Value>(source: &Stream<Result<R, L>>) -> Stream<R> {
    source.filter(Result::is_ok).map(|item| match item {
        Ok(success) => success,
        Err(_) => unreachable!("filter_ok: failure value passed the filter"),
    })
}

/// One `()` per item, at the item's delivery instant
pub fn occurrences<T: Value>(source: &Stream<T>) -> Stream<()> {
    source.map(|_| ())
}

/// Chain a fallible step after each success
///
/// A failure is forwarded as is and `binder` is not called for it. Each
/// success is handed to `binder`, and the sub-streams are concatenated: the
/// sub-stream of one item completes before the next item's begins.
pub fn bind_either<R, L, U, F>(source: &Stream<Result<R, L>>, binder: F) -> Stream<Result<U, L>>
where
    R: Value,
    L: Value,
    U: Value,
    F: Fn(R) -> Stream<Result<U, L>> + Send + Sync + 'static,
{
    source.concat_map(move |item| match item {
        Err(failure) => Stream::just(Err(failure)),
        Ok(success) => binder(success),
    })
}

/// Collect a finite stream into its earliest failure or all of its successes
///
/// Blocks the calling thread until `source` completes, so `source` must be
/// finite and must not depend on the calling thread to make progress. The
/// successes are returned as a replayable stream in their original order.
/// An engine error on `source` is returned as the outer `Err`.
pub fn sequence<R: Value, L: Value>(
    source: &Stream<Result<R, L>>,
) -> FrpResult<Result<Stream<R>, L>> {
    let items: Vec<Result<R, L>> = futures::executor::block_on(source.into_futures().try_collect())?;
    let successes: Result<Vec<R>, L> = items.into_iter().collect();
    Ok(successes.map(Stream::from_iter))
}

/// Non-blocking form of `sequence`
///
/// Emits exactly one item and completes: the first failure as soon as it
/// arrives, after which `source` is unsubscribed, or the successes once
/// `source` completes.
pub fn sequence_lazy<R: Value, L: Value>(
    source: &Stream<Result<R, L>>,
) -> Stream<Result<Stream<R>, L>> {
    let source = source.clone();
    Stream::new(move |observer: Observer<Result<Stream<R>, L>>| {
        // `None` once the outcome has been delivered
        let collected: Arc<Mutex<Option<Vec<R>>>> = Arc::new(Mutex::new(Some(Vec::new())));
        let subscription = Subscription::new();

        let handle = subscription.clone();
        let upstream = source.subscribe(Observer::new(move |notification| match notification {
            Notification::Next(Ok(success)) => {
                if let Some(items) = lock(&collected).as_mut() {
                    items.push(success);
                }
            }
            Notification::Next(Err(failure)) => {
                let pending = lock(&collected).take();
                if pending.is_some() {
                    observer.next(Err(failure));
                    observer.complete();
                    handle.unsubscribe();
                }
            }
            Notification::Error(e) => {
                let pending = lock(&collected).take();
                if pending.is_some() {
                    observer.error(e);
                }
            }
            Notification::Completed => {
                let pending = lock(&collected).take();
                if let Some(items) = pending {
                    observer.next(Ok(Stream::from_iter(items)));
                    observer.complete();
                }
            }
        }));

        subscription.add(upstream);
        subscription
    })
}

/// Pass items that arrive while `gate` is `true`
///
/// The gate is sampled when each item arrives. An item delivered
/// synchronously from the gate's own update sees the new value.
pub fn gate<T: Value>(source: &Stream<T>, gate: &Behavior<bool>) -> Stream<T> {
    let gate = gate.clone();
    source.filter(move |_| gate.value())
}

/// Pass an item only if `interval` has elapsed since the last item passed
///
/// The first item always passes. Dropped items do not restart the interval.
pub fn rate_limit<T: Value>(
    source: &Stream<T>,
    interval: Duration,
    clock: Arc<dyn Clock>,
) -> Stream<T> {
    let window = millis(interval);
    source
        .scan(
            (None, None),
            move |(last_emit, _): (Option<Time>, Option<T>), item| {
                let now = clock.now();
                // A clock that stepped backwards re-arms instead of stalling.
                match last_emit.map(|last| now.saturating_sub(last)) {
                    Some(elapsed) if (0..window).contains(&elapsed) => (last_emit, None),
                    _ => (Some(now), Some(item)),
                }
            },
        )
        .filter_map(|(_, emitted)| emitted)
}

#[derive(Clone)]
enum BarrierState<T> {
    /// The next source item passes
    Armed,
    /// This source item passed; later ones wait for a separator
    Passed(T),
    /// Source items are dropped until a separator
    Suppressed,
}

/// Pass at most one source item per window between separators
///
/// The first source item after each separator passes and the rest of the
/// window is dropped. `include_first_source` decides whether the window
/// before the first separator lets an item through.
///
/// Both inputs are merged into one serialized channel. When a source item
/// and a separator are delivered at the same instant, whichever is delivered
/// first is processed first.
pub fn barrier<T: Value, S: Value>(
    source: &Stream<T>,
    separators: &Stream<S>,
    include_first_source: bool,
) -> Stream<T> {
    let initial = if include_first_source {
        BarrierState::Armed
    } else {
        BarrierState::Suppressed
    };

    Stream::merge([source.map(Some), separators.map(|_| None)])
        .scan(initial, |state, item| match (item, state) {
            (None, _) => BarrierState::Armed,
            (Some(value), BarrierState::Armed) => BarrierState::Passed(value),
            (Some(_), _) => BarrierState::Suppressed,
        })
        .filter_map(|state| match state {
            BarrierState::Passed(value) => Some(value),
            _ => None,
        })
}

/// `Stream::observe_on` when a scheduler is given, otherwise `source` itself
pub fn observe_on<T: Value>(source: &Stream<T>, scheduler: Option<Arc<dyn Scheduler>>) -> Stream<T> {
    match scheduler {
        Some(scheduler) => source.observe_on(scheduler),
        None => source.clone(),
    }
}

/// `Stream::subscribe_on` when a scheduler is given, otherwise `source` itself
pub fn subscribe_on<T: Value>(
    source: &Stream<T>,
    scheduler: Option<Arc<dyn Scheduler>>,
) -> Stream<T> {
    match scheduler {
        Some(scheduler) => source.subscribe_on(scheduler),
        None => source.clone(),
    }
}
