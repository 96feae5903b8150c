// Copyright (c) 2025 - Cowboy AI, Inc.
//! Behavior - Continuous-Time Signals
//!
//! A `Behavior<T>` has a value at every instant. It caches the latest value
//! delivered by its source and republishes each new value to its own hot
//! update stream.
//!
//! # Characteristics
//!
//! - **Always has a value**: `value()` never blocks and has no side effects
//! - **Source-driven**: there is no way to set the value from outside
//! - **Serialized**: deliveries are applied one at a time, in source order;
//!   the value is written before the update is published
//! - **Never completes**: completion or an error on the source is logged and
//!   the last value is kept
//!
//! # Lifetime
//!
//! ```text
//! source ──> [cell: value + changes] ──> values() ──> derived behavior
//!                    ▲                                      │
//!                    └──────── retained through ────────────┘
//!                               the derived subscription
//! ```
//!
//! Behaviors are shared handles. A derived behavior keeps its inputs alive,
//! and dropping the last handle to a behavior unsubscribes it from its
//! source.
//!
//! # Examples
//!
//! ```rust
//! use cim_frp::frp::Behavior;
//! use cim_frp::stream::Subject;
//!
//! let visible = Subject::new();
//! let busy = Subject::new();
//!
//! let enabled = Behavior::combine2(
//!     &Behavior::step(false, &visible.stream()),
//!     &Behavior::step(false, &busy.stream()),
//!     |visible, busy| visible && !busy,
//! );
//!
//! visible.next(true);
//! assert!(enabled.value());
//!
//! busy.next(true);
//! assert!(!enabled.value());
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use tracing::{trace, warn};

use super::combinators;
use super::deferred::DeferredStream;
use crate::clock::{Clock, SystemClock};
use crate::errors::FrpResult;
use crate::stream::{
    lock, read, write, Notification, Observer, Scheduler, Stream, Subject, Subscription, Value,
};

/// Continuous-time signal
///
/// Cloning a `Behavior` clones the handle; clones share the cached value and
/// the update stream.
pub struct Behavior<T> {
    inner: Arc<BehaviorInner<T>>,
}

struct BehaviorInner<T> {
    cell: Arc<BehaviorCell<T>>,
    upstream: Subscription,
}

struct BehaviorCell<T> {
    value: RwLock<T>,
    changes: Subject<T>,
}

type Patch<S> = Arc<dyn Fn(&mut S) + Send + Sync>;

impl<T> Clone for Behavior<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Drop for BehaviorInner<T> {
    fn drop(&mut self) {
        self.upstream.unsubscribe();
    }
}

impl<T: Value> BehaviorCell<T> {
    fn update(&self, value: T) {
        *write(&self.value) = value.clone();
        self.changes.next(value);
    }
}

impl<T: fmt::Debug> fmt::Debug for BehaviorCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*read(&self.value), f)
    }
}

impl<T: fmt::Debug> fmt::Debug for Behavior<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior")
            .field("value", &self.inner.cell)
            .finish()
    }
}

impl<T: Value> Behavior<T> {
    /// A behavior that always holds `value`
    ///
    /// Its update stream never fires.
    pub fn constant(value: T) -> Self {
        Self::step(value, &Stream::never())
    }

    /// Hold `initial` until `source` delivers, then the latest delivered value
    pub fn step(initial: T, source: &Stream<T>) -> Self {
        let cell = Arc::new(BehaviorCell {
            value: RwLock::new(initial),
            changes: Subject::new(),
        });

        let sink = Arc::clone(&cell);
        let upstream = source.serialize().subscribe(Observer::new(move |notification| {
            match notification {
                Notification::Next(value) => sink.update(value),
                Notification::Error(e) => {
                    warn!(error = %e, "Behavior source failed; keeping last value")
                }
                Notification::Completed => trace!("Behavior source completed; keeping last value"),
            }
        }));

        Self {
            inner: Arc::new(BehaviorInner { cell, upstream }),
        }
    }

    /// Fold `source` into a behavior starting at `initial`
    ///
    /// `fold(value_so_far, item)` runs strictly sequentially.
    pub fn scan<A, F>(initial: T, source: &Stream<A>, fold: F) -> Self
    where
        A: Value,
        F: Fn(T, A) -> T + Send + Sync + 'static,
    {
        Self::step(initial.clone(), &source.scan(initial, fold))
    }

    /// Combine two behaviors
    ///
    /// Recomputes once per update of either input, from the latest value of
    /// both.
    pub fn combine2<A, B, F>(a: &Behavior<A>, b: &Behavior<B>, f: F) -> Self
    where
        A: Value,
        B: Value,
        F: Fn(A, B) -> T + Send + Sync + 'static,
    {
        Self::combined(
            (a.value(), b.value()),
            vec![
                patch(a, |s: &mut (A, B), v| s.0 = v),
                patch(b, |s: &mut (A, B), v| s.1 = v),
            ],
            move |(a, b)| f(a, b),
        )
    }

    /// Combine three behaviors
    pub fn combine3<A, B, C, F>(a: &Behavior<A>, b: &Behavior<B>, c: &Behavior<C>, f: F) -> Self
    where
        A: Value,
        B: Value,
        C: Value,
        F: Fn(A, B, C) -> T + Send + Sync + 'static,
    {
        Self::combined(
            (a.value(), b.value(), c.value()),
            vec![
                patch(a, |s: &mut (A, B, C), v| s.0 = v),
                patch(b, |s: &mut (A, B, C), v| s.1 = v),
                patch(c, |s: &mut (A, B, C), v| s.2 = v),
            ],
            move |(a, b, c)| f(a, b, c),
        )
    }

    /// Combine four behaviors
    pub fn combine4<A, B, C, D, F>(
        a: &Behavior<A>,
        b: &Behavior<B>,
        c: &Behavior<C>,
        d: &Behavior<D>,
        f: F,
    ) -> Self
    where
        A: Value,
        B: Value,
        C: Value,
        D: Value,
        F: Fn(A, B, C, D) -> T + Send + Sync + 'static,
    {
        Self::combined(
            (a.value(), b.value(), c.value(), d.value()),
            vec![
                patch(a, |s: &mut (A, B, C, D), v| s.0 = v),
                patch(b, |s: &mut (A, B, C, D), v| s.1 = v),
                patch(c, |s: &mut (A, B, C, D), v| s.2 = v),
                patch(d, |s: &mut (A, B, C, D), v| s.3 = v),
            ],
            move |(a, b, c, d)| f(a, b, c, d),
        )
    }

    // Every input update becomes a patch on the tuple of latest values; the
    // merged patches are folded one at a time.
    fn combined<S, F>(seed: S, patches: Vec<Stream<Patch<S>>>, f: F) -> Self
    where
        S: Value,
        F: Fn(S) -> T + Send + Sync + 'static,
    {
        let initial = f(seed.clone());
        let latest = Stream::merge(patches).scan(seed, |mut state, patch: Patch<S>| {
            patch(&mut state);
            state
        });
        Self::step(initial, &latest.map(f))
    }

    /// Flatten a behavior of behaviors
    ///
    /// Follows whichever inner behavior the outer one currently holds. When
    /// the outer value changes, the new inner's current value is taken and
    /// the previous inner is unsubscribed.
    pub fn join(nested: &Behavior<Behavior<T>>) -> Self {
        let current = nested.value().value();
        let follow = nested.values().map(|inner: Behavior<T>| inner.values()).switch();
        Self::step(current, &follow)
    }

    /// A behavior whose source is resolved on activation
    ///
    /// Holds `initial` until the returned binding is connected. Connecting
    /// runs `resolver` once and follows the resolved behavior's updates
    /// from then on. The resolver may refer to behaviors built after this
    /// one, which is how circular definitions are expressed.
    pub fn lazily_bound<R>(initial: T, resolver: R) -> (Self, DeferredStream<T>)
    where
        R: Fn() -> FrpResult<Behavior<T>> + Send + Sync + 'static,
    {
        let binding = DeferredStream::new(move || resolver().map(|source| source.updates()));
        (Self::step(initial, &binding.stream()), binding)
    }

    /// Share this behavior's updates through an explicitly connected binding
    ///
    /// The returned behavior holds the current value until the binding is
    /// connected. Connecting takes the value at that moment and follows
    /// updates from then on.
    pub fn go_hot(&self) -> (DeferredStream<T>, Self) {
        let source = self.clone();
        let binding = DeferredStream::new(move || Ok(source.values()));
        let hot = Self::step(self.value(), &binding.stream());
        (binding, hot)
    }

    /// Deliver updates on `scheduler`
    ///
    /// Without a scheduler this is the same behavior.
    pub fn observe_on(&self, scheduler: Option<Arc<dyn Scheduler>>) -> Self {
        match scheduler {
            Some(scheduler) => Self::step(self.value(), &self.values_then_on(scheduler)),
            None => self.clone(),
        }
    }

    /// Subscribe to this behavior on `scheduler`
    ///
    /// Without a scheduler this is the same behavior.
    pub fn subscribe_on(&self, scheduler: Option<Arc<dyn Scheduler>>) -> Self {
        match scheduler {
            Some(scheduler) => Self::step(self.value(), &self.values().subscribe_on(scheduler)),
            None => self.clone(),
        }
    }

    /// Publish the current value and updates, at most once per `interval`
    /// as measured by `clock`
    pub fn rate_limit(&self, interval: Duration, clock: Arc<dyn Clock>) -> Stream<T> {
        combinators::rate_limit(&self.values(), interval, clock)
    }

    /// `rate_limit` on the wall clock
    pub fn throttle(&self, interval: Duration) -> Stream<T> {
        self.rate_limit(interval, Arc::new(SystemClock))
    }

    /// Derive a behavior by applying `f` to every value
    pub fn map<U, F>(&self, f: F) -> Behavior<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let initial = f(self.value());
        Behavior::step(initial, &self.values().map(f))
    }

    /// The current value
    pub fn value(&self) -> T {
        read(&self.inner.cell.value).clone()
    }

    /// Hot stream of subsequent values
    ///
    /// A subscription keeps this behavior alive until it is unsubscribed or
    /// dropped.
    pub fn updates(&self) -> Stream<T> {
        let behavior = self.clone();
        Stream::new(move |observer| {
            let subscription = behavior.inner.cell.changes.stream().subscribe(observer);
            behavior.retain_in(&subscription);
            subscription
        })
    }

    /// The current value on subscribe, then every subsequent value
    ///
    /// No update is lost or reordered between the current value and the
    /// first update, even when another thread is delivering.
    pub fn values(&self) -> Stream<T> {
        let behavior = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let cell = &behavior.inner.cell;

            // Updates racing with the first emission are held here until the
            // current value has been delivered.
            let held: Arc<Mutex<Option<Vec<T>>>> = Arc::new(Mutex::new(Some(Vec::new())));
            let gate = Arc::clone(&held);
            let downstream = observer.clone();
            let holding = Observer::new(move |notification: Notification<T>| {
                let value = match notification {
                    Notification::Next(value) => value,
                    other => return downstream.notify(other),
                };
                let value = {
                    let mut slot = lock(&gate);
                    match slot.as_mut() {
                        Some(pending) => {
                            pending.push(value);
                            return;
                        }
                        None => value,
                    }
                };
                downstream.next(value);
            });

            // Holding the read lock across subscribe means an update is
            // either already in `current` or delivered to the new observer.
            let (current, subscription) = {
                let value = read(&cell.value);
                let subscription = cell.changes.stream().subscribe(holding);
                (value.clone(), subscription)
            };
            behavior.retain_in(&subscription);

            observer.next(current);
            loop {
                let pending = {
                    let mut slot = lock(&held);
                    let drained = slot.as_mut().map(std::mem::take).unwrap_or_default();
                    if drained.is_empty() {
                        *slot = None;
                    }
                    drained
                };
                if pending.is_empty() {
                    break;
                }
                for value in pending {
                    observer.next(value);
                }
            }
            subscription
        })
    }

    // `values()` with the current value delivered inline and every later
    // update routed through `scheduler`.
    fn values_then_on(&self, scheduler: Arc<dyn Scheduler>) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let inline = Arc::new(AtomicBool::new(true));
            let routing = Arc::clone(&inline);
            let scheduler = Arc::clone(&scheduler);
            let subscription = source.values().subscribe(Observer::new(
                move |notification: Notification<T>| {
                    if routing.load(Ordering::SeqCst) {
                        observer.notify(notification);
                    } else {
                        let observer = observer.clone();
                        scheduler.schedule(Box::new(move || observer.notify(notification)));
                    }
                },
            ));
            inline.store(false, Ordering::SeqCst);
            subscription
        })
    }

    fn retain_in(&self, subscription: &Subscription) {
        let retained = self.clone();
        subscription.add_teardown(move || drop(retained));
    }
}

fn patch<V, S>(input: &Behavior<V>, set: fn(&mut S, V)) -> Stream<Patch<S>>
where
    V: Value,
    S: 'static,
{
    input.values().map(move |value: V| -> Patch<S> {
        Arc::new(move |state: &mut S| set(state, value.clone()))
    })
}
