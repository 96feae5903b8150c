// Copyright (c) 2025 - Cowboy AI, Inc.
//! Stream Operators
//!
//! Operators build new streams from existing ones. All of them are lazy:
//! nothing runs until the resulting stream is subscribed, and each
//! subscription gets its own operator state.
//!
//! # Available Operators
//!
//! ## Transforming
//! - `map`, `filter`, `filter_map`
//! - `scan` - stateful fold emitting every intermediate result
//!
//! ## Combining
//! - `merge`, `merge_with` - interleave several streams
//! - `start_with` - prepend one value
//! - `concat_map` - strictly ordered sub-streams
//! - `switch` - follow only the latest inner stream
//!
//! ## Ordering and Placement
//! - `serialize` - one delivery at a time, in a total order
//! - `observe_on` / `subscribe_on` - route through a `Scheduler`

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{lock, Notification, Observer, Scheduler, Stream, Subscription, Value};
use crate::errors::FrpError;

impl<T: Value> Stream<T> {
    /// Apply a function to every value
    pub fn map<U, F>(&self, f: F) -> Stream<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Stream::new(move |observer: Observer<U>| {
            let f = Arc::clone(&f);
            source.subscribe(Observer::new(move |notification: Notification<T>| {
                observer.notify(notification.map(|value| f(value)))
            }))
        })
    }

    /// Keep only values matching a predicate
    pub fn filter<P>(&self, predicate: P) -> Stream<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let source = self.clone();
        let predicate = Arc::new(predicate);
        Stream::new(move |observer: Observer<T>| {
            let predicate = Arc::clone(&predicate);
            source.subscribe(Observer::new(move |notification| match notification {
                Notification::Next(value) => {
                    if predicate(&value) {
                        observer.next(value);
                    }
                }
                other => observer.notify(other),
            }))
        })
    }

    /// Map and filter in one step
    pub fn filter_map<U, F>(&self, f: F) -> Stream<U>
    where
        U: Value,
        F: Fn(T) -> Option<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let f = Arc::new(f);
        Stream::new(move |observer: Observer<U>| {
            let f = Arc::clone(&f);
            source.subscribe(Observer::new(move |notification| match notification {
                Notification::Next(value) => {
                    if let Some(mapped) = f(value) {
                        observer.next(mapped);
                    }
                }
                Notification::Error(e) => observer.error(e),
                Notification::Completed => observer.complete(),
            }))
        })
    }

    /// Accumulate values, emitting each intermediate result
    ///
    /// Deliveries are serialized first, so `f` never runs concurrently and
    /// always sees the accumulator produced by the previous item.
    pub fn scan<A, F>(&self, seed: A, f: F) -> Stream<A>
    where
        A: Value,
        F: Fn(A, T) -> A + Send + Sync + 'static,
    {
        let source = self.serialize();
        let f = Arc::new(f);
        Stream::new(move |observer: Observer<A>| {
            let f = Arc::clone(&f);
            let accumulator = Mutex::new(seed.clone());
            source.subscribe(Observer::new(move |notification| match notification {
                Notification::Next(value) => {
                    let next = {
                        let mut acc = lock(&accumulator);
                        let next = f(acc.clone(), value);
                        *acc = next.clone();
                        next
                    };
                    observer.next(next);
                }
                Notification::Error(e) => observer.error(e),
                Notification::Completed => observer.complete(),
            }))
        })
    }

    /// Interleave several streams
    ///
    /// Completes once every input has completed. An error from any input is
    /// forwarded.
    pub fn merge<I>(streams: I) -> Stream<T>
    where
        I: IntoIterator<Item = Stream<T>>,
    {
        let streams: Vec<Stream<T>> = streams.into_iter().collect();
        Stream::new(move |observer: Observer<T>| {
            let subscription = Subscription::new();
            if streams.is_empty() {
                observer.complete();
                return subscription;
            }

            let remaining = Arc::new(AtomicUsize::new(streams.len()));
            for stream in &streams {
                let observer = observer.clone();
                let remaining = Arc::clone(&remaining);
                subscription.add(stream.subscribe(Observer::new(move |notification| {
                    match notification {
                        Notification::Completed => {
                            if remaining.fetch_sub(1, Ordering::SeqCst) == 1 {
                                observer.complete();
                            }
                        }
                        other => observer.notify(other),
                    }
                })));
            }
            subscription
        })
    }

    /// Interleave this stream with another
    pub fn merge_with(&self, other: &Stream<T>) -> Stream<T> {
        Stream::merge([self.clone(), other.clone()])
    }

    /// Emit `value` on subscribe, then everything from this stream
    pub fn start_with(&self, value: T) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            observer.next(value.clone());
            source.subscribe(observer)
        })
    }

    /// Funnel deliveries into a single total order
    ///
    /// Concurrent producers enqueue and return; whichever caller finds the
    /// queue idle drains it, delivering one notification at a time.
    /// Re-entrant deliveries are queued behind the current one instead of
    /// recursing.
    pub fn serialize(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let serializer = Arc::new(Serializer {
                downstream: observer,
                state: Mutex::new(SerializerState {
                    queue: VecDeque::new(),
                    draining: false,
                }),
            });
            source.subscribe(Observer::new(move |notification| {
                serializer.push(notification)
            }))
        })
    }

    /// Map each value to a sub-stream and concatenate them in order
    ///
    /// The sub-stream for item *i* completes before the sub-stream for item
    /// *i+1* is subscribed. Items arriving meanwhile are buffered.
    pub fn concat_map<U, F>(&self, project: F) -> Stream<U>
    where
        U: Value,
        F: Fn(T) -> Stream<U> + Send + Sync + 'static,
    {
        let source = self.clone();
        let project: Arc<dyn Fn(T) -> Stream<U> + Send + Sync> = Arc::new(project);
        Stream::new(move |observer: Observer<U>| {
            let concat = Arc::new(ConcatMap {
                project: Arc::clone(&project),
                downstream: observer,
                subscription: Subscription::new(),
                state: Mutex::new(ConcatState {
                    queue: VecDeque::new(),
                    active: false,
                    draining: false,
                    source_done: false,
                    finished: false,
                }),
            });

            let outer = Arc::clone(&concat);
            let upstream = source.subscribe(Observer::new(move |notification| match notification {
                Notification::Next(value) => {
                    lock(&outer.state).queue.push_back(value);
                    outer.drain();
                }
                Notification::Completed => {
                    lock(&outer.state).source_done = true;
                    outer.drain();
                }
                Notification::Error(e) => outer.fail(e),
            }));
            concat.subscription.add(upstream);
            concat.subscription.clone()
        })
    }

    /// Route deliveries through a scheduler
    pub fn observe_on(&self, scheduler: Arc<dyn Scheduler>) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let scheduler = Arc::clone(&scheduler);
            source.subscribe(Observer::new(move |notification| {
                let observer = observer.clone();
                scheduler.schedule(Box::new(move || observer.notify(notification)));
            }))
        })
    }

    /// Perform the subscription itself on a scheduler
    ///
    /// The returned handle is live immediately; unsubscribing before the
    /// scheduled subscribe has run cancels it.
    pub fn subscribe_on(&self, scheduler: Arc<dyn Scheduler>) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let subscription = Subscription::new();
            let handle = subscription.clone();
            let source = source.clone();
            scheduler.schedule(Box::new(move || {
                if !handle.is_closed() {
                    handle.add(source.subscribe(observer));
                }
            }));
            subscription
        })
    }
}

impl<T: Value> Stream<Stream<T>> {
    /// Follow only the most recent inner stream
    ///
    /// When a new inner stream arrives the previous one is unsubscribed and
    /// anything it still delivers is discarded.
    pub fn switch(&self) -> Stream<T> {
        let source = self.clone();
        Stream::new(move |observer: Observer<T>| {
            let current: Arc<Mutex<(u64, Option<Subscription>)>> =
                Arc::new(Mutex::new((0, None)));

            let latest = Arc::clone(&current);
            let downstream = observer.clone();
            let outer = source.subscribe(Observer::new(
                move |notification: Notification<Stream<T>>| match notification {
                    Notification::Next(inner) => {
                        let (generation, stale) = {
                            let mut slot = lock(&latest);
                            slot.0 += 1;
                            (slot.0, slot.1.take())
                        };
                        if let Some(stale) = stale {
                            stale.unsubscribe();
                        }

                        let gate = Arc::clone(&latest);
                        let forward = downstream.clone();
                        let subscription = inner.subscribe(Observer::new(
                            move |notification: Notification<T>| {
                                let is_current = lock(&gate).0 == generation;
                                if !is_current {
                                    return;
                                }
                                match notification {
                                    Notification::Next(value) => forward.next(value),
                                    Notification::Error(e) => forward.error(e),
                                    Notification::Completed => {}
                                }
                            },
                        ));

                        let mut slot = lock(&latest);
                        if slot.0 == generation {
                            slot.1 = Some(subscription);
                        } else {
                            drop(slot);
                            subscription.unsubscribe();
                        }
                    }
                    Notification::Error(e) => downstream.error(e),
                    Notification::Completed => downstream.complete(),
                },
            ));

            let subscription = Subscription::new();
            subscription.add(outer);
            subscription.add_teardown(move || {
                let inner = lock(&current).1.take();
                if let Some(inner) = inner {
                    inner.unsubscribe();
                }
            });
            subscription
        })
    }
}

struct Serializer<T> {
    downstream: Observer<T>,
    state: Mutex<SerializerState<T>>,
}

struct SerializerState<T> {
    queue: VecDeque<Notification<T>>,
    draining: bool,
}

impl<T: Value> Serializer<T> {
    fn push(&self, notification: Notification<T>) {
        {
            let mut state = lock(&self.state);
            state.queue.push_back(notification);
            if state.draining {
                return;
            }
            state.draining = true;
        }

        loop {
            let next = {
                let mut state = lock(&self.state);
                match state.queue.pop_front() {
                    Some(next) => next,
                    None => {
                        state.draining = false;
                        return;
                    }
                }
            };
            self.downstream.notify(next);
        }
    }
}

struct ConcatMap<T, U> {
    project: Arc<dyn Fn(T) -> Stream<U> + Send + Sync>,
    downstream: Observer<U>,
    subscription: Subscription,
    state: Mutex<ConcatState<T>>,
}

struct ConcatState<T> {
    queue: VecDeque<T>,
    active: bool,
    draining: bool,
    source_done: bool,
    finished: bool,
}

impl<T: Value, U: Value> ConcatMap<T, U> {
    fn drain(self: &Arc<Self>) {
        let mut state = lock(&self.state);
        if state.draining || state.finished {
            return;
        }
        state.draining = true;

        loop {
            if state.active {
                state.draining = false;
                return;
            }

            let Some(item) = state.queue.pop_front() else {
                state.draining = false;
                let done = state.source_done;
                if done {
                    state.finished = true;
                }
                drop(state);
                if done {
                    self.downstream.complete();
                    self.subscription.unsubscribe();
                }
                return;
            };

            state.active = true;
            drop(state);

            let inner = (self.project)(item);
            let this = Arc::clone(self);
            let subscription = inner.subscribe(Observer::new(move |notification| match notification {
                Notification::Next(value) => this.downstream.next(value),
                Notification::Error(e) => this.fail(e),
                Notification::Completed => {
                    lock(&this.state).active = false;
                    this.drain();
                }
            }));
            self.subscription.add(subscription);

            state = lock(&self.state);
        }
    }

    fn fail(&self, error: FrpError) {
        {
            let mut state = lock(&self.state);
            if state.finished {
                return;
            }
            state.finished = true;
            state.queue.clear();
        }
        self.downstream.error(error);
        self.subscription.unsubscribe();
    }
}
