// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subject - multicast channel
//!
//! A `Subject<T>` is both a producer handle and a hot stream. Every value
//! passed to `next` is delivered to all observers subscribed at that moment.
//! Late subscribers see only later values.
//!
//! `error` and `complete` are terminal for the observers subscribed when they
//! are called; those observers are detached. The subject itself stays usable
//! and accepts new subscribers afterwards.

use std::fmt;
use std::sync::{Arc, Mutex};

use super::{lock, Notification, Observer, Stream, Subscription, Value};
use crate::errors::FrpError;

/// Multicast channel
pub struct Subject<T> {
    state: Arc<Mutex<SubjectState<T>>>,
}

struct SubjectState<T> {
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> fmt::Debug for Subject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &lock(&self.state).observers.len())
            .finish()
    }
}

impl<T: Value> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Value> Subject<T> {
    /// Create a subject with no observers
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SubjectState {
                observers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// Deliver a value to every current observer
    pub fn next(&self, value: T) {
        for observer in self.current_observers() {
            observer.next(value.clone());
        }
    }

    /// Deliver an engine error to every current observer and detach them
    pub fn error(&self, error: FrpError) {
        for observer in self.detach_all() {
            observer.notify(Notification::Error(error.clone()));
        }
    }

    /// Deliver completion to every current observer and detach them
    pub fn complete(&self) {
        for observer in self.detach_all() {
            observer.complete();
        }
    }

    /// Number of attached observers
    pub fn observer_count(&self) -> usize {
        lock(&self.state).observers.len()
    }

    /// Hot stream view of this subject
    pub fn stream(&self) -> Stream<T> {
        let state = Arc::clone(&self.state);
        Stream::new(move |observer| {
            let id = {
                let mut state = lock(&state);
                let id = state.next_id;
                state.next_id += 1;
                state.observers.push((id, observer));
                id
            };

            let subscription = Subscription::new();
            let state = Arc::clone(&state);
            subscription.add_teardown(move || {
                lock(&state).observers.retain(|(observer_id, _)| *observer_id != id);
            });
            subscription
        })
    }

    // Observers are called outside the lock so they may subscribe,
    // unsubscribe or publish re-entrantly.
    fn current_observers(&self) -> Vec<Observer<T>> {
        lock(&self.state)
            .observers
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect()
    }

    fn detach_all(&self) -> Vec<Observer<T>> {
        std::mem::take(&mut lock(&self.state).observers)
            .into_iter()
            .map(|(_, observer)| observer)
            .collect()
    }
}
