// Copyright (c) 2025 - Cowboy AI, Inc.
//! Push-Stream Engine
//!
//! The minimal push-based stream capability the signal layer is built on.
//! A `Stream<T>` is a description of how to produce values for an
//! `Observer<T>`; subscribing runs that description and returns a
//! `Subscription` that ends delivery when unsubscribed.
//!
//! # Hot and Cold
//!
//! ```text
//! Cold (Stream::from_iter)        Hot (Subject / DeferredStream)
//! ───────────────────────         ──────────────────────────────
//! subscriber A ──> 1 2 3          producer ──> subject ──┬──> A
//! subscriber B ──> 1 2 3                                 └──> B
//! ```
//!
//! Streams are cold unless they come from a `Subject`. `publish()` turns any
//! stream into an explicitly-connected hot one.
//!
//! # Delivery
//!
//! Delivery is synchronous: an observer runs on whichever thread calls
//! `next`. Use `observe_on` to hop onto a `Scheduler`, and `serialize` when
//! several producers may deliver concurrently into a stateful fold.
//!
//! # Example
//!
//! ```rust
//! use cim_frp::stream::{Stream, Subject};
//! use std::sync::{Arc, Mutex};
//!
//! let subject = Subject::<i32>::new();
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = seen.clone();
//!
//! let _subscription = subject
//!     .stream()
//!     .map(|x| x * 10)
//!     .subscribe_next(move |x| sink.lock().unwrap().push(x));
//!
//! subject.next(1);
//! subject.next(2);
//! assert_eq!(*seen.lock().unwrap(), vec![10, 20]);
//! ```

pub mod bridge;
pub mod observer;
pub mod operators;
pub mod scheduler;
pub mod subject;
pub mod subscription;

pub use bridge::SubscribedStream;
pub use observer::{Notification, Observer};
pub use scheduler::{ImmediateScheduler, Scheduler, Task, TokioScheduler};
pub use subject::Subject;
pub use subscription::Subscription;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::errors::FrpError;

/// Values that can flow through streams and behaviors
///
/// Everything delivered by the engine may be multicast to several observers
/// and may cross threads, hence the bounds.
pub trait Value: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Value for T {}

/// A push-based stream of values of type `T`
///
/// Cloning a `Stream` clones the description, not any running production.
pub struct Stream<T> {
    subscribe_fn: Arc<dyn Fn(Observer<T>) -> Subscription + Send + Sync>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Arc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stream<{}>", std::any::type_name::<T>())
    }
}

impl<T: Value> Stream<T> {
    /// Create a stream from its subscribe function
    ///
    /// The function is called once per subscription with the downstream
    /// observer and returns the handle that tears that subscription down.
    pub fn new<F>(subscribe: F) -> Self
    where
        F: Fn(Observer<T>) -> Subscription + Send + Sync + 'static,
    {
        Self {
            subscribe_fn: Arc::new(subscribe),
        }
    }

    /// Subscribe an observer
    pub fn subscribe(&self, observer: Observer<T>) -> Subscription {
        (self.subscribe_fn)(observer)
    }

    /// Subscribe a callback for values only
    ///
    /// Errors and completion are ignored.
    pub fn subscribe_next<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        self.subscribe(Observer::from_next(on_next))
    }

    /// A stream that completes immediately
    pub fn empty() -> Self {
        Stream::new(|observer| {
            observer.complete();
            Subscription::closed()
        })
    }

    /// A stream that never emits and never completes
    pub fn never() -> Self {
        Stream::new(|_| Subscription::new())
    }

    /// A stream that emits one value and completes
    pub fn just(value: T) -> Self {
        Stream::new(move |observer| {
            observer.next(value.clone());
            observer.complete();
            Subscription::closed()
        })
    }

    /// A cold stream replaying the given values to every subscriber
    pub fn from_iter<I>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let values: Arc<[T]> = values.into_iter().collect();
        Stream::new(move |observer| {
            for value in values.iter() {
                observer.next(value.clone());
            }
            observer.complete();
            Subscription::closed()
        })
    }

    /// A stream that fails immediately
    pub fn error(error: FrpError) -> Self {
        Stream::new(move |observer| {
            observer.error(error.clone());
            Subscription::closed()
        })
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
