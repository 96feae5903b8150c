// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deferred Binding
//!
//! A `DeferredStream<T>` is a hot stream whose source is not known when it is
//! built. It holds a resolver instead, and only runs it when connected:
//!
//! ```text
//! build:    DeferredStream::new(resolver)       (resolver not called)
//! wire:     binding.stream().subscribe(..)      (legal, receives nothing yet)
//! connect:  resolver() ──> source ──> channel ──> every subscriber
//! dispose:  source unsubscribed, channel stays open
//! connect:  resolver() again (never cached)
//! ```
//!
//! Because resolution waits until `connect`, a resolver can refer to values
//! defined after the binding itself. Two behaviors can therefore follow each
//! other: the cycle is broken by the binding that is connected last.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::FrpResult;
use crate::lifecycle::Connectable;
use crate::stream::{Notification, Observer, Stream, Subject, Subscription, Value};

type Resolver<T> = Box<dyn Fn() -> FrpResult<Stream<T>> + Send + Sync>;

/// Hot stream bound to its source on `connect`
pub struct DeferredStream<T> {
    inner: Arc<DeferredInner<T>>,
}

struct DeferredInner<T> {
    resolver: Resolver<T>,
    channel: Subject<T>,
    activations: AtomicUsize,
}

impl<T> Clone for DeferredStream<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for DeferredStream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredStream")
            .field("activations", &self.inner.activations.load(Ordering::SeqCst))
            .finish()
    }
}

impl<T: Value> DeferredStream<T> {
    /// Binding that resolves its source with `resolver` on each connect
    pub fn new<R>(resolver: R) -> Self
    where
        R: Fn() -> FrpResult<Stream<T>> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(DeferredInner {
                resolver: Box::new(resolver),
                channel: Subject::new(),
                activations: AtomicUsize::new(0),
            }),
        }
    }

    /// Binding together with its output stream
    pub fn create<R>(resolver: R) -> (Self, Stream<T>)
    where
        R: Fn() -> FrpResult<Stream<T>> + Send + Sync + 'static,
    {
        let binding = Self::new(resolver);
        let stream = binding.stream();
        (binding, stream)
    }

    /// The shared output stream
    ///
    /// Every subscriber sees the same forwarded sequence, whether it
    /// subscribed before or after `connect`.
    pub fn stream(&self) -> Stream<T> {
        self.inner.channel.stream()
    }

    /// How many times `connect` has been called
    pub fn activations(&self) -> usize {
        self.inner.activations.load(Ordering::SeqCst)
    }
}

impl<T: Value> Connectable for DeferredStream<T> {
    type Handle = Subscription;

    /// Resolve the source and start forwarding it
    ///
    /// Each call resolves again and adds an independent activation.
    /// Connecting twice without disposing forwards both.
    fn connect(&self) -> FrpResult<Subscription> {
        let activation = self.inner.activations.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(activation, "Resolving deferred binding");

        let source = (self.inner.resolver)().inspect_err(|e| {
            warn!(activation, error = %e, "Deferred binding could not be resolved");
        })?;

        let channel = self.inner.channel.clone();
        Ok(source.subscribe(Observer::new(move |notification| match notification {
            Notification::Next(value) => channel.next(value),
            // Terminal notifications end this activation only. The channel
            // outlives it, so subscribers stay attached for the next connect.
            Notification::Error(e) => warn!(activation, error = %e, "Deferred source failed"),
            Notification::Completed => debug!(activation, "Deferred source completed"),
        })))
    }
}

impl<T: Value> Stream<T> {
    /// Share one production of this stream among all subscribers
    ///
    /// Nothing is subscribed upstream until the returned binding is
    /// connected.
    pub fn publish(&self) -> DeferredStream<T> {
        let source = self.clone();
        DeferredStream::new(move || Ok(source.clone()))
    }
}
