// Copyright (c) 2025 - Cowboy AI, Inc.
//! Subscription handles
//!
//! A `Subscription` ends delivery for one subscription and runs its
//! registered teardowns exactly once. Unsubscribing is idempotent and never
//! waits for deliveries already in flight.
//!
//! Dropping a `Subscription` without unsubscribing does not run its
//! teardowns, but it does release whatever they retain.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::lock;
use crate::lifecycle::Disposable;

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to an active subscription
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<Inner>,
}

struct Inner {
    closed: AtomicBool,
    teardowns: Mutex<Vec<Teardown>>,
}

impl Subscription {
    /// Create an open subscription with no teardowns
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                closed: AtomicBool::new(false),
                teardowns: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Create a subscription that is already closed
    ///
    /// Returned by streams that finish synchronously inside `subscribe`.
    pub fn closed() -> Self {
        let subscription = Self::new();
        subscription.inner.closed.store(true, Ordering::SeqCst);
        subscription
    }

    /// Whether `unsubscribe` has run
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Register work to run on unsubscribe
    ///
    /// Runs immediately if the subscription is already closed.
    pub fn add_teardown<F>(&self, teardown: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut teardowns = lock(&self.inner.teardowns);
        if self.is_closed() {
            drop(teardowns);
            teardown();
            return;
        }
        teardowns.push(Box::new(teardown));
    }

    /// Unsubscribe `child` together with this subscription
    pub fn add(&self, child: Subscription) {
        if child.is_closed() || Arc::ptr_eq(&self.inner, &child.inner) {
            return;
        }
        self.add_teardown(move || child.unsubscribe());
    }

    /// End delivery and run the teardowns
    ///
    /// Safe to call any number of times; only the first call does work.
    pub fn unsubscribe(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        let teardowns = std::mem::take(&mut *lock(&self.inner.teardowns));
        for teardown in teardowns {
            teardown();
        }
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        self.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_unsubscribe_runs_teardowns_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscription = Subscription::new();

        let c = count.clone();
        subscription.add_teardown(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        subscription.unsubscribe();
        subscription.unsubscribe();

        assert!(subscription.is_closed());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_teardown_after_close_runs_immediately() {
        let ran = Arc::new(AtomicBool::new(false));
        let subscription = Subscription::closed();

        let r = ran.clone();
        subscription.add_teardown(move || r.store(true, Ordering::SeqCst));

        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_child_unsubscribed_with_parent() {
        let parent = Subscription::new();
        let child = Subscription::new();
        parent.add(child.clone());

        parent.dispose();

        assert!(child.is_closed());
    }

    #[test]
    fn test_add_self_is_ignored() {
        let subscription = Subscription::new();
        subscription.add(subscription.clone());
        subscription.unsubscribe();
        assert!(subscription.is_closed());
    }
}
