// Copyright (c) 2025 - Cowboy AI, Inc.
//! Two-Phase Lifecycle
//!
//! A `Connectable` is inert until `connect` activates it. Activation returns
//! a `Disposable` handle whose `dispose` undoes exactly that activation.
//!
//! ```text
//! Connectable ──connect()──> Disposable ──dispose()──> (inactive)
//!      │
//!      └──connect()──> Disposable   (a second, independent activation)
//! ```
//!
//! # Ordered Composites
//!
//! `CompositeConnectable` connects its children eagerly, in order, and
//! collects their handles into a `CompositeDisposable` in the same order.
//!
//! **Disposal runs forward, not reversed.** Disposing `[d1, d2, d3]` disposes
//! `d1`, then `d2`, then `d3`. This differs from the usual nested-resource
//! teardown order. Callers that need reverse teardown must reverse the
//! children themselves.
//!
//! **No rollback.** If a child fails to connect, the children connected
//! before it stay connected. Their handles are returned inside
//! `FrpError::PartialConnect` and cleaning them up is the caller's job.
//!
//! # Example
//!
//! ```rust,ignore
//! let graph = CompositeConnectable::new()
//!     .with(header_binding)
//!     .with(footer_binding);
//!
//! let handle = graph.connect()?;
//! // ... later
//! handle.dispose();
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::errors::{FrpError, FrpResult};

/// Handle that deactivates one activation
///
/// Every implementation in this crate makes `dispose` idempotent: calling it
/// again is a no-op.
pub trait Disposable: Send + Sync {
    /// Deactivate
    fn dispose(&self);
}

impl<D: Disposable + ?Sized> Disposable for Arc<D> {
    fn dispose(&self) {
        (**self).dispose()
    }
}

/// Resource that is inert until connected
pub trait Connectable: Send + Sync {
    /// Handle returned by a successful activation
    type Handle: Disposable + 'static;

    /// Activate
    ///
    /// Each call is an independent activation with its own handle.
    fn connect(&self) -> FrpResult<Self::Handle>;
}

/// Type-erased connectable
///
/// Wraps any `Connectable` behind one concrete type so heterogeneous
/// connectables can live in the same collection.
#[derive(Clone)]
pub struct AnyConnectable {
    inner: Arc<dyn ErasedConnectable>,
}

trait ErasedConnectable: Send + Sync {
    fn connect_erased(&self) -> FrpResult<Arc<dyn Disposable>>;
}

impl<C: Connectable> ErasedConnectable for C {
    fn connect_erased(&self) -> FrpResult<Arc<dyn Disposable>> {
        let handle = self.connect()?;
        Ok(Arc::new(handle))
    }
}

impl AnyConnectable {
    /// Erase a connectable
    pub fn new<C: Connectable + 'static>(connectable: C) -> Self {
        Self {
            inner: Arc::new(connectable),
        }
    }
}

impl fmt::Debug for AnyConnectable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AnyConnectable")
    }
}

impl Connectable for AnyConnectable {
    type Handle = Arc<dyn Disposable>;

    fn connect(&self) -> FrpResult<Self::Handle> {
        self.inner.connect_erased()
    }
}

/// Ordered collection of connectables activated together
#[derive(Clone, Default, Debug)]
pub struct CompositeConnectable {
    children: Vec<AnyConnectable>,
}

impl CompositeConnectable {
    /// Empty composite
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a child, builder style
    pub fn with<C: Connectable + 'static>(mut self, child: C) -> Self {
        self.push(child);
        self
    }

    /// Append a child
    pub fn push<C: Connectable + 'static>(&mut self, child: C) {
        self.children.push(AnyConnectable::new(child));
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the composite has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl<C: Connectable + 'static> FromIterator<C> for CompositeConnectable {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            children: iter.into_iter().map(AnyConnectable::new).collect(),
        }
    }
}

impl Connectable for CompositeConnectable {
    type Handle = CompositeDisposable;

    /// Connect every child in order
    ///
    /// Stops at the first failure without disposing the children already
    /// connected; see `FrpError::PartialConnect`.
    fn connect(&self) -> FrpResult<CompositeDisposable> {
        debug!(children = self.children.len(), "Connecting composite");

        let mut handles = Vec::with_capacity(self.children.len());
        for (index, child) in self.children.iter().enumerate() {
            match child.connect() {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    warn!(
                        index,
                        connected = handles.len(),
                        error = %source,
                        "Composite connect failed; connected children left active"
                    );
                    return Err(FrpError::PartialConnect {
                        index,
                        connected: CompositeDisposable::from_handles(handles),
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(CompositeDisposable::from_handles(handles))
    }
}

/// Ordered collection of handles disposed together, first to last
#[derive(Clone, Default)]
pub struct CompositeDisposable {
    children: Vec<Arc<dyn Disposable>>,
    disposed: Arc<AtomicBool>,
}

impl CompositeDisposable {
    /// Composite over the given handles, kept in order
    pub fn from_handles(children: Vec<Arc<dyn Disposable>>) -> Self {
        Self {
            children,
            disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Append a handle
    pub fn push<D: Disposable + 'static>(&mut self, child: D) {
        self.children.push(Arc::new(child));
    }

    /// Number of handles
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the composite holds no handles
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Whether `dispose` has run
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for CompositeDisposable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeDisposable")
            .field("children", &self.children.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Disposable for CompositeDisposable {
    /// Dispose every handle in insertion order (forward)
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        debug!(children = self.children.len(), "Disposing composite");
        for child in &self.children {
            child.dispose();
        }
    }
}
