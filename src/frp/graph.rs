// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Graphs - declare, define, activate
//!
//! Circular definitions are built in three phases:
//!
//! 1. **Declare** a `Forward<T>` handle for every signal that is referenced
//!    before it exists.
//! 2. **Define** the signals. Resolvers of lazily bound signals read the
//!    forward handles, but only when they run.
//! 3. **Activate** the graph. This checks that every declared handle was
//!    defined, then connects the bindings in registration order.
//!
//! ```rust
//! use cim_frp::frp::{Behavior, SignalGraph};
//! use cim_frp::lifecycle::Disposable;
//!
//! let mut graph = SignalGraph::new();
//! let y_ref = graph.declare::<Behavior<i32>>("y");
//!
//! let y_handle = y_ref.clone();
//! let x = graph.bind(0, move || Ok(y_handle.get()?.map(|v| v + 1)));
//! let x_source = x.clone();
//! let y = graph.bind(0, move || Ok(x_source.map(|v| v + 1)));
//! y_ref.define(y.clone()).unwrap();
//!
//! let handle = graph.activate().unwrap();
//! assert_eq!((x.value(), y.value()), (0, 0));
//!
//! handle.dispose();
//! graph.release();
//! ```

use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use super::behavior::Behavior;
use crate::errors::{FrpError, FrpResult};
use crate::lifecycle::{CompositeConnectable, CompositeDisposable, Connectable};
use crate::stream::{lock, Value};

/// Named slot filled once, after it is first referenced
pub struct Forward<T> {
    name: Arc<str>,
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Forward<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> fmt::Debug for Forward<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Forward")
            .field("name", &self.name)
            .field("defined", &lock(&self.slot).is_some())
            .finish()
    }
}

impl<T: Value> Forward<T> {
    /// An empty slot
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// The slot's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fill the slot
    pub fn define(&self, value: T) -> FrpResult<()> {
        let mut slot = lock(&self.slot);
        if slot.is_some() {
            return Err(FrpError::AlreadyDefined(self.name.to_string()));
        }
        *slot = Some(value);
        debug!(name = %self.name, "Defined forward reference");
        Ok(())
    }

    /// Read the slot
    pub fn get(&self) -> FrpResult<T> {
        lock(&self.slot)
            .clone()
            .ok_or_else(|| FrpError::Undefined(self.name.to_string()))
    }

    pub fn is_defined(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Empty the slot
    ///
    /// Breaks reference cycles between behaviors that refer to each other
    /// through forward handles.
    pub fn release(&self) {
        lock(&self.slot).take();
    }
}

trait Declared: Send + Sync {
    fn name(&self) -> &str;
    fn is_defined(&self) -> bool;
    fn release(&self);
}

impl<T: Value> Declared for Forward<T> {
    fn name(&self) -> &str {
        Forward::name(self)
    }

    fn is_defined(&self) -> bool {
        Forward::is_defined(self)
    }

    fn release(&self) {
        Forward::release(self)
    }
}

/// Arena for a graph of signals with forward references
#[derive(Default)]
pub struct SignalGraph {
    declared: Vec<Arc<dyn Declared>>,
    bindings: CompositeConnectable,
}

impl fmt::Debug for SignalGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalGraph")
            .field("declared", &self.declared.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl SignalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a forward reference to be defined later
    pub fn declare<T: Value>(&mut self, name: impl Into<Arc<str>>) -> Forward<T> {
        let forward = Forward::new(name);
        self.declared.push(Arc::new(forward.clone()));
        forward
    }

    /// Build a lazily bound behavior whose binding is connected on `activate`
    pub fn bind<T, R>(&mut self, initial: T, resolver: R) -> Behavior<T>
    where
        T: Value,
        R: Fn() -> FrpResult<Behavior<T>> + Send + Sync + 'static,
    {
        let (behavior, binding) = Behavior::lazily_bound(initial, resolver);
        self.bindings.push(binding);
        behavior
    }

    /// Register any other connectable to activate with the graph
    pub fn add<C: Connectable + 'static>(&mut self, connectable: C) {
        self.bindings.push(connectable);
    }

    /// Names of declared references that are still empty
    pub fn undefined(&self) -> Vec<String> {
        self.declared
            .iter()
            .filter(|declared| !declared.is_defined())
            .map(|declared| declared.name().to_string())
            .collect()
    }

    /// Connect every binding in registration order
    ///
    /// Nothing is connected if a declared reference is still undefined.
    pub fn activate(&self) -> FrpResult<CompositeDisposable> {
        if let Some(name) = self.undefined().into_iter().next() {
            return Err(FrpError::Undefined(name));
        }

        info!(
            declared = self.declared.len(),
            bindings = self.bindings.len(),
            "Activating signal graph"
        );
        self.bindings.connect()
    }

    /// Empty every declared reference
    pub fn release(&self) {
        for declared in &self.declared {
            declared.release();
        }
    }
}
