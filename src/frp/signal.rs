// Copyright (c) 2025 - Cowboy AI, Inc.
//! Signal Traits - shared surface of streams and behaviors
//!
//! # Type Hierarchy
//!
//! ```text
//! Signal<T>
//!   ├── Stream<T>    (discrete: values at delivery instants)
//!   └── Behavior<T>  (continuous: a value at every instant)
//!         └── Samplable<T>
//! ```
//!
//! # Functor Laws
//!
//! Every implementation satisfies:
//!
//! 1. **Identity**: `signal.map(|x| x)` delivers the same values as `signal`
//! 2. **Composition**: `signal.map(f).map(g)` delivers the same values as
//!    `signal.map(|x| g(f(x)))`
//!
//! # Example
//!
//! ```rust
//! use cim_frp::frp::{Behavior, Samplable, Signal};
//!
//! fn doubled<S: Signal<i32>>(signal: &S) -> S::Mapped<i32> {
//!     signal.map(|x| x * 2)
//! }
//!
//! assert_eq!(doubled(&Behavior::constant(21)).sample(), 42);
//! ```

use crate::stream::{Stream, Value};

use super::behavior::Behavior;

/// Time-varying value
///
/// Signals are functors: `map` derives a new signal of the same kind.
pub trait Signal<T: Value>: Clone + Send + Sync {
    /// The kind of signal `map` produces
    type Mapped<U: Value>: Signal<U>;

    /// Derive a signal by applying `f` to every value
    fn map<U, F>(&self, f: F) -> Self::Mapped<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static;
}

/// Signals that have a value at every instant
pub trait Samplable<T: Value>: Signal<T> {
    /// The current value
    fn sample(&self) -> T;
}

impl<T: Value> Signal<T> for Stream<T> {
    type Mapped<U: Value> = Stream<U>;

    fn map<U, F>(&self, f: F) -> Stream<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Stream::map(self, f)
    }
}

impl<T: Value> Signal<T> for Behavior<T> {
    type Mapped<U: Value> = Behavior<U>;

    fn map<U, F>(&self, f: F) -> Behavior<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        Behavior::map(self, f)
    }
}

impl<T: Value> Samplable<T> for Behavior<T> {
    fn sample(&self) -> T {
        self.value()
    }
}
