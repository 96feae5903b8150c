// Copyright (c) 2025 - Cowboy AI, Inc.
//! Functional Reactive Programming (FRP) Signals
//!
//! This module builds graphs of time-varying values on top of the push
//! streams in [`crate::stream`]. It distinguishes continuous-time behaviors
//! from discrete-time streams.
//!
//! # Core Concepts
//!
//! ## Behavior<T> (Continuous-Time)
//!
//! A value that exists at all points in time. Reading it never blocks.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:  ≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈≈
//! ```
//!
//! Examples:
//! - Whether a control is enabled
//! - The latest selection
//! - A running total folded from events
//!
//! ## Stream<T> (Discrete-Time)
//!
//! Values that occur at specific moments.
//!
//! ```text
//! Time: ────────────────────────────→
//! Value:      ●       ●   ●       ●
//! ```
//!
//! ## Deferred Bindings
//!
//! A [`DeferredStream`] resolves its source only when connected. This is
//! what makes circular definitions possible; [`SignalGraph`] organises them
//! as declare, define, activate.
//!
//! # Functor Laws
//!
//! ```text
//! map id = id
//! map (g . f) = map g . map f
//! ```
//!
//! # Example
//!
//! ```rust
//! use cim_frp::frp::Behavior;
//! use cim_frp::stream::Subject;
//!
//! let clicks = Subject::new();
//! let count = Behavior::scan(0, &clicks.stream(), |n, _: ()| n + 1);
//!
//! clicks.next(());
//! clicks.next(());
//! assert_eq!(count.value(), 2);
//! ```

pub mod behavior;
pub mod combinators;
pub mod deferred;
pub mod graph;
pub mod signal;

pub use behavior::Behavior;
pub use deferred::DeferredStream;
pub use graph::{Forward, SignalGraph};
pub use signal::{Samplable, Signal};

/// Time representation (milliseconds since epoch)
pub type Time = i64;
