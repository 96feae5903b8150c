//! Functional reactive signals for the Composable Information Machine
//!
//! This crate composes derived, time-varying values (such as
//! `enabled = visible AND NOT busy`) without hand-written subscribe and
//! unsubscribe wiring. It provides:
//!
//! - a minimal push-stream engine ([`stream`])
//! - behaviors, deferred bindings and stream combinators ([`frp`])
//! - the two-phase connect/dispose lifecycle ([`lifecycle`])
//! - injectable clocks and scheduler configuration

pub mod clock;
pub mod config;
pub mod errors;
pub mod frp;
pub mod lifecycle;
pub mod stream;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::SchedulerConfig;
pub use errors::{FrpError, FrpResult};
pub use frp::{Behavior, DeferredStream, Forward, Samplable, Signal, SignalGraph};
pub use lifecycle::{
    AnyConnectable, CompositeConnectable, CompositeDisposable, Connectable, Disposable,
};
pub use stream::{Observer, Scheduler, Stream, Subject, Subscription, TokioScheduler};
