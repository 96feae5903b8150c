//! Error types for signal graph operations

use thiserror::Error;

use crate::lifecycle::CompositeDisposable;

/// Errors that can occur while building, activating or running a signal graph
///
/// Domain failures are never reported through this type. They travel inside
/// streams as `Result::Err` values. `FrpError` covers the engine's own error
/// channel and lifecycle faults.
#[derive(Debug, Clone, Error)]
pub enum FrpError {
    /// A forward reference was read before it was defined
    #[error("Forward reference `{0}` used before it was defined")]
    Undefined(String),

    /// A forward reference was defined more than once
    #[error("Forward reference `{0}` is already defined")]
    AlreadyDefined(String),

    /// A deferred binding's resolver could not produce a source
    #[error("Resolver error: {0}")]
    Resolver(String),

    /// A child of an ordered composite failed to connect
    ///
    /// `connected` holds the handles of every child that connected before
    /// the failure. The composite does not dispose them; that is up to the
    /// caller.
    #[error("Connect failed at child {index}: {source}")]
    PartialConnect {
        /// Position of the failing child
        index: usize,
        /// Handles of the children connected before the failure
        connected: CompositeDisposable,
        /// The failing child's error
        source: Box<FrpError>,
    },

    /// Fault raised on a stream's error channel
    #[error("Stream error: {0}")]
    Stream(String),

    /// Scheduler error
    #[error("Scheduler error: {0}")]
    Scheduler(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Result type for signal graph operations
pub type FrpResult<T> = Result<T, FrpError>;

impl From<tokio::runtime::TryCurrentError> for FrpError {
    fn from(err: tokio::runtime::TryCurrentError) -> Self {
        FrpError::Scheduler(err.to_string())
    }
}
