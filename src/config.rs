// Copyright (c) 2025 - Cowboy AI, Inc.
//! Configuration for runtime-backed components

use crate::errors::{FrpError, FrpResult};

/// Configuration for a `TokioScheduler`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Name used in log events
    pub name: String,
    /// Queue depth above which each scheduled task logs a warning
    pub backlog_warn_threshold: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            name: "frp-scheduler".to_string(),
            backlog_warn_threshold: 1024,
        }
    }
}

impl SchedulerConfig {
    /// Default configuration with a custom name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the backlog warning threshold
    pub fn with_backlog_warn_threshold(mut self, threshold: usize) -> Self {
        self.backlog_warn_threshold = threshold;
        self
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> FrpResult<()> {
        if self.name.trim().is_empty() {
            return Err(FrpError::Configuration(
                "scheduler name must not be empty".to_string(),
            ));
        }
        if self.backlog_warn_threshold == 0 {
            return Err(FrpError::Configuration(
                "backlog_warn_threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
