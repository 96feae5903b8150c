// Copyright (c) 2025 - Cowboy AI, Inc.
//! Schedulers
//!
//! A `Scheduler` decides where a unit of delivery work runs. The signal layer
//! is thread-agnostic: without a scheduler, work runs on whichever thread
//! delivered the item.
//!
//! - `ImmediateScheduler` runs tasks inline on the calling thread.
//! - `TokioScheduler` queues tasks in FIFO order and runs them one at a time
//!   on a task spawned on a tokio runtime, so delivery order is preserved.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::SchedulerConfig;
use crate::errors::FrpResult;

/// A unit of scheduled work
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Execution context for deliveries and subscriptions
pub trait Scheduler: Send + Sync {
    /// Run `task` in this scheduler's context
    fn schedule(&self, task: Task);
}

/// Runs every task inline
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: Task) {
        task()
    }
}

/// Serial FIFO scheduler backed by a tokio runtime
///
/// Dropping every clone of the scheduler closes its queue; tasks already
/// queued still run.
#[derive(Clone)]
pub struct TokioScheduler {
    sender: mpsc::UnboundedSender<Task>,
    backlog: Arc<AtomicUsize>,
    config: Arc<SchedulerConfig>,
}

impl TokioScheduler {
    /// Create a scheduler whose worker task runs on `handle`
    pub fn new(handle: &Handle, config: SchedulerConfig) -> FrpResult<Self> {
        config.validate()?;

        let (sender, mut receiver) = mpsc::unbounded_channel::<Task>();
        let backlog = Arc::new(AtomicUsize::new(0));

        let pending = Arc::clone(&backlog);
        let name = config.name.clone();
        handle.spawn(async move {
            while let Some(task) = receiver.recv().await {
                pending.fetch_sub(1, Ordering::SeqCst);
                task();
            }
            debug!(scheduler = %name, "Scheduler queue closed");
        });

        debug!(scheduler = %config.name, "Started scheduler");

        Ok(Self {
            sender,
            backlog,
            config: Arc::new(config),
        })
    }

    /// Create a scheduler on the runtime of the calling context
    pub fn current(config: SchedulerConfig) -> FrpResult<Self> {
        let handle = Handle::try_current()?;
        Self::new(&handle, config)
    }

    /// Tasks queued but not yet started
    pub fn backlog(&self) -> usize {
        self.backlog.load(Ordering::SeqCst)
    }

    /// The scheduler's configuration
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("name", &self.config.name)
            .field("backlog", &self.backlog())
            .finish()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, task: Task) {
        let depth = self.backlog.fetch_add(1, Ordering::SeqCst) + 1;
        if depth > self.config.backlog_warn_threshold {
            warn!(
                scheduler = %self.config.name,
                backlog = depth,
                "Scheduler backlog above threshold"
            );
        }

        if self.sender.send(task).is_err() {
            self.backlog.fetch_sub(1, Ordering::SeqCst);
            warn!(scheduler = %self.config.name, "Scheduler closed, dropping task");
        }
    }
}
