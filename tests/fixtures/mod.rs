// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for cim-frp
//!
//! Shared helpers for the integration suites: a value recorder, instrumented
//! connectables that log their lifecycle calls, and test logging setup.
//!
//! # Design Principles
//! - Time is always driven by `ManualClock`, never the wall clock
//! - Lifecycle order is asserted through one shared `CallLog`
//! - Fixtures never assert; tests do

#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use cim_frp::lifecycle::{Connectable, Disposable};
use cim_frp::stream::{Stream, Subscription, Value};
use cim_frp::{FrpError, FrpResult};

/// Fixed start time for manual clocks (2026-01-19T12:00:00Z)
pub const T0: i64 = 1_768_824_000_000;

static LOGGING: Once = Once::new();

/// Install a test subscriber once per test binary
///
/// Honours `RUST_LOG`; output is captured by the test harness.
pub fn init_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Values delivered to one subscription, in order
pub struct Recorder<T> {
    seen: Arc<Mutex<Vec<T>>>,
    subscription: Subscription,
}

impl<T: Value> Recorder<T> {
    /// Subscribe to `stream` and start recording
    pub fn attach(stream: &Stream<T>) -> Self {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = stream.subscribe_next(move |value| sink.lock().unwrap().push(value));
        Self { seen, subscription }
    }

    pub fn values(&self) -> Vec<T> {
        self.seen.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn detach(&self) {
        self.subscription.unsubscribe();
    }
}

/// Shared, ordered log of lifecycle calls
#[derive(Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

/// Connectable that records `<name>.connect()` and `<name>.dispose()`
pub struct Instrumented {
    name: String,
    log: CallLog,
    fail: bool,
}

impl Instrumented {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            fail: false,
        }
    }

    /// A child whose `connect` fails
    pub fn failing(name: &str, log: &CallLog) -> Self {
        Self {
            fail: true,
            ..Self::new(name, log)
        }
    }
}

pub struct InstrumentedHandle {
    name: String,
    log: CallLog,
}

impl Connectable for Instrumented {
    type Handle = InstrumentedHandle;

    fn connect(&self) -> FrpResult<InstrumentedHandle> {
        self.log.push(format!("{}.connect()", self.name));
        if self.fail {
            return Err(FrpError::Resolver(format!("{} refused to connect", self.name)));
        }
        Ok(InstrumentedHandle {
            name: self.name.clone(),
            log: self.log.clone(),
        })
    }
}

impl Disposable for InstrumentedHandle {
    fn dispose(&self) {
        self.log.push(format!("{}.dispose()", self.name));
    }
}
