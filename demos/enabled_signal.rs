// Copyright (c) 2025 - Cowboy AI, Inc.
//! Enabled Signal Example
//!
//! Derives `enabled = visible AND NOT busy` from two event streams, gates a
//! stream of clicks on it, and delivers the results on a tokio scheduler.
//!
//! # Example Flow
//!
//! ```text
//! visible ──> Behavior<bool> ──┐
//!                              ├──> combine2 ──> enabled ──> gate(clicks)
//! busy    ──> Behavior<bool> ──┘
//! ```
//!
//! Run with: `RUST_LOG=debug cargo run --example enabled_signal`

use std::sync::Arc;

use anyhow::Result;
use cim_frp::frp::combinators::{barrier, gate};
use cim_frp::frp::{Behavior, SignalGraph};
use cim_frp::lifecycle::{Connectable, Disposable};
use cim_frp::stream::{Scheduler, Subject, TokioScheduler};
use cim_frp::SchedulerConfig;
use futures::StreamExt;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    println!("=== Enabled Signal Example ===\n");

    // === Example 1: Derived signal ===
    let visible_events = Subject::new();
    let busy_events = Subject::new();

    let visible = Behavior::step(false, &visible_events.stream());
    let busy = Behavior::step(false, &busy_events.stream());
    let enabled = Behavior::combine2(&visible, &busy, |visible, busy| visible && !busy);

    println!("enabled at start: {}", enabled.value());
    visible_events.next(true);
    println!("after visible:    {}", enabled.value());
    busy_events.next(true);
    println!("after busy:       {}", enabled.value());
    busy_events.next(false);
    println!("after idle:       {}\n", enabled.value());

    // === Example 2: Gated clicks, delivered on a scheduler ===
    let scheduler: Arc<dyn Scheduler> =
        Arc::new(TokioScheduler::current(SchedulerConfig::new("ui"))?);

    let clicks = Subject::new();
    let mut accepted = gate(&clicks.stream(), &enabled)
        .observe_on(scheduler)
        .into_futures();

    clicks.next("first");
    busy_events.next(true);
    clicks.next("ignored while busy");
    busy_events.next(false);
    clicks.next("second");

    for _ in 0..2 {
        if let Some(click) = accepted.next().await {
            println!("accepted click: {}", click?);
        }
    }
    println!();

    // === Example 3: One sample per frame ===
    let samples = Subject::new();
    let frames = Subject::new();
    let per_frame = barrier(&samples.stream(), &frames.stream(), true);
    let latest = Behavior::step(0, &per_frame);
    let _printer = per_frame.subscribe_next(|v| println!("frame sample: {v}"));
    for frame in 0..3 {
        samples.next(frame * 10);
        samples.next(frame * 10 + 1);
        frames.next(());
    }
    println!("last frame sample: {}\n", latest.value());

    // === Example 4: Circular definitions ===
    let mut graph = SignalGraph::new();
    let celsius_ref = graph.declare::<Behavior<i32>>("celsius");

    let celsius_handle = celsius_ref.clone();
    let fahrenheit = graph.bind(32, move || Ok(celsius_handle.get()?.map(|c| c * 9 / 5 + 32)));
    let fahrenheit_source = fahrenheit.clone();
    let celsius = graph.bind(0, move || Ok(fahrenheit_source.map(|f| (f - 32) * 5 / 9)));
    celsius_ref.define(celsius.clone())?;

    let handle = graph.activate()?;
    info!(
        celsius = celsius.value(),
        fahrenheit = fahrenheit.value(),
        "Circular graph settled"
    );

    // === Example 5: Explicitly shared updates ===
    let (binding, shared) = enabled.go_hot();
    visible_events.next(false);
    println!("shared before connect: {}", shared.value());
    let connection = binding.connect()?;
    println!("shared after connect:  {}", shared.value());

    connection.dispose();
    handle.dispose();
    graph.release();

    Ok(())
}
