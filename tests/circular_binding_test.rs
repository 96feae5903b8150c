// Copyright (c) 2025 - Cowboy AI, Inc.
//! Circular signal definition tests

mod fixtures;

use cim_frp::frp::{Behavior, Forward, SignalGraph};
use cim_frp::lifecycle::{CompositeConnectable, Connectable, Disposable};
use cim_frp::stream::Subject;
use cim_frp::FrpError;
use fixtures::{init_logging, Recorder};
use pretty_assertions::assert_eq;

/// User Story: Mutually recursive signals
///
/// As an application developer
/// I want two signals to be defined in terms of each other
/// So that I can express two-way relationships without manual wiring
///
/// ```mermaid
/// graph LR
///     X[X = Y + 1] -->|resolved on connect| Y
///     Y[Y = X + 1] -->|resolved on connect| X
/// ```
///
/// Acceptance Criteria:
/// - Both signals can be constructed without resolving either
/// - Activating both bindings does not recurse
/// - Both hold their initial values until an update arrives
#[test]
fn test_circular_binding_settles_without_recursion() {
    init_logging();

    // Given X defined through a forward reference to Y
    let y_ref: Forward<Behavior<i32>> = Forward::new("y");
    let y_handle = y_ref.clone();
    let (x, x_binding) = Behavior::lazily_bound(0, move || Ok(y_handle.get()?.map(|v| v + 1)));

    // And Y defined directly in terms of X
    let x_source = x.clone();
    let (y, y_binding) = Behavior::lazily_bound(0, move || Ok(x_source.map(|v| v + 1)));
    y_ref.define(y.clone()).unwrap();

    let x_updates = Recorder::attach(&x.updates());
    let y_updates = Recorder::attach(&y.updates());

    // When both bindings are activated
    let handle = CompositeConnectable::new()
        .with(x_binding)
        .with(y_binding)
        .connect()
        .unwrap();

    // Then activation is steady: nothing propagates and both keep 0
    assert_eq!((x.value(), y.value()), (0, 0));
    assert_eq!(x_updates.len(), 0);
    assert_eq!(y_updates.len(), 0);

    handle.dispose();
    y_ref.release();
}

/// Acceptance Criteria:
/// - Resolving a forward reference before it is defined fails with `Undefined`
/// - Nothing is connected by a graph with undefined references
#[test]
fn test_undefined_forward_reference_fails_activation() {
    init_logging();

    let mut graph = SignalGraph::new();
    let missing = graph.declare::<Behavior<i32>>("missing");

    let reference = missing.clone();
    let _bound = graph.bind(0, move || reference.get());

    assert!(matches!(graph.activate(), Err(FrpError::Undefined(name)) if name == "missing"));
    assert_eq!(graph.undefined(), vec!["missing".to_string()]);
}

/// Acceptance Criteria:
/// - A signal may be bound to one declared later in the graph
/// - Each external update is handled once per signal
#[test]
fn test_forward_reference_graph_propagates_external_input() {
    init_logging();

    // Given fahrenheit bound to celsius before celsius exists, where
    // celsius follows user input
    let input = Subject::new();
    let typed = Behavior::step(0, &input.stream());

    let mut graph = SignalGraph::new();
    let celsius_ref = graph.declare::<Behavior<i32>>("celsius");

    let celsius_handle = celsius_ref.clone();
    let fahrenheit = graph.bind(32, move || Ok(celsius_handle.get()?.map(|c| c * 9 / 5 + 32)));

    let typed_source = typed.clone();
    let celsius = graph.bind(0, move || Ok(typed_source.clone()));
    celsius_ref.define(celsius.clone()).unwrap();

    let fahrenheit_updates = Recorder::attach(&fahrenheit.updates());

    // When the graph is activated and the user types 100
    let handle = graph.activate().unwrap();
    input.next(100);

    // Then fahrenheit follows exactly once
    assert_eq!(celsius.value(), 100);
    assert_eq!(fahrenheit.value(), 212);
    assert_eq!(fahrenheit_updates.values(), vec![212]);

    // And after disposal nothing follows any more
    handle.dispose();
    input.next(0);
    assert_eq!(celsius.value(), 100);

    graph.release();
    assert_eq!(graph.undefined(), vec!["celsius".to_string()]);
}

/// Acceptance Criteria:
/// - Feedback through a cycle is bounded by the functions in it
/// - Delivery is queued, not recursive, so long chains do not overflow
#[test]
fn test_cycle_feedback_is_queued_not_recursive() {
    init_logging();

    // Given X = Y + 1 while Y < LIMIT, and Y = max(X, kick)
    const LIMIT: i32 = 10_000;
    let kick = Subject::new();

    let y_ref: Forward<Behavior<i32>> = Forward::new("y");
    let y_handle = y_ref.clone();
    let (x, x_binding) = Behavior::lazily_bound(0, move || {
        let below_limit = y_handle.get()?.updates().filter(|v| *v < LIMIT);
        Ok(Behavior::step(0, &below_limit.map(|v| v + 1)))
    });

    let kicked = Behavior::step(0, &kick.stream());
    let x_source = x.clone();
    let y_input = Behavior::combine2(&x_source, &kicked, |x, k| x.max(k));
    let (y, y_binding) = Behavior::lazily_bound(0, move || Ok(y_input.clone()));
    y_ref.define(y.clone()).unwrap();

    let _handle = CompositeConnectable::new()
        .with(x_binding)
        .with(y_binding)
        .connect()
        .unwrap();

    // When the cycle is kicked
    kick.next(1);

    // Then it counts up to the limit and stops
    assert_eq!(x.value(), LIMIT);
    assert_eq!(y.value(), LIMIT);

    y_ref.release();
}
