// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module
//!
//! Laws of the stream combinators and of behaviors, checked against plain
//! iterator models.

mod behavior_laws;
mod combinator_laws;
