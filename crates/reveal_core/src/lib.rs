//! Reveal Core Runtime
//!
//! Foundational primitives shared by the reveal crates:
//!
//! - **Reactive Signals**: values that notify subscribers when they change
//! - **Effects**: callbacks that re-run whenever a signal they read changes
//! - **Batching**: coalesce several signal writes into one effect run
//!
//! # Example
//!
//! ```rust
//! use reveal_core::reactive::ReactiveGraph;
//! use std::sync::{Arc, Mutex};
//!
//! let mut graph = ReactiveGraph::new();
//! let active = graph.create_signal(false);
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let seen_clone = seen.clone();
//! let _effect = graph.create_effect(move |g| {
//!     seen_clone.lock().unwrap().push(g.get(active).unwrap_or(false));
//! });
//!
//! graph.set(active, true);
//! assert_eq!(*seen.lock().unwrap(), vec![false, true]);
//! ```

pub mod reactive;

pub use reactive::{Effect, EffectId, ReactiveGraph, ReactiveStats, Signal, SignalId};
