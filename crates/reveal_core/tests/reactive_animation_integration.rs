//! Integration tests for reactive signals driving spring animations
//!
//! These tests verify that:
//! - Effects can retarget springs held by the scheduler
//! - Delayed targets issued from effects supersede each other
//! - Batched writes retarget once

use reveal_animation::{AnimatedValue, AnimationScheduler, SpringConfig};
use reveal_core::ReactiveGraph;
use std::sync::{Arc, Mutex};

const FRAME: f32 = 1.0 / 60.0;

/// Test that an effect syncs a boolean signal to a spring target
#[test]
fn test_effect_drives_animated_value() {
    let scheduler = AnimationScheduler::new();
    let mut graph = ReactiveGraph::new();

    let active = graph.create_signal(false);
    let offset = Arc::new(Mutex::new(AnimatedValue::new(
        scheduler.handle(),
        100.0,
        SpringConfig::stiff(),
    )));

    let offset_clone = offset.clone();
    let _effect = graph.create_effect(move |g| {
        let target = if g.get(active).unwrap_or(false) { 0.0 } else { 100.0 };
        offset_clone.lock().unwrap().set_target(target);
    });

    // Inactive on mount: nothing to animate
    assert!(!offset.lock().unwrap().is_animating());

    graph.set(active, true);
    assert!(offset.lock().unwrap().is_animating());

    while scheduler.advance(FRAME) {}
    assert_eq!(offset.lock().unwrap().get(), 0.0);
}

/// Test that a delayed target from a later effect run replaces a pending one
#[test]
fn test_delayed_targets_supersede() {
    let scheduler = AnimationScheduler::new();
    let mut graph = ReactiveGraph::new();

    let active = graph.create_signal(false);
    let offset = Arc::new(Mutex::new(AnimatedValue::new(
        scheduler.handle(),
        100.0,
        SpringConfig::default(),
    )));

    let offset_clone = offset.clone();
    let _effect = graph.create_effect(move |g| {
        let target = if g.get(active).unwrap_or(false) { 0.0 } else { 100.0 };
        offset_clone.lock().unwrap().set_target_after(target, 200);
    });

    graph.set(active, true);
    scheduler.advance(FRAME);
    graph.set(active, false);

    // The reveal was cancelled before its delay ran out
    for _ in 0..60 {
        scheduler.advance(FRAME);
    }
    let value = offset.lock().unwrap();
    assert_eq!(value.get(), 100.0);
    assert!(!value.is_animating());
}

/// Test that batched signal writes retarget a spring once
#[test]
fn test_batched_writes_retarget_once() {
    let scheduler = AnimationScheduler::new();
    let mut graph = ReactiveGraph::new();

    let active = graph.create_signal(false);
    let delay = graph.create_signal(0u32);
    let runs = Arc::new(Mutex::new(0));
    let offset = Arc::new(Mutex::new(AnimatedValue::new(
        scheduler.handle(),
        100.0,
        SpringConfig::default(),
    )));

    let runs_clone = runs.clone();
    let offset_clone = offset.clone();
    let _effect = graph.create_effect(move |g| {
        let target = if g.get(active).unwrap_or(false) { 0.0 } else { 100.0 };
        let delay = g.get(delay).unwrap_or(0);
        offset_clone.lock().unwrap().set_target_after(target, delay);
        *runs_clone.lock().unwrap() += 1;
    });

    graph.batch(|g| {
        g.set(active, true);
        g.set(delay, 50);
    });

    assert_eq!(*runs.lock().unwrap(), 2);
    assert_eq!(offset.lock().unwrap().target(), 0.0);
    assert_eq!(scheduler.spring_count(), 1);
}
