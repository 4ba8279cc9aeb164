//! Motion engine seam
//!
//! Line animators never interpolate anything themselves. They spawn one
//! [`UnitMotion`] per unit from a [`MotionEngine`] and issue it targets; the
//! engine owns the animated offset. The spring scheduler from
//! `reveal_animation` is the stock engine.

use reveal_animation::{AnimatedValue, SchedulerHandle, SpringConfig};

/// Vertical offset of a hidden unit, as a percentage of its own height
pub const HIDDEN_OFFSET: f32 = 100.0;

/// Vertical offset of a fully visible unit
pub const VISIBLE_OFFSET: f32 = 0.0;

/// Something that can animate one scalar per unit
pub trait MotionEngine: Clone + Send + Sync + 'static {
    type Unit: UnitMotion;

    /// Create a motion resting at `initial`
    fn spawn(&self, initial: f32, config: SpringConfig) -> Self::Unit;

    /// Whether both values drive the same underlying engine
    fn same_engine(&self, other: &Self) -> bool;
}

/// One unit's animated offset
pub trait UnitMotion: Send + 'static {
    /// Move toward `target` once `delay_ms` has elapsed
    ///
    /// Supersedes any target still waiting on its delay.
    fn start(&mut self, target: f32, delay_ms: u32);

    /// Change the curve used for this and later moves
    fn reconfigure(&mut self, config: SpringConfig);

    /// Current offset
    fn value(&self) -> f32;

    /// Final target of the most recent command
    fn target(&self) -> f32;

    /// Moving, or waiting on a delay
    fn is_animating(&self) -> bool;
}

impl MotionEngine for SchedulerHandle {
    type Unit = AnimatedValue;

    fn spawn(&self, initial: f32, config: SpringConfig) -> AnimatedValue {
        AnimatedValue::new(self.clone(), initial, config)
    }

    fn same_engine(&self, other: &Self) -> bool {
        self.same_scheduler(other)
    }
}

impl UnitMotion for AnimatedValue {
    fn start(&mut self, target: f32, delay_ms: u32) {
        self.set_target_after(target, delay_ms);
    }

    fn reconfigure(&mut self, config: SpringConfig) {
        self.set_config(config);
    }

    fn value(&self) -> f32 {
        self.get()
    }

    fn target(&self) -> f32 {
        AnimatedValue::target(self)
    }

    fn is_animating(&self) -> bool {
        AnimatedValue::is_animating(self)
    }
}
