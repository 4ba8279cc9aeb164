//! Reveal Animation Engine
//!
//! Spring physics and the frame scheduler that drives them.
//!
//! # Features
//!
//! - **Spring Physics**: RK4-integrated springs with stiffness, damping, mass
//! - **Delayed Targets**: a target can be scheduled to take effect after a delay;
//!   a newer target always supersedes a pending one
//! - **Presets**: named curves selectable from configuration
//! - **Scheduler**: steps every registered spring per frame, either on demand
//!   or on its own background thread
//! - **Interruptible**: springs keep their velocity when retargeted mid-flight

pub mod scheduler;
pub mod spring;

pub use scheduler::{AnimatedValue, AnimationScheduler, SchedulerHandle, SpringId, WakeCallback};
pub use spring::{Spring, SpringConfig, SpringPreset};
