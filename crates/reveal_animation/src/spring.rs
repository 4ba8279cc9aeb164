//! Spring physics animation
//!
//! RK4-integrated spring physics for smooth, natural animations.
//! A spring can be retargeted immediately or after a delay; the delayed
//! target is held as pending until the delay elapses, and any newer target
//! replaces it.

use serde::{Deserialize, Serialize};

/// Configuration for a spring animation
///
/// Deserializing rejects a non-positive stiffness or mass and a negative
/// damping; springs built in code are not checked.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSpringConfig")]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

/// Unvalidated spring parameters as written in configuration
#[derive(Deserialize)]
struct RawSpringConfig {
    stiffness: f32,
    damping: f32,
    #[serde(default = "default_mass")]
    mass: f32,
}

fn default_mass() -> f32 {
    1.0
}

impl TryFrom<RawSpringConfig> for SpringConfig {
    type Error = String;

    fn try_from(raw: RawSpringConfig) -> Result<Self, Self::Error> {
        if !(raw.stiffness.is_finite() && raw.stiffness > 0.0) {
            return Err(format!("spring stiffness must be positive, got {}", raw.stiffness));
        }
        if !(raw.damping.is_finite() && raw.damping >= 0.0) {
            return Err(format!("spring damping must not be negative, got {}", raw.damping));
        }
        if !(raw.mass.is_finite() && raw.mass > 0.0) {
            return Err(format!("spring mass must be positive, got {}", raw.mass));
        }
        Ok(SpringConfig::new(raw.stiffness, raw.damping, raw.mass))
    }
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Balanced spring with a barely visible overshoot (the default)
    pub fn standard() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            mass: 1.0,
        }
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self {
            stiffness: 120.0,
            damping: 14.0,
            mass: 1.0,
        }
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self {
            stiffness: 180.0,
            damping: 12.0,
            mass: 1.0,
        }
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self {
            stiffness: 400.0,
            damping: 30.0,
            mass: 1.0,
        }
    }

    /// A very stiff spring with minimal oscillation (good for quick responses)
    pub fn snappy() -> Self {
        Self {
            stiffness: 600.0,
            damping: 40.0,
            mass: 1.0,
        }
    }

    /// A slow spring with no overshoot (critically damped)
    pub fn molasses() -> Self {
        Self {
            stiffness: 100.0,
            damping: 20.0,
            mass: 1.0,
        }
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<SpringPreset> for SpringConfig {
    fn from(preset: SpringPreset) -> Self {
        preset.config()
    }
}

/// Named spring curves, as written in configuration files
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpringPreset {
    #[default]
    Standard,
    Gentle,
    Wobbly,
    Stiff,
    Snappy,
    Molasses,
}

impl SpringPreset {
    pub fn config(self) -> SpringConfig {
        match self {
            SpringPreset::Standard => SpringConfig::standard(),
            SpringPreset::Gentle => SpringConfig::gentle(),
            SpringPreset::Wobbly => SpringConfig::wobbly(),
            SpringPreset::Stiff => SpringConfig::stiff(),
            SpringPreset::Snappy => SpringConfig::snappy(),
            SpringPreset::Molasses => SpringConfig::molasses(),
        }
    }
}

/// A target waiting for its start delay to elapse
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingTarget {
    target: f32,
    remaining_ms: f32,
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
    pending: Option<PendingTarget>,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
            pending: None,
        }
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Swap the curve, keeping position and velocity
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// The target the spring is currently pulled toward
    pub fn target(&self) -> f32 {
        self.target
    }

    /// The target the spring will end at once any pending delay elapses
    pub fn final_target(&self) -> f32 {
        self.pending.map_or(self.target, |p| p.target)
    }

    /// Remaining delay before the pending target takes effect
    pub fn pending_delay_ms(&self) -> Option<f32> {
        self.pending.map(|p| p.remaining_ms)
    }

    /// Retarget immediately, discarding any pending target
    pub fn set_target(&mut self, target: f32) {
        self.pending = None;
        self.target = target;
    }

    /// Retarget once `delay_ms` has elapsed
    ///
    /// Until then the spring keeps moving toward its current target.
    /// Replaces any previously pending target. Re-issuing the target the
    /// spring is already heading for, with nothing pending, changes nothing.
    pub fn set_target_after(&mut self, target: f32, delay_ms: u32) {
        if self.pending.is_none() && target == self.target {
            return;
        }
        if delay_ms == 0 {
            self.set_target(target);
            return;
        }
        self.pending = Some(PendingTarget {
            target,
            remaining_ms: delay_ms as f32,
        });
    }

    /// Check if the spring has settled (nothing pending, at target, at rest)
    pub fn is_settled(&self) -> bool {
        self.pending.is_none() && self.is_at_rest()
    }

    fn is_at_rest(&self) -> bool {
        // Offsets are percentages of a glyph's height: half a percent and
        // 5%/s are imperceptible
        const EPSILON: f32 = 0.5;
        const VELOCITY_EPSILON: f32 = 5.0;

        (self.value - self.target).abs() < EPSILON && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Step the spring simulation using RK4 integration
    ///
    /// A pending target that comes due inside this step only drives the
    /// part of `dt` left after its delay ran out.
    pub fn step(&mut self, dt: f32) {
        let mut dt = dt;
        if let Some(pending) = self.pending.as_mut() {
            pending.remaining_ms -= dt * 1000.0;
            if pending.remaining_ms <= 0.0 {
                dt = (-pending.remaining_ms / 1000.0).min(dt);
                self.target = pending.target;
                self.pending = None;
            }
        }

        if self.is_at_rest() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn test_spring_settles_to_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target(0.0);

        // Simulate for 2 seconds at 60fps
        for _ in 0..120 {
            spring.step(FRAME);
        }

        assert!(spring.is_settled());
        assert!(spring.value().abs() < 0.01);
    }

    #[test]
    fn test_standard_spring_settles() {
        let mut spring = Spring::new(SpringConfig::default(), 100.0);
        spring.set_target(0.0);

        for _ in 0..120 {
            spring.step(FRAME);
        }

        assert!(spring.is_settled());
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 100.0);
        spring.set_target(0.0);

        for _ in 0..10 {
            spring.step(FRAME);
        }

        let velocity = spring.velocity();
        assert!(velocity < 0.0);

        // Change target mid-flight - velocity should continue
        spring.set_target(100.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_delayed_target_waits() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target_after(0.0, 200);

        assert!(!spring.is_settled());
        assert_eq!(spring.target(), 100.0);
        assert_eq!(spring.final_target(), 0.0);

        // ~183ms: still waiting
        for _ in 0..11 {
            spring.step(FRAME);
        }
        assert_eq!(spring.value(), 100.0);
        assert!(spring.pending_delay_ms().is_some());

        // ~216ms: target applied and spring moving
        for _ in 0..2 {
            spring.step(FRAME);
        }
        assert_eq!(spring.target(), 0.0);
        assert!(spring.pending_delay_ms().is_none());
        assert!(spring.value() < 100.0);
    }

    #[test]
    fn test_delay_ending_mid_frame_integrates_remainder() {
        let mut delayed = Spring::new(SpringConfig::stiff(), 100.0);
        delayed.set_target_after(0.0, 10);
        delayed.step(FRAME);

        // Same motion as a spring released 10ms into the frame
        let mut released = Spring::new(SpringConfig::stiff(), 100.0);
        released.set_target(0.0);
        released.step(FRAME - 0.010);

        assert!((delayed.value() - released.value()).abs() < 1e-3);
        assert!((delayed.velocity() - released.velocity()).abs() < 1e-2);
    }

    #[test]
    fn test_newer_target_supersedes_pending() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target_after(0.0, 500);
        spring.set_target_after(100.0, 50);

        assert_eq!(spring.final_target(), 100.0);

        for _ in 0..60 {
            spring.step(FRAME);
        }

        // The superseded target never took effect
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_immediate_target_clears_pending() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target_after(0.0, 300);
        spring.set_target(100.0);

        assert!(spring.pending_delay_ms().is_none());
        assert!(spring.is_settled());
    }

    #[test]
    fn test_reissued_target_is_noop() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target_after(0.0, 300);

        assert!(spring.pending_delay_ms().is_none());
        assert!(spring.is_settled());
    }

    #[test]
    fn test_reissued_target_cancels_pending() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target_after(0.0, 300);
        spring.set_target_after(100.0, 50);

        for _ in 0..30 {
            spring.step(FRAME);
        }
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 100.0);
    }

    #[test]
    fn test_set_config_keeps_motion() {
        let mut spring = Spring::new(SpringConfig::gentle(), 100.0);
        spring.set_target(0.0);
        for _ in 0..5 {
            spring.step(FRAME);
        }
        let (value, velocity) = (spring.value(), spring.velocity());

        spring.set_config(SpringConfig::snappy());
        assert_eq!(spring.config(), SpringConfig::snappy());
        assert_eq!(spring.value(), value);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_zero_delay_is_immediate() {
        let mut spring = Spring::new(SpringConfig::stiff(), 100.0);
        spring.set_target_after(0.0, 0);

        assert_eq!(spring.target(), 0.0);
        assert!(spring.pending_delay_ms().is_none());
    }

    #[test]
    fn test_spring_presets() {
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::gentle().is_underdamped());
        assert!(SpringConfig::stiff().is_underdamped());
        assert!(SpringConfig::standard().is_underdamped());

        assert_eq!(SpringPreset::Stiff.config(), SpringConfig::stiff());
        assert_eq!(SpringConfig::from(SpringPreset::default()), SpringConfig::default());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let raw = |stiffness, damping, mass| RawSpringConfig {
            stiffness,
            damping,
            mass,
        };

        assert_eq!(
            SpringConfig::try_from(raw(300.0, 20.0, 1.0)),
            Ok(SpringConfig::new(300.0, 20.0, 1.0))
        );
        assert!(SpringConfig::try_from(raw(300.0, 20.0, 0.0)).is_err());
        assert!(SpringConfig::try_from(raw(-1.0, 20.0, 1.0)).is_err());
        assert!(SpringConfig::try_from(raw(300.0, -5.0, 1.0)).is_err());
        assert!(SpringConfig::try_from(raw(f32::NAN, 20.0, 1.0)).is_err());
    }

    #[test]
    fn test_spring_rk4_stability() {
        // Large time steps must not blow up
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(1000.0);

        for _ in 0..100 {
            spring.step(0.1);
            assert!(spring.value() < 2000.0);
            assert!(spring.value() > -500.0);
        }
    }
}
