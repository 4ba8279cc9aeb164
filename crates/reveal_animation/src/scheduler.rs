//! Animation scheduler
//!
//! Owns every registered spring and steps them each frame. Springs are
//! registered implicitly through [`AnimatedValue`], which holds a weak
//! [`SchedulerHandle`] so a dropped scheduler turns every operation into a
//! no-op instead of keeping the springs alive.
//!
//! Frames can be driven three ways:
//! - [`AnimationScheduler::tick`] - wall-clock delta since the last frame
//! - [`AnimationScheduler::advance`] - an explicit delta (deterministic)
//! - [`AnimationScheduler::start_background`] - a dedicated frame thread

use crate::spring::{Spring, SpringConfig};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered spring animation
    pub struct SpringId;
}

/// Internal state of the animation scheduler
struct SchedulerInner {
    springs: SlotMap<SpringId, Spring>,
    last_frame: Instant,
    target_fps: u32,
}

/// Longest step a single frame may integrate, in seconds
const MAX_FRAME_DT: f32 = 1.0 / 30.0;

impl SchedulerInner {
    /// Step every spring by `dt` seconds, returning whether any is still moving
    ///
    /// `dt` is clamped to [`MAX_FRAME_DT`]; a stalled frame slows the
    /// animation down instead of destabilizing it.
    fn step_all(&mut self, dt: f32) -> bool {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        for (_, spring) in self.springs.iter_mut() {
            spring.step(dt);
        }
        self.has_active()
    }

    fn has_active(&self) -> bool {
        self.springs.iter().any(|(_, s)| !s.is_settled())
    }

    /// Modify a spring, restarting the frame clock if the scheduler was idle
    ///
    /// Time spent idle must not reach the first frame after new motion.
    fn retarget<F>(&mut self, id: SpringId, f: F)
    where
        F: FnOnce(&mut Spring),
    {
        let was_idle = !self.has_active();
        if let Some(spring) = self.springs.get_mut(id) {
            f(spring);
            if was_idle {
                self.last_frame = Instant::now();
            }
        }
    }
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Callback type for waking up the main thread from the animation thread
///
/// Called after each background frame in which a spring is still moving.
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The animation scheduler that ticks all registered springs
///
/// Held by the host and shared with components via [`SchedulerHandle`].
///
/// # Background Thread Mode
///
/// ```ignore
/// let mut scheduler = AnimationScheduler::new();
/// scheduler.set_wake_callback(move || proxy.wake());
/// scheduler.start_background(); // steps springs at the target fps
/// ```
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread when springs moved; cleared by the host
    needs_redraw: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
    wake_callback: Option<WakeCallback>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                springs: SlotMap::with_key(),
                last_frame: Instant::now(),
                target_fps: 120,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a callback invoked from the background thread while springs move
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start stepping springs on a background thread at the target fps
    ///
    /// The thread sets the `needs_redraw` flag whenever a spring is still
    /// moving; the host checks it with [`take_needs_redraw`](Self::take_needs_redraw).
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return;
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();
        let fps = lock(&self.inner).target_fps.max(1);

        tracing::debug!("AnimationScheduler: starting background thread at {} fps", fps);

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / fps as u64);

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let has_active = {
                    let mut inner = lock(&inner);
                    let now = Instant::now();
                    let dt = (now - inner.last_frame).as_secs_f32();
                    inner.last_frame = now;
                    inner.step_all(dt)
                };

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            if handle.join().is_err() {
                tracing::warn!("AnimationScheduler: background thread panicked");
            }
            tracing::debug!("AnimationScheduler: background thread stopped");
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Get a handle to this scheduler for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        lock(&self.inner).target_fps = fps;
    }

    /// Tick all springs by the wall-clock time since the previous frame
    ///
    /// Returns true if any spring is still moving (needs another tick).
    pub fn tick(&self) -> bool {
        let mut inner = lock(&self.inner);
        let now = Instant::now();
        let dt = (now - inner.last_frame).as_secs_f32();
        inner.last_frame = now;
        inner.step_all(dt)
    }

    /// Step all springs by exactly `dt` seconds
    ///
    /// Returns true if any spring is still moving.
    pub fn advance(&self, dt: f32) -> bool {
        let mut inner = lock(&self.inner);
        inner.last_frame = Instant::now();
        inner.step_all(dt)
    }

    /// Check if any spring is still moving or waiting on a delay
    pub fn has_active_animations(&self) -> bool {
        lock(&self.inner).has_active()
    }

    /// Get the number of registered springs
    pub fn spring_count(&self) -> usize {
        lock(&self.inner).springs.len()
    }

    // =========================================================================
    // Direct Spring Access
    // =========================================================================

    pub fn add_spring(&self, spring: Spring) -> SpringId {
        lock(&self.inner).springs.insert(spring)
    }

    pub fn get_spring(&self, id: SpringId) -> Option<Spring> {
        lock(&self.inner).springs.get(id).copied()
    }

    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        lock(&self.inner).springs.get(id).map(|s| s.value())
    }

    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        lock(&self.inner).retarget(id, |spring| spring.set_target(target));
    }

    pub fn remove_spring(&self, id: SpringId) -> Option<Spring> {
        lock(&self.inner).springs.remove(id)
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop_background();
    }
}

/// A weak handle to the animation scheduler
///
/// Passed to components that need to register springs. It won't keep the
/// scheduler alive; once the scheduler is dropped every call is a no-op.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    /// Register a spring and return its ID
    pub fn register_spring(&self, spring: Spring) -> Option<SpringId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = lock(&inner);
            // Prevent a huge dt on the first wall-clock tick after registering
            guard.last_frame = Instant::now();
            guard.springs.insert(spring)
        })
    }

    /// Retarget a spring immediately
    pub fn set_spring_target(&self, id: SpringId, target: f32) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).retarget(id, |spring| spring.set_target(target));
        }
    }

    /// Retarget a spring once `delay_ms` has elapsed, replacing any pending target
    pub fn set_spring_target_after(&self, id: SpringId, target: f32, delay_ms: u32) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).retarget(id, |spring| spring.set_target_after(target, delay_ms));
        }
    }

    /// Swap a spring's curve without interrupting it
    pub fn set_spring_config(&self, id: SpringId, config: SpringConfig) {
        if let Some(inner) = self.inner.upgrade() {
            if let Some(spring) = lock(&inner).springs.get_mut(id) {
                spring.set_config(config);
            }
        }
    }

    /// Get current spring value
    pub fn get_spring_value(&self, id: SpringId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).springs.get(id).map(|s| s.value()))
    }

    /// Check if a spring has settled (at rest at its final target)
    ///
    /// A spring that no longer exists counts as settled.
    pub fn is_spring_settled(&self, id: SpringId) -> bool {
        self.inner
            .upgrade()
            .and_then(|inner| lock(&inner).springs.get(id).map(|s| s.is_settled()))
            .unwrap_or(true)
    }

    /// Remove a spring
    pub fn remove_spring(&self, id: SpringId) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).springs.remove(id);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Check whether two handles point at the same scheduler
    pub fn same_scheduler(&self, other: &SchedulerHandle) -> bool {
        self.inner.ptr_eq(&other.inner)
    }
}

// ============================================================================
// Animated Value (Spring-based)
// ============================================================================

/// An animated value that registers a spring with the scheduler on demand
///
/// The spring is only registered once the value first needs to move, and is
/// removed again when the value is dropped.
///
/// # Example
///
/// ```ignore
/// let mut offset = AnimatedValue::new(scheduler.handle(), 100.0, SpringConfig::default());
///
/// // Lift into view after 35ms
/// offset.set_target_after(0.0, 35);
///
/// // Sample while the scheduler ticks
/// let current = offset.get();
/// ```
pub struct AnimatedValue {
    handle: SchedulerHandle,
    spring_id: Option<SpringId>,
    config: SpringConfig,
    /// Value before a spring was registered
    current: f32,
    /// The value we are ultimately animating toward
    target: f32,
}

impl AnimatedValue {
    /// Create a new animated value resting at `initial`
    pub fn new(handle: SchedulerHandle, initial: f32, config: SpringConfig) -> Self {
        Self {
            handle,
            spring_id: None,
            config,
            current: initial,
            target: initial,
        }
    }

    /// Set the target value - starts animating immediately
    pub fn set_target(&mut self, target: f32) {
        self.set_target_after(target, 0);
    }

    /// Set the target value, starting the animation after `delay_ms`
    ///
    /// Replaces any target still waiting on its delay.
    pub fn set_target_after(&mut self, target: f32, delay_ms: u32) {
        self.target = target;

        if let Some(id) = self.spring_id {
            self.handle.set_spring_target_after(id, target, delay_ms);
        } else if (target - self.current).abs() > 0.001 {
            let spring = Spring::new(self.config, self.current);
            if let Some(id) = self.handle.register_spring(spring) {
                self.spring_id = Some(id);
                self.handle.set_spring_target_after(id, target, delay_ms);
            }
        }
    }

    /// Get the current animated value
    pub fn get(&self) -> f32 {
        match self.spring_id {
            Some(id) => self.handle.get_spring_value(id).unwrap_or(self.target),
            None => self.current,
        }
    }

    /// Check if currently animating (moving or waiting on a delay)
    pub fn is_animating(&self) -> bool {
        match self.spring_id {
            Some(id) => !self.handle.is_spring_settled(id),
            None => false,
        }
    }

    /// Get the final target value
    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Change the spring curve; an in-flight animation continues on the new one
    pub fn set_config(&mut self, config: SpringConfig) {
        self.config = config;
        if let Some(id) = self.spring_id {
            self.handle.set_spring_config(id, config);
        }
    }
}

impl Drop for AnimatedValue {
    fn drop(&mut self) {
        if let Some(id) = self.spring_id {
            self.handle.remove_spring(id);
        }
    }
}
