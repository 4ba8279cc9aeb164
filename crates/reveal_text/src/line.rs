//! Line animator
//!
//! Drives the units of one line. On mount every unit is spawned hidden; an
//! effect on the reactive graph then submits one command per unit whenever
//! the shared `active` flag, the char stagger, this line's delay, or the set
//! of driven units changes:
//!
//! ```text
//! delay(i) = char_delay.delay_for_index(i) + line_delay
//! target   = VISIBLE_OFFSET if active else HIDDEN_OFFSET
//! ```
//!
//! Commands are issued in index order; the delays alone decide the visual
//! sweep.

use crate::context::{LineBindings, LineContext};
use crate::engine::{MotionEngine, UnitMotion, HIDDEN_OFFSET, VISIBLE_OFFSET};
use crate::error::{Result, RevealError};
use crate::fragment::{RevealLine, Unit};
use crate::render::{LineView, UnitState, UnitView};
use crate::timing::{SpaceWidth, Stagger};
use crate::units::Length;
use reveal_animation::SpringConfig;
use reveal_core::{Effect, ReactiveGraph, Signal};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// One command submitted to a unit's motion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitCommand {
    pub index: usize,
    pub target: f32,
    pub delay_ms: u32,
}

/// Motions shared between the animator and its effect
struct UnitSlots<U> {
    motions: Vec<U>,
    /// Commands from the most recent submission
    last_commands: Vec<UnitCommand>,
    submissions: u64,
}

impl<U: UnitMotion> UnitSlots<U> {
    fn submit(&mut self, active: bool, char_delay: &Stagger, line_delay: u32) {
        let target = if active { VISIBLE_OFFSET } else { HIDDEN_OFFSET };

        self.last_commands.clear();
        for (index, motion) in self.motions.iter_mut().enumerate() {
            let delay_ms = char_delay.delay_for_index(index).saturating_add(line_delay);
            tracing::trace!("LineAnimator: unit {} -> {} after {}ms", index, target, delay_ms);
            motion.start(target, delay_ms);
            self.last_commands.push(UnitCommand {
                index,
                target,
                delay_ms,
            });
        }
        self.submissions += 1;
    }
}

fn lock<U>(slots: &Mutex<UnitSlots<U>>) -> MutexGuard<'_, UnitSlots<U>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Animates the units of one line
///
/// Created by [`TextReveal`](crate::TextReveal) for each grouped line. Must
/// be released with [`unmount`](Self::unmount) on the graph it was mounted on.
pub struct LineAnimator<E: MotionEngine> {
    line: RevealLine,
    context: LineContext,
    bindings: LineBindings,
    units: Vec<Unit>,
    slots: Arc<Mutex<UnitSlots<E::Unit>>>,
    /// Bumped whenever the set of driven units changes
    revision: Signal<u64>,
    effect: Effect,
    engine: E,
}

impl<E: MotionEngine> LineAnimator<E> {
    /// Split the line into units and start driving them
    ///
    /// Fails with [`RevealError::NotWrapped`] if `context` was not produced
    /// by a container; nothing is spawned in that case.
    pub fn mount(
        line: RevealLine,
        context: LineContext,
        graph: &mut ReactiveGraph,
        engine: E,
    ) -> Result<Self> {
        let bindings = context.bindings().ok_or(RevealError::NotWrapped)?;

        let units = line.content.units();
        let config = effective_spring(&line, &context);
        let motions = units
            .iter()
            .map(|_| engine.spawn(HIDDEN_OFFSET, config))
            .collect();

        let slots = Arc::new(Mutex::new(UnitSlots {
            motions,
            last_commands: Vec::new(),
            submissions: 0,
        }));

        let revision = graph.create_signal(0u64);
        let effect = {
            let slots = Arc::clone(&slots);
            graph.create_effect(move |g| {
                let active = g.get(bindings.active).unwrap_or(false);
                let char_delay = g.get(bindings.char_delay).unwrap_or_default();
                let line_delay = g.get(bindings.line_delay).unwrap_or(0);
                let _ = g.get(revision);

                lock(&slots).submit(active, &char_delay, line_delay);
            })
        };

        tracing::debug!("LineAnimator: mounted {} units", units.len());

        Ok(Self {
            line,
            context,
            bindings,
            units,
            slots,
            revision,
            effect,
            engine,
        })
    }

    /// Stop driving the units and release them
    pub fn unmount(self, graph: &mut ReactiveGraph) {
        graph.dispose_effect(self.effect);
        graph.dispose_signal(self.revision);
        tracing::debug!("LineAnimator: unmounted {} units", self.units.len());
    }

    pub fn line(&self) -> &RevealLine {
        &self.line
    }

    pub fn context(&self) -> &LineContext {
        &self.context
    }

    pub fn bindings(&self) -> LineBindings {
        self.bindings
    }

    /// The units in source order
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    /// The curve this line's units animate with
    pub fn spring_config(&self) -> SpringConfig {
        effective_spring(&self.line, &self.context)
    }

    /// Commands issued by the most recent submission
    pub fn last_commands(&self) -> Vec<UnitCommand> {
        lock(&self.slots).last_commands.clone()
    }

    /// How many times commands have been submitted to the units
    pub fn submissions(&self) -> u64 {
        lock(&self.slots).submissions
    }

    /// State of the unit at `index`
    pub fn unit_state(&self, index: usize) -> Option<UnitState> {
        lock(&self.slots).motions.get(index).map(state_of)
    }

    /// Current offset of the unit at `index`
    pub fn unit_offset(&self, index: usize) -> Option<f32> {
        lock(&self.slots).motions.get(index).map(|m| m.value())
    }

    /// Whether any unit is moving or waiting on a delay
    pub fn is_animating(&self) -> bool {
        lock(&self.slots).motions.iter().any(|m| m.is_animating())
    }

    /// Width for the unit at `index`, if it is whitespace
    ///
    /// The line's own width wins over the container default.
    pub fn unit_width(&self, index: usize) -> Option<Length> {
        let ch = self.units.get(index)?.as_whitespace()?;
        self.space_width().map(|width| width.resolve(ch))
    }

    fn space_width(&self) -> Option<&SpaceWidth> {
        self.line
            .space_width
            .as_ref()
            .or(self.context.space_width.as_ref())
    }

    /// Snapshot the line for rendering
    pub fn view(&self, index: usize) -> LineView {
        let slots = lock(&self.slots);
        let units = self
            .units
            .iter()
            .zip(slots.motions.iter())
            .enumerate()
            .map(|(i, (unit, motion))| UnitView {
                index: i,
                unit: unit.clone(),
                width: self.unit_width(i),
                offset: motion.value(),
                state: state_of(motion),
            })
            .collect();

        LineView { index, units }
    }

    /// Replace the line's content and overrides
    ///
    /// Units keep their motion by index. When the unit count changes, the
    /// added units are spawned hidden and every unit is resubmitted.
    pub fn replace_line(&mut self, line: RevealLine, graph: &mut ReactiveGraph) {
        let units = line.content.units();
        let previous_config = self.spring_config();
        self.line = line;
        let config = self.spring_config();

        let resized = {
            let mut slots = lock(&self.slots);
            let before = slots.motions.len();

            if config != previous_config {
                slots.motions.iter_mut().for_each(|m| m.reconfigure(config));
            }
            slots.motions.truncate(units.len());
            while slots.motions.len() < units.len() {
                let motion = self.engine.spawn(HIDDEN_OFFSET, config);
                slots.motions.push(motion);
            }
            before != units.len()
        };
        self.units = units;

        if resized {
            tracing::debug!("LineAnimator: resized to {} units", self.units.len());
            graph.update(self.revision, |r| r + 1);
        }
    }

    /// Change the container default curve
    ///
    /// Has no effect on a line with its own curve.
    pub fn set_context_spring_config(&mut self, config: Option<SpringConfig>) {
        let previous = self.spring_config();
        self.context.spring_config = config;
        let config = self.spring_config();

        if config != previous {
            lock(&self.slots)
                .motions
                .iter_mut()
                .for_each(|m| m.reconfigure(config));
        }
    }

    /// Change the container default whitespace width
    pub fn set_context_space_width(&mut self, width: Option<SpaceWidth>) {
        self.context.space_width = width;
    }

    /// Move the units onto another engine
    ///
    /// Each unit is respawned at its current offset and every unit is
    /// resubmitted. Nothing happens if `engine` is the current one.
    pub fn set_engine(&mut self, engine: E, graph: &mut ReactiveGraph) {
        if engine.same_engine(&self.engine) {
            return;
        }

        let config = self.spring_config();
        {
            let mut slots = lock(&self.slots);
            let motions = slots
                .motions
                .iter()
                .map(|m| engine.spawn(m.value(), config))
                .collect();
            slots.motions = motions;
        }
        self.engine = engine;

        tracing::debug!("LineAnimator: moved {} units to a new engine", self.units.len());
        graph.update(self.revision, |r| r + 1);
    }
}

fn effective_spring(line: &RevealLine, context: &LineContext) -> SpringConfig {
    line.spring_config
        .or(context.spring_config)
        .unwrap_or_default()
}

fn state_of<U: UnitMotion>(motion: &U) -> UnitState {
    let visible = (motion.target() - VISIBLE_OFFSET).abs() < f32::EPSILON;
    match (visible, motion.is_animating()) {
        (true, true) => UnitState::AnimatingToVisible,
        (true, false) => UnitState::Visible,
        (false, true) => UnitState::AnimatingToHidden,
        (false, false) => UnitState::Hidden,
    }
}
