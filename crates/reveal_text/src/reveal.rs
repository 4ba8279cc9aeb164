//! The text reveal container
//!
//! Groups its children into lines, hands each line a context with its own
//! line delay, and owns the reactive graph the line animators subscribe to.
//!
//! ```ignore
//! let scheduler = AnimationScheduler::new();
//!
//! let mut reveal = text_reveal()
//!     .child(line("Hello World"))
//!     .child(line("Salt Pepper"))
//!     .mount(scheduler.handle())?;
//!
//! reveal.set_active(true);
//! while scheduler.advance(1.0 / 60.0) {
//!     paint(&reveal.view());
//! }
//! ```

use crate::config::RevealConfig;
use crate::context::{LineBindings, LineContext};
use crate::engine::MotionEngine;
use crate::error::Result;
use crate::fragment::{Fragment, RevealLine};
use crate::group::group_lines;
use crate::line::LineAnimator;
use crate::render::RevealView;
use crate::timing::{SpaceWidth, Stagger};
use crate::units::Length;
use reveal_animation::{SchedulerHandle, SpringConfig};
use reveal_core::{ReactiveGraph, Signal};

/// Builder for a [`TextReveal`]
pub struct TextRevealBuilder {
    active: bool,
    char_delay: Stagger,
    line_delay: Stagger,
    spring_config: Option<SpringConfig>,
    space_width: Option<SpaceWidth>,
    class_name: Option<String>,
    children: Vec<Fragment>,
}

/// Start building a text reveal
pub fn text_reveal() -> TextRevealBuilder {
    TextRevealBuilder::new()
}

impl TextRevealBuilder {
    pub fn new() -> Self {
        Self {
            active: false,
            char_delay: Stagger::Fixed(35),
            line_delay: Stagger::Fixed(100),
            spring_config: None,
            space_width: Some(SpaceWidth::Fixed(Length::default())),
            class_name: None,
            children: Vec::new(),
        }
    }

    /// Apply every option from a config
    pub fn config(mut self, config: &RevealConfig) -> Self {
        self.active = config.active;
        self.char_delay = Stagger::Fixed(config.char_delay_ms);
        self.line_delay = Stagger::Fixed(config.line_delay_ms);
        self.spring_config = config.spring_config();
        self.space_width = config.space_width.map(SpaceWidth::Fixed);
        self.class_name = config.class_name.clone();
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn char_delay(mut self, delay: impl Into<Stagger>) -> Self {
        self.char_delay = delay.into();
        self
    }

    pub fn line_delay(mut self, delay: impl Into<Stagger>) -> Self {
        self.line_delay = delay.into();
        self
    }

    pub fn spring_config(mut self, config: SpringConfig) -> Self {
        self.spring_config = Some(config);
        self
    }

    /// Whitespace width; `None` leaves whitespace at its natural width
    pub fn space_width(mut self, width: Option<SpaceWidth>) -> Self {
        self.space_width = width;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn child(mut self, child: impl Into<Fragment>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Fragment>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Group the children and start animating on `engine`
    pub fn mount<E: MotionEngine>(self, engine: E) -> Result<TextReveal<E>> {
        let mut graph = ReactiveGraph::new();
        let active = graph.create_signal(self.active);
        let char_delay = graph.create_signal(self.char_delay);

        let mut reveal = TextReveal {
            graph,
            engine,
            active,
            char_delay,
            line_delay: self.line_delay,
            spring_config: self.spring_config,
            space_width: self.space_width,
            class_name: self.class_name,
            children: Vec::new(),
            lines: Vec::new(),
        };
        reveal.set_children(self.children)?;

        tracing::debug!(
            "TextReveal: mounted {} lines (active: {})",
            reveal.lines.len(),
            reveal.is_active()
        );
        Ok(reveal)
    }
}

impl Default for TextRevealBuilder {
    fn default() -> Self {
        Self::new()
    }
}

struct MountedLine<E: MotionEngine> {
    delay: Signal<u32>,
    animator: LineAnimator<E>,
}

/// A mounted text reveal
///
/// Setters apply synchronously: each one updates only the signals it
/// touches, and the affected line animators resubmit their units before
/// the setter returns.
pub struct TextReveal<E: MotionEngine = SchedulerHandle> {
    graph: ReactiveGraph,
    engine: E,
    active: Signal<bool>,
    char_delay: Signal<Stagger>,
    line_delay: Stagger,
    spring_config: Option<SpringConfig>,
    space_width: Option<SpaceWidth>,
    class_name: Option<String>,
    children: Vec<Fragment>,
    lines: Vec<MountedLine<E>>,
}

impl<E: MotionEngine> TextReveal<E> {
    pub fn is_active(&self) -> bool {
        self.graph.get_untracked(self.active).unwrap_or(false)
    }

    /// Reveal (`true`) or hide (`false`) every line
    pub fn set_active(&mut self, active: bool) {
        if self.graph.set_if_changed(self.active, active) {
            tracing::debug!("TextReveal: active -> {}", active);
        }
    }

    pub fn toggle(&mut self) {
        let active = !self.is_active();
        self.set_active(active);
    }

    pub fn char_delay(&self) -> Stagger {
        self.graph.get_untracked(self.char_delay).unwrap_or_default()
    }

    pub fn set_char_delay(&mut self, delay: impl Into<Stagger>) {
        self.graph.set_if_changed(self.char_delay, delay.into());
    }

    pub fn line_delay(&self) -> &Stagger {
        &self.line_delay
    }

    /// Change the line stagger; only lines whose delay changes resubmit
    pub fn set_line_delay(&mut self, delay: impl Into<Stagger>) {
        self.line_delay = delay.into();
        let delays: Vec<(Signal<u32>, u32)> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| (line.delay, self.line_delay.delay_for_index(i)))
            .collect();

        self.graph.batch(|g| {
            for (signal, delay) in delays {
                g.set_if_changed(signal, delay);
            }
        });
    }

    pub fn spring_config(&self) -> Option<SpringConfig> {
        self.spring_config
    }

    /// Change the default curve; in-flight units continue on the new one
    pub fn set_spring_config(&mut self, config: Option<SpringConfig>) {
        if self.spring_config == config {
            return;
        }
        self.spring_config = config;
        for line in &mut self.lines {
            line.animator.set_context_spring_config(config);
        }
    }

    pub fn space_width(&self) -> Option<&SpaceWidth> {
        self.space_width.as_ref()
    }

    pub fn set_space_width(&mut self, width: Option<SpaceWidth>) {
        for line in &mut self.lines {
            line.animator.set_context_space_width(width.clone());
        }
        self.space_width = width;
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn set_class_name(&mut self, class_name: Option<String>) {
        self.class_name = class_name;
    }

    pub fn children(&self) -> &[Fragment] {
        &self.children
    }

    /// Replace the content
    ///
    /// Lines are matched by position. A line whose content and overrides are
    /// unchanged is left alone; a changed line keeps its units' state by
    /// index. Surplus lines are unmounted and new ones mount hidden.
    pub fn set_children(&mut self, children: Vec<Fragment>) -> Result<()> {
        let mut grouped = group_lines(children.iter().cloned()).into_iter();
        self.children = children;

        self.graph.batch_start();
        let result = self.sync_lines(&mut grouped);
        self.graph.batch_end();
        result
    }

    fn sync_lines(&mut self, grouped: &mut impl Iterator<Item = RevealLine>) -> Result<()> {
        let mut kept = 0;
        for (mounted, line) in self.lines.iter_mut().zip(grouped.by_ref()) {
            if *mounted.animator.line() != line {
                mounted.animator.replace_line(line, &mut self.graph);
            }
            kept += 1;
        }

        for surplus in self.lines.drain(kept..) {
            surplus.animator.unmount(&mut self.graph);
            self.graph.dispose_signal(surplus.delay);
        }

        for line in grouped {
            let index = self.lines.len();
            let mounted = self.mount_line(index, line)?;
            self.lines.push(mounted);
        }
        Ok(())
    }

    fn mount_line(&mut self, index: usize, line: RevealLine) -> Result<MountedLine<E>> {
        let delay = self
            .graph
            .create_signal(self.line_delay.delay_for_index(index));
        let context = LineContext::wrapped(LineBindings {
            active: self.active,
            char_delay: self.char_delay,
            line_delay: delay,
        })
        .with_spring_config(self.spring_config)
        .with_space_width(self.space_width.clone());

        let animator = LineAnimator::mount(line, context, &mut self.graph, self.engine.clone())?;
        Ok(MountedLine { delay, animator })
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Move every unit onto another engine and resubmit
    pub fn set_engine(&mut self, engine: E) {
        if engine.same_engine(&self.engine) {
            return;
        }
        self.graph.batch_start();
        for line in &mut self.lines {
            line.animator.set_engine(engine.clone(), &mut self.graph);
        }
        self.graph.batch_end();
        self.engine = engine;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&LineAnimator<E>> {
        self.lines.get(index).map(|l| &l.animator)
    }

    pub fn lines(&self) -> impl Iterator<Item = &LineAnimator<E>> + '_ {
        self.lines.iter().map(|l| &l.animator)
    }

    /// Whether any unit is moving or waiting on a delay
    pub fn is_animating(&self) -> bool {
        self.lines.iter().any(|l| l.animator.is_animating())
    }

    /// Snapshot every line for rendering
    pub fn view(&self) -> RevealView {
        RevealView {
            class_name: self.class_name.clone(),
            lines: self
                .lines
                .iter()
                .enumerate()
                .map(|(i, l)| l.animator.view(i))
                .collect(),
        }
    }
}

impl<E: MotionEngine> Drop for TextReveal<E> {
    fn drop(&mut self) {
        for line in self.lines.drain(..) {
            line.animator.unmount(&mut self.graph);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::line;
    use crate::render::UnitState;
    use reveal_animation::AnimationScheduler;

    #[test]
    fn test_builder_defaults() {
        let scheduler = AnimationScheduler::new();
        let reveal = text_reveal().child("Hello").mount(scheduler.handle()).unwrap();

        assert!(!reveal.is_active());
        assert_eq!(reveal.char_delay(), Stagger::Fixed(35));
        assert_eq!(*reveal.line_delay(), Stagger::Fixed(100));
        assert_eq!(
            reveal.space_width(),
            Some(&SpaceWidth::Fixed(Length::Em(0.2)))
        );
        assert_eq!(reveal.line_count(), 1);
    }

    #[test]
    fn test_builder_config() {
        let scheduler = AnimationScheduler::new();
        let config = RevealConfig {
            active: true,
            char_delay_ms: 10,
            line_delay_ms: 50,
            class_name: Some("title".into()),
            ..RevealConfig::default()
        };

        let reveal = text_reveal()
            .config(&config)
            .child(line("ab"))
            .child(line("cd"))
            .mount(scheduler.handle())
            .unwrap();

        assert!(reveal.is_active());
        assert_eq!(reveal.class_name(), Some("title"));
        let delays: Vec<u32> = reveal.line(1).unwrap().last_commands().iter().map(|c| c.delay_ms).collect();
        assert_eq!(delays, vec![50, 60]);
    }

    #[test]
    fn test_toggle() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal().child("ab").mount(scheduler.handle()).unwrap();

        reveal.toggle();
        assert!(reveal.is_active());
        assert_eq!(reveal.line(0).unwrap().submissions(), 2);

        reveal.toggle();
        assert!(!reveal.is_active());
        assert_eq!(reveal.line(0).unwrap().submissions(), 3);
    }

    #[test]
    fn test_set_line_delay_only_touches_changed_lines() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal()
            .children([line("a"), line("b"), line("c")])
            .mount(scheduler.handle())
            .unwrap();

        // Same delay for line 0, new delays for lines 1 and 2
        reveal.set_line_delay(Stagger::indexed(|i| i as u32 * 40));

        assert_eq!(reveal.line(0).unwrap().submissions(), 1);
        assert_eq!(reveal.line(1).unwrap().submissions(), 2);
        assert_eq!(reveal.line(2).unwrap().last_commands()[0].delay_ms, 80);
    }

    #[test]
    fn test_set_char_delay_resubmits_every_line() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal()
            .children([line("ab"), line("cd")])
            .mount(scheduler.handle())
            .unwrap();

        reveal.set_char_delay(10);
        reveal.set_char_delay(10);

        for line in reveal.lines() {
            assert_eq!(line.submissions(), 2);
        }
        assert_eq!(reveal.line(1).unwrap().last_commands()[1].delay_ms, 110);
    }

    #[test]
    fn test_set_children_reuses_lines() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal()
            .active(true)
            .children([line("ab"), line("cd")])
            .mount(scheduler.handle())
            .unwrap();
        for _ in 0..120 {
            scheduler.advance(1.0 / 60.0);
        }

        reveal
            .set_children(vec![line("ab").into(), line("xy").into(), line("new").into()])
            .unwrap();

        assert_eq!(reveal.line_count(), 3);
        assert_eq!(reveal.line(0).unwrap().submissions(), 1);
        assert_eq!(reveal.line(1).unwrap().unit_state(0), Some(UnitState::Visible));
        assert_eq!(
            reveal.line(2).unwrap().unit_state(0),
            Some(UnitState::AnimatingToVisible)
        );

        reveal.set_children(vec![line("ab").into()]).unwrap();
        assert_eq!(reveal.line_count(), 1);
        assert_eq!(scheduler.spring_count(), 2);
    }

    #[test]
    fn test_set_space_width() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal().child("a b").mount(scheduler.handle()).unwrap();

        reveal.set_space_width(Some(SpaceWidth::Fixed(Length::Px(6.0))));
        assert_eq!(reveal.view().lines[0].units[1].width, Some(Length::Px(6.0)));

        reveal.set_space_width(None);
        assert_eq!(reveal.view().lines[0].units[1].width, None);
    }

    #[test]
    fn test_set_spring_config() {
        let scheduler = AnimationScheduler::new();
        let mut reveal = text_reveal().child("ab").mount(scheduler.handle()).unwrap();

        reveal.set_spring_config(Some(SpringConfig::wobbly()));

        assert_eq!(reveal.spring_config(), Some(SpringConfig::wobbly()));
        assert_eq!(reveal.line(0).unwrap().spring_config(), SpringConfig::wobbly());
    }

    #[test]
    fn test_drop_releases_springs() {
        let scheduler = AnimationScheduler::new();
        {
            let _reveal = text_reveal()
                .active(true)
                .child("abc")
                .mount(scheduler.handle())
                .unwrap();
            assert_eq!(scheduler.spring_count(), 3);
        }
        assert_eq!(scheduler.spring_count(), 0);
    }
}
