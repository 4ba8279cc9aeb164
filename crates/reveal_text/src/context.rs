//! Per-line context handed down by the container

use crate::timing::{SpaceWidth, Stagger};
use reveal_animation::SpringConfig;
use reveal_core::Signal;

/// Signals owned by the container and read by every line animator
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineBindings {
    /// Shared visibility flag
    pub active: Signal<bool>,
    /// Per-unit stagger within a line
    pub char_delay: Signal<Stagger>,
    /// This line's start offset in milliseconds
    pub line_delay: Signal<u32>,
}

/// The read-only inputs a line animator receives from its container
///
/// The default context is *unwrapped*: it carries no bindings, and mounting
/// a line animator with it fails.
#[derive(Clone, Debug, Default)]
pub struct LineContext {
    pub(crate) bindings: Option<LineBindings>,
    /// Container default curve
    pub spring_config: Option<SpringConfig>,
    /// Container default whitespace width
    pub space_width: Option<SpaceWidth>,
}

impl LineContext {
    /// A context bound to container signals
    pub fn wrapped(bindings: LineBindings) -> Self {
        Self {
            bindings: Some(bindings),
            spring_config: None,
            space_width: None,
        }
    }

    pub fn with_spring_config(mut self, config: Option<SpringConfig>) -> Self {
        self.spring_config = config;
        self
    }

    pub fn with_space_width(mut self, width: Option<SpaceWidth>) -> Self {
        self.space_width = width;
        self
    }

    /// Whether this context was produced by a container
    pub fn is_wrapped(&self) -> bool {
        self.bindings.is_some()
    }

    pub fn bindings(&self) -> Option<LineBindings> {
        self.bindings
    }
}
