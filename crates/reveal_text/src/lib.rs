//! Reveal Text
//!
//! Staggered "lift up" reveals for text. Content is grouped into lines, each
//! line is split into units (characters, or whole fragments), and every unit
//! slides between a hidden and a visible offset with its own start delay so
//! the reveal sweeps across characters and then down the lines.
//!
//! # Example
//!
//! ```rust
//! use reveal_animation::AnimationScheduler;
//! use reveal_text::prelude::*;
//!
//! let scheduler = AnimationScheduler::new();
//! let mut reveal = text_reveal()
//!     .child(line("Hello World"))
//!     .child(line("Salt Pepper"))
//!     .mount(scheduler.handle())
//!     .unwrap();
//!
//! reveal.set_active(true);
//! while scheduler.advance(1.0 / 60.0) {}
//!
//! let view = reveal.view();
//! assert!(view.lines[1].units.iter().all(|u| u.offset == 0.0));
//! ```
//!
//! # Modules
//!
//! - [`group`] - normalizes fragments into lines
//! - [`line`] - per-line animator driving one motion per unit
//! - [`reveal`] - the container and its builder
//! - [`timing`] - stagger and whitespace width policies
//! - [`engine`] - the seam to whatever animates the offsets

pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod fragment;
pub mod group;
pub mod line;
pub mod render;
pub mod reveal;
pub mod timing;
pub mod units;

pub use config::{RevealConfig, SpringSetting};
pub use context::{LineBindings, LineContext};
pub use engine::{MotionEngine, UnitMotion, HIDDEN_OFFSET, VISIBLE_OFFSET};
pub use error::{Result, RevealError};
pub use fragment::{line, node, Content, Fragment, Node, RevealLine, Unit};
pub use group::group_lines;
pub use line::{LineAnimator, UnitCommand};
pub use render::{LineView, RevealView, UnitState, UnitView};
pub use reveal::{text_reveal, TextReveal, TextRevealBuilder};
pub use timing::{SpaceWidth, Stagger};
pub use units::Length;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::fragment::{line, node, Fragment};
    pub use crate::reveal::{text_reveal, TextReveal};
    pub use crate::timing::{SpaceWidth, Stagger};
    pub use crate::units::Length;
    pub use reveal_animation::SpringConfig;
}
