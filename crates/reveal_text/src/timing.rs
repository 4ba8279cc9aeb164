//! Timing policies
//!
//! [`Stagger`] turns a unit or line index into a start delay, and
//! [`SpaceWidth`] decides how wide a whitespace unit is drawn.

use crate::units::Length;
use std::fmt;
use std::sync::Arc;

type IndexFn = Arc<dyn Fn(usize) -> u32 + Send + Sync>;
type CharFn = Arc<dyn Fn(char) -> Length + Send + Sync>;

/// Delay policy keyed by position
///
/// `Fixed(k)` gives index `i` a delay of `i * k` milliseconds; `Indexed`
/// calls a function of the index. Two `Indexed` policies are equal only when
/// they share the same function.
#[derive(Clone)]
pub enum Stagger {
    Fixed(u32),
    Indexed(IndexFn),
}

impl Stagger {
    /// Stagger computed by a function of the index
    pub fn indexed<F>(f: F) -> Self
    where
        F: Fn(usize) -> u32 + Send + Sync + 'static,
    {
        Stagger::Indexed(Arc::new(f))
    }

    /// Calculate the delay in milliseconds for the item at `index`
    pub fn delay_for_index(&self, index: usize) -> u32 {
        match self {
            Stagger::Fixed(step) => u32::try_from(index)
                .unwrap_or(u32::MAX)
                .saturating_mul(*step),
            Stagger::Indexed(f) => f(index),
        }
    }
}

impl Default for Stagger {
    fn default() -> Self {
        Stagger::Fixed(0)
    }
}

impl From<u32> for Stagger {
    fn from(step: u32) -> Self {
        Stagger::Fixed(step)
    }
}

impl PartialEq for Stagger {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Stagger::Fixed(a), Stagger::Fixed(b)) => a == b,
            (Stagger::Indexed(a), Stagger::Indexed(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Stagger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stagger::Fixed(step) => f.debug_tuple("Fixed").field(step).finish(),
            Stagger::Indexed(_) => f.write_str("Indexed(..)"),
        }
    }
}

/// Width policy for whitespace units
#[derive(Clone)]
pub enum SpaceWidth {
    Fixed(Length),
    PerChar(CharFn),
}

impl SpaceWidth {
    /// Width computed by a function of the whitespace character
    pub fn per_char<F>(f: F) -> Self
    where
        F: Fn(char) -> Length + Send + Sync + 'static,
    {
        SpaceWidth::PerChar(Arc::new(f))
    }

    /// Resolve the width for a whitespace character
    pub fn resolve(&self, ch: char) -> Length {
        match self {
            SpaceWidth::Fixed(length) => *length,
            SpaceWidth::PerChar(f) => f(ch),
        }
    }
}

impl From<Length> for SpaceWidth {
    fn from(length: Length) -> Self {
        SpaceWidth::Fixed(length)
    }
}

impl PartialEq for SpaceWidth {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SpaceWidth::Fixed(a), SpaceWidth::Fixed(b)) => a == b,
            (SpaceWidth::PerChar(a), SpaceWidth::PerChar(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for SpaceWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpaceWidth::Fixed(length) => f.debug_tuple("Fixed").field(length).finish(),
            SpaceWidth::PerChar(_) => f.write_str("PerChar(..)"),
        }
    }
}
