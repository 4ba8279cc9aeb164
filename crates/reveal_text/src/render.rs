//! Rendered view
//!
//! A snapshot of the reveal for the rendering layer: a column of lines, each
//! an overflow-clipped row of units. Every unit carries its own vertical
//! offset so it slides independently inside its line's clip.

use crate::fragment::Unit;
use crate::units::Length;

/// Where a unit is in its reveal cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitState {
    #[default]
    Hidden,
    AnimatingToVisible,
    Visible,
    AnimatingToHidden,
}

/// The whole reveal: a column of lines
#[derive(Clone, Debug, PartialEq)]
pub struct RevealView {
    pub class_name: Option<String>,
    pub lines: Vec<LineView>,
}

impl RevealView {
    /// Total number of units across all lines
    pub fn unit_count(&self) -> usize {
        self.lines.iter().map(|l| l.units.len()).sum()
    }
}

/// One clipped row
#[derive(Clone, Debug, PartialEq)]
pub struct LineView {
    pub index: usize,
    pub units: Vec<UnitView>,
}

/// One inline unit
#[derive(Clone, Debug, PartialEq)]
pub struct UnitView {
    pub index: usize,
    pub unit: Unit,
    /// Explicit width, set only for whitespace units
    pub width: Option<Length>,
    /// Vertical offset as a percentage of the unit's height (0 = visible)
    pub offset: f32,
    pub state: UnitState,
}
