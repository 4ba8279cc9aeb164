//! CSS-like length values
//!
//! Used for whitespace widths. Parsed from strings such as `"0.2em"`,
//! `"4px"`, `"1rem"` or `"50%"`; a bare number is read as pixels.

use crate::error::RevealError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A length with its unit
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Length {
    /// Absolute pixels
    Px(f32),
    /// Relative to the current font size
    Em(f32),
    /// Relative to the root font size
    Rem(f32),
    /// Percentage of the containing block
    Percent(f32),
}

impl Length {
    /// Resolve to pixels for the given font sizes
    ///
    /// Percentages resolve against `container`.
    pub fn to_px(self, font_size: f32, root_font_size: f32, container: f32) -> f32 {
        match self {
            Length::Px(v) => v,
            Length::Em(v) => v * font_size,
            Length::Rem(v) => v * root_font_size,
            Length::Percent(v) => v / 100.0 * container,
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::Em(0.2)
    }
}

impl FromStr for Length {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || RevealError::InvalidLength(s.to_string());

        let parse = |num: &str| num.trim().parse::<f32>().map_err(|_| invalid());

        // "rem" must be tried before "em"
        let length = if let Some(num) = input.strip_suffix("rem") {
            Length::Rem(parse(num)?)
        } else if let Some(num) = input.strip_suffix("em") {
            Length::Em(parse(num)?)
        } else if let Some(num) = input.strip_suffix('%') {
            Length::Percent(parse(num)?)
        } else {
            Length::Px(parse(input.strip_suffix("px").unwrap_or(input))?)
        };

        match length {
            Length::Px(v) | Length::Em(v) | Length::Rem(v) | Length::Percent(v)
                if v.is_finite() =>
            {
                Ok(length)
            }
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Length {
    type Error = RevealError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Px(v) => write!(f, "{v}px"),
            Length::Em(v) => write!(f, "{v}em"),
            Length::Rem(v) => write!(f, "{v}rem"),
            Length::Percent(v) => write!(f, "{v}%"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("0.2em".parse::<Length>().unwrap(), Length::Em(0.2));
        assert_eq!("1.5rem".parse::<Length>().unwrap(), Length::Rem(1.5));
        assert_eq!("4px".parse::<Length>().unwrap(), Length::Px(4.0));
        assert_eq!("50%".parse::<Length>().unwrap(), Length::Percent(50.0));
        assert_eq!(" 8 ".parse::<Length>().unwrap(), Length::Px(8.0));
    }

    #[test]
    fn test_parse_invalid() {
        for input in ["", "em", "wide", "1.2.3px", "NaNpx", "infem"] {
            assert!(
                matches!(input.parse::<Length>(), Err(RevealError::InvalidLength(_))),
                "{input:?} should not parse"
            );
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::Em(0.2).to_string(), "0.2em");
        assert_eq!(Length::Percent(50.0).to_string(), "50%");
        assert_eq!(Length::Px(3.0).to_string(), "3px");
    }

    #[test]
    fn test_to_px() {
        assert_eq!(Length::Em(0.5).to_px(20.0, 16.0, 300.0), 10.0);
        assert_eq!(Length::Rem(2.0).to_px(20.0, 16.0, 300.0), 32.0);
        assert_eq!(Length::Percent(10.0).to_px(20.0, 16.0, 300.0), 30.0);
    }
}
