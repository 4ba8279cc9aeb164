//! Reveal configuration
//!
//! Container options as a TOML table:
//!
//! ```toml
//! active = false
//! char_delay_ms = 35
//! line_delay_ms = 100
//! spring = "gentle"            # or { stiffness = 300.0, damping = 20.0 }
//! space_width = "0.2em"
//! class_name = "headline"
//! ```

use crate::error::Result;
use crate::units::Length;
use reveal_animation::{SpringConfig, SpringPreset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A spring curve given by preset name or explicit parameters
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SpringSetting {
    Preset(SpringPreset),
    Custom(SpringConfig),
}

impl SpringSetting {
    pub fn config(self) -> SpringConfig {
        match self {
            SpringSetting::Preset(preset) => preset.config(),
            SpringSetting::Custom(config) => config,
        }
    }
}

/// Options for a [`TextReveal`](crate::TextReveal) container
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RevealConfig {
    pub active: bool,
    /// Stagger between characters of a line
    pub char_delay_ms: u32,
    /// Stagger between lines
    pub line_delay_ms: u32,
    /// Curve for every line without its own; engine default when unset
    pub spring: Option<SpringSetting>,
    /// Width of whitespace characters
    pub space_width: Option<Length>,
    pub class_name: Option<String>,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            active: false,
            char_delay_ms: 35,
            line_delay_ms: 100,
            spring: None,
            space_width: Some(Length::default()),
            class_name: None,
        }
    }
}

impl RevealConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!("RevealConfig: loaded {}", path.display());
        Ok(config)
    }

    /// The configured spring curve, if any
    pub fn spring_config(&self) -> Option<SpringConfig> {
        self.spring.map(SpringSetting::config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RevealError;

    #[test]
    fn test_defaults() {
        let config = RevealConfig::from_toml_str("").unwrap();

        assert_eq!(config, RevealConfig::default());
        assert!(!config.active);
        assert_eq!(config.char_delay_ms, 35);
        assert_eq!(config.line_delay_ms, 100);
        assert_eq!(config.space_width, Some(Length::Em(0.2)));
        assert_eq!(config.spring_config(), None);
    }

    #[test]
    fn test_spring_preset() {
        let config = RevealConfig::from_toml_str(r#"spring = "wobbly""#).unwrap();
        assert_eq!(config.spring_config(), Some(SpringConfig::wobbly()));
    }

    #[test]
    fn test_spring_table() {
        let config = RevealConfig::from_toml_str(
            r#"
            active = true
            char_delay_ms = 20
            spring = { stiffness = 300.0, damping = 22.0 }
            space_width = "4px"
            class_name = "headline"
            "#,
        )
        .unwrap();

        assert!(config.active);
        assert_eq!(config.char_delay_ms, 20);
        assert_eq!(config.spring_config(), Some(SpringConfig::new(300.0, 22.0, 1.0)));
        assert_eq!(config.space_width, Some(Length::Px(4.0)));
        assert_eq!(config.class_name.as_deref(), Some("headline"));
    }

    #[test]
    fn test_invalid_length_rejected() {
        let result = RevealConfig::from_toml_str(r#"space_width = "wide""#);
        assert!(matches!(result, Err(RevealError::Config(_))));
    }

    #[test]
    fn test_degenerate_spring_rejected() {
        for source in [
            "spring = { stiffness = 300.0, damping = 20.0, mass = 0.0 }",
            "spring = { stiffness = -10.0, damping = 20.0 }",
        ] {
            assert!(
                matches!(RevealConfig::from_toml_str(source), Err(RevealError::Config(_))),
                "{source} should be rejected"
            );
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = RevealConfig::load("/nonexistent/reveal.toml");
        assert!(matches!(result, Err(RevealError::Io(_))));
    }
}
