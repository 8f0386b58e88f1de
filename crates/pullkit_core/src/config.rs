//! Refresh control configuration
//!
//! A [`Configuration`] is fixed for the lifetime of a control. Changing the
//! layout or trigger policy means building a new control.
//!
//! Configurations can be written in code or loaded from TOML:
//!
//! ```toml
//! layout = "top"
//!
//! [trigger]
//! height = 80.0
//! event = "released"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Layout placement and trigger policy for a refresh control
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub trigger: Trigger,
}

impl Configuration {
    pub fn new(layout: Layout, trigger: Trigger) -> Self {
        Self { layout, trigger }
    }

    /// Parse a configuration from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Configuration = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded refresh configuration");
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    /// Reject explicit trigger heights that can never produce progress
    ///
    /// Controls built in code skip this check and treat such heights as
    /// "never progresses".
    pub fn validate(&self) -> Result<()> {
        match self.trigger.height {
            Some(height) if !height.is_finite() || height <= 0.0 => {
                Err(ConfigError::InvalidTriggerHeight(height))
            }
            _ => Ok(()),
        }
    }
}

/// Where the control sits relative to the scroll container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// The top of the control is anchored at the top of the container's visible frame
    #[default]
    Top,
    /// The bottom of the control is anchored to the content, moving with it
    Bottom,
}

/// When a pull turns into a refresh
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Trigger {
    /// Pull distance that starts refreshing. Defaults to the indicator height.
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub event: TriggerEvent,
}

impl Trigger {
    /// Refresh as soon as the pull reaches the trigger height
    pub fn dragging() -> Self {
        Self {
            height: None,
            event: TriggerEvent::Dragging,
        }
    }

    /// Refresh when the user lets go past the trigger height
    pub fn released() -> Self {
        Self {
            height: None,
            event: TriggerEvent::Released,
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    /// Trigger height, falling back to the indicator's measured height
    pub fn resolved_height(&self, indicator_height: f32) -> f32 {
        self.height.unwrap_or(indicator_height)
    }
}

/// Gesture moment at which the trigger height is evaluated
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    /// While the finger is still down
    #[default]
    Dragging,
    /// At the moment the finger lifts
    Released,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Configuration::default();
        assert_eq!(config.layout, Layout::Top);
        assert_eq!(config.trigger.event, TriggerEvent::Dragging);
        assert_eq!(config.trigger.height, None);
        assert_eq!(config.trigger.resolved_height(60.0), 60.0);
    }

    #[test]
    fn test_builders() {
        let trigger = Trigger::released().with_height(120.0);
        assert_eq!(trigger.event, TriggerEvent::Released);
        assert_eq!(trigger.resolved_height(60.0), 120.0);
        assert_eq!(Trigger::dragging(), Trigger::default());
    }

    #[test]
    fn test_from_toml() {
        let config = Configuration::from_toml_str(
            r#"
            layout = "bottom"

            [trigger]
            height = 80.0
            event = "released"
            "#,
        )
        .unwrap();

        assert_eq!(config.layout, Layout::Bottom);
        assert_eq!(config.trigger.height, Some(80.0));
        assert_eq!(config.trigger.event, TriggerEvent::Released);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = Configuration::from_toml_str("layout = \"top\"").unwrap();
        assert_eq!(config, Configuration::default());

        let config = Configuration::from_toml_str("").unwrap();
        assert_eq!(config, Configuration::default());
    }

    #[test]
    fn test_from_toml_rejects_bad_height() {
        let err = Configuration::from_toml_str("[trigger]\nheight = -4.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTriggerHeight(h) if h == -4.0));

        let err = Configuration::from_toml_str("[trigger]\nheight = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTriggerHeight(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_variant() {
        let err = Configuration::from_toml_str("layout = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Configuration::new(Layout::Bottom, Trigger::released().with_height(64.0));
        let text = config.to_toml_string().unwrap();
        assert_eq!(Configuration::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Configuration::load("/definitely/not/here/pullkit.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
