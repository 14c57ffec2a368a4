//! Overlay configuration.

use crate::channel::Channel;
use common::{Color, OverlayError, OverlayResult, Px};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Text color per reporting channel.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelColors {
    pub log: Color,
    pub warn: Color,
    pub error: Color,
}

impl ChannelColors {
    pub fn get(&self, channel: Channel) -> Color {
        match channel {
            Channel::Log => self.log,
            Channel::Warn => self.warn,
            Channel::Error => self.error,
        }
    }
}

impl Default for ChannelColors {
    fn default() -> Self {
        Self {
            log: Color::WHITE,
            warn: Color::rgb(255, 215, 0),
            error: Color::rgb(255, 99, 71),
        }
    }
}

/// Overlay configuration.
///
/// Every field is optional in JSON; missing ones take the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Attribute marking the overlay root element.
    pub marker_attribute: String,
    /// Panel height.
    pub panel_height: Px,
    /// Extra distance past the panel height when hidden.
    pub offscreen_margin: Px,
    /// Height of one message line, used for scrolling.
    pub line_height: Px,
    /// Slide transition duration in milliseconds.
    pub transition_ms: u32,
    /// Stacking order of the panel.
    pub z_index: i32,
    /// Panel background.
    pub background: Color,
    /// CSS `font` shorthand for panel text.
    pub font: String,
    pub colors: ChannelColors,
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A shorter panel with smaller text.
    pub fn compact() -> Self {
        Self {
            panel_height: Px(80.0),
            line_height: Px(12.0),
            transition_ms: 150,
            font: "10px monospace".to_string(),
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> OverlayResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> OverlayResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> OverlayResult<()> {
        let marker = &self.marker_attribute;
        if marker.is_empty() || marker.contains(|c: char| c.is_whitespace() || c == '=' || c == '"') {
            return Err(OverlayError::config(format!(
                "invalid marker attribute: {marker:?}"
            )));
        }
        if self.panel_height.get() <= 0.0 {
            return Err(OverlayError::config("panel_height must be positive"));
        }
        if self.offscreen_margin.get() < 0.0 || self.line_height.get() < 0.0 {
            return Err(OverlayError::config("lengths must not be negative"));
        }
        Ok(())
    }

    /// Offset of the panel's bottom edge while hidden, for a panel of `height`.
    pub fn hidden_offset(&self, height: Px) -> Px {
        -(height + self.offscreen_margin)
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            marker_attribute: "data-debug-overlay".to_string(),
            panel_height: Px(150.0),
            offscreen_margin: Px(10.0),
            line_height: Px(16.0),
            transition_ms: 300,
            z_index: 10000,
            background: Color::rgba(0, 0, 0, 217),
            font: "12px monospace".to_string(),
            colors: ChannelColors::default(),
        }
    }
}
