// src/config.rs
//
// Renderer settings, loadable from TOML:
//
//   tile_width = 128
//   cull_margin = 64.0
//   line_width = 1.0
//   pan_step = 32.0
//
//   [animation]
//   enabled = true
//   frame_time = 0.2

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::animation::clamp_frame_time;
use crate::error::ConfigError;
use crate::projection::TILE_ASPECT;

const MIN_TILE_WIDTH: f32 = 2.0;

/// Rendering parameters shared by the scene and the backends.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tile width in pixels; height is always half of it.
    pub tile_width: f32,
    /// Extra pixels around the viewport in which tiles stay realized.
    pub cull_margin: f32,
    /// Stroke width in pixels.
    pub line_width: f32,
    /// Camera movement per pan command, in pixels.
    pub pan_step: f32,
    /// Animation settings.
    pub animation: AnimationConfig,
}

/// `[animation]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Whether tiles animate at start-up.
    pub enabled: bool,
    /// Seconds per animation tick.
    pub frame_time: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            tile_width: 128.0,
            cull_margin: 64.0,
            line_width: 1.0,
            pan_step: 32.0,
            animation: AnimationConfig::default(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frame_time: 0.2,
        }
    }
}

impl RenderConfig {
    /// Parses a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str::<Self>(text)?.sanitized())
    }

    /// Reads and parses `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Tile height in pixels.
    pub fn tile_height(&self) -> f32 {
        self.tile_width / TILE_ASPECT
    }

    /// Copy with every field clamped into its valid range.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.tile_width.is_finite() || self.tile_width < MIN_TILE_WIDTH {
            warn!(tile_width = self.tile_width, "tile width out of range");
            self.tile_width = if self.tile_width.is_finite() {
                MIN_TILE_WIDTH
            } else {
                defaults.tile_width
            };
        }
        if !self.cull_margin.is_finite() || self.cull_margin < 0.0 {
            warn!(cull_margin = self.cull_margin, "cull margin out of range");
            self.cull_margin = if self.cull_margin.is_finite() {
                0.0
            } else {
                defaults.cull_margin
            };
        }
        if !self.line_width.is_finite() || self.line_width <= 0.0 {
            warn!(line_width = self.line_width, "line width out of range");
            self.line_width = defaults.line_width;
        }
        if !self.pan_step.is_finite() {
            warn!(pan_step = self.pan_step, "pan step is not finite");
            self.pan_step = defaults.pan_step;
        }
        self.animation.frame_time = clamp_frame_time(self.animation.frame_time);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        assert_eq!(RenderConfig::from_toml_str("").unwrap(), RenderConfig::default());
    }

    #[test]
    fn partial_document_overrides_fields() {
        let cfg = RenderConfig::from_toml_str(
            "tile_width = 64\n[animation]\nenabled = false\n",
        )
        .unwrap();
        assert_eq!(cfg.tile_width, 64.0);
        assert_eq!(cfg.tile_height(), 32.0);
        assert!(!cfg.animation.enabled);
        assert_eq!(cfg.animation.frame_time, 0.2);
        assert_eq!(cfg.cull_margin, 64.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = RenderConfig::from_toml_str(
            "tile_width = 0.5\ncull_margin = -3.0\nline_width = 0\n[animation]\nframe_time = 9.0\n",
        )
        .unwrap();
        assert_eq!(cfg.tile_width, 2.0);
        assert_eq!(cfg.cull_margin, 0.0);
        assert_eq!(cfg.line_width, 1.0);
        assert_eq!(cfg.animation.frame_time, 2.0);
    }

    #[test]
    fn malformed_toml_is_reported() {
        let err = RenderConfig::from_toml_str("tile_width = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
