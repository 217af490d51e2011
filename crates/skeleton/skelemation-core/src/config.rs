//! Core configuration for skelemation-core.

use serde::{Deserialize, Serialize};

use crate::router::ModeKind;

/// Rendering, timing and formula-sandbox settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Skeleton viewport as (min_x, min_y, width, height).
    #[serde(default = "default_view_box")]
    pub view_box: [f64; 4],
    /// Radius of the clickable anchor drawn at each bone tip.
    #[serde(default = "default_anchor_radius")]
    pub anchor_radius: f64,
    #[serde(default)]
    pub palette: Palette,
    /// Duration of one wave period in milliseconds.
    #[serde(default = "default_wave_length_ms")]
    pub wave_length_ms: f64,
    #[serde(default = "default_wave_formula")]
    pub default_wave_formula: String,
    /// Number of points sampled when drawing the wave panel curve.
    #[serde(default = "default_wave_samples")]
    pub wave_samples: usize,
    /// Screen shown when the session starts.
    #[serde(default)]
    pub initial_mode: ModeKind,
    #[serde(default)]
    pub formula: FormulaLimits,
}

/// Stroke and fill colors handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub bone: String,
    pub anchor_stroke: String,
    pub anchor_fill: String,
    pub preview: String,
    pub wave: String,
    pub baseline: String,
    pub cursor: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bone: "black".into(),
            anchor_stroke: "lime".into(),
            anchor_fill: "white".into(),
            preview: "teal".into(),
            wave: "skyblue".into(),
            baseline: "gray".into(),
            cursor: "darkgrey".into(),
        }
    }
}

/// Resource limits for the formula sandbox.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormulaLimits {
    pub max_operations: u64,
    pub max_expr_depth: usize,
    pub max_call_levels: usize,
    pub max_string_size: usize,
    /// Compiled formulas kept before the cache is flushed.
    pub cache_capacity: usize,
}

impl Default for FormulaLimits {
    fn default() -> Self {
        Self {
            max_operations: 10_000,
            max_expr_depth: 64,
            max_call_levels: 16,
            max_string_size: 256,
            cache_capacity: 256,
        }
    }
}

fn default_view_box() -> [f64; 4] {
    [-320.0, -240.0, 640.0, 480.0]
}

fn default_anchor_radius() -> f64 {
    10.0
}

fn default_wave_length_ms() -> f64 {
    1000.0
}

fn default_wave_formula() -> String {
    "sin(x)".to_string()
}

fn default_wave_samples() -> usize {
    300
}

impl Default for Config {
    fn default() -> Self {
        Self {
            view_box: default_view_box(),
            anchor_radius: default_anchor_radius(),
            palette: Palette::default(),
            wave_length_ms: default_wave_length_ms(),
            default_wave_formula: default_wave_formula(),
            wave_samples: default_wave_samples(),
            initial_mode: ModeKind::default(),
            formula: FormulaLimits::default(),
        }
    }
}

impl Config {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.wave_length_ms.is_finite() && self.wave_length_ms > 0.0) {
            return Err(ConfigError::InvalidWaveLength(self.wave_length_ms));
        }
        if self.wave_samples == 0 {
            return Err(ConfigError::InvalidWaveSamples);
        }
        if !(self.anchor_radius.is_finite() && self.anchor_radius > 0.0) {
            return Err(ConfigError::InvalidAnchorRadius(self.anchor_radius));
        }
        if self.view_box[2] <= 0.0 || self.view_box[3] <= 0.0 {
            return Err(ConfigError::InvalidViewBox);
        }
        let f = &self.formula;
        if f.max_operations == 0 || f.max_expr_depth == 0 || f.max_call_levels == 0 {
            return Err(ConfigError::InvalidFormulaLimits);
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("wave length must be a positive number of milliseconds (got {0})")]
    InvalidWaveLength(f64),
    #[error("wave panel sample count must be non-zero")]
    InvalidWaveSamples,
    #[error("anchor radius must be positive (got {0})")]
    InvalidAnchorRadius(f64),
    #[error("view box width and height must be positive")]
    InvalidViewBox,
    #[error("formula limits must be non-zero")]
    InvalidFormulaLimits,
}
