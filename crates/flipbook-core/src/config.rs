//! Editor configuration and tuning constants.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Allowed brush width range, in base pixels.
pub const BRUSH_WIDTH_RANGE: (f64, f64) = (1.0, 30.0);
/// Allowed playback/export rate range, in frames per second.
pub const FPS_RANGE: (u32, u32) = (4, 24);

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Onion skin presentation in draw mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnionSkin {
    /// How many previously committed frames to show.
    pub count: usize,
    /// Opacity of the newest onion frame.
    pub opacity_start: f64,
    /// Each older frame is multiplied by this factor.
    pub opacity_decay: f64,
}

impl Default for OnionSkin {
    fn default() -> Self {
        Self {
            count: 3,
            opacity_start: 0.16,
            opacity_decay: 0.55,
        }
    }
}

impl OnionSkin {
    /// Opacity for a frame `recency` steps back (0 = newest committed frame).
    pub fn opacity(&self, recency: usize) -> f64 {
        self.opacity_start * self.opacity_decay.powi(recency as i32)
    }
}

/// Empirically tuned constants for input filtering and capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spacing between interpolated sub-lines of a segment.
    pub interp_spacing: f64,
    /// Squared distance below which a new pointer sample is dropped.
    pub min_point_distance_sq: f64,
    /// Commit requests closer than this collapse into one.
    pub commit_cooldown_ms: u64,
    /// Ticks rendered at the start of a capture without being counted.
    pub record_warmup_ticks: u32,
    /// Minimum time between starting a capture and the first counted frame.
    pub capture_delay_ms: u64,
    /// Default hold time for status messages.
    pub status_hold_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            interp_spacing: 2.5,
            min_point_distance_sq: 0.8,
            commit_cooldown_ms: 250,
            record_warmup_ticks: 2,
            capture_delay_ms: 350,
            status_hold_ms: 1200,
        }
    }
}

/// Full editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width of every layer in base pixels.
    pub base_width: u32,
    /// Height of every layer in base pixels.
    pub base_height: u32,
    /// Initial brush width.
    pub brush_width: f64,
    /// Initial frames per second.
    pub fps: u32,
    /// Initial draw color.
    pub color: Rgba,
    /// Opaque background used for display and exports.
    pub background: Rgba,
    pub onion: OnionSkin,
    pub tuning: Tuning,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            base_width: 1280,
            base_height: 800,
            brush_width: 6.0,
            fps: 12,
            color: Rgba::BLACK,
            background: Rgba::WHITE,
            onion: OnionSkin::default(),
            tuning: Tuning::default(),
        }
    }
}

impl EditorConfig {
    /// Configuration with a specific base resolution and defaults elsewhere.
    pub fn with_base_size(width: u32, height: u32) -> Self {
        Self {
            base_width: width.max(1),
            base_height: height.max(1),
            ..Self::default()
        }
    }

    /// Parse from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Brush width, fps and color as chosen by the user.
///
/// Changes only affect strokes and exports started afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    brush_width: f64,
    fps: u32,
    color: Rgba,
}

impl SessionSettings {
    pub fn new(brush_width: f64, fps: u32, color: Rgba) -> Self {
        let mut settings = Self {
            brush_width: BRUSH_WIDTH_RANGE.0,
            fps: FPS_RANGE.0,
            color,
        };
        settings.set_brush_width(brush_width);
        settings.set_fps(fps);
        settings
    }

    pub fn brush_width(&self) -> f64 {
        self.brush_width
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Milliseconds between frames at the current rate.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / f64::from(self.fps)
    }

    pub fn set_brush_width(&mut self, width: f64) {
        if width.is_finite() {
            self.brush_width = width.clamp(BRUSH_WIDTH_RANGE.0, BRUSH_WIDTH_RANGE.1);
        }
    }

    pub fn set_fps(&mut self, fps: u32) {
        self.fps = fps.clamp(FPS_RANGE.0, FPS_RANGE.1);
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }
}

impl From<&EditorConfig> for SessionSettings {
    fn from(config: &EditorConfig) -> Self {
        Self::new(config.brush_width, config.fps, config.color)
    }
}
