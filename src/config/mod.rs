//! Configuration management for XR Stick Control
//!
//! Handles loading, parsing, and hot-reloading of YAML configuration files.
//! Every section is optional; an empty file yields the stock demo scene.

pub mod watcher;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::fs;

pub use watcher::ConfigWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub markers: MarkerConfig,
    #[serde(default)]
    pub room: RoomConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Target model configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ModelConfig {
    /// Path or URL of the binary glTF asset
    #[serde(default = "default_model_url")]
    pub url: String,
    /// Initial position, also restored on reset
    #[serde(default = "default_model_position")]
    pub position: Vec3,
    /// Initial uniform scale, also restored on reset
    #[serde(default = "default_model_scale")]
    pub scale: f32,
}

/// Indicator marker configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct MarkerConfig {
    #[serde(default = "default_right_anchor")]
    pub right_anchor: Vec3,
    #[serde(default = "default_left_anchor")]
    pub left_anchor: Vec3,
    #[serde(default = "default_marker_radius")]
    pub radius: f32,
    #[serde(default = "default_released_color")]
    pub released_color: u32,
    #[serde(default = "default_pressed_color")]
    pub pressed_color: u32,
}

/// Room boundary configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RoomConfig {
    #[serde(default = "default_room_extent")]
    pub width: f32,
    #[serde(default = "default_room_extent")]
    pub height: f32,
    #[serde(default = "default_room_extent")]
    pub depth: f32,
    /// Grid divisions along each axis
    #[serde(default = "default_room_segments")]
    pub segments: u32,
    #[serde(default = "default_room_center")]
    pub center: Vec3,
    #[serde(default = "default_room_color")]
    pub color: u32,
}

/// Stick-to-transform gains
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ControlsConfig {
    /// Scale change per frame at full deflection
    #[serde(default = "default_zoom_step")]
    pub zoom_step: f32,
    /// Rotation per frame at full deflection, in degrees
    #[serde(default = "default_rotate_step_deg")]
    pub rotate_step_deg: f32,
    /// Translation per frame at full deflection, in meters
    #[serde(default = "default_translate_step")]
    pub translate_step: f32,
}

/// Frame loop timing
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TimingConfig {
    /// How often input sources are reclassified
    #[serde(default = "default_classify_interval")]
    pub classify_interval_ms: u64,
    /// Display refresh rate the frame loop runs at
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            url: default_model_url(),
            position: default_model_position(),
            scale: default_model_scale(),
        }
    }
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            right_anchor: default_right_anchor(),
            left_anchor: default_left_anchor(),
            radius: default_marker_radius(),
            released_color: default_released_color(),
            pressed_color: default_pressed_color(),
        }
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width: default_room_extent(),
            height: default_room_extent(),
            depth: default_room_extent(),
            segments: default_room_segments(),
            center: default_room_center(),
            color: default_room_color(),
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            zoom_step: default_zoom_step(),
            rotate_step_deg: default_rotate_step_deg(),
            translate_step: default_translate_step(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            classify_interval_ms: default_classify_interval(),
            frame_rate_hz: default_frame_rate(),
        }
    }
}

impl TimingConfig {
    pub fn classify_interval(&self) -> Duration {
        Duration::from_millis(self.classify_interval_ms)
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate_hz.max(1)))
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config = Self::from_yaml(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path))?;

        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(contents: &str) -> Result<Self> {
        // An empty document parses as null, not as an empty mapping
        let config: AppConfig = if contents.trim().is_empty() {
            AppConfig::default()
        } else {
            serde_yaml::from_str(contents)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        if self.model.url.trim().is_empty() {
            anyhow::bail!("model.url cannot be empty");
        }
        if !(self.model.scale.is_finite() && self.model.scale > 0.0) {
            anyhow::bail!("model.scale must be a positive number (got {})", self.model.scale);
        }

        for (name, v) in [
            ("model.position", self.model.position),
            ("markers.right_anchor", self.markers.right_anchor),
            ("markers.left_anchor", self.markers.left_anchor),
            ("room.center", self.room.center),
        ] {
            if !v.is_finite() {
                anyhow::bail!("{} must be finite (got {:?})", name, v);
            }
        }

        if self.markers.radius <= 0.0 {
            anyhow::bail!("markers.radius must be positive");
        }

        for (name, extent) in [
            ("room.width", self.room.width),
            ("room.height", self.room.height),
            ("room.depth", self.room.depth),
        ] {
            if !(extent.is_finite() && extent > 0.0) {
                anyhow::bail!("{} must be positive (got {})", name, extent);
            }
        }
        if self.room.segments == 0 {
            anyhow::bail!("room.segments must be at least 1");
        }

        for (name, gain) in [
            ("controls.zoom_step", self.controls.zoom_step),
            ("controls.rotate_step_deg", self.controls.rotate_step_deg),
            ("controls.translate_step", self.controls.translate_step),
        ] {
            if !gain.is_finite() {
                anyhow::bail!("{} must be finite", name);
            }
        }
        // 1/scale stays above 1 below unit scale, so a step under 1 keeps zoom-out positive
        if !(0.0..1.0).contains(&self.controls.zoom_step) {
            anyhow::bail!(
                "controls.zoom_step must be in [0, 1) (got {})",
                self.controls.zoom_step
            );
        }

        if self.timing.classify_interval_ms == 0 {
            anyhow::bail!("timing.classify_interval_ms must be positive");
        }
        if self.timing.frame_rate_hz == 0 || self.timing.frame_rate_hz > 1000 {
            anyhow::bail!(
                "timing.frame_rate_hz must be in 1..=1000 (got {})",
                self.timing.frame_rate_hz
            );
        }

        Ok(())
    }
}

// Default value functions
fn default_model_url() -> String { "assets/snowman.glb".to_string() }
fn default_model_position() -> Vec3 { Vec3::new(0.0, 0.5, -1.0) }
fn default_model_scale() -> f32 { 1.0 }
fn default_right_anchor() -> Vec3 { Vec3::new(0.5, 1.6, -1.0) }
fn default_left_anchor() -> Vec3 { Vec3::new(-0.5, 1.6, -1.0) }
fn default_marker_radius() -> f32 { 0.1 }
fn default_released_color() -> u32 { 0x3333ff }
fn default_pressed_color() -> u32 { 0x33ff33 }
fn default_room_extent() -> f32 { 6.0 }
fn default_room_segments() -> u32 { 10 }
fn default_room_center() -> Vec3 { Vec3::new(0.0, 3.0, 0.0) }
fn default_room_color() -> u32 { 0x808080 }
fn default_zoom_step() -> f32 { 0.1 }
fn default_rotate_step_deg() -> f32 { 10.0 }
fn default_translate_step() -> f32 { 0.05 }
fn default_classify_interval() -> u64 { 200 }
fn default_frame_rate() -> u32 { 72 }
