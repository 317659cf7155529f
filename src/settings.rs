//! Tunable simulation parameters.
//!
//! Everything the settings panel can change lives in [`Settings`]. The same
//! struct is what gets read from (and written to) a JSON settings file, so a
//! session can be started with a known configuration:
//!
//! ```json
//! { "gravity": 4.0, "ball_count": 49, "radius": 8 }
//! ```
//!
//! Missing fields fall back to their defaults and every value is clamped into
//! the range its slider allows.

use std::ops::RangeInclusive;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::ball::Rgba;
use crate::error::SettingsError;

/// Top-left corner of the container, in window pixels.
pub const CONTAINER_ORIGIN: Vec2 = Vec2::new(300.0, 300.0);

/// Center of the first ball laid out by a respawn.
pub const SPAWN_ORIGIN: Vec2 = Vec2::new(320.0, 320.0);

/// Fraction of speed kept when a ball bounces off a wall.
pub const RESTITUTION: f32 = 0.8;

/// Window clear color.
pub const BACKGROUND: Rgba = Rgba::rgb(20, 20, 20);

/// Container outline color.
pub const OUTLINE: Rgba = Rgba::rgb(255, 255, 255);

pub const GRAVITY_RANGE: RangeInclusive<f32> = 0.0..=20.0;
pub const GRAVITY_STEP: f64 = 0.1;

pub const BALL_COUNT_RANGE: RangeInclusive<usize> = 1..=100;

pub const SPACING_RANGE: RangeInclusive<f32> = 0.0..=20.0;
pub const SPACING_STEP: f64 = 0.1;

pub const RADIUS_RANGE: RangeInclusive<i32> = 5..=30;

pub const CONTAINER_RANGE: RangeInclusive<i32> = 200..=700;
pub const CONTAINER_STEP: f64 = 10.0;

/// Simulation parameters exposed in the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Downward acceleration, in pixels per frame per second.
    pub gravity: f32,
    /// Number of balls spawned by a respawn.
    pub ball_count: usize,
    /// Gap between neighbouring balls in the spawn grid, in pixels.
    pub spacing: f32,
    /// Ball radius in pixels.
    pub radius: i32,
    /// Inner width of the container in pixels.
    pub container_width: i32,
    /// Inner height of the container in pixels.
    pub container_height: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            ball_count: 10,
            spacing: 5.0,
            radius: 15,
            container_width: 600,
            container_height: 600,
        }
    }
}

impl Settings {
    /// Force every field into the range its slider allows.
    ///
    /// Non-finite floats are replaced by their default value.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        Self {
            gravity: clamp_f32(self.gravity, GRAVITY_RANGE, defaults.gravity),
            ball_count: self
                .ball_count
                .clamp(*BALL_COUNT_RANGE.start(), *BALL_COUNT_RANGE.end()),
            spacing: clamp_f32(self.spacing, SPACING_RANGE, defaults.spacing),
            radius: self.radius.clamp(*RADIUS_RANGE.start(), *RADIUS_RANGE.end()),
            container_width: self
                .container_width
                .clamp(*CONTAINER_RANGE.start(), *CONTAINER_RANGE.end()),
            container_height: self
                .container_height
                .clamp(*CONTAINER_RANGE.start(), *CONTAINER_RANGE.end()),
        }
    }

    /// True when the radius or the container size differs.
    ///
    /// These changes are applied to the existing balls in place.
    pub fn geometry_changed(&self, other: &Settings) -> bool {
        self.radius != other.radius
            || self.container_width != other.container_width
            || self.container_height != other.container_height
    }

    /// True when the ball count or the grid spacing differs.
    ///
    /// These changes require a fresh spawn grid.
    pub fn layout_changed(&self, other: &Settings) -> bool {
        self.ball_count != other.ball_count || self.spacing != other.spacing
    }

    /// Container size as a vector.
    pub fn container_size(&self) -> Vec2 {
        Vec2::new(self.container_width as f32, self.container_height as f32)
    }

    /// Read settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings.clamped())
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

fn clamp_f32(value: f32, range: RangeInclusive<f32>, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(*range.start(), *range.end())
    } else {
        fallback
    }
}
