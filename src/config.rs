//! Tunable parameters for a particle session.
//!
//! Every field has a default, so a config file only needs the values it
//! overrides:
//!
//! ```json
//! { "gravity": 0.03, "hue_range": [10.0, 50.0] }
//! ```
//!
//! Values are never rejected. [`Config::sanitized`] clamps anything out of
//! range to the nearest valid value and the session always runs on the
//! sanitized copy.

use crate::error::ConfigError;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;

/// Complete session configuration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Particle budget on standard devices.
    #[serde(deserialize_with = "clamped_count")]
    pub base_particle_count: usize,
    /// Particle budget on touch / small-screen devices.
    #[serde(deserialize_with = "clamped_count")]
    pub reduced_particle_count: usize,

    /// Velocity retained per nominal frame (0-1).
    pub friction: f32,
    /// Downward acceleration per nominal frame.
    pub gravity: f32,
    /// Attraction strength at the pointer itself.
    pub mouse_attraction: f32,
    /// Distance at which attraction falls to zero.
    pub mouse_radius: f32,

    pub min_size: f32,
    pub max_size: f32,
    /// Life lost per nominal frame.
    pub fade_rate: f32,
    /// Particles spawned per frame while the pointer is active.
    #[serde(deserialize_with = "clamped_count_u32")]
    pub spawn_rate: u32,

    /// Hue range in degrees, `[min, max]`.
    pub hue_range: [f32; 2],
    /// Saturation percent.
    pub saturation: f32,
    /// Lightness percent.
    pub lightness: f32,
    /// Alpha of a particle at full life.
    pub max_opacity: f32,

    /// How far outside the surface a particle may drift before it is killed.
    pub offscreen_margin: f32,
    /// Upper bound on the surface pixel ratio.
    pub max_pixel_ratio: f32,
    /// Minimum milliseconds between accepted pointer samples.
    pub throttle_ms: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_particle_count: 60,
            reduced_particle_count: 30,
            friction: 0.94,
            gravity: 0.015,
            mouse_attraction: 0.05,
            mouse_radius: 150.0,
            min_size: 1.0,
            max_size: 3.0,
            fade_rate: 0.025,
            spawn_rate: 1,
            hue_range: [220.0, 280.0], // Indigo to purple
            saturation: 70.0,
            lightness: 60.0,
            max_opacity: 0.8,
            offscreen_margin: 10.0,
            max_pixel_ratio: 2.0,
            throttle_ms: 16.0,
        }
    }
}

impl Config {
    /// Create a config with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Save the config to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Set the particle budgets for standard and constrained devices.
    pub fn with_particle_counts(mut self, base: usize, reduced: usize) -> Self {
        self.base_particle_count = base;
        self.reduced_particle_count = reduced;
        self
    }

    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set pointer attraction strength and radius.
    pub fn with_mouse(mut self, attraction: f32, radius: f32) -> Self {
        self.mouse_attraction = attraction;
        self.mouse_radius = radius;
        self
    }

    pub fn with_size_range(mut self, min: f32, max: f32) -> Self {
        self.min_size = min;
        self.max_size = max;
        self
    }

    pub fn with_fade_rate(mut self, fade_rate: f32) -> Self {
        self.fade_rate = fade_rate;
        self
    }

    pub fn with_spawn_rate(mut self, spawn_rate: u32) -> Self {
        self.spawn_rate = spawn_rate;
        self
    }

    pub fn with_hue_range(mut self, min: f32, max: f32) -> Self {
        self.hue_range = [min, max];
        self
    }

    /// Set saturation and lightness percentages.
    pub fn with_color(mut self, saturation: f32, lightness: f32) -> Self {
        self.saturation = saturation;
        self.lightness = lightness;
        self
    }

    pub fn with_max_opacity(mut self, max_opacity: f32) -> Self {
        self.max_opacity = max_opacity;
        self
    }

    pub fn with_throttle_ms(mut self, throttle_ms: f32) -> Self {
        self.throttle_ms = throttle_ms;
        self
    }

    /// Copy of this config with every value clamped into its valid range.
    ///
    /// Non-finite values fall back to the default for that field.
    pub fn sanitized(&self) -> Self {
        let d = Self::default();
        let mut c = self.clone();

        c.friction = clamp_field("friction", c.friction, d.friction, 0.0, 1.0);
        c.gravity = finite_field("gravity", c.gravity, d.gravity);
        c.mouse_attraction = finite_field("mouse_attraction", c.mouse_attraction, d.mouse_attraction);
        c.mouse_radius = clamp_field("mouse_radius", c.mouse_radius, d.mouse_radius, 0.0, f32::MAX);
        c.min_size = clamp_field("min_size", c.min_size, d.min_size, 0.0, f32::MAX);
        c.max_size = clamp_field("max_size", c.max_size, d.max_size, 0.0, f32::MAX);
        if c.max_size < c.min_size {
            warn!(
                "max_size {} is below min_size {}, raising it to match",
                c.max_size, c.min_size
            );
            c.max_size = c.min_size;
        }
        c.fade_rate = clamp_field("fade_rate", c.fade_rate, d.fade_rate, 0.0, f32::MAX);

        let lo = finite_field("hue_range[0]", c.hue_range[0], d.hue_range[0]);
        let hi = finite_field("hue_range[1]", c.hue_range[1], d.hue_range[1]);
        if hi < lo {
            warn!("hue_range [{lo}, {hi}] is reversed, raising the upper bound to match");
        }
        c.hue_range = [lo, hi.max(lo)];

        c.saturation = clamp_field("saturation", c.saturation, d.saturation, 0.0, 100.0);
        c.lightness = clamp_field("lightness", c.lightness, d.lightness, 0.0, 100.0);
        c.max_opacity = clamp_field("max_opacity", c.max_opacity, d.max_opacity, 0.0, 1.0);
        c.offscreen_margin = clamp_field("offscreen_margin", c.offscreen_margin, d.offscreen_margin, 0.0, f32::MAX);
        c.max_pixel_ratio = clamp_field("max_pixel_ratio", c.max_pixel_ratio, d.max_pixel_ratio, 1.0, f32::MAX);
        c.throttle_ms = clamp_field("throttle_ms", c.throttle_ms, d.throttle_ms, 0.0, f32::MAX);

        c
    }
}

fn finite_field(name: &str, value: f32, default: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        warn!("{name} is not a finite number, using default {default}");
        default
    }
}

fn clamp_field(name: &str, value: f32, default: f32, min: f32, max: f32) -> f32 {
    let value = finite_field(name, value, default);
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}

/// Accept any integer for a count, clamping negatives to zero.
fn clamped_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    if raw < 0 {
        warn!("negative particle count {raw} clamped to 0");
    }
    Ok(usize::try_from(raw.max(0)).unwrap_or(usize::MAX))
}

fn clamped_count_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    if raw < 0 {
        warn!("negative spawn rate {raw} clamped to 0");
    }
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}
