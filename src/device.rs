//! Device capability heuristics.
//!
//! A session picks its particle budget once, at start, from a coarse guess at
//! how capable the device is.

use crate::config::Config;
use crate::surface::Viewport;

/// Viewports narrower than this (logical units) count as small screens.
pub const SMALL_SCREEN_WIDTH: f32 = 768.0;

/// What the host knows about the device at session start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviceProfile {
    /// Primary input is touch (coarse pointer).
    pub touch: bool,
    /// Host viewport the surface should fill.
    pub viewport: Viewport,
}

impl DeviceProfile {
    pub fn new(viewport: Viewport, touch: bool) -> Self {
        Self { touch, viewport }
    }

    pub fn class(&self) -> DeviceClass {
        DeviceClass::detect(self)
    }
}

/// Capability tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    /// Touch-first or small-screen devices; runs the reduced budget.
    Constrained,
    /// Everything else.
    Standard,
}

impl DeviceClass {
    pub fn detect(profile: &DeviceProfile) -> Self {
        if profile.touch || profile.viewport.width < SMALL_SCREEN_WIDTH {
            DeviceClass::Constrained
        } else {
            DeviceClass::Standard
        }
    }

    /// Particle capacity for this tier.
    pub fn particle_budget(self, config: &Config) -> usize {
        match self {
            DeviceClass::Constrained => config.reduced_particle_count,
            DeviceClass::Standard => config.base_particle_count,
        }
    }
}
