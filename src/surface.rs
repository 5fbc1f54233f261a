//! The drawable surface the renderer paints onto.
//!
//! A surface is owned by the host and handed to a [`Session`](crate::Session)
//! at start. All coordinates crossing this boundary are *logical* surface
//! units (the same space pointer samples arrive in); an implementation maps
//! them onto its backing pixels using the viewport's pixel ratio.

use crate::visuals::{BlendMode, RadialGradient};
use glam::Vec2;

/// Logical size of a surface plus the pixel density it is backed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical units.
    pub width: f32,
    /// Height in logical units.
    pub height: f32,
    /// Backing pixels per logical unit.
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            pixel_ratio: if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
                pixel_ratio
            } else {
                1.0
            },
        }
    }

    /// Same viewport with the pixel ratio capped at `max_ratio`.
    pub fn with_max_pixel_ratio(self, max_ratio: f32) -> Self {
        Self {
            pixel_ratio: self.pixel_ratio.min(max_ratio.max(f32::MIN_POSITIVE)),
            ..self
        }
    }

    /// Logical size as a vector.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Size of the backing pixel buffer.
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.height * self.pixel_ratio).round() as u32,
        )
    }

    /// Whether `point` lies within the bounds grown by `margin` on every side.
    #[inline]
    pub fn contains_with_margin(&self, point: Vec2, margin: f32) -> bool {
        point.x >= -margin
            && point.x <= self.width + margin
            && point.y >= -margin
            && point.y <= self.height + margin
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0, 1.0)
    }
}

fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// A 2D drawing target supporting the operations the particle renderer needs.
pub trait Surface {
    /// Current logical size and pixel ratio.
    fn viewport(&self) -> Viewport;

    /// Re-size the surface. Called when the host viewport changes.
    ///
    /// Contents after a resize are unspecified; the next frame clears anyway.
    fn resize(&mut self, viewport: Viewport);

    /// Clear the whole surface to transparent.
    fn clear(&mut self);

    /// Current compositing mode.
    fn blend_mode(&self) -> BlendMode;

    /// Switch the compositing mode used by subsequent fills.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Fill the disc at `center` with `radius`, shaded by `gradient`.
    fn fill_radial(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient);
}
