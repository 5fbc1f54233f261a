//! Visual primitives for particle rendering.
//!
//! This module holds the vocabulary shared by the renderer and every
//! [`Surface`](crate::surface::Surface) implementation: how a draw combines
//! with what is already on the surface ([`BlendMode`]), how a particle's color
//! is described ([`Hsla`]), and the soft-disc fill used for the glow look
//! ([`RadialGradient`]).
//!
//! # Usage
//!
//! ```ignore
//! let color = Hsla::new(240.0, 70.0, 60.0, 0.8);
//! let glow = RadialGradient::glow(color);
//!
//! surface.set_blend_mode(BlendMode::Additive);
//! surface.fill_radial(Vec2::new(100.0, 100.0), 4.0, &glow);
//! surface.set_blend_mode(BlendMode::Alpha);
//! ```

use glam::{Vec3, Vec4};

/// Blend mode for particle rendering.
///
/// Controls how particle colors combine with the surface contents and each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// Standard alpha blending (default).
    ///
    /// The incoming color is drawn over the destination according to its
    /// alpha ("source-over"). Other collaborators drawing on the same surface
    /// expect this mode.
    #[default]
    Alpha,

    /// Additive blending.
    ///
    /// Particle colors are added together, creating a glowing effect.
    /// Overlapping particles become brighter instead of hiding each other
    /// ("lighter").
    Additive,
}

impl BlendMode {
    /// Combine a premultiplied source color with a premultiplied destination.
    #[inline]
    pub fn composite(self, src: Vec4, dst: Vec4) -> Vec4 {
        match self {
            BlendMode::Alpha => src + dst * (1.0 - src.w),
            BlendMode::Additive => (src + dst).min(Vec4::ONE),
        }
    }
}

/// A color in hue / saturation / lightness / alpha form.
///
/// * `hue` - degrees, any value (wraps every 360)
/// * `saturation` - percent, 0 (gray) to 100 (vivid)
/// * `lightness` - percent, 0 (black) to 100 (white)
/// * `alpha` - 0.0 (transparent) to 1.0 (opaque)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub alpha: f32,
}

impl Hsla {
    pub fn new(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }

    /// Same color with a different alpha.
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Straight (non-premultiplied) RGB, each channel 0-1.
    pub fn to_rgb(self) -> Vec3 {
        hsl_to_rgb(
            self.hue,
            self.saturation / 100.0,
            self.lightness / 100.0,
        )
    }

    /// Premultiplied RGBA, each channel 0-1.
    pub fn to_premultiplied(self) -> Vec4 {
        let alpha = self.alpha.clamp(0.0, 1.0);
        (self.to_rgb() * alpha).extend(alpha)
    }
}

/// One stop of a [`RadialGradient`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    /// Position along the radius, 0.0 (center) to 1.0 (edge).
    pub offset: f32,
    pub color: Hsla,
}

/// Radial gradient filling a disc from its center outward.
///
/// Stops must be ordered by offset. Between two stops the premultiplied
/// colors are interpolated linearly; before the first stop and after the last
/// the end colors are held.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    stops: Vec<ColorStop>,
}

impl RadialGradient {
    /// Create a gradient from stops, sorting them by offset.
    pub fn new(mut stops: Vec<ColorStop>) -> Self {
        stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
        Self { stops }
    }

    /// The three-stop glow used for particles.
    ///
    /// Full alpha at the center, half at the midpoint, transparent at the edge.
    pub fn glow(color: Hsla) -> Self {
        Self {
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color,
                },
                ColorStop {
                    offset: 0.5,
                    color: color.with_alpha(color.alpha * 0.5),
                },
                ColorStop {
                    offset: 1.0,
                    color: color.with_alpha(0.0),
                },
            ],
        }
    }

    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }

    /// Premultiplied color at `t` (0.0 = center, 1.0 = edge).
    pub fn sample(&self, t: f32) -> Vec4 {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec4::ZERO,
        };

        if t <= first.offset {
            return first.color.to_premultiplied();
        }
        if t >= last.offset {
            return last.color.to_premultiplied();
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= f32::EPSILON {
                    return b.color.to_premultiplied();
                }
                let local = (t - a.offset) / span;
                return a
                    .color
                    .to_premultiplied()
                    .lerp(b.color.to_premultiplied(), local);
            }
        }

        last.color.to_premultiplied()
    }
}

/// Convert HSL to RGB.
///
/// * `hue` - degrees (wraps: red → yellow → green → cyan → blue → magenta → red)
/// * `s`, `l` - 0.0 to 1.0
pub fn hsl_to_rgb(hue: f32, s: f32, l: f32) -> Vec3 {
    let h = hue.rem_euclid(360.0) / 60.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsl_to_rgb_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 0.001);

        let green = hsl_to_rgb(120.0, 1.0, 0.5);
        assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 0.001);

        let blue = hsl_to_rgb(240.0, 1.0, 0.5);
        assert!((blue - Vec3::new(0.0, 0.0, 1.0)).length() < 0.001);

        // Hue wraps
        let wrapped = hsl_to_rgb(360.0 + 240.0, 1.0, 0.5);
        assert!((wrapped - blue).length() < 0.001);
    }

    #[test]
    fn test_hsl_gray_when_unsaturated() {
        let gray = hsl_to_rgb(250.0, 0.0, 0.6);
        assert!((gray - Vec3::splat(0.6)).length() < 0.001);
    }

    #[test]
    fn test_glow_gradient_stops() {
        let glow = RadialGradient::glow(Hsla::new(240.0, 70.0, 60.0, 0.8));
        let alphas: Vec<f32> = glow.stops().iter().map(|s| s.color.alpha).collect();
        assert_eq!(alphas, vec![0.8, 0.4, 0.0]);

        assert!((glow.sample(0.0).w - 0.8).abs() < 1e-6);
        assert!((glow.sample(0.25).w - 0.6).abs() < 1e-6);
        assert!((glow.sample(0.5).w - 0.4).abs() < 1e-6);
        assert!(glow.sample(1.0).w.abs() < 1e-6);
    }

    #[test]
    fn test_blend_modes() {
        let src = Vec4::new(0.3, 0.0, 0.0, 0.5);
        let dst = Vec4::new(0.0, 0.4, 0.0, 1.0);

        let over = BlendMode::Alpha.composite(src, dst);
        assert!((over - Vec4::new(0.3, 0.2, 0.0, 1.0)).length() < 1e-6);

        let added = BlendMode::Additive.composite(src, dst);
        assert!((added - Vec4::new(0.3, 0.4, 0.0, 1.0)).length() < 1e-6);

        // Additive saturates instead of overflowing
        let bright = Vec4::splat(0.8);
        assert_eq!(BlendMode::Additive.composite(bright, bright), Vec4::ONE);
    }
}
