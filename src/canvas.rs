//! Software raster surface.
//!
//! [`Canvas`] keeps a premultiplied RGBA pixel buffer and implements
//! [`Surface`] on the CPU. The window host uploads it to the GPU every frame;
//! the headless runner writes it out as a PNG.

use crate::surface::{Surface, Viewport};
use crate::visuals::{BlendMode, RadialGradient};
use glam::{Vec2, Vec4};
use std::path::Path;

/// CPU pixel buffer implementing [`Surface`].
///
/// Pixels are stored premultiplied, row-major, top-left origin. Drawing
/// coordinates are logical and scaled by the viewport's pixel ratio.
#[derive(Debug, Clone)]
pub struct Canvas {
    viewport: Viewport,
    width: u32,
    height: u32,
    pixels: Vec<Vec4>,
    blend_mode: BlendMode,
}

impl Canvas {
    /// Create a transparent canvas backing `viewport`.
    pub fn new(viewport: Viewport) -> Self {
        let (width, height) = viewport.physical_size();
        Self {
            viewport,
            width,
            height,
            pixels: vec![Vec4::ZERO; width as usize * height as usize],
            blend_mode: BlendMode::Alpha,
        }
    }

    /// Backing width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Backing height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied pixel at backing coordinates, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Vec4> {
        if x < self.width && y < self.height {
            self.pixels.get((y * self.width + x) as usize).copied()
        } else {
            None
        }
    }

    /// Premultiplied pixel under a logical point, if in range.
    pub fn pixel_at(&self, point: Vec2) -> Option<Vec4> {
        let scaled = point * self.viewport.pixel_ratio;
        if scaled.x < 0.0 || scaled.y < 0.0 {
            return None;
        }
        self.pixel(scaled.x as u32, scaled.y as u32)
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| *p == Vec4::ZERO)
    }

    /// Premultiplied RGBA8 bytes, for GPU upload.
    pub fn to_premultiplied_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for p in &self.pixels {
            bytes.extend_from_slice(&quantize(*p));
        }
        bytes
    }

    /// Straight-alpha RGBA8 image.
    pub fn to_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.width, self.height);
        for (dst, p) in img.pixels_mut().zip(&self.pixels) {
            let straight = if p.w > 0.0 {
                (p.truncate() / p.w).extend(p.w)
            } else {
                Vec4::ZERO
            };
            *dst = image::Rgba(quantize(straight));
        }
        img
    }

    /// Write the canvas as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_image().save(path)
    }
}

fn quantize(color: Vec4) -> [u8; 4] {
    let c = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0;
    [
        c.x.round() as u8,
        c.y.round() as u8,
        c.z.round() as u8,
        c.w.round() as u8,
    ]
}

impl Surface for Canvas {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.physical_size();
        self.viewport = viewport;
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width as usize * height as usize, Vec4::ZERO);
    }

    fn clear(&mut self) {
        self.pixels.fill(Vec4::ZERO);
    }

    fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    fn fill_radial(&mut self, center: Vec2, radius: f32, gradient: &RadialGradient) {
        let scale = self.viewport.pixel_ratio;
        let c = center * scale;
        let r = radius * scale;
        if r.is_nan() || r <= 0.0 || self.width == 0 || self.height == 0 {
            return;
        }

        // Pixel-center coverage over the clipped bounding box.
        let x0 = (c.x - r).floor().max(0.0) as u32;
        let y0 = (c.y - r).floor().max(0.0) as u32;
        let x1 = ((c.x + r).ceil().max(0.0) as u32).min(self.width);
        let y1 = ((c.y + r).ceil().max(0.0) as u32).min(self.height);

        let mode = self.blend_mode;
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = p.distance(c);
                if d > r {
                    continue;
                }
                let src = gradient.sample(d / r);
                let dst = &mut self.pixels[row + x as usize];
                *dst = mode.composite(src, *dst);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::Hsla;

    fn glow(alpha: f32) -> RadialGradient {
        RadialGradient::glow(Hsla::new(0.0, 100.0, 50.0, alpha))
    }

    #[test]
    fn test_canvas_scales_by_pixel_ratio() {
        let canvas = Canvas::new(Viewport::new(100.0, 50.0, 2.0));
        assert_eq!(canvas.width(), 200);
        assert_eq!(canvas.height(), 100);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_fill_radial_center_and_outside() {
        let mut canvas = Canvas::new(Viewport::new(40.0, 40.0, 1.0));
        canvas.fill_radial(Vec2::new(20.0, 20.0), 6.0, &glow(0.8));

        let center = canvas.pixel_at(Vec2::new(20.0, 20.0)).unwrap();
        assert!(center.w > 0.6);
        assert!(center.x > 0.6, "red hue should dominate");
        assert!(center.y < 0.01);

        let outside = canvas.pixel_at(Vec2::new(30.0, 20.0)).unwrap();
        assert_eq!(outside, Vec4::ZERO);
    }

    #[test]
    fn test_additive_overlap_brightens() {
        let mut single = Canvas::new(Viewport::new(20.0, 20.0, 1.0));
        single.fill_radial(Vec2::splat(10.0), 5.0, &glow(0.4));
        let once = single.pixel_at(Vec2::splat(10.0)).unwrap();

        let mut alpha = Canvas::new(Viewport::new(20.0, 20.0, 1.0));
        alpha.fill_radial(Vec2::splat(10.0), 5.0, &glow(0.4));
        alpha.fill_radial(Vec2::splat(10.0), 5.0, &glow(0.4));

        let mut additive = Canvas::new(Viewport::new(20.0, 20.0, 1.0));
        additive.set_blend_mode(BlendMode::Additive);
        additive.fill_radial(Vec2::splat(10.0), 5.0, &glow(0.4));
        additive.fill_radial(Vec2::splat(10.0), 5.0, &glow(0.4));

        let a = alpha.pixel_at(Vec2::splat(10.0)).unwrap();
        let b = additive.pixel_at(Vec2::splat(10.0)).unwrap();
        assert!(b.x > a.x);
        assert!((b.w - 2.0 * once.w).abs() < 1e-5);
        assert!((a.w - (once.w + once.w * (1.0 - once.w))).abs() < 1e-5);
    }

    #[test]
    fn test_clear_and_resize() {
        let mut canvas = Canvas::new(Viewport::new(10.0, 10.0, 1.0));
        canvas.fill_radial(Vec2::splat(5.0), 3.0, &glow(1.0));
        assert!(!canvas.is_blank());

        canvas.clear();
        assert!(canvas.is_blank());

        canvas.resize(Viewport::new(30.0, 20.0, 1.0));
        assert_eq!((canvas.width(), canvas.height()), (30, 20));
        assert_eq!(canvas.to_premultiplied_rgba8().len(), 30 * 20 * 4);
    }

    #[test]
    fn test_fill_partially_offscreen_is_clipped() {
        let mut canvas = Canvas::new(Viewport::new(10.0, 10.0, 1.0));
        canvas.fill_radial(Vec2::new(-2.0, -2.0), 5.0, &glow(1.0));
        canvas.fill_radial(Vec2::new(50.0, 50.0), 5.0, &glow(1.0));
        assert!(canvas.pixel(0, 0).unwrap().w > 0.0);
        assert!(canvas.pixel(9, 9).unwrap() == Vec4::ZERO);
    }

    #[test]
    fn test_to_image_unpremultiplies() {
        let mut canvas = Canvas::new(Viewport::new(4.0, 4.0, 1.0));
        canvas.fill_radial(Vec2::splat(2.0), 4.0, &glow(0.5));
        let img = canvas.to_image();
        let px = img.get_pixel(2, 2);
        // Straight red channel stays saturated even at half alpha
        assert!(px[0] > 240);
        assert!(px[3] < 200);
    }
}
