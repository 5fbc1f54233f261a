//! Particle rendering.
//!
//! The [`Renderer`] repaints the whole surface every frame: clear to
//! transparent, draw every live particle as an additive soft disc, then put
//! the surface back into normal alpha blending for whoever draws next.
//!
//! This pass is also where particles die for leaving the surface. It reads
//! the surface's current bounds each frame, so after a resize particles are
//! judged against the new size, never a stale one.

use crate::config::Config;
use crate::store::ParticleStore;
use crate::surface::Surface;
use crate::visuals::{BlendMode, Hsla, RadialGradient};

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Particles drawn.
    pub drawn: usize,
    /// Particles killed for being outside the surface.
    pub culled: usize,
}

/// Draws the particle store onto a [`Surface`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renderer {
    pub saturation: f32,
    pub lightness: f32,
    pub max_opacity: f32,
    pub margin: f32,
}

impl Renderer {
    pub fn new(config: &Config) -> Self {
        Self {
            saturation: config.saturation,
            lightness: config.lightness,
            max_opacity: config.max_opacity,
            margin: config.offscreen_margin,
        }
    }

    /// Gradient for a particle with the given hue and remaining life.
    pub fn glow(&self, hue: f32, life: f32) -> RadialGradient {
        RadialGradient::glow(Hsla::new(
            hue,
            self.saturation,
            self.lightness,
            life * self.max_opacity,
        ))
    }

    /// Render every live particle, killing those outside the surface bounds.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, store: &mut ParticleStore) -> RenderStats {
        let viewport = surface.viewport();
        let mut stats = RenderStats::default();

        surface.clear();
        surface.set_blend_mode(BlendMode::Additive);

        for i in 0..store.capacity() {
            let life = store.life[i];
            if life <= 0.0 {
                continue;
            }

            let position = store.position[i];
            if !viewport.contains_with_margin(position, self.margin) {
                store.life[i] = 0.0;
                stats.culled += 1;
                continue;
            }

            let gradient = self.glow(store.hue[i], life);
            surface.fill_radial(position, store.size[i] * 2.0, &gradient);
            stats.drawn += 1;
        }

        surface.set_blend_mode(BlendMode::Alpha);
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::surface::Viewport;
    use glam::Vec2;

    fn setup() -> (Renderer, Canvas, ParticleStore) {
        (
            Renderer::new(&Config::default()),
            Canvas::new(Viewport::new(200.0, 100.0, 1.0)),
            ParticleStore::new(4),
        )
    }

    #[test]
    fn test_draws_live_and_restores_blend() {
        let (renderer, mut canvas, mut store) = setup();
        store.place(0, Vec2::new(50.0, 50.0), Vec2::ZERO, 1.0, 3.0, 240.0);

        let stats = renderer.draw(&mut canvas, &mut store);
        assert_eq!(stats, RenderStats { drawn: 1, culled: 0 });
        assert_eq!(canvas.blend_mode(), BlendMode::Alpha);

        let center = canvas.pixel_at(Vec2::new(50.0, 50.0)).unwrap();
        assert!(center.w > 0.5 && center.w <= 0.8 + 1e-6);
        // Blue-violet hue
        assert!(center.z > center.x && center.z > center.y);
    }

    #[test]
    fn test_dead_particles_not_drawn() {
        let (renderer, mut canvas, mut store) = setup();
        store.place(1, Vec2::new(50.0, 50.0), Vec2::ZERO, 0.0, 3.0, 240.0);
        let stats = renderer.draw(&mut canvas, &mut store);
        assert_eq!(stats.drawn, 0);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_offscreen_particles_killed() {
        let (renderer, mut canvas, mut store) = setup();
        store.place(0, Vec2::new(-10.5, 50.0), Vec2::ZERO, 1.0, 1.0, 0.0);
        store.place(1, Vec2::new(209.0, 50.0), Vec2::ZERO, 1.0, 1.0, 0.0);
        store.place(2, Vec2::new(100.0, 111.0), Vec2::ZERO, 1.0, 1.0, 0.0);

        let stats = renderer.draw(&mut canvas, &mut store);
        assert_eq!(stats, RenderStats { drawn: 1, culled: 2 });
        assert!(!store.is_alive(0));
        assert!(store.is_alive(1), "inside the margin");
        assert!(!store.is_alive(2));
    }

    #[test]
    fn test_clear_between_frames() {
        let (renderer, mut canvas, mut store) = setup();
        store.place(0, Vec2::new(50.0, 50.0), Vec2::ZERO, 1.0, 3.0, 240.0);
        renderer.draw(&mut canvas, &mut store);
        assert!(!canvas.is_blank());

        store.kill(0);
        renderer.draw(&mut canvas, &mut store);
        assert!(canvas.is_blank(), "no persistence between frames");
    }

    #[test]
    fn test_alpha_tracks_life() {
        let renderer = Renderer::new(&Config::default());
        let full = renderer.glow(230.0, 1.0);
        let half = renderer.glow(230.0, 0.5);
        assert!((full.stops()[0].color.alpha - 0.8).abs() < 1e-6);
        assert!((half.stops()[0].color.alpha - 0.4).abs() < 1e-6);
        assert!((half.stops()[1].color.alpha - 0.2).abs() < 1e-6);
    }
}
