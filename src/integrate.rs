//! Per-frame particle physics.
//!
//! Every term is scaled by the normalized delta time `dt` (elapsed time over
//! the nominal frame period, see [`FrameClock`](crate::time::FrameClock)), so
//! motion looks the same at 30, 60 or 144 Hz.
//!
//! Order of operations for each live particle:
//!
//! 1. pointer attraction with linear falloff: `(1 - d / radius) * strength * dt`
//! 2. gravity: `vy += gravity * dt`
//! 3. damping: `v *= friction^dt`
//! 4. position: `p += v * dt`
//! 5. fade: `life -= fade_rate * dt`, never below zero

use crate::config::Config;
use crate::input::PointerState;
use crate::store::ParticleStore;
use glam::Vec2;

/// Particles this close to the pointer get no attraction.
///
/// Keeps the direction `dx / d` away from a near-zero division.
pub const MIN_ATTRACTION_DISTANCE: f32 = 1.0;

/// Advances particle motion and life each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    pub friction: f32,
    pub gravity: f32,
    pub attraction: f32,
    pub radius: f32,
    pub fade_rate: f32,
}

impl Integrator {
    pub fn new(config: &Config) -> Self {
        Self {
            friction: config.friction,
            gravity: config.gravity,
            attraction: config.mouse_attraction,
            radius: config.mouse_radius,
            fade_rate: config.fade_rate,
        }
    }

    /// Velocity change from the pointer for a particle at `position`.
    ///
    /// Exactly zero when the pointer is inactive or the particle is outside
    /// the attraction radius.
    pub fn attraction(&self, position: Vec2, pointer: &PointerState, dt: f32) -> Vec2 {
        if !pointer.active {
            return Vec2::ZERO;
        }

        let delta = pointer.position - position;
        let dist = delta.length();
        if dist >= self.radius || dist <= MIN_ATTRACTION_DISTANCE {
            return Vec2::ZERO;
        }

        let force = (1.0 - dist / self.radius) * self.attraction;
        delta / dist * force * dt
    }

    /// Advance every live particle in `store` by one frame.
    pub fn advance(&self, store: &mut ParticleStore, dt: f32, pointer: &PointerState) {
        let damping = self.friction.powf(dt);
        let fade = self.fade_rate * dt;

        for i in 0..store.capacity() {
            if store.life[i] <= 0.0 {
                continue;
            }

            let position = store.position[i];
            let mut velocity = store.velocity[i];

            velocity += self.attraction(position, pointer, dt);
            velocity.y += self.gravity * dt;
            velocity *= damping;

            store.position[i] = position + velocity * dt;
            store.velocity[i] = velocity;
            store.life[i] = (store.life[i] - fade).max(0.0);
        }
    }
}
