//! Fixed-capacity particle pool.
//!
//! Particles live in a structure-of-arrays layout: one column per field, each
//! `capacity` long. Per-frame passes walk a column linearly instead of
//! striding over whole records.
//!
//! # Slots
//!
//! | Column | Type | Description |
//! |--------|------|-------------|
//! | `position` | `Vec2` | surface coordinates |
//! | `velocity` | `Vec2` | surface units per nominal frame |
//! | `life` | `f32` | 0 = dead, (0, 1] = alive, decays every frame |
//! | `size` | `f32` | radius seed, fixed at spawn |
//! | `hue` | `f32` | color angle in degrees, fixed at spawn |
//!
//! Slots are never created or freed after construction. Spawning overwrites a
//! slot; dying only sets its life to zero.

use glam::Vec2;

/// Structure-of-arrays particle storage with a capacity fixed at construction.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    pub(crate) position: Vec<Vec2>,
    pub(crate) velocity: Vec<Vec2>,
    pub(crate) life: Vec<f32>,
    pub(crate) size: Vec<f32>,
    pub(crate) hue: Vec<f32>,
}

impl ParticleStore {
    /// Create a store with `capacity` slots, all dead.
    pub fn new(capacity: usize) -> Self {
        Self {
            position: vec![Vec2::ZERO; capacity],
            velocity: vec![Vec2::ZERO; capacity],
            life: vec![0.0; capacity],
            size: vec![0.0; capacity],
            hue: vec![0.0; capacity],
        }
    }

    /// Number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.life.len()
    }

    /// Whether slot `index` holds a live particle.
    #[inline]
    pub fn is_alive(&self, index: usize) -> bool {
        self.life[index] > 0.0
    }

    /// Number of live particles.
    pub fn live_count(&self) -> usize {
        self.life.iter().filter(|&&l| l > 0.0).count()
    }

    /// Mark slot `index` dead.
    #[inline]
    pub fn kill(&mut self, index: usize) {
        self.life[index] = 0.0;
    }

    /// Overwrite slot `index` with a freshly spawned particle.
    pub(crate) fn write(&mut self, index: usize, position: Vec2, velocity: Vec2, size: f32, hue: f32) {
        self.position[index] = position;
        self.velocity[index] = velocity;
        self.life[index] = 1.0;
        self.size[index] = size;
        self.hue[index] = hue;
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.position
    }

    pub fn velocities(&self) -> &[Vec2] {
        &self.velocity
    }

    pub fn lives(&self) -> &[f32] {
        &self.life
    }

    pub fn sizes(&self) -> &[f32] {
        &self.size
    }

    pub fn hues(&self) -> &[f32] {
        &self.hue
    }

    /// Iterate the indices of live slots.
    pub fn live_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.life
            .iter()
            .enumerate()
            .filter(|(_, &l)| l > 0.0)
            .map(|(i, _)| i)
    }

    /// Place a particle with explicit kinematic state and life.
    ///
    /// Intended for hosts and tests that need a known configuration; `life`
    /// is clamped into [0, 1].
    pub fn place(&mut self, index: usize, position: Vec2, velocity: Vec2, life: f32, size: f32, hue: f32) {
        self.write(index, position, velocity, size, hue);
        self.life[index] = life.clamp(0.0, 1.0);
    }
}
