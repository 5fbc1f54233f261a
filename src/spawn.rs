//! Particle spawning.
//!
//! The [`Spawner`] writes new particles into the store at a round-robin
//! cursor. It never searches for a free slot: the next spawn always
//! overwrites the least recently spawned slot, live or not, so a spawn costs
//! O(1) and at most `capacity` particles are ever on screen.

use crate::config::Config;
use crate::store::ParticleStore;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Maximum distance between the spawn point and a new particle.
pub const SPAWN_JITTER: f32 = 30.0;
/// Slowest initial burst speed, surface units per nominal frame.
pub const MIN_BURST_SPEED: f32 = 0.5;
/// Fastest initial burst speed, surface units per nominal frame.
pub const MAX_BURST_SPEED: f32 = 1.5;

/// Round-robin particle spawner.
#[derive(Debug, Clone)]
pub struct Spawner {
    cursor: usize,
    size_range: (f32, f32),
    hue_range: (f32, f32),
    rng: SmallRng,
}

impl Spawner {
    /// Create a spawner drawing sizes and hues from `config`.
    ///
    /// The RNG is seeded from the OS; use [`Spawner::with_seed`] for
    /// reproducible runs.
    pub fn new(config: &Config) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// Create a spawner with a deterministic RNG.
    pub fn with_seed(config: &Config, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: &Config, rng: SmallRng) -> Self {
        Self {
            cursor: 0,
            size_range: (config.min_size, config.max_size),
            hue_range: (config.hue_range[0], config.hue_range[1]),
            rng,
        }
    }

    /// Slot the next spawn will overwrite.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Spawn one particle near `at` and return the advanced cursor.
    ///
    /// The particle lands at a random angle and distance (up to
    /// [`SPAWN_JITTER`]) from `at` and moves outward along that same angle.
    /// A zero-capacity store is left untouched.
    pub fn spawn(&mut self, store: &mut ParticleStore, at: Vec2) -> usize {
        let capacity = store.capacity();
        if capacity == 0 {
            return self.cursor;
        }
        debug_assert!(self.cursor < capacity, "spawn cursor out of range");

        let angle = self.rng.gen::<f32>() * TAU;
        let distance = self.rng.gen::<f32>() * SPAWN_JITTER;
        let direction = Vec2::from_angle(angle);

        let speed = MIN_BURST_SPEED + self.rng.gen::<f32>() * (MAX_BURST_SPEED - MIN_BURST_SPEED);
        let size = lerp_range(self.size_range, self.rng.gen());
        let hue = lerp_range(self.hue_range, self.rng.gen());

        store.write(self.cursor, at + direction * distance, direction * speed, size, hue);

        self.cursor = (self.cursor + 1) % capacity;
        self.cursor
    }

    /// Spawn `count` particles near `at`.
    pub fn spawn_burst(&mut self, store: &mut ParticleStore, at: Vec2, count: u32) -> usize {
        for _ in 0..count {
            self.spawn(store, at);
        }
        self.cursor
    }
}

#[inline]
fn lerp_range((min, max): (f32, f32), t: f32) -> f32 {
    min + t * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawner() -> Spawner {
        Spawner::with_seed(&Config::default(), 7)
    }

    #[test]
    fn test_spawn_writes_one_live_slot() {
        let mut store = ParticleStore::new(10);
        let mut spawner = spawner();
        let next = spawner.spawn(&mut store, Vec2::new(100.0, 100.0));

        assert_eq!(next, 1);
        assert_eq!(store.live_count(), 1);
        assert_eq!(store.lives()[0], 1.0);
        assert!(store.positions()[0].distance(Vec2::new(100.0, 100.0)) <= SPAWN_JITTER);
    }

    #[test]
    fn test_spawn_attributes_in_range() {
        let config = Config::default();
        let mut store = ParticleStore::new(64);
        let mut spawner = Spawner::with_seed(&config, 99);
        spawner.spawn_burst(&mut store, Vec2::ZERO, 64);

        for i in 0..64 {
            let speed = store.velocities()[i].length();
            assert!(speed >= MIN_BURST_SPEED - 1e-4 && speed <= MAX_BURST_SPEED + 1e-4);
            assert!(store.sizes()[i] >= config.min_size && store.sizes()[i] <= config.max_size);
            assert!(store.hues()[i] >= config.hue_range[0] && store.hues()[i] <= config.hue_range[1]);

            // Velocity points away from the spawn point
            let offset = store.positions()[i];
            if offset.length() > 1e-3 {
                assert!(offset.normalize().dot(store.velocities()[i].normalize()) > 0.999);
            }
        }
    }

    #[test]
    fn test_cursor_wraps_after_capacity() {
        let mut store = ParticleStore::new(5);
        let mut spawner = spawner();
        for expected in [1, 2, 3, 4, 0] {
            assert_eq!(spawner.spawn(&mut store, Vec2::ZERO), expected);
        }
        assert_eq!(store.live_count(), 5);

        // Next spawn overwrites the oldest slot
        store.place(0, Vec2::new(-999.0, 0.0), Vec2::ZERO, 0.2, 1.0, 0.0);
        spawner.spawn(&mut store, Vec2::ZERO);
        assert_eq!(store.lives()[0], 1.0);
        assert_eq!(store.live_count(), 5);
    }

    #[test]
    fn test_spawn_into_empty_store() {
        let mut store = ParticleStore::new(0);
        let mut spawner = spawner();
        assert_eq!(spawner.spawn(&mut store, Vec2::ZERO), 0);
        assert_eq!(spawner.spawn_burst(&mut store, Vec2::ZERO, 3), 0);
    }

    #[test]
    fn test_fixed_size_range() {
        let config = Config::new().with_size_range(2.0, 2.0);
        let mut store = ParticleStore::new(3);
        let mut spawner = Spawner::new(&config);
        spawner.spawn_burst(&mut store, Vec2::ZERO, 3);
        assert!(store.sizes().iter().all(|&s| s == 2.0));
    }
}
