//! Frame timing for the session loop.
//!
//! Timestamps come from the host (the window host passes time since it
//! started, the headless runner passes its simulated or real clock), so the
//! clock itself never reads the system time and is fully deterministic under
//! test.
//!
//! # Example
//!
//! ```ignore
//! use glowdust::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame callback:
//! let dt = clock.tick(timestamp);
//!
//! println!("Delta factor: {:.2}", dt);
//! println!("Frame: {}", clock.frame());
//! println!("FPS: {:.1}", clock.fps());
//! ```

use std::time::Duration;

/// Frame period the physics constants are tuned for (~60 updates per second).
pub const NOMINAL_FRAME: Duration = Duration::from_micros(16_670);

/// Largest normalized delta a single frame may advance by.
pub const MAX_DELTA_FACTOR: f32 = 2.0;

/// Normalize an elapsed duration against [`NOMINAL_FRAME`], clamped to
/// `[0, MAX_DELTA_FACTOR]`.
#[inline]
pub fn delta_factor(elapsed: Duration) -> f32 {
    (elapsed.as_secs_f32() / NOMINAL_FRAME.as_secs_f32()).clamp(0.0, MAX_DELTA_FACTOR)
}

/// Frame clock tracking delta time, frame count and FPS.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous frame.
    last_frame: Option<Duration>,
    /// Raw time since the previous frame.
    delta: Duration,
    /// Clamped, normalized delta of the last tick.
    delta_factor: f32,
    /// Total frames ticked.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Option<Duration>,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameClock {
    /// Create a clock that has not seen a frame yet.
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta: Duration::ZERO,
            delta_factor: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: None,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Advance to `timestamp` and return the normalized delta factor.
    ///
    /// The first tick uses [`NOMINAL_FRAME`] as its elapsed time. A timestamp
    /// earlier than the previous one counts as zero elapsed time.
    pub fn tick(&mut self, timestamp: Duration) -> f32 {
        self.delta = match self.last_frame {
            Some(last) => timestamp.saturating_sub(last),
            None => NOMINAL_FRAME,
        };
        self.last_frame = Some(timestamp);
        self.delta_factor = delta_factor(self.delta);
        self.frame_count += 1;

        match self.fps_update_time {
            None => {
                self.fps_update_time = Some(timestamp);
                self.fps_frame_count = self.frame_count;
            }
            Some(since) => {
                let window = timestamp.saturating_sub(since);
                if window >= self.fps_update_interval {
                    let frames = self.frame_count - self.fps_frame_count;
                    self.fps = frames as f32 / window.as_secs_f32();
                    self.fps_frame_count = self.frame_count;
                    self.fps_update_time = Some(timestamp);
                }
            }
        }

        self.delta_factor
    }

    /// Raw time between the last two frames.
    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Normalized delta of the last tick.
    #[inline]
    pub fn delta_factor(&self) -> f32 {
        self.delta_factor
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_first_frame_uses_nominal_period() {
        let mut clock = FrameClock::new();
        let dt = clock.tick(ms(5_000));
        assert!((dt - 1.0).abs() < 1e-6);
        assert_eq!(clock.delta(), NOMINAL_FRAME);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_delta_normalized() {
        let mut clock = FrameClock::new();
        clock.tick(ms(0));
        let dt = clock.tick(Duration::from_micros(8_335));
        assert!((dt - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_stall_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(ms(0));
        // Backgrounded for ten seconds
        assert_eq!(clock.tick(ms(10_000)), MAX_DELTA_FACTOR);
    }

    #[test]
    fn test_backwards_timestamp_is_zero() {
        let mut clock = FrameClock::new();
        clock.tick(ms(100));
        assert_eq!(clock.tick(ms(50)), 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut clock = FrameClock::new();
        for i in 0..=60 {
            clock.tick(Duration::from_micros(i * 10_000));
        }
        // 100 Hz ticks
        assert!((clock.fps() - 100.0).abs() < 1.0);
    }
}
