//! Window-less session driver.
//!
//! [`HeadlessRunner`] is a single logical task: it runs a frame, then sleeps
//! until the next tick is due. With `realtime(false)` it skips the sleeping
//! and feeds the session evenly spaced timestamps instead, which is what
//! snapshots and tests want.

use crate::session::{FrameOutcome, Session};
use crate::surface::Surface;
use crate::time::NOMINAL_FRAME;
use log::debug;
use std::thread;
use std::time::{Duration, Instant};

/// Drives a [`Session`] without a window.
#[derive(Debug, Clone)]
pub struct HeadlessRunner {
    tick: Duration,
    realtime: bool,
}

impl HeadlessRunner {
    /// Runner ticking at the nominal frame period, in real time.
    pub fn new() -> Self {
        Self {
            tick: NOMINAL_FRAME,
            realtime: true,
        }
    }

    /// Set the tick interval.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Sleep between frames (`true`) or simulate time (`false`).
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Run up to `frames` frames, calling `before_frame` with the frame index
    /// ahead of each one. Stops early once the session no longer wants frames.
    ///
    /// Returns the number of frames that rendered.
    pub fn run<S, F>(&self, session: &mut Session<S>, frames: u32, mut before_frame: F) -> u32
    where
        S: Surface,
        F: FnMut(u32, &mut Session<S>),
    {
        let started = Instant::now();
        let mut rendered = 0;

        for index in 0..frames {
            if !session.frame_pending() {
                break;
            }

            let scheduled = self.tick * index;
            let timestamp = if self.realtime {
                let now = started.elapsed();
                if let Some(wait) = scheduled.checked_sub(now) {
                    thread::sleep(wait);
                }
                started.elapsed()
            } else {
                scheduled
            };

            before_frame(index, session);
            if let FrameOutcome::Rendered(_) = session.frame(timestamp) {
                rendered += 1;
            }
        }

        debug!("headless run finished: {rendered}/{frames} frames rendered");
        rendered
    }
}

impl Default for HeadlessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::config::Config;
    use crate::device::DeviceProfile;
    use crate::surface::Viewport;

    fn session() -> Session<Canvas> {
        let vp = Viewport::new(320.0, 240.0, 1.0);
        let mut session = Session::with_seed(Config::default(), 11);
        session.start(Canvas::new(vp), &DeviceProfile::new(vp, false));
        session
    }

    #[test]
    fn test_simulated_run() {
        let mut session = session();
        let runner = HeadlessRunner::new().realtime(false);
        let rendered = runner.run(&mut session, 30, |_, s| s.set_pointer_position(160.0, 120.0));

        assert_eq!(rendered, 30);
        assert_eq!(session.clock().frame(), 30);
        assert!(session.store().unwrap().live_count() > 0);
        assert!(!session.surface().unwrap().is_blank());
    }

    #[test]
    fn test_stops_when_session_stops() {
        let mut session = session();
        let runner = HeadlessRunner::new().realtime(false);
        let rendered = runner.run(&mut session, 10, |i, s| {
            if i == 4 {
                s.stop();
            }
        });
        assert_eq!(rendered, 4);
    }

    #[test]
    fn test_realtime_run_sleeps() {
        let mut session = session();
        let runner = HeadlessRunner::new()
            .with_tick(Duration::from_millis(5))
            .realtime(true);
        let started = Instant::now();
        runner.run(&mut session, 4, |_, _| {});
        assert!(started.elapsed() >= Duration::from_millis(15));
    }
}
