//! Session lifecycle and the per-frame loop.
//!
//! A [`Session`] owns everything one mounted effect needs: the particle
//! store, the spawner and its cursor, the pointer sample, the frame clock and
//! the surface. Nothing is global, so several sessions can run side by side.
//!
//! ```text
//! Uninitialized ──start()──▶ Running ──stop()──▶ Stopped
//! ```
//!
//! `Running` reschedules itself after every frame until `stop()`. `Stopped`
//! is terminal; a new effect needs a new session.
//!
//! # Example
//!
//! ```ignore
//! let mut session = Session::new(Config::default());
//! session.start(Canvas::new(viewport), &DeviceProfile::new(viewport, false));
//!
//! // host frame callback
//! while session.frame_pending() {
//!     session.frame(timestamp);
//! }
//!
//! session.stop();
//! ```

use crate::config::Config;
use crate::device::DeviceProfile;
use crate::input::{InputEvent, InputThrottle, PointerState};
use crate::integrate::Integrator;
use crate::render::{RenderStats, Renderer};
use crate::spawn::Spawner;
use crate::store::ParticleStore;
use crate::surface::{Surface, Viewport};
use crate::time::FrameClock;
use glam::Vec2;
use log::{debug, trace, warn};
use std::time::Duration;

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Running,
    Stopped,
}

/// Result of a [`Session::frame`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame ran and the surface was repainted.
    Rendered(RenderStats),
    /// The surface is unavailable; the frame did nothing but stays scheduled.
    Skipped,
    /// No frame was pending (not started or already stopped).
    Idle,
}

/// One mounted particle effect.
pub struct Session<S: Surface> {
    config: Config,
    state: SessionState,
    seed: Option<u64>,

    store: Option<ParticleStore>,
    spawner: Option<Spawner>,
    integrator: Integrator,
    renderer: Renderer,

    pointer: PointerState,
    throttle: InputThrottle,
    clock: FrameClock,

    surface: Option<S>,
    viewport: Viewport,

    listening: bool,
    frame_pending: bool,
}

impl<S: Surface> Session<S> {
    /// Create a session. The config is sanitized here.
    pub fn new(config: Config) -> Self {
        let config = config.sanitized();
        Self {
            integrator: Integrator::new(&config),
            renderer: Renderer::new(&config),
            throttle: InputThrottle::from_millis(config.throttle_ms),
            config,
            state: SessionState::Uninitialized,
            seed: None,
            store: None,
            spawner: None,
            pointer: PointerState::default(),
            clock: FrameClock::new(),
            surface: None,
            viewport: Viewport::default(),
            listening: false,
            frame_pending: false,
        }
    }

    /// Create a session whose spawns are reproducible.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        let mut session = Self::new(config);
        session.seed = Some(seed);
        session
    }

    /// Mount the effect on `surface`.
    ///
    /// Picks the particle budget from `device`, sizes the surface to the
    /// device viewport (pixel ratio capped), starts listening for input and
    /// schedules the first frame. Returns `false` and does nothing unless the
    /// session is still `Uninitialized`.
    pub fn start(&mut self, surface: S, device: &DeviceProfile) -> bool {
        if self.state != SessionState::Uninitialized {
            warn!("start() ignored: session is {:?}", self.state);
            return false;
        }

        let class = device.class();
        let capacity = class.particle_budget(&self.config);
        self.store = Some(ParticleStore::new(capacity));
        self.spawner = Some(match self.seed {
            Some(seed) => Spawner::with_seed(&self.config, seed),
            None => Spawner::new(&self.config),
        });

        self.viewport = device.viewport.with_max_pixel_ratio(self.config.max_pixel_ratio);
        let mut surface = surface;
        surface.resize(self.viewport);
        self.surface = Some(surface);

        self.listening = true;
        self.frame_pending = true;
        self.state = SessionState::Running;

        debug!(
            "session started: {:?} device, {} particles, {}x{} @{}x",
            class, capacity, self.viewport.width, self.viewport.height, self.viewport.pixel_ratio
        );
        true
    }

    /// Tear the effect down. Safe to call in any state, any number of times.
    pub fn stop(&mut self) {
        if self.state == SessionState::Running {
            debug!("session stopped after {} frames", self.clock.frame());
        }
        self.listening = false;
        self.frame_pending = false;
        self.store = None;
        self.spawner = None;
        self.surface = None;
        self.pointer = PointerState::default();
        if self.state != SessionState::Uninitialized {
            self.state = SessionState::Stopped;
        }
    }

    /// Feed one input sample taken at `now`.
    ///
    /// Move samples inside the throttle interval are dropped. Returns whether
    /// the sample changed the pointer state.
    pub fn handle_input(&mut self, event: InputEvent, now: Duration) -> bool {
        if !self.listening {
            return false;
        }
        if event.is_move() && !self.throttle.accept(now) {
            trace!("input sample throttled");
            return false;
        }
        event.apply(&mut self.pointer);
        true
    }

    /// Force the pointer to `(x, y)` and mark it active.
    pub fn set_pointer_position(&mut self, x: f32, y: f32) {
        self.pointer.position = Vec2::new(x, y);
        self.pointer.active = true;
    }

    /// Force pointer activity on or off.
    pub fn set_pointer_active(&mut self, active: bool) {
        self.pointer.active = active;
    }

    /// The host viewport changed.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport.with_max_pixel_ratio(self.config.max_pixel_ratio);
        if let Some(surface) = self.surface.as_mut() {
            surface.resize(self.viewport);
        }
    }

    /// Take the surface away, as when the host removes it mid-session.
    ///
    /// Frames no-op until [`Session::attach_surface`] provides a new one.
    pub fn detach_surface(&mut self) -> Option<S> {
        self.surface.take()
    }

    /// Provide a surface for a running session, sized to the current viewport.
    pub fn attach_surface(&mut self, mut surface: S) {
        if self.state != SessionState::Running {
            warn!("attach_surface() ignored: session is {:?}", self.state);
            return;
        }
        surface.resize(self.viewport);
        self.surface = Some(surface);
    }

    /// Run one frame: spawn, integrate, render, reschedule.
    pub fn frame(&mut self, timestamp: Duration) -> FrameOutcome {
        if self.state != SessionState::Running || !self.frame_pending {
            return FrameOutcome::Idle;
        }

        let (Some(store), Some(spawner), Some(surface)) =
            (self.store.as_mut(), self.spawner.as_mut(), self.surface.as_mut())
        else {
            trace!("frame skipped: no surface");
            return FrameOutcome::Skipped;
        };

        let dt = self.clock.tick(timestamp);

        if self.pointer.active {
            spawner.spawn_burst(store, self.pointer.position, self.config.spawn_rate);
        }
        self.integrator.advance(store, dt, &self.pointer);
        let stats = self.renderer.draw(surface, store);

        // Running sessions always have their next frame queued.
        self.frame_pending = true;
        FrameOutcome::Rendered(stats)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Option<&ParticleStore> {
        self.store.as_ref()
    }

    /// Mutable store access for hosts driving particles directly.
    pub fn store_mut(&mut self) -> Option<&mut ParticleStore> {
        self.store.as_mut()
    }

    pub fn spawn_cursor(&self) -> Option<usize> {
        self.spawner.as_ref().map(Spawner::cursor)
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Whether input events are currently accepted.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Whether the host should deliver another frame.
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0, 1.0)
    }

    fn running() -> Session<Canvas> {
        let mut session = Session::with_seed(Config::default(), 1);
        assert!(session.start(Canvas::new(viewport()), &DeviceProfile::new(viewport(), false)));
        session
    }

    #[test]
    fn test_lifecycle_states() {
        let mut session: Session<Canvas> = Session::new(Config::default());
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(session.frame(Duration::ZERO), FrameOutcome::Idle);

        session.start(Canvas::new(viewport()), &DeviceProfile::new(viewport(), false));
        assert_eq!(session.state(), SessionState::Running);
        assert!(session.frame_pending());
        assert!(session.is_listening());
        assert_eq!(session.store().map(ParticleStore::capacity), Some(60));

        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
        assert!(session.store().is_none());
        assert_eq!(session.frame(Duration::from_millis(16)), FrameOutcome::Idle);
    }

    #[test]
    fn test_stopped_is_terminal() {
        let mut session = running();
        session.stop();
        assert!(!session.start(Canvas::new(viewport()), &DeviceProfile::new(viewport(), false)));
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn test_start_twice_ignored() {
        let mut session = running();
        assert!(!session.start(Canvas::new(viewport()), &DeviceProfile::new(viewport(), true)));
        assert_eq!(session.store().map(ParticleStore::capacity), Some(60));
    }

    #[test]
    fn test_constrained_device_budget_and_pixel_cap() {
        let mut session: Session<Canvas> = Session::new(Config::default());
        let vp = Viewport::new(390.0, 844.0, 3.0);
        session.start(Canvas::new(vp), &DeviceProfile::new(vp, true));

        assert_eq!(session.store().map(ParticleStore::capacity), Some(30));
        assert_eq!(session.viewport().pixel_ratio, 2.0);
        let canvas = session.surface().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (780, 1688));
    }

    #[test]
    fn test_spawns_only_while_pointer_active() {
        let mut session = running();
        session.frame(Duration::ZERO);
        assert_eq!(session.store().unwrap().live_count(), 0);

        session.set_pointer_position(400.0, 300.0);
        session.frame(Duration::from_millis(16));
        assert_eq!(session.store().unwrap().live_count(), 1);
        assert_eq!(session.spawn_cursor(), Some(1));

        session.set_pointer_active(false);
        session.frame(Duration::from_millis(32));
        assert_eq!(session.spawn_cursor(), Some(1));
    }

    #[test]
    fn test_input_throttled_and_ignored_when_not_listening() {
        let mut session = running();
        assert!(session.handle_input(InputEvent::PointerMove { x: 1.0, y: 1.0 }, Duration::from_millis(100)));
        assert!(!session.handle_input(InputEvent::PointerMove { x: 2.0, y: 2.0 }, Duration::from_millis(110)));
        assert_eq!(session.pointer().position, Vec2::new(1.0, 1.0));

        // Leave is never throttled
        assert!(session.handle_input(InputEvent::PointerLeave, Duration::from_millis(111)));
        assert!(!session.pointer().active);

        session.stop();
        assert!(!session.handle_input(InputEvent::PointerMove { x: 3.0, y: 3.0 }, Duration::from_secs(5)));
    }

    #[test]
    fn test_missing_surface_skips_frame() {
        let mut session = running();
        session.set_pointer_position(100.0, 100.0);
        let canvas = session.detach_surface();
        assert!(canvas.is_some());

        assert_eq!(session.frame(Duration::ZERO), FrameOutcome::Skipped);
        assert!(session.frame_pending());
        assert_eq!(session.store().unwrap().live_count(), 0);

        session.attach_surface(Canvas::new(Viewport::new(10.0, 10.0, 1.0)));
        assert_eq!(session.surface().unwrap().width(), 800, "resized to the session viewport");
        assert!(matches!(session.frame(Duration::from_millis(16)), FrameOutcome::Rendered(_)));

        session.detach_surface();
        session.stop();
        assert_eq!(session.state(), SessionState::Stopped);
    }

    #[test]
    fn test_zero_capacity_renders_nothing() {
        let config = Config::new().with_particle_counts(0, 0);
        let mut session = Session::with_seed(config, 3);
        session.start(Canvas::new(viewport()), &DeviceProfile::new(viewport(), false));
        session.set_pointer_position(10.0, 10.0);

        let outcome = session.frame(Duration::ZERO);
        assert_eq!(outcome, FrameOutcome::Rendered(RenderStats::default()));
        assert!(session.surface().unwrap().is_blank());
    }
}
