//! # glowdust
//!
//! A small 2D particle effect: soft additive glows that spawn at the pointer,
//! drift toward it, sink under a little gravity, fade out and get recycled.
//!
//! The simulation runs on the CPU against a fixed pool of particles and draws
//! through the [`Surface`] trait. [`Canvas`] is the bundled software surface;
//! the binary uploads it to the screen with `wgpu`, or writes it to a PNG.
//!
//! ## Quick Start
//!
//! ```ignore
//! use glowdust::prelude::*;
//! use std::time::Duration;
//!
//! let viewport = Viewport::new(800.0, 600.0, 1.0);
//! let mut session = Session::new(Config::default().with_gravity(0.02));
//! session.start(Canvas::new(viewport), &DeviceProfile::new(viewport, false));
//!
//! session.set_pointer_position(400.0, 300.0);
//! for i in 0..60 {
//!     session.frame(Duration::from_millis(16 * i));
//! }
//!
//! session.surface().unwrap().save_png("glow.png")?;
//! session.stop();
//! ```
//!
//! ## Frame Pipeline
//!
//! Each frame runs three stages over the [`ParticleStore`]:
//!
//! | Stage | Module | Work |
//! |-------|--------|------|
//! | Spawn | [`spawn`] | Overwrite the slot under a round-robin cursor while the pointer is active |
//! | Integrate | [`integrate`] | Attraction, gravity, damping, position and life, scaled by the delta factor |
//! | Render | [`render`] | Clear, additive glow per live particle, kill particles off the surface |
//!
//! Time is normalized against a nominal 60 Hz frame (see [`time`]), so the
//! effect looks the same at any refresh rate and a stalled tab cannot make
//! particles jump more than two frames' worth.
//!
//! ## Device Budget
//!
//! At start the session picks a particle capacity from a [`DeviceProfile`]:
//! touch-first or narrow screens get [`Config::reduced_particle_count`], the
//! rest get [`Config::base_particle_count`].

pub mod canvas;
pub mod config;
pub mod device;
pub mod error;
mod gpu;
pub mod headless;
pub mod input;
pub mod integrate;
pub mod render;
pub mod session;
pub mod spawn;
pub mod store;
pub mod surface;
pub mod time;
pub mod visuals;
pub mod window;

pub use canvas::Canvas;
pub use config::Config;
pub use device::{DeviceClass, DeviceProfile};
pub use error::{AppError, ConfigError, GpuError};
pub use glam::{Vec2, Vec4};
pub use headless::HeadlessRunner;
pub use input::{InputEvent, InputThrottle, PointerState};
pub use integrate::Integrator;
pub use render::{RenderStats, Renderer};
pub use session::{FrameOutcome, Session, SessionState};
pub use spawn::Spawner;
pub use store::ParticleStore;
pub use surface::{Surface, Viewport};
pub use time::FrameClock;
pub use visuals::{BlendMode, Hsla, RadialGradient};

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use glowdust::prelude::*;
/// ```
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::config::Config;
    pub use crate::device::DeviceProfile;
    pub use crate::input::InputEvent;
    pub use crate::session::{FrameOutcome, Session};
    pub use crate::store::ParticleStore;
    pub use crate::surface::{Surface, Viewport};
    pub use crate::visuals::BlendMode;
    pub use glam::Vec2;
}
