//! Pointer input for glowdust sessions.
//!
//! Hosts feed [`InputEvent`]s into a [`Session`](crate::Session). Move samples
//! are throttled by an [`InputThrottle`] before they reach the shared
//! [`PointerState`]; leave/end events always go through so the effect stops
//! spawning as soon as the pointer is gone.
//!
//! Windowed hosts translate raw `winit` events with a [`WindowInput`], which
//! follows only the first finger down.

use glam::Vec2;
use std::time::Duration;
use winit::event::{TouchPhase, WindowEvent};

/// Latest pointer sample. Only the most recent value matters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerState {
    /// Position in logical surface coordinates.
    pub position: Vec2,
    /// Whether the pointer (or a touch) is currently over the surface.
    pub active: bool,
}

/// A pointer or touch sample in logical surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerMove { x: f32, y: f32 },
    PointerLeave,
    TouchMove { x: f32, y: f32 },
    TouchEnd,
}

impl InputEvent {
    /// Whether this is a movement sample subject to throttling.
    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, InputEvent::PointerMove { .. } | InputEvent::TouchMove { .. })
    }

    /// Apply this event to `pointer`.
    pub fn apply(&self, pointer: &mut PointerState) {
        match *self {
            InputEvent::PointerMove { x, y } | InputEvent::TouchMove { x, y } => {
                pointer.position = Vec2::new(x, y);
                pointer.active = true;
            }
            InputEvent::PointerLeave | InputEvent::TouchEnd => {
                pointer.active = false;
            }
        }
    }
}

/// Drops move samples arriving sooner than `interval` after the last accepted one.
#[derive(Debug, Clone)]
pub struct InputThrottle {
    interval: Duration,
    last_accepted: Option<Duration>,
}

impl InputThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_accepted: None,
        }
    }

    /// Build from a millisecond interval; negative or non-finite means no throttling.
    pub fn from_millis(ms: f32) -> Self {
        let micros = if ms.is_finite() { (ms.max(0.0) * 1000.0).round() as u64 } else { 0 };
        Self::new(Duration::from_micros(micros))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a sample at `now` should be accepted. Accepting records `now`.
    pub fn accept(&mut self, now: Duration) -> bool {
        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.interval {
                return false;
            }
        }
        self.last_accepted = Some(now);
        true
    }
}

/// Translates `winit` window events into [`InputEvent`]s.
///
/// Touch input follows a single finger: the first one down is tracked until
/// it lifts, and other fingers are ignored meanwhile.
#[derive(Debug, Clone, Default)]
pub struct WindowInput {
    touch_id: Option<u64>,
}

impl WindowInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the finger currently driving the pointer.
    pub fn tracked_touch(&self) -> Option<u64> {
        self.touch_id
    }

    /// Translate one event. `scale_factor` converts the physical positions
    /// `winit` reports into logical surface coordinates.
    pub fn translate(&mut self, event: &WindowEvent, scale_factor: f64) -> Option<InputEvent> {
        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        match event {
            WindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMove {
                x: (position.x / scale) as f32,
                y: (position.y / scale) as f32,
            }),
            WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeave),
            WindowEvent::Touch(touch) => {
                if touch.phase == TouchPhase::Started && self.touch_id.is_none() {
                    self.touch_id = Some(touch.id);
                }
                if self.touch_id != Some(touch.id) {
                    return None;
                }
                match touch.phase {
                    TouchPhase::Started | TouchPhase::Moved => Some(InputEvent::TouchMove {
                        x: (touch.location.x / scale) as f32,
                        y: (touch.location.y / scale) as f32,
                    }),
                    TouchPhase::Ended | TouchPhase::Cancelled => {
                        self.touch_id = None;
                        Some(InputEvent::TouchEnd)
                    }
                }
            }
            _ => None,
        }
    }
}
