//! Desktop host: a `winit` window driving one [`Session`].
//!
//! The window plays the part of the embedding page. It supplies the device
//! profile, forwards pointer and touch input, reports resizes and delivers a
//! frame callback on every redraw while the session has one pending.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::canvas::Canvas;
use crate::config::Config;
use crate::device::DeviceProfile;
use crate::error::AppError;
use crate::gpu::Presenter;
use crate::input::WindowInput;
use crate::session::{FrameOutcome, Session};
use crate::surface::Viewport;

/// Logical viewport of a window.
fn window_viewport(size: PhysicalSize<u32>, scale_factor: f64) -> Viewport {
    let logical: LogicalSize<f32> = size.to_logical(scale_factor);
    Viewport::new(logical.width, logical.height, scale_factor as f32)
}

pub struct App {
    config: Config,
    touch: bool,
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    session: Option<Session<Canvas>>,
    input: WindowInput,
    started: Instant,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: Config, touch: bool, seed: Option<u64>) -> Self {
        Self {
            config,
            touch,
            seed,
            window: None,
            presenter: None,
            session: None,
            input: WindowInput::new(),
            started: Instant::now(),
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("glowdust")
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let viewport = window_viewport(window.inner_size(), window.scale_factor());
        let mut session = match self.seed {
            Some(seed) => Session::with_seed(self.config.clone(), seed),
            None => Session::new(self.config.clone()),
        };
        session.start(Canvas::new(viewport), &DeviceProfile::new(viewport, self.touch));
        info!(
            "window ready: {}x{} logical, scale {}",
            viewport.width, viewport.height, viewport.pixel_ratio
        );

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
        self.session = Some(session);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(session), Some(presenter)) = (self.session.as_mut(), self.presenter.as_mut()) else {
            return;
        };
        if !session.frame_pending() {
            return;
        }

        if let FrameOutcome::Rendered(_) = session.frame(self.started.elapsed()) {
            if let Some(canvas) = session.surface() {
                match presenter.render(canvas) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        presenter.resize(presenter.size())
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU out of memory");
                        session.stop();
                        event_loop.exit();
                        return;
                    }
                    Err(e) => warn!("present failed: {e:?}"),
                }
            }
        }

        if session.frame_pending() {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.init(event_loop) {
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let scale_factor = self.window.as_ref().map_or(1.0, |w| w.scale_factor());

        if let Some(input) = self.input.translate(&event, scale_factor) {
            if let Some(session) = &mut self.session {
                session.handle_input(input, self.started.elapsed());
            }
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(session) = &mut self.session {
                    session.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size);
                }
                if let Some(session) = &mut self.session {
                    session.resize(window_viewport(physical_size, scale_factor));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Open a window and run the effect until it is closed.
pub fn run(config: Config, touch: bool, seed: Option<u64>) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, touch, seed);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_viewport_is_logical() {
        let vp = window_viewport(PhysicalSize::new(2560, 1440), 2.0);
        assert_eq!(vp.width, 1280.0);
        assert_eq!(vp.height, 720.0);
        assert_eq!(vp.pixel_ratio, 2.0);
    }
}
