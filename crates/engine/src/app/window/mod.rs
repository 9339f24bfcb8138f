//! Default [`Host`]: a winit window pumped once per frame, drawing into a
//! pixels frame buffer.

mod collector;
mod raster;

use std::sync::Arc;
use std::time::Duration;

use pixels::{Pixels, SurfaceTexture};
use tracing::{info, warn};
use winit::dpi::{LogicalSize, PhysicalPosition};
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::canvas::{Canvas, Color};
use crate::geom::{vec2, Rect, Vec2};

use super::{Host, HostError, Input, InputState, WorldConfig};

use collector::InputCollector;
use raster::FrameView;

pub struct WindowHost {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    canvas: PixelCanvas,
    collector: InputCollector,
    input: InputState,
    closed: bool,
}

impl WindowHost {
    /// Opens a window sized and titled from `config`. The canvas keeps
    /// `config.width x config.height` units whatever the window size.
    pub fn new(config: &WorldConfig) -> Result<Self, HostError> {
        let event_loop = EventLoop::new().map_err(HostError::CreateEventLoop)?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(config.title.clone())
                .with_inner_size(LogicalSize::new(
                    config.width as f64,
                    config.height as f64,
                ))
                .build(&event_loop)
                .map_err(HostError::CreateWindow)?,
        );
        let canvas = PixelCanvas::new(Arc::clone(&window), config.width, config.height)
            .map_err(HostError::CreateSurface)?;
        info!(
            title = config.title.as_str(),
            width = config.width,
            height = config.height,
            "window_created"
        );

        Ok(Self {
            event_loop,
            window,
            canvas,
            collector: InputCollector::default(),
            input: InputState::default(),
            closed: false,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }
}

impl Host for WindowHost {
    fn is_closed(&self) -> bool {
        self.closed
    }

    fn poll(&mut self) {
        let window_id = self.window.id();
        let collector = &mut self.collector;
        let canvas = &mut self.canvas;
        let mut close_requested = false;

        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, _target| {
                let Event::WindowEvent { window_id: id, event } = event else {
                    return;
                };
                if id != window_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => close_requested = true,
                    WindowEvent::Resized(size) => canvas.resize_surface(size.width, size.height),
                    WindowEvent::CursorMoved { position, .. } => {
                        collector.set_cursor_position(Some(canvas.window_to_canvas(position)));
                    }
                    WindowEvent::CursorLeft { .. } => collector.set_cursor_position(None),
                    WindowEvent::MouseInput { state, button, .. } => {
                        collector.handle_mouse_input(button, state);
                    }
                    WindowEvent::MouseWheel { delta, .. } => collector.handle_mouse_wheel(delta),
                    WindowEvent::KeyboardInput { event, .. } => {
                        collector.handle_keyboard_input(&event);
                    }
                    _ => {}
                }
            });

        if close_requested {
            info!(reason = "window_close", "shutdown_requested");
            self.closed = true;
        }
        if let PumpStatus::Exit(code) = status {
            info!(code, "event_loop_exited");
            self.closed = true;
        }
        self.input = self.collector.snapshot_for_frame();
    }

    fn input(&self) -> &dyn Input {
        &self.input
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn present(&mut self) -> Result<(), HostError> {
        self.canvas.pixels.render().map_err(HostError::Present)
    }
}

struct PixelCanvas {
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl PixelCanvas {
    fn new(window: Arc<Window>, width: u32, height: u32) -> Result<Self, pixels::Error> {
        let size = window.inner_size();
        let surface = SurfaceTexture::new(size.width, size.height, window);
        let pixels = Pixels::new(width, height, surface)?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if let Err(error) = self.pixels.resize_surface(width, height) {
            warn!(error = %error, width, height, "surface_resize_failed");
        }
    }

    /// Window pixels to canvas units at the pixel center, clamped to the canvas.
    fn window_to_canvas(&self, position: PhysicalPosition<f64>) -> Vec2 {
        let (x, y) = self
            .pixels
            .window_pos_to_pixel((position.x as f32, position.y as f32))
            .unwrap_or_else(|outside| self.pixels.clamp_pixel_pos(outside));
        vec2(x as f64 + 0.5, self.height as f64 - y as f64 - 0.5)
    }

    fn view(&mut self) -> FrameView<'_> {
        FrameView {
            frame: self.pixels.frame_mut(),
            width: self.width,
            height: self.height,
        }
    }
}

impl Canvas for PixelCanvas {
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width as f64, self.height as f64)
    }

    fn clear(&mut self, color: Color) {
        self.view().clear(color);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.view().fill_polygon(points, color);
    }
}
