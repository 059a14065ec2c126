use std::sync::Arc;

use anyhow::Context;
use libclock::{
    clock::ClockScene,
    raster::Bitmap,
    size::BASE_DPI,
    time::{LocalWallClock, MonotonicSource},
    ClockEvent, FramePump, GraphicsDeviceManager, PumpMode, SurfaceSize,
};
use tracing::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::{Window, WindowAttributes, WindowId},
};

use super::backend::PixelsBackend;

type ClockPump = FramePump<PixelsBackend, ClockScene<MonotonicSource, LocalWallClock>>;

pub(super) struct RendererWindow {
    config: RendererWindowConfig,
    resumed_window: Option<ResumedWindow>,
    error: Option<anyhow::Error>,
}

impl RendererWindow {
    pub fn new(config: RendererWindowConfig) -> Self {
        Self {
            config,
            resumed_window: None,
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<anyhow::Error> {
        self.error.take()
    }

    fn create_window(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<ResumedWindow> {
        let window = Arc::new(
            event_loop
                .create_window(
                    WindowAttributes::default()
                        .with_title(self.config.title.clone())
                        .with_inner_size(LogicalSize::new(self.config.width, self.config.height))
                        .with_min_inner_size(LogicalSize::new(0.0, self.config.min_height)),
                )
                .context("Creating window")?,
        );

        let backend = PixelsBackend::new(window.clone());
        let dpi = backend.dpi();
        let scene = ClockScene::new(MonotonicSource::new(), LocalWallClock, self.config.background.clone());
        let pump = FramePump::new(GraphicsDeviceManager::new(backend, scene, dpi));

        info!(dpi, "window created");
        window.request_redraw();

        Ok(ResumedWindow { window, pump })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        error!("stopping: {error:#}");
        self.error = Some(error);
        event_loop.exit();
    }
}

pub struct RendererWindowConfig {
    pub title: String,
    /// Initial size in logical pixels.
    pub width: f64,
    pub height: f64,
    /// Smallest height the window can be dragged to.
    pub min_height: f64,
    pub background: Bitmap,
}

struct ResumedWindow {
    window: Arc<Window>,
    pump: ClockPump,
}

impl ResumedWindow {
    fn translate(&self, event: &WindowEvent) -> Option<ClockEvent> {
        let pump = &self.pump;

        let event = match event {
            WindowEvent::RedrawRequested => ClockEvent::Paint,
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                let size = SurfaceSize::new(*width, *height);
                ClockEvent::Resize {
                    size,
                    minimized: size.is_empty() || self.window.is_minimized() == Some(true),
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                ClockEvent::DpiChange(*scale_factor as f32 * BASE_DPI)
            }
            WindowEvent::Occluded(true) => ClockEvent::VisibilityChange(false),
            WindowEvent::Occluded(false) if pump.manager().is_occlusion_registered() => ClockEvent::OcclusionRetest,
            WindowEvent::Occluded(false) => ClockEvent::VisibilityChange(true),
            // Windows and Wayland never send Occluded, activation is their restore signal.
            WindowEvent::Focused(true) if pump.manager().is_occlusion_registered() => ClockEvent::OcclusionRetest,
            WindowEvent::CloseRequested => ClockEvent::Close,
            _ => return None,
        };

        Some(event)
    }
}

impl ApplicationHandler for RendererWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.resumed_window.is_some() {
            return;
        }

        match self.create_window(event_loop) {
            Ok(resumed_window) => self.resumed_window = Some(resumed_window),
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(resumed_window) = self.resumed_window.as_mut() else {
            return;
        };
        let Some(event) = resumed_window.translate(&event) else {
            return;
        };

        if let Err(err) = resumed_window.pump.dispatch(event) {
            self.fail(event_loop, anyhow::Error::new(err).context("Handling window event"));
            return;
        }

        if resumed_window.pump.is_closed() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(resumed_window) = self.resumed_window.as_mut() else {
            return;
        };

        if let Err(err) = resumed_window.pump.tick() {
            self.fail(event_loop, anyhow::Error::new(err).context("Rendering frame"));
            return;
        }

        event_loop.set_control_flow(match resumed_window.pump.mode() {
            PumpMode::Poll => ControlFlow::Poll,
            PumpMode::Wait => ControlFlow::Wait,
        });
    }
}
