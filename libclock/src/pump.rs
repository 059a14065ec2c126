//! Window events in, frames out.
//!
//! The platform layer translates its native events into [`ClockEvent`]s and
//! hands them to [`FramePump::dispatch`]. Between events it asks for the
//! [`PumpMode`]: poll and render continuously while visible, block on the next
//! event while hidden.

use tracing::{debug, info};

use crate::{
    device::{GraphicsBackend, GraphicsDeviceManager, PresentStatus, Scene},
    error::GraphicsResult,
    size::SurfaceSize,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    Paint,
    Resize { size: SurfaceSize, minimized: bool },
    DisplayChange,
    DpiChange(f32),
    /// A previously occluded window should be tested for visibility again.
    OcclusionRetest,
    VisibilityChange(bool),
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpMode {
    /// Render a frame, then drain pending events without blocking.
    Poll,
    /// Block until the next event arrives.
    Wait,
}

pub struct FramePump<B: GraphicsBackend, S: Scene> {
    manager: GraphicsDeviceManager<B, S>,
    closed: bool,
}

impl<B: GraphicsBackend, S: Scene> FramePump<B, S> {
    pub fn new(manager: GraphicsDeviceManager<B, S>) -> Self {
        Self {
            manager,
            closed: false,
        }
    }

    pub fn dispatch(&mut self, event: ClockEvent) -> GraphicsResult<()> {
        match event {
            ClockEvent::Paint => self.on_paint(),
            ClockEvent::Resize { size, minimized } => self.on_resize(size, minimized),
            ClockEvent::DisplayChange => self.on_display_change(),
            ClockEvent::DpiChange(dpi) => self.manager.set_dpi(dpi),
            ClockEvent::OcclusionRetest => {
                self.on_occlusion_retest();
                Ok(())
            }
            ClockEvent::VisibilityChange(visible) => {
                self.on_visibility_change(visible);
                Ok(())
            }
            ClockEvent::Close => {
                info!("close requested");
                self.closed = true;
                Ok(())
            }
        }
    }

    pub fn on_paint(&mut self) -> GraphicsResult<()> {
        self.manager.render().map(|_| ())
    }

    /// Resizes and redraws, unless there is no device yet or the window was minimized.
    ///
    /// A window restored to a real size while occluded is retested first, since
    /// not every platform reports the end of occlusion on its own.
    pub fn on_resize(&mut self, size: SurfaceSize, minimized: bool) -> GraphicsResult<()> {
        if minimized {
            return Ok(());
        }
        if !size.is_empty() && self.manager.is_occlusion_registered() {
            self.on_occlusion_retest();
        }
        if !self.manager.has_device() {
            return Ok(());
        }

        self.manager.resize(size)?;
        self.on_paint()
    }

    pub fn on_display_change(&mut self) -> GraphicsResult<()> {
        self.on_paint()
    }

    pub fn on_occlusion_retest(&mut self) {
        self.manager.retest_occlusion();
    }

    pub fn on_visibility_change(&mut self, visible: bool) {
        debug!(visible, "visibility changed");
        self.manager.set_visible(visible);
    }

    /// One turn of the loop: renders a frame if the window is visible and returns
    /// the present outcome, or `None` when nothing was drawn.
    pub fn tick(&mut self) -> GraphicsResult<Option<PresentStatus>> {
        if self.closed || !self.manager.is_visible() {
            return Ok(None);
        }

        self.manager.render().map(Some)
    }

    pub fn mode(&self) -> PumpMode {
        if !self.closed && self.manager.is_visible() {
            PumpMode::Poll
        } else {
            PumpMode::Wait
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn manager(&self) -> &GraphicsDeviceManager<B, S> {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut GraphicsDeviceManager<B, S> {
        &mut self.manager
    }
}
