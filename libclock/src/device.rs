//! Device, swap chain and render surface lifecycle.
//!
//! [`GraphicsDeviceManager`] is the single owner of everything tied to a
//! rendering device. Scenes only ever see borrowed resources for the duration of
//! a call, so dropping the manager's state is all it takes to tear a device down.
//! Recovery never patches anything up: after a loss the next render rebuilds the
//! device, swap chain, surface and every scene resource from nothing.

use strum::Display;
use tracing::{debug, info, warn};

use crate::{
    error::{GraphicsError, GraphicsResult, verify},
    raster::{PixelBuffer, RenderFrame},
    size::{BASE_DPI, SurfaceSize},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum DriverType {
    /// GPU accelerated driver.
    Hardware,
    /// Software rasterizer, used when the hardware driver is unsupported.
    Warp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentMode {
    /// Show the back buffer, waiting for one vertical blank.
    Vsync,
    /// Only check whether presenting would currently be visible.
    Test,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum PresentStatus {
    Presented,
    /// The window is not visible, nothing was shown.
    Occluded,
    /// The device is gone and every device resource has to be recreated.
    Lost,
}

/// Registration handle for occlusion status notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OcclusionCookie(pub u32);

/// Platform graphics API seen through the operations the device manager needs.
pub trait GraphicsBackend {
    type Device;
    type SwapChain;

    /// Creates a device for `driver`. Returns [`GraphicsError::Unsupported`]
    /// when the driver type is not available on this machine.
    fn create_device(&mut self, driver: DriverType) -> GraphicsResult<Self::Device>;

    /// Creates the swap chain bound to the backend's window.
    fn create_swap_chain(&mut self, device: &mut Self::Device) -> GraphicsResult<Self::SwapChain>;

    fn buffer_size(&self, swap_chain: &Self::SwapChain) -> SurfaceSize;

    /// Resizes the swap chain's buffers in place.
    fn resize_buffers(
        &mut self,
        device: &mut Self::Device,
        swap_chain: &mut Self::SwapChain,
        size: SurfaceSize,
    ) -> GraphicsResult<()>;

    fn back_buffer<'a>(
        &mut self,
        device: &'a mut Self::Device,
        swap_chain: &'a mut Self::SwapChain,
    ) -> GraphicsResult<RenderFrame<'a>>;

    fn present(
        &mut self,
        device: &mut Self::Device,
        swap_chain: &mut Self::SwapChain,
        mode: PresentMode,
    ) -> PresentStatus;

    /// Asks the platform to report when an occluded window should be retested.
    fn register_occlusion_status(&mut self) -> GraphicsResult<OcclusionCookie>;

    fn unregister_occlusion_status(&mut self, cookie: OcclusionCookie);
}

/// Drawing target bound to the swap chain's current back buffer.
///
/// Each binding gets a fresh generation, so resources created for an older
/// binding can be told apart from current ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSurface {
    size: SurfaceSize,
    dpi: f32,
    generation: u64,
}

impl RenderSurface {
    pub fn new(size: SurfaceSize, dpi: f32, generation: u64) -> Self {
        Self {
            size,
            dpi,
            generation,
        }
    }

    /// Size in physical pixels.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    /// Physical pixels per DIP.
    pub fn scale(&self) -> f32 {
        self.dpi / BASE_DPI
    }

    pub fn dip_size(&self) -> (f32, f32) {
        self.size.to_dips(self.dpi)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Content drawn by the device manager.
///
/// Anything the scene keeps in `self` is device independent and survives device
/// loss. Device resources live until the device is torn down, size resources
/// until the surface is resized, changes DPI or the device goes away.
pub trait Scene {
    type DeviceResources;
    type SizeResources;

    fn create_device_resources(&mut self, surface: &RenderSurface) -> GraphicsResult<Self::DeviceResources>;

    fn create_size_resources(
        &mut self,
        surface: &RenderSurface,
        device: &Self::DeviceResources,
    ) -> GraphicsResult<Self::SizeResources>;

    fn draw(
        &mut self,
        target: &mut RenderFrame<'_>,
        surface: &RenderSurface,
        device: &Self::DeviceResources,
        size: &mut Self::SizeResources,
    ) -> GraphicsResult<()>;
}

struct DeviceState<B: GraphicsBackend, S: Scene> {
    driver: DriverType,
    device: B::Device,
    swap_chain: B::SwapChain,
    surface: Option<RenderSurface>,
    device_resources: S::DeviceResources,
    size_resources: Option<S::SizeResources>,
}

pub struct GraphicsDeviceManager<B: GraphicsBackend, S: Scene> {
    backend: B,
    scene: S,
    dpi: f32,
    state: Option<DeviceState<B, S>>,
    visible: bool,
    occlusion: Option<OcclusionCookie>,
    generation: u64,
}

impl<B: GraphicsBackend, S: Scene> GraphicsDeviceManager<B, S> {
    pub fn new(backend: B, scene: S, dpi: f32) -> Self {
        Self {
            backend,
            scene,
            dpi,
            state: None,
            visible: true,
            occlusion: None,
            generation: 0,
        }
    }

    /// Makes sure a device, swap chain and surface exist, creating all of them
    /// if there is no device. Does nothing when they already exist.
    pub fn ensure_device(&mut self) -> GraphicsResult<&RenderSurface> {
        let state = match self.state.take() {
            Some(state) => state,
            None => self.create_device_state()?,
        };
        let state = self.state.insert(state);

        if state.surface.is_none() {
            let surface = bind_surface(&self.backend, &state.swap_chain, self.dpi, &mut self.generation);
            state.size_resources = Some(verify(
                self.scene.create_size_resources(&surface, &state.device_resources),
            )?);
            state.surface = Some(surface);
        }

        state
            .surface
            .as_ref()
            .ok_or_else(|| GraphicsError::Draw("render surface missing after creation".to_owned()))
    }

    fn create_device_state(&mut self) -> GraphicsResult<DeviceState<B, S>> {
        let (driver, mut device) = self.create_device()?;
        let swap_chain = verify(self.backend.create_swap_chain(&mut device))?;

        let surface = bind_surface(&self.backend, &swap_chain, self.dpi, &mut self.generation);
        info!(
            %driver,
            width = surface.size().width,
            height = surface.size().height,
            dpi = surface.dpi(),
            "created graphics device and swap chain"
        );

        let device_resources = verify(self.scene.create_device_resources(&surface))?;
        let size_resources = verify(self.scene.create_size_resources(&surface, &device_resources))?;
        debug!(generation = surface.generation(), "created device and size resources");

        Ok(DeviceState {
            driver,
            device,
            swap_chain,
            surface: Some(surface),
            device_resources,
            size_resources: Some(size_resources),
        })
    }

    fn create_device(&mut self) -> GraphicsResult<(DriverType, B::Device)> {
        match self.backend.create_device(DriverType::Hardware) {
            Ok(device) => Ok((DriverType::Hardware, device)),
            Err(err) if err.is_unsupported() => {
                warn!("hardware device unsupported, falling back to {}", DriverType::Warp);
                let device = verify(self.backend.create_device(DriverType::Warp))?;
                Ok((DriverType::Warp, device))
            }
            Err(err) => verify(Err(err)),
        }
    }

    /// Resizes the swap chain after the window changed size.
    ///
    /// The surface is detached first and only rebound if the buffers resized in
    /// place. A failed resize is handled exactly like device loss.
    pub fn resize(&mut self, size: SurfaceSize) -> GraphicsResult<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };

        state.surface = None;
        state.size_resources = None;

        match self
            .backend
            .resize_buffers(&mut state.device, &mut state.swap_chain, size)
        {
            Ok(()) => {
                debug!(width = size.width, height = size.height, "resized swap chain buffers");
                self.ensure_device().map(|_| ())
            }
            Err(err) => {
                warn!("swap chain resize failed, releasing device: {err}");
                self.release_device();
                Ok(())
            }
        }
    }

    /// Changes the DPI used for the surface and rebuilds size resources if it differs.
    pub fn set_dpi(&mut self, dpi: f32) -> GraphicsResult<()> {
        if dpi == self.dpi {
            return Ok(());
        }
        self.dpi = dpi;

        if let Some(state) = self.state.as_mut() {
            debug!(dpi, "dpi changed, rebuilding size resources");
            state.surface = None;
            state.size_resources = None;
            self.ensure_device()?;
        }
        Ok(())
    }

    /// Draws one frame and presents it, creating the device first if needed.
    pub fn render(&mut self) -> GraphicsResult<PresentStatus> {
        self.ensure_device()?;
        self.draw()?;
        self.present()
    }

    fn draw(&mut self) -> GraphicsResult<()> {
        let Some(DeviceState {
            device,
            swap_chain,
            surface: Some(surface),
            device_resources,
            size_resources: Some(size_resources),
            ..
        }) = self.state.as_mut()
        else {
            return verify(Err(GraphicsError::Draw("no render surface to draw on".to_owned())));
        };

        let mut frame = verify(self.backend.back_buffer(device, swap_chain))?;
        if frame.size() != surface.size() {
            return verify(Err(GraphicsError::Draw(format!(
                "surface bound to a {}x{} buffer but the back buffer is {}x{}",
                surface.size().width,
                surface.size().height,
                frame.width,
                frame.height
            ))));
        }

        verify(self.scene.draw(&mut frame, surface, device_resources, size_resources))
    }

    /// Presents the back buffer synchronized to vertical blank and reacts to the outcome.
    pub fn present(&mut self) -> GraphicsResult<PresentStatus> {
        let Some(state) = self.state.as_mut() else {
            return Ok(PresentStatus::Lost);
        };

        let status = self
            .backend
            .present(&mut state.device, &mut state.swap_chain, PresentMode::Vsync);

        match status {
            PresentStatus::Presented => {}
            PresentStatus::Occluded => {
                if self.occlusion.is_none() {
                    let cookie = verify(self.backend.register_occlusion_status())?;
                    info!(?cookie, "window occluded, suspending rendering");
                    self.occlusion = Some(cookie);
                }
                self.visible = false;
            }
            PresentStatus::Lost => {
                warn!("device lost during present");
                self.release_device();
            }
        }

        Ok(status)
    }

    /// Handles the platform's request to retest an occluded window. Returns
    /// whether rendering resumed.
    pub fn retest_occlusion(&mut self) -> bool {
        let Some(cookie) = self.occlusion else {
            return false;
        };

        let presentable = match self.state.as_mut() {
            Some(state) => {
                self.backend
                    .present(&mut state.device, &mut state.swap_chain, PresentMode::Test)
                    == PresentStatus::Presented
            }
            // Without a device there is nothing to test, the next render recreates it.
            None => true,
        };

        if presentable {
            self.backend.unregister_occlusion_status(cookie);
            self.occlusion = None;
            self.visible = true;
            info!("window visible again, resuming rendering");
        }
        presentable
    }

    /// Drops the surface, swap chain, device and every device dependent
    /// resource. Device independent resources held by the scene are kept.
    pub fn release_device(&mut self) {
        if let Some(state) = self.state.take() {
            info!(driver = %state.driver, "released graphics device");
        }
    }

    pub fn has_device(&self) -> bool {
        self.state.is_some()
    }

    pub fn surface(&self) -> Option<&RenderSurface> {
        self.state.as_ref().and_then(|state| state.surface.as_ref())
    }

    pub fn driver(&self) -> Option<DriverType> {
        self.state.as_ref().map(|state| state.driver)
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_occlusion_registered(&self) -> bool {
        self.occlusion.is_some()
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

fn bind_surface<B: GraphicsBackend>(
    backend: &B,
    swap_chain: &B::SwapChain,
    dpi: f32,
    generation: &mut u64,
) -> RenderSurface {
    *generation += 1;
    RenderSurface::new(backend.buffer_size(swap_chain), dpi, *generation)
}
