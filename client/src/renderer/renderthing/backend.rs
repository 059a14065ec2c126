use std::sync::Arc;

use libclock::{
    device::{DriverType, GraphicsBackend, OcclusionCookie, PresentMode, PresentStatus},
    raster::RenderFrame,
    size::{BASE_DPI, SurfaceSize},
    GraphicsError, GraphicsResult,
};
use pixels::{
    wgpu::{PowerPreference, RequestAdapterOptions, TextureFormat},
    Pixels, PixelsBuilder, SurfaceTexture,
};
use tracing::{debug, warn};
use winit::{dpi::PhysicalSize, window::Window};

/// Presents through `pixels`, which owns the wgpu device and surface for one window.
pub struct PixelsBackend {
    window: Arc<Window>,
    next_cookie: u32,
}

/// `pixels` keeps its surface inside the device, so the swap chain only tracks
/// the buffer size it was configured for.
pub struct PixelsSwapChain {
    size: SurfaceSize,
}

impl PixelsBackend {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_cookie: 0,
        }
    }

    /// Effective DPI of the monitor the window is on.
    pub fn dpi(&self) -> f32 {
        self.window.scale_factor() as f32 * BASE_DPI
    }

    fn window_size(&self) -> SurfaceSize {
        let PhysicalSize { width, height } = self.window.inner_size();
        SurfaceSize::new(width, height)
    }

    fn is_occluded(&self) -> bool {
        self.window.is_minimized() == Some(true) || self.window_size().is_empty()
    }
}

impl GraphicsBackend for PixelsBackend {
    type Device = Pixels<'static>;
    type SwapChain = PixelsSwapChain;

    fn create_device(&mut self, driver: DriverType) -> GraphicsResult<Pixels<'static>> {
        let size = self.window_size();
        let (width, height) = (size.width.max(1), size.height.max(1));
        let surface_texture = SurfaceTexture::new(width, height, self.window.clone());

        PixelsBuilder::new(width, height, surface_texture)
            .texture_format(TextureFormat::Rgba8UnormSrgb)
            .enable_vsync(true)
            .request_adapter_options(RequestAdapterOptions {
                power_preference: PowerPreference::HighPerformance,
                force_fallback_adapter: driver == DriverType::Warp,
                compatible_surface: None,
            })
            .build()
            .map_err(|err| match err {
                pixels::Error::AdapterNotFound => GraphicsError::Unsupported,
                err => GraphicsError::DeviceCreation(err.to_string()),
            })
    }

    fn create_swap_chain(&mut self, device: &mut Pixels<'static>) -> GraphicsResult<PixelsSwapChain> {
        let texture = device.texture();
        let size = SurfaceSize::new(texture.width(), texture.height());
        if size.is_empty() {
            return Err(GraphicsError::SwapChain("surface texture has no pixels".to_owned()));
        }

        Ok(PixelsSwapChain { size })
    }

    fn buffer_size(&self, swap_chain: &PixelsSwapChain) -> SurfaceSize {
        swap_chain.size
    }

    fn resize_buffers(
        &mut self,
        device: &mut Pixels<'static>,
        swap_chain: &mut PixelsSwapChain,
        size: SurfaceSize,
    ) -> GraphicsResult<()> {
        if size.is_empty() {
            return Err(GraphicsError::Resize(format!(
                "cannot size buffers to {}x{}",
                size.width, size.height
            )));
        }

        device
            .resize_surface(size.width, size.height)
            .map_err(|err| GraphicsError::Resize(err.to_string()))?;
        device
            .resize_buffer(size.width, size.height)
            .map_err(|err| GraphicsError::Resize(err.to_string()))?;

        swap_chain.size = size;
        Ok(())
    }

    fn back_buffer<'a>(
        &mut self,
        device: &'a mut Pixels<'static>,
        swap_chain: &'a mut PixelsSwapChain,
    ) -> GraphicsResult<RenderFrame<'a>> {
        Ok(RenderFrame::new(
            swap_chain.size.width,
            swap_chain.size.height,
            device.frame_mut(),
        ))
    }

    fn present(
        &mut self,
        device: &mut Pixels<'static>,
        _swap_chain: &mut PixelsSwapChain,
        mode: PresentMode,
    ) -> PresentStatus {
        if self.is_occluded() {
            return PresentStatus::Occluded;
        }

        match mode {
            PresentMode::Test => PresentStatus::Presented,
            PresentMode::Vsync => match device.render() {
                Ok(()) => PresentStatus::Presented,
                Err(err) => {
                    warn!("present failed: {err}");
                    PresentStatus::Lost
                }
            },
        }
    }

    fn register_occlusion_status(&mut self) -> GraphicsResult<OcclusionCookie> {
        // winit reports occlusion changes for every window, registering only hands out a cookie.
        self.next_cookie += 1;
        let cookie = OcclusionCookie(self.next_cookie);
        debug!(?cookie, "registered for occlusion status");
        Ok(cookie)
    }

    fn unregister_occlusion_status(&mut self, cookie: OcclusionCookie) {
        debug!(?cookie, "unregistered occlusion status");
    }
}
