#![allow(dead_code)]

use std::collections::VecDeque;

use libclock::{
    GraphicsError, GraphicsResult, SurfaceSize,
    device::{DriverType, GraphicsBackend, OcclusionCookie, PresentMode, PresentStatus, RenderSurface, Scene},
    raster::{BYTES_PER_PIXEL, Color, PixelBuffer, RenderFrame},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDevice {
    pub id: u32,
    pub driver: DriverType,
}

#[derive(Debug)]
pub struct MockSwapChain {
    pub id: u32,
    pub device_id: u32,
    pub size: SurfaceSize,
    pub buffer: Vec<u8>,
}

/// Backend that hands out unique handle ids and replays scripted outcomes.
#[derive(Debug)]
pub struct MockBackend {
    pub window_size: SurfaceSize,
    pub hardware_unsupported: bool,
    pub creation_error: Option<GraphicsError>,
    pub fail_resize: bool,
    pub present_script: VecDeque<PresentStatus>,
    pub test_script: VecDeque<PresentStatus>,

    pub device_requests: Vec<DriverType>,
    pub devices: Vec<MockDevice>,
    pub swap_chains: Vec<u32>,
    pub resizes: Vec<(u32, SurfaceSize)>,
    pub presents: Vec<(u32, PresentMode)>,
    pub registered: Vec<OcclusionCookie>,
    pub unregistered: Vec<OcclusionCookie>,
    /// Copy of the back buffer taken at the last vsync present.
    pub last_frame: Option<(SurfaceSize, Vec<u8>)>,

    next_id: u32,
}

impl MockBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            window_size: SurfaceSize::new(width, height),
            hardware_unsupported: false,
            creation_error: None,
            fail_resize: false,
            present_script: VecDeque::new(),
            test_script: VecDeque::new(),
            device_requests: Vec::new(),
            devices: Vec::new(),
            swap_chains: Vec::new(),
            resizes: Vec::new(),
            presents: Vec::new(),
            registered: Vec::new(),
            unregistered: Vec::new(),
            last_frame: None,
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

impl GraphicsBackend for MockBackend {
    type Device = MockDevice;
    type SwapChain = MockSwapChain;

    fn create_device(&mut self, driver: DriverType) -> GraphicsResult<MockDevice> {
        self.device_requests.push(driver);

        if driver == DriverType::Hardware && self.hardware_unsupported {
            return Err(GraphicsError::Unsupported);
        }
        if let Some(err) = self.creation_error.clone() {
            return Err(err);
        }

        let device = MockDevice {
            id: self.next_id(),
            driver,
        };
        self.devices.push(device);
        Ok(device)
    }

    fn create_swap_chain(&mut self, device: &mut MockDevice) -> GraphicsResult<MockSwapChain> {
        let id = self.next_id();
        self.swap_chains.push(id);

        Ok(MockSwapChain {
            id,
            device_id: device.id,
            size: self.window_size,
            buffer: vec![0; self.window_size.pixel_count() * BYTES_PER_PIXEL],
        })
    }

    fn buffer_size(&self, swap_chain: &MockSwapChain) -> SurfaceSize {
        swap_chain.size
    }

    fn resize_buffers(
        &mut self,
        _device: &mut MockDevice,
        swap_chain: &mut MockSwapChain,
        size: SurfaceSize,
    ) -> GraphicsResult<()> {
        self.resizes.push((swap_chain.id, size));

        if self.fail_resize {
            return Err(GraphicsError::Resize("scripted failure".to_owned()));
        }

        self.window_size = size;
        swap_chain.size = size;
        swap_chain.buffer = vec![0; size.pixel_count() * BYTES_PER_PIXEL];
        Ok(())
    }

    fn back_buffer<'a>(
        &mut self,
        _device: &'a mut MockDevice,
        swap_chain: &'a mut MockSwapChain,
    ) -> GraphicsResult<RenderFrame<'a>> {
        Ok(RenderFrame::new(
            swap_chain.size.width,
            swap_chain.size.height,
            &mut swap_chain.buffer,
        ))
    }

    fn present(&mut self, _device: &mut MockDevice, swap_chain: &mut MockSwapChain, mode: PresentMode) -> PresentStatus {
        self.presents.push((swap_chain.id, mode));
        if mode == PresentMode::Vsync {
            self.last_frame = Some((swap_chain.size, swap_chain.buffer.clone()));
        }

        let script = match mode {
            PresentMode::Vsync => &mut self.present_script,
            PresentMode::Test => &mut self.test_script,
        };
        script.pop_front().unwrap_or(PresentStatus::Presented)
    }

    fn register_occlusion_status(&mut self) -> GraphicsResult<OcclusionCookie> {
        let cookie = OcclusionCookie(self.next_id());
        self.registered.push(cookie);
        Ok(cookie)
    }

    fn unregister_occlusion_status(&mut self, cookie: OcclusionCookie) {
        self.unregistered.push(cookie);
    }
}

/// Scene that records every resource it builds and every frame it draws.
#[derive(Debug, Default)]
pub struct CountingScene {
    pub device_resources: Vec<u64>,
    pub size_resources: Vec<(u64, SurfaceSize)>,
    pub draws: Vec<Draw>,
    pub fail_draw: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Draw {
    pub device_resources: u64,
    pub size_resources: u64,
    pub surface_generation: u64,
    pub size: SurfaceSize,
}

impl Scene for CountingScene {
    type DeviceResources = u64;
    type SizeResources = u64;

    fn create_device_resources(&mut self, surface: &RenderSurface) -> GraphicsResult<u64> {
        self.device_resources.push(surface.generation());
        Ok(self.device_resources.len() as u64)
    }

    fn create_size_resources(&mut self, surface: &RenderSurface, _device: &u64) -> GraphicsResult<u64> {
        self.size_resources.push((surface.generation(), surface.size()));
        Ok(self.size_resources.len() as u64)
    }

    fn draw(
        &mut self,
        target: &mut RenderFrame<'_>,
        surface: &RenderSurface,
        device: &u64,
        size: &mut u64,
    ) -> GraphicsResult<()> {
        if self.fail_draw {
            return Err(GraphicsError::Draw("scripted failure".to_owned()));
        }

        target.clear(Color::WHITE);
        self.draws.push(Draw {
            device_resources: *device,
            size_resources: *size,
            surface_generation: surface.generation(),
            size: target.size(),
        });
        Ok(())
    }
}
