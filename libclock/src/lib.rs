//! Analog clock with a wind-up animation, drawn through a device manager that
//! survives device loss.

pub mod animation;
pub mod clock;
pub mod device;
pub mod error;
pub mod hands;
pub mod pump;
pub mod raster;
pub mod size;
pub mod time;

pub use device::{GraphicsBackend, GraphicsDeviceManager, Scene};
pub use error::{GraphicsError, GraphicsResult};
pub use pump::{ClockEvent, FramePump, PumpMode};
pub use size::SurfaceSize;
