use thiserror::Error;

/// Failures reported by the graphics layer.
///
/// Presentation outcomes (occlusion, device loss) are not errors, see
/// [`PresentStatus`](crate::device::PresentStatus). Everything in here is fatal
/// except [`GraphicsError::Unsupported`], which selects the software driver, and
/// [`GraphicsError::Resize`], which the device manager turns into a teardown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    #[error("the requested driver type is not supported on this system")]
    Unsupported,

    #[error("device creation failed: {0}")]
    DeviceCreation(String),

    #[error("swap chain creation failed: {0}")]
    SwapChain(String),

    #[error("swap chain resize failed: {0}")]
    Resize(String),

    #[error("resource creation failed: {0}")]
    Resource(String),

    #[error("drawing failed: {0}")]
    Draw(String),
}

impl GraphicsError {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported)
    }
}

pub type GraphicsResult<T> = Result<T, GraphicsError>;

/// Reports a fatal graphics failure at the call that produced it.
///
/// Debug builds log the failure with its call site before it propagates,
/// release builds pass it through untouched.
#[track_caller]
pub(crate) fn verify<T>(result: GraphicsResult<T>) -> GraphicsResult<T> {
    if cfg!(debug_assertions) {
        if let Err(err) = &result {
            let location = std::panic::Location::caller();
            tracing::error!(%location, "graphics call failed: {err}");
        }
    }

    result
}
