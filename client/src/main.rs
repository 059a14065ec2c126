use tracing::info;
use tracing_subscriber::EnvFilter;

mod assets;
mod renderer;

/// Process scope: logging is set up on creation and shutdown is logged on drop,
/// however `main` returns.
struct Runtime;

impl Runtime {
    fn init() -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
            .init();
        info!("starting clock");
        Self
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        info!("clock shut down");
    }
}

fn main() -> anyhow::Result<()> {
    let _runtime = Runtime::init();

    let background = assets::load_background()?;
    renderer::run(background)
}
