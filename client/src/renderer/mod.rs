mod renderthing;

use libclock::raster::Bitmap;
use renderthing::{window::RendererWindowConfig, Renderer};

pub fn run(background: Bitmap) -> anyhow::Result<()> {
    let renderer = Renderer::new(RendererWindowConfig {
        title: "Direct2D Clock".to_owned(),
        width: 1000.0,
        height: 740.0,
        min_height: 200.0,
        background,
    })?;

    renderer.run()
}
