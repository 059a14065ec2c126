mod common;

use std::rc::Rc;

use common::MockBackend;
use libclock::{
    GraphicsDeviceManager, SurfaceSize,
    animation::WIND_UP_DURATION,
    clock::ClockScene,
    device::PresentStatus,
    raster::{Bitmap, Color},
    time::{ClockTime, FixedWallClock, ManualSource},
};

type Manager = GraphicsDeviceManager<MockBackend, ClockScene<Rc<ManualSource>, FixedWallClock>>;

fn manager(source: &Rc<ManualSource>) -> Manager {
    let scene = ClockScene::new(
        Rc::clone(source),
        FixedWallClock(ClockTime::new(3, 15, 30, 500)),
        Bitmap::new(SurfaceSize::new(16, 16)),
    );
    GraphicsDeviceManager::new(MockBackend::new(400, 300), scene, 96.0)
}

#[test]
fn wind_up_completes_after_five_seconds() {
    let source = Rc::new(ManualSource::new(10.0));
    let mut manager = manager(&source);

    manager.render().unwrap();
    assert_eq!(manager.scene().engine().current_value(), 0.0);

    source.advance(WIND_UP_DURATION / 2.0);
    manager.render().unwrap();
    let halfway = manager.scene().engine().current_value();
    assert!(halfway > 0.0 && halfway < 1.0);

    source.advance(WIND_UP_DURATION);
    manager.render().unwrap();
    assert_eq!(manager.scene().engine().current_value(), 1.0);
}

#[test]
fn continuity_survives_device_loss() {
    let source = Rc::new(ManualSource::new(0.0));
    let mut manager = manager(&source);

    source.advance(1.0);
    manager.render().unwrap();
    let before = manager.scene().renderer().wind_up().previous();
    assert!(before.is_some());

    manager.backend_mut().present_script.push_back(PresentStatus::Lost);
    source.advance(0.5);
    assert_eq!(manager.render(), Ok(PresentStatus::Lost));
    let lost = manager.scene().renderer().wind_up().previous();

    source.advance(0.5);
    manager.render().unwrap();

    assert_eq!(manager.backend().devices.len(), 2);
    assert_eq!(lost, before);
    assert_eq!(manager.scene().renderer().wind_up().previous(), before);
}

#[test]
fn frame_shows_clock_over_white() {
    let source = Rc::new(ManualSource::new(0.0));
    let mut manager = manager(&source);
    source.advance(WIND_UP_DURATION);

    manager.render().unwrap();

    let (size, buffer) = manager.backend().last_frame.clone().unwrap();
    assert_eq!(size, SurfaceSize::new(400, 300));

    let white = Color::WHITE.to_premultiplied();
    let pixels: Vec<&[u8]> = buffer.chunks_exact(4).collect();
    assert_eq!(pixels[0], &white[..]);
    assert!(pixels.iter().all(|pixel| pixel[3] == 255));
    assert!(pixels.iter().any(|pixel| *pixel != &white[..]));
}
