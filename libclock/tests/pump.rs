mod common;

use common::{CountingScene, MockBackend};
use libclock::{
    ClockEvent, FramePump, GraphicsDeviceManager, PumpMode, SurfaceSize,
    device::{PresentMode, PresentStatus},
};

fn pump() -> FramePump<MockBackend, CountingScene> {
    let manager = GraphicsDeviceManager::new(MockBackend::new(320, 240), CountingScene::default(), 96.0);
    FramePump::new(manager)
}

#[test]
fn paint_renders_a_frame() {
    let mut pump = pump();

    pump.dispatch(ClockEvent::Paint).unwrap();

    assert_eq!(pump.manager().scene().draws.len(), 1);
    assert_eq!(pump.manager().backend().presents.len(), 1);
}

#[test]
fn display_change_renders_a_frame() {
    let mut pump = pump();

    pump.dispatch(ClockEvent::DisplayChange).unwrap();

    assert_eq!(pump.manager().scene().draws.len(), 1);
}

#[test]
fn resize_before_first_frame_is_ignored() {
    let mut pump = pump();

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(640, 480),
        minimized: false,
    })
    .unwrap();

    assert!(!pump.manager().has_device());
    assert!(pump.manager().scene().draws.is_empty());
}

#[test]
fn minimized_resize_keeps_bitmaps() {
    let mut pump = pump();
    pump.dispatch(ClockEvent::Paint).unwrap();

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(0, 0),
        minimized: true,
    })
    .unwrap();

    let manager = pump.manager();
    assert!(manager.backend().resizes.is_empty());
    assert_eq!(manager.scene().size_resources.len(), 1);
    assert_eq!(manager.scene().draws.len(), 1);
    assert_eq!(manager.surface().unwrap().size(), SurfaceSize::new(320, 240));
}

#[test]
fn resize_recreates_bitmaps_once_and_redraws() {
    let mut pump = pump();
    pump.dispatch(ClockEvent::Paint).unwrap();

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(640, 480),
        minimized: false,
    })
    .unwrap();

    let manager = pump.manager();
    assert_eq!(manager.backend().resizes.len(), 1);
    assert_eq!(manager.scene().size_resources.len(), 2);
    assert_eq!(manager.scene().draws.len(), 2);
    assert_eq!(manager.scene().draws[1].size, SurfaceSize::new(640, 480));
}

#[test]
fn dpi_change_reaches_the_surface() {
    let mut pump = pump();
    pump.dispatch(ClockEvent::Paint).unwrap();

    pump.dispatch(ClockEvent::DpiChange(120.0)).unwrap();

    assert_eq!(pump.manager().surface().unwrap().dpi(), 120.0);
    assert_eq!(pump.manager().scene().size_resources.len(), 2);
}

#[test]
fn hidden_window_waits_instead_of_rendering() {
    let mut pump = pump();
    assert_eq!(pump.mode(), PumpMode::Poll);

    pump.dispatch(ClockEvent::VisibilityChange(false)).unwrap();

    assert_eq!(pump.mode(), PumpMode::Wait);
    assert_eq!(pump.tick(), Ok(None));
    assert!(pump.manager().scene().draws.is_empty());

    pump.dispatch(ClockEvent::VisibilityChange(true)).unwrap();

    assert_eq!(pump.mode(), PumpMode::Poll);
    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Presented)));
}

#[test]
fn occluded_present_switches_to_wait_until_retest() {
    let mut pump = pump();
    pump.manager_mut()
        .backend_mut()
        .present_script
        .push_back(PresentStatus::Occluded);

    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Occluded)));
    assert_eq!(pump.mode(), PumpMode::Wait);
    assert_eq!(pump.tick(), Ok(None));

    pump.dispatch(ClockEvent::OcclusionRetest).unwrap();

    assert_eq!(pump.mode(), PumpMode::Poll);
    let presents = &pump.manager().backend().presents;
    assert_eq!(presents.last().map(|(_, mode)| *mode), Some(PresentMode::Test));
}

#[test]
fn restore_resize_resumes_polling_after_occlusion() {
    let mut pump = pump();
    pump.manager_mut()
        .backend_mut()
        .present_script
        .push_back(PresentStatus::Occluded);

    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Occluded)));
    assert_eq!(pump.mode(), PumpMode::Wait);

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(320, 240),
        minimized: false,
    })
    .unwrap();

    assert_eq!(pump.mode(), PumpMode::Poll);
    assert!(!pump.manager().is_occlusion_registered());
    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Presented)));

    let backend = pump.manager().backend();
    assert_eq!(backend.unregistered, backend.registered);
}

#[test]
fn minimized_resize_leaves_occlusion_registered() {
    let mut pump = pump();
    pump.manager_mut()
        .backend_mut()
        .present_script
        .push_back(PresentStatus::Occluded);
    pump.tick().unwrap();

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(0, 0),
        minimized: true,
    })
    .unwrap();

    assert_eq!(pump.mode(), PumpMode::Wait);
    assert!(pump.manager().is_occlusion_registered());
    assert!(pump
        .manager()
        .backend()
        .presents
        .iter()
        .all(|(_, mode)| *mode == PresentMode::Vsync));
}

#[test]
fn restore_resize_while_still_hidden_keeps_waiting() {
    let mut pump = pump();
    pump.manager_mut()
        .backend_mut()
        .present_script
        .push_back(PresentStatus::Occluded);
    pump.tick().unwrap();
    pump.manager_mut()
        .backend_mut()
        .test_script
        .push_back(PresentStatus::Occluded);

    pump.dispatch(ClockEvent::Resize {
        size: SurfaceSize::new(320, 240),
        minimized: false,
    })
    .unwrap();

    assert_eq!(pump.mode(), PumpMode::Wait);
    assert!(pump.manager().is_occlusion_registered());
}

#[test]
fn lost_device_recovers_on_next_tick() {
    let mut pump = pump();
    pump.manager_mut().backend_mut().present_script.push_back(PresentStatus::Lost);

    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Lost)));
    assert_eq!(pump.mode(), PumpMode::Poll);
    assert_eq!(pump.tick(), Ok(Some(PresentStatus::Presented)));
    assert_eq!(pump.manager().backend().devices.len(), 2);
}

#[test]
fn close_stops_the_loop() {
    let mut pump = pump();

    pump.dispatch(ClockEvent::Close).unwrap();

    assert!(pump.is_closed());
    assert_eq!(pump.mode(), PumpMode::Wait);
    assert_eq!(pump.tick(), Ok(None));
}
