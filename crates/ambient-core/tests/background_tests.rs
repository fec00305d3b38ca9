// Frame loop lifecycle and rotation modes, driven by a manual clock.

mod common;

use ambient_core::*;
use common::*;

fn start(mode: Mode) -> (
    Background<RecordingBackend>,
    std::rc::Rc<ManualScheduler>,
    std::rc::Rc<std::cell::RefCell<BackendLog>>,
    std::rc::Rc<std::cell::RefCell<InputLog>>,
) {
    let (backend, backend_log) = RecordingBackend::new();
    let scheduler = ManualScheduler::new();
    let (input, input_log) = ManualInput::new();
    let bg = Background::start(
        backend,
        seeded_config(mode),
        viewport(),
        scheduler.clone(),
        input,
    )
    .unwrap();
    (bg, scheduler, backend_log, input_log)
}

#[test]
fn start_connects_input_and_schedules_one_frame() {
    let (bg, scheduler, _backend, input) = start(Mode::Trails);
    assert!(bg.is_running());
    assert_eq!(input.borrow().connects, 1);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn each_frame_ticks_and_reschedules() {
    let (bg, scheduler, backend, _input) = start(Mode::Trails);
    scheduler.run_frames(0.0, 16.0, 10);
    assert_eq!(backend.borrow().draws, 10);
    assert_eq!(bg.with_controller(|c| c.frames()), 10);
    assert_eq!(scheduler.pending(), 1);
}

#[test]
fn dispose_twice_tears_down_once() {
    let (bg, scheduler, backend, input) = start(Mode::Branches);
    scheduler.run_frames(0.0, 16.0, 20);

    bg.dispose();
    bg.dispose();

    assert!(!bg.is_running());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(scheduler.cancelled.borrow().len(), 1);
    assert_eq!(input.borrow().disconnects, 1);
    assert!(!input.borrow().listening());

    let log = backend.borrow();
    assert_eq!(log.shutdowns, 1);
    assert_eq!(log.live(), 0);
    for (id, _) in &log.created {
        assert_eq!(log.release_count(*id), 1);
    }
}

#[test]
fn no_frames_run_after_dispose() {
    let (bg, scheduler, backend, _input) = start(Mode::Trails);
    scheduler.run_frame(0.0);
    bg.dispose();
    assert_eq!(scheduler.run_frame(16.0), 0);
    assert_eq!(backend.borrow().draws, 1);
}

#[test]
fn dropping_the_handle_disposes() {
    let (bg, scheduler, backend, input) = start(Mode::Trails);
    drop(bg);
    assert_eq!(backend.borrow().shutdowns, 1);
    assert_eq!(input.borrow().disconnects, 1);
    assert_eq!(scheduler.pending(), 0);
}

#[test]
fn failed_start_leaves_nothing_behind() {
    let (backend, backend_log) = RecordingBackend::failing_after(3);
    let scheduler = ManualScheduler::new();
    let (input, input_log) = ManualInput::new();
    let result = Background::start(
        backend,
        seeded_config(Mode::Trails),
        viewport(),
        scheduler.clone(),
        input,
    );
    assert!(result.is_err());
    assert_eq!(scheduler.pending(), 0);
    assert_eq!(input_log.borrow().connects, 0);
    assert_eq!(backend_log.borrow().live(), 0);
}

#[test]
fn resize_events_reach_the_controller() {
    let (bg, scheduler, backend, input) = start(Mode::Trails);
    scheduler.run_frame(0.0);
    let narrow = Viewport::new(600.0, 900.0, 2.0);
    resize(&input, narrow);
    scheduler.run_frame(16.0);
    assert_eq!(bg.with_controller(|c| c.viewport()), narrow);
    assert_eq!(backend.borrow().resizes.last().copied(), Some(narrow));
}

#[test]
fn scroll_switches_to_user_driven_and_idles_back() {
    let (bg, scheduler, _backend, input) = start(Mode::Trails);
    let mode = || bg.with_controller(|c| c.rotation_mode());

    // First frame at t=0 starts the warm-up clock (1000 ms by default).
    scheduler.run_frame(0.0);
    assert_eq!(mode(), RotationMode::Auto);

    scroll(&input, 360.0, 1100.0);
    scheduler.run_frame(1116.0);
    assert_eq!(mode(), RotationMode::UserDriven);

    // Still scrolling within the idle window.
    scroll(&input, 720.0, 2500.0);
    scheduler.run_frame(2516.0);
    scheduler.run_frame(5000.0);
    assert_eq!(mode(), RotationMode::UserDriven);

    // 3000 ms after the last event the scene spins on its own again.
    scheduler.run_frame(5500.0);
    assert_eq!(mode(), RotationMode::Auto);
}

#[test]
fn scroll_during_warmup_is_ignored() {
    let (bg, scheduler, _backend, input) = start(Mode::Trails);
    scheduler.run_frame(0.0);
    scroll(&input, 200.0, 100.0);
    scheduler.run_frame(116.0);
    assert_eq!(bg.with_controller(|c| c.rotation_mode()), RotationMode::Auto);

    // The warm-up event was consumed; passing warm-up alone changes nothing.
    scheduler.run_frame(1200.0);
    assert_eq!(bg.with_controller(|c| c.rotation_mode()), RotationMode::Auto);
}

#[test]
fn auto_mode_spins_about_y() {
    let (bg, scheduler, _backend, _input) = start(Mode::Trails);
    scheduler.run_frames(0.0, 16.0, 100);
    let angles = bg.with_controller(|c| c.rotation().angles());
    assert!((angles.y - 100.0 * constants::AUTO_ROTATE_Y).abs() < 1e-4);
    assert!(angles.z.abs() <= constants::SWAY_Z_AMPLITUDE + 1e-6);
}

#[test]
fn user_driven_pose_continues_from_the_auto_pose() {
    let (bg, scheduler, _backend, input) = start(Mode::Trails);
    scheduler.run_frames(0.0, 16.0, 80);
    let before = bg.with_controller(|c| c.rotation().angles().y);

    scroll(&input, 720.0, 1300.0);
    scheduler.run_frame(1316.0);
    let after = bg.with_controller(|c| c.rotation().angles().y);
    assert_eq!(bg.with_controller(|c| c.rotation_mode()), RotationMode::UserDriven);
    assert!((after - before).abs() < 1e-3, "pose jumped from {before} to {after}");
}

#[test]
fn scroll_is_normalized_by_viewport_height() {
    let mut state = InputState::new(Viewport::new(1000.0, 500.0, 1.0));
    state.record_scroll(250.0, 42.0);
    assert_eq!(state.scroll().normalized, 0.5);
    assert_eq!(state.scroll().last_event_ms, Some(42.0));
}
