//! Session & Camera Integration Tests
//!
//! Tests for:
//! - Selector: wrap-around in both directions
//! - FlyCamera: aim reconstruction, movement, sprint, mouse-look engage/release
//! - SessionState: key bindings, frame snapshots, model bob

use glam::{UVec2, Vec2, Vec3};
use umbra::config::AppConfig;
use umbra::renderer::DebugView;
use umbra::resources::input::{ButtonState, Input, Key, MouseButton};
use umbra::scene::{BOB_AMPLITUDE, CursorCommand, FlyCamera, Selector, SessionState, Technique};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn input_800x600() -> Input {
    let mut input = Input::new();
    input.inject_resize(800, 600);
    input
}

fn session() -> (SessionState, Input) {
    (SessionState::new(&AppConfig::default(), UVec2::new(800, 600)), input_800x600())
}

/// Presses `key` for exactly one update.
fn tap(state: &mut SessionState, input: &mut Input, key: Key) -> umbra::scene::UpdateOutcome {
    input.inject_key(key, ButtonState::Pressed);
    let outcome = state.update(input, 0.0);
    input.inject_key(key, ButtonState::Released);
    input.start_frame();
    outcome
}

// ============================================================================
// Selector
// ============================================================================

#[test]
fn selector_next_cycles_back_to_start() {
    for count in 1..=8 {
        for start in 0..count {
            let mut selector = Selector::new(start, count);
            for _ in 0..count {
                selector.next();
            }
            assert_eq!(selector.index(), start, "count {count}, start {start}");
        }
    }
}

#[test]
fn selector_previous_from_zero_wraps_to_last() {
    for count in 1..=8 {
        let mut selector = Selector::new(0, count);
        assert_eq!(selector.previous(), count - 1);
    }
}

#[test]
fn selector_clamps_out_of_range_start() {
    let selector = Selector::new(9, 6);
    assert_eq!(selector.index(), 3);
    assert_eq!(Selector::new(0, 0).count(), 1);
}

// ============================================================================
// FlyCamera
// ============================================================================

#[test]
fn camera_aim_follows_angle() {
    let camera = FlyCamera::new(Vec3::ZERO, -std::f32::consts::FRAC_PI_2);
    let aim = camera.aim_dir();
    assert!(approx(aim.x, 0.0) && approx(aim.y, 0.0) && approx(aim.z, -1.0), "aim {aim}");
    assert!(approx(camera.right_dir().x, 1.0));
}

#[test]
fn camera_moves_forward_and_sprints() {
    let mut input = input_800x600();
    input.inject_key(Key::W, ButtonState::Pressed);

    let mut walk = FlyCamera::new(Vec3::ZERO, -std::f32::consts::FRAC_PI_2);
    walk.update(&input, 1.0);
    assert!(approx(walk.position.z, -walk.move_speed));

    input.inject_key(Key::ShiftLeft, ButtonState::Pressed);
    let mut sprint = FlyCamera::new(Vec3::ZERO, -std::f32::consts::FRAC_PI_2);
    sprint.update(&input, 1.0);
    assert!(approx(sprint.position.z, -3.0 * sprint.move_speed));
}

#[test]
fn camera_strafe_and_vertical_movement() {
    let mut input = input_800x600();
    input.inject_key(Key::D, ButtonState::Pressed);
    input.inject_key(Key::Space, ButtonState::Pressed);

    let mut camera = FlyCamera::new(Vec3::ZERO, -std::f32::consts::FRAC_PI_2);
    camera.move_speed = 1.0;
    camera.update(&input, 0.5);

    assert!(approx(camera.position.x, 0.5));
    assert!(approx(camera.position.y, 0.5));
}

#[test]
fn camera_discards_first_look_frame() {
    let mut input = input_800x600();
    // Stale cursor far from the centre
    input.inject_mouse_position(790.0, 10.0);
    input.inject_mouse_button(MouseButton::Left, ButtonState::Pressed);

    let mut camera = FlyCamera::new(Vec3::ZERO, 0.0);
    let commands = camera.update(&input, 0.016);

    assert!(approx(camera.angle, 0.0));
    assert!(approx(camera.vertical_offset, 0.0));
    assert!(camera.is_look_engaged());
    assert!(commands.contains(&CursorCommand::Hide));
    assert!(commands.contains(&CursorCommand::Recenter(Vec2::new(400.0, 300.0))));
}

#[test]
fn camera_looks_relative_to_centre_then_releases() {
    let mut input = input_800x600();
    input.inject_mouse_button(MouseButton::Left, ButtonState::Pressed);

    let mut camera = FlyCamera::new(Vec3::ZERO, 0.0);
    camera.update(&input, 0.016);

    input.inject_mouse_position(480.0, 240.0);
    let commands = camera.update(&input, 0.016);
    assert!(approx(camera.angle, 80.0 / 800.0));
    assert!(approx(camera.vertical_offset, 60.0 / 600.0));
    assert!(!commands.contains(&CursorCommand::Hide));
    assert!(commands.contains(&CursorCommand::Recenter(Vec2::new(400.0, 300.0))));

    input.inject_mouse_button(MouseButton::Left, ButtonState::Released);
    let commands = camera.update(&input, 0.016);
    assert!(!camera.is_look_engaged());
    assert_eq!(commands.as_slice(), &[CursorCommand::Show]);
}

// ============================================================================
// SessionState
// ============================================================================

#[test]
fn session_starts_from_config_defaults() {
    let (state, _) = session();
    let frame = state.snapshot();

    assert_eq!(frame.mesh_index, 3);
    assert_eq!(frame.technique, Technique::Phong);
    assert_eq!(frame.debug_view, DebugView::Composite);
    assert!(!frame.ao_bypass);
    assert_eq!(frame.viewport, UVec2::new(800, 600));
}

#[test]
fn session_mesh_keys_wrap() {
    let (mut state, mut input) = session();

    tap(&mut state, &mut input, Key::NumpadAdd);
    assert_eq!(state.snapshot().mesh_index, 4);

    tap(&mut state, &mut input, Key::Equal);
    tap(&mut state, &mut input, Key::Equal);
    assert_eq!(state.snapshot().mesh_index, 0);

    tap(&mut state, &mut input, Key::Minus);
    assert_eq!(state.snapshot().mesh_index, 5);
}

#[test]
fn session_held_key_selects_once() {
    let (mut state, mut input) = session();
    input.inject_key(Key::NumpadAdd, ButtonState::Pressed);

    state.update(&input, 0.016);
    input.start_frame();
    state.update(&input, 0.016);

    assert_eq!(state.snapshot().mesh_index, 4);
}

#[test]
fn session_debug_view_keys() {
    let (mut state, mut input) = session();
    let keys = [Key::Key0, Key::Key1, Key::Key2, Key::Key3, Key::Key4];

    for (key, view) in keys.into_iter().zip(DebugView::ALL) {
        tap(&mut state, &mut input, key);
        assert_eq!(state.snapshot().debug_view, view);
    }
}

#[test]
fn session_technique_and_bypass_toggles() {
    let (mut state, mut input) = session();

    tap(&mut state, &mut input, Key::F2);
    assert_eq!(state.snapshot().technique, Technique::Reflective);
    tap(&mut state, &mut input, Key::F1);
    assert_eq!(state.snapshot().technique, Technique::Phong);

    tap(&mut state, &mut input, Key::O);
    assert!(state.snapshot().ao_bypass);
    tap(&mut state, &mut input, Key::O);
    assert!(!state.snapshot().ao_bypass);
}

#[test]
fn session_rotation_bobs_the_model() {
    let (mut state, mut input) = session();
    tap(&mut state, &mut input, Key::R);
    assert!(state.rotate);

    state.update(&input, 0.5);
    assert!(approx(state.model_angle, 0.5));

    let translation = state.model_matrix().w_axis;
    assert!(approx(translation.y, 0.5f32.sin() * BOB_AMPLITUDE));
}

#[test]
fn session_exit_and_screenshot_requests() {
    let (mut state, mut input) = session();

    assert!(tap(&mut state, &mut input, Key::F12).screenshot_requested);
    let outcome = tap(&mut state, &mut input, Key::Escape);
    assert!(outcome.exit_requested);
    assert!(!outcome.screenshot_requested);
}

#[test]
fn session_frame_advances_index_snapshot_does_not() {
    let (mut state, _) = session();

    assert_eq!(state.frame().frame_index, 1);
    assert_eq!(state.frame().frame_index, 2);
    assert_eq!(state.snapshot().frame_index, 2);
}

#[test]
fn session_viewport_survives_updates() {
    let (mut state, mut input) = session();
    input.inject_resize(1920, 1080);
    for _ in 0..10 {
        state.update(&input, 0.016);
        input.start_frame();
    }
    assert_eq!(state.frame().viewport, UVec2::new(800, 600));
}

#[test]
fn session_matrices_are_consistent() {
    let (state, _) = session();
    let frame = state.snapshot();
    let product = frame.projection * frame.view;
    assert!(product.abs_diff_eq(frame.view_projection, EPSILON));
    assert!((frame.camera_position - Vec3::new(0.0, 1.0, 6.5)).length() < EPSILON);
}
