// Orbit controller behavior against a live camera.

use approx::assert_relative_eq;
use glam::{Vec2, Vec3};
use scene_core::orbit::{OrbitController, OrbitSettings};
use scene_core::scene::PerspectiveCamera;
use std::f32::consts::{PI, TAU};

fn azimuth(camera: &PerspectiveCamera) -> f32 {
    camera.position.x.atan2(camera.position.z)
}

fn wrap(a: f32) -> f32 {
    (a + PI).rem_euclid(TAU) - PI
}

#[test]
fn auto_rotation_steps_fixed_angle_per_update() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::default();
    let start = azimuth(&camera);
    let distance = camera.position.length();

    assert!(orbit.update(&mut camera));
    let step = TAU / 3600.0 * 3.0;
    assert_relative_eq!(orbit.auto_rotation_angle(), step, epsilon = 1e-7);
    assert_relative_eq!(wrap(azimuth(&camera) - start), -step, epsilon = 1e-4);
    assert_relative_eq!(camera.position.length(), distance, epsilon = 1e-2);
    assert_eq!(camera.target, Vec3::ZERO);
}

#[test]
fn auto_rotation_pauses_while_dragging() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::default();
    orbit.pointer_down(Vec2::new(10.0, 10.0));
    let before = camera.position;
    orbit.update(&mut camera);
    assert!(camera.position.abs_diff_eq(before, 1e-3));
    orbit.pointer_up();
    assert!(!orbit.is_dragging());
}

#[test]
fn horizontal_drag_rotates_by_screen_fraction() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::new(OrbitSettings {
        auto_rotate: false,
        ..OrbitSettings::default()
    });
    let start = azimuth(&camera);
    orbit.pointer_down(Vec2::new(0.0, 100.0));
    // a quarter of the viewport height is a quarter turn
    orbit.pointer_move(Vec2::new(200.0, 100.0), 800.0);
    orbit.update(&mut camera);
    assert_relative_eq!(wrap(azimuth(&camera) - start), -TAU / 4.0, epsilon = 1e-3);
}

#[test]
fn vertical_drag_is_clamped_at_the_pole() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::new(OrbitSettings {
        auto_rotate: false,
        ..OrbitSettings::default()
    });
    orbit.pointer_down(Vec2::ZERO);
    orbit.pointer_move(Vec2::new(0.0, 5000.0), 100.0);
    orbit.update(&mut camera);
    assert!(camera.position.y.is_finite());
    assert!(camera.position.y > 0.0);
    assert_relative_eq!(camera.position.length(), 400.0, epsilon = 1e-1);
}

#[test]
fn zoom_and_pan_are_disabled() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::new(OrbitSettings {
        auto_rotate: false,
        ..OrbitSettings::default()
    });
    let before = camera.position;
    orbit.wheel(-120.0);
    orbit.pan(Vec2::new(50.0, 50.0), &camera, 600.0);
    orbit.update(&mut camera);
    assert!(camera.position.abs_diff_eq(before, 1e-3));
    assert_eq!(orbit.target(), Vec3::ZERO);
}

#[test]
fn zoom_when_enabled_moves_toward_target() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::new(OrbitSettings {
        auto_rotate: false,
        enable_zoom: true,
        ..OrbitSettings::default()
    });
    orbit.wheel(-120.0);
    orbit.update(&mut camera);
    assert_relative_eq!(camera.position.length(), 380.0, epsilon = 1e-2);
}

#[test]
fn damping_spreads_drag_over_frames() {
    let mut camera = PerspectiveCamera::new(1.0);
    let mut orbit = OrbitController::new(OrbitSettings {
        auto_rotate: false,
        enable_damping: true,
        ..OrbitSettings::default()
    });
    let start = azimuth(&camera);
    orbit.pointer_down(Vec2::ZERO);
    orbit.pointer_move(Vec2::new(100.0, 0.0), 400.0);
    orbit.pointer_up();
    orbit.update(&mut camera);
    let first = wrap(azimuth(&camera) - start);
    orbit.update(&mut camera);
    let second = wrap(azimuth(&camera) - start);
    assert!(first.abs() < TAU / 4.0);
    assert!(second.abs() > first.abs());
}
