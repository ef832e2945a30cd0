// Frame tick and window event behavior of the render state.

use approx::assert_relative_eq;
use scene_core::orbit::OrbitController;
use scene_core::scene::Scene;
use scene_core::state::{scroll_rotation, EffectIntensity, RenderState, Viewport};
use std::f64::consts::TAU;

fn setup(w: u32, h: u32) -> (Scene, OrbitController, RenderState) {
    let viewport = Viewport::new(w, h);
    (
        Scene::new(viewport),
        OrbitController::default(),
        RenderState::new(viewport, false),
    )
}

#[test]
fn smoothing_step_matches_formula() {
    for &(a, c) in &[(1.0f32, 0.0f32), (0.0, 1.0), (0.3, 0.7), (0.5, 0.5)] {
        let mut e = EffectIntensity::default();
        // walk current to c without assigning it
        e.set_aim(c);
        for _ in 0..2000 {
            e.step();
        }
        let start = e.current();
        e.set_aim(a);
        let next = e.step();
        assert_relative_eq!(next, start + (a - start) * 0.05, epsilon = 1e-6);
    }
}

#[test]
fn smoothing_approaches_without_overshoot() {
    let mut e = EffectIntensity::default();
    e.set_aim(1.0);
    let mut prev = e.current();
    for _ in 0..500 {
        let v = e.step();
        assert!(v >= prev);
        assert!(v <= 1.0);
        prev = v;
    }

    e.set_aim(0.0);
    for _ in 0..500 {
        let v = e.step();
        assert!(v <= prev);
        assert!(v >= 0.0);
        prev = v;
    }
}

#[test]
fn effect_reaches_threshold_after_sixty_ticks() {
    let (mut scene, mut orbit, mut state) = setup(1600, 900);
    state.effect.set_aim(1.0);
    let first = state.tick(&mut scene, &mut orbit, 0.0, 0.016);
    assert_relative_eq!(first.effect, 0.05, epsilon = 1e-6);
    let mut last = first;
    for i in 1..60 {
        last = state.tick(&mut scene, &mut orbit, 0.0, 0.016 * (i + 1) as f64);
    }
    assert!(last.effect > 0.95, "effect {}", last.effect);
}

#[test]
fn tick_pushes_time_and_effect_uniforms() {
    let (mut scene, mut orbit, mut state) = setup(800, 600);
    let u = state.tick(&mut scene, &mut orbit, 0.0, 2.5);
    assert_eq!(u.time, 2.5);
    assert_eq!(u.effect, 0.0);
    assert_eq!(state.noise(), u);
}

#[test]
fn startup_aspect_matches_viewport() {
    let (scene, _, state) = setup(1600, 900);
    assert_eq!(scene.camera.aspect, 1600.0 / 900.0);
    assert_eq!(state.noise().aspect_ratio, 1600.0 / 900.0);
}

#[test]
fn scroll_rotation_wraps_one_turn() {
    let r = scroll_rotation(2000.0);
    assert_relative_eq!(r as f64, 10.0 % TAU, epsilon = 1e-6);
    assert_relative_eq!(scroll_rotation(-2000.0) as f64, -(10.0 % TAU), epsilon = 1e-6);
    assert_eq!(scroll_rotation(0.0), 0.0);
}

#[test]
fn scroll_event_and_tick_agree_without_drift() {
    let (mut scene, mut orbit, mut state) = setup(800, 600);
    state.on_scroll(&mut scene, 2000.0, 0.0);
    assert_relative_eq!(
        scene.scroll_group().rotation_y() as f64,
        10.0 % TAU,
        epsilon = 1e-6
    );
    for i in 0..100 {
        state.tick(&mut scene, &mut orbit, 2000.0, i as f64 * 0.016);
        state.on_scroll(&mut scene, 2000.0, i as f64 * 0.016);
    }
    assert_eq!(scene.scroll_group().rotation_y(), scroll_rotation(2000.0));
    assert_eq!(state.scroll_rotation(), scroll_rotation(2000.0));
}

#[test]
fn resize_updates_camera_and_noise_idempotently() {
    let (mut scene, _, mut state) = setup(800, 600);
    let vp = Viewport::new(1280, 720);
    assert!(state.on_resize(&mut scene, vp));
    let proj = scene.camera.projection_matrix();
    assert!(state.on_resize(&mut scene, vp));
    assert_eq!(scene.camera.aspect, 1280.0 / 720.0);
    assert_eq!(state.noise().aspect_ratio, 1280.0 / 720.0);
    assert_eq!(state.viewport(), vp);
    assert_eq!(scene.camera.projection_matrix(), proj);
}

#[test]
fn resize_changes_projection() {
    let (mut scene, _, mut state) = setup(800, 600);
    let before = scene.camera.projection_matrix();
    state.on_resize(&mut scene, Viewport::new(600, 800));
    assert_ne!(scene.camera.projection_matrix(), before);
}

#[test]
fn resize_ignores_empty_viewport() {
    let (mut scene, _, mut state) = setup(800, 600);
    assert!(!state.on_resize(&mut scene, Viewport::new(0, 600)));
    assert_eq!(state.viewport(), Viewport::new(800, 600));
    assert_eq!(scene.camera.aspect, 800.0 / 600.0);
}

#[test]
fn scroll_pulse_is_off_by_default() {
    let (mut scene, mut orbit, mut state) = setup(800, 600);
    state.on_scroll(&mut scene, 500.0, 0.0);
    let u = state.tick(&mut scene, &mut orbit, 500.0, 0.016);
    assert_eq!(u.effect, 0.0);
    assert_eq!(state.effect.aim(), 0.0);
}

#[test]
fn enabled_scroll_pulse_raises_then_releases_aim() {
    let viewport = Viewport::new(800, 600);
    let mut scene = Scene::new(viewport);
    let mut orbit = OrbitController::default();
    let mut state = RenderState::new(viewport, true);

    state.on_scroll(&mut scene, 100.0, 1.0);
    let u = state.tick(&mut scene, &mut orbit, 100.0, 1.1);
    assert!(u.effect > 0.0);
    assert_eq!(state.effect.aim(), 1.0);

    state.tick(&mut scene, &mut orbit, 100.0, 1.6);
    assert_eq!(state.effect.aim(), 0.0);
}

#[test]
fn resize_before_first_tick_reaches_first_frame() {
    let (mut scene, mut orbit, mut state) = setup(800, 600);
    let vp = Viewport::new(1920, 1080);
    assert!(state.on_resize(&mut scene, vp));
    let u = state.tick(&mut scene, &mut orbit, 0.0, 0.016);
    assert_eq!(u.aspect_ratio, 1920.0 / 1080.0);
    assert_eq!(scene.camera.aspect, 1920.0 / 1080.0);
    assert_eq!(state.viewport(), vp);
}
