//! Per-frame render state shared by the frame tick and the window event
//! handlers.
//!
//! Everything the loop mutates lives here instead of in free-floating
//! globals, so the tick can be driven from tests without a canvas.

use crate::constants::{
    EFFECT_SMOOTHING_RATE, SCROLL_PULSE_AIM, SCROLL_PULSE_HOLD_SEC, SCROLL_ROTATION_PER_PX,
};
use crate::orbit::OrbitController;
use crate::scene::Scene;
use instant::Instant;
use std::f64::consts::TAU;

/// Output surface size in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Strength of the noise distortion, eased toward an aim value every frame.
///
/// `current` is only ever moved by [`EffectIntensity::step`]; callers steer it
/// by changing the aim.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EffectIntensity {
    current: f32,
    aim: f32,
}

impl EffectIntensity {
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn aim(&self) -> f32 {
        self.aim
    }

    #[inline]
    pub fn set_aim(&mut self, aim: f32) {
        self.aim = aim;
    }

    /// Close a fixed fraction of the remaining gap and return the new value.
    #[inline]
    pub fn step(&mut self) -> f32 {
        self.current += (self.aim - self.current) * EFFECT_SMOOTHING_RATE;
        self.current
    }
}

/// Raises the effect aim while the page is being scrolled.
///
/// Off unless explicitly enabled. Each scroll re-arms the release deadline;
/// the frame tick drops the aim back to zero once the deadline has passed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollPulse {
    enabled: bool,
    release_at: Option<f64>,
}

impl ScrollPulse {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            release_at: None,
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn pending_release(&self) -> Option<f64> {
        self.release_at
    }

    pub fn trigger(&mut self, effect: &mut EffectIntensity, now_sec: f64) {
        if !self.enabled {
            return;
        }
        effect.set_aim(SCROLL_PULSE_AIM);
        self.release_at = Some(now_sec + SCROLL_PULSE_HOLD_SEC);
    }

    pub fn expire(&mut self, effect: &mut EffectIntensity, now_sec: f64) {
        if let Some(at) = self.release_at {
            if now_sec >= at {
                effect.set_aim(0.0);
                self.release_at = None;
            }
        }
    }
}

/// Uniform block of the noise pass. Layout matches `noise.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NoiseUniforms {
    pub time: f32,
    pub effect: f32,
    pub aspect_ratio: f32,
    pub _pad: f32,
}

/// Y rotation of the scroll group for a vertical scroll offset.
///
/// Recomputed from the live offset each time; wrapped to one turn with the
/// sign of the offset preserved.
#[inline]
pub fn scroll_rotation(scroll_y: f64) -> f32 {
    ((scroll_y * SCROLL_ROTATION_PER_PX) % TAU) as f32
}

/// Monotonic seconds since the scene started.
#[derive(Clone, Copy, Debug)]
pub struct Clock {
    start: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

pub struct RenderState {
    pub effect: EffectIntensity,
    pub pulse: ScrollPulse,
    scroll_rotation: f32,
    viewport: Viewport,
    noise: NoiseUniforms,
}

impl RenderState {
    pub fn new(viewport: Viewport, scroll_pulse: bool) -> Self {
        Self {
            effect: EffectIntensity::default(),
            pulse: ScrollPulse::new(scroll_pulse),
            scroll_rotation: 0.0,
            viewport,
            noise: NoiseUniforms {
                time: 0.0,
                effect: 0.0,
                aspect_ratio: viewport.aspect(),
                _pad: 0.0,
            },
        }
    }

    /// Advance one frame and return the uniforms the render call must use.
    pub fn tick(
        &mut self,
        scene: &mut Scene,
        orbit: &mut OrbitController,
        scroll_y: f64,
        elapsed_sec: f64,
    ) -> NoiseUniforms {
        orbit.update(&mut scene.camera);
        self.apply_scroll(scene, scroll_y);
        self.pulse.expire(&mut self.effect, elapsed_sec);
        let effect = self.effect.step();
        self.noise.time = elapsed_sec as f32;
        self.noise.effect = effect;
        self.noise
    }

    pub fn on_scroll(&mut self, scene: &mut Scene, scroll_y: f64, now_sec: f64) {
        self.pulse.trigger(&mut self.effect, now_sec);
        self.apply_scroll(scene, scroll_y);
    }

    /// Returns false when the viewport is degenerate and nothing changed.
    pub fn on_resize(&mut self, scene: &mut Scene, viewport: Viewport) -> bool {
        if viewport.is_empty() {
            log::debug!(
                "[resize] ignoring empty viewport {}x{}",
                viewport.width,
                viewport.height
            );
            return false;
        }
        self.viewport = viewport;
        scene.camera.set_aspect(viewport.aspect());
        self.noise.aspect_ratio = viewport.aspect();
        true
    }

    #[inline]
    pub fn scroll_rotation(&self) -> f32 {
        self.scroll_rotation
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn noise(&self) -> NoiseUniforms {
        self.noise
    }

    fn apply_scroll(&mut self, scene: &mut Scene, scroll_y: f64) {
        self.scroll_rotation = scroll_rotation(scroll_y);
        scene.scroll_group_mut().set_rotation_y(self.scroll_rotation);
    }
}
