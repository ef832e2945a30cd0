//! Drag-to-orbit camera controller with auto-rotation.
//!
//! The controller keeps no copy of the camera: every `update` reads the
//! camera position, converts the offset from the target into spherical
//! coordinates, applies the accumulated input and writes the position back.
//! Moving the camera directly between updates is therefore respected.

use crate::constants::{
    AUTO_ROTATE_SPEED, ORBIT_DAMPING_FACTOR, ORBIT_POLAR_EPS, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SPEED,
};
use crate::scene::PerspectiveCamera;
use glam::{Vec2, Vec3};
use std::f32::consts::{PI, TAU};

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub auto_rotate: bool,
    /// 1.0 completes one orbit every 60 s at 60 updates per second.
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: false,
            enable_pan: false,
            auto_rotate: true,
            auto_rotate_speed: AUTO_ROTATE_SPEED,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            enable_damping: false,
            damping_factor: ORBIT_DAMPING_FACTOR,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

/// `theta` is the azimuth around +Y measured from +Z, `phi` the polar angle
/// from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Spherical {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_r = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_r * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_r * self.theta.cos(),
        )
    }
}

pub struct OrbitController {
    pub settings: OrbitSettings,
    target: Vec3,
    delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
    drag_from: Option<Vec2>,
}

impl OrbitController {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            target: Vec3::ZERO,
            delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
            drag_from: None,
        }
    }

    #[inline]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.drag_from.is_some()
    }

    /// Per-update azimuth step used by auto-rotation.
    #[inline]
    pub fn auto_rotation_angle(&self) -> f32 {
        TAU / 60.0 / 60.0 * self.settings.auto_rotate_speed
    }

    pub fn pointer_down(&mut self, pos: Vec2) {
        if !self.settings.enable_rotate {
            return;
        }
        self.drag_from = Some(pos);
    }

    /// `viewport_height` is the client height of the canvas in CSS pixels.
    pub fn pointer_move(&mut self, pos: Vec2, viewport_height: f32) {
        let Some(from) = self.drag_from else {
            return;
        };
        let h = viewport_height.max(1.0);
        let d = (pos - from) * self.settings.rotate_speed;
        self.rotate_left(TAU * d.x / h);
        self.rotate_up(TAU * d.y / h);
        self.drag_from = Some(pos);
    }

    pub fn pointer_up(&mut self) {
        self.drag_from = None;
    }

    /// Wheel input. Negative `delta_y` moves toward the target.
    pub fn wheel(&mut self, delta_y: f32) {
        if !self.settings.enable_zoom {
            return;
        }
        let step = 0.95f32.powf(self.settings.zoom_speed);
        if delta_y < 0.0 {
            self.scale *= step;
        } else if delta_y > 0.0 {
            self.scale /= step;
        }
    }

    /// Screen-space pan by a pixel delta.
    pub fn pan(&mut self, delta_px: Vec2, camera: &PerspectiveCamera, viewport_height: f32) {
        if !self.settings.enable_pan {
            return;
        }
        let h = viewport_height.max(1.0);
        let distance =
            (camera.position - self.target).length() * (camera.fov_deg.to_radians() / 2.0).tan();
        let world = camera.world_matrix();
        let right = world.x_axis.truncate();
        let up = world.y_axis.truncate();
        self.pan_offset += right * (-2.0 * delta_px.x * distance / h);
        self.pan_offset += up * (2.0 * delta_px.y * distance / h);
    }

    /// Apply pending input and auto-rotation to the camera. Returns whether
    /// the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let mut s = Spherical::from_offset(camera.position - self.target);

        if self.settings.auto_rotate && self.drag_from.is_none() {
            self.rotate_left(self.auto_rotation_angle());
        }

        let k = if self.settings.enable_damping {
            self.settings.damping_factor
        } else {
            1.0
        };
        s.theta += self.delta.theta * k;
        s.phi += self.delta.phi * k;
        s.phi = s
            .phi
            .clamp(self.settings.min_polar_angle, self.settings.max_polar_angle)
            .clamp(ORBIT_POLAR_EPS, PI - ORBIT_POLAR_EPS);
        s.radius = (s.radius * self.scale)
            .clamp(self.settings.min_distance, self.settings.max_distance);
        self.target += self.pan_offset * k;

        let before = camera.position;
        camera.position = self.target + s.to_offset();
        camera.target = self.target;

        if self.settings.enable_damping {
            self.delta.theta *= 1.0 - k;
            self.delta.phi *= 1.0 - k;
            self.pan_offset *= 1.0 - k;
        } else {
            self.delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        before.distance_squared(camera.position) > 1e-12
    }

    #[inline]
    fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    #[inline]
    fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new(OrbitSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spherical_roundtrip_keeps_offset() {
        let v = Vec3::new(3.0, -2.0, 5.0);
        let back = Spherical::from_offset(v).to_offset();
        assert!(back.abs_diff_eq(v, 1e-4));
    }

    #[test]
    fn zero_offset_is_not_nan() {
        let s = Spherical::from_offset(Vec3::ZERO);
        assert_eq!(s, Spherical::default());
    }
}
