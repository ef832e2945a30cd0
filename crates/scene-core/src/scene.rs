//! The fixed scene hierarchy of the page.
//!
//! `Scene` owns the camera (with its light rig) and the scroll group; the
//! scroll group owns the load group; the load group owns the model once it
//! arrives. Ownership is plain nesting, so there are no shared handles to keep
//! in sync.

use crate::constants::*;
use crate::error::{Result, SceneError};
use crate::model::Model;
use crate::state::Viewport;
use glam::{Mat4, Vec3, Vec4};

/// Convert one sRGB-encoded channel to linear.
#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Decode a `0xRRGGBB` color into linear RGB.
pub fn srgb_hex_to_linear(hex: u32) -> Vec3 {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Right-handed perspective camera with a cached projection matrix.
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub fov_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            fov_deg: CAMERA_FOV_DEG,
            aspect,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            position: Vec3::new(0.0, 0.0, CAMERA_START_Z),
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov_deg.to_radians(), self.aspect, self.near, self.far);
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-world transform, used to place camera-attached children.
    #[inline]
    pub fn world_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// Directional light parented to the camera. `position` is camera-local and
/// the light always aims at the world origin.
#[derive(Clone, Copy, Debug)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
}

impl DirectionalLight {
    /// Unit vector from the world origin toward the light.
    pub fn world_direction(&self, camera: &PerspectiveCamera) -> Vec3 {
        camera
            .world_matrix()
            .transform_point3(self.position)
            .normalize_or_zero()
    }

    #[inline]
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LightRig {
    pub ambient: AmbientLight,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: srgb_hex_to_linear(AMBIENT_COLOR_HEX),
                intensity: AMBIENT_INTENSITY,
            },
            key: DirectionalLight {
                color: srgb_hex_to_linear(KEY_LIGHT_COLOR_HEX),
                intensity: KEY_LIGHT_INTENSITY,
                position: Vec3::from(KEY_LIGHT_POSITION),
            },
            fill: DirectionalLight {
                color: srgb_hex_to_linear(FILL_LIGHT_COLOR_HEX),
                intensity: FILL_LIGHT_INTENSITY,
                position: Vec3::from(FILL_LIGHT_POSITION),
            },
        }
    }
}

/// Container the loaded model is parented to.
#[derive(Debug)]
pub struct LoadGroup {
    offset: Vec3,
    model: Option<Model>,
}

impl LoadGroup {
    fn new() -> Self {
        Self {
            offset: Vec3::new(0.0, LOAD_GROUP_OFFSET_Y, 0.0),
            model: None,
        }
    }

    /// Parent `model` here. A second model is rejected, never stacked.
    pub fn attach(&mut self, model: Model) -> Result<&Model> {
        if self.model.is_some() {
            return Err(SceneError::AssetAlreadyAttached);
        }
        Ok(self.model.insert(model))
    }

    #[inline]
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    #[inline]
    pub fn offset(&self) -> Vec3 {
        self.offset
    }

    #[inline]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.offset)
    }
}

/// Wrapper rotated about Y by the page scroll offset.
#[derive(Debug)]
pub struct ScrollGroup {
    rotation_y: f32,
    load_group: LoadGroup,
}

impl ScrollGroup {
    #[inline]
    pub fn set_rotation_y(&mut self, radians: f32) {
        self.rotation_y = radians;
    }

    #[inline]
    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    #[inline]
    pub fn load_group(&self) -> &LoadGroup {
        &self.load_group
    }

    #[inline]
    pub fn load_group_mut(&mut self) -> &mut LoadGroup {
        &mut self.load_group
    }

    #[inline]
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation_y)
    }
}

/// Initialization phase. The asset phase is entered once and never left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    SceneReady,
    AssetReady,
}

/// Scene-pass uniform block. Layout matches `scene.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub ambient: [f32; 4],
    pub key_dir: [f32; 4],
    pub key_radiance: [f32; 4],
    pub fill_dir: [f32; 4],
    pub fill_radiance: [f32; 4],
}

pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lights: LightRig,
    scroll_group: ScrollGroup,
}

impl Scene {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            camera: PerspectiveCamera::new(viewport.aspect()),
            lights: LightRig::default(),
            scroll_group: ScrollGroup {
                rotation_y: 0.0,
                load_group: LoadGroup::new(),
            },
        }
    }

    pub fn phase(&self) -> Phase {
        if self.model().is_some() {
            Phase::AssetReady
        } else {
            Phase::SceneReady
        }
    }

    pub fn attach_model(&mut self, model: Model) -> Result<&Model> {
        let model = self.scroll_group.load_group.attach(model)?;
        log::info!(
            "[scene] model attached: {} vertices, {} triangles",
            model.vertex_count(),
            model.triangle_count()
        );
        Ok(model)
    }

    #[inline]
    pub fn model(&self) -> Option<&Model> {
        self.scroll_group.load_group.model()
    }

    #[inline]
    pub fn scroll_group(&self) -> &ScrollGroup {
        &self.scroll_group
    }

    #[inline]
    pub fn scroll_group_mut(&mut self) -> &mut ScrollGroup {
        &mut self.scroll_group
    }

    /// World transform of the model: scroll rotation applied after the load
    /// group offset.
    pub fn model_matrix(&self) -> Mat4 {
        self.scroll_group.local_matrix() * self.scroll_group.load_group.local_matrix()
    }

    pub fn uniforms(&self) -> SceneUniforms {
        let model = self.model_matrix();
        let view_proj = self.camera.projection_matrix() * self.camera.view_matrix();
        let ambient = self.lights.ambient.color * self.lights.ambient.intensity;
        SceneUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            ambient: ambient.extend(1.0).to_array(),
            key_dir: self.lights.key.world_direction(&self.camera).extend(0.0).to_array(),
            key_radiance: self.lights.key.radiance().extend(0.0).to_array(),
            fill_dir: self.lights.fill.world_direction(&self.camera).extend(0.0).to_array(),
            fill_radiance: self.lights.fill.radiance().extend(0.0).to_array(),
        }
    }
}

impl SceneUniforms {
    #[inline]
    pub fn key_direction(&self) -> Vec3 {
        Vec4::from_array(self.key_dir).truncate()
    }
}
