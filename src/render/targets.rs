use super::helpers;
use super::{DEPTH_FORMAT, HDR_FORMAT};

/// Offscreen targets for the three-pass pipeline.
///
/// - `scene_*` receives the lit model in linear HDR.
/// - `depth_*` is the scene pass depth buffer.
/// - `noise_*` receives the noise pass and feeds the output pass.
pub(crate) struct RenderTargets {
    pub(crate) scene_tex: wgpu::Texture,
    pub(crate) scene_view: wgpu::TextureView,
    pub(crate) depth_tex: wgpu::Texture,
    pub(crate) depth_view: wgpu::TextureView,
    pub(crate) noise_tex: wgpu::Texture,
    pub(crate) noise_view: wgpu::TextureView,
}

impl RenderTargets {
    pub(crate) fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (scene_tex, scene_view) =
            helpers::create_color_target(device, "scene_tex", width, height, HDR_FORMAT);
        let (depth_tex, depth_view) =
            helpers::create_depth_target(device, width, height, DEPTH_FORMAT);
        let (noise_tex, noise_view) =
            helpers::create_color_target(device, "noise_tex", width, height, HDR_FORMAT);
        Self {
            scene_tex,
            scene_view,
            depth_tex,
            depth_view,
            noise_tex,
            noise_view,
        }
    }

    pub(crate) fn recreate(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.scene_tex.destroy();
        self.depth_tex.destroy();
        self.noise_tex.destroy();
        *self = Self::new(device, width, height);
    }
}
