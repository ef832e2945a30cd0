use crate::constants::{CLEAR_RGBA, DEPTH_CLEAR, MAX_FRAME_LATENCY};
use scene_core::{Model, NoiseUniforms, SceneUniforms, ToneMapping};
use web_sys as web;

mod helpers;
mod mesh;
mod post;
mod targets;

use mesh::{GpuMesh, ScenePass};
use post::{OutputUniforms, PostResources};
use targets::RenderTargets;

pub(crate) const HDR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba16Float;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// WebGPU state for the scene pass and the two post passes.
pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    scene_pass: ScenePass,
    mesh: Option<GpuMesh>,

    targets: RenderTargets,
    linear_sampler: wgpu::Sampler,
    post: PostResources,
    // noise pass samples the scene target, output pass samples the noise target
    bg_scene: wgpu::BindGroup,
    bg_noise: wgpu::BindGroup,

    clear_color: wgpu::Color,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(
        canvas: &'a web::HtmlCanvasElement,
        tone_mapping: ToneMapping,
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        // Prefer a plain Unorm surface and encode sRGB in the output pass
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Rgba8Unorm
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: MAX_FRAME_LATENCY,
        };
        surface.configure(&device, &config);
        log::info!(
            "[gpu] surface {}x{} format={:?} alpha={:?}",
            width,
            height,
            format,
            alpha_mode
        );

        let scene_pass = mesh::create_scene_pass(&device, HDR_FORMAT, DEPTH_FORMAT);
        let noise_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("noise_shader"),
            source: wgpu::ShaderSource::Wgsl(scene_core::NOISE_WGSL.into()),
        });
        let output_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("output_shader"),
            source: wgpu::ShaderSource::Wgsl(scene_core::OUTPUT_WGSL.into()),
        });
        let post = post::create_post_resources(
            &device,
            &noise_shader,
            &output_shader,
            HDR_FORMAT,
            format,
        );
        queue.write_buffer(
            &post.output_uniform_buffer,
            0,
            bytemuck::bytes_of(&OutputUniforms::new(tone_mapping, format)),
        );

        let targets = RenderTargets::new(&device, width, height);
        let linear_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let (bg_scene, bg_noise) =
            Self::post_bind_groups(&device, &post, &targets, &linear_sampler);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            scene_pass,
            mesh: None,
            targets,
            linear_sampler,
            post,
            bg_scene,
            bg_noise,
            clear_color: wgpu::Color {
                r: CLEAR_RGBA[0],
                g: CLEAR_RGBA[1],
                b: CLEAR_RGBA[2],
                a: CLEAR_RGBA[3],
            },
            width,
            height,
        })
    }

    #[inline]
    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }

    pub fn upload_model(&mut self, model: &Model) {
        self.mesh = Some(GpuMesh::upload(&self.device, model));
        log::info!("[gpu] model uploaded ({} indices)", model.indices.len());
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.targets.recreate(&self.device, width, height);
            self.rebuild_post_bind_groups();
        }
    }

    /// Draw one frame: scene, noise, then output to the swapchain.
    pub fn render(
        &mut self,
        scene: &SceneUniforms,
        noise: &NoiseUniforms,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                self.surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.queue
            .write_buffer(&self.scene_pass.uniform_buffer, 0, bytemuck::bytes_of(scene));
        self.queue
            .write_buffer(&self.post.noise_uniform_buffer, 0, bytemuck::bytes_of(noise));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        // Pass 1: model -> scene target
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.scene_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(DEPTH_CLEAR),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(mesh) = &self.mesh {
                rpass.set_pipeline(&self.scene_pass.pipeline);
                rpass.set_bind_group(0, &self.scene_pass.bind_group, &[]);
                rpass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                rpass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                rpass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // Pass 2: noise, scene target -> noise target
        post::blit(
            &mut encoder,
            "noise_pass",
            &self.targets.noise_view,
            self.clear_color,
            &self.post.noise_pipeline,
            &self.bg_scene,
        );

        // Pass 3: tone map + encode -> swapchain
        post::blit(
            &mut encoder,
            "output_pass",
            &view,
            self.clear_color,
            &self.post.output_pipeline,
            &self.bg_noise,
        );

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn post_bind_groups(
        device: &wgpu::Device,
        post: &PostResources,
        targets: &RenderTargets,
        sampler: &wgpu::Sampler,
    ) -> (wgpu::BindGroup, wgpu::BindGroup) {
        let bg_scene = post::source_bind_group(
            device,
            "bg_scene",
            &post.bgl,
            &targets.scene_view,
            sampler,
            &post.noise_uniform_buffer,
        );
        let bg_noise = post::source_bind_group(
            device,
            "bg_noise",
            &post.bgl,
            &targets.noise_view,
            sampler,
            &post.output_uniform_buffer,
        );
        (bg_scene, bg_noise)
    }

    fn rebuild_post_bind_groups(&mut self) {
        let (bg_scene, bg_noise) =
            Self::post_bind_groups(&self.device, &self.post, &self.targets, &self.linear_sampler);
        self.bg_scene = bg_scene;
        self.bg_noise = bg_noise;
    }
}
