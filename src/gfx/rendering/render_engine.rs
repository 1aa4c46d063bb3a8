//! WGPU-based rendering engine for the sheet viewer
//!
//! Owns the surface, device and queue, the depth and multisample targets, the
//! Phong pipeline with its uniforms, and the sheet's GPU buffers.

use std::sync::Arc;
use wgpu::TextureFormat;

use crate::{
    config::RendererConfig,
    error::{FrameError, ViewerError},
    gfx::{
        color::Color,
        resources::{
            global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
            texture_resource::TextureResource,
        },
        scene::Scene,
        viewport::Viewport,
    },
    wgpu_utils::{
        binding_builder::{BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
    },
};

use super::{
    object_resources::ObjectGpuResources,
    pipeline_manager::{PipelineConfig, PipelineManager},
    FrameRenderer,
};

const PHONG_PIPELINE: &str = "Phong";
const PHONG_SHADER: &str = "phong.wgsl";
const MSAA_SAMPLES: u32 = 4;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    sample_count: u32,
    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    transform_layout: BindGroupLayoutWithDesc,
    material_layout: BindGroupLayoutWithDesc,
    sheet: Option<ObjectGpuResources>,
    clear_color: wgpu::Color,
    viewport: Viewport,
    released: bool,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Picks an sRGB surface format, enables 4x multisampling when the adapter
    /// supports it for that format, and builds the Phong pipeline.
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `viewport` - Initial logical size and pixel ratio
    /// * `settings` - Anti-aliasing, vsync and clear color
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be acquired, or when the
    /// Phong pipeline cannot be built
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
        settings: &RendererConfig,
    ) -> Result<RenderEngine, ViewerError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults()
                    .using_resolution(adapter.limits()),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or(ViewerError::SurfaceUnsupported)?;

        let present_mode = if settings.vsync {
            wgpu::PresentMode::Fifo
        } else {
            wgpu::PresentMode::AutoNoVsync
        };

        let (width, height) = viewport.physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let supports_msaa = |format: TextureFormat| {
            adapter
                .get_texture_format_features(format)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        };
        let sample_count = if settings.antialias
            && supports_msaa(format)
            && supports_msaa(TextureResource::DEPTH_FORMAT)
        {
            MSAA_SAMPLES
        } else {
            1
        };
        log::info!(
            "surface {}x{} {:?}, {:?}, {}x MSAA",
            width,
            height,
            format,
            present_mode,
            sample_count
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, sample_count, "depth_texture");
        let msaa_target = (sample_count > 1)
            .then(|| TextureResource::create_msaa_target(&device, &config, sample_count));

        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let transform_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Transform Bind Group Layout");
        let material_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::uniform())
            .create(&device, "Material Bind Group Layout");

        let device = Arc::new(device);
        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader(PHONG_SHADER, include_str!("phong.wgsl"));
        pipeline_manager.register_pipeline(
            PHONG_PIPELINE,
            PipelineConfig::default()
                .with_label("Phong Pipeline")
                .with_shader(PHONG_SHADER)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    transform_layout.layout.clone(),
                    material_layout.layout.clone(),
                ])
                .with_color_format(format)
                .with_depth_format(TextureResource::DEPTH_FORMAT)
                .with_sample_count(sample_count),
        );
        pipeline_manager
            .create_all_pipelines()
            .map_err(ViewerError::Pipeline)?;

        Ok(RenderEngine {
            surface,
            device,
            queue: Arc::new(queue),
            config,
            sample_count,
            depth_texture,
            msaa_target,
            pipeline_manager,
            global_ubo,
            global_bindings,
            transform_layout,
            material_layout,
            sheet: None,
            clear_color: Color::from_hex(settings.clear_color).to_wgpu(),
            viewport,
            released: false,
        })
    }

    fn recreate_targets(&mut self) {
        self.depth_texture.destroy();
        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            &self.config,
            self.sample_count,
            "depth_texture",
        );
        if let Some(target) = self.msaa_target.take() {
            target.destroy();
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                &self.config,
                self.sample_count,
            ));
        }
    }
}

impl FrameRenderer for RenderEngine {
    fn prepare(&mut self, scene: &Scene) {
        if let Some(previous) = self.sheet.take() {
            previous.destroy();
        }
        self.sheet = Some(ObjectGpuResources::new(
            &self.device,
            &scene.sheet,
            &self.transform_layout,
            &self.material_layout,
        ));
    }

    /// Reconfigures the surface to the viewport's physical size and
    /// recreates the depth and multisample targets. Zero-sized viewports
    /// are ignored.
    fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() || self.released {
            return;
        }

        let (width, height) = viewport.physical_size();
        self.viewport = viewport;
        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);
        self.recreate_targets();
    }

    fn reconfigure(&mut self) {
        if !self.released {
            self.surface.configure(&self.device, &self.config);
        }
    }

    fn surface_size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn pixel_ratio(&self) -> f64 {
        self.viewport.pixel_ratio
    }

    fn render(&mut self, scene: &Scene) -> Result<(), FrameError> {
        if self.released {
            return Ok(());
        }
        let (Some(sheet), Some(global_bind_group), Some(pipeline)) = (
            self.sheet.as_mut(),
            self.global_bindings.bind_group(),
            self.pipeline_manager.get_pipeline(PHONG_PIPELINE),
        ) else {
            return Ok(());
        };

        update_global_ubo(
            &mut self.global_ubo,
            &self.queue,
            scene.camera().uniform,
            &scene.lights,
        );
        sheet.update(&self.queue, &scene.sheet);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // With MSAA the multisampled target is drawn and resolved into the
        // surface texture; its own contents need not survive the pass.
        let (color_view, resolve_target, color_store) = match &self.msaa_target {
            Some(target) => (
                &target.view,
                Some(&surface_texture_view),
                wgpu::StoreOp::Discard,
            ),
            None => (&surface_texture_view, None, wgpu::StoreOp::Store),
        };

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color_view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: color_store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if scene.sheet.visible {
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, global_bind_group, &[]);
                render_pass.set_bind_group(1, &sheet.transform_bind_group, &[]);
                render_pass.set_bind_group(2, &sheet.material_bind_group, &[]);
                render_pass.set_vertex_buffer(0, sheet.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(sheet.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..sheet.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        if let Some(sheet) = self.sheet.take() {
            sheet.destroy();
        }
        if let Some(target) = self.msaa_target.take() {
            target.destroy();
        }
        self.depth_texture.destroy();
        self.global_ubo.destroy();
        self.released = true;
        log::debug!("renderer resources released");
    }

    fn is_released(&self) -> bool {
        self.released
    }
}
