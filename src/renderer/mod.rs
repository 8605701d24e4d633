//! wgpu implementation of [`GraphicsApi`].
//!
//! wgpu records into command buffers; the immediate-mode contract is kept by
//! submitting each clear and draw as soon as it is issued. Every destination,
//! the default framebuffer included, is an off-screen texture in
//! [`TARGET_FORMAT`]; [`GraphicsApi::present`] blits one onto the swapchain.

pub mod blit;
pub mod pipeline;
pub mod texture;

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use blit::PresentBlit;
use pipeline::{MAX_TEXTURE_SLOTS, Pipelines, TextUniform};
pub use texture::{TARGET_FORMAT, WgpuAttachments};
use texture::{TextureTable, create_color_target, create_depth_target, create_texture_with_pixels};

use crate::batch::RESTART_INDEX;
use crate::color::Color;
use crate::gpu::{
    GlyphDraw, GpuLimits, GraphicsApi, IncompleteTarget, IndexedDraw, RenderAttachments,
    ShaderHandle, TextureHandle, VertexData, validate_target,
};

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("surface error: {0}")]
    Surface(String),
    #[error("no suitable GPU adapter found: {0}")]
    AdapterNotFound(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("texture decode error: {0}")]
    Image(#[from] image::ImageError),
}

impl From<wgpu::CreateSurfaceError> for RendererError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        RendererError::Surface(e.to_string())
    }
}

impl From<wgpu::RequestDeviceError> for RendererError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        RendererError::Device(e.to_string())
    }
}

/// Programs built into the backend, addressed through [`ShaderHandle`]s.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderProgram {
    Colored,
    Textured,
    Text,
}

impl ShaderProgram {
    pub const ALL: [Self; 3] = [Self::Colored, Self::Textured, Self::Text];

    pub fn handle(self) -> ShaderHandle {
        ShaderHandle(self as u32 + 1)
    }

    pub fn from_handle(handle: ShaderHandle) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.handle() == handle)
    }
}

/// Drops primitive-restart markers. WebGPU only honours them for strip
/// topologies, and every batch here is drawn as a list.
pub fn strip_restart_indices(indices: &[u16]) -> Cow<'_, [u16]> {
    if indices.contains(&RESTART_INDEX) {
        Cow::Owned(indices.iter().copied().filter(|&i| i != RESTART_INDEX).collect())
    } else {
        Cow::Borrowed(indices)
    }
}

struct BoundTarget {
    /// `None` for the default framebuffer.
    id: Option<u32>,
    color: Option<wgpu::TextureView>,
    depth: Option<wgpu::TextureView>,
    size: (u32, u32),
}

pub struct WgpuApi {
    pub window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipelines: Pipelines,
    blit: PresentBlit,
    textures: Rc<RefCell<TextureTable>>,
    /// Stands in for the default framebuffer.
    backbuffer: wgpu::TextureView,
    bound: BoundTarget,
    viewport: (u32, u32),
    limits: GpuLimits,
    next_target_id: u32,
}

impl WgpuApi {
    pub async fn new(window: Arc<Window>) -> Result<Self, RendererError> {
        let size = window.inner_size();
        let width = size.width.max(1);
        let height = size.height.max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(|e| RendererError::AdapterNotFound(e.to_string()))?;

        let info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let (device, queue) = adapter.request_device(&wgpu::DeviceDescriptor::default()).await?;

        let device_limits = device.limits();
        let limits = GpuLimits {
            max_texture_slots: (device_limits.max_sampled_textures_per_shader_stage as usize)
                .min(MAX_TEXTURE_SLOTS),
            max_texture_dimension: device_limits.max_texture_dimension_2d,
        };
        log::info!(
            "GPU limits: {} texture slots per draw, {}px max texture dimension",
            limits.max_texture_slots,
            limits.max_texture_dimension
        );

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| RendererError::Surface("surface reports no formats".to_string()))?;
        let alpha_mode = caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let textures = Rc::new(RefCell::new(TextureTable::new(&device, &queue)));
        let pipelines = Pipelines::new(&device);
        let blit = PresentBlit::new(&device, format);
        let backbuffer = create_color_target(&device, "backbuffer", width, height)
            .create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            pipelines,
            blit,
            textures,
            bound: BoundTarget {
                id: None,
                color: Some(backbuffer.clone()),
                depth: None,
                size: (width, height),
            },
            backbuffer,
            viewport: (width, height),
            limits,
            next_target_id: 1,
        })
    }

    pub fn shader(&self, program: ShaderProgram) -> ShaderHandle {
        program.handle()
    }

    /// Reconfigures the swapchain and the default framebuffer. Zero sizes
    /// (minimized windows) are ignored.
    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);

        self.backbuffer = create_color_target(&self.device, "backbuffer", width, height)
            .create_view(&wgpu::TextureViewDescriptor::default());
        if self.bound.id.is_none() {
            self.bind_default();
        }
    }

    /// Uploads an RGBA image and returns a handle usable in batches and glyphs.
    pub fn upload_rgba(&mut self, image: &image::RgbaImage, label: &str) -> TextureHandle {
        let (width, height) = image.dimensions();
        let texture = create_texture_with_pixels(&self.device, &self.queue, label, width, height, image);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.textures.borrow_mut().register(view)
    }

    pub fn load_png(&mut self, bytes: &[u8], label: &str) -> Result<TextureHandle, RendererError> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        Ok(self.upload_rgba(&image, label))
    }

    fn bind_default(&mut self) {
        self.bound = BoundTarget {
            id: None,
            color: Some(self.backbuffer.clone()),
            depth: None,
            size: (self.config.width, self.config.height),
        };
    }

    fn clamped_viewport(&self) -> (f32, f32) {
        let w = self.viewport.0.min(self.bound.size.0).max(1);
        let h = self.viewport.1.min(self.bound.size.1).max(1);
        (w as f32, h as f32)
    }

    /// One bind group covering every slot; unused slots see the white texture.
    fn slot_bind_group(&self, textures: &[TextureHandle]) -> wgpu::BindGroup {
        let table = self.textures.borrow();
        let mut entries: Vec<wgpu::BindGroupEntry> = (0..MAX_TEXTURE_SLOTS)
            .map(|slot| {
                let view = textures.get(slot).map_or(&table.white, |&h| table.view_or_white(h));
                wgpu::BindGroupEntry {
                    binding: slot as u32,
                    resource: wgpu::BindingResource::TextureView(view),
                }
            })
            .collect();
        entries.push(wgpu::BindGroupEntry {
            binding: MAX_TEXTURE_SLOTS as u32,
            resource: wgpu::BindingResource::Sampler(&table.sampler),
        });

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("textured_slots_bg"),
            layout: &self.pipelines.textured.textures_bgl,
            entries: &entries,
        })
    }

    fn submit_draw(
        &self,
        label: &str,
        color: &wgpu::TextureView,
        record: impl FnOnce(&mut wgpu::RenderPass<'_>),
    ) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(label),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: color,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                // 2D batches never depth-test; the depth attachment is only cleared.
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            let (w, h) = self.clamped_viewport();
            pass.set_viewport(0.0, 0.0, w, h, 0.0, 1.0);
            record(&mut pass);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
    }
}

impl GraphicsApi for WgpuApi {
    type Attachments = WgpuAttachments;

    fn limits(&self) -> GpuLimits {
        self.limits
    }

    fn create_attachments(
        &mut self,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> Result<WgpuAttachments, IncompleteTarget> {
        validate_target(&self.limits, width, height, want_color, want_depth)?;

        let color = want_color.then(|| {
            let view = create_color_target(&self.device, "render_target_color", width, height)
                .create_view(&wgpu::TextureViewDescriptor::default());
            let handle = self.textures.borrow_mut().register(view.clone());
            (handle, view)
        });
        let depth = want_depth.then(|| {
            create_depth_target(&self.device, "render_target_depth", width, height)
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        let id = self.next_target_id;
        self.next_target_id += 1;
        Ok(WgpuAttachments::new(id, color, depth, width, height, Rc::clone(&self.textures)))
    }

    fn bind_target(&mut self, target: Option<&WgpuAttachments>) {
        match target {
            Some(t) => {
                self.bound = BoundTarget {
                    id: Some(t.id),
                    color: t.color.as_ref().map(|(_, view)| view.clone()),
                    depth: t.depth.clone(),
                    size: t.size(),
                };
            }
            None => self.bind_default(),
        }
        self.viewport = self.bound.size;
    }

    fn is_bound(&self, target: &WgpuAttachments) -> bool {
        self.bound.id == Some(target.id)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    fn clear(&mut self, color: Color) {
        if self.bound.color.is_none() && self.bound.depth.is_none() {
            return;
        }
        let color_attachment = self.bound.color.as_ref().map(|view| wgpu::RenderPassColorAttachment {
            view,
            resolve_target: None,
            depth_slice: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.into()),
                store: wgpu::StoreOp::Store,
            },
        });
        let depth_attachment = self.bound.depth.as_ref().map(|view| wgpu::RenderPassDepthStencilAttachment {
            view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("clear") });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear"),
            color_attachments: &[color_attachment],
            depth_stencil_attachment: depth_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });
        self.queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw<'_>) {
        let Some(color) = self.bound.color.clone() else {
            log::debug!("draw skipped: bound target has no color attachment");
            return;
        };
        let indices = strip_restart_indices(draw.indices);
        if indices.is_empty() || draw.vertices.is_empty() {
            return;
        }

        let program = ShaderProgram::from_handle(draw.shader);
        let (pipeline, vertex_bytes, bind_group) = match (program, draw.vertices) {
            (Some(ShaderProgram::Colored), VertexData::Colored(v)) => (
                self.pipelines.colored.for_topology(draw.topology),
                bytemuck::cast_slice::<_, u8>(v),
                None,
            ),
            (Some(ShaderProgram::Textured), VertexData::Textured(v)) => (
                &self.pipelines.textured.render_pipeline,
                bytemuck::cast_slice::<_, u8>(v),
                Some(self.slot_bind_group(draw.textures)),
            ),
            _ => {
                log::warn!("shader {:?} cannot draw this vertex layout", draw.shader);
                return;
            }
        };

        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("batch_vertices"),
            contents: vertex_bytes,
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("batch_indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let index_count = indices.len() as u32;

        self.submit_draw("batch_draw", &color, |pass| {
            pass.set_pipeline(pipeline);
            if let Some(bg) = &bind_group {
                pass.set_bind_group(0, bg, &[]);
            }
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            pass.draw_indexed(0..index_count, 0, 0..1);
        });
    }

    fn draw_glyph(&mut self, draw: &GlyphDraw<'_>) {
        let Some(color) = self.bound.color.clone() else {
            log::debug!("glyph skipped: bound target has no color attachment");
            return;
        };
        if ShaderProgram::from_handle(draw.shader) != Some(ShaderProgram::Text) {
            log::warn!("shader {:?} cannot draw glyphs", draw.shader);
            return;
        }

        let uniform = TextUniform {
            view_proj: draw.view_proj.to_cols_array_2d(),
            color: draw.color.0,
        };
        let uniform_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("text_uniform"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let uniform_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("text_uniform_bg"),
            layout: &self.pipelines.text.uniform_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let glyph_bg = {
            let table = self.textures.borrow();
            self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("text_glyph_bg"),
                layout: &self.pipelines.text.glyph_bgl,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(table.view_or_white(draw.texture)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&table.sampler),
                    },
                ],
            })
        };
        let vertex_buffer = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glyph_vertices"),
            contents: bytemuck::cast_slice(draw.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        self.submit_draw("glyph_draw", &color, |pass| {
            pass.set_pipeline(&self.pipelines.text.render_pipeline);
            pass.set_bind_group(0, &uniform_bg, &[]);
            pass.set_bind_group(1, &glyph_bg, &[]);
            pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            pass.draw(0..6, 0..1);
        });
    }

    fn present(&mut self, source: Option<TextureHandle>) {
        let source_view = source
            .and_then(|h| self.textures.borrow().view(h).cloned())
            .unwrap_or_else(|| self.backbuffer.clone());

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("swapchain lost; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(e) => {
                log::warn!("failed to acquire swapchain image: {e}");
                return;
            }
        };
        let output = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("present") });
        self.blit.encode(&self.device, &mut encoder, &source_view, &output);
        self.queue.submit(std::iter::once(encoder.finish()));

        self.window.pre_present_notify();
        frame.present();
    }
}
