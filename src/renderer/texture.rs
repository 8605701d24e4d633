use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wgpu::util::DeviceExt;

use crate::gpu::{RenderAttachments, TextureHandle};

/// Color format of every off-screen target and uploaded texture.
pub const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Sampled views by handle, plus the shared sampler and a 1×1 white
/// texture used to fill unused binding slots.
pub struct TextureTable {
    views: HashMap<TextureHandle, wgpu::TextureView>,
    next: u32,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) white: wgpu::TextureView,
}

impl TextureTable {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let white = create_texture_with_pixels(device, queue, "white", 1, 1, &[255, 255, 255, 255]);
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("batch_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        Self {
            views: HashMap::new(),
            next: 1,
            sampler,
            white: white.create_view(&wgpu::TextureViewDescriptor::default()),
        }
    }

    pub fn register(&mut self, view: wgpu::TextureView) -> TextureHandle {
        let handle = TextureHandle(self.next);
        self.next += 1;
        self.views.insert(handle, view);
        handle
    }

    pub fn remove(&mut self, handle: TextureHandle) {
        self.views.remove(&handle);
    }

    pub fn view(&self, handle: TextureHandle) -> Option<&wgpu::TextureView> {
        self.views.get(&handle)
    }

    /// The view for `handle`, or the white texture if it is unknown.
    pub fn view_or_white(&self, handle: TextureHandle) -> &wgpu::TextureView {
        self.views.get(&handle).unwrap_or(&self.white)
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }
}

pub(crate) fn create_texture_with_pixels(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        rgba,
    )
}

pub(crate) fn create_color_target(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TARGET_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    })
}

pub(crate) fn create_depth_target(device: &wgpu::Device, label: &str, width: u32, height: u32) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}

// ── Attachments ──────────────────────────────────────────────────────────────

/// Color and depth storage of a render target. The color view is registered
/// in the texture table while the attachments live.
pub struct WgpuAttachments {
    pub(crate) id: u32,
    pub(crate) color: Option<(TextureHandle, wgpu::TextureView)>,
    pub(crate) depth: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
    table: Rc<RefCell<TextureTable>>,
}

impl WgpuAttachments {
    pub(crate) fn new(
        id: u32,
        color: Option<(TextureHandle, wgpu::TextureView)>,
        depth: Option<wgpu::TextureView>,
        width: u32,
        height: u32,
        table: Rc<RefCell<TextureTable>>,
    ) -> Self {
        Self { id, color, depth, width, height, table }
    }
}

impl RenderAttachments for WgpuAttachments {
    fn color(&self) -> Option<TextureHandle> {
        self.color.as_ref().map(|(handle, _)| *handle)
    }

    fn has_depth(&self) -> bool {
        self.depth.is_some()
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for WgpuAttachments {
    fn drop(&mut self) {
        if let Some((handle, _)) = &self.color {
            self.table.borrow_mut().remove(*handle);
        }
    }
}
