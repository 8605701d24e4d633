//! The immediate-mode GPU contract the renderer core is written against.
//!
//! Callers bind a destination, issue draws, and unbind. Backends may record
//! (see [`headless`]) or submit to a real device (see [`crate::renderer`]).

pub mod headless;

use glam::Mat4;

use crate::color::Color;
use crate::vertex::{ColoredVertex, GlyphVertex, TexturedVertex};

/// Opaque handle to a sampled texture owned by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Opaque handle to a shader program owned by the backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShaderHandle(pub u32);

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    Triangles,
    Lines,
    Points,
}

/// Device capabilities the core cares about.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GpuLimits {
    /// Textures a single draw may sample from.
    pub max_texture_slots: usize,
    /// Largest width or height of a 2D texture.
    pub max_texture_dimension: u32,
}

impl Default for GpuLimits {
    fn default() -> Self {
        Self { max_texture_slots: 16, max_texture_dimension: 8192 }
    }
}

/// Why a render target could not be made complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncompleteTarget {
    #[error("incomplete attachment: extent {width}x{height} has a zero dimension")]
    ZeroExtent { width: u32, height: u32 },
    #[error("missing attachment: neither color nor depth was requested")]
    MissingAttachment,
    #[error("unsupported: extent {width}x{height} exceeds the device maximum of {max}")]
    Unsupported { width: u32, height: u32, max: u32 },
    #[error("unknown: {0}")]
    Backend(String),
}

/// Checks a requested target against `limits` without allocating anything.
pub fn validate_target(
    limits: &GpuLimits,
    width: u32,
    height: u32,
    want_color: bool,
    want_depth: bool,
) -> Result<(), IncompleteTarget> {
    if width == 0 || height == 0 {
        return Err(IncompleteTarget::ZeroExtent { width, height });
    }
    if !want_color && !want_depth {
        return Err(IncompleteTarget::MissingAttachment);
    }
    let max = limits.max_texture_dimension;
    if width > max || height > max {
        return Err(IncompleteTarget::Unsupported { width, height, max });
    }
    Ok(())
}

/// GPU-side storage behind a render target. Dropping it releases the storage.
pub trait RenderAttachments {
    /// Handle under which the color attachment can be sampled.
    fn color(&self) -> Option<TextureHandle>;
    fn has_depth(&self) -> bool;
    fn size(&self) -> (u32, u32);
}

#[derive(Copy, Clone, Debug)]
pub enum VertexData<'a> {
    Colored(&'a [ColoredVertex]),
    Textured(&'a [TexturedVertex]),
}

impl VertexData<'_> {
    pub fn len(&self) -> usize {
        match self {
            VertexData::Colored(v) => v.len(),
            VertexData::Textured(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One indexed draw over a whole batch. `indices` may contain
/// [`crate::batch::RESTART_INDEX`] between primitives.
#[derive(Copy, Clone, Debug)]
pub struct IndexedDraw<'a> {
    pub shader: ShaderHandle,
    pub topology: Topology,
    pub vertices: VertexData<'a>,
    pub indices: &'a [u16],
    /// Bound to slots `0..textures.len()`, in order.
    pub textures: &'a [TextureHandle],
}

/// One glyph quad: two triangles in world units, projected by `view_proj`.
#[derive(Copy, Clone, Debug)]
pub struct GlyphDraw<'a> {
    pub shader: ShaderHandle,
    pub texture: TextureHandle,
    pub vertices: &'a [GlyphVertex; 6],
    pub color: Color,
    pub view_proj: Mat4,
}

pub trait GraphicsApi {
    type Attachments: RenderAttachments;

    fn limits(&self) -> GpuLimits;

    fn create_attachments(
        &mut self,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> Result<Self::Attachments, IncompleteTarget>;

    /// Selects the destination for subsequent clears and draws.
    /// `None` is the default framebuffer.
    fn bind_target(&mut self, target: Option<&Self::Attachments>);

    /// True when `target` is the current destination.
    fn is_bound(&self, target: &Self::Attachments) -> bool;

    fn set_viewport(&mut self, width: u32, height: u32);

    fn clear(&mut self, color: Color);

    fn draw_indexed(&mut self, draw: &IndexedDraw<'_>);

    fn draw_glyph(&mut self, draw: &GlyphDraw<'_>);

    /// Shows `source` (or the default framebuffer) on screen and swaps buffers.
    fn present(&mut self, source: Option<TextureHandle>);
}
