//! A backend with no device behind it. Every call is appended to a command
//! log so frames can be inspected, diffed and profiled without a GPU.

use std::cell::Cell;
use std::rc::Rc;

use glam::Mat4;

use super::{
    GlyphDraw, GpuLimits, GraphicsApi, IncompleteTarget, IndexedDraw, RenderAttachments,
    ShaderHandle, TextureHandle, Topology, VertexData, validate_target,
};
use crate::color::Color;
use crate::vertex::{ColoredVertex, GlyphVertex, TexturedVertex};

#[derive(Clone, Debug, PartialEq)]
pub enum RecordedVertices {
    Colored(Vec<ColoredVertex>),
    Textured(Vec<TexturedVertex>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedDraw {
    pub shader: ShaderHandle,
    pub topology: Topology,
    /// Color attachment of the target bound when the draw was issued.
    pub target: Option<TextureHandle>,
    pub vertices: RecordedVertices,
    pub indices: Vec<u16>,
    pub textures: Vec<TextureHandle>,
}

impl RecordedDraw {
    pub fn vertex_count(&self) -> usize {
        match &self.vertices {
            RecordedVertices::Colored(v) => v.len(),
            RecordedVertices::Textured(v) => v.len(),
        }
    }

    pub fn positions(&self) -> Vec<[f32; 2]> {
        match &self.vertices {
            RecordedVertices::Colored(v) => v.iter().map(|v| v.position).collect(),
            RecordedVertices::Textured(v) => v.iter().map(|v| v.position).collect(),
        }
    }

    pub fn slots(&self) -> Vec<f32> {
        match &self.vertices {
            RecordedVertices::Colored(_) => Vec::new(),
            RecordedVertices::Textured(v) => v.iter().map(|v| v.slot).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedGlyph {
    pub shader: ShaderHandle,
    pub texture: TextureHandle,
    pub target: Option<TextureHandle>,
    pub vertices: [GlyphVertex; 6],
    pub color: Color,
    pub view_proj: Mat4,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    BindTarget(Option<TextureHandle>),
    SetViewport { width: u32, height: u32 },
    Clear(Color),
    Draw(RecordedDraw),
    Glyph(RecordedGlyph),
    Present(Option<TextureHandle>),
}

/// Attachments issued by [`HeadlessApi`]. Dropping them decrements the live count.
#[derive(Debug)]
pub struct HeadlessAttachments {
    id: u32,
    color: Option<TextureHandle>,
    depth: bool,
    width: u32,
    height: u32,
    live: Rc<Cell<usize>>,
}

impl RenderAttachments for HeadlessAttachments {
    fn color(&self) -> Option<TextureHandle> {
        self.color
    }

    fn has_depth(&self) -> bool {
        self.depth
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for HeadlessAttachments {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

pub struct HeadlessApi {
    limits: GpuLimits,
    commands: Vec<Command>,
    next_handle: u32,
    live: Rc<Cell<usize>>,
    allocations: usize,
    bound: Option<(u32, Option<TextureHandle>)>,
}

impl Default for HeadlessApi {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessApi {
    pub fn new() -> Self {
        Self::with_limits(GpuLimits::default())
    }

    pub fn with_limits(limits: GpuLimits) -> Self {
        Self {
            limits,
            commands: Vec::new(),
            next_handle: 1,
            live: Rc::new(Cell::new(0)),
            allocations: 0,
            bound: None,
        }
    }

    /// Hands out a fresh texture handle, as an upload would on a real device.
    pub fn register_texture(&mut self) -> TextureHandle {
        let handle = TextureHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    pub fn draws(&self) -> impl Iterator<Item = &RecordedDraw> {
        self.commands.iter().filter_map(|c| match c {
            Command::Draw(d) => Some(d),
            _ => None,
        })
    }

    pub fn glyphs(&self) -> impl Iterator<Item = &RecordedGlyph> {
        self.commands.iter().filter_map(|c| match c {
            Command::Glyph(g) => Some(g),
            _ => None,
        })
    }

    /// Attachment sets currently alive.
    pub fn live_attachments(&self) -> usize {
        self.live.get()
    }

    /// Attachment sets ever created.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    fn bound_color(&self) -> Option<TextureHandle> {
        self.bound.and_then(|(_, color)| color)
    }
}

impl GraphicsApi for HeadlessApi {
    type Attachments = HeadlessAttachments;

    fn limits(&self) -> GpuLimits {
        self.limits
    }

    fn create_attachments(
        &mut self,
        width: u32,
        height: u32,
        want_color: bool,
        want_depth: bool,
    ) -> Result<HeadlessAttachments, IncompleteTarget> {
        validate_target(&self.limits, width, height, want_color, want_depth)?;

        let id = self.next_handle;
        self.next_handle += 1;
        let color = want_color.then(|| self.register_texture());

        self.allocations += 1;
        self.live.set(self.live.get() + 1);
        Ok(HeadlessAttachments {
            id,
            color,
            depth: want_depth,
            width,
            height,
            live: Rc::clone(&self.live),
        })
    }

    fn bind_target(&mut self, target: Option<&HeadlessAttachments>) {
        self.bound = target.map(|t| (t.id, t.color));
        self.commands.push(Command::BindTarget(target.and_then(|t| t.color)));
    }

    fn is_bound(&self, target: &HeadlessAttachments) -> bool {
        matches!(self.bound, Some((id, _)) if id == target.id)
    }

    fn set_viewport(&mut self, width: u32, height: u32) {
        self.commands.push(Command::SetViewport { width, height });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(Command::Clear(color));
    }

    fn draw_indexed(&mut self, draw: &IndexedDraw<'_>) {
        let vertices = match draw.vertices {
            VertexData::Colored(v) => RecordedVertices::Colored(v.to_vec()),
            VertexData::Textured(v) => RecordedVertices::Textured(v.to_vec()),
        };
        self.commands.push(Command::Draw(RecordedDraw {
            shader: draw.shader,
            topology: draw.topology,
            target: self.bound_color(),
            vertices,
            indices: draw.indices.to_vec(),
            textures: draw.textures.to_vec(),
        }));
    }

    fn draw_glyph(&mut self, draw: &GlyphDraw<'_>) {
        self.commands.push(Command::Glyph(RecordedGlyph {
            shader: draw.shader,
            texture: draw.texture,
            target: self.bound_color(),
            vertices: *draw.vertices,
            color: draw.color,
            view_proj: draw.view_proj,
        }));
    }

    fn present(&mut self, source: Option<TextureHandle>) {
        self.commands.push(Command::Present(source));
    }
}
