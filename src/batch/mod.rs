//! Accumulates shapes into as few indexed draws as the batch-break rules allow.
//!
//! A batch holds one [`ShapeKind`] at a time. It is flushed when the kind
//! changes, when the next shape would not fit, or when a textured quad needs
//! a texture and every slot is already taken.

mod shape;

pub use shape::{RenderData, RenderItem, TexturedRenderData, UvRect};

use glam::{Mat4, Vec2};

use crate::config::BatchConfig;
use crate::geometry::{MAX_TEMPLATE_INDICES, MeshGeometry, ShapeKind, quad_uvs, transform_matrix};
use crate::gpu::{GraphicsApi, IndexedDraw, ShaderHandle, TextureHandle, Topology, VertexData};
use crate::vertex::{ColoredVertex, TexturedVertex};

/// Primitive-restart marker appended after every shape's indices.
pub const RESTART_INDEX: u16 = 0xFFFF;

/// Shader programs the batcher draws with. `None` means unavailable this frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchShaders {
    pub colored: Option<ShaderHandle>,
    pub textured: Option<ShaderHandle>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Indexed draws issued by flushes.
    pub draw_calls: u32,
    /// Shapes appended.
    pub primitives: u32,
}

/// Topology a flushed batch of `kind` is drawn with.
pub fn topology_for(kind: ShapeKind) -> Topology {
    match kind {
        ShapeKind::Quad | ShapeKind::TexturedQuad => Topology::Triangles,
        ShapeKind::Line | ShapeKind::RectangleOutline | ShapeKind::CircleOutline => Topology::Lines,
        ShapeKind::Point => Topology::Points,
    }
}

pub struct BatchRenderer {
    max_vertices: usize,
    max_textures: usize,
    last_kind: Option<ShapeKind>,
    colored_vertices: Vec<ColoredVertex>,
    colored_indices: Vec<u16>,
    textured_vertices: Vec<TexturedVertex>,
    textured_indices: Vec<u16>,
    textures: Vec<TextureHandle>,
    shaders: BatchShaders,
    stats: BatchStats,
    warned_missing_shader: bool,
}

impl BatchRenderer {
    /// `max_vertices` bounds both vertex and index counts per draw. It is
    /// clamped so the largest template always fits and no vertex index can
    /// collide with [`RESTART_INDEX`].
    pub fn new(max_vertices: usize, max_textures: usize) -> Self {
        let max_vertices = max_vertices.clamp(MAX_TEMPLATE_INDICES, RESTART_INDEX as usize);
        let max_textures = max_textures.max(1);
        Self {
            max_vertices,
            max_textures,
            last_kind: None,
            colored_vertices: Vec::with_capacity(max_vertices),
            colored_indices: Vec::with_capacity(max_vertices),
            textured_vertices: Vec::new(),
            textured_indices: Vec::new(),
            textures: Vec::with_capacity(max_textures),
            shaders: BatchShaders::default(),
            stats: BatchStats::default(),
            warned_missing_shader: false,
        }
    }

    pub fn from_config(config: &BatchConfig) -> Self {
        Self::new(config.max_vertices, config.max_textures)
    }

    pub fn set_shaders(&mut self, shaders: BatchShaders) {
        if shaders != self.shaders {
            self.warned_missing_shader = false;
        }
        self.shaders = shaders;
    }

    pub fn shaders(&self) -> BatchShaders {
        self.shaders
    }

    pub fn max_vertices(&self) -> usize {
        self.max_vertices
    }

    pub fn max_textures(&self) -> usize {
        self.max_textures
    }

    pub fn last_kind(&self) -> Option<ShapeKind> {
        self.last_kind
    }

    pub fn pending_vertices(&self) -> usize {
        self.colored_vertices.len() + self.textured_vertices.len()
    }

    pub fn pending_indices(&self) -> usize {
        self.colored_indices.len() + self.textured_indices.len()
    }

    pub fn bound_textures(&self) -> &[TextureHandle] {
        &self.textures
    }

    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    pub fn take_stats(&mut self) -> BatchStats {
        std::mem::take(&mut self.stats)
    }

    // ── Submission ──────────────────────────────────────────────────────────

    /// Draws a resolved scene item.
    pub fn draw<A: GraphicsApi>(&mut self, api: &mut A, item: &RenderItem, to_target: &Mat4) {
        match item {
            RenderItem::Untextured(data) => self.draw_shape(api, data, to_target),
            RenderItem::Textured(data) => self.draw_textured_quad(api, data, to_target),
        }
    }

    /// Draws `data` as the kind it names. A `TexturedQuad` without a texture
    /// is drawn as a plain quad.
    pub fn draw_shape<A: GraphicsApi>(&mut self, api: &mut A, data: &RenderData, to_target: &Mat4) {
        match data.kind {
            ShapeKind::Quad | ShapeKind::TexturedQuad => self.draw_quad(api, data, to_target),
            ShapeKind::Point => self.draw_point(api, data, to_target),
            ShapeKind::Line => self.draw_line(api, data, to_target),
            ShapeKind::RectangleOutline => self.draw_rectangle_outline(api, data, to_target),
            ShapeKind::CircleOutline => self.draw_circle_outline(api, data, to_target),
        }
    }

    pub fn draw_quad<A: GraphicsApi>(&mut self, api: &mut A, data: &RenderData, to_target: &Mat4) {
        self.add_colored(api, ShapeKind::Quad, data, to_target);
    }

    pub fn draw_point<A: GraphicsApi>(&mut self, api: &mut A, data: &RenderData, to_target: &Mat4) {
        self.add_colored(api, ShapeKind::Point, data, to_target);
    }

    pub fn draw_line<A: GraphicsApi>(&mut self, api: &mut A, data: &RenderData, to_target: &Mat4) {
        self.add_colored(api, ShapeKind::Line, data, to_target);
    }

    pub fn draw_rectangle_outline<A: GraphicsApi>(
        &mut self,
        api: &mut A,
        data: &RenderData,
        to_target: &Mat4,
    ) {
        self.add_colored(api, ShapeKind::RectangleOutline, data, to_target);
    }

    pub fn draw_circle_outline<A: GraphicsApi>(
        &mut self,
        api: &mut A,
        data: &RenderData,
        to_target: &Mat4,
    ) {
        self.add_colored(api, ShapeKind::CircleOutline, data, to_target);
    }

    pub fn draw_textured_quad<A: GraphicsApi>(
        &mut self,
        api: &mut A,
        data: &TexturedRenderData,
        to_target: &Mat4,
    ) {
        let kind = ShapeKind::TexturedQuad;
        self.break_on_kind_change(api, kind);

        let template = MeshGeometry::shared().template(kind);
        // Capacity first: a flush here would clear the texture list, so the
        // slot must be looked up afterwards.
        if self.exceeds_capacity(template.positions.len(), template.indices.len()) {
            self.flush(api);
        }
        let slot = self.texture_slot(api, data.texture) as f32;

        let shape = &data.shape;
        let matrix = *to_target * transform_matrix(shape.width, shape.height, shape.orientation, shape.position);
        let uvs = quad_uvs(data.uv.min, data.uv.max);
        let base = self.textured_vertices.len() as u16;

        self.textured_vertices.extend(template.transformed(&matrix).zip(uvs).map(|(p, uv)| {
            TexturedVertex {
                position: p.to_array(),
                color: shape.color.0,
                uv: uv.to_array(),
                slot,
            }
        }));
        self.textured_indices.extend(template.indices.iter().map(|i| base + i));
        self.textured_indices.push(RESTART_INDEX);

        self.last_kind = Some(kind);
        self.stats.primitives += 1;
    }

    fn add_colored<A: GraphicsApi>(
        &mut self,
        api: &mut A,
        kind: ShapeKind,
        data: &RenderData,
        to_target: &Mat4,
    ) {
        self.break_on_kind_change(api, kind);

        let template = MeshGeometry::shared().template(kind);
        if self.exceeds_capacity(template.positions.len(), template.indices.len()) {
            self.flush(api);
        }

        let model = match kind {
            ShapeKind::Point => Mat4::from_translation(data.position.extend(0.0)),
            _ => transform_matrix(data.width, data.height, data.orientation, data.position),
        };
        let matrix = *to_target * model;
        let base = self.colored_vertices.len() as u16;

        self.colored_vertices.extend(template.transformed(&matrix).map(|p: Vec2| ColoredVertex {
            position: p.to_array(),
            color: data.color.0,
        }));
        self.colored_indices.extend(template.indices.iter().map(|i| base + i));
        self.colored_indices.push(RESTART_INDEX);

        self.last_kind = Some(kind);
        self.stats.primitives += 1;
    }

    fn break_on_kind_change<A: GraphicsApi>(&mut self, api: &mut A, kind: ShapeKind) {
        if self.last_kind.is_some_and(|last| last != kind) {
            self.flush(api);
        }
    }

    fn exceeds_capacity(&self, new_vertices: usize, new_indices: usize) -> bool {
        self.pending_vertices() + new_vertices > self.max_vertices
            || self.pending_indices() + new_indices + 1 > self.max_vertices
    }

    /// Slot `handle` occupies in the current batch, claiming one if needed.
    /// When every slot is taken the batch is flushed and `handle` becomes slot 0.
    fn texture_slot<A: GraphicsApi>(&mut self, api: &mut A, handle: TextureHandle) -> usize {
        if let Some(slot) = self.textures.iter().position(|&t| t == handle) {
            return slot;
        }
        if self.textures.len() < self.max_textures {
            self.textures.push(handle);
            return self.textures.len() - 1;
        }
        self.flush(api);
        self.textures.push(handle);
        0
    }

    // ── Flush ───────────────────────────────────────────────────────────────

    /// Issues one draw for everything pending, then empties the batch.
    /// Does nothing when the batch is empty.
    pub fn flush<A: GraphicsApi>(&mut self, api: &mut A) {
        let Some(kind) = self.last_kind else {
            self.clear();
            return;
        };

        match kind {
            ShapeKind::TexturedQuad => self.render_textured(api),
            _ => self.render_colored(api, topology_for(kind)),
        }
        self.clear();
    }

    fn render_colored<A: GraphicsApi>(&mut self, api: &mut A, topology: Topology) {
        if self.colored_indices.is_empty() {
            return;
        }
        let Some(shader) = self.shaders.colored else {
            self.warn_missing_shader("colored");
            return;
        };
        api.draw_indexed(&IndexedDraw {
            shader,
            topology,
            vertices: VertexData::Colored(&self.colored_vertices),
            indices: &self.colored_indices,
            textures: &[],
        });
        self.stats.draw_calls += 1;
    }

    fn render_textured<A: GraphicsApi>(&mut self, api: &mut A) {
        if self.textured_indices.is_empty() {
            return;
        }
        let Some(shader) = self.shaders.textured else {
            self.warn_missing_shader("textured");
            return;
        };
        api.draw_indexed(&IndexedDraw {
            shader,
            topology: Topology::Triangles,
            vertices: VertexData::Textured(&self.textured_vertices),
            indices: &self.textured_indices,
            textures: &self.textures,
        });
        self.stats.draw_calls += 1;
    }

    fn warn_missing_shader(&mut self, which: &str) {
        if !self.warned_missing_shader {
            log::warn!(
                "{which} shader unavailable; discarding a batch of {} indices",
                self.pending_indices()
            );
            self.warned_missing_shader = true;
        }
    }

    fn clear(&mut self) {
        self.colored_vertices.clear();
        self.colored_indices.clear();
        self.textured_vertices.clear();
        self.textured_indices.clear();
        self.textures.clear();
        self.last_kind = None;
    }
}
