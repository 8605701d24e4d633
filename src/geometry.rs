//! Static mesh templates in a normalized 1×1 model space and the model
//! transform that places them in the world.

use std::sync::LazyLock;

use glam::{Mat4, Vec2, Vec4};
use serde::{Deserialize, Serialize};

/// Number of segments used to approximate a circle outline.
pub const CIRCLE_SEGMENTS: usize = 32;

/// Largest index run any template produces, restart sentinel included.
pub const MAX_TEMPLATE_INDICES: usize = CIRCLE_SEGMENTS * 2 + 1;

// ── ShapeKind ────────────────────────────────────────────────────────────────

/// Every primitive the batcher knows how to accumulate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Quad,
    TexturedQuad,
    Point,
    Line,
    RectangleOutline,
    CircleOutline,
}

impl ShapeKind {
    /// Kinds drawn by the debug pass rather than by scene entities.
    pub fn is_debug(self) -> bool {
        matches!(
            self,
            ShapeKind::Point | ShapeKind::Line | ShapeKind::RectangleOutline | ShapeKind::CircleOutline
        )
    }
}

// ── MeshTemplate ─────────────────────────────────────────────────────────────

/// Vertex positions and indices for one shape, before any transform.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshTemplate {
    pub positions: Vec<Vec2>,
    pub indices: Vec<u16>,
}

impl MeshTemplate {
    /// Positions mapped through `matrix` (z = 0, w = 1).
    pub fn transformed(&self, matrix: &Mat4) -> impl Iterator<Item = Vec2> + '_ {
        let m = *matrix;
        self.positions
            .iter()
            .map(move |p| (m * Vec4::new(p.x, p.y, 0.0, 1.0)).truncate().truncate())
    }
}

/// The full set of templates, built once and shared by every draw.
#[derive(Clone, Debug)]
pub struct MeshGeometry {
    quad: MeshTemplate,
    rectangle_outline: MeshTemplate,
    line: MeshTemplate,
    point: MeshTemplate,
    circle_outline: MeshTemplate,
}

impl Default for MeshGeometry {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED: LazyLock<MeshGeometry> = LazyLock::new(MeshGeometry::new);

impl MeshGeometry {
    /// Process-wide immutable template set.
    pub fn shared() -> &'static MeshGeometry {
        &SHARED
    }

    pub fn new() -> Self {
        let corners = vec![
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ];

        let circle_positions: Vec<Vec2> = (0..CIRCLE_SEGMENTS)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / CIRCLE_SEGMENTS as f32;
                Vec2::new(angle.cos(), angle.sin()) * 0.5
            })
            .collect();
        // Closed loop: segment i joins vertex i-1 to vertex i, wrapping at 0.
        let circle_indices: Vec<u16> = (0..CIRCLE_SEGMENTS)
            .flat_map(|i| {
                let prev = (i + CIRCLE_SEGMENTS - 1) % CIRCLE_SEGMENTS;
                [prev as u16, i as u16]
            })
            .collect();

        Self {
            quad: MeshTemplate {
                positions: corners.clone(),
                indices: vec![0, 1, 2, 2, 3, 0],
            },
            rectangle_outline: MeshTemplate {
                positions: corners,
                indices: vec![0, 1, 1, 2, 2, 3, 3, 0],
            },
            line: MeshTemplate {
                positions: vec![Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0)],
                indices: vec![0, 1],
            },
            point: MeshTemplate {
                positions: vec![Vec2::ZERO],
                indices: vec![0],
            },
            circle_outline: MeshTemplate {
                positions: circle_positions,
                indices: circle_indices,
            },
        }
    }

    pub fn template(&self, kind: ShapeKind) -> &MeshTemplate {
        match kind {
            ShapeKind::Quad | ShapeKind::TexturedQuad => &self.quad,
            ShapeKind::RectangleOutline => &self.rectangle_outline,
            ShapeKind::Line => &self.line,
            ShapeKind::Point => &self.point,
            ShapeKind::CircleOutline => &self.circle_outline,
        }
    }
}

// ── Transforms ───────────────────────────────────────────────────────────────

/// Model matrix scaling the unit template to `width × height`, rotating it by
/// `orientation` radians and moving its center to `position`.
///
/// Column-major:
/// ```text
/// col0: [ w·cos,  w·sin, 0, 0]
/// col1: [-h·sin,  h·cos, 0, 0]
/// col2: [ 0,      0,     1, 0]
/// col3: [ px,     py,    0, 1]
/// ```
pub fn transform_matrix(width: f32, height: f32, orientation: f32, position: Vec2) -> Mat4 {
    let (sin, cos) = orientation.sin_cos();
    Mat4::from_cols(
        Vec4::new(width * cos, width * sin, 0.0, 0.0),
        Vec4::new(-height * sin, height * cos, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(position.x, position.y, 0.0, 1.0),
    )
}

/// UVs for the four quad corners, in template order.
pub fn quad_uvs(min: Vec2, max: Vec2) -> [Vec2; 4] {
    [min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)]
}
