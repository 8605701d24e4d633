use glam::Vec2;

use crate::color::Color;
use crate::geometry::ShapeKind;
use crate::gpu::TextureHandle;

/// Everything needed to place and tint one untextured shape.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderData {
    pub kind: ShapeKind,
    pub width: f32,
    pub height: f32,
    /// Radians, counter-clockwise.
    pub orientation: f32,
    /// Center of the shape.
    pub position: Vec2,
    pub color: Color,
}

impl RenderData {
    pub fn new(kind: ShapeKind, position: Vec2, width: f32, height: f32) -> Self {
        Self {
            kind,
            width,
            height,
            orientation: 0.0,
            position,
            color: Color::WHITE,
        }
    }

    pub fn quad(position: Vec2, width: f32, height: f32, color: Color) -> Self {
        Self::new(ShapeKind::Quad, position, width, height).with_color(color)
    }

    pub fn rectangle_outline(position: Vec2, width: f32, height: f32, color: Color) -> Self {
        Self::new(ShapeKind::RectangleOutline, position, width, height).with_color(color)
    }

    pub fn circle_outline(center: Vec2, radius: f32, color: Color) -> Self {
        Self::new(ShapeKind::CircleOutline, center, radius * 2.0, radius * 2.0).with_color(color)
    }

    pub fn point(position: Vec2, color: Color) -> Self {
        Self::new(ShapeKind::Point, position, 1.0, 1.0).with_color(color)
    }

    /// Line segment from `start` to `end`, stored as a rotated unit line.
    pub fn line(start: Vec2, end: Vec2, color: Color) -> Self {
        let delta = end - start;
        Self {
            kind: ShapeKind::Line,
            width: delta.length(),
            height: 1.0,
            orientation: delta.y.atan2(delta.x),
            position: (start + end) * 0.5,
            color,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_orientation(mut self, orientation: f32) -> Self {
        self.orientation = orientation;
        self
    }
}

/// Sub-rectangle of a texture in UV space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    pub const FULL: Self = Self { min: Vec2::ZERO, max: Vec2::ONE };
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TexturedRenderData {
    pub shape: RenderData,
    pub uv: UvRect,
    pub texture: TextureHandle,
}

impl TexturedRenderData {
    pub fn new(position: Vec2, width: f32, height: f32, texture: TextureHandle) -> Self {
        Self {
            shape: RenderData::new(ShapeKind::TexturedQuad, position, width, height),
            uv: UvRect::FULL,
            texture,
        }
    }

    pub fn with_uv(mut self, uv: UvRect) -> Self {
        self.uv = uv;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.shape.color = color;
        self
    }
}

/// A scene entity resolved once into the path that will draw it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RenderItem {
    Untextured(RenderData),
    Textured(TexturedRenderData),
}
