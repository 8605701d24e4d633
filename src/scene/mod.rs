//! Interfaces the frame renderer reads the world through.
//!
//! The renderer owns none of this state. Each frame it asks a
//! [`SceneSource`] what to draw, a [`ResourceProvider`] what to draw it with,
//! and a [`FrameHost`] where the result goes.

pub mod store;

pub use store::{ResourceRegistry, SceneStore, TextComponent};

use glam::Vec2;

use crate::batch::{RenderData, RenderItem, TexturedRenderData, UvRect};
use crate::camera::Camera;
use crate::color::Color;
use crate::geometry::ShapeKind;
use crate::gpu::{ShaderHandle, TextureHandle};
use crate::text::Font;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Placement of an entity. `width`/`height` are the quad extent in world units.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    pub orientation: f32,
}

impl Transform {
    pub fn new(position: Vec2, width: f32, height: f32) -> Self {
        Self { position, width, height, orientation: 0.0 }
    }
}

/// Quad renderer state of an entity (sprite in the world, image on the UI canvas).
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub enabled: bool,
    pub color: Color,
    /// Resource key of the texture, if any.
    pub texture: Option<String>,
    pub uv: UvRect,
}

impl Material {
    pub fn colored(color: Color) -> Self {
        Self { enabled: true, color, texture: None, uv: UvRect::FULL }
    }

    pub fn textured(texture: impl Into<String>) -> Self {
        Self {
            enabled: true,
            color: Color::WHITE,
            texture: Some(texture.into()),
            uv: UvRect::FULL,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct Renderable<'a> {
    pub transform: &'a Transform,
    pub material: &'a Material,
}

impl Renderable<'_> {
    /// Picks the draw path for this entity. Disabled materials yield `None`;
    /// a texture key the provider cannot resolve falls back to a plain quad.
    pub fn resolve<R: ResourceProvider + ?Sized>(&self, resources: &R) -> Option<RenderItem> {
        if !self.material.enabled {
            return None;
        }
        let t = self.transform;
        let shape = RenderData {
            kind: ShapeKind::Quad,
            width: t.width,
            height: t.height,
            orientation: t.orientation,
            position: t.position,
            color: self.material.color,
        };

        let Some(key) = self.material.texture.as_deref() else {
            return Some(RenderItem::Untextured(shape));
        };
        match resources.texture(key) {
            Some(texture) => Some(RenderItem::Textured(TexturedRenderData {
                shape: RenderData { kind: ShapeKind::TexturedQuad, ..shape },
                uv: self.material.uv,
                texture,
            })),
            None => {
                log::debug!("texture '{key}' not loaded; drawing untextured");
                Some(RenderItem::Untextured(shape))
            }
        }
    }
}

/// Read-only view of a text entity.
#[derive(Copy, Clone, Debug)]
pub struct TextView<'a> {
    pub active: bool,
    pub text: &'a str,
    /// Resource key of the font.
    pub font: Option<&'a str>,
    pub size: f32,
    pub color: Color,
    /// Center of the rendered string.
    pub position: Vec2,
    /// True when a quad renderer already sizes this entity's layout box.
    pub has_quad_renderer: bool,
}

pub trait SceneSource {
    /// World entities in hierarchy order.
    fn render_order(&self) -> &[EntityId];
    /// UI entities in canvas order.
    fn ui_render_order(&self) -> &[EntityId];
    fn ui_canvas_active(&self) -> bool;
    fn world_text(&self) -> &[EntityId];
    fn ui_text(&self) -> &[EntityId];
    fn main_camera(&self) -> Option<&Camera>;
    fn renderable(&self, id: EntityId) -> Option<Renderable<'_>>;
    fn text(&self, id: EntityId) -> Option<TextView<'_>>;
    /// Writes back a measured text extent.
    fn set_layout_size(&mut self, id: EntityId, width: f32, height: f32);
}

pub trait ResourceProvider {
    fn shader(&self, name: &str) -> Option<ShaderHandle>;
    fn texture(&self, key: &str) -> Option<TextureHandle>;
    fn font(&self, key: &str) -> Option<&Font>;
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PanelSize {
    pub width: u32,
    pub height: u32,
}

impl PanelSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// The editor's scene view, present only while the editor is active.
#[derive(Copy, Clone, Debug)]
pub struct EditorView<'a> {
    pub panel: PanelSize,
    pub camera: &'a Camera,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PresentedTargets {
    pub editor: Option<TextureHandle>,
    pub play: Option<TextureHandle>,
}

/// The window or editor shell the frame is shown in.
pub trait FrameHost {
    /// Size of the panel the play view is shown in.
    fn play_panel_size(&self) -> PanelSize;
    fn editor(&self) -> Option<EditorView<'_>>;
    /// Receives the finished color attachments, e.g. to show them in editor panels.
    fn display(&mut self, _targets: PresentedTargets) {}
    fn poll_events(&mut self) {}
}
