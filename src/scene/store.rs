//! Plain in-memory implementations of the scene and resource interfaces.

use std::collections::HashMap;

use super::{EntityId, Material, Renderable, ResourceProvider, SceneSource, TextView, Transform};
use crate::camera::Camera;
use crate::color::Color;
use crate::gpu::{ShaderHandle, TextureHandle};
use crate::text::Font;

#[derive(Clone, Debug, PartialEq)]
pub struct TextComponent {
    pub active: bool,
    pub text: String,
    pub font: Option<String>,
    pub size: f32,
    pub color: Color,
}

impl TextComponent {
    pub fn new(text: impl Into<String>, font: impl Into<String>, size: f32) -> Self {
        Self {
            active: true,
            text: text.into(),
            font: Some(font.into()),
            size,
            color: Color::BLACK,
        }
    }
}

#[derive(Default)]
pub struct SceneStore {
    next_id: u32,
    transforms: HashMap<EntityId, Transform>,
    materials: HashMap<EntityId, Material>,
    texts: HashMap<EntityId, TextComponent>,
    render_order: Vec<EntityId>,
    ui_order: Vec<EntityId>,
    world_text: Vec<EntityId>,
    ui_text: Vec<EntityId>,
    ui_canvas_active: bool,
    camera: Option<Camera>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, transform: Transform) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.transforms.insert(id, transform);
        id
    }

    /// World entity with a quad renderer, appended to the hierarchy order.
    pub fn spawn_sprite(&mut self, transform: Transform, material: Material) -> EntityId {
        let id = self.spawn(transform);
        self.materials.insert(id, material);
        self.render_order.push(id);
        id
    }

    /// Canvas entity with a quad renderer, appended to the UI order.
    pub fn spawn_ui_element(&mut self, transform: Transform, material: Material) -> EntityId {
        let id = self.spawn(transform);
        self.materials.insert(id, material);
        self.ui_order.push(id);
        id
    }

    /// Attaches text to `id`. `on_canvas` selects the UI text list.
    pub fn add_text(&mut self, id: EntityId, text: TextComponent, on_canvas: bool) {
        self.texts.insert(id, text);
        self.world_text.retain(|&e| e != id);
        self.ui_text.retain(|&e| e != id);
        if on_canvas {
            self.ui_text.push(id);
        } else {
            self.world_text.push(id);
        }
    }

    pub fn set_main_camera(&mut self, camera: Option<Camera>) {
        self.camera = camera;
    }

    pub fn camera_mut(&mut self) -> Option<&mut Camera> {
        self.camera.as_mut()
    }

    pub fn set_ui_canvas_active(&mut self, active: bool) {
        self.ui_canvas_active = active;
    }

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.transforms.get(&id)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.transforms.get_mut(&id)
    }

    pub fn material_mut(&mut self, id: EntityId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn text_mut(&mut self, id: EntityId) -> Option<&mut TextComponent> {
        self.texts.get_mut(&id)
    }
}

impl SceneSource for SceneStore {
    fn render_order(&self) -> &[EntityId] {
        &self.render_order
    }

    fn ui_render_order(&self) -> &[EntityId] {
        &self.ui_order
    }

    fn ui_canvas_active(&self) -> bool {
        self.ui_canvas_active
    }

    fn world_text(&self) -> &[EntityId] {
        &self.world_text
    }

    fn ui_text(&self) -> &[EntityId] {
        &self.ui_text
    }

    fn main_camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    fn renderable(&self, id: EntityId) -> Option<Renderable<'_>> {
        Some(Renderable {
            transform: self.transforms.get(&id)?,
            material: self.materials.get(&id)?,
        })
    }

    fn text(&self, id: EntityId) -> Option<TextView<'_>> {
        let text = self.texts.get(&id)?;
        let transform = self.transforms.get(&id)?;
        Some(TextView {
            active: text.active,
            text: &text.text,
            font: text.font.as_deref(),
            size: text.size,
            color: text.color,
            position: transform.position,
            has_quad_renderer: self.materials.contains_key(&id),
        })
    }

    fn set_layout_size(&mut self, id: EntityId, width: f32, height: f32) {
        if let Some(t) = self.transforms.get_mut(&id) {
            t.width = width;
            t.height = height;
        }
    }
}

/// Shaders, textures and fonts by key.
#[derive(Default)]
pub struct ResourceRegistry {
    shaders: HashMap<String, ShaderHandle>,
    textures: HashMap<String, TextureHandle>,
    fonts: HashMap<String, Font>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_shader(&mut self, name: impl Into<String>, shader: ShaderHandle) {
        self.shaders.insert(name.into(), shader);
    }

    pub fn remove_shader(&mut self, name: &str) -> Option<ShaderHandle> {
        self.shaders.remove(name)
    }

    pub fn insert_texture(&mut self, key: impl Into<String>, texture: TextureHandle) {
        self.textures.insert(key.into(), texture);
    }

    pub fn insert_font(&mut self, key: impl Into<String>, font: Font) {
        self.fonts.insert(key.into(), font);
    }
}

impl ResourceProvider for ResourceRegistry {
    fn shader(&self, name: &str) -> Option<ShaderHandle> {
        self.shaders.get(name).copied()
    }

    fn texture(&self, key: &str) -> Option<TextureHandle> {
        self.textures.get(key).copied()
    }

    fn font(&self, key: &str) -> Option<&Font> {
        self.fonts.get(key)
    }
}
