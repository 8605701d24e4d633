use glam::Vec2;
use kiln2d::batch::{RenderItem, UvRect};
use kiln2d::geometry::ShapeKind;
use kiln2d::gpu::TextureHandle;
use kiln2d::scene::*;
use kiln2d::Color;

fn transform() -> Transform {
    Transform { orientation: 0.5, ..Transform::new(Vec2::new(3.0, 4.0), 10.0, 20.0) }
}

// ── Renderable ───────────────────────────────────────────────────────────────

#[test]
fn test_colored_material_resolves_to_quad() {
    let material = Material::colored(Color::BLUE);
    let renderable = Renderable { transform: &transform(), material: &material };
    let Some(RenderItem::Untextured(data)) = renderable.resolve(&ResourceRegistry::new()) else {
        panic!("expected an untextured item");
    };
    assert_eq!(data.kind, ShapeKind::Quad);
    assert_eq!((data.width, data.height, data.orientation), (10.0, 20.0, 0.5));
    assert_eq!(data.position, Vec2::new(3.0, 4.0));
    assert_eq!(data.color, Color::BLUE);
}

#[test]
fn test_textured_material_resolves_through_registry() {
    let mut resources = ResourceRegistry::new();
    resources.insert_texture("hero", TextureHandle(4));
    let mut material = Material::textured("hero");
    material.uv = UvRect { min: Vec2::ZERO, max: Vec2::splat(0.5) };

    let renderable = Renderable { transform: &transform(), material: &material };
    let Some(RenderItem::Textured(data)) = renderable.resolve(&resources) else {
        panic!("expected a textured item");
    };
    assert_eq!(data.texture, TextureHandle(4));
    assert_eq!(data.shape.kind, ShapeKind::TexturedQuad);
    assert_eq!(data.uv.max, Vec2::splat(0.5));
}

#[test]
fn test_disabled_material_resolves_to_nothing() {
    let mut material = Material::colored(Color::BLUE);
    material.enabled = false;
    let renderable = Renderable { transform: &transform(), material: &material };
    assert!(renderable.resolve(&ResourceRegistry::new()).is_none());
}

// ── SceneStore ───────────────────────────────────────────────────────────────

#[test]
fn test_store_keeps_spawn_order() {
    let mut scene = SceneStore::new();
    let a = scene.spawn_sprite(transform(), Material::colored(Color::RED));
    let ui = scene.spawn_ui_element(transform(), Material::colored(Color::RED));
    let b = scene.spawn_sprite(transform(), Material::colored(Color::RED));

    assert_eq!(scene.render_order(), &[a, b]);
    assert_eq!(scene.ui_render_order(), &[ui]);
    assert!(!scene.ui_canvas_active());
    assert!(scene.main_camera().is_none());
}

#[test]
fn test_text_moves_between_lists() {
    let mut scene = SceneStore::new();
    let id = scene.spawn(transform());
    scene.add_text(id, TextComponent::new("hi", "mono", 1.0), false);
    assert_eq!(scene.world_text(), &[id]);

    scene.add_text(id, TextComponent::new("hi", "mono", 1.0), true);
    assert!(scene.world_text().is_empty());
    assert_eq!(scene.ui_text(), &[id]);

    let view = scene.text(id).unwrap();
    assert_eq!(view.text, "hi");
    assert_eq!(view.font, Some("mono"));
    assert_eq!(view.position, Vec2::new(3.0, 4.0));
    assert!(!view.has_quad_renderer);
}

#[test]
fn test_set_layout_size_writes_transform() {
    let mut scene = SceneStore::new();
    let id = scene.spawn(transform());
    scene.set_layout_size(id, 64.0, 16.0);
    let t = scene.transform(id).unwrap();
    assert_eq!((t.width, t.height), (64.0, 16.0));
}

#[test]
fn test_registry_lookups() {
    let mut resources = ResourceRegistry::new();
    resources.insert_shader("Colored", kiln2d::gpu::ShaderHandle(1));
    assert_eq!(resources.shader("Colored"), Some(kiln2d::gpu::ShaderHandle(1)));
    assert_eq!(resources.remove_shader("Colored"), Some(kiln2d::gpu::ShaderHandle(1)));
    assert_eq!(resources.shader("Colored"), None);
    assert!(resources.texture("nope").is_none());
    assert!(resources.font("nope").is_none());
}

#[test]
fn test_panel_area() {
    assert!(PanelSize::new(1, 1).has_area());
    assert!(!PanelSize::new(0, 10).has_area());
    assert!(!PanelSize::new(10, 0).has_area());
}
