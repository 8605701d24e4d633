//! Glyph-by-glyph text rasterization. Every character is its own draw call.

mod font;

pub use font::{Font, Glyph};

use glam::{Mat4, Vec2};

use crate::gpu::{GlyphDraw, GraphicsApi, ShaderHandle, TextureHandle};
use crate::scene::{EntityId, ResourceProvider, SceneSource};
use crate::vertex::GlyphVertex;

/// One positioned glyph quad.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GlyphQuad {
    pub texture: TextureHandle,
    pub vertices: [GlyphVertex; 6],
}

/// Lays `text` out centered on `center`, `scale` world units per font pixel.
/// Characters without a glyph are skipped and do not advance the pen.
pub fn layout_text(font: &Font, text: &str, scale: f32, center: Vec2) -> Vec<GlyphQuad> {
    let half = font.measure(text, scale) * 0.5;
    let mut pen_x = center.x;

    text.chars()
        .filter_map(|ch| font.glyph(ch))
        .map(|glyph| {
            let x = pen_x + glyph.bearing.x * scale - half.x;
            let y = center.y - (glyph.size.y - glyph.bearing.y) * scale - half.y;
            let w = glyph.size.x * scale;
            let h = glyph.size.y * scale;
            pen_x += glyph.advance * scale;

            let (u0, v0) = (glyph.uv.min.x, glyph.uv.min.y);
            let (u1, v1) = (glyph.uv.max.x, glyph.uv.max.y);
            // Two triangles; v0 is the top row of the bitmap.
            let vertices = [
                GlyphVertex { position: [x, y + h], uv: [u0, v0] },
                GlyphVertex { position: [x, y], uv: [u0, v1] },
                GlyphVertex { position: [x + w, y], uv: [u1, v1] },
                GlyphVertex { position: [x, y + h], uv: [u0, v0] },
                GlyphVertex { position: [x + w, y], uv: [u1, v1] },
                GlyphVertex { position: [x + w, y + h], uv: [u1, v0] },
            ];
            GlyphQuad { texture: glyph.texture, vertices }
        })
        .collect()
}

/// What one run of the text pass did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextPassReport {
    pub draw_calls: u32,
    /// Entities that produced at least one glyph.
    pub rendered: Vec<EntityId>,
    /// Measured extents for entities without a quad renderer.
    pub measured: Vec<(EntityId, Vec2)>,
}

#[derive(Default)]
pub struct TextRasterPass {
    warned_missing_shader: bool,
}

impl TextRasterPass {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws every active text entity in `entities`, in order.
    ///
    /// Entities that are inactive, have no font, or name a font the provider
    /// lacks are skipped. Without a shader nothing is drawn.
    pub fn draw<A, S, R>(
        &mut self,
        api: &mut A,
        scene: &S,
        resources: &R,
        entities: &[EntityId],
        shader: Option<ShaderHandle>,
        view_proj: &Mat4,
    ) -> TextPassReport
    where
        A: GraphicsApi,
        S: SceneSource + ?Sized,
        R: ResourceProvider + ?Sized,
    {
        let mut report = TextPassReport::default();
        if entities.is_empty() {
            return report;
        }
        let Some(shader) = shader else {
            if !self.warned_missing_shader {
                log::warn!("text shader unavailable; skipping text");
                self.warned_missing_shader = true;
            }
            return report;
        };
        self.warned_missing_shader = false;

        for &id in entities {
            let Some(text) = scene.text(id) else { continue };
            if !text.active {
                continue;
            }
            let Some(font_key) = text.font else { continue };
            let Some(font) = resources.font(font_key) else {
                log::debug!("font '{font_key}' not loaded; skipping {id:?}");
                continue;
            };

            if !text.has_quad_renderer {
                report.measured.push((id, font.measure(text.text, text.size)));
            }

            let quads = layout_text(font, text.text, text.size, text.position);
            for quad in &quads {
                api.draw_glyph(&GlyphDraw {
                    shader,
                    texture: quad.texture,
                    vertices: &quad.vertices,
                    color: text.color,
                    view_proj: *view_proj,
                });
                report.draw_calls += 1;
            }
            if !quads.is_empty() {
                report.rendered.push(id);
            }
        }

        report
    }
}
