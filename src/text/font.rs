use std::collections::HashMap;

use glam::Vec2;
use serde::Deserialize;

use crate::batch::UvRect;
use crate::gpu::TextureHandle;

// ── Glyph ────────────────────────────────────────────────────────────────────

/// Metrics and texture region of one character, in font pixels.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Glyph {
    pub texture: TextureHandle,
    /// Bitmap width and height.
    pub size: Vec2,
    /// Offset from the pen position to the bitmap's left edge (x) and from
    /// the baseline up to its top edge (y).
    pub bearing: Vec2,
    /// Pen advance after this glyph.
    pub advance: f32,
    pub uv: UvRect,
}

// ── Font ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Font {
    pub glyphs: HashMap<char, Glyph>,
    pub line_height: f32,
}

impl Font {
    pub fn new(line_height: f32) -> Self {
        Self { glyphs: HashMap::new(), line_height }
    }

    pub fn insert(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Extent of `text` at `scale`: summed advances by the tallest glyph.
    /// Characters the font lacks contribute nothing.
    pub fn measure(&self, text: &str, scale: f32) -> Vec2 {
        let (width, height) = text
            .chars()
            .filter_map(|ch| self.glyph(ch))
            .fold((0.0_f32, 0.0_f32), |(w, h), g| (w + g.advance, h.max(g.size.y)));
        Vec2::new(width, height) * scale
    }

    /// Loads glyph metrics for a single atlas texture from JSON:
    ///
    /// ```json
    /// { "line_height": 24, "texture_width": 256, "texture_height": 256,
    ///   "glyphs": [ { "id": 65, "x": 0, "y": 0, "width": 14, "height": 20,
    ///                 "bearing_x": 1, "bearing_y": 18, "advance": 16 } ] }
    /// ```
    ///
    /// `id` is a Unicode code point; invalid code points are skipped.
    pub fn from_json(json: &str, atlas: TextureHandle) -> Result<Self, serde_json::Error> {
        let raw: RawFont = serde_json::from_str(json)?;
        let tw = raw.texture_width.max(1) as f32;
        let th = raw.texture_height.max(1) as f32;

        let glyphs = raw
            .glyphs
            .into_iter()
            .filter_map(|g| {
                let ch = char::from_u32(g.id)?;
                let uv = UvRect {
                    min: Vec2::new(g.x as f32 / tw, g.y as f32 / th),
                    max: Vec2::new((g.x + g.width) as f32 / tw, (g.y + g.height) as f32 / th),
                };
                Some((ch, Glyph {
                    texture: atlas,
                    size: Vec2::new(g.width as f32, g.height as f32),
                    bearing: Vec2::new(g.bearing_x as f32, g.bearing_y as f32),
                    advance: g.advance as f32,
                    uv,
                }))
            })
            .collect();

        Ok(Self { glyphs, line_height: raw.line_height })
    }
}

// ── Raw (JSON-facing) types ──────────────────────────────────────────────────

#[derive(Deserialize)]
struct RawGlyph {
    id: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    bearing_x: i32,
    bearing_y: i32,
    advance: u32,
}

#[derive(Deserialize)]
struct RawFont {
    line_height: f32,
    texture_width: u32,
    texture_height: u32,
    glyphs: Vec<RawGlyph>,
}
