use serde::{Deserialize, Serialize};

use crate::batch::RESTART_INDEX;
use crate::color::Color;
use crate::geometry::MAX_TEMPLATE_INDICES;
use crate::gpu::GpuLimits;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse renderer config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("batch.max_vertices = {0} cannot hold the largest shape ({min} indices)", min = MAX_TEMPLATE_INDICES)]
    BatchTooSmall(usize),
    #[error("batch.max_vertices = {0} exceeds the 16-bit index range ({max})", max = RESTART_INDEX)]
    BatchTooLarge(usize),
    #[error("batch.max_textures must be at least 1")]
    NoTextureSlots,
    #[error("window size {width}x{height} has a zero dimension")]
    ZeroWindow { width: u32, height: u32 },
    #[error("clear color {0:?} has a component outside [0, 1]")]
    ClearColorOutOfRange([f32; 4]),
}

// ── Sections ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            title: "kiln2d".to_string(),
            width: 1280,
            height: 720,
            resizable: true,
        }
    }
}

/// Per-draw limits of the batcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Upper bound on both vertices and indices in one draw.
    pub max_vertices: usize,
    /// Distinct textures one textured draw may sample.
    pub max_textures: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_vertices: 1000, max_textures: 16 }
    }
}

/// Names the resource provider is asked for each frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderNames {
    pub colored: String,
    pub textured: String,
    pub text: String,
}

impl Default for ShaderNames {
    fn default() -> Self {
        Self {
            colored: "Colored".to_string(),
            textured: "Textured".to_string(),
            text: "Text".to_string(),
        }
    }
}

// ── RendererConfig ───────────────────────────────────────────────────────────

/// Top-level renderer configuration. Every field has a default, so a JSON
/// document only needs the keys it overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    pub window: WindowSettings,
    pub batch: BatchConfig,
    /// Used when no camera supplies a background.
    pub clear_color: Color,
    pub shaders: ShaderNames,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            window: WindowSettings::default(),
            batch: BatchConfig::default(),
            clear_color: Color::SAND,
            shaders: ShaderNames::default(),
        }
    }
}

impl RendererConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_vertices = self.batch.max_vertices;
        if max_vertices < MAX_TEMPLATE_INDICES {
            return Err(ConfigError::BatchTooSmall(max_vertices));
        }
        if max_vertices > RESTART_INDEX as usize {
            return Err(ConfigError::BatchTooLarge(max_vertices));
        }
        if self.batch.max_textures == 0 {
            return Err(ConfigError::NoTextureSlots);
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::ZeroWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        if !self.clear_color.is_normalized() {
            return Err(ConfigError::ClearColorOutOfRange(self.clear_color.0));
        }
        Ok(())
    }

    /// Lowers `max_textures` to what the device can sample in one draw.
    pub fn clamp_to(&mut self, limits: &GpuLimits) {
        if self.batch.max_textures > limits.max_texture_slots {
            log::info!(
                "batch.max_textures lowered from {} to the device limit {}",
                self.batch.max_textures,
                limits.max_texture_slots
            );
            self.batch.max_textures = limits.max_texture_slots;
        }
    }
}
