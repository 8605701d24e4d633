pub mod batch;
pub mod camera;
pub mod color;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod gpu;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod target;
pub mod text;
pub mod vertex;

pub use batch::{BatchRenderer, RenderData, RenderItem, TexturedRenderData, UvRect};
pub use camera::Camera;
pub use color::Color;
pub use config::{ConfigError, RendererConfig};
pub use frame::{FrameRenderer, FrameStats};
pub use geometry::{MeshGeometry, ShapeKind};
pub use gpu::{GraphicsApi, IncompleteTarget, ShaderHandle, TextureHandle};
pub use logging::{LoggingConfig, init_logging};
pub use target::RenderTarget;
pub use text::{Font, TextRasterPass};
