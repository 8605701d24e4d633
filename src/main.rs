//! Small interactive scene for eyeballing the renderer.
//!
//! F1 opens the editor view (arrows pan, +/- zoom), Escape quits.
//! A `kiln2d.json` in the working directory overrides the default config.

use std::f32::consts::TAU;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use kiln2d::batch::{RenderData, UvRect};
use kiln2d::renderer::{ShaderProgram, WgpuApi};
use kiln2d::scene::{
    EditorView, EntityId, FrameHost, Material, PanelSize, ResourceRegistry, SceneStore,
    TextComponent, Transform,
};
use kiln2d::text::{Font, Glyph};
use kiln2d::{Camera, Color, FrameRenderer, LoggingConfig, RendererConfig, TextureHandle, init_logging};

const CONFIG_PATH: &str = "kiln2d.json";
const STATS_INTERVAL: Duration = Duration::from_secs(5);
const EDITOR_PAN_STEP: f32 = 24.0;
const EDITOR_ZOOM_STEP: f32 = 0.1;

// ── Host ─────────────────────────────────────────────────────────────────────

struct WindowHost {
    play_panel: PanelSize,
    editor_open: bool,
    editor_camera: Camera,
}

impl FrameHost for WindowHost {
    fn play_panel_size(&self) -> PanelSize {
        self.play_panel
    }

    fn editor(&self) -> Option<EditorView<'_>> {
        self.editor_open.then_some(EditorView {
            panel: self.play_panel,
            camera: &self.editor_camera,
        })
    }
}

// ── Demo scene ───────────────────────────────────────────────────────────────

struct Demo {
    api: WgpuApi,
    renderer: FrameRenderer<WgpuApi>,
    scene: SceneStore,
    resources: ResourceRegistry,
    host: WindowHost,
    spinner: EntityId,
    started: Instant,
    last_stats: Instant,
}

/// Solid rectangles standing in for glyphs, so the text path runs without
/// shipping a font asset.
fn block_font(texture: TextureHandle) -> Font {
    let mut font = Font::new(14.0);
    let block = |height: f32| Glyph {
        texture,
        size: Vec2::new(6.0, height),
        bearing: Vec2::new(1.0, height),
        advance: 8.0,
        uv: UvRect::FULL,
    };
    for ch in ('A'..='Z').chain('0'..='9') {
        font.insert(ch, block(10.0));
    }
    for ch in 'a'..='z' {
        font.insert(ch, block(7.0));
    }
    font.insert(' ', Glyph { size: Vec2::ZERO, bearing: Vec2::ZERO, ..block(0.0) });
    font
}

fn checkerboard(size: u32, cell: u32, a: [u8; 4], b: [u8; 4]) -> image::RgbaImage {
    image::RgbaImage::from_fn(size, size, |x, y| {
        if (x / cell + y / cell) % 2 == 0 { image::Rgba(a) } else { image::Rgba(b) }
    })
}

impl Demo {
    fn new(window: Arc<Window>, config: RendererConfig) -> Self {
        let mut api = pollster::block_on(WgpuApi::new(window)).expect("failed to initialise the GPU");

        let mut resources = ResourceRegistry::new();
        resources.insert_shader(config.shaders.colored.clone(), ShaderProgram::Colored.handle());
        resources.insert_shader(config.shaders.textured.clone(), ShaderProgram::Textured.handle());
        resources.insert_shader(config.shaders.text.clone(), ShaderProgram::Text.handle());

        let crate_tex = api.upload_rgba(&checkerboard(64, 8, [180, 110, 60, 255], [120, 70, 40, 255]), "crate");
        let tile_tex = api.upload_rgba(&checkerboard(64, 16, [90, 140, 90, 255], [70, 110, 70, 255]), "tile");
        let glyph_tex = api.upload_rgba(&image::RgbaImage::from_pixel(4, 4, image::Rgba([255; 4])), "glyph_block");
        resources.insert_texture("crate", crate_tex);
        resources.insert_texture("tile", tile_tex);
        resources.insert_font("blocks", block_font(glyph_tex));

        let (width, height) = (config.window.width as f32, config.window.height as f32);
        let mut scene = SceneStore::new();
        scene.set_main_camera(Some(Camera::new(width, height)));
        scene.set_ui_canvas_active(true);

        for row in -2..=2 {
            for col in -4..=4 {
                let pos = Vec2::new(col as f32 * 72.0, row as f32 * 72.0);
                let key = if (row + col) % 2 == 0 { "tile" } else { "crate" };
                scene.spawn_sprite(Transform::new(pos, 64.0, 64.0), Material::textured(key));
            }
        }
        let spinner = scene.spawn_sprite(
            Transform::new(Vec2::new(0.0, 240.0), 96.0, 96.0),
            Material::colored(Color::rgba(0.2, 0.4, 0.9, 1.0)),
        );
        let label = scene.spawn(Transform::new(Vec2::new(0.0, 300.0), 0.0, 0.0));
        scene.add_text(label, TextComponent::new("Spinning quad", "blocks", 1.5), false);

        let banner = scene.spawn_ui_element(
            Transform::new(Vec2::new(-width * 0.5 + 160.0, height * 0.5 - 30.0), 300.0, 40.0),
            Material::colored(Color::rgba(0.0, 0.0, 0.0, 0.6)),
        );
        let mut banner_text = TextComponent::new("F1 editor view", "blocks", 2.0);
        banner_text.color = Color::WHITE;
        scene.add_text(banner, banner_text, true);

        let renderer = FrameRenderer::new(&mut api, config).expect("invalid renderer configuration");
        let host = WindowHost {
            play_panel: PanelSize::new(width as u32, height as u32),
            editor_open: false,
            editor_camera: Camera::new(width, height).with_background(Color::rgba(0.15, 0.15, 0.18, 1.0)),
        };

        let now = Instant::now();
        Self { api, renderer, scene, resources, host, spinner, started: now, last_stats: now }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.api.resize_surface(width, height);
        self.host.play_panel = PanelSize::new(width, height);
        if width > 0 && height > 0 {
            if let Some(camera) = self.scene.camera_mut() {
                camera.set_viewport(width as f32, height as f32);
            }
            self.host.editor_camera.set_viewport(width as f32, height as f32);
        }
    }

    fn key_pressed(&mut self, code: KeyCode) {
        let camera = &mut self.host.editor_camera;
        match code {
            KeyCode::F1 => {
                self.host.editor_open = !self.host.editor_open;
                log::info!("editor view {}", if self.host.editor_open { "opened" } else { "closed" });
            }
            KeyCode::ArrowLeft => camera.position.x -= EDITOR_PAN_STEP,
            KeyCode::ArrowRight => camera.position.x += EDITOR_PAN_STEP,
            KeyCode::ArrowUp => camera.position.y += EDITOR_PAN_STEP,
            KeyCode::ArrowDown => camera.position.y -= EDITOR_PAN_STEP,
            KeyCode::Equal | KeyCode::NumpadAdd => camera.adjust_magnification(-EDITOR_ZOOM_STEP),
            KeyCode::Minus | KeyCode::NumpadSubtract => camera.adjust_magnification(EDITOR_ZOOM_STEP),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let t = self.started.elapsed().as_secs_f32();
        let spin = (t * 0.25 % 1.0) * TAU;
        if let Some(transform) = self.scene.transform_mut(self.spinner) {
            transform.orientation = spin;
        }

        self.renderer.clear_debug_shapes();
        let center = Vec2::new(0.0, 240.0);
        let tip = center + Vec2::new(spin.cos(), spin.sin()) * 80.0;
        self.renderer.add_debug_shape(RenderData::circle_outline(center, 68.0, Color::GREEN));
        self.renderer.add_debug_shape(RenderData::rectangle_outline(center, 96.0, 96.0, Color::RED).with_orientation(spin));
        self.renderer.add_debug_shape(RenderData::line(center, tip, Color::RED));
        self.renderer.add_debug_shape(RenderData::point(tip, Color::BLACK));

        self.renderer.render_frame(&mut self.api, &mut self.scene, &self.resources, &mut self.host);

        if self.last_stats.elapsed() >= STATS_INTERVAL {
            self.last_stats = Instant::now();
            let stats = self.renderer.stats();
            log::debug!(
                "draw calls: {} total ({} objects, {} ui, {} text, {} debug), {} primitives",
                stats.total_draw_calls,
                stats.object_draw_calls,
                stats.ui_draw_calls,
                stats.text_draw_calls,
                stats.debug_draw_calls,
                stats.primitives
            );
        }
    }
}

// ── App (winit ApplicationHandler) ──────────────────────────────────────────

struct App {
    config: RendererConfig,
    demo: Option<Demo>,
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.demo.is_some() {
            return;
        }
        let settings = &self.config.window;
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title(&settings.title)
                        .with_inner_size(winit::dpi::PhysicalSize::new(settings.width, settings.height))
                        .with_resizable(settings.resizable),
                )
                .expect("failed to create window"),
        );
        self.demo = Some(Demo::new(window, self.config.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(demo) = self.demo.as_ref() {
            demo.api.window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(demo) = self.demo.as_mut() else { return };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => demo.resize(size.width, size.height),

            WindowEvent::RedrawRequested => demo.redraw(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                if code == KeyCode::Escape {
                    event_loop.exit();
                } else {
                    demo.key_pressed(code);
                }
            }

            _ => {}
        }
    }
}

fn load_config() -> RendererConfig {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(json) => RendererConfig::from_json(&json).unwrap_or_else(|e| {
            log::error!("ignoring {CONFIG_PATH}: {e}");
            RendererConfig::default()
        }),
        Err(_) => RendererConfig::default(),
    }
}

fn main() {
    init_logging(LoggingConfig::default());

    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = App { config: load_config(), demo: None };
    event_loop.run_app(&mut app).expect("event loop terminated with an error");
}
