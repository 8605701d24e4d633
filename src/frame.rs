//! Per-frame orchestration: size targets, draw the play view, draw the
//! editor view when the editor is open, then present.

use glam::Mat4;

use crate::batch::{BatchRenderer, BatchShaders, RenderData};
use crate::camera::screen_ortho;
use crate::color::Color;
use crate::config::{ConfigError, RendererConfig};
use crate::geometry::ShapeKind;
use crate::gpu::{GraphicsApi, ShaderHandle, TextureHandle};
use crate::scene::{EntityId, FrameHost, PanelSize, PresentedTargets, ResourceProvider, SceneSource};
use crate::target::RenderTarget;
use crate::text::{TextPassReport, TextRasterPass};

/// Draw-call accounting for the last rendered frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub total_draw_calls: u32,
    pub object_draw_calls: u32,
    pub ui_draw_calls: u32,
    pub text_draw_calls: u32,
    pub debug_draw_calls: u32,
    /// Shapes handed to the batcher.
    pub primitives: u32,
    /// Text entities that produced glyphs, in draw order.
    pub rendered_text: Vec<EntityId>,
}

/// Debug primitives queued for the next frame, grouped by kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DebugShapes {
    pub rectangles: Vec<RenderData>,
    pub circles: Vec<RenderData>,
    pub lines: Vec<RenderData>,
    pub points: Vec<RenderData>,
}

impl DebugShapes {
    pub fn len(&self) -> usize {
        self.rectangles.len() + self.circles.len() + self.lines.len() + self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.rectangles.clear();
        self.circles.clear();
        self.lines.clear();
        self.points.clear();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pass {
    Play,
    Editor,
}

struct PassMatrices {
    /// Game objects and world text are only drawn when the scene has a main camera.
    draw_objects: bool,
    world: Mat4,
    ui: Mat4,
    clear: Color,
}

pub struct FrameRenderer<A: GraphicsApi> {
    config: RendererConfig,
    batch: BatchRenderer,
    text: TextRasterPass,
    text_shader: Option<ShaderHandle>,
    play: RenderTarget<A>,
    editor: RenderTarget<A>,
    cached_play_size: Option<PanelSize>,
    cached_editor_size: Option<PanelSize>,
    debug: DebugShapes,
    stats: FrameStats,
}

impl<A: GraphicsApi> FrameRenderer<A> {
    /// Validates `config`, fits it to the device and creates both targets at
    /// the configured window size. A target that fails to create is logged
    /// and left empty; its pass stays blank until a later resize succeeds.
    pub fn new(api: &mut A, mut config: RendererConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        config.clamp_to(&api.limits());

        let size = PanelSize::new(config.window.width, config.window.height);
        let mut play = RenderTarget::new("play");
        let mut editor = RenderTarget::new("editor");
        let play_ok = play.create(api, size.width, size.height, true, false);
        let editor_ok = editor.create(api, size.width, size.height, true, false);

        Ok(Self {
            batch: BatchRenderer::from_config(&config.batch),
            text: TextRasterPass::new(),
            text_shader: None,
            play,
            editor,
            cached_play_size: play_ok.then_some(size),
            cached_editor_size: editor_ok.then_some(size),
            debug: DebugShapes::default(),
            stats: FrameStats::default(),
            config,
        })
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn batch(&self) -> &BatchRenderer {
        &self.batch
    }

    pub fn play_target(&self) -> &RenderTarget<A> {
        &self.play
    }

    pub fn editor_target(&self) -> &RenderTarget<A> {
        &self.editor
    }

    pub fn set_clear_color(&mut self, color: Color) {
        self.config.clear_color = color;
    }

    // ── Debug shapes ────────────────────────────────────────────────────────

    /// Queues a debug primitive. Returns false for kinds the debug pass does
    /// not draw (filled quads).
    pub fn add_debug_shape(&mut self, data: RenderData) -> bool {
        if !data.kind.is_debug() {
            log::debug!("ignoring debug shape of kind {:?}", data.kind);
            return false;
        }
        let list = match data.kind {
            ShapeKind::RectangleOutline => &mut self.debug.rectangles,
            ShapeKind::CircleOutline => &mut self.debug.circles,
            ShapeKind::Line => &mut self.debug.lines,
            _ => &mut self.debug.points,
        };
        list.push(data);
        true
    }

    pub fn debug_shapes(&self) -> &DebugShapes {
        &self.debug
    }

    /// Debug shapes persist until cleared; callers clear them once per frame.
    pub fn clear_debug_shapes(&mut self) {
        self.debug.clear();
    }

    // ── Frame ───────────────────────────────────────────────────────────────

    pub fn render_frame<S, R, H>(&mut self, api: &mut A, scene: &mut S, resources: &R, host: &mut H)
    where
        S: SceneSource + ?Sized,
        R: ResourceProvider + ?Sized,
        H: FrameHost + ?Sized,
    {
        self.stats = FrameStats::default();
        self.bind_shaders(resources);
        self.compute_targets(api, host);

        let has_main_camera = scene.main_camera().is_some();
        let play = match scene.main_camera() {
            Some(camera) => PassMatrices {
                draw_objects: true,
                world: camera.world_to_ndc(),
                ui: camera.view_to_ndc(),
                clear: camera.background,
            },
            None => {
                let screen = screen_ortho(self.play.width() as f32, self.play.height() as f32);
                PassMatrices {
                    draw_objects: false,
                    world: screen,
                    ui: screen,
                    clear: self.config.clear_color,
                }
            }
        };
        self.draw_pass(api, scene, resources, Pass::Play, &play);

        // The editor shows the UI in world space, under its own camera.
        let editor = host.editor().map(|view| {
            let world = view.camera.world_to_ndc();
            PassMatrices {
                draw_objects: has_main_camera,
                world,
                ui: world,
                clear: view.camera.background,
            }
        });
        let editor_active = editor.is_some();
        if let Some(matrices) = editor {
            self.draw_pass(api, scene, resources, Pass::Editor, &matrices);
        }

        let batch_stats = self.batch.take_stats();
        self.stats.primitives = batch_stats.primitives;
        self.stats.total_draw_calls = self.stats.object_draw_calls
            + self.stats.ui_draw_calls
            + self.stats.debug_draw_calls
            + self.stats.text_draw_calls;

        self.present(api, host, editor_active);
    }

    fn bind_shaders<R: ResourceProvider + ?Sized>(&mut self, resources: &R) {
        let names = &self.config.shaders;
        self.batch.set_shaders(BatchShaders {
            colored: resources.shader(&names.colored),
            textured: resources.shader(&names.textured),
        });
        self.text_shader = resources.shader(&names.text);
    }

    /// Recreates a target only when its panel has a new, non-zero size.
    fn compute_targets<H: FrameHost + ?Sized>(&mut self, api: &mut A, host: &H) {
        sync_target(api, &mut self.play, &mut self.cached_play_size, host.play_panel_size());
        if let Some(view) = host.editor() {
            sync_target(api, &mut self.editor, &mut self.cached_editor_size, view.panel);
        }
    }

    fn target(&self, pass: Pass) -> &RenderTarget<A> {
        match pass {
            Pass::Play => &self.play,
            Pass::Editor => &self.editor,
        }
    }

    fn draw_pass<S, R>(
        &mut self,
        api: &mut A,
        scene: &mut S,
        resources: &R,
        pass: Pass,
        matrices: &PassMatrices,
    ) where
        S: SceneSource + ?Sized,
        R: ResourceProvider + ?Sized,
    {
        let target = self.target(pass);
        if !target.bind(api) {
            log::debug!("skipping {pass:?} pass: target '{}' is not complete", target.label());
            return;
        }
        api.set_viewport(target.width(), target.height());
        target.clear(api, matrices.clear);

        if matrices.draw_objects {
            self.draw_game_objects(api, scene, resources, &matrices.world);
        }
        self.draw_ui(api, scene, resources, &matrices.ui);
        self.draw_debug(api, &matrices.world);

        self.target(pass).unbind(api);
    }

    fn draw_game_objects<S, R>(&mut self, api: &mut A, scene: &mut S, resources: &R, world: &Mat4)
    where
        S: SceneSource + ?Sized,
        R: ResourceProvider + ?Sized,
    {
        let before = self.batch.stats().draw_calls;
        for &id in scene.render_order() {
            let Some(item) = scene.renderable(id).and_then(|r| r.resolve(resources)) else {
                continue;
            };
            self.batch.draw(api, &item, world);
        }
        self.batch.flush(api);
        self.stats.object_draw_calls += self.batch.stats().draw_calls - before;

        let report = self.text.draw(api, &*scene, resources, scene.world_text(), self.text_shader, world);
        self.apply_text_report(scene, report);
    }

    fn draw_ui<S, R>(&mut self, api: &mut A, scene: &mut S, resources: &R, ui: &Mat4)
    where
        S: SceneSource + ?Sized,
        R: ResourceProvider + ?Sized,
    {
        if !scene.ui_canvas_active() {
            return;
        }
        let before = self.batch.stats().draw_calls;
        for &id in scene.ui_render_order() {
            let Some(item) = scene.renderable(id).and_then(|r| r.resolve(resources)) else {
                continue;
            };
            self.batch.draw(api, &item, ui);
        }
        self.batch.flush(api);
        self.stats.ui_draw_calls += self.batch.stats().draw_calls - before;

        let report = self.text.draw(api, &*scene, resources, scene.ui_text(), self.text_shader, ui);
        self.apply_text_report(scene, report);
    }

    fn draw_debug(&mut self, api: &mut A, world: &Mat4) {
        if self.debug.is_empty() {
            return;
        }
        let before = self.batch.stats().draw_calls;
        for shape in &self.debug.rectangles {
            self.batch.draw_rectangle_outline(api, shape, world);
        }
        for shape in &self.debug.circles {
            self.batch.draw_circle_outline(api, shape, world);
        }
        for shape in &self.debug.lines {
            self.batch.draw_line(api, shape, world);
        }
        for shape in &self.debug.points {
            self.batch.draw_point(api, shape, world);
        }
        self.batch.flush(api);
        self.stats.debug_draw_calls += self.batch.stats().draw_calls - before;
    }

    fn apply_text_report<S: SceneSource + ?Sized>(&mut self, scene: &mut S, report: TextPassReport) {
        self.stats.text_draw_calls += report.draw_calls;
        self.stats.rendered_text.extend(report.rendered);
        for (id, size) in report.measured {
            scene.set_layout_size(id, size.x, size.y);
        }
    }

    fn present<H: FrameHost + ?Sized>(&mut self, api: &mut A, host: &mut H, editor_active: bool) {
        let targets = PresentedTargets {
            editor: editor_active.then(|| self.editor.color_attachment()).flatten(),
            play: self.play.color_attachment(),
        };
        host.display(targets);
        host.poll_events();
        api.present(presented_source(targets));
    }
}

/// The target shown in the window: the editor view while it exists, else the play view.
fn presented_source(targets: PresentedTargets) -> Option<TextureHandle> {
    targets.editor.or(targets.play)
}

fn sync_target<A: GraphicsApi>(
    api: &mut A,
    target: &mut RenderTarget<A>,
    cached: &mut Option<PanelSize>,
    live: PanelSize,
) {
    if !live.has_area() || *cached == Some(live) {
        return;
    }
    if target.resize(api, live.width, live.height) {
        *cached = Some(live);
    }
}
