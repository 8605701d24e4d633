use glam::{Mat4, Vec2, Vec4};

use crate::color::Color;

const MIN_MAGNIFICATION: f32 = 0.1;
const MAX_MAGNIFICATION: f32 = 10.0;
const DEPTH_RANGE: f32 = 10.0;

/// 2D orthographic camera over a y-up world.
///
/// The visible region is `viewport × magnification` world units centered on
/// `position` and rotated by `orientation`. The same type drives both the
/// runtime camera and the editor's free camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// World-space point the camera is centered on.
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub orientation: f32,
    /// Clear color for whatever target this camera renders into.
    pub background: Color,
    magnification: f32,
    viewport: Vec2,
}

impl Camera {
    pub fn new(viewport_width: f32, viewport_height: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            orientation: 0.0,
            background: Color::SAND,
            magnification: 1.0,
            viewport: Vec2::new(viewport_width, viewport_height),
        }
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn magnification(&self) -> f32 {
        self.magnification
    }

    /// Clamped to `[0.1, 10]`. Values above 1 show more of the world.
    pub fn set_magnification(&mut self, value: f32) {
        self.magnification = value.clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION);
    }

    pub fn adjust_magnification(&mut self, delta: f32) {
        self.set_magnification(self.magnification + delta);
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width, height);
    }

    /// World → view: undo the camera's translation and rotation, then scale by
    /// `1 / magnification`.
    pub fn world_to_view(&self) -> Mat4 {
        let (sin, cos) = self.orientation.sin_cos();
        let inv_mag = 1.0 / self.magnification;
        let up = Vec2::new(-sin, cos) * inv_mag;
        let right = Vec2::new(up.y, -up.x);

        Mat4::from_cols(
            Vec4::new(right.x, up.x, 0.0, 0.0),
            Vec4::new(right.y, up.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(-right.dot(self.position), -up.dot(self.position), 0.0, 1.0),
        )
    }

    /// View → NDC: orthographic box of the viewport, centered on the origin.
    pub fn view_to_ndc(&self) -> Mat4 {
        let half = self.viewport * 0.5;
        Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -DEPTH_RANGE, DEPTH_RANGE)
    }

    pub fn world_to_ndc(&self) -> Mat4 {
        self.view_to_ndc() * self.world_to_view()
    }
}

/// Orthographic matrix for a `width × height` screen with the origin at its center.
/// Used for UI when no camera is available.
pub fn screen_ortho(width: f32, height: f32) -> Mat4 {
    let half = Vec2::new(width, height) * 0.5;
    Mat4::orthographic_rh(-half.x, half.x, -half.y, half.y, -DEPTH_RANGE, DEPTH_RANGE)
}
