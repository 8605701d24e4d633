use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec4};
use kiln2d::camera::*;
use kiln2d::Color;

fn project(camera: &Camera, p: Vec2) -> Vec2 {
    let ndc = camera.world_to_ndc() * Vec4::new(p.x, p.y, 0.0, 1.0);
    Vec2::new(ndc.x, ndc.y)
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-5
}

// ── Camera ───────────────────────────────────────────────────────────────────

#[test]
fn test_defaults() {
    let camera = Camera::new(800.0, 600.0);
    assert_eq!(camera.position, Vec2::ZERO);
    assert_eq!(camera.magnification(), 1.0);
    assert_eq!(camera.viewport(), Vec2::new(800.0, 600.0));
    assert_eq!(camera.background, Color::SAND);
}

#[test]
fn test_viewport_edges_map_to_ndc_edges() {
    let camera = Camera::new(800.0, 600.0);
    assert!(close(project(&camera, Vec2::ZERO), Vec2::ZERO));
    assert!(close(project(&camera, Vec2::new(400.0, 300.0)), Vec2::new(1.0, 1.0)));
    assert!(close(project(&camera, Vec2::new(-400.0, -300.0)), Vec2::new(-1.0, -1.0)));
}

#[test]
fn test_position_recenters_view() {
    let camera = Camera::new(200.0, 100.0).with_position(Vec2::new(50.0, 25.0));
    assert!(close(project(&camera, Vec2::new(50.0, 25.0)), Vec2::ZERO));
    assert!(close(project(&camera, Vec2::new(150.0, 25.0)), Vec2::new(1.0, 0.0)));
}

#[test]
fn test_magnification_widens_view() {
    let mut camera = Camera::new(200.0, 200.0);
    camera.set_magnification(2.0);
    assert!(close(project(&camera, Vec2::new(200.0, 0.0)), Vec2::new(1.0, 0.0)));
}

#[test]
fn test_magnification_is_clamped() {
    let mut camera = Camera::new(1.0, 1.0);
    camera.set_magnification(0.0);
    assert_eq!(camera.magnification(), 0.1);
    camera.set_magnification(50.0);
    assert_eq!(camera.magnification(), 10.0);
    camera.adjust_magnification(-1.0);
    assert_eq!(camera.magnification(), 9.0);
}

#[test]
fn test_rotation_turns_world_clockwise_on_screen() {
    let mut camera = Camera::new(200.0, 200.0);
    camera.orientation = FRAC_PI_2;
    // The camera's up now points along world -x.
    assert!(close(project(&camera, Vec2::new(-100.0, 0.0)), Vec2::new(0.0, 1.0)));
    assert!(close(project(&camera, Vec2::new(0.0, 100.0)), Vec2::new(1.0, 0.0)));
}

#[test]
fn test_set_viewport_changes_projection() {
    let mut camera = Camera::new(100.0, 100.0);
    camera.set_viewport(400.0, 100.0);
    assert!(close(project(&camera, Vec2::new(200.0, 50.0)), Vec2::new(1.0, 1.0)));
}

// ── Screen space ─────────────────────────────────────────────────────────────

#[test]
fn test_screen_ortho_matches_unrotated_camera() {
    let camera = Camera::new(640.0, 480.0);
    assert_eq!(screen_ortho(640.0, 480.0), camera.view_to_ndc());
    let corner = screen_ortho(640.0, 480.0) * Vec4::new(320.0, -240.0, 0.0, 1.0);
    assert!(close(Vec2::new(corner.x, corner.y), Vec2::new(1.0, -1.0)));
}
