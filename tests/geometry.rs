use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec2, Vec4};
use kiln2d::geometry::*;

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-5
}

// ── Templates ────────────────────────────────────────────────────────────────

#[test]
fn test_quad_template() {
    let geometry = MeshGeometry::new();
    let quad = geometry.template(ShapeKind::Quad);
    assert_eq!(quad.positions.len(), 4);
    assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);
    assert_eq!(quad.positions[0], Vec2::new(-0.5, -0.5));
    assert_eq!(quad.positions[2], Vec2::new(0.5, 0.5));
}

#[test]
fn test_textured_quad_shares_quad_template() {
    let geometry = MeshGeometry::new();
    assert_eq!(geometry.template(ShapeKind::TexturedQuad), geometry.template(ShapeKind::Quad));
}

#[test]
fn test_rectangle_outline_template() {
    let geometry = MeshGeometry::new();
    let rect = geometry.template(ShapeKind::RectangleOutline);
    assert_eq!(rect.positions.len(), 4);
    assert_eq!(rect.indices, vec![0, 1, 1, 2, 2, 3, 3, 0]);
}

#[test]
fn test_line_and_point_templates() {
    let geometry = MeshGeometry::new();
    let line = geometry.template(ShapeKind::Line);
    assert_eq!(line.positions, vec![Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0)]);
    assert_eq!(line.indices, vec![0, 1]);

    let point = geometry.template(ShapeKind::Point);
    assert_eq!(point.positions, vec![Vec2::ZERO]);
    assert_eq!(point.indices, vec![0]);
}

#[test]
fn test_circle_outline_is_closed_loop() {
    let geometry = MeshGeometry::new();
    let circle = geometry.template(ShapeKind::CircleOutline);
    assert_eq!(circle.positions.len(), CIRCLE_SEGMENTS);
    assert_eq!(circle.indices.len(), CIRCLE_SEGMENTS * 2);
    assert_eq!(&circle.indices[..4], &[31, 0, 0, 1]);

    for p in &circle.positions {
        assert!((p.length() - 0.5).abs() < 1e-5);
    }
    // Every vertex starts exactly one segment and ends exactly one.
    for v in 0..CIRCLE_SEGMENTS as u16 {
        let starts = circle.indices.chunks(2).filter(|s| s[0] == v).count();
        let ends = circle.indices.chunks(2).filter(|s| s[1] == v).count();
        assert_eq!((starts, ends), (1, 1));
    }
}

#[test]
fn test_largest_template_fits_minimum_batch() {
    let geometry = MeshGeometry::shared();
    let kinds = [
        ShapeKind::Quad,
        ShapeKind::TexturedQuad,
        ShapeKind::Point,
        ShapeKind::Line,
        ShapeKind::RectangleOutline,
        ShapeKind::CircleOutline,
    ];
    let largest = kinds.iter().map(|&k| geometry.template(k).indices.len() + 1).max();
    assert_eq!(largest, Some(MAX_TEMPLATE_INDICES));
}

#[test]
fn test_debug_kinds() {
    assert!(!ShapeKind::Quad.is_debug());
    assert!(!ShapeKind::TexturedQuad.is_debug());
    assert!(ShapeKind::Point.is_debug());
    assert!(ShapeKind::Line.is_debug());
    assert!(ShapeKind::RectangleOutline.is_debug());
    assert!(ShapeKind::CircleOutline.is_debug());
}

// ── Transforms ───────────────────────────────────────────────────────────────

#[test]
fn test_transform_matrix_layout() {
    let m = transform_matrix(2.0, 3.0, 0.0, Vec2::new(5.0, 7.0));
    assert_eq!(m.x_axis, Vec4::new(2.0, 0.0, 0.0, 0.0));
    assert_eq!(m.y_axis, Vec4::new(0.0, 3.0, 0.0, 0.0));
    assert_eq!(m.z_axis, Vec4::new(0.0, 0.0, 1.0, 0.0));
    assert_eq!(m.w_axis, Vec4::new(5.0, 7.0, 0.0, 1.0));
}

#[test]
fn test_transform_matrix_rotates_counter_clockwise() {
    let m = transform_matrix(2.0, 1.0, FRAC_PI_2, Vec2::ZERO);
    let geometry = MeshGeometry::new();
    let moved: Vec<Vec2> = geometry.template(ShapeKind::Line).transformed(&m).collect();
    assert!(close(moved[0], Vec2::new(0.0, -1.0)));
    assert!(close(moved[1], Vec2::new(0.0, 1.0)));
}

#[test]
fn test_transformed_applies_translation() {
    let geometry = MeshGeometry::new();
    let m = Mat4::from_translation(glam::Vec3::new(10.0, -4.0, 0.0));
    let moved: Vec<Vec2> = geometry.template(ShapeKind::Point).transformed(&m).collect();
    assert_eq!(moved, vec![Vec2::new(10.0, -4.0)]);
}

#[test]
fn test_quad_uvs_follow_corner_order() {
    let uvs = quad_uvs(Vec2::new(0.0, 0.25), Vec2::new(0.5, 0.75));
    assert_eq!(
        uvs,
        [Vec2::new(0.0, 0.25), Vec2::new(0.5, 0.25), Vec2::new(0.5, 0.75), Vec2::new(0.0, 0.75)]
    );
}
