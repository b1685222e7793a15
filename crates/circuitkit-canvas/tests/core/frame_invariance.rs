use circuitkit_canvas::{
    point, Box2D, GraphicsRecorder, HeadlessSurface, Point, ResourceCache, StrokeStyle, Surface,
    Transform,
};
use lyon::math::{vector, Angle};
use proptest::prelude::*;

use crate::support::{assert_box_near, TOLERANCE};

fn local(tx: f32, ty: f32, radians: f32, s: f32) -> Transform {
    Transform::identity()
        .pre_translate(vector(tx, ty))
        .pre_rotate(Angle::radians(radians))
        .pre_scale(s, s)
}

fn corners(t: &Transform, x: f32, y: f32, w: f32, h: f32) -> Vec<Point> {
    [point(x, y), point(x + w, y), point(x + w, y + h), point(x, y + h)]
        .iter()
        .map(|p| t.transform_point(*p))
        .collect()
}

/// Bounds recorded by drawing through transform calls, and by drawing the
/// same rectangle with the transform baked into its corners.
fn both_ways(base: Transform, tx: f32, ty: f32, radians: f32, s: f32) -> (Box2D, Box2D) {
    let mut surface = HeadlessSurface::new(800, 800);
    surface.set_transform(base);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.translate(tx, ty);
    g.rotate(radians);
    g.scale(s, s);
    g.fill_rect(0.0, 0.0, 40.0, 20.0);
    let transformed = g.end();

    g.begin();
    g.fill_polygon(&corners(&local(tx, ty, radians, s), 0.0, 0.0, 40.0, 20.0));
    let baked = g.end();

    (
        transformed.bounds().expect("transformed bounds"),
        baked.bounds().expect("baked bounds"),
    )
}

#[test]
fn test_translate_rotate_scale_matches_baked_geometry() {
    let (a, b) = both_ways(Transform::identity(), 120.0, 80.0, 0.6, 1.5);
    assert_box_near(a, b);
}

#[test]
fn test_frame_is_the_one_active_at_begin() {
    let base = Transform::scale(2.0, 2.0).then(&Transform::translation(15.0, -5.0));
    let (a, b) = both_ways(base, 30.0, 40.0, -1.1, 0.75);
    assert_box_near(a, b);
}

#[test]
fn test_rotate_about_matches_baked_geometry() {
    let mut surface = HeadlessSurface::new(400, 400);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.rotate_about(std::f32::consts::FRAC_PI_2, 50.0, 50.0);
    g.fill_rect(50.0, 50.0, 20.0, 10.0);
    let area = g.end();

    // a quarter turn around (50, 50) maps (70, 60) to (40, 70)
    assert_box_near(
        area.bounds().expect("bounds"),
        Box2D::new(point(40.0, 50.0), point(50.0, 70.0)),
    );
}

#[test]
fn test_shear_matches_baked_geometry() {
    let mut surface = HeadlessSurface::new(400, 400);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.translate(100.0, 100.0);
    g.shear(0.5, 0.0);
    g.fill_rect(0.0, 0.0, 20.0, 20.0);
    let sheared = g.end();

    g.begin();
    g.fill_polygon(&[
        point(100.0, 100.0),
        point(120.0, 100.0),
        point(130.0, 120.0),
        point(110.0, 120.0),
    ]);
    let baked = g.end();

    assert_box_near(
        sheared.bounds().expect("sheared"),
        baked.bounds().expect("baked"),
    );
    assert!((sheared.overall().area() - baked.overall().area()).abs() < 1e-3);
}

#[test]
fn test_stroke_outline_follows_local_transform() {
    let mut surface = HeadlessSurface::new(400, 400);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.set_stroke(StrokeStyle::new(4.0));
    g.translate(200.0, 100.0);
    g.rotate(std::f32::consts::FRAC_PI_2);
    g.draw_line(0.0, 0.0, 50.0, 0.0);
    let area = g.end();

    // the horizontal line becomes vertical, 4 px wide
    assert_box_near(
        area.bounds().expect("bounds"),
        Box2D::new(point(198.0, 100.0), point(202.0, 150.0)),
    );
}

proptest! {
    #[test]
    fn prop_translation_is_frame_invariant(
        tx in -200.0f32..200.0,
        ty in -200.0f32..200.0,
        radians in 0.0f32..std::f32::consts::TAU,
    ) {
        let (a, b) = both_ways(Transform::translation(50.0, 50.0), tx, ty, radians, 1.0);
        prop_assert!((a.min.x - b.min.x).abs() < TOLERANCE);
        prop_assert!((a.min.y - b.min.y).abs() < TOLERANCE);
        prop_assert!((a.max.x - b.max.x).abs() < TOLERANCE);
        prop_assert!((a.max.y - b.max.y).abs() < TOLERANCE);
    }
}
