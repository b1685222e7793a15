use circuitkit_canvas::{
    point, Color, DrawCall, GraphicsRecorder, HeadlessSurface, PixmapSurface, ResourceCache,
    StrokeStyle, Surface,
};

#[test]
fn test_thin_fill_leaves_area_unchanged() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.fill_rect(10.0, 10.0, 40.0, 40.0);
    let reference = g.end();

    g.begin();
    g.fill_rect(10.0, 10.0, 40.0, 40.0);
    g.fill_rect(100.0, 100.0, 0.5, 10.0);
    let with_sliver = g.end();
    drop(g);

    let (a, b) = (reference.overall().area(), with_sliver.overall().area());
    assert!((a - b).abs() < 1e-3, "{} vs {}", a, b);
    assert!(!with_sliver.contains(point(100.25, 105.0)));

    let fills = surface
        .calls()
        .iter()
        .filter(|c| matches!(c, DrawCall::Fill { .. }))
        .count();
    assert_eq!(fills, 3);
}

#[test]
fn test_thin_fill_still_reaches_the_pixels() {
    let mut surface = PixmapSurface::new(50, 50).expect("surface");
    surface.clear(Color::WHITE);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.set_color(Color::BLACK);
    g.fill_rect(20.0, 10.0, 0.5, 10.0);
    let area = g.end();
    drop(g);

    assert!(area.is_empty());
    assert_ne!(surface.pixel(20, 15), Some(Color::WHITE));
}

#[test]
fn test_outline_of_filled_shape_is_not_added() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);
    g.set_stroke(StrokeStyle::new(2.0));

    g.begin();
    g.fill_oval(20.0, 20.0, 60.0, 40.0);
    let filled = g.end();

    g.begin();
    g.fill_oval(20.0, 20.0, 60.0, 40.0);
    g.draw_oval(20.0, 20.0, 60.0, 40.0);
    let outlined = g.end();

    assert!((filled.overall().area() - outlined.overall().area()).abs() < 1e-3);
}

#[test]
fn test_outline_of_a_different_shape_is_added() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.fill_rect(20.0, 20.0, 40.0, 40.0);
    g.draw_rect(100.0, 20.0, 40.0, 40.0);
    let area = g.end();

    assert!(area.contains(point(40.0, 40.0)));
    assert!(area.contains(point(100.0, 40.0)));
    // a stroked outline does not cover its interior
    assert!(!area.contains(point(120.0, 40.0)));
}

#[test]
fn test_outline_after_intervening_primitive_is_added() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.fill_rect(20.0, 20.0, 40.0, 40.0);
    g.fill_rect(100.0, 100.0, 10.0, 10.0);
    g.draw_rect(20.0, 20.0, 40.0, 40.0);
    let area = g.end();

    // half of the 3 px minimum outline sticks out of the fill
    assert!(area.contains(point(61.0, 40.0)));
}

#[test]
fn test_same_shape_in_another_frame_is_added() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.fill_rect(0.0, 0.0, 40.0, 40.0);
    g.translate(100.0, 0.0);
    g.draw_rect(0.0, 0.0, 40.0, 40.0);
    let area = g.end();

    assert!(area.contains(point(100.0, 20.0)));
}

#[test]
fn test_self_intersecting_fill_records_every_lobe() {
    let mut surface = HeadlessSurface::new(200, 200);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.fill_polygon(&[
        point(0.0, 0.0),
        point(100.0, 100.0),
        point(100.0, 0.0),
        point(0.0, 100.0),
    ]);
    let bow_tie = g.end();

    assert!(bow_tie.contains(point(20.0, 50.0)));
    assert!(bow_tie.contains(point(80.0, 50.0)));
    // the wedges between the lobes are not painted
    assert!(!bow_tie.contains(point(50.0, 20.0)));
    assert!(!bow_tie.contains(point(50.0, 80.0)));
    assert!((bow_tie.overall().area() - 5000.0).abs() < 1.0);
}
