use circuitkit_canvas::{
    canvas_dimensions, point, Box2D, ComponentId, Drawable, HeadlessSurface, SceneRenderer,
};
use circuitkit_core::EventBus;

use crate::support::{assert_box_near, document, plain_context, RectComponent};

#[test]
fn test_topmost_component_is_first() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let a = RectComponent::new(1, 10.0, 10.0, 50.0, 50.0);
    let b = RectComponent::new(2, 40.0, 40.0, 50.0, 50.0);
    let components: [&dyn Drawable; 2] = [&a, &b];

    renderer.render(&mut surface, &document(), &components, &plain_context());

    assert_eq!(
        renderer.find_components_at(point(50.0, 50.0), &components),
        vec![ComponentId(2), ComponentId(1)]
    );
    assert_eq!(
        renderer.find_components_at(point(20.0, 20.0), &components),
        vec![ComponentId(1)]
    );
    assert!(renderer
        .find_components_at(point(200.0, 200.0), &components)
        .is_empty());
}

#[test]
fn test_uncached_components_are_never_hit() {
    let renderer = SceneRenderer::new(EventBus::shared());
    let a = RectComponent::new(1, 0.0, 0.0, 100.0, 100.0);
    let components: [&dyn Drawable; 1] = [&a];
    assert!(renderer
        .find_components_at(point(50.0, 50.0), &components)
        .is_empty());
}

#[test]
fn test_overlapping_rectangles_at_double_zoom() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    renderer.set_zoom(2.0).expect("zoom within limits");
    let doc = document();
    let (w, h) = canvas_dimensions(&doc, renderer.zoom(), true);
    assert_eq!((w, h), (800.0, 800.0));

    let mut surface = HeadlessSurface::new(w as u32, h as u32);
    let lower = RectComponent::new(1, 20.0, 20.0, 60.0, 40.0);
    let upper = RectComponent::new(2, 50.0, 30.0, 60.0, 40.0);
    let components: [&dyn Drawable; 2] = [&lower, &upper];

    let failed = renderer.render(&mut surface, &doc, &components, &plain_context());
    assert!(failed.is_empty());

    // (60, 40) in the document is inside both rectangles
    assert_eq!(
        renderer.find_components_at(point(120.0, 80.0), &components),
        vec![ComponentId(2), ComponentId(1)]
    );

    for component in [&lower, &upper] {
        let area = renderer
            .component_area(component.id())
            .expect("cached area");
        let r = component.rect;
        assert_box_near(
            area.bounds().expect("bounds"),
            Box2D::new(point(r.min.x * 2.0, r.min.y * 2.0), point(r.max.x * 2.0, r.max.y * 2.0)),
        );
    }
}

#[test]
fn test_renderer_canvas_dimensions_without_zoom() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    renderer.set_zoom(3.0).expect("zoom");
    assert_eq!(renderer.canvas_dimensions(&document(), false), (400.0, 400.0));
    assert_eq!(renderer.canvas_dimensions(&document(), true), (1200.0, 1200.0));
}
