use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use circuitkit_canvas::{
    point, ComponentId, Drawable, HeadlessSurface, SceneRenderer, StrokeStyle, Surface,
    SurfaceState,
};
use circuitkit_core::{AppEvent, ErrorEvent, EventBus, EventCategory, EventFilter};

use crate::support::{
    document, plain_context, BrokenComponent, FlakyComponent, RectComponent,
};

#[test]
fn test_failing_component_does_not_abort_the_pass() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let first = RectComponent::new(1, 0.0, 0.0, 20.0, 20.0);
    let broken = BrokenComponent { id: 2, panics: false };
    let last = RectComponent::new(3, 40.0, 40.0, 20.0, 20.0);
    let components: [&dyn Drawable; 3] = [&first, &broken, &last];

    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());

    assert_eq!(failed, vec![ComponentId(2)]);
    assert!(renderer.component_area(ComponentId(1)).is_some());
    assert!(renderer.component_area(ComponentId(2)).is_none());
    assert!(renderer.component_area(ComponentId(3)).is_some());
    assert_eq!(last.draw_count(), 1);
}

#[test]
fn test_panicking_component_is_contained() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    surface.set_stroke(StrokeStyle::new(2.0));
    let before = SurfaceState::capture(&surface);

    let panicking = BrokenComponent { id: 7, panics: true };
    let after = RectComponent::new(8, 10.0, 10.0, 30.0, 30.0);
    let components: [&dyn Drawable; 2] = [&panicking, &after];

    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());

    assert_eq!(failed, vec![ComponentId(7)]);
    assert!(renderer.component_area(ComponentId(8)).is_some());
    assert_eq!(SurfaceState::capture(&surface), before);
}

#[test]
fn test_component_listed_once_even_if_drawn_twice() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let broken = BrokenComponent { id: 5, panics: false };
    let components: [&dyn Drawable; 2] = [&broken, &broken];

    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());
    assert_eq!(failed, vec![ComponentId(5)]);
}

#[test]
fn test_failures_are_published_on_the_bus() {
    let bus = EventBus::shared();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    bus.subscribe(EventFilter::Categories(vec![EventCategory::Error]), move |event| {
        if let AppEvent::Error(ErrorEvent::ComponentDrawFailed { id, message, .. }) = event {
            assert_eq!(*id, 9);
            assert!(message.contains("missing footprint"));
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let mut renderer = SceneRenderer::new(Arc::clone(&bus));
    let mut surface = HeadlessSurface::new(400, 400);
    let broken = BrokenComponent { id: 9, panics: false };
    let components: [&dyn Drawable; 1] = [&broken];
    renderer.render(&mut surface, &document(), &components, &plain_context());

    assert_eq!(seen.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failure_drops_a_previously_cached_area() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let flaky = FlakyComponent::new(42);
    let components: [&dyn Drawable; 1] = [&flaky];

    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());
    assert!(failed.is_empty());
    assert!(renderer.component_area(ComponentId(42)).is_some());

    // same draw state, so the cached area would otherwise be reused
    flaky.failing.set(true);
    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());

    assert_eq!(failed, vec![ComponentId(42)]);
    assert!(renderer.component_area(ComponentId(42)).is_none());
    assert!(renderer
        .find_components_at(point(125.0, 125.0), &components)
        .is_empty());
}
