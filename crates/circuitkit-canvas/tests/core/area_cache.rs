use std::sync::Arc;

use circuitkit_canvas::{ComponentId, Drawable, DrawState, HeadlessSurface, SceneRenderer};
use circuitkit_core::{AppEvent, EventBus, EventBusConfig, EventCategory, RenderEvent};

use crate::support::{document, plain_context, RectComponent};

#[test]
fn test_unchanged_component_keeps_cached_area() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let rect = RectComponent::new(1, 10.0, 10.0, 50.0, 30.0);
    let components: [&dyn Drawable; 1] = [&rect];
    let ctx = plain_context();

    renderer.render(&mut surface, &document(), &components, &ctx);
    let first = renderer.component_area(ComponentId(1)).expect("cached after first pass");
    renderer.render(&mut surface, &document(), &components, &ctx);
    let second = renderer.component_area(ComponentId(1)).expect("cached after second pass");

    assert!(Arc::ptr_eq(&first, &second));
    // the component is still painted on every pass
    assert_eq!(rect.draw_count(), 2);
}

#[test]
fn test_draw_state_change_recomputes_area() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let rect = RectComponent::new(1, 10.0, 10.0, 50.0, 30.0);
    let components: [&dyn Drawable; 1] = [&rect];
    let mut ctx = plain_context();

    renderer.render(&mut surface, &document(), &components, &ctx);
    let normal = renderer.component_area(ComponentId(1)).expect("cached");
    assert_eq!(renderer.cache().state_of(ComponentId(1)), Some(DrawState::Normal));

    ctx.selected.insert(ComponentId(1));
    renderer.render(&mut surface, &document(), &components, &ctx);
    let selected = renderer.component_area(ComponentId(1)).expect("cached");

    assert!(!Arc::ptr_eq(&normal, &selected));
    assert_eq!(renderer.cache().state_of(ComponentId(1)), Some(DrawState::Selected));
}

#[test]
fn test_invalidate_forces_recompute() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let rect = RectComponent::new(4, 0.0, 0.0, 20.0, 20.0);
    let components: [&dyn Drawable; 1] = [&rect];
    let ctx = plain_context();

    renderer.render(&mut surface, &document(), &components, &ctx);
    let before = renderer.component_area(ComponentId(4)).expect("cached");

    renderer.invalidate(ComponentId(4));
    assert!(renderer.component_area(ComponentId(4)).is_none());

    renderer.render(&mut surface, &document(), &components, &ctx);
    let after = renderer.component_area(ComponentId(4)).expect("recomputed");
    assert!(!Arc::ptr_eq(&before, &after));
}

#[test]
fn test_empty_area_is_not_cached() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = HeadlessSurface::new(400, 400);
    let sliver = RectComponent::new(2, 10.0, 10.0, 0.5, 0.5);
    let components: [&dyn Drawable; 1] = [&sliver];
    let mut ctx = plain_context();
    ctx.options.zoom_enabled = false;

    // the fill is degenerate and the matching outline is de-duplicated
    let failed = renderer.render(&mut surface, &document(), &components, &ctx);
    assert!(failed.is_empty());
    assert!(renderer.component_area(ComponentId(2)).is_none());
    assert!(renderer.cache().is_empty());
}

#[test]
fn test_clear_cache_publishes_event() {
    let bus = Arc::new(EventBus::with_config(EventBusConfig::with_history(16)));
    let mut renderer = SceneRenderer::new(Arc::clone(&bus));
    let mut surface = HeadlessSurface::new(400, 400);
    let a = RectComponent::new(1, 0.0, 0.0, 20.0, 20.0);
    let b = RectComponent::new(2, 40.0, 0.0, 20.0, 20.0);
    let components: [&dyn Drawable; 2] = [&a, &b];

    renderer.render(&mut surface, &document(), &components, &plain_context());
    assert_eq!(renderer.cache().len(), 2);
    renderer.clear_cache();
    assert!(renderer.cache().is_empty());

    let events = bus.history(Some(EventCategory::Render));
    assert!(events
        .iter()
        .any(|e| matches!(e, AppEvent::Render(RenderEvent::CacheCleared { entries: 2 }))));
}
