use circuitkit_canvas::{point, ComponentId, Drawable, HeadlessSurface, SceneRenderer};
use circuitkit_core::EventBus;

use crate::support::{document, plain_context, LeadedComponent, RectComponent};

fn render(renderer: &mut SceneRenderer, components: &[&dyn Drawable]) {
    let mut surface = HeadlessSurface::new(400, 400);
    let mut ctx = plain_context();
    ctx.options.zoom_enabled = false;
    let failed = renderer.render(&mut surface, &document(), components, &ctx);
    assert!(failed.is_empty());
}

#[test]
fn test_leads_are_positive_and_cut_is_negative() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let part = LeadedComponent {
        id: 1,
        origin: point(100.0, 100.0),
    };
    render(&mut renderer, &[&part]);

    let area = renderer.component_area(ComponentId(1)).expect("cached");
    assert_eq!(area.continuity_positive().len(), 2);
    assert_eq!(area.continuity_negative().len(), 1);

    assert!(area.conducts_at(point(110.0, 100.0)));
    assert!(area.conducts_at(point(170.0, 101.0)));
    assert!(!area.conducts_at(point(130.0, 100.0)));
    assert!(area.negative_at(point(140.0, 100.0)).next().is_some());

    // the body is part of the footprint without conducting
    assert!(area.contains(point(130.0, 105.0)));
}

#[test]
fn test_continuity_regions_are_included_in_overall() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let part = LeadedComponent {
        id: 1,
        origin: point(50.0, 50.0),
    };
    render(&mut renderer, &[&part]);

    let area = renderer.component_area(ComponentId(1)).expect("cached");
    for region in area.continuity_positive() {
        let b = region.bounds().expect("bounds");
        assert!(area.contains(b.center()));
    }
}

#[test]
fn test_continuity_areas_at_point() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let a = LeadedComponent {
        id: 1,
        origin: point(0.0, 50.0),
    };
    // second part's left lead overlaps the first one's right lead
    let b = LeadedComponent {
        id: 2,
        origin: point(70.0, 50.0),
    };
    let plain = RectComponent::new(3, 60.0, 40.0, 40.0, 20.0);
    let components: [&dyn Drawable; 3] = [&a, &b, &plain];
    render(&mut renderer, &components);

    let touching = renderer.continuity_areas_at(point(75.0, 50.0), &components);
    let ids: Vec<ComponentId> = touching.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![ComponentId(1), ComponentId(2)]);
    assert!(touching.iter().all(|(_, regions)| regions.len() == 1));

    assert!(renderer
        .continuity_areas_at(point(110.0, 50.0), &components)
        .is_empty());
}
