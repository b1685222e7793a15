use std::f32::consts::FRAC_PI_2;

use circuitkit_canvas::{
    font_manager, Color, ComponentId, Drawable, Font, GraphicsRecorder, PixmapSurface,
    ResourceCache, SceneRenderer, Surface,
};
use circuitkit_core::EventBus;

use crate::support::{document, plain_context, RectComponent};

fn surface() -> PixmapSurface {
    PixmapSurface::new(400, 400).expect("surface")
}

#[test]
fn test_component_pixels_and_background() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = surface();
    let rect = RectComponent::new(1, 100.0, 100.0, 80.0, 60.0);
    let components: [&dyn Drawable; 1] = [&rect];

    let failed = renderer.render(&mut surface, &document(), &components, &plain_context());
    assert!(failed.is_empty());

    assert_eq!(surface.pixel(140, 130), Some(Color::rgb(200, 40, 40)));
    assert_eq!(surface.pixel(20, 20), Some(Color::WHITE));
    // the outline darkens the edge of the fill
    let edge = surface.pixel(100, 130).expect("pixel");
    assert!(edge.r < 150, "got {:?}", edge);
}

#[test]
fn test_selected_component_is_drawn_in_selected_state() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = surface();
    let rect = RectComponent::new(1, 100.0, 100.0, 80.0, 60.0);
    let components: [&dyn Drawable; 1] = [&rect];
    let mut ctx = plain_context();
    ctx.selected.insert(ComponentId(1));

    renderer.render(&mut surface, &document(), &components, &ctx);
    assert_eq!(surface.pixel(140, 130), Some(Color::rgb(40, 40, 200)));
}

#[test]
fn test_locked_component_is_blended_with_background() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = surface();
    let rect = RectComponent::new(1, 100.0, 100.0, 80.0, 60.0);
    let components: [&dyn Drawable; 1] = [&rect];
    let mut ctx = plain_context();
    ctx.locked.insert(ComponentId(1));

    renderer.render(&mut surface, &document(), &components, &ctx);
    let c = surface.pixel(140, 130).expect("pixel");
    assert!(c.g > 100, "locked fill should be lighter, got {:?}", c);
    assert!(c.r > c.g);
}

#[test]
fn test_grid_is_drawn_under_components() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = surface();
    let theme = renderer.theme().clone();
    let mut ctx = plain_context();
    ctx.options.grid_type = circuitkit_settings::GridType::Lines;

    renderer.render(&mut surface, &document(), &[], &ctx);

    let background = Color::from(theme.background);
    let row: Vec<Color> = (0..60).filter_map(|x| surface.pixel(x, 10)).collect();
    assert!(row.iter().any(|c| *c != background));
    assert!(row.iter().any(|c| *c == background));
}

#[test]
fn test_rgb_export_matches_surface() {
    let mut renderer = SceneRenderer::new(EventBus::shared());
    let mut surface = surface();
    let rect = RectComponent::new(1, 10.0, 10.0, 40.0, 40.0);
    let components: [&dyn Drawable; 1] = [&rect];
    renderer.render(&mut surface, &document(), &components, &plain_context());

    let image = surface.to_rgb_image();
    assert_eq!(image.dimensions(), (400, 400));
    assert_eq!(image.get_pixel(30, 30).0, [200, 40, 40]);
}

#[test]
fn test_rotated_text_paints_inside_its_recorded_box() {
    let font = Font::new("Sans", 20.0);
    if font_manager::get_font_for(&font.family, false, false).is_none() {
        // nothing is painted without a system font
        return;
    }
    let mut surface = PixmapSurface::new(200, 200).expect("surface");
    surface.clear(Color::WHITE);
    let mut resources = ResourceCache::new();
    let mut g = GraphicsRecorder::new(&mut surface, &mut resources, 1.0);

    g.begin();
    g.set_color(Color::BLACK);
    g.set_font(font);
    g.translate(100.0, 40.0);
    g.rotate(FRAC_PI_2);
    g.draw_string("WIDE", 0.0, 0.0);
    let area = g.end();
    drop(g);

    let b = area.bounds().expect("bounds");
    assert!(b.height() > b.width());

    let mut inked = 0;
    for y in 0..200 {
        for x in 0..200 {
            if surface.pixel(x, y) == Some(Color::WHITE) {
                continue;
            }
            inked += 1;
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let inside_x = px > b.min.x - 2.0 && px < b.max.x + 2.0;
            let inside_y = py > b.min.y - 2.0 && py < b.max.y + 2.0;
            assert!(
                inside_x && inside_y,
                "ink at ({}, {}) outside {:?}",
                x,
                y,
                b
            );
        }
    }
    assert!(inked > 0);
}
