//! Background grid drawn in device pixels.

use circuitkit_settings::GridType;

use crate::surface::{Color, StrokeStyle, Surface};

/// Grid lines closer than this many pixels are not drawn.
pub const MIN_GRID_SPACING_PX: f64 = 2.0;

/// Every this many grid steps a major line is drawn.
pub const MAJOR_GRID_EVERY: u32 = 10;

const CROSSHAIR_ARM: f32 = 2.0;

/// Draw a grid over `width` x `height` device pixels with `spacing` pixels
/// between steps. The caller is expected to have reset the transform.
///
/// Returns the number of grid steps drawn along both axes, zero if the grid
/// was skipped.
pub fn draw_grid(
    surface: &mut dyn Surface,
    grid_type: GridType,
    spacing: f64,
    width: f64,
    height: f64,
    minor: Color,
    major: Color,
) -> usize {
    if grid_type == GridType::None || !spacing.is_finite() || spacing < MIN_GRID_SPACING_PX {
        return 0;
    }

    let columns = (width / spacing).floor() as u32;
    let rows = (height / spacing).floor() as u32;
    let (w, h) = (width as f32, height as f32);
    surface.set_stroke(StrokeStyle::new(1.0));

    match grid_type {
        GridType::None => {}
        GridType::Lines => {
            for i in 0..=columns {
                let x = (i as f64 * spacing) as f32;
                surface.set_color(pick(i, minor, major));
                surface.draw_line(x, 0.0, x, h);
            }
            for j in 0..=rows {
                let y = (j as f64 * spacing) as f32;
                surface.set_color(pick(j, minor, major));
                surface.draw_line(0.0, y, w, y);
            }
        }
        GridType::Dots => {
            for i in 0..=columns {
                for j in 0..=rows {
                    let (x, y) = ((i as f64 * spacing) as f32, (j as f64 * spacing) as f32);
                    let is_major = i % MAJOR_GRID_EVERY == 0 && j % MAJOR_GRID_EVERY == 0;
                    surface.set_color(if is_major { major } else { minor });
                    surface.fill_rect(x, y, 1.0, 1.0);
                }
            }
        }
        GridType::Crosshair => {
            for i in 0..=columns {
                for j in 0..=rows {
                    let (x, y) = ((i as f64 * spacing) as f32, (j as f64 * spacing) as f32);
                    let is_major = i % MAJOR_GRID_EVERY == 0 && j % MAJOR_GRID_EVERY == 0;
                    surface.set_color(if is_major { major } else { minor });
                    surface.draw_line(x - CROSSHAIR_ARM, y, x + CROSSHAIR_ARM, y);
                    surface.draw_line(x, y - CROSSHAIR_ARM, x, y + CROSSHAIR_ARM);
                }
            }
        }
    }

    (columns + rows + 2) as usize
}

fn pick(step: u32, minor: Color, major: Color) -> Color {
    if step % MAJOR_GRID_EVERY == 0 {
        major
    } else {
        minor
    }
}
