//! Components and helpers shared by the integration tests.

use std::cell::Cell;

use anyhow::bail;
use circuitkit_canvas::{
    point, Box2D, Color, ComponentId, ControlPoint, Document, DrawState, Drawable,
    GraphicsRecorder, Point, StrokeStyle, Surface, VisibilityPolicy,
};
use circuitkit_core::units::Size;
use circuitkit_settings::GridType;

pub const TOLERANCE: f32 = 1e-2;

/// A 2 x 2 inch page, 400 x 400 px at zoom 1.
pub fn document() -> Document {
    Document::new("test board", Size::inches(2.0), Size::inches(2.0))
}

/// A render context without grid or control points, so draw calls are easy to count.
pub fn plain_context<'a>() -> circuitkit_canvas::RenderContext<'a> {
    let mut ctx = circuitkit_canvas::RenderContext::default();
    ctx.options.grid_type = GridType::None;
    ctx.options.show_control_points = false;
    ctx
}

pub fn assert_box_near(actual: Box2D, expected: Box2D) {
    let close = |a: Point, b: Point| (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE;
    assert!(
        close(actual.min, expected.min) && close(actual.max, expected.max),
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

/// A filled rectangle with a matching outline, counting how often it is drawn.
pub struct RectComponent {
    pub id: u64,
    pub name: String,
    pub rect: Box2D,
    pub draws: Cell<usize>,
}

impl RectComponent {
    pub fn new(id: u64, x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            id,
            name: format!("rect{}", id),
            rect: Box2D::new(point(x, y), point(x + w, y + h)),
            draws: Cell::new(0),
        }
    }

    pub fn draw_count(&self) -> usize {
        self.draws.get()
    }
}

impl Drawable for RectComponent {
    fn id(&self) -> ComponentId {
        ComponentId(self.id)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        state: DrawState,
        _outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        self.draws.set(self.draws.get() + 1);
        let r = self.rect;
        g.set_color(match state {
            DrawState::Normal => Color::rgb(200, 40, 40),
            DrawState::Selected | DrawState::Dragging => Color::rgb(40, 40, 200),
        });
        g.fill_rect(r.min.x, r.min.y, r.width(), r.height());
        g.set_color(Color::BLACK);
        g.draw_rect(r.min.x, r.min.y, r.width(), r.height());
        Ok(())
    }

    fn control_points(&self) -> Vec<ControlPoint> {
        vec![
            ControlPoint::new(self.rect.min, VisibilityPolicy::Always),
            ControlPoint::new(self.rect.max, VisibilityPolicy::WhenSelected),
        ]
    }
}

/// Draws something, then fails by error or by panic.
pub struct BrokenComponent {
    pub id: u64,
    pub panics: bool,
}

impl Drawable for BrokenComponent {
    fn id(&self) -> ComponentId {
        ComponentId(self.id)
    }

    fn name(&self) -> &str {
        "broken"
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        _state: DrawState,
        _outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        g.translate(500.0, 500.0);
        g.set_stroke(StrokeStyle::new(8.0));
        g.fill_rect(0.0, 0.0, 10.0, 10.0);
        if self.panics {
            panic!("lead index out of range");
        }
        bail!("missing footprint")
    }
}

/// A filled square that fails once `failing` is set.
pub struct FlakyComponent {
    pub id: u64,
    pub failing: Cell<bool>,
}

impl FlakyComponent {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            failing: Cell::new(false),
        }
    }
}

impl Drawable for FlakyComponent {
    fn id(&self) -> ComponentId {
        ComponentId(self.id)
    }

    fn name(&self) -> &str {
        "flaky"
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        _state: DrawState,
        _outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        g.fill_rect(100.0, 100.0, 50.0, 50.0);
        if self.failing.get() {
            bail!("footprint library unavailable");
        }
        Ok(())
    }
}

/// Two conducting leads joined by an insulating body with a cut in the middle.
pub struct LeadedComponent {
    pub id: u64,
    pub origin: Point,
}

impl Drawable for LeadedComponent {
    fn id(&self) -> ComponentId {
        ComponentId(self.id)
    }

    fn name(&self) -> &str {
        "leaded"
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        _state: DrawState,
        _outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        g.translate(self.origin.x, self.origin.y);
        g.set_stroke(StrokeStyle::new(4.0));

        g.start_tracking_continuity_area(true);
        g.draw_line(0.0, 0.0, 20.0, 0.0);
        g.draw_line(60.0, 0.0, 80.0, 0.0);
        g.stop_tracking_continuity_area();

        g.fill_rect(20.0, -8.0, 40.0, 16.0);

        g.start_tracking_continuity_area(false);
        g.fill_rect(38.0, -8.0, 4.0, 16.0);
        g.stop_tracking_continuity_area();
        Ok(())
    }
}
