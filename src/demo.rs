//! A small demo board: pads, resistors and copper traces drawn through the
//! canvas engine, with their conductive parts marked for connectivity checks.

use std::f32::consts::FRAC_PI_2;

use circuitkit_canvas::{
    point, vector, Angle, Color, ComponentId, ControlPoint, Document, DrawState, Drawable, Font,
    GraphicsRecorder, LineCap, LineJoin, Point, SceneRenderer, StrokeStyle, Surface, Transform,
    VisibilityPolicy,
};

const COPPER: Color = Color::rgb(184, 115, 51);
const SELECTED: Color = Color::rgb(60, 110, 220);
const BODY: Color = Color::rgb(222, 196, 150);
const OUTLINE: Color = Color::rgb(60, 60, 60);
const LEAD_LENGTH: f32 = 30.0;
const BODY_LENGTH: f32 = 60.0;

/// Two-lead axial resistor whose leads conduct.
pub struct Resistor {
    pub id: ComponentId,
    pub name: String,
    pub at: Point,
    pub rotation: f32,
    pub bands: [Color; 3],
}

impl Resistor {
    pub fn new(id: u64, name: &str, at: Point) -> Self {
        Self {
            id: ComponentId(id),
            name: name.to_string(),
            at,
            rotation: 0.0,
            bands: [
                Color::rgb(139, 69, 19),
                Color::BLACK,
                Color::rgb(255, 0, 0),
            ],
        }
    }

    pub fn rotated(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self
    }

    fn local(&self) -> Transform {
        Transform::identity()
            .pre_translate(vector(self.at.x, self.at.y))
            .pre_rotate(Angle::radians(self.rotation))
    }

    pub fn length() -> f32 {
        LEAD_LENGTH * 2.0 + BODY_LENGTH
    }
}

impl Drawable for Resistor {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        state: DrawState,
        outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        let body_end = LEAD_LENGTH + BODY_LENGTH;
        g.translate(self.at.x, self.at.y);
        g.rotate(self.rotation);

        g.set_stroke(StrokeStyle::new(4.0));
        g.set_color(COPPER);
        g.start_tracking_continuity_area(true);
        g.draw_line(0.0, 0.0, LEAD_LENGTH, 0.0);
        g.draw_line(body_end, 0.0, Resistor::length(), 0.0);
        g.stop_tracking_continuity_area();

        let body = match state {
            DrawState::Normal => BODY,
            DrawState::Selected | DrawState::Dragging => SELECTED,
        };
        if !outline_mode {
            g.set_color(body);
            g.fill_round_rect(LEAD_LENGTH, -10.0, BODY_LENGTH, 20.0, 8.0);
            for (i, band) in self.bands.iter().enumerate() {
                g.set_color(*band);
                g.fill_rect(LEAD_LENGTH + 12.0 + i as f32 * 10.0, -10.0, 5.0, 20.0);
            }
        }
        g.set_stroke(StrokeStyle::new(1.0));
        g.set_color(OUTLINE);
        g.draw_round_rect(LEAD_LENGTH, -10.0, BODY_LENGTH, 20.0, 8.0);

        g.set_font(Font::new("Sans", 12.0));
        g.draw_string(&self.name, LEAD_LENGTH, -16.0);
        Ok(())
    }

    fn control_points(&self) -> Vec<ControlPoint> {
        let t = self.local();
        vec![
            ControlPoint::new(t.transform_point(point(0.0, 0.0)), VisibilityPolicy::Always),
            ControlPoint::new(
                t.transform_point(point(Resistor::length(), 0.0)),
                VisibilityPolicy::Always,
            ),
        ]
    }
}

/// Copper track along a polyline.
pub struct Trace {
    pub id: ComponentId,
    pub name: String,
    pub points: Vec<Point>,
    pub width: f32,
}

impl Trace {
    pub fn new(id: u64, name: &str, points: Vec<Point>, width: f32) -> Self {
        Self {
            id: ComponentId(id),
            name: name.to_string(),
            points,
            width,
        }
    }
}

impl Drawable for Trace {
    fn id(&self) -> ComponentId {
        self.id
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
        if self.points.len() < 2 {
            anyhow::bail!("trace {} needs at least two points", self.name);
        }
        g.set_stroke(
            StrokeStyle::new(self.width)
                .with_cap(LineCap::Round)
                .with_join(LineJoin::Round),
        );
        g.set_color(if state == DrawState::Normal { COPPER } else { SELECTED });
        g.start_tracking_continuity_area(true);
        g.draw_polyline(&self.points);
        g.stop_tracking_continuity_area();
        Ok(())
    }

    fn control_points(&self) -> Vec<ControlPoint> {
        self.points
            .iter()
            .map(|p| ControlPoint::new(*p, VisibilityPolicy::WhenSelected))
            .collect()
    }
}

/// Round through-hole pad. The copper ring conducts; the drill hole does not.
pub struct Pad {
    pub id: ComponentId,
    pub name: String,
    pub center: Point,
    pub diameter: f32,
    pub drill: f32,
}

impl Pad {
    pub fn new(id: u64, name: &str, center: Point, diameter: f32, drill: f32) -> Self {
        Self {
            id: ComponentId(id),
            name: name.to_string(),
            center,
            diameter,
            drill,
        }
    }
}

impl Drawable for Pad {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn draw(
        &self,
        g: &mut GraphicsRecorder<'_>,
        _state: DrawState,
        _outline_mode: bool,
        _document: &Document,
    ) -> anyhow::Result<()> {
        let (r, d) = (self.diameter / 2.0, self.drill / 2.0);
        let (x, y) = (self.center.x, self.center.y);

        g.set_color(COPPER);
        g.start_tracking_continuity_area(true);
        g.fill_oval(x - r, y - r, self.diameter, self.diameter);

        g.set_color(Color::WHITE);
        g.start_tracking_continuity_area(false);
        g.fill_oval(x - d, y - d, self.drill, self.drill);
        g.stop_tracking_continuity_area();
        Ok(())
    }

    fn control_points(&self) -> Vec<ControlPoint> {
        vec![ControlPoint::new(self.center, VisibilityPolicy::WhenSelected)]
    }
}

/// The demo layout in drawing order.
pub fn demo_board() -> Vec<Box<dyn Drawable>> {
    vec![
        Box::new(Pad::new(1, "J1", point(300.0, 400.0), 40.0, 16.0)),
        Box::new(Trace::new(
            2,
            "net-in",
            vec![point(300.0, 400.0), point(400.0, 400.0)],
            10.0,
        )),
        Box::new(Resistor::new(3, "R1", point(400.0, 400.0))),
        Box::new(Trace::new(
            4,
            "net-mid",
            vec![
                point(520.0, 400.0),
                point(600.0, 400.0),
                point(600.0, 600.0),
                point(700.0, 600.0),
            ],
            10.0,
        )),
        Box::new(Resistor::new(5, "R2", point(700.0, 600.0))),
        Box::new(Resistor::new(6, "R3", point(900.0, 300.0)).rotated(FRAC_PI_2)),
        Box::new(Pad::new(7, "J2", point(820.0, 600.0), 40.0, 16.0)),
    ]
}

/// Pairs of components whose conductive regions overlap, in document order.
/// Negative regions are not taken into account.
pub fn connections(
    renderer: &SceneRenderer,
    components: &[&dyn Drawable],
) -> Vec<(ComponentId, ComponentId)> {
    let areas: Vec<_> = components
        .iter()
        .filter_map(|c| renderer.component_area(c.id()).map(|a| (c.id(), a)))
        .collect();

    let mut pairs = Vec::new();
    for (i, (a_id, a)) in areas.iter().enumerate() {
        for (b_id, b) in &areas[i + 1..] {
            let touching = a.continuity_positive().iter().any(|ra| {
                b.continuity_positive()
                    .iter()
                    .any(|rb| ra.intersects(rb))
            });
            if touching {
                pairs.push((*a_id, *b_id));
            }
        }
    }
    pairs
}
