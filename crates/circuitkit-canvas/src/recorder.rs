//! Surface proxy that records the area each component draws.
//!
//! A [`GraphicsRecorder`] wraps the real surface for one render pass. Between
//! [`begin`](GraphicsRecorder::begin) and [`end`](GraphicsRecorder::end) every
//! primitive is forwarded and also folded into a per-component
//! [`ComponentArea`], expressed in the device pixel frame that was current at
//! `begin`.
//!
//! Transform calls made by the component are tracked as a local delta on top
//! of the frame captured at `begin`, so shapes drawn under any
//! rotation/scale/translation land in the same canonical frame.

use lyon::math::{vector, Angle, Box2D, Transform};
use lyon::path::Path;
use tracing::{debug, trace, warn};

use circuitkit_core::RenderError;

use crate::area::ComponentArea;
use crate::geometry::{self, PathSignature};
use crate::region::Region;
use crate::resources::ResourceCache;
use crate::surface::{
    shear_transform, Color, Composite, Font, Image, RenderHints, StrokeStyle, Surface,
    SurfaceState, TextMetrics,
};

/// Default flattening tolerance in device pixels.
pub const DEFAULT_TOLERANCE: f32 = 0.25;

/// Recorded stroke outlines are at least this wide, so hairlines stay hittable.
pub const MIN_TRACKED_STROKE_WIDTH: f32 = 3.0;

/// Filled shapes whose device bounds are this thin or thinner are not recorded.
pub const DEGENERATE_EXTENT: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Continuity {
    Positive,
    Negative,
}

struct Session {
    base: Transform,
    base_inverse: Option<Transform>,
    delta: Transform,
    recording: bool,
    tracking: bool,
    continuity: Option<Continuity>,
    overall: Vec<Region>,
    positive: Vec<Region>,
    negative: Vec<Region>,
    last_filled: Option<PathSignature>,
    forced_composite: Option<Composite>,
    saved: SurfaceState,
    saved_stroke: StrokeStyle,
    saved_composite: Composite,
}

impl Session {
    fn device(&self) -> Transform {
        self.delta.then(&self.base)
    }

    fn wants_geometry(&self) -> bool {
        self.recording && (self.tracking || self.continuity.is_some())
    }

    fn append(&mut self, region: Region) {
        if region.is_empty() {
            return;
        }
        match self.continuity {
            Some(Continuity::Positive) => self.positive.push(region.clone()),
            Some(Continuity::Negative) => self.negative.push(region.clone()),
            None => {}
        }
        if self.tracking {
            self.overall.push(region);
        }
    }
}

/// Recording proxy around the real drawing surface.
pub struct GraphicsRecorder<'a> {
    surface: &'a mut dyn Surface,
    resources: &'a mut ResourceCache,
    zoom: f64,
    tolerance: f32,
    stroke: StrokeStyle,
    composite: Composite,
    session: Option<Session>,
}

impl<'a> GraphicsRecorder<'a> {
    pub fn new(surface: &'a mut dyn Surface, resources: &'a mut ResourceCache, zoom: f64) -> Self {
        let stroke = surface.stroke();
        let composite = surface.composite();
        Self {
            surface,
            resources,
            zoom,
            tolerance: DEFAULT_TOLERANCE,
            stroke,
            composite,
            session: None,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.01);
        self
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Start a component session with area recording enabled.
    pub fn begin(&mut self) {
        self.begin_session(true);
    }

    /// Start a component session whose primitives are drawn but not recorded,
    /// for components whose cached area is still valid.
    pub fn begin_without_recording(&mut self) {
        self.begin_session(false);
    }

    fn begin_session(&mut self, recording: bool) {
        if let Some(stale) = self.session.take() {
            warn!("Recorder session started while another was active, discarding it");
            self.restore(stale);
        }
        let base = self.surface.transform();
        self.session = Some(Session {
            base,
            base_inverse: base.inverse(),
            delta: Transform::identity(),
            recording,
            tracking: true,
            continuity: None,
            overall: Vec::new(),
            positive: Vec::new(),
            negative: Vec::new(),
            last_filled: None,
            forced_composite: None,
            saved: SurfaceState::capture(&*self.surface),
            saved_stroke: self.stroke.clone(),
            saved_composite: self.composite,
        });
    }

    /// Close the session, restore the surface state captured at `begin` and
    /// return what was recorded. Without an active session the area is empty.
    pub fn end(&mut self) -> ComponentArea {
        let Some(mut session) = self.session.take() else {
            debug!("Recorder end() without an active session");
            return ComponentArea::default();
        };
        let overall = Region::union_all(std::mem::take(&mut session.overall));
        let positive = std::mem::take(&mut session.positive);
        let negative = std::mem::take(&mut session.negative);
        let recording = session.recording;
        self.restore(session);

        if recording {
            ComponentArea::new(overall, positive, negative)
        } else {
            ComponentArea::default()
        }
    }

    fn restore(&mut self, session: Session) {
        session.saved.restore(&mut *self.surface);
        self.stroke = session.saved_stroke;
        self.composite = session.saved_composite;
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Suspend folding primitives into the overall area.
    pub fn stop_tracking(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tracking = false;
        }
    }

    /// Resume folding primitives into the overall area.
    pub fn start_tracking(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.tracking = true;
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.tracking)
    }

    /// Append every following primitive to the positive (conducting) or
    /// negative (isolating) continuity list, regardless of general tracking.
    pub fn start_tracking_continuity_area(&mut self, positive: bool) {
        if let Some(session) = self.session.as_mut() {
            session.continuity = Some(if positive {
                Continuity::Positive
            } else {
                Continuity::Negative
            });
        }
    }

    pub fn stop_tracking_continuity_area(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.continuity = None;
        }
    }

    /// Apply `composite` on top of whatever the component requests, until `end`.
    pub fn force_composite(&mut self, composite: Composite) {
        if let Some(session) = self.session.as_mut() {
            session.forced_composite = Some(composite);
            self.surface.set_composite(self.composite.combine(composite));
        }
    }

    fn record_fill(&mut self, path: &Path) {
        let tolerance = self.tolerance;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.recording {
            return;
        }
        let device = session.device();
        session.last_filled = Some(PathSignature::of(path, &device));
        if !session.wants_geometry() {
            return;
        }

        let Some(bounds) = geometry::transformed_bounds(path, &device) else {
            return;
        };
        if is_degenerate(&bounds) {
            trace!("Skipping degenerate fill {:?}", bounds);
            return;
        }
        session.append(Region::from_fill(path, &device, tolerance));
    }

    fn record_stroke(&mut self, path: &Path) {
        let tolerance = self.tolerance;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.recording {
            return;
        }
        let device = session.device();
        let previous_fill = session.last_filled.take();
        if !session.wants_geometry() {
            return;
        }
        if previous_fill.is_some_and(|sig| sig == PathSignature::of(path, &device)) {
            trace!("Outline matches the previous fill, not recorded");
            return;
        }

        let style = self
            .stroke
            .with_width(self.stroke.width.max(MIN_TRACKED_STROKE_WIDTH));
        session.append(Region::from_stroke(path, &style, &device, tolerance));
    }

    fn record_box(&mut self, rect: Box2D) {
        let tolerance = self.tolerance;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.last_filled = None;
        if !session.wants_geometry() {
            return;
        }
        let path = geometry::rect_path(rect.min.x, rect.min.y, rect.width(), rect.height());
        let device = session.device();
        match geometry::transformed_bounds(&path, &device) {
            Some(bounds) if !is_degenerate(&bounds) => {
                session.append(Region::from_fill(&path, &device, tolerance));
            }
            _ => {}
        }
    }
}

fn is_degenerate(bounds: &Box2D) -> bool {
    bounds.width() <= DEGENERATE_EXTENT || bounds.height() <= DEGENERATE_EXTENT
}

impl Drop for GraphicsRecorder<'_> {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            debug!("Recorder dropped with an open session, restoring surface state");
            self.restore(session);
        }
    }
}

impl Surface for GraphicsRecorder<'_> {
    fn width(&self) -> u32 {
        self.surface.width()
    }

    fn height(&self) -> u32 {
        self.surface.height()
    }

    /// The stroke the component asked for, before zoom compensation.
    fn stroke(&self) -> StrokeStyle {
        self.stroke.clone()
    }

    fn set_stroke(&mut self, stroke: StrokeStyle) {
        let effective = self.resources.zoomable_stroke(&stroke, self.zoom);
        self.surface.set_stroke(effective);
        self.stroke = stroke;
    }

    fn color(&self) -> Color {
        self.surface.color()
    }

    fn set_color(&mut self, color: Color) {
        self.surface.set_color(color);
    }

    fn composite(&self) -> Composite {
        self.composite
    }

    fn set_composite(&mut self, composite: Composite) {
        self.composite = composite;
        let forced = self.session.as_ref().and_then(|s| s.forced_composite);
        let effective = match forced {
            Some(f) => composite.combine(f),
            None => composite,
        };
        self.surface.set_composite(effective);
    }

    fn font(&self) -> Font {
        self.surface.font()
    }

    fn set_font(&mut self, font: Font) {
        self.surface.set_font(font);
    }

    fn hints(&self) -> RenderHints {
        self.surface.hints()
    }

    fn set_hints(&mut self, hints: RenderHints) {
        self.surface.set_hints(hints);
    }

    fn transform(&self) -> Transform {
        self.surface.transform()
    }

    /// Rebases the local delta: `delta = transform * inverse(begin transform)`.
    fn set_transform(&mut self, transform: Transform) {
        self.surface.set_transform(transform);
        if let Some(session) = self.session.as_mut() {
            match session.base_inverse {
                Some(inverse) => session.delta = transform.then(&inverse),
                None => {
                    let err = RenderError::NonInvertibleTransform {
                        context: format!("rebasing onto {:?}", session.base),
                    };
                    warn!("{}; keeping the previous local transform", err);
                }
            }
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.surface.translate(dx, dy);
        if let Some(session) = self.session.as_mut() {
            session.delta = session.delta.pre_translate(vector(dx, dy));
        }
    }

    fn rotate(&mut self, radians: f32) {
        self.surface.rotate(radians);
        if let Some(session) = self.session.as_mut() {
            session.delta = session.delta.pre_rotate(Angle::radians(radians));
        }
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.surface.scale(sx, sy);
        if let Some(session) = self.session.as_mut() {
            session.delta = session.delta.pre_scale(sx, sy);
        }
    }

    fn shear(&mut self, shx: f32, shy: f32) {
        self.surface.shear(shx, shy);
        if let Some(session) = self.session.as_mut() {
            session.delta = shear_transform(shx, shy).then(&session.delta);
        }
    }

    fn fill_path(&mut self, path: &Path) {
        self.surface.fill_path(path);
        self.record_fill(path);
    }

    fn stroke_path(&mut self, path: &Path) {
        self.surface.stroke_path(path);
        self.record_stroke(path);
    }

    fn draw_string(&mut self, text: &str, x: f32, y: f32) {
        self.surface.draw_string(text, x, y);
        let bounds = self.surface.text_metrics(text).bounds_at(x, y);
        self.record_box(bounds);
    }

    fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        self.surface.draw_image(image, x, y);
        self.record_box(geometry::rect_box(
            x,
            y,
            image.width() as f32,
            image.height() as f32,
        ));
    }

    fn text_metrics(&self, text: &str) -> TextMetrics {
        self.surface.text_metrics(text)
    }

    fn clear(&mut self, color: Color) {
        self.surface.clear(color);
    }
}
