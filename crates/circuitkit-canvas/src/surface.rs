//! The drawing surface contract.
//!
//! [`Surface`] is the primitive API components draw against. Implementations
//! supply the state accessors and five primitives (fill, stroke, text, image,
//! clear); every shape helper and transform helper is provided on top of them.

use lyon::math::{vector, Angle, Box2D, Point, Transform};
use lyon::path::Path;

use crate::geometry::{self, ArcKind};

/// 8-bit RGBA color, not premultiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// A darker shade, used for outlines drawn around fills.
    pub fn darker(self) -> Self {
        let f = |c: u8| (c as u16 * 7 / 10) as u8;
        Self::rgba(f(self.r), f(self.g), f(self.b), self.a)
    }
}

impl From<[u8; 4]> for Color {
    fn from(c: [u8; 4]) -> Self {
        Self::rgba(c[0], c[1], c[2], c[3])
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Stroke parameters in the local coordinate frame.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    /// Alternating dash and gap lengths, `None` for a solid line.
    pub dash: Option<Vec<f32>>,
}

impl StrokeStyle {
    pub fn new(width: f32) -> Self {
        Self {
            width,
            cap: LineCap::Butt,
            join: LineJoin::Miter,
            dash: None,
        }
    }

    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }

    pub fn with_dash(mut self, dash: Vec<f32>) -> Self {
        self.dash = Some(dash);
        self
    }

    /// Same stroke with a different width.
    pub fn with_width(&self, width: f32) -> Self {
        Self {
            width,
            ..self.clone()
        }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Constant-alpha source-over compositing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Composite {
    pub alpha: f32,
}

impl Composite {
    pub const OPAQUE: Composite = Composite { alpha: 1.0 };

    pub fn alpha(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
        }
    }

    /// Both composites applied one over the other.
    pub fn combine(self, other: Composite) -> Composite {
        Composite::alpha(self.alpha * other.alpha)
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::OPAQUE
    }
}

/// Font request. Size is in local units.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Font {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            bold: false,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::new("Sans", 12.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderQuality {
    Speed,
    #[default]
    Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderHints {
    pub antialias: bool,
    pub quality: RenderQuality,
}

impl Default for RenderHints {
    fn default() -> Self {
        Self {
            antialias: true,
            quality: RenderQuality::Quality,
        }
    }
}

/// Horizontal advance and vertical extent of a laid-out string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl TextMetrics {
    /// Box of a string drawn with its baseline starting at `(x, y)`.
    pub fn bounds_at(&self, x: f32, y: f32) -> Box2D {
        geometry::rect_box(x, y - self.ascent, self.width, self.ascent + self.descent)
    }
}

/// A raster image that can be drawn onto a surface.
#[derive(Clone)]
pub struct Image {
    pixmap: tiny_skia::Pixmap,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Image({}x{})", self.width(), self.height())
    }
}

impl Image {
    /// Transparent image, `None` for a zero dimension.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        tiny_skia::Pixmap::new(width, height).map(|pixmap| Self { pixmap })
    }

    /// Image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Option<Self> {
        let mut image = Self::new(width, height)?;
        image
            .pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
        Some(image)
    }

    pub fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        Self { pixmap }
    }

    pub fn pixmap(&self) -> &tiny_skia::Pixmap {
        &self.pixmap
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }
}

/// A 2D drawing target with a mutable graphics state.
///
/// Coordinates passed to primitives are in the local frame described by
/// [`transform`](Surface::transform). Transform helpers concatenate onto the
/// current transform, so the most recent call applies to shapes first.
pub trait Surface {
    /// Width of the target in device pixels.
    fn width(&self) -> u32;
    /// Height of the target in device pixels.
    fn height(&self) -> u32;

    fn stroke(&self) -> StrokeStyle;
    fn set_stroke(&mut self, stroke: StrokeStyle);
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
    fn composite(&self) -> Composite;
    fn set_composite(&mut self, composite: Composite);
    fn font(&self) -> Font;
    fn set_font(&mut self, font: Font);
    fn hints(&self) -> RenderHints;
    fn set_hints(&mut self, hints: RenderHints);
    fn transform(&self) -> Transform;
    fn set_transform(&mut self, transform: Transform);

    /// Fill the interior of `path` with the current color (even-odd rule).
    fn fill_path(&mut self, path: &Path);
    /// Stroke `path` with the current stroke and color.
    fn stroke_path(&mut self, path: &Path);
    /// Draw `text` with its baseline starting at `(x, y)`.
    fn draw_string(&mut self, text: &str, x: f32, y: f32);
    /// Draw `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: &Image, x: f32, y: f32);
    /// Metrics of `text` in the current font, in local units.
    fn text_metrics(&self, text: &str) -> TextMetrics;
    /// Replace every pixel with `color`, ignoring transform and composite.
    fn clear(&mut self, color: Color);

    fn translate(&mut self, dx: f32, dy: f32) {
        let t = self.transform().pre_translate(vector(dx, dy));
        self.set_transform(t);
    }

    fn rotate(&mut self, radians: f32) {
        let t = self.transform().pre_rotate(Angle::radians(radians));
        self.set_transform(t);
    }

    /// Rotate around `(cx, cy)` in the local frame.
    fn rotate_about(&mut self, radians: f32, cx: f32, cy: f32) {
        self.translate(cx, cy);
        self.rotate(radians);
        self.translate(-cx, -cy);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        let t = self.transform().pre_scale(sx, sy);
        self.set_transform(t);
    }

    fn shear(&mut self, shx: f32, shy: f32) {
        let t = shear_transform(shx, shy).then(&self.transform());
        self.set_transform(t);
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.stroke_path(&geometry::line_path(x1, y1, x2, y2));
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.stroke_path(&geometry::rect_path(x, y, w, h));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.fill_path(&geometry::rect_path(x, y, w, h));
    }

    fn draw_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, arc: f32) {
        self.stroke_path(&geometry::round_rect_path(x, y, w, h, arc));
    }

    fn fill_round_rect(&mut self, x: f32, y: f32, w: f32, h: f32, arc: f32) {
        self.fill_path(&geometry::round_rect_path(x, y, w, h, arc));
    }

    fn draw_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.stroke_path(&geometry::oval_path(x, y, w, h));
    }

    fn fill_oval(&mut self, x: f32, y: f32, w: f32, h: f32) {
        self.fill_path(&geometry::oval_path(x, y, w, h));
    }

    fn draw_arc(&mut self, x: f32, y: f32, w: f32, h: f32, start_deg: f32, extent_deg: f32) {
        self.stroke_path(&geometry::arc_path(
            x,
            y,
            w,
            h,
            start_deg,
            extent_deg,
            ArcKind::Open,
        ));
    }

    fn fill_arc(&mut self, x: f32, y: f32, w: f32, h: f32, start_deg: f32, extent_deg: f32) {
        self.fill_path(&geometry::arc_path(
            x,
            y,
            w,
            h,
            start_deg,
            extent_deg,
            ArcKind::Pie,
        ));
    }

    fn draw_polygon(&mut self, points: &[Point]) {
        self.stroke_path(&geometry::poly_path(points, true));
    }

    fn fill_polygon(&mut self, points: &[Point]) {
        self.fill_path(&geometry::poly_path(points, true));
    }

    fn draw_polyline(&mut self, points: &[Point]) {
        self.stroke_path(&geometry::poly_path(points, false));
    }
}

/// `x' = x + shx * y`, `y' = shy * x + y`.
pub fn shear_transform(shx: f32, shy: f32) -> Transform {
    Transform::new(1.0, shy, shx, 1.0, 0.0, 0.0)
}

/// The graphics state a component may disturb while drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceState {
    pub stroke: StrokeStyle,
    pub color: Color,
    pub transform: Transform,
    pub composite: Composite,
    pub font: Font,
}

impl SurfaceState {
    pub fn capture<S: Surface + ?Sized>(surface: &S) -> Self {
        Self {
            stroke: surface.stroke(),
            color: surface.color(),
            transform: surface.transform(),
            composite: surface.composite(),
            font: surface.font(),
        }
    }

    pub fn restore<S: Surface + ?Sized>(&self, surface: &mut S) {
        surface.set_stroke(self.stroke.clone());
        surface.set_color(self.color);
        surface.set_transform(self.transform);
        surface.set_composite(self.composite);
        surface.set_font(self.font.clone());
    }
}
