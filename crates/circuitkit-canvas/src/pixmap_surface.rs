//! Raster [`Surface`] backed by a `tiny-skia` pixmap.

use image::RgbImage;
use lyon::math::Transform;
use lyon::path::{Event, Path};
use rusttype::{point as rt_point, Scale};
use tiny_skia::{
    BlendMode, FillRule, FilterQuality, Paint, PathBuilder, Pixmap, PixmapPaint, Stroke,
    StrokeDash,
};

use circuitkit_core::RenderError;

use crate::font_manager;
use crate::surface::{
    Color, Composite, Font, Image, LineCap, LineJoin, RenderHints, RenderQuality, StrokeStyle,
    Surface, TextMetrics,
};

/// Software-rendered drawing target.
pub struct PixmapSurface {
    pixmap: Pixmap,
    stroke: StrokeStyle,
    color: Color,
    composite: Composite,
    font: Font,
    hints: RenderHints,
    transform: Transform,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self, RenderError> {
        let pixmap =
            Pixmap::new(width, height).ok_or(RenderError::SurfaceAllocation { width, height })?;
        Ok(Self {
            pixmap,
            stroke: StrokeStyle::default(),
            color: Color::BLACK,
            composite: Composite::OPAQUE,
            font: Font::default(),
            hints: RenderHints::default(),
            transform: Transform::identity(),
        })
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Un-premultiplied color of a pixel, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::rgba(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Flatten onto an opaque RGB image, compositing over white.
    pub fn to_rgb_image(&self) -> RgbImage {
        let mut out = RgbImage::new(self.pixmap.width(), self.pixmap.height());
        for (dst, src) in out.pixels_mut().zip(self.pixmap.pixels()) {
            // premultiplied: color + white * (1 - alpha)
            let inv = 255 - src.alpha() as u16;
            dst.0 = [
                (src.red() as u16 + inv).min(255) as u8,
                (src.green() as u16 + inv).min(255) as u8,
                (src.blue() as u16 + inv).min(255) as u8,
            ];
        }
        out
    }

    pub fn into_image(self) -> Image {
        Image::from_pixmap(self.pixmap)
    }

    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        let alpha = (self.color.a as f32 * self.composite.alpha).round() as u8;
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, alpha);
        paint.anti_alias = self.hints.antialias;
        paint
    }

    fn device_transform(&self) -> tiny_skia::Transform {
        to_skia_transform(&self.transform)
    }

    fn skia_stroke(&self) -> Stroke {
        let mut stroke = Stroke {
            width: self.stroke.width.max(0.0),
            ..Stroke::default()
        };
        stroke.line_cap = match self.stroke.cap {
            LineCap::Butt => tiny_skia::LineCap::Butt,
            LineCap::Round => tiny_skia::LineCap::Round,
            LineCap::Square => tiny_skia::LineCap::Square,
        };
        stroke.line_join = match self.stroke.join {
            LineJoin::Miter => tiny_skia::LineJoin::Miter,
            LineJoin::Round => tiny_skia::LineJoin::Round,
            LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
        };
        stroke.dash = self
            .stroke
            .dash
            .as_ref()
            .and_then(|d| StrokeDash::new(d.clone(), 0.0));
        stroke
    }

    /// Upright glyph coverage for `text` at `size` device pixels, colored
    /// with the current color. Returns the pixmap and the offset of its
    /// top-left corner from the baseline origin.
    fn rasterize_text(
        &self,
        face: &rusttype::Font<'_>,
        text: &str,
        size: f32,
    ) -> Option<(Pixmap, f32, f32)> {
        let glyphs: Vec<_> = face
            .layout(text, Scale::uniform(size), rt_point(0.0, 0.0))
            .collect();
        let boxes: Vec<_> = glyphs.iter().filter_map(|g| g.pixel_bounding_box()).collect();
        let min_x = boxes.iter().map(|b| b.min.x).min()?;
        let min_y = boxes.iter().map(|b| b.min.y).min()?;
        let max_x = boxes.iter().map(|b| b.max.x).max()?;
        let max_y = boxes.iter().map(|b| b.max.y).max()?;
        let (w, h) = ((max_x - min_x) as u32, (max_y - min_y) as u32);

        let mut coverage = vec![0.0f32; (w * h) as usize];
        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                let px = (gx as i32 + bb.min.x - min_x) as u32;
                let py = (gy as i32 + bb.min.y - min_y) as u32;
                if px < w && py < h {
                    let cell = &mut coverage[(py * w + px) as usize];
                    *cell = cell.max(v.clamp(0.0, 1.0));
                }
            });
        }

        let mut pixmap = Pixmap::new(w, h)?;
        let base = self.color.a as f32 / 255.0;
        for (px, v) in pixmap.data_mut().chunks_exact_mut(4).zip(coverage) {
            let a = base * v;
            px[0] = (self.color.r as f32 * a).round() as u8;
            px[1] = (self.color.g as f32 * a).round() as u8;
            px[2] = (self.color.b as f32 * a).round() as u8;
            px[3] = (255.0 * a).round() as u8;
        }
        Some((pixmap, min_x as f32, min_y as f32))
    }
}

/// Same affine map in tiny-skia's row layout.
pub fn to_skia_transform(t: &Transform) -> tiny_skia::Transform {
    tiny_skia::Transform::from_row(t.m11, t.m12, t.m21, t.m22, t.m31, t.m32)
}

/// Convert a lyon path into a tiny-skia path, `None` when nothing is drawable.
pub fn to_skia_path(path: &Path) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();
    for event in path.iter() {
        match event {
            Event::Begin { at } => pb.move_to(at.x, at.y),
            Event::Line { to, .. } => pb.line_to(to.x, to.y),
            Event::Quadratic { ctrl, to, .. } => pb.quad_to(ctrl.x, ctrl.y, to.x, to.y),
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => pb.cubic_to(ctrl1.x, ctrl1.y, ctrl2.x, ctrl2.y, to.x, to.y),
            Event::End { close, .. } => {
                if close {
                    pb.close();
                }
            }
        }
    }
    pb.finish()
}

impl Surface for PixmapSurface {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn stroke(&self) -> StrokeStyle {
        self.stroke.clone()
    }

    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.stroke = stroke;
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn composite(&self) -> Composite {
        self.composite
    }

    fn set_composite(&mut self, composite: Composite) {
        self.composite = composite;
    }

    fn font(&self) -> Font {
        self.font.clone()
    }

    fn set_font(&mut self, font: Font) {
        self.font = font;
    }

    fn hints(&self) -> RenderHints {
        self.hints
    }

    fn set_hints(&mut self, hints: RenderHints) {
        self.hints = hints;
    }

    fn transform(&self) -> Transform {
        self.transform
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn fill_path(&mut self, path: &Path) {
        if let Some(p) = to_skia_path(path) {
            let paint = self.paint();
            let ts = self.device_transform();
            self.pixmap.fill_path(&p, &paint, FillRule::EvenOdd, ts, None);
        }
    }

    fn stroke_path(&mut self, path: &Path) {
        if let Some(p) = to_skia_path(path) {
            let paint = self.paint();
            let stroke = self.skia_stroke();
            let ts = self.device_transform();
            self.pixmap.stroke_path(&p, &paint, &stroke, ts, None);
        }
    }

    /// Glyphs are rasterized upright at device resolution, then mapped
    /// through the current transform like an image, so rotated text is drawn
    /// rotated.
    fn draw_string(&mut self, text: &str, x: f32, y: f32) {
        let Some(face) =
            font_manager::get_font_for(&self.font.family, self.font.bold, self.font.italic)
        else {
            return;
        };
        let t = &self.transform;
        let scale = (t.m11 * t.m22 - t.m12 * t.m21).abs().sqrt();
        let size = self.font.size * scale;
        if size <= 0.0 {
            return;
        }
        let Some((glyphs, dx, dy)) = self.rasterize_text(face, text, size) else {
            return;
        };

        let paint = PixmapPaint {
            opacity: self.composite.alpha,
            blend_mode: BlendMode::SourceOver,
            quality: FilterQuality::Bilinear,
        };
        let ts = self
            .device_transform()
            .pre_translate(x, y)
            .pre_scale(1.0 / scale, 1.0 / scale)
            .pre_translate(dx, dy);
        self.pixmap
            .draw_pixmap(0, 0, glyphs.as_ref(), &paint, ts, None);
    }

    fn draw_image(&mut self, image: &Image, x: f32, y: f32) {
        let quality = match self.hints.quality {
            RenderQuality::Quality => FilterQuality::Bilinear,
            RenderQuality::Speed => FilterQuality::Nearest,
        };
        let paint = PixmapPaint {
            opacity: self.composite.alpha,
            blend_mode: BlendMode::SourceOver,
            quality,
        };
        let ts = self.device_transform().pre_translate(x, y);
        self.pixmap
            .draw_pixmap(0, 0, image.pixmap().as_ref(), &paint, ts, None);
    }

    fn text_metrics(&self, text: &str) -> TextMetrics {
        font_manager::measure(&self.font, text)
    }

    fn clear(&mut self, color: Color) {
        self.pixmap
            .fill(tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a));
    }
}
