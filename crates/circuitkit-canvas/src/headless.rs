//! A [`Surface`] that keeps graphics state but produces no pixels.
//!
//! Useful for computing component areas without rasterizing, and for
//! observing which primitives reached the real surface.

use lyon::math::Transform;
use lyon::path::Path;

use crate::font_manager;
use crate::surface::{Color, Composite, Font, Image, RenderHints, StrokeStyle, Surface, TextMetrics};

/// One primitive as it reached the surface, with the state it was drawn in.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill {
        transform: Transform,
        color: Color,
        composite: Composite,
    },
    Stroke {
        transform: Transform,
        width: f32,
        composite: Composite,
    },
    Text {
        text: String,
        transform: Transform,
    },
    Image {
        width: u32,
        height: u32,
        transform: Transform,
    },
    Clear(Color),
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    width: u32,
    height: u32,
    stroke: StrokeStyle,
    color: Color,
    composite: Composite,
    font: Font,
    hints: RenderHints,
    transform: Transform,
    calls: Vec<DrawCall>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            stroke: StrokeStyle::default(),
            color: Color::BLACK,
            composite: Composite::OPAQUE,
            font: Font::default(),
            hints: RenderHints::default(),
            transform: Transform::identity(),
            calls: Vec::new(),
        }
    }

    /// Primitives drawn so far, oldest first.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl Surface for HeadlessSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
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

    fn fill_path(&mut self, _path: &Path) {
        self.calls.push(DrawCall::Fill {
            transform: self.transform,
            color: self.color,
            composite: self.composite,
        });
    }

    fn stroke_path(&mut self, _path: &Path) {
        self.calls.push(DrawCall::Stroke {
            transform: self.transform,
            width: self.stroke.width,
            composite: self.composite,
        });
    }

    fn draw_string(&mut self, text: &str, _x: f32, _y: f32) {
        self.calls.push(DrawCall::Text {
            text: text.to_string(),
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, image: &Image, _x: f32, _y: f32) {
        self.calls.push(DrawCall::Image {
            width: image.width(),
            height: image.height(),
            transform: self.transform,
        });
    }

    /// Always the estimated metrics, so results do not depend on installed fonts.
    fn text_metrics(&self, text: &str) -> TextMetrics {
        font_manager::estimated_metrics(text, self.font.size)
    }

    fn clear(&mut self, color: Color) {
        self.calls.push(DrawCall::Clear(color));
    }
}
