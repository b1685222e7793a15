//! Per-renderer cache of derived drawing resources.

use std::collections::HashMap;

use crate::surface::{LineCap, LineJoin, StrokeStyle};

/// Strokes at or below this width are thinned when zoomed in, so hairlines
/// stay hairlines on screen.
pub const ZOOMABLE_STROKE_MAX_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct StrokeKey {
    width: u32,
    zoom: u64,
    cap: LineCap,
    join: LineJoin,
    dash: Option<Vec<u32>>,
}

impl StrokeKey {
    fn new(stroke: &StrokeStyle, zoom: f64) -> Self {
        Self {
            width: stroke.width.to_bits(),
            zoom: zoom.to_bits(),
            cap: stroke.cap,
            join: stroke.join,
            dash: stroke
                .dash
                .as_ref()
                .map(|d| d.iter().map(|v| v.to_bits()).collect()),
        }
    }
}

/// Zoom-compensated strokes, keyed by the requested stroke and zoom level.
#[derive(Debug, Default)]
pub struct ResourceCache {
    strokes: HashMap<StrokeKey, StrokeStyle>,
}

impl ResourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stroke to hand the real surface for `requested` at `zoom`.
    ///
    /// When zoomed in, thin strokes are divided by the zoom so they keep their
    /// on-screen width. Other strokes pass through unchanged.
    pub fn zoomable_stroke(&mut self, requested: &StrokeStyle, zoom: f64) -> StrokeStyle {
        if zoom <= 1.0 || requested.width > ZOOMABLE_STROKE_MAX_WIDTH {
            return requested.clone();
        }
        self.strokes
            .entry(StrokeKey::new(requested, zoom))
            .or_insert_with(|| requested.with_width((requested.width as f64 / zoom) as f32))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
    }
}
