//! System font lookup for text rendering and measurement.
//!
//! Fonts are resolved through `fontdb` and parsed with `rusttype`. Nothing is
//! bundled, so lookups can fail; callers then fall back to
//! [`estimated_metrics`].

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::{point, Font, Scale};
use std::{
    collections::HashMap,
    fs,
    sync::{Mutex, OnceLock},
};

use crate::surface::{self, TextMetrics};

#[derive(Clone, Eq, PartialEq, Hash)]
struct FontKey {
    family: String,
    bold: bool,
    italic: bool,
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!("Loaded {} system font faces", db.len());
        db
    })
}

/// Resolve a font request, caching both hits and misses.
pub fn get_font_for(family: &str, bold: bool, italic: bool) -> Option<&'static Font<'static>> {
    static CACHE: OnceLock<Mutex<HashMap<FontKey, Option<&'static Font<'static>>>>> =
        OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    let key = FontKey {
        family: family.to_string(),
        bold,
        italic,
    };

    if let Some(found) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(&key) {
        return *found;
    }

    let loaded = load_font_from_system(family, bold, italic)
        .map(|font| &*Box::leak(Box::new(font)));
    if loaded.is_none() {
        tracing::debug!("No system font for '{}', using estimated metrics", family);
    }

    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(key, loaded);
    loaded
}

fn load_font_from_system(family: &str, bold: bool, italic: bool) -> Option<Font<'static>> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" | "SansSerif" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" | "Monospaced" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: if bold { Weight::BOLD } else { Weight::NORMAL },
        stretch: Stretch::Normal,
        style: if italic { Style::Italic } else { Style::Normal },
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) | fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    }
}

/// Metrics used when no font file is available: a fixed-pitch approximation.
pub fn estimated_metrics(text: &str, size: f32) -> TextMetrics {
    TextMetrics {
        width: 0.6 * size * text.chars().count() as f32,
        ascent: 0.8 * size,
        descent: 0.2 * size,
    }
}

/// Measure `text` laid out in `font`.
pub fn measure(font: &surface::Font, text: &str) -> TextMetrics {
    let Some(face) = get_font_for(&font.family, font.bold, font.italic) else {
        return estimated_metrics(text, font.size);
    };
    measure_with(face, font.size, text)
}

pub(crate) fn measure_with(face: &Font<'_>, size: f32, text: &str) -> TextMetrics {
    let scale = Scale::uniform(size);
    let v_metrics = face.v_metrics(scale);
    let width = face
        .layout(text, scale, point(0.0, 0.0))
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0);
    TextMetrics {
        width,
        ascent: v_metrics.ascent,
        descent: -v_metrics.descent,
    }
}
