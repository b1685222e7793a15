//! Configuration and settings management for CircuitKit
//!
//! Supports JSON and TOML files stored in the platform configuration
//! directory. Configuration is organized into sections:
//! - Render settings (quality, grid, zoom, translucency of locked parts)
//! - Theme colors
//! - Defaults for new documents

use circuitkit_core::event_bus::{AppEvent, EventBus, SettingsEvent};
use circuitkit_core::units::Size;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, SettingsError, SettingsResult};

/// Grid style drawn behind the document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GridType {
    /// No grid
    None,
    /// Full horizontal and vertical lines
    #[default]
    Lines,
    /// A dot at every intersection
    Dots,
    /// A small cross at every intersection
    Crosshair,
}

impl std::fmt::Display for GridType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridType::None => write!(f, "None"),
            GridType::Lines => write!(f, "Lines"),
            GridType::Dots => write!(f, "Dots"),
            GridType::Crosshair => write!(f, "Crosshair"),
        }
    }
}

/// Rendering preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Antialias shapes and text
    pub antialiasing: bool,
    /// Prefer quality over speed when resampling images
    pub high_quality: bool,
    /// Apply the zoom level (off renders at 1:1)
    pub zoom_enabled: bool,
    /// Draw selected components in their selected state
    pub selection_highlighting: bool,
    /// Grid style
    pub grid_type: GridType,
    /// Draw component control points
    pub show_control_points: bool,
    /// Ask components to draw outlines only
    pub outline_mode: bool,
    /// Opacity applied to locked components (0.0 - 1.0)
    pub locked_alpha: f32,
    /// Opacity applied to component previews (0.0 - 1.0)
    pub preview_alpha: f32,
    /// Zoom level of a freshly created renderer
    pub default_zoom: f64,
    /// Smallest accepted zoom level
    pub min_zoom: f64,
    /// Largest accepted zoom level
    pub max_zoom: f64,
    /// Maximum distance in pixels between a curve and its flattened outline
    pub curve_tolerance: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            antialiasing: true,
            high_quality: true,
            zoom_enabled: true,
            selection_highlighting: true,
            grid_type: GridType::Lines,
            show_control_points: true,
            outline_mode: false,
            locked_alpha: 0.35,
            preview_alpha: 0.5,
            default_zoom: 1.0,
            min_zoom: 0.1,
            max_zoom: 4.0,
            curve_tolerance: 0.25,
        }
    }
}

/// RGBA color as stored in configuration files
pub type Rgba = [u8; 4];

/// Canvas color theme
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    /// Theme name shown to the user
    pub name: String,
    /// Canvas background
    pub background: Rgba,
    /// Minor grid lines
    pub grid: Rgba,
    /// Every tenth grid line
    pub major_grid: Rgba,
    /// Control points of unselected components
    pub control_point: Rgba,
    /// Control points of selected components
    pub selected_control_point: Rgba,
    /// Control points under the cursor
    pub hovered_control_point: Rgba,
    /// Rubber-band selection rectangle
    pub selection_rect: Rgba,
}

impl ThemeSettings {
    /// The default light theme
    pub fn light() -> Self {
        Self {
            name: "Light".to_string(),
            background: [255, 255, 255, 255],
            grid: [232, 232, 232, 255],
            major_grid: [208, 208, 208, 255],
            control_point: [0, 0, 255, 255],
            selected_control_point: [0, 192, 0, 255],
            hovered_control_point: [255, 128, 0, 255],
            selection_rect: [0, 0, 0, 255],
        }
    }

    /// A dark theme for low-light work
    pub fn dark() -> Self {
        Self {
            name: "Dark".to_string(),
            background: [34, 36, 40, 255],
            grid: [52, 55, 61, 255],
            major_grid: [74, 78, 86, 255],
            control_point: [96, 160, 255, 255],
            selected_control_point: [96, 224, 96, 255],
            hovered_control_point: [255, 170, 64, 255],
            selection_rect: [230, 230, 230, 255],
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::light()
    }
}

/// Page defaults for new documents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentDefaults {
    /// Page width
    pub width: Size,
    /// Page height
    pub height: Size,
    /// Grid spacing
    pub grid_spacing: Size,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self {
            width: Size::new(29.0, circuitkit_core::units::LengthUnit::Cm),
            height: Size::new(21.0, circuitkit_core::units::LengthUnit::Cm),
            grid_spacing: Size::inches(0.1),
        }
    }
}

/// Complete canvas configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Rendering preferences
    #[serde(default)]
    pub render: RenderSettings,
    /// Color theme
    #[serde(default)]
    pub theme: ThemeSettings,
    /// New document defaults
    #[serde(default)]
    pub document: DocumentDefaults,
}

#[derive(Clone, Copy)]
enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform location of the config file, e.g. `~/.config/circuitkit/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("circuitkit").join("config.toml"))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("No configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = format_of(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!(
                "No configuration at {}, using defaults",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| {
                    SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
                })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Load and announce a `SettingsEvent::Loaded` on the bus
    pub fn load_and_notify(path: &Path, bus: &EventBus) -> SettingsResult<Self> {
        let config = Self::load_from_file(path)?;
        bus.notify(AppEvent::Settings(SettingsEvent::Loaded {
            path: path.to_path_buf(),
        }));
        Ok(config)
    }

    /// Save and announce a `SettingsEvent::Saved` on the bus
    pub fn save_and_notify(&self, path: &Path, bus: &EventBus) -> SettingsResult<()> {
        self.save_to_file(path)?;
        bus.notify(AppEvent::Settings(SettingsEvent::Saved {
            path: path.to_path_buf(),
        }));
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;

        if !(r.min_zoom > 0.0) {
            return Err(ConfigError::out_of_range("render.min_zoom", r.min_zoom));
        }
        if r.max_zoom < r.min_zoom {
            return Err(ConfigError::out_of_range("render.max_zoom", r.max_zoom));
        }
        if r.default_zoom < r.min_zoom || r.default_zoom > r.max_zoom {
            return Err(ConfigError::out_of_range(
                "render.default_zoom",
                r.default_zoom,
            ));
        }
        if !(0.0..=1.0).contains(&r.locked_alpha) {
            return Err(ConfigError::out_of_range("render.locked_alpha", r.locked_alpha));
        }
        if !(0.0..=1.0).contains(&r.preview_alpha) {
            return Err(ConfigError::out_of_range(
                "render.preview_alpha",
                r.preview_alpha,
            ));
        }
        if !(r.curve_tolerance > 0.0) {
            return Err(ConfigError::out_of_range(
                "render.curve_tolerance",
                r.curve_tolerance,
            ));
        }

        let d = &self.document;
        for (key, size) in [
            ("document.width", d.width),
            ("document.height", d.height),
            ("document.grid_spacing", d.grid_spacing),
        ] {
            if !(size.value > 0.0) {
                return Err(ConfigError::out_of_range(key, size));
            }
        }

        Ok(())
    }
}
