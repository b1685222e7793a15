//! Event type definitions for the event bus.
//!
//! Events are grouped by category and are cloneable and serializable so
//! they can be logged or replayed by a host application.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root event enum for all canvas events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AppEvent {
    /// Renderer state changes
    Render(RenderEvent),
    /// Settings and configuration
    Settings(SettingsEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Render(_) => EventCategory::Render,
            AppEvent::Settings(_) => EventCategory::Settings,
            AppEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Render(e) => e.description(),
            AppEvent::Settings(e) => e.description(),
            AppEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Renderer state events.
    Render,
    /// Settings and configuration events.
    Settings,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Render => write!(f, "Render"),
            EventCategory::Settings => write!(f, "Settings"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Renderer state events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RenderEvent {
    /// The zoom level changed.
    ZoomChanged {
        /// Previous zoom level.
        old: f64,
        /// New zoom level.
        new: f64,
    },
    /// A different color theme was applied.
    ThemeChanged {
        /// Name of the new theme.
        name: String,
    },
    /// The component area cache was emptied.
    CacheCleared {
        /// Number of entries that were dropped.
        entries: usize,
    },
}

impl RenderEvent {
    fn description(&self) -> String {
        match self {
            RenderEvent::ZoomChanged { old, new } => format!("Zoom: {} -> {}", old, new),
            RenderEvent::ThemeChanged { name } => format!("Theme: {}", name),
            RenderEvent::CacheCleared { entries } => {
                format!("Area cache cleared ({} entries)", entries)
            }
        }
    }
}

/// Settings-related events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SettingsEvent {
    /// Settings loaded from a file.
    Loaded {
        /// File the settings were read from.
        path: PathBuf,
    },
    /// Settings saved to a file.
    Saved {
        /// File the settings were written to.
        path: PathBuf,
    },
}

impl SettingsEvent {
    fn description(&self) -> String {
        match self {
            SettingsEvent::Loaded { path } => format!("Settings loaded: {}", path.display()),
            SettingsEvent::Saved { path } => format!("Settings saved: {}", path.display()),
        }
    }
}

/// Error and diagnostic events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// A component failed to draw and was skipped for this pass.
    ComponentDrawFailed {
        /// Identity of the failing component.
        id: u64,
        /// Display name of the failing component.
        name: String,
        /// The error or panic message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::ComponentDrawFailed { id, name, message } => {
                format!("Draw failed [{} #{}]: {}", name, id, message)
            }
        }
    }
}
