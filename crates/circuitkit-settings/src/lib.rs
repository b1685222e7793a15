//! CircuitKit Settings Crate
//!
//! Handles canvas configuration: rendering preferences, color themes and
//! document defaults, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, DocumentDefaults, GridType, RenderSettings, Rgba, ThemeSettings};
pub use error::{ConfigError, SettingsError, SettingsResult};
