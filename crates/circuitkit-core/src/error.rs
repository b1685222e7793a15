//! Error handling for CircuitKit
//!
//! Provides error types for all layers of the canvas engine:
//! - Render errors (component draw failures, surface and transform issues)
//! - Unit errors (length parsing)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Render error type
///
/// Represents failures raised while repainting a scene. Most of these are
/// recovered locally by the renderer and only surface through logs and events.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// A component's draw routine returned an error or panicked
    #[error("Component '{name}' (#{id}) failed to draw: {reason}")]
    ComponentDrawFailed {
        /// Identity of the failing component.
        id: u64,
        /// Display name of the failing component.
        name: String,
        /// The error or panic message.
        reason: String,
    },

    /// A transform could not be inverted
    #[error("Transform is not invertible: {context}")]
    NonInvertibleTransform {
        /// Where the inversion was attempted.
        context: String,
    },

    /// The drawing surface could not be allocated
    #[error("Failed to allocate a {width}x{height} surface")]
    SurfaceAllocation {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// Requested zoom level is outside the allowed range
    #[error("Zoom level {zoom} outside allowed range [{min}, {max}]")]
    InvalidZoom {
        /// The rejected zoom level.
        zoom: f64,
        /// Minimum allowed zoom.
        min: f64,
        /// Maximum allowed zoom.
        max: f64,
    },
}

/// Unit error type
///
/// Raised when a length string cannot be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// The input was empty
    #[error("Empty length value")]
    Empty,

    /// The numeric part could not be parsed
    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    /// The unit suffix is unknown
    #[error("Unknown length unit: {0}")]
    UnknownUnit(String),
}

/// Main error type for CircuitKit
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Render error
    #[error(transparent)]
    Render(#[from] RenderError),

    /// Unit error
    #[error(transparent)]
    Unit(#[from] UnitError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is a render error
    pub fn is_render_error(&self) -> bool {
        matches!(self, Error::Render(_))
    }

    /// Check if this is a component draw failure
    pub fn is_draw_failure(&self) -> bool {
        matches!(self, Error::Render(RenderError::ComponentDrawFailed { .. }))
    }

    /// Check if this is a unit error
    pub fn is_unit_error(&self) -> bool {
        matches!(self, Error::Unit(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
