//! # CircuitKit
//!
//! Schematic and PCB layout canvas. The drawing engine renders self-drawing
//! components while recording, for each one, the pixel region it occupies and
//! the parts of it that conduct.
//!
//! ## Architecture
//!
//! CircuitKit is organized as a workspace with multiple crates:
//!
//! 1. **circuitkit-core** - Errors, length units, event bus
//! 2. **circuitkit-settings** - Render settings, themes, document defaults
//! 3. **circuitkit-canvas** - Surfaces, area recorder, scene renderer
//! 4. **circuitkit** - Demo binary that renders a board to PNG

pub mod demo;

pub use circuitkit_canvas as canvas;
pub use circuitkit_settings as settings;

pub use circuitkit_core::{
    event_bus, AppEvent, Error, ErrorEvent, EventBus, EventFilter, RenderError, RenderEvent,
    Result,
};

/// Build timestamp recorded by the build script.
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize the tracing subscriber
///
/// Sets up logging with:
/// - RUST_LOG environment variable support
/// - INFO as the default level
/// - target, level and line numbers on every record
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
