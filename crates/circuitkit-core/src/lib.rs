//! # CircuitKit Core
//!
//! Core types shared by the CircuitKit crates: error types, physical length
//! units and the event bus.

pub mod error;
pub mod event_bus;
pub mod units;

pub use error::{Error, RenderError, Result, UnitError};

pub use event_bus::{
    event_bus, AppEvent, ErrorEvent, EventBus, EventBusConfig, EventCategory, EventFilter,
    RenderEvent, SettingsEvent, SubscriptionId,
};

pub use units::{LengthUnit, Size, PIXELS_PER_INCH};
