//! # Event Bus Module
//!
//! Publish/subscribe plumbing between the renderer, the settings layer and
//! whatever host embeds them:
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category
//! - Synchronous handlers plus a broadcast channel for async receivers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use circuitkit_core::event_bus::{event_bus, AppEvent, EventCategory, EventFilter, RenderEvent};
//!
//! let subscription = event_bus().subscribe(
//!     EventFilter::Categories(vec![EventCategory::Render]),
//!     |event| tracing::info!("{}", event.description()),
//! );
//!
//! event_bus().notify(AppEvent::Render(RenderEvent::ZoomChanged { old: 1.0, new: 2.0 }));
//! event_bus().unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
