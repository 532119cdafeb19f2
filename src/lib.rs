//! timebar-rs: headless interactive timeline widget engine.
//!
//! Time bars (named date ranges with event timestamps) are laid out in lanes
//! on a zoomable time axis with a draggable selected-date marker. The crate
//! owns scales, tick selection, keyed scene reconciliation and gesture state;
//! drawing happens through an injected `Renderer`.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{TimelineCollaborators, TimelineOptions, TimelineWidget};
pub use error::{TimelineError, TimelineResult};
