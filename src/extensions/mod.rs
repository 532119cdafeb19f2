//! Observer hooks for host applications.
//!
//! Plugins only observe; they never feed back into scale or scene state.

pub mod plugins;

pub use plugins::{PluginContext, TimelineEvent, TimelinePlugin};
