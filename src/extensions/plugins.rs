use serde::{Deserialize, Serialize};

use crate::interaction::{DragGestureMode, ZoomGestureMode};

/// Read-only state snapshot passed to plugin hooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PluginContext {
    pub plot_width: f64,
    pub plot_height: f64,
    /// Visible domain in epoch milliseconds.
    pub visible_range: (f64, f64),
    pub timebars_len: usize,
    /// Committed selected date in epoch milliseconds.
    pub selected_time: f64,
    pub visible: bool,
    pub zoom_mode: ZoomGestureMode,
    pub drag_mode: DragGestureMode,
}

/// Event stream exposed to plugins.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimelineEvent {
    /// A drag ended (or `set_date` ran) and the selection changed.
    DateCommitted { time: f64 },
    TimeBarsChanged { timebars_len: usize },
    VisibleRangeChanged { start: f64, end: f64 },
    ZoomStarted,
    ZoomEnded,
    DragStarted,
    DragEnded,
    Shown,
    Hidden,
    Rendered,
}

/// Extension hook interface for observers of a timeline widget.
///
/// Plugins see events and a context snapshot; they cannot mutate the widget.
pub trait TimelinePlugin {
    fn id(&self) -> &str;
    fn on_event(&mut self, event: TimelineEvent, context: PluginContext);
}
