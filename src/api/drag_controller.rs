use tracing::{debug, trace};

use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::interaction::{hit_test_markers, resolve_drag_candidate};
use crate::render::{MarkerKind, Renderer};

use super::TimelineWidget;

impl<R: Renderer> TimelineWidget<R> {
    /// Starts a date drag when the press lands on the selected-date marker.
    ///
    /// The current-date marker is never draggable; pressing closer to it
    /// than to the selected marker does nothing.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> TimelineResult<bool> {
        let mut markers = Vec::with_capacity(2);
        for kind in [MarkerKind::Selected, MarkerKind::Now] {
            if let Some(marker) = self.marker_primitive(kind)? {
                markers.push(marker);
            }
        }
        match hit_test_markers(&markers, x, y, self.options.drag_hit_tolerance_px) {
            Some(MarkerKind::Selected) => Ok(self.drag_start()),
            _ => Ok(false),
        }
    }

    /// Starts a date drag unconditionally. Returns `false` if one is active.
    pub fn drag_start(&mut self) -> bool {
        if !self.interaction.begin_drag() {
            return false;
        }
        self.dragged_date = self.selected_date;
        trace!(date = %self.dragged_date, "date drag started");
        self.emit_plugin_event(TimelineEvent::DragStarted);
        true
    }

    /// Moves the dragged date by `delta_px`.
    ///
    /// Deltas that would carry the marker outside `[0, width]` are dropped
    /// whole. Only the marker is repositioned; the scene is not re-diffed.
    /// Returns whether the delta was applied.
    pub fn drag_move(&mut self, delta_px: f64) -> TimelineResult<bool> {
        if !self.interaction.is_dragging() {
            return Ok(false);
        }
        let width = self.geometry.width;
        let current_x = self.time_scale.date_to_pixel(self.dragged_date, width)?;
        let Some(candidate_x) = resolve_drag_candidate(current_x, delta_px, width) else {
            trace!(current_x, delta_px, width, "drag delta rejected at plot edge");
            return Ok(false);
        };

        self.dragged_date = self.time_scale.pixel_to_visible_date(candidate_x, width)?;
        self.interaction.record_drag_move();
        if let Some(marker) = self.marker_primitive(MarkerKind::Selected)? {
            self.renderer.move_marker(&marker)?;
        }
        trace!(x = candidate_x, date = %self.dragged_date, "date drag moved");
        Ok(true)
    }

    /// Commits the dragged date and notifies the map and date picker.
    /// Returns `false` when no drag was active.
    pub fn drag_end(&mut self) -> bool {
        if !self.interaction.end_drag() {
            return false;
        }
        self.selected_date = self.dragged_date;
        debug!(
            date = %self.selected_date,
            moves = self.interaction.drag_moves(),
            "selected date committed"
        );
        self.collaborators.notify_committed(self.selected_date);
        self.emit_date_committed();
        self.emit_plugin_event(TimelineEvent::DragEnded);
        true
    }
}
