use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::render::{MarkerKind, MarkerPrimitive};

/// Horizontal distance within which a pointer press grabs a marker.
pub const DEFAULT_DRAG_HIT_TOLERANCE_PX: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomGestureMode {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragGestureMode {
    #[default]
    Idle,
    Dragging,
}

/// Zoom/pan and date-drag gesture state.
///
/// The two machines are independent: a zoom can run while a date is being
/// dragged, matching hosts that route wheel and pointer input separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InteractionState {
    zoom: ZoomGestureMode,
    drag: DragGestureMode,
    zoom_ticks: u64,
    drag_moves: u64,
}

impl InteractionState {
    #[must_use]
    pub fn zoom_mode(self) -> ZoomGestureMode {
        self.zoom
    }

    #[must_use]
    pub fn drag_mode(self) -> DragGestureMode {
        self.drag
    }

    #[must_use]
    pub fn is_dragging(self) -> bool {
        self.drag == DragGestureMode::Dragging
    }

    /// Returns `false` when a zoom gesture was already active.
    pub fn begin_zoom(&mut self) -> bool {
        if self.zoom == ZoomGestureMode::Active {
            return false;
        }
        self.zoom = ZoomGestureMode::Active;
        self.zoom_ticks = 0;
        true
    }

    pub fn record_zoom_tick(&mut self) {
        self.zoom_ticks += 1;
    }

    /// Ticks applied by the current (or last) zoom gesture.
    #[must_use]
    pub fn zoom_ticks(self) -> u64 {
        self.zoom_ticks
    }

    /// Returns `false` when no zoom gesture was active.
    pub fn end_zoom(&mut self) -> bool {
        let was_active = self.zoom == ZoomGestureMode::Active;
        self.zoom = ZoomGestureMode::Idle;
        was_active
    }

    /// Returns `false` when a drag was already in progress.
    pub fn begin_drag(&mut self) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.drag = DragGestureMode::Dragging;
        self.drag_moves = 0;
        true
    }

    pub fn record_drag_move(&mut self) {
        self.drag_moves += 1;
    }

    #[must_use]
    pub fn drag_moves(self) -> u64 {
        self.drag_moves
    }

    /// Returns `false` when no drag was in progress.
    pub fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragGestureMode::Idle;
        was_dragging
    }
}

/// Applies a horizontal drag delta to the marker position.
///
/// Returns `None` when the candidate leaves `[0, width]`; the caller then
/// ignores the delta entirely instead of clamping.
#[must_use]
pub fn resolve_drag_candidate(current_x: f64, delta_px: f64, width: f64) -> Option<f64> {
    let candidate = current_x + delta_px;
    if !candidate.is_finite() || candidate < 0.0 || candidate > width {
        return None;
    }
    Some(candidate)
}

/// Nearest marker under the pointer, if any lies within `tolerance_px`.
///
/// Vertical hits are accepted over the marker's full extent.
#[must_use]
pub fn hit_test_markers(
    markers: &[MarkerPrimitive],
    pointer_x: f64,
    pointer_y: f64,
    tolerance_px: f64,
) -> Option<MarkerKind> {
    if !pointer_x.is_finite() || !pointer_y.is_finite() {
        return None;
    }

    let mut candidates: SmallVec<[(OrderedFloat<f64>, MarkerKind); 2]> = SmallVec::new();
    for marker in markers {
        let top = marker.top.min(marker.bottom) - tolerance_px;
        let bottom = marker.top.max(marker.bottom) + tolerance_px;
        if pointer_y < top || pointer_y > bottom {
            continue;
        }
        let distance = (marker.x - pointer_x).abs();
        if distance <= tolerance_px {
            candidates.push((OrderedFloat(distance), marker.kind));
        }
    }

    candidates
        .into_iter()
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, kind)| kind)
}

#[cfg(test)]
mod tests {
    use super::{
        DragGestureMode, InteractionState, ZoomGestureMode, hit_test_markers,
        resolve_drag_candidate,
    };
    use crate::render::{Color, LineStrokeStyle, MarkerKind, MarkerPrimitive};

    fn marker(kind: MarkerKind, x: f64) -> MarkerPrimitive {
        MarkerPrimitive {
            kind,
            x,
            top: 0.0,
            bottom: 50.0,
            stroke_width: 2.0,
            color: Color::rgb(0.0, 0.0, 0.0),
            stroke_style: LineStrokeStyle::Solid,
            handle_radius: 0.0,
        }
    }

    #[test]
    fn drag_candidate_rejects_out_of_bounds_delta() {
        assert_eq!(resolve_drag_candidate(990.0, 5.0, 1000.0), Some(995.0));
        assert_eq!(resolve_drag_candidate(990.0, 50.0, 1000.0), None);
        assert_eq!(resolve_drag_candidate(10.0, -10.0, 1000.0), Some(0.0));
        assert_eq!(resolve_drag_candidate(10.0, -10.5, 1000.0), None);
        assert_eq!(resolve_drag_candidate(f64::NAN, 1.0, 1000.0), None);
    }

    #[test]
    fn hit_test_prefers_nearest_marker() {
        let markers = [
            marker(MarkerKind::Selected, 100.0),
            marker(MarkerKind::Now, 104.0),
        ];
        assert_eq!(
            hit_test_markers(&markers, 101.0, 10.0, 6.0),
            Some(MarkerKind::Selected)
        );
        assert_eq!(
            hit_test_markers(&markers, 104.5, 10.0, 6.0),
            Some(MarkerKind::Now)
        );
        assert_eq!(hit_test_markers(&markers, 120.0, 10.0, 6.0), None);
        assert_eq!(hit_test_markers(&markers, 100.0, 80.0, 6.0), None);
    }

    #[test]
    fn gesture_state_transitions_are_idempotent() {
        let mut state = InteractionState::default();
        assert!(state.begin_zoom());
        assert!(!state.begin_zoom());
        assert_eq!(state.zoom_mode(), ZoomGestureMode::Active);
        assert!(state.end_zoom());
        assert!(!state.end_zoom());

        assert!(!state.end_drag());
        assert!(state.begin_drag());
        state.record_drag_move();
        assert_eq!(state.drag_moves(), 1);
        assert_eq!(state.drag_mode(), DragGestureMode::Dragging);
        assert!(state.end_drag());
        assert_eq!(state.drag_mode(), DragGestureMode::Idle);
    }
}
