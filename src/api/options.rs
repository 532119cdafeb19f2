use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::primitives::format_iso_datetime;
use crate::core::{DateValidationPolicy, LaneMetrics, Margins, TimeBarJson, TimeScaleZoomLimits};
use crate::error::{TimelineError, TimelineResult};
use crate::interaction::DEFAULT_DRAG_HIT_TOLERANCE_PX;

/// Wheel zoom step applied per 120 wheel units.
pub const DEFAULT_WHEEL_ZOOM_STEP: f64 = 0.1;

/// When the "now" marker reads the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NowMarkerPolicy {
    /// Read once when the widget is built; the marker never moves.
    #[default]
    CapturedAtConstruction,
    /// Re-read the clock before every redraw.
    RefreshOnRedraw,
}

/// Widget bootstrap configuration.
///
/// Serializable with camelCase keys so hosts can pass the same JSON object
/// they already keep for the widget. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineOptions {
    /// Initial committed date (ISO-8601); defaults to the clock's now.
    #[serde(default)]
    pub selected_date: Option<String>,
    #[serde(default)]
    pub chart_margins: Margins,
    #[serde(default = "default_bar_height")]
    pub bar_height: f64,
    #[serde(default = "default_bar_margin")]
    pub bar_margin: f64,
    #[serde(default)]
    pub timebars: Vec<TimeBarJson>,
    #[serde(default)]
    pub date_validation: DateValidationPolicy,
    #[serde(default)]
    pub now_marker: NowMarkerPolicy,
    #[serde(default)]
    pub zoom_limits: TimeScaleZoomLimits,
    #[serde(default = "default_drag_hit_tolerance_px")]
    pub drag_hit_tolerance_px: f64,
    #[serde(default = "default_wheel_zoom_step")]
    pub wheel_zoom_step: f64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            selected_date: None,
            chart_margins: Margins::default(),
            bar_height: default_bar_height(),
            bar_margin: default_bar_margin(),
            timebars: Vec::new(),
            date_validation: DateValidationPolicy::default(),
            now_marker: NowMarkerPolicy::default(),
            zoom_limits: TimeScaleZoomLimits::default(),
            drag_hit_tolerance_px: default_drag_hit_tolerance_px(),
            wheel_zoom_step: default_wheel_zoom_step(),
        }
    }
}

impl TimelineOptions {
    pub fn from_json_str(input: &str) -> TimelineResult<Self> {
        let value: serde_json::Value = serde_json::from_str(input).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse timeline options: {e}"))
        })?;
        if !value.is_object() {
            return Err(TimelineError::InvalidData(
                "timeline options must be a JSON object".to_owned(),
            ));
        }
        let options: Self = serde_json::from_value(value).map_err(|e| {
            TimelineError::InvalidData(format!("failed to parse timeline options: {e}"))
        })?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_pretty(&self) -> TimelineResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            TimelineError::InvalidData(format!("failed to serialize timeline options: {e}"))
        })
    }

    #[must_use]
    pub fn with_selected_date(mut self, date: DateTime<Utc>) -> Self {
        self.selected_date = Some(format_iso_datetime(date));
        self
    }

    #[must_use]
    pub fn with_chart_margins(mut self, margins: Margins) -> Self {
        self.chart_margins = margins;
        self
    }

    #[must_use]
    pub fn with_bar_height(mut self, bar_height: f64) -> Self {
        self.bar_height = bar_height;
        self
    }

    #[must_use]
    pub fn with_bar_margin(mut self, bar_margin: f64) -> Self {
        self.bar_margin = bar_margin;
        self
    }

    #[must_use]
    pub fn with_timebar(mut self, timebar: TimeBarJson) -> Self {
        self.timebars.push(timebar);
        self
    }

    #[must_use]
    pub fn with_date_validation(mut self, policy: DateValidationPolicy) -> Self {
        self.date_validation = policy;
        self
    }

    #[must_use]
    pub fn with_now_marker(mut self, policy: NowMarkerPolicy) -> Self {
        self.now_marker = policy;
        self
    }

    #[must_use]
    pub fn with_zoom_limits(mut self, limits: TimeScaleZoomLimits) -> Self {
        self.zoom_limits = limits;
        self
    }

    #[must_use]
    pub fn with_drag_hit_tolerance_px(mut self, tolerance_px: f64) -> Self {
        self.drag_hit_tolerance_px = tolerance_px;
        self
    }

    #[must_use]
    pub fn lane_metrics(&self) -> LaneMetrics {
        LaneMetrics {
            bar_height: self.bar_height,
            bar_margin: self.bar_margin,
        }
    }

    pub fn validate(&self) -> TimelineResult<()> {
        if !self.chart_margins.is_valid() {
            return Err(TimelineError::InvalidData(
                "chart margins must be finite and >= 0".to_owned(),
            ));
        }
        self.lane_metrics().validate()?;
        self.zoom_limits.validate()?;
        if !self.drag_hit_tolerance_px.is_finite() || self.drag_hit_tolerance_px < 0.0 {
            return Err(TimelineError::InvalidData(
                "drag hit tolerance must be finite and >= 0".to_owned(),
            ));
        }
        if !self.wheel_zoom_step.is_finite() || self.wheel_zoom_step <= 0.0 {
            return Err(TimelineError::InvalidData(
                "wheel zoom step must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_bar_height() -> f64 {
    20.0
}

fn default_bar_margin() -> f64 {
    4.0
}

fn default_drag_hit_tolerance_px() -> f64 {
    DEFAULT_DRAG_HIT_TOLERANCE_PX
}

fn default_wheel_zoom_step() -> f64 {
    DEFAULT_WHEEL_ZOOM_STEP
}
