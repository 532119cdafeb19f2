use serde::{Deserialize, Serialize};

use crate::core::{Margins, Viewport};
use crate::error::{TimelineError, TimelineResult};

/// Plot height used when no time bar is present.
pub const EMPTY_PLOT_HEIGHT_PX: f64 = 25.0;
/// Space reserved below the lanes for the time axis.
pub const AXIS_RESERVE_PX: f64 = 20.0;

/// Per-lane sizing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneMetrics {
    pub bar_height: f64,
    pub bar_margin: f64,
}

impl Default for LaneMetrics {
    fn default() -> Self {
        Self {
            bar_height: 20.0,
            bar_margin: 4.0,
        }
    }
}

impl LaneMetrics {
    pub fn validate(self) -> TimelineResult<Self> {
        if !self.bar_height.is_finite() || self.bar_height <= 0.0 {
            return Err(TimelineError::InvalidData(
                "bar height must be finite and > 0".to_owned(),
            ));
        }
        if !self.bar_margin.is_finite() || self.bar_margin < 0.0 {
            return Err(TimelineError::InvalidData(
                "bar margin must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// One lane: the bar, a margin on each side and a 1px separator.
    #[must_use]
    pub fn lane_height(self) -> f64 {
        self.bar_height + 2.0 * self.bar_margin + 1.0
    }
}

/// Derived pixel geometry for one redraw.
///
/// `width`/`height` describe the plot area inside the margins, `chart_height`
/// the full container height including margins and the axis reserve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub container_width: f64,
    pub width: f64,
    pub height: f64,
    pub chart_height: f64,
    pub lane_height: f64,
    pub margins: Margins,
}

impl Geometry {
    #[must_use]
    pub fn compute(
        container_width: f64,
        margins: Margins,
        bar_count: usize,
        lanes: LaneMetrics,
    ) -> Self {
        let lane_height = lanes.lane_height();
        let height = if bar_count == 0 {
            EMPTY_PLOT_HEIGHT_PX
        } else {
            lane_height * bar_count as f64
        };
        let container_width = if container_width.is_finite() {
            container_width.max(0.0)
        } else {
            0.0
        };

        Self {
            container_width,
            width: (container_width - margins.horizontal()).max(0.0),
            height,
            chart_height: height + margins.vertical() + AXIS_RESERVE_PX,
            lane_height,
            margins,
        }
    }

    #[must_use]
    pub fn plot_viewport(self) -> Viewport {
        Viewport::new(self.width, self.height)
    }

    #[must_use]
    pub fn chart_viewport(self) -> Viewport {
        Viewport::new(self.container_width, self.chart_height)
    }
}
