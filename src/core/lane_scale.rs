use crate::core::LinearScale;
use crate::error::TimelineResult;

/// Vertical mapping from lane index `[0, lane_count]` onto `[0, height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneScale {
    lane_count: usize,
    linear: LinearScale,
}

impl LaneScale {
    pub fn new(lane_count: usize, height: f64) -> TimelineResult<Self> {
        // With no lanes every index collapses onto the top edge.
        let linear = if lane_count == 0 {
            LinearScale::new((0.0, 1.0), (0.0, 0.0))?
        } else {
            LinearScale::new((0.0, lane_count as f64), (0.0, height))?
        };
        Ok(Self { lane_count, linear })
    }

    #[must_use]
    pub fn lane_count(self) -> usize {
        self.lane_count
    }

    pub fn lane_to_pixel(self, lane: usize) -> TimelineResult<f64> {
        self.linear.domain_to_pixel(lane as f64)
    }

    /// Lane index under a vertical pixel position, if any.
    #[must_use]
    pub fn pixel_to_lane(self, pixel: f64) -> Option<usize> {
        if self.lane_count == 0 {
            return None;
        }
        let value = self.linear.pixel_to_domain(pixel).ok()?;
        if value < 0.0 || value >= self.lane_count as f64 {
            return None;
        }
        Some(value.floor() as usize)
    }
}
