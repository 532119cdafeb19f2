use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::core::LinearScale;
use crate::core::primitives::{datetime_to_millis, millis_to_datetime};
use crate::error::{TimelineError, TimelineResult};

pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;
pub const MILLIS_PER_DAY: f64 = 24.0 * MILLIS_PER_HOUR;

/// Number of calendar months shown on each side of the selected date when no
/// time bar provides a domain.
pub const FALLBACK_DOMAIN_MONTHS: u32 = 6;

/// Bounds applied to the visible span by zoom gestures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeScaleZoomLimits {
    pub min_span_ms: f64,
    pub max_span_ms: f64,
}

impl Default for TimeScaleZoomLimits {
    fn default() -> Self {
        Self {
            min_span_ms: MILLIS_PER_HOUR,
            max_span_ms: 1_000.0 * 365.25 * MILLIS_PER_DAY,
        }
    }
}

impl TimeScaleZoomLimits {
    pub fn validate(self) -> TimelineResult<Self> {
        if !self.min_span_ms.is_finite() || self.min_span_ms <= 0.0 {
            return Err(TimelineError::InvalidData(
                "zoom min span must be finite and > 0".to_owned(),
            ));
        }
        if !self.max_span_ms.is_finite() || self.max_span_ms < self.min_span_ms {
            return Err(TimelineError::InvalidData(
                "zoom max span must be finite and >= min span".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Horizontal time axis with separate full and visible ranges, in epoch
/// milliseconds.
///
/// `full_*` is the range fitted at construction and restored by reset.
/// `visible_*` is the domain currently mapped onto `[0, width]`; zoom, pan and
/// explicit range changes only ever touch it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeScale {
    full_start: f64,
    full_end: f64,
    visible_start: f64,
    visible_end: f64,
}

impl TimeScale {
    /// Creates a scale with matching full and visible ranges.
    pub fn new(start_ms: f64, end_ms: f64) -> TimelineResult<Self> {
        let (start, end) = normalize_range(start_ms, end_ms, MILLIS_PER_HOUR)?;
        Ok(Self {
            full_start: start,
            full_end: end,
            visible_start: start,
            visible_end: end,
        })
    }

    pub fn from_dates(start: DateTime<Utc>, end: DateTime<Utc>) -> TimelineResult<Self> {
        Self::new(datetime_to_millis(start), datetime_to_millis(end))
    }

    /// Builds the default domain spanning `FALLBACK_DOMAIN_MONTHS` calendar
    /// months before and after `center`.
    pub fn around(center: DateTime<Utc>) -> TimelineResult<Self> {
        let months = Months::new(FALLBACK_DOMAIN_MONTHS);
        let start = center.checked_sub_months(months).ok_or_else(|| {
            TimelineError::InvalidData("fallback domain start is out of range".to_owned())
        })?;
        let end = center.checked_add_months(months).ok_or_else(|| {
            TimelineError::InvalidData("fallback domain end is out of range".to_owned())
        })?;
        Self::from_dates(start, end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.visible_start, self.visible_end)
    }

    #[must_use]
    pub fn full_range(self) -> (f64, f64) {
        (self.full_start, self.full_end)
    }

    #[must_use]
    pub fn visible_span(self) -> f64 {
        self.visible_end - self.visible_start
    }

    /// Visible domain as datetimes; `None` if an edge left chrono's range.
    #[must_use]
    pub fn visible_dates(self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((
            millis_to_datetime(self.visible_start)?,
            millis_to_datetime(self.visible_end)?,
        ))
    }

    #[must_use]
    pub fn is_zoomed(self) -> bool {
        self.visible_start != self.full_start || self.visible_end != self.full_end
    }

    /// Overrides the visible range without modifying the full fitted range.
    pub fn set_visible_range(&mut self, start_ms: f64, end_ms: f64) -> TimelineResult<()> {
        let (start, end) = normalize_range(start_ms, end_ms, 1.0)?;
        self.visible_start = start;
        self.visible_end = end;
        Ok(())
    }

    pub fn reset_visible_range_to_full(&mut self) {
        self.visible_start = self.full_start;
        self.visible_end = self.full_end;
    }

    /// Pans the visible range by an additive time delta.
    pub fn pan_visible_by_delta(&mut self, delta_ms: f64) -> TimelineResult<()> {
        if !delta_ms.is_finite() {
            return Err(TimelineError::InvalidData(
                "pan delta must be finite".to_owned(),
            ));
        }

        self.visible_start += delta_ms;
        self.visible_end += delta_ms;
        Ok(())
    }

    /// Pans by a pointer displacement. Moving the pointer right reveals
    /// earlier times.
    pub fn pan_visible_by_pixels(&mut self, delta_px: f64, width: f64) -> TimelineResult<()> {
        if !width.is_finite() || width <= 0.0 {
            return Err(TimelineError::InvalidViewport {
                width,
                height: 0.0,
            });
        }
        let delta_ms = -delta_px * self.visible_span() / width;
        self.pan_visible_by_delta(delta_ms)
    }

    /// Zooms visible range around an anchor time.
    ///
    /// `factor > 1.0` zooms in, `0.0 < factor < 1.0` zooms out. The resulting
    /// span is clamped into `limits`.
    pub fn zoom_visible_by_factor(
        &mut self,
        factor: f64,
        anchor_ms: f64,
        limits: TimeScaleZoomLimits,
    ) -> TimelineResult<()> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TimelineError::InvalidData(
                "zoom factor must be finite and > 0".to_owned(),
            ));
        }
        if !anchor_ms.is_finite() {
            return Err(TimelineError::InvalidData(
                "zoom anchor must be finite".to_owned(),
            ));
        }
        let limits = limits.validate()?;

        let current_span = self.visible_span();
        let target_span = (current_span / factor).clamp(limits.min_span_ms, limits.max_span_ms);
        let left_ratio = (anchor_ms - self.visible_start) / current_span;

        let new_start = anchor_ms - left_ratio * target_span;
        let new_end = new_start + target_span;
        self.set_visible_range(new_start, new_end)
    }

    pub fn time_to_pixel(self, time_ms: f64, width: f64) -> TimelineResult<f64> {
        self.visible_linear(width)?.domain_to_pixel(time_ms)
    }

    pub fn pixel_to_time(self, pixel: f64, width: f64) -> TimelineResult<f64> {
        self.visible_linear(width)?.pixel_to_domain(pixel)
    }

    pub fn date_to_pixel(self, time: DateTime<Utc>, width: f64) -> TimelineResult<f64> {
        self.time_to_pixel(datetime_to_millis(time), width)
    }

    pub fn pixel_to_date(self, pixel: f64, width: f64) -> TimelineResult<DateTime<Utc>> {
        let millis = self.pixel_to_time(pixel, width)?;
        millis_to_datetime(millis).ok_or_else(|| {
            TimelineError::InvalidData(format!("pixel {pixel} maps outside the datetime range"))
        })
    }

    /// Like `pixel_to_date`, but the result never leaves the visible domain.
    ///
    /// Visible bounds are fractional after zoom or pan; the inverted time is
    /// clamped to the whole milliseconds inside them before rounding.
    pub fn pixel_to_visible_date(self, pixel: f64, width: f64) -> TimelineResult<DateTime<Utc>> {
        let millis = self.pixel_to_time(pixel, width)?;
        let low = self.visible_start.ceil();
        let high = self.visible_end.floor();
        let clamped = if low <= high {
            millis.clamp(low, high)
        } else {
            ((self.visible_start + self.visible_end) / 2.0).round()
        };
        millis_to_datetime(clamped).ok_or_else(|| {
            TimelineError::InvalidData(format!("pixel {pixel} maps outside the datetime range"))
        })
    }

    fn visible_linear(self, width: f64) -> TimelineResult<LinearScale> {
        if !width.is_finite() || width < 0.0 {
            return Err(TimelineError::InvalidViewport {
                width,
                height: 0.0,
            });
        }
        LinearScale::new((self.visible_start, self.visible_end), (0.0, width))
    }
}

fn normalize_range(start: f64, end: f64, min_span: f64) -> TimelineResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(TimelineError::InvalidData(
            "scale range must be finite".to_owned(),
        ));
    }

    if start == end {
        let half = min_span / 2.0;
        return Ok((start - half, end + half));
    }

    Ok((start.min(end), start.max(end)))
}
