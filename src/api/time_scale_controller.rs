use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::core::primitives::datetime_to_millis;
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::interaction::ZoomGestureMode;
use crate::render::Renderer;

use super::TimelineWidget;
use super::time_scale_zoom_factor_resolver::resolve_wheel_zoom_factor;

impl<R: Renderer> TimelineWidget<R> {
    /// Starts a zoom/pan gesture. Returns `false` if one is already active.
    pub fn zoom_start(&mut self) -> bool {
        let began = self.interaction.begin_zoom();
        if began {
            trace!("zoom gesture started");
            self.emit_plugin_event(TimelineEvent::ZoomStarted);
        }
        began
    }

    /// Ends the zoom/pan gesture. Returns `false` if none was active.
    pub fn zoom_end(&mut self) -> bool {
        let ended = self.interaction.end_zoom();
        if ended {
            trace!(ticks = self.interaction.zoom_ticks(), "zoom gesture ended");
            self.emit_plugin_event(TimelineEvent::ZoomEnded);
        }
        ended
    }

    /// Zooms around the plot x `anchor_x`; `factor > 1` zooms in.
    ///
    /// Outside an explicit gesture the call acts as a one-tick gesture.
    pub fn zoom_by_factor(&mut self, factor: f64, anchor_x: f64) -> TimelineResult<()> {
        self.with_zoom_gesture(|widget| {
            let width = widget.geometry.width;
            let anchor_ms = widget.time_scale.pixel_to_time(anchor_x, width)?;
            widget
                .time_scale
                .zoom_visible_by_factor(factor, anchor_ms, widget.options.zoom_limits)?;
            trace!(factor, anchor_x, "zoom tick");
            Ok(())
        })
    }

    /// Zooms from a wheel delta (120 units per notch).
    pub fn zoom_by_wheel(&mut self, wheel_delta_y: f64, anchor_x: f64) -> TimelineResult<()> {
        match resolve_wheel_zoom_factor(wheel_delta_y, self.options.wheel_zoom_step)? {
            Some(factor) => self.zoom_by_factor(factor, anchor_x),
            None => Ok(()),
        }
    }

    /// Pans by a pointer displacement; dragging right reveals earlier dates.
    pub fn pan_by_pixels(&mut self, delta_px: f64) -> TimelineResult<()> {
        self.with_zoom_gesture(|widget| {
            let width = widget.geometry.width;
            widget.time_scale.pan_visible_by_pixels(delta_px, width)?;
            trace!(delta_px, "pan tick");
            Ok(())
        })
    }

    /// Clears the zoom transform and redraws at the full range.
    pub fn reset(&mut self) -> TimelineResult<()> {
        self.time_scale.reset_visible_range_to_full();
        debug!("visible range reset");
        self.after_visible_range_changed()
    }

    /// Shows exactly `[start, end]`.
    pub fn zoom_date(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> TimelineResult<()> {
        self.time_scale
            .set_visible_range(datetime_to_millis(start), datetime_to_millis(end))?;
        debug!(start = %start, end = %end, "visible range set");
        self.after_visible_range_changed()
    }

    /// Visible domain in epoch milliseconds.
    #[must_use]
    pub fn visible_range(&self) -> (f64, f64) {
        self.time_scale.domain()
    }

    #[must_use]
    pub fn visible_dates(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.time_scale.visible_dates()
    }

    /// Range restored by `reset`.
    #[must_use]
    pub fn full_range(&self) -> (f64, f64) {
        self.time_scale.full_range()
    }

    pub fn map_date_to_pixel(&self, date: DateTime<Utc>) -> TimelineResult<f64> {
        self.time_scale.date_to_pixel(date, self.geometry.width)
    }

    pub fn map_pixel_to_date(&self, pixel: f64) -> TimelineResult<DateTime<Utc>> {
        self.time_scale.pixel_to_date(pixel, self.geometry.width)
    }

    pub fn map_lane_to_pixel(&self, lane: usize) -> TimelineResult<f64> {
        self.lane_scale.lane_to_pixel(lane)
    }

    fn with_zoom_gesture<F>(&mut self, tick: F) -> TimelineResult<()>
    where
        F: FnOnce(&mut Self) -> TimelineResult<()>,
    {
        let implicit = self.interaction.zoom_mode() == ZoomGestureMode::Idle;
        if implicit {
            self.zoom_start();
        }
        let result = tick(self).and_then(|()| {
            self.interaction.record_zoom_tick();
            self.after_visible_range_changed()
        });
        if implicit {
            self.zoom_end();
        }
        result
    }

    fn after_visible_range_changed(&mut self) -> TimelineResult<()> {
        self.redraw()?;
        let (start, end) = self.time_scale.domain();
        self.emit_plugin_event(TimelineEvent::VisibleRangeChanged { start, end });
        Ok(())
    }
}
