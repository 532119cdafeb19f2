//! Persistent visual elements of the timeline.
//!
//! Bars, lane separators and labels are keyed by `BarId`; each bar owns a
//! nested join of detail ticks keyed by position inside `date_times`. Every
//! redraw reconciles the current collection against the stored elements and
//! rewrites the geometry of survivors, so elements that are mid-transition
//! keep their progress and simply retarget.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{BarId, LaneMetrics, LaneScale, TimeBar, TimeBarCollection, TimeScale};
use crate::error::TimelineResult;
use crate::render::palette::lane_color;
use crate::render::transition::{ENTER_TRANSITION, Transition};
use crate::render::{
    Color, JoinSummary, KeyedJoin, LinePrimitive, RectPrimitive, RenderFrame, SceneLayerKind,
    TextHAlign, TextPrimitive,
};

const SEPARATOR_COLOR: Color = Color::rgb8(0xdd, 0xdd, 0xdd);
const LABEL_COLOR: Color = Color::rgb8(0x33, 0x33, 0x33);
const BAR_FILL_ALPHA: f64 = 0.35;
const BAR_STROKE_WIDTH: f64 = 1.0;
const DETAIL_STROKE_WIDTH: f64 = 2.0;
const LABEL_FONT_SIZE_PX: f64 = 11.0;
const LABEL_INSET_PX: f64 = 4.0;

/// Scales and lane metrics shared by one reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneLayout {
    pub time_scale: TimeScale,
    pub lane_scale: LaneScale,
    pub lanes: LaneMetrics,
    /// Plot width in pixels.
    pub width: f64,
}

impl SceneLayout {
    fn time_x(self, time: Option<DateTime<Utc>>) -> TimelineResult<f64> {
        match time {
            Some(time) => self.time_scale.date_to_pixel(time, self.width),
            None => Ok(f64::NAN),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetailElement {
    pub x: f64,
}

#[derive(Debug, Clone)]
pub struct BarElement {
    pub id: BarId,
    pub lane: usize,
    pub x: f64,
    pub width: f64,
    pub y: f64,
    pub target_height: f64,
    pub color: Color,
    enter: Transition,
    details: KeyedJoin<usize, DetailElement>,
}

impl BarElement {
    fn entering(id: BarId, lane: usize) -> Self {
        Self {
            id,
            lane,
            x: f64::NAN,
            width: f64::NAN,
            y: f64::NAN,
            target_height: 0.0,
            color: lane_color(lane),
            enter: Transition::new(ENTER_TRANSITION),
            details: KeyedJoin::new(),
        }
    }

    /// Height at the current point of the enter transition.
    #[must_use]
    pub fn current_height(&self) -> f64 {
        self.target_height * self.enter.progress()
    }

    #[must_use]
    pub fn current_stroke(&self) -> Color {
        Color::TRANSPARENT.lerp(self.color, self.enter.progress())
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        !self.enter.is_finished()
    }

    pub fn details(&self) -> impl Iterator<Item = &DetailElement> {
        self.details.values()
    }

    #[must_use]
    pub fn detail_count(&self) -> usize {
        self.details.len()
    }

    fn update(&mut self, lane: usize, bar: &TimeBar, layout: SceneLayout) -> TimelineResult<JoinSummary> {
        let start_x = layout.time_x(bar.start_date)?;
        let end_x = layout.time_x(bar.end_date)?;
        self.lane = lane;
        self.x = start_x;
        self.width = end_x - start_x;
        self.y = layout.lane_scale.lane_to_pixel(lane)? + layout.lanes.bar_margin;
        self.target_height = layout.lanes.bar_height;
        self.color = lane_color(lane);

        let summary = self
            .details
            .reconcile(0..bar.date_times.len(), |_, _| DetailElement { x: f64::NAN });
        for (index, detail) in self.details.iter_mut() {
            detail.x = layout.time_x(bar.date_times.get(*index).copied().flatten())?;
        }
        Ok(summary)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatorElement {
    pub lane: usize,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelElement {
    pub lane: usize,
    pub text: String,
    pub y: f64,
}

/// Join summaries of one reconciliation pass, per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SceneReconcileReport {
    pub bars: JoinSummary,
    pub details: JoinSummary,
    pub separators: JoinSummary,
    pub labels: JoinSummary,
}

impl SceneReconcileReport {
    #[must_use]
    pub fn is_structural(self) -> bool {
        self.bars.is_structural() || self.details.is_structural()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TimelineScene {
    bars: KeyedJoin<BarId, BarElement>,
    separators: KeyedJoin<BarId, SeparatorElement>,
    labels: KeyedJoin<BarId, LabelElement>,
    last_report: SceneReconcileReport,
}

impl TimelineScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Synchronizes every layer with `timebars`.
    pub fn reconcile(
        &mut self,
        timebars: &TimeBarCollection,
        layout: SceneLayout,
    ) -> TimelineResult<SceneReconcileReport> {
        let mut report = SceneReconcileReport {
            bars: self
                .bars
                .reconcile(timebars.ids(), |lane, id| BarElement::entering(id, lane)),
            ..SceneReconcileReport::default()
        };
        for ((lane, element), (_, bar)) in
            self.bars.values_mut().enumerate().zip(timebars.entries())
        {
            let details = element.update(lane, bar, layout)?;
            report.details.accumulate(details);
        }

        report.separators = self.separators.reconcile(timebars.ids(), |lane, _| {
            SeparatorElement { lane, y: f64::NAN }
        });
        for (lane, separator) in self.separators.values_mut().enumerate() {
            separator.lane = lane;
            separator.y = layout.lane_scale.lane_to_pixel(lane + 1)?;
        }

        report.labels = self.labels.reconcile(timebars.ids(), |lane, _| LabelElement {
            lane,
            text: String::new(),
            y: f64::NAN,
        });
        for ((lane, label), (_, bar)) in self.labels.values_mut().enumerate().zip(timebars.entries())
        {
            label.lane = lane;
            label.text.clone_from(&bar.label);
            label.y = layout.lane_scale.lane_to_pixel(lane)? + layout.lanes.lane_height() / 2.0;
        }

        debug!(
            bars_entered = report.bars.entered,
            bars_updated = report.bars.updated,
            bars_exited = report.bars.exited,
            details_entered = report.details.entered,
            details_exited = report.details.exited,
            "timeline scene reconciled"
        );
        self.last_report = report;
        Ok(report)
    }

    /// Moves enter transitions forward; returns `true` while any is running.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let mut active = false;
        for bar in self.bars.values_mut() {
            active |= !bar.enter.advance(elapsed);
        }
        active
    }

    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.bars.values().any(BarElement::is_transitioning)
    }

    #[must_use]
    pub fn last_report(&self) -> SceneReconcileReport {
        self.last_report
    }

    #[must_use]
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    #[must_use]
    pub fn bar(&self, id: BarId) -> Option<&BarElement> {
        self.bars.get(&id)
    }

    pub fn bars(&self) -> impl Iterator<Item = &BarElement> {
        self.bars.values()
    }

    pub fn separators(&self) -> impl Iterator<Item = &SeparatorElement> {
        self.separators.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &LabelElement> {
        self.labels.values()
    }

    /// Writes lane, bar, detail and label primitives into `frame`.
    ///
    /// Elements with non-finite geometry stay in the scene but are skipped.
    pub fn append_primitives(&self, frame: &mut RenderFrame, width: f64) {
        for separator in self.separators.values() {
            let line = LinePrimitive::new(0.0, separator.y, width, separator.y, 1.0, SEPARATOR_COLOR);
            if line.is_finite() {
                frame.push_line(SceneLayerKind::Lanes, line);
            }
        }

        for bar in self.bars.values() {
            let height = bar.current_height();
            let rect = RectPrimitive::new(
                bar.x,
                bar.y,
                bar.width,
                height,
                bar.color.with_alpha(BAR_FILL_ALPHA),
            )
            .with_border(BAR_STROKE_WIDTH, bar.current_stroke());
            if rect.is_finite() {
                frame.push_rect(SceneLayerKind::Bars, rect);
            }

            for detail in bar.details.values() {
                let line = LinePrimitive::new(
                    detail.x,
                    bar.y,
                    detail.x,
                    bar.y + height,
                    DETAIL_STROKE_WIDTH,
                    bar.current_stroke(),
                );
                if line.is_finite() {
                    frame.push_line(SceneLayerKind::Details, line);
                }
            }
        }

        for label in self.labels.values() {
            if label.y.is_finite() && !label.text.is_empty() {
                frame.push_text(
                    SceneLayerKind::Labels,
                    TextPrimitive::new(
                        label.text.clone(),
                        LABEL_INSET_PX,
                        label.y,
                        LABEL_FONT_SIZE_PX,
                        LABEL_COLOR,
                        TextHAlign::Left,
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    use super::{SceneLayout, TimelineScene};
    use crate::core::{
        DateValidationPolicy, LaneMetrics, LaneScale, TimeBar, TimeBarCollection, TimeScale,
        Viewport,
    };
    use crate::render::{RenderFrame, SceneLayerKind};

    fn layout(bars: usize) -> SceneLayout {
        let lanes = LaneMetrics::default();
        let start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single().expect("date");
        let end = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).single().expect("date");
        SceneLayout {
            time_scale: TimeScale::from_dates(start, end).expect("scale"),
            lane_scale: LaneScale::new(bars, lanes.lane_height() * bars as f64).expect("lanes"),
            lanes,
            width: 1000.0,
        }
    }

    fn bar(name: &str, start: &str, end: &str, details: &[&str]) -> TimeBar {
        TimeBar::parse(
            name,
            name,
            start,
            end,
            details.iter().copied(),
            DateValidationPolicy::Strict,
        )
        .expect("valid bar")
    }

    #[test]
    fn entering_bars_animate_height_and_stroke() {
        let mut bars = TimeBarCollection::new();
        bars.push(bar("a", "2020-01-01", "2020-07-01", &["2020-03-01"]));
        let mut scene = TimelineScene::new();
        let report = scene.reconcile(&bars, layout(1)).expect("reconcile");
        assert_eq!(report.bars.entered, 1);
        assert_eq!(report.details.entered, 1);

        let element = scene.bars().next().expect("bar element");
        assert_eq!(element.current_height(), 0.0);
        assert_eq!(element.current_stroke().alpha, 0.0);
        assert!(scene.is_transitioning());

        assert!(!scene.advance(Duration::from_millis(500)));
        let element = scene.bars().next().expect("bar element");
        assert_relative_eq!(element.current_height(), 20.0);
        assert_relative_eq!(element.current_stroke().alpha, 1.0);
        assert_relative_eq!(element.y, 4.0);
    }

    #[test]
    fn removing_middle_bar_keeps_survivor_progress_and_shifts_lanes() {
        let mut bars = TimeBarCollection::new();
        let first = bars.push(bar("a", "2020-01-01", "2020-02-01", &[]));
        bars.push(bar("b", "2020-02-01", "2020-03-01", &[]));
        let third = bars.push(bar("c", "2020-03-01", "2020-04-01", &[]));
        let mut scene = TimelineScene::new();
        scene.reconcile(&bars, layout(3)).expect("reconcile");
        scene.advance(Duration::from_millis(250));

        bars.remove_at(1).expect("remove");
        let report = scene.reconcile(&bars, layout(2)).expect("reconcile");
        assert_eq!(report.bars.exited, 1);
        assert_eq!(report.bars.updated, 2);
        assert_eq!(report.labels.exited, 1);

        let moved = scene.bar(third).expect("third survives");
        assert_eq!(moved.lane, 1);
        assert!(moved.is_transitioning());
        assert_relative_eq!(moved.current_height(), 10.0);
        assert_eq!(scene.bar(first).expect("first survives").lane, 0);
    }

    #[test]
    fn unparseable_dates_stay_in_scene_but_leave_the_frame() {
        let mut bars = TimeBarCollection::new();
        bars.push(
            TimeBar::parse(
                "broken",
                "broken",
                "not a date",
                "2020-03-01",
                ["2020-02-01", "??"],
                DateValidationPolicy::Lenient,
            )
            .expect("lenient parse"),
        );
        let mut scene = TimelineScene::new();
        scene.reconcile(&bars, layout(1)).expect("reconcile");
        scene.advance(Duration::from_secs(1));
        assert_eq!(scene.bar_count(), 1);

        let mut frame = RenderFrame::new(Viewport::new(1000.0, 29.0), (0.0, 0.0));
        scene.append_primitives(&mut frame, 1000.0);
        let bars_layer = frame.layer(SceneLayerKind::Bars).expect("bars layer");
        assert!(bars_layer.rects.is_empty());
        let details = frame.layer(SceneLayerKind::Details).expect("details layer");
        assert_eq!(details.lines.len(), 1);
        frame.validate().expect("frame stays valid");
    }
}
