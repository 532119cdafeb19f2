use tracing::debug;

use crate::core::tick_policy::{DEFAULT_MAX_TICKS, generate_ticks, select_ticks};
use crate::core::{Geometry, LaneScale};
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, MarkerKind, MarkerPrimitive, RenderFrame, Renderer,
    SceneLayerKind, SceneLayout, TextHAlign, TextPrimitive,
};

use super::{NowMarkerPolicy, TimelineWidget};

const AXIS_COLOR: Color = Color::rgb8(0x66, 0x66, 0x66);
const AXIS_TICK_LENGTH_PX: f64 = 4.0;
const AXIS_LABEL_OFFSET_PX: f64 = 12.0;
const AXIS_FONT_SIZE_PX: f64 = 10.0;
const SELECTED_MARKER_COLOR: Color = Color::rgb8(0xd6, 0x27, 0x28);
const SELECTED_MARKER_HANDLE_RADIUS: f64 = 5.0;
const NOW_MARKER_COLOR: Color = Color::rgb8(0x44, 0x44, 0x44);
const MARKER_STROKE_WIDTH: f64 = 2.0;

impl<R: Renderer> TimelineWidget<R> {
    /// Recomputes geometry, scales and ticks, re-diffs the scene and renders.
    ///
    /// Idempotent: calling it twice without intervening changes produces the
    /// same frame.
    pub fn redraw(&mut self) -> TimelineResult<()> {
        if self.options.now_marker == NowMarkerPolicy::RefreshOnRedraw {
            self.now = self.collaborators.clock.now();
        }
        self.recompute_layout()?;

        let layout = SceneLayout {
            time_scale: self.time_scale,
            lane_scale: self.lane_scale,
            lanes: self.lanes,
            width: self.geometry.width,
        };
        let report = self.scene.reconcile(&self.timebars, layout)?;
        if self.visible {
            if let Some(animation) = self.container_animation.as_mut() {
                animation.retarget(self.geometry.chart_height);
            }
        }

        debug!(
            width = self.geometry.width,
            height = self.geometry.height,
            timebars = self.timebars.len(),
            structural = report.is_structural(),
            ticks = self.axis_ticks.len(),
            "timeline redraw"
        );
        self.repaint()
    }

    /// Renders the current scene without reconciling it again.
    pub(super) fn repaint(&mut self) -> TimelineResult<()> {
        let frame = self.build_frame()?;
        self.renderer.render(&frame)?;
        self.emit_plugin_event(TimelineEvent::Rendered);
        Ok(())
    }

    /// Builds the frame the next render would receive.
    pub fn build_frame(&self) -> TimelineResult<RenderFrame> {
        let margins = self.geometry.margins;
        let mut frame = RenderFrame::new(self.geometry.chart_viewport(), (margins.left, margins.top))
            .with_container_height(self.container_height());

        self.scene.append_primitives(&mut frame, self.geometry.width);
        self.append_axis(&mut frame)?;
        for kind in [MarkerKind::Now, MarkerKind::Selected] {
            if let Some(marker) = self.marker_primitive(kind)? {
                frame.push_marker(marker);
            }
        }
        Ok(frame)
    }

    /// Animated height of the host container.
    #[must_use]
    pub fn container_height(&self) -> f64 {
        match self.container_animation {
            Some(animation) => animation.value().max(0.0),
            None if self.visible => self.geometry.chart_height,
            None => 0.0,
        }
    }

    pub(super) fn recompute_layout(&mut self) -> TimelineResult<()> {
        self.geometry = Geometry::compute(
            self.renderer.container_width(),
            self.options.chart_margins,
            self.timebars.len(),
            self.lanes,
        );
        self.lane_scale = LaneScale::new(self.timebars.len(), self.geometry.height)?;
        self.tick_selection = select_ticks(self.time_scale.visible_span(), self.geometry.width);
        let (start, end) = self.time_scale.domain();
        self.axis_ticks = generate_ticks(self.tick_selection, start, end, DEFAULT_MAX_TICKS);
        Ok(())
    }

    /// Marker for `kind`, or `None` when its date falls outside the plot.
    pub(super) fn marker_primitive(&self, kind: MarkerKind) -> TimelineResult<Option<MarkerPrimitive>> {
        let (date, color, stroke_style, handle_radius) = match kind {
            MarkerKind::Selected => (
                self.dragged_date,
                SELECTED_MARKER_COLOR,
                LineStrokeStyle::Solid,
                SELECTED_MARKER_HANDLE_RADIUS,
            ),
            MarkerKind::Now => (
                self.now,
                NOW_MARKER_COLOR,
                LineStrokeStyle::Dashed,
                0.0,
            ),
        };
        let x = self.time_scale.date_to_pixel(date, self.geometry.width)?;
        if !(0.0..=self.geometry.width).contains(&x) {
            return Ok(None);
        }
        Ok(Some(MarkerPrimitive {
            kind,
            x,
            top: 0.0,
            bottom: self.geometry.height,
            stroke_width: MARKER_STROKE_WIDTH,
            color,
            stroke_style,
            handle_radius,
        }))
    }

    fn append_axis(&self, frame: &mut RenderFrame) -> TimelineResult<()> {
        let width = self.geometry.width;
        let baseline = self.geometry.height;
        if width <= 0.0 {
            return Ok(());
        }
        frame.push_line(
            SceneLayerKind::Axis,
            LinePrimitive::new(0.0, baseline, width, baseline, 1.0, AXIS_COLOR),
        );

        for tick in &self.axis_ticks {
            let x = self.time_scale.date_to_pixel(tick.time, width)?;
            if !(0.0..=width).contains(&x) {
                continue;
            }
            frame.push_line(
                SceneLayerKind::Axis,
                LinePrimitive::new(x, baseline, x, baseline + AXIS_TICK_LENGTH_PX, 1.0, AXIS_COLOR),
            );
            frame.push_text(
                SceneLayerKind::Axis,
                TextPrimitive::new(
                    tick.label.clone(),
                    x,
                    baseline + AXIS_LABEL_OFFSET_PX,
                    AXIS_FONT_SIZE_PX,
                    AXIS_COLOR,
                    TextHAlign::Center,
                ),
            );
        }
        Ok(())
    }
}
