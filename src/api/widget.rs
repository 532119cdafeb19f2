use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::core::tick_policy::select_ticks;
use crate::core::{
    AxisTick, Geometry, LaneMetrics, LaneScale, TickSelection, TimeBar, TimeBarCollection,
    TimeScale,
};
use crate::error::{TimelineError, TimelineResult};
use crate::extensions::TimelinePlugin;
use crate::interaction::InteractionState;
use crate::render::transition::ScalarAnimation;
use crate::render::{Renderer, SurfaceProvider, TimelineScene};

use super::{TimelineCollaborators, TimelineOptions};

/// Interactive timeline bound to one host container.
///
/// Owns the time bars, the committed and dragged dates, the scales, the
/// persistent scene and the gesture state. Every structural change recomputes
/// geometry and scales from scratch and re-diffs the scene before handing a
/// fresh `RenderFrame` to the renderer.
///
/// Gesture coordinates (`pointer_down`, zoom anchors) are plot-relative: the
/// origin is the top-left corner inside the chart margins.
pub struct TimelineWidget<R: Renderer> {
    pub(super) renderer: R,
    pub(super) container_id: String,
    pub(super) options: TimelineOptions,
    pub(super) lanes: LaneMetrics,
    pub(super) timebars: TimeBarCollection,
    pub(super) selected_date: DateTime<Utc>,
    pub(super) dragged_date: DateTime<Utc>,
    pub(super) now: DateTime<Utc>,
    pub(super) visible: bool,
    pub(super) geometry: Geometry,
    pub(super) time_scale: TimeScale,
    pub(super) lane_scale: LaneScale,
    pub(super) tick_selection: TickSelection,
    pub(super) axis_ticks: Vec<AxisTick>,
    pub(super) scene: TimelineScene,
    pub(super) interaction: InteractionState,
    pub(super) container_animation: Option<ScalarAnimation>,
    pub(super) collaborators: TimelineCollaborators,
    pub(super) plugins: Vec<Box<dyn TimelinePlugin>>,
}

impl<R: Renderer> TimelineWidget<R> {
    /// Binds a widget to `container_id` and performs the first redraw.
    ///
    /// Fails with `ContainerNotFound` when the provider has no such
    /// container; nothing is rendered in that case.
    pub fn new<P>(
        provider: &mut P,
        container_id: &str,
        options: TimelineOptions,
        collaborators: TimelineCollaborators,
    ) -> TimelineResult<Self>
    where
        P: SurfaceProvider<Surface = R>,
    {
        options.validate()?;
        let Some(renderer) = provider.find_container(container_id) else {
            warn!(container_id, "timeline container not found");
            return Err(TimelineError::ContainerNotFound {
                container_id: container_id.to_owned(),
            });
        };

        let policy = options.date_validation;
        let now = collaborators.clock.now();
        let selected_date = match options.selected_date.as_deref() {
            Some(raw) => policy.parse("selectedDate", raw)?.unwrap_or(now),
            None => now,
        };

        let mut timebars = TimeBarCollection::new();
        for json in &options.timebars {
            timebars.push(TimeBar::from_json(json, policy)?);
        }

        let time_scale = match timebars.date_extent() {
            Some((start, end)) => TimeScale::from_dates(start, end)?,
            None => TimeScale::around(selected_date)?,
        };

        let lanes = options.lane_metrics();
        let geometry = Geometry::compute(
            renderer.container_width(),
            options.chart_margins,
            timebars.len(),
            lanes,
        );
        let lane_scale = LaneScale::new(timebars.len(), geometry.height)?;
        let tick_selection = select_ticks(time_scale.visible_span(), geometry.width);

        let mut widget = Self {
            renderer,
            container_id: container_id.to_owned(),
            options,
            lanes,
            timebars,
            selected_date,
            dragged_date: selected_date,
            now,
            visible: true,
            geometry,
            time_scale,
            lane_scale,
            tick_selection,
            axis_ticks: Vec::new(),
            scene: TimelineScene::new(),
            interaction: InteractionState::default(),
            container_animation: None,
            collaborators,
            plugins: Vec::new(),
        };
        debug!(
            container_id,
            timebars = widget.timebars.len(),
            container_width = widget.geometry.container_width,
            "timeline widget created"
        );
        widget.redraw()?;
        Ok(widget)
    }

    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    #[must_use]
    pub fn options(&self) -> &TimelineOptions {
        &self.options
    }

    #[must_use]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[must_use]
    pub fn lane_scale(&self) -> LaneScale {
        self.lane_scale
    }

    #[must_use]
    pub fn tick_selection(&self) -> TickSelection {
        self.tick_selection
    }

    #[must_use]
    pub fn axis_ticks(&self) -> &[AxisTick] {
        &self.axis_ticks
    }

    #[must_use]
    pub fn scene(&self) -> &TimelineScene {
        &self.scene
    }

    #[must_use]
    pub fn interaction(&self) -> InteractionState {
        self.interaction
    }

    /// Current-date marker position in time.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access for hosts that resize or reconfigure the surface.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
