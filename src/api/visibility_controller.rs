use std::time::Duration;

use tracing::debug;

use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::Renderer;
use crate::render::transition::{HIDE_TRANSITION, SHOW_TRANSITION, ScalarAnimation};

use super::TimelineWidget;

impl<R: Renderer> TimelineWidget<R> {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Recomputes geometry from the container width and redraws.
    ///
    /// Ignored while hidden; `show` picks up the new width. Returns whether a
    /// redraw happened.
    pub fn resize(&mut self) -> TimelineResult<bool> {
        if !self.visible {
            debug!("resize ignored while hidden");
            return Ok(false);
        }
        self.redraw()?;
        Ok(true)
    }

    /// Expands the container to the chart height over one second.
    pub fn show(&mut self) -> TimelineResult<()> {
        let from = self.container_height();
        self.visible = true;
        self.recompute_layout()?;
        self.container_animation = Some(ScalarAnimation::new(
            from,
            self.geometry.chart_height,
            SHOW_TRANSITION,
        ));
        debug!(from, to = self.geometry.chart_height, "timeline shown");
        self.emit_plugin_event(TimelineEvent::Shown);
        self.redraw()
    }

    /// Collapses the container to zero height.
    pub fn hide(&mut self) -> TimelineResult<()> {
        let from = self.container_height();
        self.visible = false;
        self.container_animation = Some(ScalarAnimation::new(from, 0.0, HIDE_TRANSITION));
        debug!(from, "timeline hidden");
        self.emit_plugin_event(TimelineEvent::Hidden);
        self.repaint()
    }

    /// Advances running transitions by `elapsed` and repaints if any ran.
    ///
    /// Hosts call this from their timer callback. Returns `true` while a
    /// transition is still in progress.
    pub fn advance(&mut self, elapsed: Duration) -> TimelineResult<bool> {
        let was_active = self.is_animating();
        if !was_active {
            return Ok(false);
        }

        self.scene.advance(elapsed);
        if let Some(animation) = self.container_animation.as_mut() {
            if animation.advance(elapsed) {
                self.container_animation = None;
            }
        }
        self.repaint()?;
        Ok(self.is_animating())
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.scene.is_transitioning() || self.container_animation.is_some()
    }
}
