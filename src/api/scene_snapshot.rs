use serde::{Deserialize, Serialize};

use crate::core::TickUnit;
use crate::core::primitives::format_iso_datetime;
use crate::render::Renderer;

use super::TimelineWidget;

/// Serializable view of one bar element. Non-finite positions (unparseable
/// dates) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSnapshot {
    pub id: u64,
    pub lane: usize,
    pub name: String,
    pub label: String,
    pub x: Option<f64>,
    pub width: Option<f64>,
    pub y: f64,
    /// Height at the current transition progress.
    pub height: f64,
    pub color: String,
    pub details: Vec<Option<f64>>,
}

/// Deterministic state dump used by hosts, tests and regression fixtures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub container_width: f64,
    pub width: f64,
    pub height: f64,
    pub chart_height: f64,
    pub container_height: f64,
    pub visible: bool,
    pub visible_range: (f64, f64),
    pub full_range: (f64, f64),
    pub selected_date: String,
    pub dragged_date: String,
    pub now: String,
    pub tick_unit: TickUnit,
    pub tick_step: u32,
    pub tick_labels: Vec<String>,
    pub bars: Vec<BarSnapshot>,
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

impl<R: Renderer> TimelineWidget<R> {
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        let bars = self
            .scene
            .bars()
            .zip(self.timebars.iter())
            .map(|(element, bar)| BarSnapshot {
                id: element.id.get(),
                lane: element.lane,
                name: bar.name.clone(),
                label: bar.label.clone(),
                x: finite(element.x),
                width: finite(element.width),
                y: element.y,
                height: element.current_height(),
                color: element.color.to_hex(),
                details: element.details().map(|detail| finite(detail.x)).collect(),
            })
            .collect();

        SceneSnapshot {
            container_width: self.geometry.container_width,
            width: self.geometry.width,
            height: self.geometry.height,
            chart_height: self.geometry.chart_height,
            container_height: self.container_height(),
            visible: self.visible,
            visible_range: self.time_scale.domain(),
            full_range: self.time_scale.full_range(),
            selected_date: format_iso_datetime(self.selected_date),
            dragged_date: format_iso_datetime(self.dragged_date),
            now: format_iso_datetime(self.now),
            tick_unit: self.tick_selection.unit,
            tick_step: self.tick_selection.step,
            tick_labels: self
                .axis_ticks
                .iter()
                .map(|tick| tick.label.clone())
                .collect(),
            bars,
        }
    }
}
