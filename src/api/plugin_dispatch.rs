use crate::core::primitives::datetime_to_millis;
use crate::extensions::{PluginContext, TimelineEvent};
use crate::render::Renderer;

use super::TimelineWidget;

impl<R: Renderer> TimelineWidget<R> {
    pub(super) fn plugin_context(&self) -> PluginContext {
        PluginContext {
            plot_width: self.geometry.width,
            plot_height: self.geometry.height,
            visible_range: self.time_scale.domain(),
            timebars_len: self.timebars.len(),
            selected_time: datetime_to_millis(self.selected_date),
            visible: self.visible,
            zoom_mode: self.interaction.zoom_mode(),
            drag_mode: self.interaction.drag_mode(),
        }
    }

    pub(super) fn emit_plugin_event(&mut self, event: TimelineEvent) {
        if self.plugins.is_empty() {
            return;
        }
        let context = self.plugin_context();
        for plugin in &mut self.plugins {
            plugin.on_event(event, context);
        }
    }

    pub(super) fn emit_date_committed(&mut self) {
        let time = datetime_to_millis(self.selected_date);
        self.emit_plugin_event(TimelineEvent::DateCommitted { time });
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::{TimeZone, Utc};

    use crate::api::{FixedClock, TimelineCollaborators, TimelineOptions, TimelineWidget};
    use crate::extensions::{PluginContext, TimelineEvent, TimelinePlugin};
    use crate::render::{HeadlessDocument, NullRenderer};

    #[derive(Clone)]
    struct RecordingPlugin {
        id: String,
        events: Rc<RefCell<Vec<TimelineEvent>>>,
    }

    impl RecordingPlugin {
        fn new(id: impl Into<String>, events: Rc<RefCell<Vec<TimelineEvent>>>) -> Self {
            Self {
                id: id.into(),
                events,
            }
        }
    }

    impl TimelinePlugin for RecordingPlugin {
        fn id(&self) -> &str {
            &self.id
        }

        fn on_event(&mut self, event: TimelineEvent, _context: PluginContext) {
            self.events.borrow_mut().push(event);
        }
    }

    fn build_widget() -> TimelineWidget<NullRenderer> {
        let now = Utc
            .with_ymd_and_hms(2020, 3, 1, 0, 0, 0)
            .single()
            .expect("date");
        let mut document = HeadlessDocument::new().with_container("timeline", 800.0);
        TimelineWidget::new(
            &mut document,
            "timeline",
            TimelineOptions::default(),
            TimelineCollaborators::new().with_clock(FixedClock(now)),
        )
        .expect("widget init")
    }

    #[test]
    fn structural_change_emits_rendered_then_timebars_changed() {
        let mut widget = build_widget();
        let events = Rc::new(RefCell::new(Vec::<TimelineEvent>::new()));
        widget
            .register_plugin(Box::new(RecordingPlugin::new("recorder", events.clone())))
            .expect("register plugin");

        widget
            .add_time_bar("a", "A", "2020-01-01", "2020-02-01", ["2020-01-15"])
            .expect("add bar");

        let events = events.borrow();
        assert!(matches!(events[0], TimelineEvent::Rendered));
        assert!(matches!(
            events[1],
            TimelineEvent::TimeBarsChanged { timebars_len: 1 }
        ));
    }

    #[test]
    fn duplicate_plugin_ids_are_rejected() {
        let mut widget = build_widget();
        let events = Rc::new(RefCell::new(Vec::new()));
        widget
            .register_plugin(Box::new(RecordingPlugin::new("p", events.clone())))
            .expect("first");
        assert!(
            widget
                .register_plugin(Box::new(RecordingPlugin::new("p", events)))
                .is_err()
        );
        assert!(widget.unregister_plugin("p"));
        assert_eq!(widget.plugin_count(), 0);
    }
}
