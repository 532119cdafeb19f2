use chrono::{DateTime, Utc};
use tracing::debug;

use crate::core::{BarId, TimeBar, TimeBarCollection, TimeBarJson};
use crate::error::TimelineResult;
use crate::extensions::TimelineEvent;
use crate::render::Renderer;

use super::TimelineWidget;

impl<R: Renderer> TimelineWidget<R> {
    /// Appends a bar from its wire shape, parsed with the configured date
    /// validation policy.
    pub fn add_time_bar_json(&mut self, json: &TimeBarJson) -> TimelineResult<BarId> {
        let bar = TimeBar::from_json(json, self.options.date_validation)?;
        self.push_time_bar(bar)
    }

    /// Appends a bar from raw date strings.
    pub fn add_time_bar<I, S>(
        &mut self,
        name: &str,
        label: &str,
        start_date: &str,
        end_date: &str,
        date_times: I,
    ) -> TimelineResult<BarId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bar = TimeBar::parse(
            name,
            label,
            start_date,
            end_date,
            date_times,
            self.options.date_validation,
        )?;
        self.push_time_bar(bar)
    }

    /// Appends an already parsed bar at the last lane.
    pub fn push_time_bar(&mut self, bar: TimeBar) -> TimelineResult<BarId> {
        let name = bar.name.clone();
        let id = self.timebars.push(bar);
        debug!(id = id.get(), name = %name, lane = self.timebars.len() - 1, "time bar added");
        self.after_timebars_changed()?;
        Ok(id)
    }

    /// Removes the bar at lane `index`; later lanes move up by one.
    pub fn remove_time_bar(&mut self, index: usize) -> TimelineResult<TimeBar> {
        let removed = self.timebars.remove_at(index)?;
        debug!(index, name = %removed.name, "time bar removed");
        self.after_timebars_changed()?;
        Ok(removed)
    }

    /// Removes every bar called `name`. Returns the number removed; nothing is
    /// redrawn when no bar matched.
    pub fn remove_time_bar_by_name(&mut self, name: &str) -> TimelineResult<usize> {
        let removed = self.timebars.remove_by_name(name);
        if removed == 0 {
            debug!(name, "no time bar matched for removal");
            return Ok(0);
        }
        debug!(name, removed, "time bars removed by name");
        self.after_timebars_changed()?;
        Ok(removed)
    }

    #[must_use]
    pub fn time_bars(&self) -> &TimeBarCollection {
        &self.timebars
    }

    /// Committed selected date.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.selected_date
    }

    /// In-gesture date; equals `date()` while no drag is active.
    #[must_use]
    pub fn dragged_date(&self) -> DateTime<Utc> {
        self.dragged_date
    }

    /// Commits `date` programmatically and redraws. The map collaborator is
    /// not notified; only drag ends notify it.
    pub fn set_date(&mut self, date: DateTime<Utc>) -> TimelineResult<()> {
        self.selected_date = date;
        self.dragged_date = date;
        debug!(date = %date, "selected date set");
        self.emit_date_committed();
        self.redraw()
    }

    /// Parses and commits `raw`. Under the lenient policy an unparseable
    /// value leaves the selection unchanged.
    pub fn set_date_str(&mut self, raw: &str) -> TimelineResult<()> {
        match self.options.date_validation.parse("selectedDate", raw)? {
            Some(date) => self.set_date(date),
            None => Ok(()),
        }
    }

    fn after_timebars_changed(&mut self) -> TimelineResult<()> {
        let timebars_len = self.timebars.len();
        self.redraw()?;
        self.emit_plugin_event(TimelineEvent::TimeBarsChanged { timebars_len });
        Ok(())
    }
}
