use chrono::{DateTime, Utc};

/// Map side of the widget: filters visible layers to the committed date.
pub trait MapCollaborator {
    fn filter_layers_by_date(&mut self, date: DateTime<Utc>);
}

/// Date input kept in sync with the committed date.
pub trait DatePickerControl {
    fn display_date(&mut self, date: DateTime<Utc>);
}

/// Source of "now" for the current-date marker and the default selection.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at one instant; used by tests and reproducible renders.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Outbound dependencies injected at construction. Both notification
/// targets are optional; a widget without them still tracks its own date.
pub struct TimelineCollaborators {
    pub map: Option<Box<dyn MapCollaborator>>,
    pub date_picker: Option<Box<dyn DatePickerControl>>,
    pub clock: Box<dyn Clock>,
}

impl Default for TimelineCollaborators {
    fn default() -> Self {
        Self {
            map: None,
            date_picker: None,
            clock: Box::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for TimelineCollaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelineCollaborators")
            .field("map", &self.map.is_some())
            .field("date_picker", &self.date_picker.is_some())
            .finish_non_exhaustive()
    }
}

impl TimelineCollaborators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_map(mut self, map: impl MapCollaborator + 'static) -> Self {
        self.map = Some(Box::new(map));
        self
    }

    #[must_use]
    pub fn with_date_picker(mut self, picker: impl DatePickerControl + 'static) -> Self {
        self.date_picker = Some(Box::new(picker));
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub(super) fn notify_committed(&mut self, date: DateTime<Utc>) {
        if let Some(map) = self.map.as_mut() {
            map.filter_layers_by_date(date);
        }
        if let Some(picker) = self.date_picker.as_mut() {
            picker.display_date(date);
        }
    }
}
