use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::primitives::{format_iso_datetime, parse_iso_datetime};
use crate::error::{TimelineError, TimelineResult};

/// Widget-local identity of a stored time bar.
///
/// Ids are handed out monotonically and never reused, so two bars with the
/// same `name` still reconcile as distinct elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BarId(u64);

impl BarId {
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// How unparseable date strings are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DateValidationPolicy {
    /// Reject the input with `TimelineError::InvalidDate`.
    #[default]
    Strict,
    /// Keep the value as unparseable; it renders nowhere.
    Lenient,
}

impl DateValidationPolicy {
    pub fn parse(self, field: &'static str, raw: &str) -> TimelineResult<Option<DateTime<Utc>>> {
        match parse_iso_datetime(raw) {
            Some(parsed) => Ok(Some(parsed)),
            None => match self {
                Self::Strict => Err(TimelineError::InvalidDate {
                    field,
                    raw: raw.to_owned(),
                }),
                Self::Lenient => {
                    warn!(field, raw, "keeping unparseable date");
                    Ok(None)
                }
            },
        }
    }
}

/// Wire shape of a time bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBarJson {
    pub name: String,
    pub label: String,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub date_times: Vec<String>,
}

/// One lane of the chart: a named range with discrete event timestamps.
///
/// A `None` date is a value that could not be parsed under
/// `DateValidationPolicy::Lenient`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBar {
    pub name: String,
    pub label: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub date_times: Vec<Option<DateTime<Utc>>>,
}

impl TimeBar {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        label: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        date_times: impl IntoIterator<Item = DateTime<Utc>>,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            start_date: Some(start_date),
            end_date: Some(end_date),
            date_times: date_times.into_iter().map(Some).collect(),
        }
    }

    pub fn from_json(json: &TimeBarJson, policy: DateValidationPolicy) -> TimelineResult<Self> {
        Self::parse(
            &json.name,
            &json.label,
            &json.start_date,
            &json.end_date,
            json.date_times.iter(),
            policy,
        )
    }

    pub fn parse<I, S>(
        name: &str,
        label: &str,
        start_date: &str,
        end_date: &str,
        date_times: I,
        policy: DateValidationPolicy,
    ) -> TimelineResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let start_date = policy.parse("startDate", start_date)?;
        let end_date = policy.parse("endDate", end_date)?;
        let date_times = date_times
            .into_iter()
            .map(|raw| policy.parse("dateTimes", raw.as_ref()))
            .collect::<TimelineResult<Vec<_>>>()?;

        Ok(Self {
            name: name.to_owned(),
            label: label.to_owned(),
            start_date,
            end_date,
            date_times,
        })
    }

    /// Serializes back to the wire shape; unparseable dates become `""`.
    #[must_use]
    pub fn to_json(&self) -> TimeBarJson {
        let render = |date: Option<DateTime<Utc>>| date.map(format_iso_datetime).unwrap_or_default();
        TimeBarJson {
            name: self.name.clone(),
            label: self.label.clone(),
            start_date: render(self.start_date),
            end_date: render(self.end_date),
            date_times: self.date_times.iter().copied().map(render).collect(),
        }
    }
}

/// Ordered time bar storage. Position defines the lane index.
#[derive(Debug, Clone, Default)]
pub struct TimeBarCollection {
    entries: Vec<(BarId, TimeBar)>,
    next_id: u64,
}

impl TimeBarCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bar: TimeBar) -> BarId {
        let id = BarId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, bar));
        id
    }

    pub fn remove_at(&mut self, index: usize) -> TimelineResult<TimeBar> {
        if index >= self.entries.len() {
            return Err(TimelineError::TimeBarIndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index).1)
    }

    /// Removes every bar called `name`; returns how many were removed.
    pub fn remove_by_name(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(_, bar)| bar.name != name);
        before - self.entries.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TimeBar> {
        self.entries.get(index).map(|(_, bar)| bar)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimeBar> {
        self.entries.iter().map(|(_, bar)| bar)
    }

    pub fn entries(&self) -> impl Iterator<Item = (BarId, &TimeBar)> {
        self.entries.iter().map(|(id, bar)| (*id, bar))
    }

    pub fn ids(&self) -> impl Iterator<Item = BarId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    /// Earliest start and latest end over all parseable bar dates.
    #[must_use]
    pub fn date_extent(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let start = self.iter().filter_map(|bar| bar.start_date).min()?;
        let end = self.iter().filter_map(|bar| bar.end_date).max()?;
        Some((start, end))
    }
}
