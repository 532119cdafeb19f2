//! Adaptive time-axis tick selection.
//!
//! The visible span is reduced to a density ratio,
//! `scaling = span_ms / (width_px * SCALING_DENOMINATOR)`, which then picks a
//! calendar unit, a step and a label format from a fixed threshold table
//! (first match wins, upper bounds inclusive).

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, Timelike, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::primitives::millis_to_datetime;

pub const SCALING_DENOMINATOR: f64 = 4e7;
pub const MONTH_STEP_CANDIDATES: [u32; 6] = [1, 2, 3, 4, 6, 12];
pub const DEFAULT_MAX_TICKS: usize = 200;

const MAX_BOUNDARY_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickFormat {
    /// `2020`
    Year,
    /// `Mar 20`
    MonthYear,
    /// `01/03/20`
    DayMonthYear,
    /// `01 PM`
    Hour12,
}

impl TickFormat {
    #[must_use]
    pub fn pattern(self) -> &'static str {
        match self {
            Self::Year => "%Y",
            Self::MonthYear => "%b %y",
            Self::DayMonthYear => "%d/%m/%y",
            Self::Hour12 => "%I %p",
        }
    }

    #[must_use]
    pub fn format(self, time: DateTime<Utc>) -> String {
        time.format(self.pattern()).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSelection {
    pub scaling: f64,
    pub unit: TickUnit,
    pub step: u32,
    pub format: TickFormat,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub time: DateTime<Utc>,
    pub label: String,
}

#[must_use]
pub fn scaling_ratio(span_ms: f64, width_px: f64) -> f64 {
    span_ms / (width_px * SCALING_DENOMINATOR)
}

#[must_use]
pub fn select_ticks(span_ms: f64, width_px: f64) -> TickSelection {
    select_for_scaling(scaling_ratio(span_ms, width_px))
}

#[must_use]
pub fn select_for_scaling(scaling: f64) -> TickSelection {
    let (unit, raw_step, format) = if scaling > 12.0 {
        (TickUnit::Years, (scaling / 12.0).round(), TickFormat::Year)
    } else if scaling > 1.0 {
        (
            TickUnit::Months,
            f64::from(nearest_month_step(scaling)),
            TickFormat::MonthYear,
        )
    } else if scaling > 1.0 / 7.0 {
        (TickUnit::Weeks, (scaling * 4.3).round(), TickFormat::DayMonthYear)
    } else if scaling > 1.0 / 365.0 {
        (TickUnit::Days, (scaling * 30.0).round(), TickFormat::DayMonthYear)
    } else {
        (TickUnit::Hours, (scaling * 730.0).round(), TickFormat::Hour12)
    };

    TickSelection {
        scaling,
        unit,
        step: clamp_step(raw_step),
        format,
    }
}

/// Closest candidate to `scaling`; on equal distance the earlier candidate wins.
#[must_use]
pub fn nearest_month_step(scaling: f64) -> u32 {
    MONTH_STEP_CANDIDATES
        .iter()
        .copied()
        .min_by_key(|candidate| OrderedFloat((f64::from(*candidate) - scaling).abs()))
        .unwrap_or(1)
}

fn clamp_step(raw: f64) -> u32 {
    if !raw.is_finite() || raw < 1.0 {
        return 1;
    }
    raw.min(f64::from(u32::MAX)) as u32
}

/// Unit boundaries inside `[start_ms, end_ms]` whose unit number is a multiple
/// of the selection step, capped at `max_ticks`.
#[must_use]
pub fn generate_ticks(
    selection: TickSelection,
    start_ms: f64,
    end_ms: f64,
    max_ticks: usize,
) -> Vec<AxisTick> {
    let (Some(start), Some(end)) = (millis_to_datetime(start_ms), millis_to_datetime(end_ms))
    else {
        return Vec::new();
    };
    if end < start || max_ticks == 0 {
        return Vec::new();
    }

    let Some(mut cursor) = ceil_to_unit(start, selection.unit) else {
        return Vec::new();
    };
    let step = selection.step.max(1);
    let mut ticks = Vec::new();
    for _ in 0..MAX_BOUNDARY_STEPS {
        if cursor > end || ticks.len() >= max_ticks {
            break;
        }
        if unit_number(cursor, selection.unit).rem_euclid(i64::from(step)) == 0 {
            ticks.push(AxisTick {
                time: cursor,
                label: selection.format.format(cursor),
            });
        }
        match advance_unit(cursor, selection.unit) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    ticks
}

fn floor_to_unit(time: DateTime<Utc>, unit: TickUnit) -> Option<DateTime<Utc>> {
    let date = time.date_naive();
    let floored = match unit {
        TickUnit::Years => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_hms_opt(0, 0, 0)?,
        TickUnit::Months => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_hms_opt(0, 0, 0)?
        }
        TickUnit::Weeks => {
            let back = i64::from(date.weekday().num_days_from_sunday());
            (date - Duration::days(back)).and_hms_opt(0, 0, 0)?
        }
        TickUnit::Days => date.and_hms_opt(0, 0, 0)?,
        TickUnit::Hours => date.and_hms_opt(time.hour(), 0, 0)?,
    };
    Some(floored.and_utc())
}

fn ceil_to_unit(time: DateTime<Utc>, unit: TickUnit) -> Option<DateTime<Utc>> {
    let floored = floor_to_unit(time, unit)?;
    if floored < time {
        advance_unit(floored, unit)
    } else {
        Some(floored)
    }
}

fn advance_unit(time: DateTime<Utc>, unit: TickUnit) -> Option<DateTime<Utc>> {
    match unit {
        TickUnit::Years => time.checked_add_months(Months::new(12)),
        TickUnit::Months => time.checked_add_months(Months::new(1)),
        TickUnit::Weeks => time.checked_add_signed(Duration::weeks(1)),
        TickUnit::Days => time.checked_add_signed(Duration::days(1)),
        TickUnit::Hours => time.checked_add_signed(Duration::hours(1)),
    }
}

fn unit_number(time: DateTime<Utc>, unit: TickUnit) -> i64 {
    match unit {
        TickUnit::Years => i64::from(time.year()),
        TickUnit::Months => i64::from(time.month0()),
        TickUnit::Weeks => {
            let jan_first = NaiveDate::from_ymd_opt(time.year(), 1, 1)
                .map_or(0, |date| date.weekday().num_days_from_sunday());
            i64::from((time.ordinal0() + jan_first) / 7)
        }
        TickUnit::Days => i64::from(time.day0()),
        TickUnit::Hours => i64::from(time.hour()),
    }
}
