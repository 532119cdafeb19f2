use chrono::{DateTime, TimeZone, Utc};
use timebar_rs::core::primitives::datetime_to_millis;
use timebar_rs::core::tick_policy::{
    SCALING_DENOMINATOR, generate_ticks, scaling_ratio, select_for_scaling, select_ticks,
};
use timebar_rs::core::{TickFormat, TickUnit};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn unit_at(scaling: f64) -> TickUnit {
    select_for_scaling(scaling).unit
}

#[test]
fn threshold_upper_bounds_are_inclusive() {
    assert_eq!(unit_at(12.0), TickUnit::Months);
    assert_eq!(unit_at(1.0), TickUnit::Weeks);
    assert_eq!(unit_at(1.0 / 7.0), TickUnit::Days);
    assert_eq!(unit_at(1.0 / 365.0), TickUnit::Hours);
}

#[test]
fn values_just_above_thresholds_pick_the_coarser_unit() {
    let nudge = 1e-9;
    assert_eq!(unit_at(12.0 + nudge), TickUnit::Years);
    assert_eq!(unit_at(1.0 + nudge), TickUnit::Months);
    assert_eq!(unit_at(1.0 / 7.0 + nudge), TickUnit::Weeks);
    assert_eq!(unit_at(1.0 / 365.0 + nudge), TickUnit::Days);
}

#[test]
fn formats_follow_units() {
    assert_eq!(select_for_scaling(30.0).format, TickFormat::Year);
    assert_eq!(select_for_scaling(3.0).format, TickFormat::MonthYear);
    assert_eq!(select_for_scaling(0.5).format, TickFormat::DayMonthYear);
    assert_eq!(select_for_scaling(0.05).format, TickFormat::DayMonthYear);
    assert_eq!(select_for_scaling(0.001).format, TickFormat::Hour12);
}

#[test]
fn steps_scale_with_density() {
    assert_eq!(select_for_scaling(30.0).step, 3);
    assert_eq!(select_for_scaling(2.5).step, 2);
    assert_eq!(select_for_scaling(7.5).step, 6);
    assert_eq!(select_for_scaling(0.5).step, 2);
    assert_eq!(select_for_scaling(0.1).step, 3);
    assert_eq!(select_for_scaling(0.002).step, 1);
}

#[test]
fn scaling_ratio_uses_width_and_fixed_denominator() {
    let span = 1000.0 * SCALING_DENOMINATOR;
    assert_eq!(scaling_ratio(span, 1000.0), 1.0);
    assert_eq!(select_ticks(span, 1000.0).unit, TickUnit::Weeks);
    assert_eq!(select_ticks(span * 2.0, 1000.0).unit, TickUnit::Months);
}

#[test]
fn zero_width_selects_coarsest_unit() {
    let selection = select_ticks(1.0, 0.0);
    assert_eq!(selection.unit, TickUnit::Years);
    assert!(selection.step >= 1);
}

#[test]
fn year_ticks_land_on_january_first() {
    let selection = select_for_scaling(13.0);
    let ticks = generate_ticks(
        selection,
        datetime_to_millis(date(2018, 6, 1)),
        datetime_to_millis(date(2022, 6, 1)),
        50,
    );
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["2019", "2020", "2021", "2022"]);
    assert!(ticks.iter().all(|tick| tick.time == date(tick.label.parse().expect("year"), 1, 1)));
}

#[test]
fn day_ticks_skip_to_step_multiples_within_each_month() {
    let selection = select_for_scaling(0.1);
    assert_eq!(selection.unit, TickUnit::Days);
    assert_eq!(selection.step, 3);
    let ticks = generate_ticks(
        selection,
        datetime_to_millis(date(2020, 3, 1)),
        datetime_to_millis(date(2020, 3, 10)),
        50,
    );
    let labels: Vec<&str> = ticks.iter().map(|tick| tick.label.as_str()).collect();
    assert_eq!(labels, vec!["01/03/20", "04/03/20", "07/03/20", "10/03/20"]);
}

#[test]
fn inverted_or_non_finite_ranges_yield_no_ticks() {
    let selection = select_for_scaling(3.0);
    assert!(generate_ticks(selection, 10.0, 5.0, 50).is_empty());
    assert!(generate_ticks(selection, f64::NAN, 5.0, 50).is_empty());
    assert!(generate_ticks(selection, 0.0, 1e12, 0).is_empty());
}
