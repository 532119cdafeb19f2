use std::time::Duration;

use approx::assert_relative_eq;
use chrono::{DateTime, TimeZone, Utc};
use timebar_rs::api::{
    FixedClock, NowMarkerPolicy, SCENE_SNAPSHOT_JSON_SCHEMA_V1, SceneSnapshot,
    TimelineCollaborators, TimelineOptions, TimelineWidget,
};
use timebar_rs::core::{DateValidationPolicy, TimeBarJson};
use timebar_rs::render::{
    HeadlessDocument, LineStrokeStyle, MarkerKind, NullRenderer, SceneLayerKind,
    SingleSurfaceProvider, SvgRenderer,
};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn half_year_bar(label: &str) -> TimeBarJson {
    TimeBarJson {
        name: "h1".to_owned(),
        label: label.to_owned(),
        start_date: "2020-01-01".to_owned(),
        end_date: "2020-06-30".to_owned(),
        date_times: vec!["2020-03-01".to_owned()],
    }
}

fn build_widget(options: TimelineOptions) -> TimelineWidget<NullRenderer> {
    let mut document = HeadlessDocument::new().with_container("timeline", 1000.0);
    TimelineWidget::new(
        &mut document,
        "timeline",
        options,
        TimelineCollaborators::new().with_clock(FixedClock(date(2020, 4, 1))),
    )
    .expect("widget init")
}

#[test]
fn single_bar_frame_has_expected_geometry() {
    let mut widget = build_widget(
        TimelineOptions::default()
            .with_selected_date(date(2020, 2, 1))
            .with_timebar(half_year_bar("First half")),
    );
    assert_eq!(widget.geometry().height, 29.0);
    assert_eq!(widget.geometry().chart_height, 49.0);
    while widget.advance(Duration::from_millis(100)).expect("advance") {}

    let frame = widget.renderer().last_frame().expect("frame");
    assert_eq!(frame.viewport.width, 1000.0);
    assert_eq!(frame.viewport.height, 49.0);
    assert_eq!(frame.container_height, 49.0);

    let bars = frame.layer(SceneLayerKind::Bars).expect("bars");
    assert_eq!(bars.rects.len(), 1);
    let rect = bars.rects[0];
    assert_relative_eq!(rect.x, 0.0);
    assert_relative_eq!(rect.width, 1000.0);
    assert_relative_eq!(rect.y, 4.0);
    assert_relative_eq!(rect.height, 20.0);
    assert_relative_eq!(rect.border_color.alpha, 1.0);

    let details = frame.layer(SceneLayerKind::Details).expect("details");
    assert_eq!(details.lines.len(), 1);
    assert_relative_eq!(details.lines[0].x1, 60.0 / 181.0 * 1000.0, epsilon = 1e-9);
    assert_relative_eq!(details.lines[0].y1, 4.0);
    assert_relative_eq!(details.lines[0].y2, 24.0);

    let lanes = frame.layer(SceneLayerKind::Lanes).expect("lanes");
    assert_eq!(lanes.lines.len(), 1);
    assert_relative_eq!(lanes.lines[0].y1, 29.0);

    let labels = frame.layer(SceneLayerKind::Labels).expect("labels");
    assert_eq!(labels.texts.len(), 1);
    assert_eq!(labels.texts[0].text, "First half");
    assert_relative_eq!(labels.texts[0].x, 4.0);
    assert_relative_eq!(labels.texts[0].y, 14.5);

    let axis = frame.layer(SceneLayerKind::Axis).expect("axis");
    assert!(!axis.texts.is_empty());
    assert_eq!(axis.texts.len(), widget.axis_ticks().len());
    assert!(axis.texts.iter().all(|text| text.y == 29.0 + 12.0));

    let selected = frame.marker(MarkerKind::Selected).expect("selected");
    assert_relative_eq!(selected.x, 31.0 / 181.0 * 1000.0, epsilon = 1e-9);
    assert_eq!(selected.stroke_style, LineStrokeStyle::Solid);
    assert_eq!(selected.bottom, 29.0);
    let now = frame.marker(MarkerKind::Now).expect("now");
    assert_relative_eq!(now.x, 91.0 / 181.0 * 1000.0, epsilon = 1e-9);
    assert_eq!(now.stroke_style, LineStrokeStyle::Dashed);
}

#[test]
fn entering_bar_starts_collapsed_and_transparent() {
    let widget = build_widget(TimelineOptions::default().with_timebar(half_year_bar("H1")));
    assert!(widget.is_animating());

    let frame = widget.renderer().last_frame().expect("frame");
    let rect = frame.layer(SceneLayerKind::Bars).expect("bars").rects[0];
    assert_eq!(rect.height, 0.0);
    assert_eq!(rect.border_color.alpha, 0.0);
    assert_relative_eq!(rect.fill_color.alpha, 0.35);
}

#[test]
fn markers_outside_the_visible_range_are_omitted() {
    let mut widget = build_widget(
        TimelineOptions::default()
            .with_selected_date(date(2020, 2, 1))
            .with_timebar(half_year_bar("H1")),
    );
    widget
        .zoom_date(date(2020, 5, 1), date(2020, 6, 1))
        .expect("zoom date");
    let frame = widget.renderer().last_frame().expect("frame");
    assert!(frame.marker(MarkerKind::Selected).is_none());
    assert!(frame.marker(MarkerKind::Now).is_none());
    assert!(!widget.pointer_down(0.0, 10.0).expect("no marker to hit"));
}

#[test]
fn svg_document_reflects_the_widget_frame() {
    let renderer = SvgRenderer::new(640.0).expect("svg renderer");
    let mut provider = SingleSurfaceProvider::new("timeline", renderer);
    let mut widget = TimelineWidget::new(
        &mut provider,
        "timeline",
        TimelineOptions::default()
            .with_selected_date(date(2020, 2, 1))
            .with_timebar(half_year_bar("R&D")),
        TimelineCollaborators::new().with_clock(FixedClock(date(2020, 4, 1))),
    )
    .expect("widget init");
    while widget.advance(Duration::from_millis(100)).expect("advance") {}

    let document = widget.into_renderer().into_document();
    assert!(document.starts_with("<svg"));
    assert!(document.contains(r#"width="640" height="49""#));
    assert!(document.contains(r#"<g class="bars">"#));
    assert!(document.contains("<rect"));
    assert!(document.contains(">R&amp;D</text>"));
    assert!(document.contains(r#"<g class="marker-selected">"#));
    assert!(document.contains("<circle"));
    assert!(document.contains(r#"<g class="marker-now">"#));
    assert!(document.contains(r#"stroke-dasharray="4 3""#));
}

#[test]
fn provider_hands_out_its_surface_once() {
    let renderer = SvgRenderer::new(640.0).expect("svg renderer");
    let mut provider = SingleSurfaceProvider::new("timeline", renderer);
    let _first = TimelineWidget::new(
        &mut provider,
        "timeline",
        TimelineOptions::default(),
        TimelineCollaborators::new().with_clock(FixedClock(date(2020, 4, 1))),
    )
    .expect("first widget");
    assert!(
        TimelineWidget::new(
            &mut provider,
            "timeline",
            TimelineOptions::default(),
            TimelineCollaborators::new(),
        )
        .is_err()
    );
}

#[test]
fn snapshot_contract_round_trips() {
    let mut widget = build_widget(
        TimelineOptions::default()
            .with_date_validation(DateValidationPolicy::Lenient)
            .with_timebar(half_year_bar("H1")),
    );
    widget
        .add_time_bar("odd", "Odd", "nope", "2020-05-01", ["2020-04-01"])
        .expect("lenient add");
    widget.advance(Duration::from_secs(1)).expect("settle");

    let snapshot = widget.snapshot();
    assert_eq!(snapshot.bars.len(), 2);
    assert_eq!(snapshot.bars[1].x, None);
    assert_eq!(snapshot.selected_date, "2020-04-01T00:00:00.000Z");

    let json = widget.snapshot_json_contract_v1_pretty().expect("contract");
    assert!(json.contains(&format!("\"schema_version\": {SCENE_SNAPSHOT_JSON_SCHEMA_V1}")));
    let parsed = SceneSnapshot::from_json_compat_str(&json).expect("contract parse");
    assert_eq!(parsed, snapshot);

    let bare = serde_json::to_string(&snapshot).expect("bare json");
    let parsed = SceneSnapshot::from_json_compat_str(&bare).expect("bare parse");
    assert_eq!(parsed, snapshot);

    let future = json.replace(
        &format!("\"schema_version\": {SCENE_SNAPSHOT_JSON_SCHEMA_V1}"),
        "\"schema_version\": 99",
    );
    assert!(SceneSnapshot::from_json_compat_str(&future).is_err());
}

#[test]
fn options_json_drives_construction() {
    let raw = r#"{
        "selectedDate": "2020-03-15",
        "chartMargins": { "top": 5, "left": 40 },
        "barHeight": 10,
        "barMargin": 2,
        "dateValidation": "lenient",
        "nowMarker": "refreshOnRedraw",
        "timebars": [
            { "name": "a", "label": "A", "startDate": "2020-01-01", "endDate": "2020-12-31",
              "dateTimes": ["2020-02-01", "bogus"] }
        ]
    }"#;
    let options = TimelineOptions::from_json_str(raw).expect("options");
    assert_eq!(options.now_marker, NowMarkerPolicy::RefreshOnRedraw);

    let widget = build_widget(options.clone());
    assert_eq!(widget.date(), date(2020, 3, 15));
    assert_eq!(widget.geometry().lane_height, 15.0);
    assert_eq!(widget.geometry().width, 960.0);
    assert_eq!(widget.geometry().chart_height, 15.0 + 5.0 + 20.0);
    let snapshot = widget.snapshot();
    let details = &snapshot.bars[0].details;
    assert_eq!(details.len(), 2);
    assert!(details[0].is_some());
    assert_eq!(details[1], None);

    let round_trip =
        TimelineOptions::from_json_str(&options.to_json_pretty().expect("json")).expect("parse");
    assert_eq!(round_trip, options);
}

#[test]
fn invalid_options_are_rejected_before_lookup() {
    assert!(TimelineOptions::from_json_str(r#"{ "barHeight": 0 }"#).is_err());
    assert!(TimelineOptions::from_json_str(r#"{ "chartMargins": { "top": -1 } }"#).is_err());
    assert!(TimelineOptions::from_json_str(r#"{ "wheelZoomStep": 0 }"#).is_err());
    assert!(TimelineOptions::from_json_str("[]").is_err());
}
