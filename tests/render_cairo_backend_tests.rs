#![cfg(feature = "cairo-backend")]

use std::time::Duration;

use cairo::{Context, Format, ImageSurface};
use chrono::{DateTime, TimeZone, Utc};
use timebar_rs::TimelineError;
use timebar_rs::api::{FixedClock, TimelineCollaborators, TimelineOptions, TimelineWidget};
use timebar_rs::core::TimeBarJson;
use timebar_rs::render::{CairoContextRenderer, CairoRenderer, SingleSurfaceProvider};

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid date")
}

fn options() -> TimelineOptions {
    TimelineOptions::default()
        .with_selected_date(date(2020, 3, 1))
        .with_timebar(TimeBarJson {
            name: "a".to_owned(),
            label: "Alpha".to_owned(),
            start_date: "2020-01-01".to_owned(),
            end_date: "2020-06-01".to_owned(),
            date_times: vec!["2020-02-01".to_owned(), "2020-04-01".to_owned()],
        })
}

fn build_widget(width: i32, height: i32) -> TimelineWidget<CairoRenderer> {
    let renderer = CairoRenderer::new(width, height).expect("renderer");
    let mut provider = SingleSurfaceProvider::new("timeline", renderer);
    TimelineWidget::new(
        &mut provider,
        "timeline",
        options(),
        TimelineCollaborators::new().with_clock(FixedClock(date(2020, 5, 1))),
    )
    .expect("widget init")
}

#[test]
fn cairo_renderer_rejects_invalid_surface_size() {
    let err = CairoRenderer::new(0, 480).expect_err("invalid width must fail");
    assert!(matches!(err, TimelineError::InvalidData(_)));
}

#[test]
fn cairo_renderer_draws_bars_details_and_markers() {
    let mut widget = build_widget(900, 120);
    assert_eq!(widget.geometry().width, 900.0);
    while widget.advance(Duration::from_millis(100)).expect("advance") {}

    let stats = widget.renderer().last_stats();
    assert_eq!(stats.rects_drawn, 1);
    assert_eq!(stats.markers_drawn, 2);
    // separator, two details and the axis baseline at minimum
    assert!(stats.lines_drawn >= 4);
    assert!(stats.texts_drawn >= 2);

    let mut png = Vec::new();
    widget.renderer().write_png(&mut png).expect("png");
    assert!(png.starts_with(&[0x89, b'P', b'N', b'G']));
}

#[test]
fn cairo_renderer_repaints_on_marker_move() {
    let mut widget = build_widget(600, 120);
    assert!(widget.drag_start());
    assert!(widget.drag_move(15.0).expect("move"));
    assert_eq!(widget.renderer().last_stats().markers_drawn, 2);
    assert!(widget.drag_end());
}

#[test]
fn cairo_renderer_can_draw_on_external_context() {
    let mut widget = build_widget(600, 120);
    let frame = widget.build_frame().expect("frame");

    let surface = ImageSurface::create(Format::ARgb32, 600, 120).expect("surface");
    let context = Context::new(&surface).expect("context");
    widget
        .renderer_mut()
        .render_on_cairo_context(&context, &frame)
        .expect("render on context");
    assert_eq!(widget.renderer().last_stats().rects_drawn, 1);
}
