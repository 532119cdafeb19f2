use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use timebar_rs::api::{FixedClock, TimelineCollaborators, TimelineOptions, TimelineWidget};
use timebar_rs::core::primitives::parse_iso_datetime;
use timebar_rs::render::{SingleSurfaceProvider, SvgRenderer};

const CONTAINER_ID: &str = "timeline";
const USAGE: &str = "usage: render_timeline_svg --options <path> --output <path> [--width <px>] [--now <iso-date>] [--snapshot <path>]";

#[derive(Debug)]
struct CliArgs {
    options: PathBuf,
    output: PathBuf,
    width: f64,
    now: Option<String>,
    snapshot: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let _ = timebar_rs::telemetry::init_default_tracing();
    let args = parse_args()?;

    let raw = fs::read_to_string(&args.options)
        .map_err(|err| format!("failed to read `{}`: {err}", args.options.display()))?;
    let options = TimelineOptions::from_json_str(&raw).map_err(|err| err.to_string())?;

    let mut collaborators = TimelineCollaborators::new();
    if let Some(now) = args.now.as_deref() {
        let now = parse_iso_datetime(now).ok_or_else(|| format!("invalid --now date `{now}`"))?;
        collaborators = collaborators.with_clock(FixedClock(now));
    }

    let renderer = SvgRenderer::new(args.width).map_err(|err| err.to_string())?;
    let mut provider = SingleSurfaceProvider::new(CONTAINER_ID, renderer);
    let mut widget = TimelineWidget::new(&mut provider, CONTAINER_ID, options, collaborators)
        .map_err(|err| err.to_string())?;

    // Settle enter transitions so the document shows final geometry.
    while widget
        .advance(Duration::from_millis(100))
        .map_err(|err| err.to_string())?
    {}

    if let Some(path) = args.snapshot.as_ref() {
        let json = widget
            .snapshot_json_contract_v1_pretty()
            .map_err(|err| err.to_string())?;
        fs::write(path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display()))?;
    }

    let document = widget.into_renderer().into_document();
    fs::write(&args.output, document)
        .map_err(|err| format!("failed to write `{}`: {err}", args.output.display()))?;
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut options = None::<PathBuf>;
    let mut output = None::<PathBuf>;
    let mut width = 960.0;
    let mut now = None::<String>;
    let mut snapshot = None::<PathBuf>;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--options" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --options".to_owned())?;
                options = Some(PathBuf::from(value));
            }
            "--output" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--width" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --width".to_owned())?;
                width = value
                    .parse::<f64>()
                    .map_err(|err| format!("invalid --width `{value}`: {err}"))?;
            }
            "--now" => {
                now = Some(
                    args.next()
                        .ok_or_else(|| "missing value for --now".to_owned())?,
                );
            }
            "--snapshot" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --snapshot".to_owned())?;
                snapshot = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    let options = options.ok_or_else(|| format!("missing --options\n{USAGE}"))?;
    let output = output.ok_or_else(|| format!("missing --output\n{USAGE}"))?;
    Ok(CliArgs {
        options,
        output,
        width,
        now,
        snapshot,
    })
}
