//! Runs the road KSI pipeline on a CSV file and writes the styled segments as GeoJSON.
//!
//! ```shell
//! cargo run -p ksi-map-cli -- roads.csv --road A12 --road A127 --no-low -o ksi.geojson
//! ```

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueHint};
use ksi_map::{FilterConfig, Pipeline, PipelineOptions, Selection, SeverityBucket, UserMessage};

#[derive(Parser, Debug)]
#[command(author, version, about = "Filter, smooth and color road KSI segments", long_about = None)]
struct Cli {
    /// CSV file with `geometry`, `Road Number`, `speed_limit` and `KSI Count` columns
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,

    /// Output GeoJSON path (stdout if omitted)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// JSON file with pipeline options (region, projected CRS, smoothing, thresholds)
    #[arg(long, value_hint = ValueHint::FilePath)]
    options: Option<PathBuf>,

    /// Road number to show, can be repeated. All roads if omitted
    #[arg(long = "road", value_name = "ROAD")]
    roads: Vec<String>,

    /// Speed limit to show, can be repeated. All speed limits if omitted
    #[arg(long = "speed", value_name = "SPEED")]
    speeds: Vec<u32>,

    /// Hide the low severity bucket (KSI 1–4 by default)
    #[arg(long)]
    no_low: bool,

    /// Hide the moderate severity bucket (KSI 5–7 by default)
    #[arg(long)]
    no_moderate: bool,

    /// Hide the high severity bucket (KSI 8+ by default)
    #[arg(long)]
    no_high: bool,

    /// Print road numbers and speed limits available for filtering and exit
    #[arg(long)]
    list_choices: bool,
}

impl Cli {
    fn filter(&self) -> FilterConfig {
        let roads = if self.roads.is_empty() {
            Selection::All
        } else {
            Selection::only(self.roads.iter().map(|road| road.trim().to_string()))
        };
        let speeds = if self.speeds.is_empty() {
            Selection::All
        } else {
            Selection::only(self.speeds.iter().copied())
        };

        let hidden = [
            (SeverityBucket::Low, self.no_low),
            (SeverityBucket::Moderate, self.no_moderate),
            (SeverityBucket::High, self.no_high),
        ];
        let buckets = hidden
            .into_iter()
            .filter(|(_, hide)| !hide)
            .map(|(bucket, _)| bucket);

        FilterConfig::default()
            .with_roads(roads)
            .with_speeds(speeds)
            .with_buckets(buckets)
    }

    fn pipeline_options(&self) -> Result<PipelineOptions> {
        let Some(path) = &self.options else {
            return Ok(PipelineOptions::default());
        };

        let file = File::open(path)
            .with_context(|| format!("failed to open options file {}", path.display()))?;
        PipelineOptions::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid options file {}", path.display()))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let pipeline = Pipeline::new(cli.pipeline_options()?)?;

    let file = File::open(&cli.input)
        .with_context(|| format!("failed to open {}", cli.input.display()))?;
    let reader = BufReader::new(file);

    if cli.list_choices {
        let data = match pipeline.prepare(reader) {
            Ok(data) => data,
            Err(err) => fail(&UserMessage::from(&err)),
        };
        println!("{}", serde_json::to_string_pretty(&data.choices)?);
        return Ok(());
    }

    let display = pipeline.run_for_display(reader, &cli.filter());
    match &display.message {
        Some(message) if message.is_error() => fail(message),
        Some(message) => log::warn!("{message}"),
        None => {}
    }

    let Some(map) = display.map else {
        return Ok(());
    };

    let geojson = map.to_geojson_string()?;
    match &cli.output {
        Some(path) => std::fs::write(path, geojson)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => writeln!(std::io::stdout().lock(), "{geojson}")?,
    }

    log::info!("Wrote {} road segments", map.segments.len());
    Ok(())
}

fn fail(message: &UserMessage) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}
