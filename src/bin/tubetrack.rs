use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tubetrack::tracker::{CropRegion, Tube};
use tubetrack::{DetectionSource, JsonDetectionSource, TrackerPipeline, TrackingConfig};

/// Track segmented instances across frames and write a tube manifest.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the config JSON file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Per-frame detections JSON file
    #[arg(long)]
    detections: PathBuf,
    /// Output manifest path
    #[arg(long, default_value = "tubes.json")]
    output: PathBuf,
    /// Recording name used in tube file names
    #[arg(long, default_value = "recording")]
    recording: String,
    /// Override the minimum tube length from the config
    #[arg(long)]
    min_tube_length: Option<u32>,
    /// Process at most this many frames
    #[arg(long)]
    stop_after_frame: Option<u32>,
}

#[derive(Serialize)]
struct TubeEntry {
    #[serde(flatten)]
    tube: Tube,
    crop: CropRegion,
    path: String,
}

#[derive(Serialize)]
struct Manifest {
    recording: String,
    frame_count: usize,
    frame_rate: u32,
    export_enabled: bool,
    tubes: Vec<TubeEntry>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => TrackingConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TrackingConfig::default(),
    };
    if let Some(min) = args.min_tube_length {
        cfg.min_tube_length = min;
    }
    if args.stop_after_frame.is_some() {
        cfg.stop_after_frame = args.stop_after_frame;
    }

    let source = JsonDetectionSource::from_file(&args.detections)
        .with_context(|| format!("loading detections {}", args.detections.display()))?;
    let (width, height) = source.frame_size();

    let summary = TrackerPipeline::new(source, &cfg).run()?;

    let tubes = summary
        .tubes
        .into_iter()
        .map(|tube| TubeEntry {
            crop: tube.crop(cfg.tube_padding, width, height),
            path: format!("{}/{}_tube_{}.mp4", tube.label, args.recording, tube.instance_id),
            tube,
        })
        .collect::<Vec<_>>();

    let manifest = Manifest {
        recording: args.recording,
        frame_count: summary.frame_count,
        frame_rate: cfg.frame_rate,
        export_enabled: summary.export_enabled,
        tubes,
    };
    fs::write(&args.output, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("writing {}", args.output.display()))?;
    info!(tubes = manifest.tubes.len(), output = %args.output.display(), "manifest written");

    Ok(())
}
