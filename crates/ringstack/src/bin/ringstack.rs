//! ringstack CLI: run the ring-stack pipeline on a single image.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use ringstack::{
    Classification, Detection, Localization, PipelineConfig, Pose2, VisionPipeline,
};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "ringstack")]
#[command(about = "Detect and localize ring stacks in robot camera frames")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run detection on one image and report classification and geometry.
    Detect(DetectArgs),

    /// Print a default pipeline config as JSON.
    DefaultConfig {
        /// Which colored object the config should track.
        #[arg(long, value_enum, default_value_t = Target::Rings)]
        target: Target,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Target {
    Rings,
    Wobble,
}

#[derive(Debug, Args)]
struct DetectArgs {
    /// Path to the input image. Its size must match the configured frame.
    #[arg(long)]
    image: PathBuf,

    /// Pipeline config (JSON). Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Robot field pose as `x,y,heading_deg` for the field-frame estimate.
    #[arg(long, value_parser = parse_pose, allow_hyphen_values = true)]
    robot_pose: Option<Pose2>,

    /// Write the JSON report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Serialize)]
struct DetectReport {
    image: String,
    classification: Classification,
    ring_count: Option<u8>,
    detection: Option<Detection>,
    height_width_ratio: Option<f64>,
    localization: Option<Localization>,
    relative_pose: Option<Pose2>,
    field_pose: Option<Pose2>,
    bounds: String,
}

fn parse_pose(raw: &str) -> Result<Pose2, String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [x, y, heading] = parts.as_slice() else {
        return Err(format!("expected x,y,heading_deg, got '{raw}'"));
    };
    let num = |s: &str| {
        s.parse::<f64>()
            .map_err(|e| format!("invalid number '{s}': {e}"))
    };
    Ok(Pose2::new(
        num(*x)?,
        num(*y)?,
        num(*heading)?.to_radians(),
    ))
}

fn init_logging() {
    #[cfg(feature = "tracing")]
    {
        let _ = LogTracer::init();
        ringstack::core::init_tracing(false);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = ringstack::core::init_from_env("RINGSTACK_LOG", log::LevelFilter::Info);
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::DefaultConfig { target } => run_default_config(target),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_default_config(target: Target) -> CliResult<()> {
    let config = match target {
        Target::Rings => PipelineConfig::default(),
        Target::Wobble => PipelineConfig::wobble(),
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let config = match &args.config {
        Some(path) => PipelineConfig::load_json(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = VisionPipeline::new(config);

    info!("loading image {}", args.image.display());
    let img = image::open(&args.image)?;
    let classification = ringstack::frame::process_image(&pipeline, &img)?;

    let snapshot = pipeline.snapshot();
    let localization = pipeline.localization();
    let report = DetectReport {
        image: args.image.display().to_string(),
        classification,
        ring_count: classification.ring_count(),
        detection: snapshot.detection.clone(),
        height_width_ratio: snapshot.height_width_ratio(),
        localization,
        relative_pose: localization.map(|loc| loc.camera.relative_pose()),
        field_pose: args
            .robot_pose
            .as_ref()
            .and_then(|pose| localization.map(|loc| loc.field(pose))),
        bounds: pipeline.bounds_summary(),
    };
    info!("classification {:?}", classification);

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            println!("wrote report to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
