use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shapedetect::{DetectorConfig, ShapeDetector};

#[derive(Parser)]
#[command(name = "shapedetect")]
#[command(about = "Detect, classify and measure shapes drawn on a plain background")]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect shapes in an image file
    Detect(DetectArgs),

    /// Open the upload window
    #[cfg(feature = "gui")]
    Gui,
}

#[derive(Args)]
struct DetectArgs {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Save the annotated image here
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON file with detector settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Discard contours enclosing less than this many square pixels
    #[arg(long)]
    min_area: Option<f64>,

    /// Polygon approximation tolerance as a fraction of the perimeter
    #[arg(long)]
    epsilon: Option<f64>,

    /// Print detections as JSON
    #[arg(long)]
    json: bool,

    /// Save debug outputs to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Detect(detect) => run_detect(detect),
        #[cfg(feature = "gui")]
        Command::Gui => shapedetect::gui::run().map_err(|e| anyhow::anyhow!("GUI failed: {}", e)),
    }
}

fn run_detect(args: DetectArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::default(),
    };
    if let Some(min_area) = args.min_area {
        config.min_area = min_area;
    }
    if let Some(epsilon) = args.epsilon {
        config.epsilon_fraction = epsilon;
    }

    tracing::info!(path = %args.image_path.display(), "loading image");
    let img = ImageReader::open(&args.image_path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;
    tracing::debug!(width = img.width(), height = img.height(), "image loaded");

    let mut detector = ShapeDetector::with_config(config);
    if let Some(debug_dir) = args.debug_out {
        detector = detector.with_debug(debug_dir);
    }

    let detection = detector.process(img)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection.shapes)?);
    } else {
        println!("=== Shape Detection Results ===");
        println!("Total shapes detected: {}", detection.shapes.len());
        for shape in &detection.shapes {
            println!(
                "  {} at ({}, {}) {}x{}",
                shape.annotation_text(),
                shape.bbox.x,
                shape.bbox.y,
                shape.bbox.width,
                shape.bbox.height
            );
            tracing::debug!(label = %shape.label, vertices = ?shape.polygon.points(), "approximated polygon");
        }
    }

    if let Some(output) = args.output {
        detection
            .annotated
            .save(&output)
            .map_err(|e| anyhow::anyhow!("Failed to save {}: {}", output.display(), e))?;
        tracing::info!(path = %output.display(), "saved annotated image");
    }

    Ok(())
}
