//! Batch driver: crop every plate out of every scanner image in a folder.
//!
//! One image's failure is logged and skipped; the rest of the batch keeps
//! going.

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use platescan::core::init_with_level;
use platescan::hough::HoughDetector;
use platescan::pipeline::{self, PipelineParams};
use platescan::BoundsPolicy;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp"];

#[derive(Parser, Debug)]
#[command(
    name = "platescan",
    about = "Crop scanned culture-plate mosaics into grid-ordered plate images"
)]
struct Cli {
    /// Input image file, or a folder whose images are processed in turn.
    input: PathBuf,

    /// Output folder for cropped plates.
    #[arg(short, long, default_value = "cropped")]
    output: PathBuf,

    /// Plate radius in pixels.
    #[arg(short, long, default_value_t = 522)]
    radius: u32,

    /// Also write one composite mosaic per input image.
    #[arg(long)]
    composite: bool,

    /// Shrink crops at the image border instead of failing the image.
    #[arg(long)]
    clamp: bool,

    /// Verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

fn collect_inputs(input: &Path) -> std::io::Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(input)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_image_file(p))
        .collect();
    files.sort();
    Ok(files)
}

fn process_image(path: &Path, cli: &Cli, params: &PipelineParams) -> Result<usize, Box<dyn Error>> {
    let img = image::ImageReader::open(path)?.decode()?.to_rgb8();
    let src = pipeline::raster_from_rgb(&img);

    let detector = HoughDetector::new(params.hough());
    let (grid, crops) = pipeline::crop_plates(&src.view(), &detector, params)?;
    log::info!(
        "{}: {} plates in a {}x{} grid",
        path.display(),
        crops.len(),
        grid.shape.rows,
        grid.shape.cols
    );

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("plate");
    for (i, crop) in crops.iter().enumerate() {
        let out = cli.output.join(format!("{stem}-{}.png", i + 1));
        let rgb = pipeline::rgb_from_raster(crop).ok_or("crop is not a 3-channel raster")?;
        rgb.save(&out)?;
        log::debug!("wrote {}", out.display());
    }

    if cli.composite {
        let canvas = platescan::compose_grid(&crops, grid.shape, params.radius)?;
        let rgb = pipeline::rgb_from_raster(&canvas).ok_or("composite is not 3-channel")?;
        let out = cli.output.join(format!("{stem}-composite.png"));
        rgb.save(&out)?;
        log::info!("wrote {}", out.display());
    }

    Ok(crops.len())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = init_with_level(level);

    let mut params = PipelineParams::with_radius(cli.radius);
    if cli.clamp {
        params.bounds = BoundsPolicy::Clamp;
    }

    let inputs = match collect_inputs(&cli.input) {
        Ok(files) => files,
        Err(err) => {
            log::error!("cannot read {}: {err}", cli.input.display());
            return ExitCode::FAILURE;
        }
    };
    if inputs.is_empty() {
        log::error!("no image files under {}", cli.input.display());
        return ExitCode::FAILURE;
    }
    if let Err(err) = std::fs::create_dir_all(&cli.output) {
        log::error!("cannot create {}: {err}", cli.output.display());
        return ExitCode::FAILURE;
    }

    let mut failed = 0usize;
    for path in &inputs {
        if let Err(err) = process_image(path, &cli, &params) {
            log::error!("{}: {err}", path.display());
            failed += 1;
        }
    }

    if failed == inputs.len() {
        ExitCode::FAILURE
    } else {
        if failed > 0 {
            log::warn!("{failed} of {} images failed", inputs.len());
        }
        ExitCode::SUCCESS
    }
}
