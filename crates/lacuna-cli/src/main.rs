//! Remove a masked region from an image: paint coverage is read from a
//! mask file, the covered pixels are filled from the surrounding
//! texture, and the result is written out as a PNG. Optionally also
//! writes a split before/after comparison image.

use std::path::PathBuf;

use clap::Parser;
use lacuna_pipeline::{InpaintConfig, RevealState, reveal_composite};

/// Fill a masked region of an image from its surrounding texture.
///
/// The mask is any raster whose bright pixels mark the region to
/// remove; it may be at a different resolution than the input and is
/// scaled to match before the fill runs.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input image path (PNG, JPEG, BMP, or WebP).
    input: PathBuf,

    /// Mask image path. Pixels brighter than the threshold are
    /// removed and filled.
    #[arg(short, long)]
    mask: PathBuf,

    /// Output image path (written as PNG).
    #[arg(short, long)]
    output: PathBuf,

    /// Fill sampling radius in source pixels. Larger values smooth
    /// the fill at the cost of detail and compute time.
    #[arg(long, default_value_t = 3)]
    radius: u32,

    /// Mask brightness threshold: samples above this count as coverage.
    #[arg(long, default_value_t = 10)]
    threshold: u8,

    /// Also write a split before/after comparison image to this path.
    #[arg(long, value_name = "PATH")]
    compare: Option<PathBuf>,

    /// Where to place the comparison split, as a percentage of image
    /// width revealed as the original (left side).
    #[arg(long, value_name = "PCT", default_value_t = 50.0)]
    reveal: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if !(0.0..=100.0).contains(&args.reveal) {
        return Err(format!("--reveal must be between 0 and 100, got {}", args.reveal).into());
    }

    eprintln!("Reading image from {}", args.input.display());
    let source_bytes = std::fs::read(&args.input)?;

    eprintln!("Reading mask from {}", args.mask.display());
    let mask_bytes = std::fs::read(&args.mask)?;
    let mask_image = lacuna_pipeline::decode::decode_raster(&mask_bytes)?;
    let mask = lacuna_pipeline::normalize::normalize_mask(&mask_image, args.threshold)?;

    let config = InpaintConfig {
        radius: args.radius,
        mask_threshold: args.threshold,
    };

    eprintln!("Filling masked region (radius {})...", args.radius);
    let result = lacuna_pipeline::process(&source_bytes, &mask, &config)?;
    let dims = result.dimensions();
    eprintln!("Processed {dims}");

    eprintln!("Saving to {}", args.output.display());
    let payload = lacuna_pipeline::encode::encode_png(&result.processed)?;
    std::fs::write(&args.output, payload)?;

    if let Some(compare_path) = args.compare {
        eprintln!(
            "Writing comparison ({:.0}% original) to {}",
            args.reveal,
            compare_path.display(),
        );
        let reveal = RevealState::new(args.reveal / 100.0);
        let composite = reveal_composite(&result.original, &result.processed, reveal)?;
        let payload = lacuna_pipeline::encode::encode_png(&composite)?;
        std::fs::write(&compare_path, payload)?;
    }

    eprintln!("Done.");
    Ok(())
}
