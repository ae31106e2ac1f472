//! lacuna-pipeline: Pure mask-guided inpainting pipeline (sans-IO).
//!
//! Removes painted-over regions from raster images:
//! decode -> coverage check -> mask reconciliation -> channel
//! normalization -> Fast-Marching fill -> before/after comparison.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and raster buffers and returns structured data. Session
//! state and thread offload live in `lacuna-session`; file handling in
//! `lacuna-cli`.

pub mod compare;
pub mod decode;
pub mod encode;
pub mod inpaint;
pub mod mask;
pub mod normalize;
pub mod reconcile;
pub mod surface;
pub mod types;

use std::time::SystemTime;

use image::DynamicImage;

pub use compare::{RevealState, reveal_composite};
pub use mask::MaskBuilder;
pub use surface::EditingSurface;
pub use types::{
    Dimensions, GrayImage, InpaintConfig, InpaintResult, PipelineError, Point, RgbImage, RgbaImage,
};

/// Run the full inpainting pipeline on an encoded source payload.
///
/// `mask` is the painted coverage mask at editing resolution (any
/// resolution — it is reconciled to the source dimensions before use).
///
/// # Pipeline steps
///
/// 1. Decode the source payload
/// 2. Reject runs with no painted coverage
/// 3. Reconcile the mask to source resolution (bilinear, every run)
/// 4. Normalize the source to RGB and binarize the mask
/// 5. Fast-Marching fill of the masked region
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] / [`PipelineError::Decode`]
/// for a bad payload, [`PipelineError::MissingMask`] when no pixel is
/// painted, and [`PipelineError::UnsupportedFormat`] for channel
/// layouts the kernel does not accept.
pub fn process(
    source_bytes: &[u8],
    mask: &GrayImage,
    config: &InpaintConfig,
) -> Result<InpaintResult, PipelineError> {
    let source = decode::decode_raster(source_bytes)?;
    process_decoded(&source, mask, config)
}

/// Run the pipeline on an already-decoded source.
///
/// Same contract as [`process`] minus the decode step; used by
/// sessions that hold the decoded source across many runs.
///
/// # Errors
///
/// See [`process`].
pub fn process_decoded(
    source: &DynamicImage,
    mask: &GrayImage,
    config: &InpaintConfig,
) -> Result<InpaintResult, PipelineError> {
    // 1. A removal request needs painted coverage; an empty mask is a
    //    usage error, not a silent no-op. The caller keeps its mask.
    if mask.pixels().all(|p| p.0[0] == 0) {
        return Err(PipelineError::MissingMask);
    }

    // 2. Reconcile the mask to source resolution. Runs every time,
    //    even when dimensions already match.
    let source_dimensions = Dimensions {
        width: source.width(),
        height: source.height(),
    };
    let reconciled = reconcile::reconcile(mask, source_dimensions);

    // 3. Normalize channel layouts: RGB source, strictly binary mask.
    let original = normalize::normalize_source(source)?;
    let binary = normalize::binarize(&reconciled, config.mask_threshold);

    // 4. Propagate surrounding texture into the masked region.
    let processed = inpaint::inpaint(&original, &binary, config.radius)?;

    Ok(InpaintResult {
        original,
        processed,
        completed_at: SystemTime::now(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Encode an RGBA test image as a PNG payload.
    fn rgba_png<F: Fn(u32, u32) -> image::Rgba<u8>>(w: u32, h: u32, f: F) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(w, h, |x, y| f(x, y));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(
            encoder,
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgba8,
        )
        .unwrap();
        buf
    }

    fn disc_mask(w: u32, h: u32, cx: i64, cy: i64, radius: i64) -> GrayImage {
        GrayImage::from_fn(w, h, |x, y| {
            let dx = i64::from(x) - cx;
            let dy = i64::from(y) - cy;
            if dx * dx + dy * dy <= radius * radius {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    #[test]
    fn empty_payload_is_rejected() {
        let mask = disc_mask(8, 8, 4, 4, 2);
        let result = process(&[], &mask, &InpaintConfig::default());
        assert!(matches!(result, Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn zero_coverage_mask_returns_missing_mask() {
        let png = rgba_png(16, 16, |_, _| image::Rgba([100, 100, 100, 255]));
        let empty = GrayImage::new(16, 16);
        let result = process(&png, &empty, &InpaintConfig::default());
        assert!(matches!(result, Err(PipelineError::MissingMask)));
    }

    #[test]
    fn rgba_source_is_normalized_to_three_channels() {
        let png = rgba_png(16, 16, |_, _| image::Rgba([100, 150, 200, 128]));
        let mask = disc_mask(16, 16, 8, 8, 3);
        let result = process(&png, &mask, &InpaintConfig::default()).unwrap();
        // RgbImage output by construction; alpha is gone and the
        // original carries the source color unchanged.
        assert_eq!(result.original.get_pixel(0, 0).0, [100, 150, 200]);
        assert_eq!(result.dimensions().width, 16);
    }

    #[test]
    fn editing_resolution_mask_is_reconciled_before_use() {
        // Mask at quarter resolution; the pipeline must scale it up
        // rather than reject or misalign it.
        let png = rgba_png(64, 64, |_, _| image::Rgba([90, 90, 90, 255]));
        let mask = disc_mask(16, 16, 8, 8, 3);
        let result = process(&png, &mask, &InpaintConfig::default()).unwrap();
        assert_eq!(result.dimensions().width, 64);
        assert_eq!(result.dimensions().height, 64);
    }

    #[test]
    fn unmasked_pixels_survive_processing_byte_for_byte() {
        let png = rgba_png(32, 32, |x, y| {
            image::Rgba([(x * 8) as u8, (y * 8) as u8, 40, 255])
        });
        let mask = disc_mask(32, 32, 16, 16, 5);
        let result = process(&png, &mask, &InpaintConfig::default()).unwrap();

        for (x, y, p) in result.original.enumerate_pixels() {
            if mask.get_pixel(x, y).0[0] == 0 {
                assert_eq!(
                    result.processed.get_pixel(x, y),
                    p,
                    "unmasked pixel ({x},{y}) changed",
                );
            }
        }
    }

    #[test]
    fn faint_coverage_below_threshold_is_a_clean_no_op() {
        // Painted, so not MissingMask; but every sample binarizes to 0,
        // so the fill itself has nothing to do.
        let png = rgba_png(16, 16, |_, _| image::Rgba([100, 100, 100, 255]));
        let faint = GrayImage::from_pixel(16, 16, image::Luma([5]));
        let result = process(&png, &faint, &InpaintConfig::default()).unwrap();
        assert_eq!(result.processed, result.original);
    }
}
