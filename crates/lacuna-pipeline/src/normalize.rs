//! Channel-layout normalization ahead of inpainting.
//!
//! The inpainting kernel is defined over 8-bit rasters with 1 or 3
//! channels. Decoded sources commonly arrive as RGBA; painted or
//! resampled masks arrive multi-channel and non-binary. This module
//! strips alpha, collapses masks to a single gray channel, and applies
//! the fixed binarization threshold.
//!
//! All operations are pure: inputs are never mutated, and every
//! supported channel layout has a defined result. An unsupported
//! layout (anything deeper than 8 bits per sample) is reported as an
//! error rather than silently coerced.

use image::DynamicImage;
use imageproc::contrast::{ThresholdType, threshold};

use crate::types::{GrayImage, PipelineError, RgbImage};

/// Prepare a decoded source for the inpainting kernel: strips the
/// alpha channel from RGBA/gray-alpha inputs and expands 8-bit
/// grayscale to RGB. Plain RGB passes through unchanged.
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedFormat`] for sample depths
/// other than 8 bits.
pub fn normalize_source(source: &DynamicImage) -> Result<RgbImage, PipelineError> {
    match source {
        DynamicImage::ImageRgb8(rgb) => Ok(rgb.clone()),
        DynamicImage::ImageRgba8(_) | DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
            Ok(source.to_rgb8())
        }
        other => Err(PipelineError::UnsupportedFormat(format!(
            "source must be 8-bit gray/RGB/RGBA, got {:?}",
            other.color(),
        ))),
    }
}

/// Collapse a decoded mask payload of any 8-bit channel layout to a
/// single gray channel, then binarize it with `mask_threshold`.
///
/// # Errors
///
/// Returns [`PipelineError::UnsupportedFormat`] for sample depths
/// other than 8 bits.
pub fn normalize_mask(
    mask: &DynamicImage,
    mask_threshold: u8,
) -> Result<GrayImage, PipelineError> {
    let gray = match mask {
        DynamicImage::ImageLuma8(gray) => gray.clone(),
        DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageRgba8(_) => mask.to_luma8(),
        other => {
            return Err(PipelineError::UnsupportedFormat(format!(
                "mask must be 8-bit gray/RGB/RGBA, got {:?}",
                other.color(),
            )));
        }
    };
    Ok(binarize(&gray, mask_threshold))
}

/// Force a grayscale mask to be strictly binary: samples above
/// `mask_threshold` become 255 (fill), everything else 0 (keep).
///
/// Resampling in [`crate::reconcile`] leaves intermediate grays along
/// the mask edge; this is where they are resolved.
#[must_use = "returns the binarized mask"]
pub fn binarize(mask: &GrayImage, mask_threshold: u8) -> GrayImage {
    threshold(mask, mask_threshold, ThresholdType::Binary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rgba_source_drops_alpha() {
        let rgba = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]));
        let rgb = normalize_source(&DynamicImage::ImageRgba8(rgba)).unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[test]
    fn rgb_source_passes_through() {
        let rgb = RgbImage::from_pixel(4, 3, image::Rgb([10, 20, 30]));
        let out = normalize_source(&DynamicImage::ImageRgb8(rgb.clone())).unwrap();
        assert_eq!(out, rgb);
    }

    #[test]
    fn gray_source_expands_to_rgb() {
        let gray = GrayImage::from_pixel(4, 3, image::Luma([77]));
        let rgb = normalize_source(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert_eq!(rgb.get_pixel(2, 1).0, [77, 77, 77]);
    }

    #[test]
    fn sixteen_bit_source_is_rejected() {
        let deep = DynamicImage::ImageRgb16(image::ImageBuffer::new(4, 3));
        let result = normalize_source(&deep);
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }

    #[test]
    fn rgba_mask_collapses_to_binary_gray() {
        // Painted region in red at full alpha, elsewhere transparent
        // black — the shape the editing canvas produces.
        let rgba = image::RgbaImage::from_fn(8, 8, |x, _| {
            if x < 4 {
                image::Rgba([255, 0, 0, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        let mask = normalize_mask(&DynamicImage::ImageRgba8(rgba), 10).unwrap();
        assert_eq!(mask.get_pixel(0, 0).0[0], 255);
        assert_eq!(mask.get_pixel(7, 7).0[0], 0);
    }

    #[test]
    fn sixteen_bit_mask_is_rejected() {
        let deep = DynamicImage::ImageLuma16(image::ImageBuffer::new(4, 3));
        let result = normalize_mask(&deep, 10);
        assert!(matches!(result, Err(PipelineError::UnsupportedFormat(_))));
    }

    #[test]
    fn binarize_threshold_is_strictly_greater() {
        let gray = GrayImage::from_fn(4, 1, |x, _| match x {
            0 => image::Luma([0]),
            1 => image::Luma([10]),
            2 => image::Luma([11]),
            _ => image::Luma([255]),
        });
        let out = binarize(&gray, 10);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 0, "== threshold must stay 0");
        assert_eq!(out.get_pixel(2, 0).0[0], 255, "> threshold must become 255");
        assert_eq!(out.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn binarize_resolves_interpolation_artifacts() {
        let gray = GrayImage::from_fn(16, 1, |x, _| image::Luma([(x * 16) as u8]));
        let out = binarize(&gray, 10);
        for p in out.pixels() {
            assert!(p.0[0] == 0 || p.0[0] == 255);
        }
    }

    #[test]
    fn normalize_is_pure() {
        let rgba = image::RgbaImage::from_pixel(4, 3, image::Rgba([10, 20, 30, 128]));
        let dynamic = DynamicImage::ImageRgba8(rgba.clone());
        let _ = normalize_source(&dynamic).unwrap();
        let _ = normalize_mask(&dynamic, 10).unwrap();
        assert_eq!(dynamic.to_rgba8(), rgba, "inputs must not be mutated");
    }
}
