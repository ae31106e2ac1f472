//! Before/after comparison compositing.
//!
//! Produces a side-by-side composite of the original and processed
//! rasters split at an adjustable vertical reveal boundary: columns
//! left of the boundary show the original, columns right of it show
//! the processed result. Neither input is mutated — the boundary only
//! selects which raster a column is read from.

use crate::types::{Dimensions, PipelineError, RgbImage};

/// Reveal boundary position driven by continuous pointer or touch
/// drag input. Always holds a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    fraction: f64,
}

impl Default for RevealState {
    /// Starts centered.
    fn default() -> Self {
        Self { fraction: 0.5 }
    }
}

impl RevealState {
    /// Create a state at `fraction`, clamped to `[0, 1]`.
    #[must_use]
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
        }
    }

    /// Current reveal fraction.
    #[must_use]
    pub const fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Set the fraction directly, clamping to `[0, 1]`.
    pub fn set_fraction(&mut self, fraction: f64) {
        self.fraction = fraction.clamp(0.0, 1.0);
    }

    /// Update from a pointer position: `x` is the drag offset within a
    /// view of `width` display pixels. Positions outside the view
    /// clamp to the nearest edge, so mouse and touch behave the same.
    pub fn set_from_pointer(&mut self, x: f64, width: f64) {
        if width > 0.0 {
            self.set_fraction(x / width);
        }
    }
}

/// Composite `original` and `processed` split at `reveal`.
///
/// The boundary column is `reveal.fraction() * width`: at fraction 0
/// the output is the processed raster everywhere, at 1 the original
/// everywhere.
///
/// # Errors
///
/// Returns [`PipelineError::DimensionMismatch`] if the rasters differ
/// in size.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn reveal_composite(
    original: &RgbImage,
    processed: &RgbImage,
    reveal: RevealState,
) -> Result<RgbImage, PipelineError> {
    let dimensions = Dimensions::of(original);
    if dimensions != Dimensions::of(processed) {
        return Err(PipelineError::DimensionMismatch {
            expected: dimensions,
            actual: Dimensions::of(processed),
        });
    }

    let boundary = (reveal.fraction() * f64::from(dimensions.width)).round() as u32;
    let composite = RgbImage::from_fn(dimensions.width, dimensions.height, |x, y| {
        if x < boundary {
            *original.get_pixel(x, y)
        } else {
            *processed.get_pixel(x, y)
        }
    });
    Ok(composite)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgb;

    const ORIGINAL: Rgb<u8> = Rgb([200, 0, 0]);
    const PROCESSED: Rgb<u8> = Rgb([0, 0, 200]);

    fn pair(w: u32, h: u32) -> (RgbImage, RgbImage) {
        (
            RgbImage::from_pixel(w, h, ORIGINAL),
            RgbImage::from_pixel(w, h, PROCESSED),
        )
    }

    #[test]
    fn fraction_is_clamped() {
        assert!((RevealState::new(-0.5).fraction() - 0.0).abs() < f64::EPSILON);
        assert!((RevealState::new(1.5).fraction() - 1.0).abs() < f64::EPSILON);
        assert!((RevealState::new(0.25).fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn pointer_updates_clamp_to_view() {
        let mut reveal = RevealState::default();
        reveal.set_from_pointer(-10.0, 400.0);
        assert!((reveal.fraction() - 0.0).abs() < f64::EPSILON);
        reveal.set_from_pointer(500.0, 400.0);
        assert!((reveal.fraction() - 1.0).abs() < f64::EPSILON);
        reveal.set_from_pointer(100.0, 400.0);
        assert!((reveal.fraction() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_width_pointer_view_is_ignored() {
        let mut reveal = RevealState::new(0.7);
        reveal.set_from_pointer(10.0, 0.0);
        assert!((reveal.fraction() - 0.7).abs() < f64::EPSILON);
    }

    #[test]
    fn zero_reveals_processed_everywhere() {
        let (original, processed) = pair(8, 4);
        let out = reveal_composite(&original, &processed, RevealState::new(0.0)).unwrap();
        assert!(out.pixels().all(|p| *p == PROCESSED));
    }

    #[test]
    fn one_reveals_original_everywhere() {
        let (original, processed) = pair(8, 4);
        let out = reveal_composite(&original, &processed, RevealState::new(1.0)).unwrap();
        assert!(out.pixels().all(|p| *p == ORIGINAL));
    }

    #[test]
    fn half_splits_at_the_middle_column() {
        let (original, processed) = pair(8, 4);
        let out = reveal_composite(&original, &processed, RevealState::new(0.5)).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(*out.get_pixel(x, y), ORIGINAL, "left half at ({x},{y})");
            }
            for x in 4..8 {
                assert_eq!(*out.get_pixel(x, y), PROCESSED, "right half at ({x},{y})");
            }
        }
    }

    #[test]
    fn inputs_are_not_mutated() {
        let (original, processed) = pair(8, 4);
        let before = (original.clone(), processed.clone());
        let _ = reveal_composite(&original, &processed, RevealState::new(0.3)).unwrap();
        assert_eq!(original, before.0);
        assert_eq!(processed, before.1);
    }

    #[test]
    fn mismatched_dimensions_are_an_error() {
        let original = RgbImage::new(8, 4);
        let processed = RgbImage::new(4, 8);
        let result = reveal_composite(&original, &processed, RevealState::default());
        assert!(matches!(
            result,
            Err(PipelineError::DimensionMismatch { .. })
        ));
    }
}
