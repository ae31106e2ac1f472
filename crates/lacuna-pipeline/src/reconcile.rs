//! Mask resolution reconciliation.
//!
//! The mask is painted at editing resolution (the fitted on-screen
//! canvas) while inpainting must run at full source resolution, or the
//! fill boundary visibly blurs and misaligns. This step resamples the
//! mask to the source raster's exact dimensions and runs on every
//! pipeline invocation, even when the dimensions already match.
//!
//! Resampling introduces intermediate gray values at the mask edge;
//! binarization is a separate step in [`crate::normalize`] so the two
//! stay independently testable.

use image::imageops::{self, FilterType};

use crate::types::{Dimensions, GrayImage};

/// Resample a mask to exactly `target` dimensions using bilinear
/// filtering. Returns an identity copy when the dimensions already
/// match.
#[must_use = "returns the reconciled mask"]
pub fn reconcile(mask: &GrayImage, target: Dimensions) -> GrayImage {
    if Dimensions::of(mask) == target {
        return mask.clone();
    }
    imageops::resize(mask, target.width, target.height, FilterType::Triangle)
}
