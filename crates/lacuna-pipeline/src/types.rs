//! Shared types for the lacuna inpainting pipeline.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference mask
/// buffers without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbImage`, the channel layout the inpainting kernel
/// operates on and the layout of the processed output.
pub use image::RgbImage;

/// Re-export `RgbaImage` for callers holding a decoded source prior
/// to normalization.
pub use image::RgbaImage;

/// A 2D point in either display or source coordinates.
///
/// Which coordinate space a point lives in is a caller-side contract;
/// [`crate::surface::EditingSurface`] converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Dimensions of an in-memory raster buffer.
    #[must_use]
    pub fn of<P, C>(image: &image::ImageBuffer<P, C>) -> Self
    where
        P: image::Pixel,
        C: std::ops::Deref<Target = [P::Subpixel]>,
    {
        Self {
            width: image.width(),
            height: image.height(),
        }
    }

    /// Width / height as a floating-point ratio.
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Configuration for a pipeline run.
///
/// All parameters have defaults matching the small-defect-removal
/// design target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InpaintConfig {
    /// Neighborhood radius (in source pixels) the engine samples when
    /// synthesizing a masked pixel. Larger values smooth the fill at
    /// the cost of detail and compute time; low single digits suit
    /// small defects.
    pub radius: u32,

    /// Binarization threshold applied to the mask after resampling:
    /// samples above this value become 255 (fill), the rest 0 (keep).
    pub mask_threshold: u8,
}

impl Default for InpaintConfig {
    fn default() -> Self {
        Self {
            radius: 3,
            mask_threshold: 10,
        }
    }
}

/// Result of one inpainting run.
///
/// Both rasters share dimensions; `processed` differs from `original`
/// only inside the region the mask flagged for removal.
#[derive(Debug, Clone)]
pub struct InpaintResult {
    /// The normalized source, untouched.
    pub original: RgbImage,
    /// The source with masked regions synthetically filled.
    pub processed: RgbImage,
    /// When the run finished.
    pub completed_at: SystemTime,
}

impl InpaintResult {
    /// Shared dimensions of the original and processed rasters.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::of(&self.original)
    }
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Failed to decode the input image payload.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The input payload was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// A removal run was requested with no painted coverage.
    #[error("no mask painted: paint over the region to remove first")]
    MissingMask,

    /// Source and mask dimensions disagreed at a stage that requires
    /// them reconciled. Reaching this from `process` is a defect: the
    /// reconciler runs on every pipeline invocation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensions the stage required.
        expected: Dimensions,
        /// Dimensions it was handed.
        actual: Dimensions,
    },

    /// An input raster had a channel layout the pipeline does not
    /// operate on.
    #[error("unsupported raster format: {0}")]
    UnsupportedFormat(String),

    /// Pipeline configuration is invalid.
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),
}
