//! Editing surface: maps display coordinates to source coordinates.
//!
//! The user paints on a canvas fitted inside a container that is
//! usually much smaller than the source raster. This module computes
//! the fitted drawable rectangle (aspect-preserving, centered — the
//! container may letterbox on either axis) and converts pointer
//! positions between container space and full-resolution source space.
//!
//! Mapping is relative to the fitted rectangle's origin, not the
//! container's. No clamping happens here: callers clamp pointer input
//! to the container before mapping.

use crate::types::{Dimensions, PipelineError, Point};

/// A display surface fitted inside a container, with the scale factor
/// relating display pixels to source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditingSurface {
    /// Origin of the fitted drawable rectangle in container coordinates.
    origin: Point,
    /// Width of the fitted rectangle in display pixels.
    display_width: f64,
    /// Height of the fitted rectangle in display pixels.
    display_height: f64,
    /// `source_width / display_width`; at least 1 whenever the source
    /// is larger than the container.
    scale_to_source: f64,
    /// Source raster dimensions.
    source: Dimensions,
}

impl EditingSurface {
    /// Fit a source raster inside a container, preserving aspect ratio
    /// and centering the drawable rectangle.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the source or the
    /// container has a zero-sized axis.
    pub fn fit(
        source: Dimensions,
        container_width: f64,
        container_height: f64,
    ) -> Result<Self, PipelineError> {
        if source.width == 0 || source.height == 0 {
            return Err(PipelineError::InvalidConfig(format!(
                "source dimensions must be nonzero, got {source}"
            )));
        }
        if container_width <= 0.0 || container_height <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "container must have positive extent, got {container_width}x{container_height}"
            )));
        }

        let aspect = source.aspect_ratio();
        let mut display_width = container_width;
        let mut display_height = display_width / aspect;
        if display_height > container_height {
            display_height = container_height;
            display_width = display_height * aspect;
        }

        Ok(Self {
            origin: Point::new(
                (container_width - display_width) / 2.0,
                (container_height - display_height) / 2.0,
            ),
            display_width,
            display_height,
            scale_to_source: f64::from(source.width) / display_width,
            source,
        })
    }

    /// Map a pointer position in container coordinates to source
    /// pixel coordinates.
    #[must_use]
    pub fn to_source(&self, display: Point) -> Point {
        Point::new(
            (display.x - self.origin.x) * self.scale_to_source,
            (display.y - self.origin.y) * self.scale_to_source,
        )
    }

    /// Map a source pixel coordinate back to container coordinates.
    /// Exact inverse of [`to_source`](Self::to_source).
    #[must_use]
    pub fn to_display(&self, source: Point) -> Point {
        Point::new(
            source.x / self.scale_to_source + self.origin.x,
            source.y / self.scale_to_source + self.origin.y,
        )
    }

    /// Map a pointer position to coordinates local to the fitted
    /// rectangle (display resolution, origin at the rectangle's
    /// top-left). This is the space the mask builder paints in.
    #[must_use]
    pub fn to_local(&self, display: Point) -> Point {
        Point::new(display.x - self.origin.x, display.y - self.origin.y)
    }

    /// Ratio of source pixels to display pixels.
    #[must_use]
    pub const fn scale_to_source(&self) -> f64 {
        self.scale_to_source
    }

    /// Dimensions of the source raster.
    #[must_use]
    pub const fn source_dimensions(&self) -> Dimensions {
        self.source
    }

    /// Integer dimensions of the fitted drawable rectangle, suitable
    /// for allocating the editing-resolution mask buffer.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn display_dimensions(&self) -> Dimensions {
        Dimensions {
            width: (self.display_width.round() as u32).max(1),
            height: (self.display_height.round() as u32).max(1),
        }
    }
}
