//! Mask builder: accumulates brush strokes into a coverage mask.
//!
//! The builder owns its own editing-resolution buffer (a tiny-skia
//! pixmap) and exposes an explicit stroke state machine instead of
//! relying on ambient drawing-context state: `begin_stroke` /
//! `continue_stroke` / `end_stroke` / `clear`.
//!
//! Painting is solid, not anti-aliased: every covered pixel becomes
//! exactly "remove". The downstream engine needs a sharp binary mask,
//! and a soft alpha edge would survive resampling as a halo around the
//! fill boundary. Segments are drawn with round caps and round joins
//! so fast pointer motion still produces a smooth stroke.

use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use crate::types::{Dimensions, GrayImage, PipelineError, Point};

/// Whether a stroke is currently in progress, and where it last was.
#[derive(Debug, Clone, Copy, PartialEq)]
enum StrokeState {
    /// No pointer is down.
    Idle,
    /// A stroke is in progress; `anchor` is the last painted point.
    Stroking {
        /// Last point of the in-progress stroke, in local display
        /// coordinates.
        anchor: Point,
    },
}

/// Accumulates brush strokes into a binary coverage mask at editing
/// resolution.
#[derive(Debug)]
pub struct MaskBuilder {
    pixmap: Pixmap,
    state: StrokeState,
    brush_radius: f64,
}

impl MaskBuilder {
    /// Create an empty mask at the given editing resolution.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if either dimension is
    /// zero or the brush radius is not positive.
    pub fn new(display: Dimensions, brush_radius: f64) -> Result<Self, PipelineError> {
        if brush_radius <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "brush radius must be positive, got {brush_radius}"
            )));
        }
        let pixmap = Pixmap::new(display.width, display.height).ok_or_else(|| {
            PipelineError::InvalidConfig(format!("mask surface must be nonzero, got {display}"))
        })?;
        Ok(Self {
            pixmap,
            state: StrokeState::Idle,
            brush_radius,
        })
    }

    /// Change the brush radius (editing-resolution pixels). Takes
    /// effect from the next painted point.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if `radius` is not
    /// positive.
    pub fn set_brush_radius(&mut self, radius: f64) -> Result<(), PipelineError> {
        if radius <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "brush radius must be positive, got {radius}"
            )));
        }
        self.brush_radius = radius;
        Ok(())
    }

    /// Current brush radius in editing-resolution pixels.
    #[must_use]
    pub const fn brush_radius(&self) -> f64 {
        self.brush_radius
    }

    /// Start a stroke: paints a filled disc of the brush radius at
    /// `point` and arms the segment anchor.
    pub fn begin_stroke(&mut self, point: Point) {
        self.stamp_disc(point);
        self.state = StrokeState::Stroking { anchor: point };
    }

    /// Extend the in-progress stroke with a round-capped, round-joined
    /// solid segment from the anchor to `point`.
    ///
    /// Calling this while idle (a missed press event) starts a new
    /// stroke at `point` rather than connecting to the previous one.
    pub fn continue_stroke(&mut self, point: Point) {
        match self.state {
            StrokeState::Idle => self.begin_stroke(point),
            StrokeState::Stroking { anchor } => {
                // A zero-length segment renders nothing; stamp the cap
                // disc directly so a stationary pointer still paints.
                if anchor.distance_squared(point) < 1e-12 {
                    self.stamp_disc(point);
                } else {
                    self.stamp_segment(anchor, point);
                }
                self.state = StrokeState::Stroking { anchor: point };
            }
        }
    }

    /// Finish the stroke and reset the anchor so the next stroke does
    /// not connect to this one.
    pub fn end_stroke(&mut self) {
        self.state = StrokeState::Idle;
    }

    /// Reset the entire mask to all-zero. Valid in either state.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Whether any pixel is currently painted. The pipeline's run
    /// action must stay disabled while this is false. A stamp clipped
    /// entirely off the surface does not count as coverage.
    #[must_use]
    pub fn has_coverage(&self) -> bool {
        self.pixmap.data().iter().any(|&b| b != 0)
    }

    /// Editing-resolution dimensions of the mask buffer.
    #[must_use]
    pub fn dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
        }
    }

    /// Copy coverage out as a single-channel mask: painted pixels
    /// become 255, everything else 0.
    #[must_use]
    pub fn snapshot(&self) -> GrayImage {
        let data = self.pixmap.data();
        GrayImage::from_fn(self.pixmap.width(), self.pixmap.height(), |x, y| {
            let idx = ((y * self.pixmap.width() + x) * 4) as usize;
            // Alpha channel of the premultiplied RGBA pixmap.
            if data[idx + 3] > 0 {
                image::Luma([255])
            } else {
                image::Luma([0])
            }
        })
    }

    fn solid_paint() -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(255, 255, 255, 255);
        paint.anti_alias = false;
        paint
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stamp_disc(&mut self, center: Point) {
        let mut pb = PathBuilder::new();
        pb.push_circle(
            center.x as f32,
            center.y as f32,
            self.brush_radius as f32,
        );
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &Self::solid_paint(),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn stamp_segment(&mut self, from: Point, to: Point) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.x as f32, from.y as f32);
        pb.line_to(to.x as f32, to.y as f32);
        let Some(path) = pb.finish() else {
            return;
        };

        let stroke = Stroke {
            width: (self.brush_radius * 2.0) as f32,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(
            &path,
            &Self::solid_paint(),
            &stroke,
            Transform::identity(),
            None,
        );
    }
}
