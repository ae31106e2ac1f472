//! lacuna-session: one interactive authoring session.
//!
//! A [`Session`] owns the decoded source raster, the fitted editing
//! surface, and the in-progress coverage mask, and it enforces the
//! concurrency rule for runs: at most one inpainting run may be in
//! flight per session. Runs execute on a worker thread and report back
//! over a channel, so a host UI loop stays responsive and polls for
//! the result each frame.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use image::DynamicImage;
use lacuna_pipeline::{
    Dimensions, EditingSurface, InpaintConfig, InpaintResult, MaskBuilder, PipelineError, Point,
};

/// Default brush radius in editing-resolution pixels.
pub const DEFAULT_BRUSH_RADIUS: f64 = 20.0;

/// Errors surfaced by the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A run was requested while another run is still in flight.
    #[error("an inpainting run is already in progress")]
    Busy,

    /// The worker thread went away without delivering a result.
    #[error("inpainting engine unavailable: worker exited without a result")]
    EngineUnavailable,

    /// The pipeline itself failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// An interactive removal session: source, surface, mask, and the
/// single-run guard.
pub struct Session {
    source: DynamicImage,
    surface: EditingSurface,
    builder: MaskBuilder,
    config: InpaintConfig,
    inflight: Option<Receiver<Result<InpaintResult, PipelineError>>>,
}

impl Session {
    /// Open a session from an encoded source payload, fitting the
    /// editing surface inside the given container.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError::Pipeline`] wrapping the decode or
    /// fit failure.
    pub fn open(
        source_bytes: &[u8],
        container_width: f64,
        container_height: f64,
        config: InpaintConfig,
    ) -> Result<Self, SessionError> {
        let source = lacuna_pipeline::decode::decode_raster(source_bytes)?;
        Self::from_decoded(source, container_width, container_height, config)
    }

    /// Open a session from an already-decoded source.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError::Pipeline`] wrapping the fit failure.
    pub fn from_decoded(
        source: DynamicImage,
        container_width: f64,
        container_height: f64,
        config: InpaintConfig,
    ) -> Result<Self, SessionError> {
        let dimensions = Dimensions {
            width: source.width(),
            height: source.height(),
        };
        let surface = EditingSurface::fit(dimensions, container_width, container_height)?;
        let builder = MaskBuilder::new(surface.display_dimensions(), DEFAULT_BRUSH_RADIUS)?;
        Ok(Self {
            source,
            surface,
            builder,
            config,
            inflight: None,
        })
    }

    /// The fitted editing surface, for hosts that draw their own
    /// overlay or cursor.
    #[must_use]
    pub const fn surface(&self) -> &EditingSurface {
        &self.surface
    }

    /// Dimensions of the source raster.
    #[must_use]
    pub fn source_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.source.width(),
            height: self.source.height(),
        }
    }

    /// Change the brush radius, in editing-resolution pixels.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] for a non-positive
    /// radius.
    pub fn set_brush_radius(&mut self, radius: f64) -> Result<(), SessionError> {
        self.builder.set_brush_radius(radius)?;
        Ok(())
    }

    /// Pointer press at a container-space position. Painting stays
    /// available while a run is in flight.
    pub fn pointer_down(&mut self, position: Point) {
        self.builder.begin_stroke(self.surface.to_local(position));
    }

    /// Pointer drag at a container-space position.
    pub fn pointer_move(&mut self, position: Point) {
        self.builder.continue_stroke(self.surface.to_local(position));
    }

    /// Pointer release.
    pub fn pointer_up(&mut self) {
        self.builder.end_stroke();
    }

    /// Discard all painted coverage.
    pub fn clear_mask(&mut self) {
        self.builder.clear();
    }

    /// Whether any coverage has been painted. Hosts disable their run
    /// control while this is false.
    #[must_use]
    pub fn has_coverage(&self) -> bool {
        self.builder.has_coverage()
    }

    /// Whether a run is in flight (started and not yet collected).
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.inflight.is_some()
    }

    /// Start an inpainting run on a worker thread.
    ///
    /// The run uses a snapshot of the current mask; strokes painted
    /// after this call do not affect it. The mask itself is preserved
    /// in every outcome, including errors.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] while a previous run has not
    /// been collected, and [`PipelineError::MissingMask`] (wrapped)
    /// when nothing is painted; neither starts a worker.
    pub fn run(&mut self) -> Result<(), SessionError> {
        if self.inflight.is_some() {
            return Err(SessionError::Busy);
        }
        if !self.builder.has_coverage() {
            return Err(SessionError::Pipeline(PipelineError::MissingMask));
        }

        let source = self.source.clone();
        let mask = self.builder.snapshot();
        let config = self.config;
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            // A dropped receiver means the session was torn down; the
            // result has nowhere to go and the send failure is fine.
            let _ = sender.send(lacuna_pipeline::process_decoded(&source, &mask, &config));
        });
        self.inflight = Some(receiver);
        Ok(())
    }

    /// Collect the in-flight run without blocking.
    ///
    /// Returns `None` while the worker is still computing (or when no
    /// run is in flight). Once a result or a failure is returned, the
    /// session accepts a new run.
    pub fn poll(&mut self) -> Option<Result<InpaintResult, SessionError>> {
        let receiver = self.inflight.as_ref()?;
        match receiver.try_recv() {
            Ok(outcome) => {
                self.inflight = None;
                Some(outcome.map_err(SessionError::from))
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.inflight = None;
                Some(Err(SessionError::EngineUnavailable))
            }
        }
    }

    /// Block until the in-flight run finishes and return its result.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Busy`] if no run is in flight (nothing
    /// to wait for), [`SessionError::EngineUnavailable`] if the worker
    /// vanished, or the pipeline's own error.
    pub fn wait(&mut self) -> Result<InpaintResult, SessionError> {
        let Some(receiver) = self.inflight.take() else {
            return Err(SessionError::Busy);
        };
        match receiver.recv() {
            Ok(outcome) => Ok(outcome?),
            Err(_) => Err(SessionError::EngineUnavailable),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("source", &self.source_dimensions())
            .field("has_coverage", &self.has_coverage())
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}
