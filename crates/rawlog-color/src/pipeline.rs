//! End-to-end orchestration of the stages.
//!
//! ```text
//! camera RGB ─ M1 → AP0 ─ exposure ─ M2 → camera gamut ─ log encode ─ [LUT] ─ render
//! ```
//!
//! A [`Pipeline`] is built once per run and is `Sync`, so a batch shares a
//! single instance across worker threads. Each call to [`Pipeline::run`]
//! owns its buffer from start to finish and keeps nothing afterwards.

use rawlog_core::{BitDepth, CAMERA_NATIVE, CameraMetadata, Encoding, PixelBuffer, RenderedImage};
use rawlog_lut::{Interpolation, Lut3D};
use rawlog_math::Cat;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

use crate::exposure::{ExposureDecision, ExposureMode, ExposureNormalizer, Metering};
use crate::gamut::GamutTransform;
use crate::log::LogStage;
use crate::lut::{LutSpace, LutStage};
use crate::matrix::{MatrixMethod, MatrixResolver};
use crate::render::{OutputRenderer, RenderTarget};
use crate::{AP0_SPACE, ColorError, ColorResult, PipelineStage, StageContext};

/// Cooperative cancellation flag, checked between stages.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Clones observe it too.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of one run.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Quantized raster.
    pub image: RenderedImage,
    /// Exposure that was applied.
    pub exposure: ExposureDecision,
}

/// Builder for [`Pipeline`].
#[derive(Debug, Clone)]
pub struct PipelineBuilder {
    log_space: String,
    matrix_method: MatrixMethod,
    exposure: Option<f64>,
    metering: Metering,
    lut: Option<(Arc<Lut3D>, LutSpace)>,
    interpolation: Interpolation,
    depth: BitDepth,
    target: RenderTarget,
    cat: Cat,
}

impl PipelineBuilder {
    /// Matrix source.
    pub fn matrix_method(mut self, method: MatrixMethod) -> Self {
        self.matrix_method = method;
        self
    }

    /// Manual exposure in stops; `None` defers to metadata or metering.
    pub fn exposure(mut self, stops: Option<f64>) -> Self {
        self.exposure = stops;
        self
    }

    /// Auto-exposure metering mode.
    pub fn metering(mut self, metering: Metering) -> Self {
        self.metering = metering;
        self
    }

    /// Creative LUT and its output gamut.
    pub fn lut(mut self, lut: Arc<Lut3D>, space: LutSpace) -> Self {
        self.lut = Some((lut, space));
        self
    }

    /// LUT interpolation method.
    pub fn interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Output bit depth.
    pub fn depth(mut self, depth: BitDepth) -> Self {
        self.depth = depth;
        self
    }

    /// Render target.
    pub fn target(mut self, target: RenderTarget) -> Self {
        self.target = target;
        self
    }

    /// Chromatic adaptation for every conversion.
    pub fn cat(mut self, cat: Cat) -> Self {
        self.cat = cat;
        self
    }

    /// Resolves names and composes the fixed matrices.
    ///
    /// # Errors
    ///
    /// [`ColorError::UnsupportedLogSpace`] for an unknown log space and
    /// [`ColorError::UsageError`] for a non-finite manual exposure.
    pub fn build(self) -> ColorResult<Pipeline> {
        if let Some(stops) = self.exposure.filter(|s| !s.is_finite()) {
            return Err(ColorError::UsageError(format!(
                "exposure must be a finite number of stops, got {stops}"
            )));
        }

        let log = LogStage::new(&self.log_space)?;
        let to_camera = GamutTransform::between_names(AP0_SPACE, log.gamut(), self.cat)?;
        let lut = self
            .lut
            .map(|(lut, space)| LutStage::new(lut, space).with_interpolation(self.interpolation));
        let renderer = OutputRenderer::new(self.depth)?
            .with_target(self.target)
            .with_cat(self.cat);

        info!(
            log_space = log.name(),
            gamut = log.gamut(),
            matrix = self.matrix_method.name(),
            lut = ?lut.as_ref().map(|l| l.space().name()),
            "Pipeline ready"
        );

        Ok(Pipeline {
            resolver: MatrixResolver::new(self.matrix_method).with_cat(self.cat),
            exposure: self.exposure,
            metering: self.metering,
            to_camera,
            log,
            lut,
            renderer,
        })
    }
}

/// The configured RAW → log → delivery pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    resolver: MatrixResolver,
    exposure: Option<f64>,
    metering: Metering,
    to_camera: GamutTransform,
    log: LogStage,
    lut: Option<LutStage>,
    renderer: OutputRenderer,
}

impl Pipeline {
    /// Starts a builder for `log_space` with default settings.
    pub fn builder(log_space: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            log_space: log_space.into(),
            matrix_method: MatrixMethod::default(),
            exposure: None,
            metering: Metering::default(),
            lut: None,
            interpolation: Interpolation::default(),
            depth: BitDepth::default(),
            target: RenderTarget::default(),
            cat: Cat::default(),
        }
    }

    /// The log stage.
    pub fn log_stage(&self) -> &LogStage {
        &self.log
    }

    /// The log-encoded (or LUT-applied) signal before rendering.
    ///
    /// `raw` must be tagged [`CAMERA_NATIVE`].
    pub fn encode(
        &self,
        raw: PixelBuffer,
        meta: &CameraMetadata,
        cancel: &CancelToken,
    ) -> ColorResult<(PixelBuffer, ExposureDecision)> {
        if raw.encoding() != Encoding::SceneLinear(CAMERA_NATIVE) {
            return Err(ColorError::mismatch(
                "pipeline",
                Encoding::SceneLinear(CAMERA_NATIVE).to_string(),
                raw.encoding(),
            ));
        }

        checkpoint(cancel, PipelineStage::CameraToAces)?;
        let started = Instant::now();
        let to_aces = self
            .resolver
            .resolve(meta)
            .and_then(|m| GamutTransform::from_matrix(m, CAMERA_NATIVE, AP0_SPACE))
            .stage(PipelineStage::CameraToAces)?;
        let buf = to_aces.apply(raw).stage(PipelineStage::CameraToAces)?;
        stage_done(PipelineStage::CameraToAces, started);

        checkpoint(cancel, PipelineStage::Exposure)?;
        let started = Instant::now();
        let mode = ExposureMode::select(self.exposure, meta.baseline_exposure, self.metering);
        let (buf, decision) = ExposureNormalizer::new(mode)
            .apply(buf)
            .stage(PipelineStage::Exposure)?;
        stage_done(PipelineStage::Exposure, started);

        checkpoint(cancel, PipelineStage::AcesToCamera)?;
        let started = Instant::now();
        let buf = self.to_camera.apply(buf).stage(PipelineStage::AcesToCamera)?;
        stage_done(PipelineStage::AcesToCamera, started);

        checkpoint(cancel, PipelineStage::LogEncode)?;
        let started = Instant::now();
        let mut buf = self.log.encode(buf).stage(PipelineStage::LogEncode)?;
        stage_done(PipelineStage::LogEncode, started);

        if let Some(lut) = &self.lut {
            checkpoint(cancel, PipelineStage::Lut)?;
            let started = Instant::now();
            buf = lut.apply(buf).stage(PipelineStage::Lut)?;
            stage_done(PipelineStage::Lut, started);
        }

        Ok((buf, decision))
    }

    /// Runs every stage on one decoded image.
    ///
    /// Cancellation is checked before each stage; a cancelled run returns
    /// [`ColorError::Cancelled`] and produces nothing.
    pub fn run(
        &self,
        raw: PixelBuffer,
        meta: &CameraMetadata,
        cancel: &CancelToken,
    ) -> ColorResult<PipelineOutput> {
        let (buf, exposure) = self.encode(raw, meta, cancel)?;

        checkpoint(cancel, PipelineStage::Render)?;
        let started = Instant::now();
        let image = self.renderer.render(buf).stage(PipelineStage::Render)?;
        stage_done(PipelineStage::Render, started);

        Ok(PipelineOutput { image, exposure })
    }
}

fn checkpoint(cancel: &CancelToken, stage: PipelineStage) -> ColorResult<()> {
    if cancel.is_cancelled() {
        return Err(ColorError::Cancelled { stage });
    }
    Ok(())
}

fn stage_done(stage: PipelineStage, started: Instant) {
    debug!(%stage, elapsed_ms = started.elapsed().as_secs_f64() * 1e3, "Stage complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> CameraMetadata {
        CameraMetadata {
            cam_to_xyz: Some([
                [0.4124564, 0.3575761, 0.1804375],
                [0.2126729, 0.7151522, 0.0721750],
                [0.0193339, 0.1191920, 0.9503041],
            ]),
            white_balance: Some([2.0, 1.0, 1.5]),
            ..Default::default()
        }
    }

    fn raw() -> PixelBuffer {
        PixelBuffer::filled(4, 4, [0.18; 3], Encoding::SceneLinear(CAMERA_NATIVE)).unwrap()
    }

    #[test]
    fn test_cancelled_before_first_stage() {
        let pipeline = Pipeline::builder("F-Log2").build().unwrap();
        let cancel = CancelToken::new();
        cancel.clone().cancel();
        let err = pipeline.run(raw(), &meta(), &cancel).unwrap_err();
        assert!(matches!(err, ColorError::Cancelled { stage: PipelineStage::CameraToAces }));
    }

    #[test]
    fn test_stage_is_reported() {
        let pipeline = Pipeline::builder("F-Log2").build().unwrap();
        let err = pipeline
            .run(raw(), &CameraMetadata::default(), &CancelToken::new())
            .unwrap_err();
        assert_eq!(err.stage(), Some(PipelineStage::CameraToAces));
        assert!(matches!(err.root(), ColorError::MissingColorMetadata(_)));
    }

    #[test]
    fn test_rejects_unknown_log_space() {
        let err = Pipeline::builder("D-Log").build().unwrap_err();
        assert!(matches!(err, ColorError::UnsupportedLogSpace(_)));
    }

    #[test]
    fn test_rejects_nan_exposure() {
        let err = Pipeline::builder("F-Log2").exposure(Some(f64::NAN)).build().unwrap_err();
        assert!(matches!(err, ColorError::UsageError(_)));
    }

    #[test]
    fn test_requires_camera_native_input() {
        let pipeline = Pipeline::builder("V-Log").build().unwrap();
        let buf = PixelBuffer::filled(1, 1, [0.1; 3], Encoding::SceneLinear(AP0_SPACE)).unwrap();
        let err = pipeline.run(buf, &meta(), &CancelToken::new()).unwrap_err();
        assert!(matches!(err, ColorError::EncodingMismatch { .. }));
    }

    #[test]
    fn test_log_signal_target_profile() {
        let pipeline = Pipeline::builder("S-Log3")
            .exposure(Some(0.0))
            .target(RenderTarget::LogSignal)
            .build()
            .unwrap();
        let out = pipeline.run(raw(), &meta(), &CancelToken::new()).unwrap();
        assert_eq!(out.image.profile(), "S-Log3");
        assert_eq!(out.exposure.scale, 1.0);
    }
}
