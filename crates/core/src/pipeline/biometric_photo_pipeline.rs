use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;

use crate::compositing::domain::compositor::composite;
use crate::detection::domain::face_detector::FaceDetector;
use crate::detection::domain::face_localizer::FaceLocalizer;
use crate::enhancement::domain::upscaler::Upscaler;
use crate::framing::domain::framer::frame;
use crate::matting::domain::matte_builder::MatteBuilder;
use crate::matting::domain::matte_mode::MatteMode;
use crate::matting::infrastructure::matte_factory::create_matte_builder;
use crate::segmentation::domain::segmentation_model::SegmentationModel;
use crate::shared::constants::UPSCALE_FACTOR;
use crate::shared::error::BiometricError;
use crate::shared::face_box::ImageSize;
use crate::shared::mask::Mask;

use super::config::PipelineConfig;
use super::pipeline_logger::PipelineLogger;

/// Single-image pipeline: locate face → frame → crop → (upscale) →
/// segment → matte → composite.
///
/// Holds no per-run state; one instance can serve concurrent runs from
/// several threads. Each run reports to the logger it is handed.
pub struct BiometricPhotoPipeline {
    detector: Arc<dyn FaceDetector>,
    segmenter: Arc<dyn SegmentationModel>,
    upscaler: Option<Arc<dyn Upscaler>>,
    matte_builder: MatteBuilder,
    config: PipelineConfig,
}

impl BiometricPhotoPipeline {
    pub fn new(
        detector: Arc<dyn FaceDetector>,
        segmenter: Arc<dyn SegmentationModel>,
        upscaler: Option<Arc<dyn Upscaler>>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            detector,
            segmenter,
            upscaler,
            matte_builder: create_matte_builder(config.matte),
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn process(
        &self,
        image: &RgbImage,
        logger: &mut dyn PipelineLogger,
    ) -> Result<RgbImage, BiometricError> {
        let size = ImageSize::of(image);
        if size.is_empty() {
            return Err(BiometricError::Decode("source image is empty".to_string()));
        }

        let located = timed(logger, "detect", || {
            FaceLocalizer::new(self.detector.as_ref()).locate(image)
        })?;
        logger.metric("faces_detected", located.detected as f64);

        let target = self.config.target_ratio;
        let rect = timed(logger, "frame", || frame(size, located.face, target));
        if rect.is_degenerate() {
            return Err(BiometricError::DegenerateCrop(rect));
        }
        let deviation = rect.height_deviation(target);
        if deviation.abs() > 1 {
            log::warn!(
                "Crop {}x{} misses the {target} ratio by {deviation}px of height (clamped at the image edge)",
                rect.width(),
                rect.height()
            );
        }
        let cropped = rect.crop(image);
        logger.info(&format!(
            "Framed face at {:?} into {}x{} crop",
            located.face,
            rect.width(),
            rect.height()
        ));

        let foreground = match self.active_upscaler() {
            Some(upscaler) => timed(logger, "upscale", || upscale(upscaler, &cropped))?,
            None => cropped,
        };
        let fg_size = ImageSize::of(&foreground).as_tuple();

        let probability = timed(logger, "segment", || self.segmenter.segment(&foreground))
            .map_err(BiometricError::collaborator("segmentation"))?;
        BiometricError::ensure_same_size("segmentation", fg_size, ImageSize::of(&probability).as_tuple())?;

        let matte = timed(logger, "matte", || self.matte_builder.build(&probability))?;
        logger.metric("matte_coverage", coverage(&matte));

        let result = timed(logger, "composite", || {
            composite(&foreground, &matte, self.config.background)
        })?;
        logger.summary();
        Ok(result)
    }

    /// The upscaler to run, if enhanced mode asked for one and one is wired.
    fn active_upscaler(&self) -> Option<&dyn Upscaler> {
        if !self.config.upscale || !matches!(self.config.matte, MatteMode::Enhanced(_)) {
            return None;
        }
        let upscaler = self.upscaler.as_deref();
        if upscaler.is_none() {
            log::debug!("Upscaling requested but no upscaler configured, skipping");
        }
        upscaler
    }
}

fn upscale(upscaler: &dyn Upscaler, image: &RgbImage) -> Result<RgbImage, BiometricError> {
    let upscaled = upscaler
        .upscale(image, UPSCALE_FACTOR)
        .map_err(BiometricError::collaborator("upscaling"))?;
    let (w, h) = image.dimensions();
    BiometricError::ensure_same_size(
        "upscale",
        (w * UPSCALE_FACTOR, h * UPSCALE_FACTOR),
        upscaled.dimensions(),
    )?;
    Ok(upscaled)
}

/// Mean matte opacity in `[0, 1]`.
fn coverage(matte: &Mask) -> f64 {
    let n = matte.as_raw().len();
    if n == 0 {
        return 0.0;
    }
    matte.as_raw().iter().map(|&v| v as f64).sum::<f64>() / (n as f64 * 255.0)
}

fn timed<T>(logger: &mut dyn PipelineLogger, stage: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    logger.timing(stage, start.elapsed().as_secs_f64() * 1000.0);
    out
}
