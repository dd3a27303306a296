use std::path::Path;

use crate::io::domain::image_reader::ImageReader;
use crate::io::domain::image_writer::ImageWriter;
use crate::shared::error::BiometricError;

use super::biometric_photo_pipeline::BiometricPhotoPipeline;
use super::pipeline_logger::PipelineLogger;

/// File-to-file entry point: read → process → write.
///
/// Nothing is written unless every stage succeeds.
pub struct GenerateBiometricPhotoUseCase {
    reader: Box<dyn ImageReader>,
    writer: Box<dyn ImageWriter>,
    pipeline: BiometricPhotoPipeline,
}

impl GenerateBiometricPhotoUseCase {
    pub fn new(
        reader: Box<dyn ImageReader>,
        writer: Box<dyn ImageWriter>,
        pipeline: BiometricPhotoPipeline,
    ) -> Self {
        Self {
            reader,
            writer,
            pipeline,
        }
    }

    pub fn execute(
        &self,
        input_path: &Path,
        output_path: &Path,
        logger: &mut dyn PipelineLogger,
    ) -> Result<(), BiometricError> {
        let image = self.reader.read(input_path)?;
        logger.info(&format!(
            "Processing {} ({}x{})",
            input_path.display(),
            image.width(),
            image.height()
        ));

        let result = self.pipeline.process(&image, logger)?;

        self.writer.write(output_path, &result)?;
        logger.info(&format!(
            "Saved {} ({}x{})",
            output_path.display(),
            result.width(),
            result.height()
        ));
        Ok(())
    }
}
