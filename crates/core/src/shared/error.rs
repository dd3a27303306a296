use thiserror::Error;

use crate::shared::crop_rect::CropRect;

/// Error returned by external collaborators (detector, segmenter, upscaler).
pub type CollaboratorError = Box<dyn std::error::Error + Send + Sync>;

/// Terminal failure of a single pipeline run.
///
/// None of these are retried; the orchestrator stops at the first one and
/// nothing is persisted.
#[derive(Error, Debug)]
pub enum BiometricError {
    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("no face detected in the image")]
    NoFaceDetected,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("{stage}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        stage: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("crop rectangle has zero area: {0:?}")]
    DegenerateCrop(CropRect),

    #[error("{stage} failed: {source}")]
    Collaborator {
        stage: &'static str,
        #[source]
        source: CollaboratorError,
    },

    #[error("failed to write image: {0}")]
    Encode(String),
}

impl BiometricError {
    pub fn collaborator(stage: &'static str) -> impl FnOnce(CollaboratorError) -> Self {
        move |source| BiometricError::Collaborator { stage, source }
    }

    /// Fails with `DimensionMismatch` unless both sizes agree.
    pub fn ensure_same_size(
        stage: &'static str,
        expected: (u32, u32),
        actual: (u32, u32),
    ) -> Result<(), BiometricError> {
        if expected == actual {
            Ok(())
        } else {
            Err(BiometricError::DimensionMismatch {
                stage,
                expected,
                actual,
            })
        }
    }
}
