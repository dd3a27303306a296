use image::GrayImage;

use crate::shared::error::CollaboratorError;
use crate::shared::face_box::FaceBox;

/// Domain interface for face detection.
///
/// Returns boxes ordered by the detector's own score, best first.
/// Implementations are shared read-only between concurrent runs, hence
/// `&self` and `Sync`; adapters around non-reentrant engines serialise
/// internally.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &GrayImage) -> Result<Vec<FaceBox>, CollaboratorError>;
}
