use std::path::Path;

use image::RgbImage;

use crate::shared::error::BiometricError;

/// Persists the finished photo.
pub trait ImageWriter: Send + Sync {
    fn write(&self, path: &Path, image: &RgbImage) -> Result<(), BiometricError>;
}
