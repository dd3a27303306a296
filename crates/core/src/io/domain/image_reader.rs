use std::path::Path;

use image::RgbImage;

use crate::shared::error::BiometricError;

/// Loads the source portrait as 8-bit RGB.
pub trait ImageReader: Send + Sync {
    fn read(&self, path: &Path) -> Result<RgbImage, BiometricError>;
}
