use image::RgbImage;

use crate::shared::error::CollaboratorError;

/// Domain interface for resolution enhancement.
///
/// A successful call returns a raster exactly `factor` times the input in
/// both dimensions.
pub trait Upscaler: Send + Sync {
    fn upscale(&self, image: &RgbImage, factor: u32) -> Result<RgbImage, CollaboratorError>;

    fn name(&self) -> &'static str;
}
