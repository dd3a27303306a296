use image::imageops::{self, FilterType};
use image::RgbImage;

use crate::enhancement::domain::upscaler::Upscaler;
use crate::shared::error::CollaboratorError;

/// Model-free upscaler using Catmull-Rom interpolation.
pub struct InterpolationUpscaler;

impl InterpolationUpscaler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InterpolationUpscaler {
    fn default() -> Self {
        Self::new()
    }
}

impl Upscaler for InterpolationUpscaler {
    fn upscale(&self, image: &RgbImage, factor: u32) -> Result<RgbImage, CollaboratorError> {
        let (w, h) = target_size(image, factor)?;
        Ok(imageops::resize(image, w, h, FilterType::CatmullRom))
    }

    fn name(&self) -> &'static str {
        "catmull-rom"
    }
}

/// `factor ×` the input size, rejecting a zero factor and overflow.
pub(super) fn target_size(image: &RgbImage, factor: u32) -> Result<(u32, u32), CollaboratorError> {
    if factor == 0 {
        return Err("upscale factor must be positive".into());
    }
    let (w, h) = image.dimensions();
    match (w.checked_mul(factor), h.checked_mul(factor)) {
        (Some(tw), Some(th)) => Ok((tw, th)),
        _ => Err(format!("{w}x{h} is too large to upscale by {factor}").into()),
    }
}
