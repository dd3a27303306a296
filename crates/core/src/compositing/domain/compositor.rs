use image::{Rgb, RgbImage};

use crate::compositing::domain::background_color::BackgroundColor;
use crate::shared::error::BiometricError;
use crate::shared::face_box::ImageSize;
use crate::shared::mask::Mask;

/// Alpha-blends `foreground` over a flat `background`, using `mask / 255`
/// as the foreground weight.
pub fn composite(
    foreground: &RgbImage,
    mask: &Mask,
    background: BackgroundColor,
) -> Result<RgbImage, BiometricError> {
    BiometricError::ensure_same_size(
        "composite",
        ImageSize::of(foreground).as_tuple(),
        ImageSize::of(mask).as_tuple(),
    )?;

    let bg = background.0;
    let mut out = RgbImage::new(foreground.width(), foreground.height());
    for ((dst, fg), m) in out.pixels_mut().zip(foreground.pixels()).zip(mask.pixels()) {
        let alpha = m.0[0] as f32 / 255.0;
        *dst = Rgb(std::array::from_fn(|c| {
            (fg.0[c] as f32 * alpha + bg[c] as f32 * (1.0 - alpha)).round() as u8
        }));
    }
    Ok(out)
}
