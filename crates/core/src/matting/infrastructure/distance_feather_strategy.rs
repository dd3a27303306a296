use crate::matting::domain::matte_mode::EnhancedMatteConfig;
use crate::matting::domain::matte_strategy::MatteStrategy;
use crate::shared::mask::Mask;

use super::morphology;

/// Grows and smooths the foreground, then fades its edges according to how
/// far each pixel sits from the background.
pub struct DistanceFeatherStrategy {
    config: EnhancedMatteConfig,
}

impl DistanceFeatherStrategy {
    pub fn new(config: EnhancedMatteConfig) -> Self {
        Self { config }
    }

    /// Distance-derived gradient quantised to `[0, 255]`.
    ///
    /// The median runs after quantisation; truncation is monotone so the
    /// result matches filtering the float field first.
    fn gradient(&self, smoothed: &Mask) -> Mask {
        let field = morphology::normalized_distance(smoothed);
        let fade = self.config.fade_distance();
        let quantised = Mask::from_fn(field.width(), field.height(), |x, y| {
            let g = (field.get_pixel(x, y).0[0] * fade).clamp(0.0, 1.0);
            image::Luma([(g * 255.0) as u8])
        });
        morphology::median_blur(&quantised, self.config.blur_kernel_size())
    }
}

impl MatteStrategy for DistanceFeatherStrategy {
    fn refine(&self, binary: &Mask) -> Mask {
        let grown = morphology::grow_foreground(binary, self.config.kernel_size());
        let smoothed = morphology::median_blur(&grown, self.config.blur_kernel_size());
        let gradient = self.gradient(&smoothed);

        Mask::from_fn(smoothed.width(), smoothed.height(), |x, y| {
            let m = smoothed.get_pixel(x, y).0[0] as f32;
            let g = gradient.get_pixel(x, y).0[0] as f32;
            image::Luma([(m * g / 255.0) as u8])
        })
    }

    fn name(&self) -> &'static str {
        "distance-feather"
    }
}
