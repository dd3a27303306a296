use crate::matting::domain::matte_strategy::MatteStrategy;
use crate::shared::constants::{SIMPLE_BLUR_KERNEL, SIMPLE_BLUR_SIGMA, SIMPLE_ERODE_KERNEL};
use crate::shared::mask::Mask;

use super::gaussian;
use super::morphology;

/// Grows the foreground by a fixed 11×11 square and feathers the edge with
/// a 41×41 Gaussian (σ = 5).
pub struct FlatFeatherStrategy {
    kernel: Vec<f32>,
}

impl FlatFeatherStrategy {
    pub fn new() -> Self {
        Self {
            kernel: gaussian::gaussian_kernel_1d(SIMPLE_BLUR_KERNEL, SIMPLE_BLUR_SIGMA),
        }
    }
}

impl Default for FlatFeatherStrategy {
    fn default() -> Self {
        Self::new()
    }
}

impl MatteStrategy for FlatFeatherStrategy {
    fn refine(&self, binary: &Mask) -> Mask {
        let mut matte = morphology::grow_foreground(binary, SIMPLE_ERODE_KERNEL);
        let (w, h) = matte.dimensions();
        gaussian::separable_gaussian_blur(&mut matte, w as usize, h as usize, 1, &self.kernel);
        matte
    }

    fn name(&self) -> &'static str {
        "flat-feather"
    }
}
