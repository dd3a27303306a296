use crate::matting::domain::matte_strategy::MatteStrategy;
use crate::shared::constants::FOREGROUND_THRESHOLD;
use crate::shared::error::BiometricError;
use crate::shared::face_box::ImageSize;
use crate::shared::mask::{threshold, Mask, ProbabilityMask};

/// Turns a raw foreground probability raster into an alpha matte.
///
/// Thresholding is shared; the refinement step is delegated to the injected
/// strategy.
pub struct MatteBuilder {
    strategy: Box<dyn MatteStrategy>,
}

impl MatteBuilder {
    pub fn new(strategy: Box<dyn MatteStrategy>) -> Self {
        Self { strategy }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn build(&self, probability: &ProbabilityMask) -> Result<Mask, BiometricError> {
        let binary = threshold(probability, FOREGROUND_THRESHOLD);
        let matte = self.strategy.refine(&binary);
        BiometricError::ensure_same_size(
            "matte",
            ImageSize::of(probability).as_tuple(),
            ImageSize::of(&matte).as_tuple(),
        )?;
        Ok(matte)
    }
}
