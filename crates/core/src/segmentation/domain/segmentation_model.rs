use image::RgbImage;

use crate::shared::error::CollaboratorError;
use crate::shared::mask::ProbabilityMask;

/// Domain interface for person segmentation.
///
/// Returns a per-pixel foreground probability in `[0, 1]` with the same
/// spatial size as `image`.
pub trait SegmentationModel: Send + Sync {
    fn segment(&self, image: &RgbImage) -> Result<ProbabilityMask, CollaboratorError>;
}
