use image::RgbImage;

use crate::shared::face_box::ImageSize;
use crate::shared::target_ratio::TargetRatio;

/// Pixel bounds of a crop within the source raster, half-open on
/// `bottom` and `right`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropRect {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropRect {
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_degenerate(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn fits_within(&self, size: ImageSize) -> bool {
        self.top <= self.bottom
            && self.left <= self.right
            && self.bottom <= size.height
            && self.right <= size.width
    }

    /// Width divided by height; zero for degenerate rects.
    pub fn ratio(&self) -> f64 {
        if self.height() == 0 {
            return 0.0;
        }
        self.width() as f64 / self.height() as f64
    }

    /// Signed difference between the actual height and the height the
    /// target ratio calls for at this width.
    pub fn height_deviation(&self, target: TargetRatio) -> i64 {
        self.height() as i64 - target.height_for_width(self.width()) as i64
    }

    /// Copies the covered pixels into a new image.
    pub fn crop(&self, image: &RgbImage) -> RgbImage {
        image::imageops::crop_imm(image, self.left, self.top, self.width(), self.height())
            .to_image()
    }
}
