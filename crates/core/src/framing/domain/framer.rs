use crate::shared::constants::{HORIZONTAL_MARGIN, VERTICAL_MARGIN};
use crate::shared::crop_rect::CropRect;
use crate::shared::face_box::{FaceBox, ImageSize};
use crate::shared::target_ratio::TargetRatio;

/// Computes the head-and-shoulders crop around a face.
///
/// The face box is grown by half its height above and below and by 30% of
/// its width on each side, clamped to the image. Width is then fixed and
/// only the height is adjusted towards the target ratio: symmetric
/// trimming when too tall, symmetric padding when too short. Padding is
/// clamped to the image, so a face near the top or bottom edge can yield a
/// crop shorter than the ratio asks for; the result is returned as is.
///
/// The returned rect always lies within `image_size`. It may be degenerate
/// for extreme ratios; callers reject that.
pub fn frame(image_size: ImageSize, face: FaceBox, target: TargetRatio) -> CropRect {
    let img_w = image_size.width as i64;
    let img_h = image_size.height as i64;
    let (x, y, w, h) = (
        face.x as i64,
        face.y as i64,
        face.width as i64,
        face.height as i64,
    );

    let v_margin = (h as f64 * VERTICAL_MARGIN) as i64;
    let h_margin = (w as f64 * HORIZONTAL_MARGIN) as i64;

    let mut top = (y - v_margin).clamp(0, img_h);
    let mut bottom = (y + h + v_margin).clamp(0, img_h);
    let left = (x - h_margin).clamp(0, img_w);
    let right = (x + w + h_margin).clamp(0, img_w);

    let current_width = right - left;
    let current_height = bottom - top;
    let target_height = target.height_for_width(current_width as u32) as i64;

    if target_height > current_height {
        let padding = (target_height - current_height) / 2;
        top = (top - padding).max(0);
        bottom = (bottom + padding).min(img_h);
    } else {
        let excess = (current_height - target_height) / 2;
        top += excess;
        bottom -= excess;
    }

    CropRect {
        top: top as u32,
        bottom: bottom as u32,
        left: left as u32,
        right: right as u32,
    }
}
