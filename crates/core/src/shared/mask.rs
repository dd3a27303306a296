use image::{GrayImage, ImageBuffer, Luma};

/// Per-pixel foreground probability in `[0, 1]`, as produced by segmentation.
pub type ProbabilityMask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Single-channel matte: 0 is background, 255 is foreground.
pub type Mask = GrayImage;

pub const MASK_FOREGROUND: u8 = 255;
pub const MASK_BACKGROUND: u8 = 0;

pub fn filled_probability(width: u32, height: u32, value: f32) -> ProbabilityMask {
    ProbabilityMask::from_pixel(width, height, Luma([value]))
}

pub fn filled_mask(width: u32, height: u32, value: u8) -> Mask {
    Mask::from_pixel(width, height, Luma([value]))
}

/// Bitwise complement of every pixel.
pub fn invert(mask: &Mask) -> Mask {
    let mut out = mask.clone();
    for p in out.pixels_mut() {
        p.0[0] = !p.0[0];
    }
    out
}

/// 255 where the probability is strictly above `threshold`, else 0.
pub fn threshold(probability: &ProbabilityMask, threshold: f32) -> Mask {
    Mask::from_fn(probability.width(), probability.height(), |x, y| {
        if probability.get_pixel(x, y).0[0] > threshold {
            Luma([MASK_FOREGROUND])
        } else {
            Luma([MASK_BACKGROUND])
        }
    })
}
