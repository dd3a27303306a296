//! Mask refinement primitives shared by both matte strategies.

use image::{ImageBuffer, Luma};
use imageproc::distance_transform::{euclidean_squared_distance_transform, Norm};
use imageproc::filter::median_filter;
use imageproc::morphology::erode;

use crate::shared::mask::{invert, Mask, MASK_BACKGROUND};

/// Normalised distance field, one value in `[0, 1]` per pixel.
pub type DistanceField = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Largest radius handed to a single `erode` call. imageproc keeps
/// distances in a `u8`, so a radius of 255 can no longer tell "far" from
/// "saturated" and erodes everything.
const MAX_ERODE_STEP: u32 = 254;

/// Grows the foreground by eroding the inverted mask with a square
/// `kernel_size × kernel_size` element, then inverting back.
///
/// `kernel_size` is odd; 1 leaves the mask untouched. Chebyshev erosions
/// compose additively, so large radii run as several smaller steps.
pub fn grow_foreground(mask: &Mask, kernel_size: u32) -> Mask {
    let mut remaining = kernel_size / 2;
    if remaining == 0 {
        return mask.clone();
    }
    let mut background = invert(mask);
    while remaining > 0 {
        let step = remaining.min(MAX_ERODE_STEP);
        background = erode(&background, Norm::LInf, step as u8);
        remaining -= step;
    }
    invert(&background)
}

/// Median filter over a square `kernel_size` window (odd), edges replicated.
pub fn median_blur(mask: &Mask, kernel_size: u32) -> Mask {
    let radius = kernel_size / 2;
    if radius == 0 {
        return mask.clone();
    }
    median_filter(mask, radius, radius)
}

/// Euclidean distance from every non-zero pixel to the nearest zero pixel,
/// min-max normalised to `[0, 1]`.
///
/// A flat field (no zero pixel, or nothing but zero pixels) normalises to
/// all zeros.
pub fn normalized_distance(mask: &Mask) -> DistanceField {
    let (width, height) = mask.dimensions();
    let has_background = mask.pixels().any(|p| p.0[0] == MASK_BACKGROUND);
    if !has_background {
        return DistanceField::new(width, height);
    }

    // The transform measures distance to the nearest non-zero pixel, so
    // feed it the complement: zero pixels of `mask` become the targets.
    let squared = euclidean_squared_distance_transform(&invert(mask));
    let distances: Vec<f32> = squared.pixels().map(|p| p.0[0].sqrt() as f32).collect();

    let (min, max) = distances
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &d| {
            (lo.min(d), hi.max(d))
        });
    let range = max - min;
    if range <= f32::EPSILON {
        return DistanceField::new(width, height);
    }

    let normalized = distances.iter().map(|&d| (d - min) / range).collect();
    DistanceField::from_raw(width, height, normalized)
        .unwrap_or_else(|| DistanceField::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::MAX_KERNEL_SIZE;
    use crate::shared::mask::filled_mask;

    fn square_mask(size: u32, lo: u32, hi: u32) -> Mask {
        Mask::from_fn(size, size, |x, y| {
            if (lo..hi).contains(&x) && (lo..hi).contains(&y) {
                Luma([255])
            } else {
                Luma([0])
            }
        })
    }

    #[test]
    fn test_grow_foreground_expands_by_radius() {
        // 3×3 square at 10..13 grown with an 11×11 element reaches 5..18.
        let grown = grow_foreground(&square_mask(30, 10, 13), 11);
        assert_eq!(grown.get_pixel(5, 5).0[0], 255);
        assert_eq!(grown.get_pixel(17, 17).0[0], 255);
        assert_eq!(grown.get_pixel(4, 10).0[0], 0);
        assert_eq!(grown.get_pixel(18, 10).0[0], 0);
    }

    #[test]
    fn test_grow_foreground_kernel_one_is_identity() {
        let mask = square_mask(10, 3, 6);
        assert_eq!(grow_foreground(&mask, 1), mask);
    }

    #[test]
    fn test_grow_foreground_all_background_stays_empty() {
        let mask = filled_mask(8, 8, 0);
        assert_eq!(grow_foreground(&mask, 5), mask);
    }

    #[test]
    fn test_grow_foreground_at_largest_kernel() {
        // 20×20 foreground in the corner of an 800×800 mask grows by 255.
        let mask = square_mask(800, 0, 20);
        let grown = grow_foreground(&mask, MAX_KERNEL_SIZE);
        let covered = grown.pixels().filter(|p| p.0[0] == 255).count();
        assert_eq!(covered, 275 * 275);
        assert_eq!(grown.get_pixel(274, 274).0[0], 255);
        assert_eq!(grown.get_pixel(275, 0).0[0], 0);
        assert_eq!(grown.get_pixel(799, 799).0[0], 0);
    }

    #[test]
    fn test_grow_foreground_radius_beyond_one_erode_step() {
        // Radius 300 runs as 254 + 46: 650..660 grows to 350..960.
        let mask = square_mask(1000, 650, 660);
        let grown = grow_foreground(&mask, 601);
        let covered = grown.pixels().filter(|p| p.0[0] == 255).count();
        assert_eq!(covered, 610 * 610);
        assert_eq!(grown.get_pixel(350, 959).0[0], 255);
        assert_eq!(grown.get_pixel(349, 650).0[0], 0);
    }

    #[test]
    fn test_grow_foreground_largest_kernel_keeps_empty_mask_empty() {
        let mask = filled_mask(50, 50, 0);
        assert_eq!(grow_foreground(&mask, MAX_KERNEL_SIZE), mask);
    }

    #[test]
    fn test_median_blur_removes_speckle() {
        let mut mask = filled_mask(9, 9, 0);
        mask.put_pixel(4, 4, Luma([255]));
        let smoothed = median_blur(&mask, 3);
        assert!(smoothed.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_median_blur_preserves_dimensions() {
        let mask = square_mask(13, 2, 9);
        assert_eq!(median_blur(&mask, 5).dimensions(), (13, 13));
    }

    #[test]
    fn test_normalized_distance_peaks_in_the_middle() {
        let field = normalized_distance(&square_mask(21, 5, 16));
        assert_eq!(field.get_pixel(0, 0).0[0], 0.0);
        assert!((field.get_pixel(10, 10).0[0] - 1.0).abs() < 1e-6);
        let near_edge = field.get_pixel(5, 10).0[0];
        assert!(near_edge > 0.0 && near_edge < 0.5);
        assert!(field.pixels().all(|p| (0.0..=1.0).contains(&p.0[0])));
    }

    #[test]
    fn test_normalized_distance_flat_fields_are_zero() {
        for value in [0u8, 255] {
            let field = normalized_distance(&filled_mask(6, 4, value));
            assert_eq!(field.dimensions(), (6, 4));
            assert!(field.pixels().all(|p| p.0[0] == 0.0));
        }
    }
}
