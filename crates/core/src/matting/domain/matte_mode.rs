use crate::shared::constants::{DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_FADE_DISTANCE, MAX_KERNEL_SIZE};
use crate::shared::error::BiometricError;

/// Which refinement turns the thresholded segmentation into a matte.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MatteMode {
    /// Fixed 11×11 growth and a 41×41 Gaussian feather.
    Simple,
    /// Configurable growth, median smoothing and a distance-based fade.
    Enhanced(EnhancedMatteConfig),
}

impl MatteMode {
    pub fn name(&self) -> &'static str {
        match self {
            MatteMode::Simple => "simple",
            MatteMode::Enhanced(_) => "enhanced",
        }
    }
}

/// Validated parameters of the distance-feather matte.
///
/// Kernel sizes are always odd: even inputs are bumped by one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnhancedMatteConfig {
    kernel_size: u32,
    blur_kernel_size: u32,
    fade_distance: f32,
}

impl EnhancedMatteConfig {
    pub fn new(
        kernel_size: u32,
        blur_kernel_size: u32,
        fade_distance: f32,
    ) -> Result<Self, BiometricError> {
        if !fade_distance.is_finite() || fade_distance < 0.0 {
            return Err(BiometricError::InvalidParameter(format!(
                "fade distance must be a finite non-negative number, got {fade_distance}"
            )));
        }
        Ok(Self {
            kernel_size: odd_kernel("kernel size", kernel_size)?,
            blur_kernel_size: odd_kernel("blur kernel size", blur_kernel_size)?,
            fade_distance,
        })
    }

    /// Defaults for everything except the erosion kernel, which callers
    /// must always choose.
    pub fn with_kernel_size(kernel_size: u32) -> Result<Self, BiometricError> {
        Self::new(kernel_size, DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_FADE_DISTANCE)
    }

    pub fn kernel_size(&self) -> u32 {
        self.kernel_size
    }

    pub fn blur_kernel_size(&self) -> u32 {
        self.blur_kernel_size
    }

    pub fn fade_distance(&self) -> f32 {
        self.fade_distance
    }
}

/// Positive, at most [`MAX_KERNEL_SIZE`] once made odd.
fn odd_kernel(name: &str, size: u32) -> Result<u32, BiometricError> {
    if size == 0 {
        return Err(BiometricError::InvalidParameter(format!(
            "{name} must be a positive integer, got 0"
        )));
    }
    let odd = if size % 2 == 0 { size + 1 } else { size };
    if odd > MAX_KERNEL_SIZE {
        return Err(BiometricError::InvalidParameter(format!(
            "{name} must be at most {MAX_KERNEL_SIZE}, got {size}"
        )));
    }
    Ok(odd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(2, 3)]
    #[case(5, 5)]
    #[case(10, 11)]
    #[case(510, 511)]
    fn test_even_kernels_are_bumped(#[case] input: u32, #[case] expected: u32) {
        let config = EnhancedMatteConfig::new(input, input, 20.0).unwrap();
        assert_eq!(config.kernel_size(), expected);
        assert_eq!(config.blur_kernel_size(), expected);
    }

    #[rstest]
    #[case::zero_kernel(0, 5, 20.0)]
    #[case::zero_blur(3, 0, 20.0)]
    #[case::huge_kernel(512, 5, 20.0)]
    #[case::negative_fade(3, 5, -1.0)]
    #[case::nan_fade(3, 5, f32::NAN)]
    #[case::infinite_fade(3, 5, f32::INFINITY)]
    fn test_rejects_invalid(#[case] k: u32, #[case] b: u32, #[case] fade: f32) {
        assert!(matches!(
            EnhancedMatteConfig::new(k, b, fade),
            Err(BiometricError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_zero_fade_is_accepted() {
        let config = EnhancedMatteConfig::new(3, 5, 0.0).unwrap();
        assert_eq!(config.fade_distance(), 0.0);
    }

    #[test]
    fn test_with_kernel_size_uses_defaults() {
        let config = EnhancedMatteConfig::with_kernel_size(4).unwrap();
        assert_eq!(config.kernel_size(), 5);
        assert_eq!(config.blur_kernel_size(), 5);
        assert_eq!(config.fade_distance(), 20.0);
    }

    #[test]
    fn test_mode_names() {
        let enhanced = MatteMode::Enhanced(EnhancedMatteConfig::with_kernel_size(3).unwrap());
        assert_eq!(MatteMode::Simple.name(), "simple");
        assert_eq!(enhanced.name(), "enhanced");
    }
}
