use crate::matting::domain::matte_builder::MatteBuilder;
use crate::matting::domain::matte_mode::MatteMode;

use super::distance_feather_strategy::DistanceFeatherStrategy;
use super::flat_feather_strategy::FlatFeatherStrategy;

/// Creates the matte builder for the requested mode.
pub fn create_matte_builder(mode: MatteMode) -> MatteBuilder {
    match mode {
        MatteMode::Simple => {
            log::debug!("Using flat feather matte");
            MatteBuilder::new(Box::new(FlatFeatherStrategy::new()))
        }
        MatteMode::Enhanced(config) => {
            log::debug!(
                "Using distance feather matte (kernel_size={}, blur_kernel_size={}, fade_distance={})",
                config.kernel_size(),
                config.blur_kernel_size(),
                config.fade_distance()
            );
            MatteBuilder::new(Box::new(DistanceFeatherStrategy::new(config)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matting::domain::matte_mode::EnhancedMatteConfig;
    use crate::shared::constants::MAX_KERNEL_SIZE;
    use crate::shared::mask::{filled_probability, ProbabilityMask};
    use image::Luma;
    use rstest::rstest;

    fn enhanced() -> MatteMode {
        MatteMode::Enhanced(EnhancedMatteConfig::new(3, 4, 20.0).unwrap())
    }

    #[test]
    fn test_mode_selects_strategy() {
        assert_eq!(
            create_matte_builder(MatteMode::Simple).strategy_name(),
            "flat-feather"
        );
        assert_eq!(
            create_matte_builder(enhanced()).strategy_name(),
            "distance-feather"
        );
    }

    #[rstest]
    #[case::simple(MatteMode::Simple)]
    #[case::enhanced(enhanced())]
    fn test_matte_keeps_input_dimensions(#[case] mode: MatteMode) {
        let matte = create_matte_builder(mode)
            .build(&filled_probability(57, 31, 0.7))
            .unwrap();
        assert_eq!(matte.dimensions(), (57, 31));
    }

    #[rstest]
    #[case::simple(MatteMode::Simple)]
    #[case::enhanced(enhanced())]
    fn test_no_foreground_gives_empty_matte(#[case] mode: MatteMode) {
        let matte = create_matte_builder(mode)
            .build(&filled_probability(20, 20, 0.1))
            .unwrap();
        assert!(matte.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_simple_confident_foreground_is_opaque_everywhere() {
        let matte = create_matte_builder(MatteMode::Simple)
            .build(&filled_probability(40, 50, 0.9))
            .unwrap();
        assert!(matte.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn test_threshold_boundary_is_background() {
        let matte = create_matte_builder(MatteMode::Simple)
            .build(&filled_probability(10, 10, 0.5))
            .unwrap();
        assert!(matte.pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn test_enhanced_largest_kernel_still_feathers() {
        // Foreground in the top-left 20×20 corner of a 600×600 frame.
        let probability = ProbabilityMask::from_fn(600, 600, |x, y| {
            Luma([if x < 20 && y < 20 { 0.9 } else { 0.1 }])
        });
        let mode = MatteMode::Enhanced(EnhancedMatteConfig::new(MAX_KERNEL_SIZE, 5, 20.0).unwrap());
        let matte = create_matte_builder(mode).build(&probability).unwrap();

        assert_eq!(matte.get_pixel(10, 10).0[0], 255);
        assert_eq!(matte.get_pixel(300, 10).0[0], 0);
        assert_eq!(matte.get_pixel(599, 599).0[0], 0);
    }
}
