use std::path::Path;

use crate::enhancement::domain::upscaler::Upscaler;
use crate::shared::constants::UPSCALE_FACTOR;

use super::interpolation_upscaler::InterpolationUpscaler;
use super::onnx_super_resolution_upscaler::OnnxSuperResolutionUpscaler;

/// Creates the best available upscaler, preferring the learned model.
///
/// Falls back to Catmull-Rom interpolation when no model path is given or
/// the model fails to load. Logs which backend is selected.
pub fn create_upscaler(model_path: Option<&Path>) -> Box<dyn Upscaler> {
    if let Some(path) = model_path {
        match OnnxSuperResolutionUpscaler::new(path, UPSCALE_FACTOR) {
            Ok(upscaler) => {
                log::info!("Using super-resolution model {}", path.display());
                return Box::new(upscaler);
            }
            Err(e) => {
                log::warn!(
                    "Failed to load super-resolution model {}: {e}; falling back to interpolation",
                    path.display()
                );
            }
        }
    } else {
        log::info!("No super-resolution model available, using interpolation upscaler");
    }
    Box::new(InterpolationUpscaler::new())
}
