use std::path::Path;

use image::RgbImage;

use crate::io::domain::image_writer::ImageWriter;
use crate::shared::error::BiometricError;

/// Writes the result with the `image` crate; the format follows the file
/// extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, image: &RgbImage) -> Result<(), BiometricError> {
        let encode_err = |e: &dyn std::fmt::Display| {
            BiometricError::Encode(format!("{}: {e}", path.display()))
        };

        // Ensure parent directory exists (infrastructure concern)
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| encode_err(&e))?;
        }

        image.save(path).map_err(|e| encode_err(&e))?;
        log::debug!("Wrote {} ({}x{})", path.display(), image.width(), image.height());
        Ok(())
    }
}
