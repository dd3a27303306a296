use std::path::Path;

use image::RgbImage;

use crate::io::domain::image_reader::ImageReader;
use crate::io::domain::output_path::accepted_extension;
use crate::shared::error::BiometricError;

/// Decodes PNG, JPEG and GIF files with the `image` crate.
///
/// Animated GIFs yield their first frame. Alpha is dropped.
pub struct ImageFileReader;

impl ImageFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageReader for ImageFileReader {
    fn read(&self, path: &Path) -> Result<RgbImage, BiometricError> {
        accepted_extension(path)?;
        let img = image::open(path)
            .map_err(|e| BiometricError::Decode(format!("{}: {e}", path.display())))?;
        if img.width() == 0 || img.height() == 0 {
            return Err(BiometricError::Decode(format!(
                "{}: image is empty",
                path.display()
            )));
        }
        log::debug!("Read {} ({}x{})", path.display(), img.width(), img.height());
        Ok(img.to_rgb8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_reads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        RgbImage::from_pixel(12, 9, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(img.dimensions(), (12, 9));
        assert_eq!(img.get_pixel(3, 3).0, [10, 20, 30]);
    }

    #[test]
    fn test_rgba_is_flattened_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.png");
        image::RgbaImage::from_pixel(4, 4, image::Rgba([1, 2, 3, 128]))
            .save(&path)
            .unwrap();

        let img = ImageFileReader::new().read(&path).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [1, 2, 3]);
    }

    #[test]
    fn test_corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        assert!(matches!(
            ImageFileReader::new().read(&path),
            Err(BiometricError::Decode(_))
        ));
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        assert!(matches!(
            ImageFileReader::new().read(Path::new("/nonexistent/in.png")),
            Err(BiometricError::Decode(_))
        ));
    }

    #[test]
    fn test_unsupported_extension_is_rejected_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.bmp");
        RgbImage::new(2, 2).save(&path).unwrap();

        assert!(matches!(
            ImageFileReader::new().read(&path),
            Err(BiometricError::UnsupportedFormat(_))
        ));
    }
}
