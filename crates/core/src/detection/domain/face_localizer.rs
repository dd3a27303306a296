use image::RgbImage;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::error::BiometricError;
use crate::shared::face_box::{FaceBox, ImageSize};

/// Runs the detector on a grayscale copy of the source and picks the face
/// the rest of the pipeline frames.
///
/// Only the detector's first (best-scored) box is used. A box that leaks
/// past the image edge is clipped to the image.
pub struct FaceLocalizer<'a> {
    detector: &'a dyn FaceDetector,
}

/// Outcome of localisation: the chosen box plus how many faces were seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocatedFace {
    pub face: FaceBox,
    pub detected: usize,
}

impl<'a> FaceLocalizer<'a> {
    pub fn new(detector: &'a dyn FaceDetector) -> Self {
        Self { detector }
    }

    pub fn locate(&self, image: &RgbImage) -> Result<LocatedFace, BiometricError> {
        let gray = image::imageops::grayscale(image);
        let faces = self
            .detector
            .detect(&gray)
            .map_err(BiometricError::collaborator("face detection"))?;

        let first = faces.first().ok_or(BiometricError::NoFaceDetected)?;
        if faces.len() > 1 {
            log::debug!("{} faces detected, using the first", faces.len());
        }

        let size = ImageSize::of(image);
        let face = if first.fits_within(size) {
            *first
        } else {
            let clipped = first.clamped_to(size).ok_or(BiometricError::NoFaceDetected)?;
            log::warn!("Face box {first:?} exceeds {size:?}, clipped to {clipped:?}");
            clipped
        };

        Ok(LocatedFace {
            face,
            detected: faces.len(),
        })
    }
}
