/// Person segmentation using a selfie-segmentation ONNX model via `ort`.
///
/// The model's input resolution and channel layout are read from its
/// input shape; the probability output is resized back to the source
/// raster so callers never see the model's working resolution.
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Luma, RgbImage};
use ndarray::{Array4, ArrayViewD, Axis, Ix2};

use crate::segmentation::domain::segmentation_model::SegmentationModel;
use crate::shared::error::CollaboratorError;
use crate::shared::mask::ProbabilityMask;
use crate::shared::onnx_session::SharedSession;

/// Landscape selfie model resolution, used when the model declares
/// dynamic spatial axes.
const DEFAULT_INPUT_WIDTH: usize = 256;
const DEFAULT_INPUT_HEIGHT: usize = 144;

/// Tensor channel ordering expected by the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Nchw,
    Nhwc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InputGeometry {
    layout: Layout,
    width: usize,
    height: usize,
}

pub struct OnnxSelfieSegmenter {
    session: SharedSession,
    input: InputGeometry,
}

impl OnnxSelfieSegmenter {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = SharedSession::load(model_path)?;
        let input = input_geometry(&session.input_shape().unwrap_or_default());
        log::debug!(
            "Segmentation input {}x{} ({:?})",
            input.width,
            input.height,
            input.layout
        );
        Ok(Self { session, input })
    }
}

impl SegmentationModel for OnnxSelfieSegmenter {
    fn segment(&self, image: &RgbImage) -> Result<ProbabilityMask, CollaboratorError> {
        let (w, h) = image.dimensions();
        if w == 0 || h == 0 {
            return Err("cannot segment an empty image".into());
        }

        let tensor = preprocess(image, self.input);
        let input_value = ort::value::Tensor::from_array(tensor)?;
        let mut session = self.session.lock()?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() < 1 {
            return Err("segmentation model produced no outputs".into());
        }

        let raw = outputs[0].try_extract_array::<f32>()?;
        let plane = probability_plane(raw)?;
        Ok(imageops::resize(&plane, w, h, FilterType::Triangle))
    }
}

/// Reads layout and spatial size from a 4-D input shape.
///
/// A dimension of 3 at index 1 means NCHW, otherwise NHWC.
fn input_geometry(shape: &[Option<usize>]) -> InputGeometry {
    let default = InputGeometry {
        layout: Layout::Nhwc,
        width: DEFAULT_INPUT_WIDTH,
        height: DEFAULT_INPUT_HEIGHT,
    };
    if shape.len() != 4 {
        return default;
    }
    let (layout, h, w) = if shape[1] == Some(3) {
        (Layout::Nchw, shape[2], shape[3])
    } else {
        (Layout::Nhwc, shape[1], shape[2])
    };
    InputGeometry {
        layout,
        width: w.unwrap_or(default.width),
        height: h.unwrap_or(default.height),
    }
}

/// Resize to the model resolution and normalise to `[0, 1]`.
fn preprocess(image: &RgbImage, geometry: InputGeometry) -> Array4<f32> {
    let resized = imageops::resize(
        image,
        geometry.width as u32,
        geometry.height as u32,
        FilterType::Triangle,
    );
    let shape = match geometry.layout {
        Layout::Nchw => (1, 3, geometry.height, geometry.width),
        Layout::Nhwc => (1, geometry.height, geometry.width, 3),
    };
    let mut tensor = Array4::<f32>::zeros(shape);
    for (x, y, p) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for c in 0..3 {
            let v = p.0[c] as f32 / 255.0;
            match geometry.layout {
                Layout::Nchw => tensor[[0, c, y, x]] = v,
                Layout::Nhwc => tensor[[0, y, x, c]] = v,
            }
        }
    }
    tensor
}

/// Extracts the foreground plane from `[1, H, W]`, `[1, H, W, C]` or
/// `[1, C, H, W]` output. With several channels the last one is the
/// foreground class.
fn probability_plane(raw: ArrayViewD<'_, f32>) -> Result<ProbabilityMask, CollaboratorError> {
    let shape = raw.shape().to_vec();
    let plane = match shape[..] {
        [1, _, _] => raw.index_axis_move(Axis(0), 0),
        [1, h, _, c] if (1..=2).contains(&c) && h > c => raw
            .index_axis_move(Axis(3), c - 1)
            .index_axis_move(Axis(0), 0),
        [1, c, _, _] if c >= 1 => raw
            .index_axis_move(Axis(1), c - 1)
            .index_axis_move(Axis(0), 0),
        _ => return Err(format!("unexpected segmentation output shape {shape:?}").into()),
    };
    let plane = plane.into_dimensionality::<Ix2>()?;
    let (h, w) = plane.dim();
    if h == 0 || w == 0 {
        return Err(format!("empty segmentation output shape {shape:?}").into());
    }

    Ok(ProbabilityMask::from_fn(w as u32, h as u32, |x, y| {
        Luma([plane[[y as usize, x as usize]].clamp(0.0, 1.0)])
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array3, ArrayD, IxDyn};
    use rstest::rstest;

    #[rstest]
    #[case::nhwc(vec![Some(1), Some(144), Some(256), Some(3)], Layout::Nhwc, 256, 144)]
    #[case::nchw(vec![Some(1), Some(3), Some(256), Some(256)], Layout::Nchw, 256, 256)]
    #[case::dynamic(vec![None, None, None, Some(3)], Layout::Nhwc, 256, 144)]
    #[case::odd_rank(vec![Some(1), Some(3)], Layout::Nhwc, 256, 144)]
    fn test_input_geometry(
        #[case] shape: Vec<Option<usize>>,
        #[case] layout: Layout,
        #[case] width: usize,
        #[case] height: usize,
    ) {
        let geometry = input_geometry(&shape);
        assert_eq!(geometry.layout, layout);
        assert_eq!((geometry.width, geometry.height), (width, height));
    }

    #[test]
    fn test_preprocess_layouts_agree() {
        let image = RgbImage::from_fn(8, 4, |x, y| image::Rgb([(x * 30) as u8, (y * 60) as u8, 255]));
        let nchw = preprocess(&image, InputGeometry { layout: Layout::Nchw, width: 8, height: 4 });
        let nhwc = preprocess(&image, InputGeometry { layout: Layout::Nhwc, width: 8, height: 4 });
        assert_eq!(nchw.shape(), &[1, 3, 4, 8]);
        assert_eq!(nhwc.shape(), &[1, 4, 8, 3]);
        for y in 0..4 {
            for x in 0..8 {
                for c in 0..3 {
                    assert_eq!(nchw[[0, c, y, x]], nhwc[[0, y, x, c]]);
                }
            }
        }
        assert_eq!(nhwc[[0, 0, 0, 2]], 1.0);
    }

    #[test]
    fn test_probability_plane_nhwc_single_channel() {
        let raw = ArrayD::from_shape_fn(IxDyn(&[1, 2, 3, 1]), |idx| (idx[1] * 3 + idx[2]) as f32 / 10.0);
        let mask = probability_plane(raw.view()).unwrap();
        assert_eq!(mask.dimensions(), (3, 2));
        assert!((mask.get_pixel(2, 1).0[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_probability_plane_picks_last_channel() {
        let raw = ArrayD::from_shape_fn(IxDyn(&[1, 2, 4, 4]), |idx| if idx[1] == 1 { 0.8 } else { 0.1 });
        let mask = probability_plane(raw.view()).unwrap();
        assert_eq!(mask.dimensions(), (4, 4));
        assert!(mask.pixels().all(|p| (p.0[0] - 0.8).abs() < 1e-6));
    }

    #[test]
    fn test_probability_plane_three_dims_and_clamps() {
        let raw = Array3::from_shape_fn((1, 2, 2), |(_, y, _)| if y == 0 { -0.5 } else { 1.5 }).into_dyn();
        let mask = probability_plane(raw.view()).unwrap();
        assert_eq!(mask.get_pixel(0, 0).0[0], 0.0);
        assert_eq!(mask.get_pixel(1, 1).0[0], 1.0);
    }

    #[test]
    fn test_probability_plane_rejects_unknown_shape() {
        let raw = ArrayD::<f32>::zeros(IxDyn(&[2, 2]));
        assert!(probability_plane(raw.view()).is_err());
    }
}
