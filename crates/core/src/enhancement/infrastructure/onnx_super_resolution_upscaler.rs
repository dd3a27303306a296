/// Learned super-resolution (FSRCNN/ESPCN style) via `ort`.
///
/// Models come in two flavours: RGB in and out (`[1, 3, H, W]`), or
/// luminance only (`[1, 1, H, W]`). For luminance models the chroma planes
/// are interpolated and recombined with the model's Y output.
use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use ndarray::{Array4, ArrayViewD, Ix4};

use crate::enhancement::domain::upscaler::Upscaler;
use crate::shared::error::CollaboratorError;
use crate::shared::onnx_session::SharedSession;

use super::interpolation_upscaler::target_size;

pub struct OnnxSuperResolutionUpscaler {
    session: SharedSession,
    scale: u32,
    channels: usize,
}

impl OnnxSuperResolutionUpscaler {
    /// Load a super-resolution model that upscales by exactly `scale`.
    ///
    /// The channel count is read from the model input; 3 is assumed when
    /// it is dynamic.
    pub fn new(model_path: &Path, scale: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let session = SharedSession::load(model_path)?;
        let channels = session
            .input_shape()
            .and_then(|shape| shape.get(1).copied().flatten())
            .unwrap_or(3);
        if channels != 1 && channels != 3 {
            return Err(format!("super-resolution model must take 1 or 3 channels, got {channels}").into());
        }
        Ok(Self {
            session,
            scale,
            channels,
        })
    }
}

impl Upscaler for OnnxSuperResolutionUpscaler {
    fn upscale(&self, image: &RgbImage, factor: u32) -> Result<RgbImage, CollaboratorError> {
        if factor != self.scale {
            return Err(format!(
                "model upscales by {}, {factor} was requested",
                self.scale
            )
            .into());
        }
        let (tw, th) = target_size(image, factor)?;

        let input = if self.channels == 1 {
            luma_tensor(image)
        } else {
            rgb_tensor(image)
        };
        let input_value = ort::value::Tensor::from_array(input)?;
        let mut session = self.session.lock()?;
        let outputs = session.run(ort::inputs![input_value])?;
        if outputs.len() < 1 {
            return Err("super-resolution model produced no outputs".into());
        }
        let raw = outputs[0].try_extract_array::<f32>()?;

        if self.channels == 1 {
            recombine_luma(image, raw, (tw, th))
        } else {
            rgb_from_tensor(raw, (tw, th))
        }
    }

    fn name(&self) -> &'static str {
        "onnx-super-resolution"
    }
}

// ---------------------------------------------------------------------------
// Tensor conversion
// ---------------------------------------------------------------------------

/// NCHW RGB normalised to `[0, 1]`.
fn rgb_tensor(image: &RgbImage) -> Array4<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut tensor = Array4::<f32>::zeros((1, 3, h, w));
    for (x, y, p) in image.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = p.0[c] as f32 / 255.0;
        }
    }
    tensor
}

/// NCHW single-channel BT.601 luma normalised to `[0, 1]`.
fn luma_tensor(image: &RgbImage) -> Array4<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut tensor = Array4::<f32>::zeros((1, 1, h, w));
    for (x, y, p) in image.enumerate_pixels() {
        tensor[[0, 0, y as usize, x as usize]] = rgb_to_ycbcr(p.0)[0] / 255.0;
    }
    tensor
}

fn output_view<'a>(
    raw: ArrayViewD<'a, f32>,
    channels: usize,
    (tw, th): (u32, u32),
) -> Result<ndarray::ArrayView4<'a, f32>, CollaboratorError> {
    let out = raw.into_dimensionality::<Ix4>()?;
    let expected = [1, channels, th as usize, tw as usize];
    if out.shape() != expected {
        return Err(format!(
            "super-resolution output shape {:?}, expected {expected:?}",
            out.shape()
        )
        .into());
    }
    Ok(out)
}

fn rgb_from_tensor(raw: ArrayViewD<'_, f32>, size: (u32, u32)) -> Result<RgbImage, CollaboratorError> {
    let out = output_view(raw, 3, size)?;
    Ok(RgbImage::from_fn(size.0, size.1, |x, y| {
        Rgb(std::array::from_fn(|c| to_u8(out[[0, c, y as usize, x as usize]] * 255.0)))
    }))
}

/// Model Y plus Catmull-Rom interpolated Cb/Cr.
fn recombine_luma(
    source: &RgbImage,
    raw: ArrayViewD<'_, f32>,
    size: (u32, u32),
) -> Result<RgbImage, CollaboratorError> {
    let out = output_view(raw, 1, size)?;
    let chroma = imageops::resize(source, size.0, size.1, FilterType::CatmullRom);
    Ok(RgbImage::from_fn(size.0, size.1, |x, y| {
        let [_, cb, cr] = rgb_to_ycbcr(chroma.get_pixel(x, y).0);
        let luma = out[[0, 0, y as usize, x as usize]] * 255.0;
        Rgb(ycbcr_to_rgb([luma, cb, cr]))
    }))
}

// ---------------------------------------------------------------------------
// Colour conversion (full-range BT.601, as used by JPEG)
// ---------------------------------------------------------------------------

fn rgb_to_ycbcr([r, g, b]: [u8; 3]) -> [f32; 3] {
    let (r, g, b) = (r as f32, g as f32, b as f32);
    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let cb = 128.0 - 0.168_736 * r - 0.331_264 * g + 0.5 * b;
    let cr = 128.0 + 0.5 * r - 0.418_688 * g - 0.081_312 * b;
    [y, cb, cr]
}

fn ycbcr_to_rgb([y, cb, cr]: [f32; 3]) -> [u8; 3] {
    let (cb, cr) = (cb - 128.0, cr - 128.0);
    [
        to_u8(y + 1.402 * cr),
        to_u8(y - 0.344_136 * cb - 0.714_136 * cr),
        to_u8(y + 1.772 * cb),
    ]
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
