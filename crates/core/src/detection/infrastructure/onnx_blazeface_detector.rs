/// BlazeFace face detector using ONNX Runtime via `ort`.
///
/// A lightweight short-range detector suited to selfie-style portraits
/// where the face covers a good share of the frame.
use std::path::Path;

use image::GrayImage;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::error::CollaboratorError;
use crate::shared::face_box::FaceBox;
use crate::shared::onnx_session::SharedSession;

/// BlazeFace model input resolution.
const INPUT_SIZE: u32 = 128;

/// Default confidence threshold.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.3;

/// Number of BlazeFace anchors (short-range model).
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output (box + 6 keypoints).
const REGRESSOR_STRIDE: usize = 16;

/// BlazeFace face detector backed by an ONNX Runtime session.
///
/// The model expects colour input; the grayscale raster is replicated
/// across the three channels.
pub struct OnnxBlazefaceDetector {
    session: SharedSession,
    confidence: f64,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    /// Load a BlazeFace ONNX model.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        let session = SharedSession::load(model_path)?;
        Ok(Self {
            session,
            confidence,
            anchors: generate_anchors(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(&self, image: &GrayImage) -> Result<Vec<FaceBox>, CollaboratorError> {
        let (fw, fh) = image.dimensions();
        if fw == 0 || fh == 0 {
            return Ok(Vec::new());
        }

        // 1. Preprocess: resize to 128x128, normalize to [0,1], NCHW
        let input_tensor = preprocess(image, INPUT_SIZE);

        // 2. Inference
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let mut session = self.session.lock()?;
        let outputs = session.run(ort::inputs![input_value])?;

        // regressors: [1, 896, 16], classificators: [1, 896, 1]
        if outputs.len() < 2 {
            return Err(
                format!("BlazeFace model expected 2 outputs, got {}", outputs.len()).into(),
            );
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("Cannot get regressor slice")?;
        let score_data = scores.as_slice().ok_or("Cannot get score slice")?;

        // 3. Decode anchor boxes + filter by confidence
        let mut dets = decode(
            reg_data,
            score_data,
            &self.anchors,
            self.confidence as f32,
            (fw as f32, fh as f32),
        );

        // 4. NMS, best score first
        let kept = nms(&mut dets, NMS_IOU_THRESH);

        Ok(kept.iter().filter_map(|d| to_face_box(d, fw, fh)).collect())
    }
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

/// Resize to `size × size`, replicate gray to RGB, normalize to [0,1] NCHW.
fn preprocess(image: &GrayImage, size: u32) -> ndarray::Array4<f32> {
    let (src_w, src_h) = (image.width() as usize, image.height() as usize);
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));

    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            let v = image.get_pixel(src_x as u32, src_y as u32).0[0] as f32 / 255.0;
            for c in 0..3 {
                tensor[[0, c, y, x]] = v;
            }
        }
    }

    tensor
}

// ---------------------------------------------------------------------------
// Anchor generation (BlazeFace short-range)
// ---------------------------------------------------------------------------

/// The short-range model uses two feature map sizes: 16×16 and 8×8,
/// with 2 and 6 anchors per cell respectively.
fn generate_anchors() -> Vec<[f32; 2]> {
    let strides = [(8, 2), (16, 6)]; // (stride, anchors_per_cell)
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);

    for &(stride, num) in &strides {
        let grid_size = INPUT_SIZE as usize / stride;
        for y in 0..grid_size {
            for x in 0..grid_size {
                let cx = (x as f32 + 0.5) / grid_size as f32;
                let cy = (y as f32 + 0.5) / grid_size as f32;
                for _ in 0..num {
                    anchors.push([cx, cy]);
                }
            }
        }
    }

    anchors
}

// ---------------------------------------------------------------------------
// Decoding + NMS
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct RawDet {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    score: f64,
}

fn decode(
    reg_data: &[f32],
    score_data: &[f32],
    anchors: &[[f32; 2]],
    confidence: f32,
    (fw, fh): (f32, f32),
) -> Vec<RawDet> {
    let mut raw_dets = Vec::new();
    let input = INPUT_SIZE as f32;

    for (i, &raw_score) in score_data.iter().enumerate().take(anchors.len()) {
        let score = sigmoid(raw_score);
        if score < confidence {
            continue;
        }

        let offset = i * REGRESSOR_STRIDE;
        if offset + 4 > reg_data.len() {
            break;
        }

        let anchor = anchors[i];
        let cx = anchor[0] + reg_data[offset] / input;
        let cy = anchor[1] + reg_data[offset + 1] / input;
        let w = reg_data[offset + 2] / input;
        let h = reg_data[offset + 3] / input;

        raw_dets.push(RawDet {
            x1: ((cx - w / 2.0) * fw).max(0.0) as f64,
            y1: ((cy - h / 2.0) * fh).max(0.0) as f64,
            x2: ((cx + w / 2.0) * fw).min(fw) as f64,
            y2: ((cy + h / 2.0) * fh).min(fh) as f64,
            score: score as f64,
        });
    }

    raw_dets
}

fn to_face_box(d: &RawDet, fw: u32, fh: u32) -> Option<FaceBox> {
    let x = (d.x1 as u32).min(fw);
    let y = (d.y1 as u32).min(fh);
    let w = ((d.x2 - d.x1) as u32).min(fw - x);
    let h = ((d.y2 - d.y1) as u32).min(fh - y);
    (w > 0 && h > 0).then(|| FaceBox::new(x, y, w, h))
}

fn nms(dets: &mut [RawDet], iou_thresh: f64) -> Vec<RawDet> {
    dets.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut keep = Vec::new();
    let mut suppressed = vec![false; dets.len()];

    for i in 0..dets.len() {
        if suppressed[i] {
            continue;
        }
        keep.push(dets[i].clone());
        for j in (i + 1)..dets.len() {
            if !suppressed[j] && bbox_iou(&dets[i], &dets[j]) > iou_thresh {
                suppressed[j] = true;
            }
        }
    }
    keep
}

fn bbox_iou(a: &RawDet, b: &RawDet) -> f64 {
    let x1 = a.x1.max(b.x1);
    let y1 = a.y1.max(b.y1);
    let x2 = a.x2.min(b.x2);
    let y2 = a.y2.min(b.y2);

    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    if inter == 0.0 {
        return 0.0;
    }
    let area_a = (a.x2 - a.x1) * (a.y2 - a.y1);
    let area_b = (b.x2 - b.x1) * (b.y2 - b.y1);
    inter / (area_a + area_b - inter)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
