pub const FACE_MODEL_NAME: &str = "blazeface_short_range.onnx";
pub const SEGMENTATION_MODEL_NAME: &str = "selfie_segmentation_landscape.onnx";
pub const UPSCALE_MODEL_NAME: &str = "fsrcnn_x2.onnx";

/// Scale applied by the resolution booster in enhanced mode.
pub const UPSCALE_FACTOR: u32 = 2;

/// Extensions accepted for source photos.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Prefix given to generated photos when no output path is supplied.
pub const OUTPUT_PREFIX: &str = "processed_";

/// Segmentation probability above which a pixel counts as foreground.
pub const FOREGROUND_THRESHOLD: f32 = 0.5;

pub const SIMPLE_ERODE_KERNEL: u32 = 11;
pub const SIMPLE_BLUR_KERNEL: usize = 41;
pub const SIMPLE_BLUR_SIGMA: f64 = 5.0;

pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 5;
pub const DEFAULT_FADE_DISTANCE: f32 = 20.0;

/// Largest accepted morphology / median kernel side.
pub const MAX_KERNEL_SIZE: u32 = 511;

/// Face-box margins relative to the face's own extent.
pub const VERTICAL_MARGIN: f64 = 0.5;
pub const HORIZONTAL_MARGIN: f64 = 0.3;
