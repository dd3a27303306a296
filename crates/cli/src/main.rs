use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::Parser;

use biometric_photo_core::compositing::domain::background_color::BackgroundColor;
use biometric_photo_core::detection::domain::face_detector::FaceDetector;
use biometric_photo_core::detection::infrastructure::onnx_blazeface_detector::{
    OnnxBlazefaceDetector, DEFAULT_CONFIDENCE,
};
use biometric_photo_core::enhancement::domain::upscaler::Upscaler;
use biometric_photo_core::enhancement::infrastructure::upscaler_factory::create_upscaler;
use biometric_photo_core::io::domain::output_path::{accepted_extension, default_output_path};
use biometric_photo_core::io::infrastructure::image_file_reader::ImageFileReader;
use biometric_photo_core::io::infrastructure::image_file_writer::ImageFileWriter;
use biometric_photo_core::pipeline::biometric_photo_pipeline::BiometricPhotoPipeline;
use biometric_photo_core::pipeline::config::{PipelineConfig, PipelineSettings, ProcessingMode};
use biometric_photo_core::pipeline::generate_biometric_photo_use_case::GenerateBiometricPhotoUseCase;
use biometric_photo_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use biometric_photo_core::segmentation::domain::segmentation_model::SegmentationModel;
use biometric_photo_core::segmentation::infrastructure::onnx_selfie_segmenter::OnnxSelfieSegmenter;
use biometric_photo_core::shared::constants::{
    FACE_MODEL_NAME, SEGMENTATION_MODEL_NAME, UPSCALE_MODEL_NAME,
};
use biometric_photo_core::shared::model_resolver::{self, ModelSource};
use biometric_photo_core::shared::target_ratio::{PhotoFormat, TargetRatio};

/// Turn a portrait photo into a passport-style biometric photo.
#[derive(Parser)]
#[command(name = "biometric-photo")]
struct Cli {
    /// Input image (png, jpg, jpeg or gif).
    input: PathBuf,

    /// Output file (default: <output-dir>/processed_<input name>).
    output: Option<PathBuf>,

    /// Directory for the default output name (default: next to the input).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Matte variant: simple or enhanced.
    #[arg(long)]
    mode: Option<ProcessingMode>,

    /// Enhanced mode: square growth kernel for the foreground (even values are bumped to odd).
    #[arg(long)]
    kernel_size: Option<u32>,

    /// Enhanced mode: median smoothing kernel (default 5).
    #[arg(long)]
    blur_kernel_size: Option<u32>,

    /// Enhanced mode: fade multiplier for the distance-based edge (default 20).
    #[arg(long)]
    fade_distance: Option<f32>,

    /// Enhanced mode: skip the 2x super-resolution step.
    #[arg(long)]
    no_upscale: bool,

    /// Target aspect ratio as W:H (overrides --photo-format).
    #[arg(long)]
    ratio: Option<TargetRatio>,

    /// Document preset: standard (4:5), us (1:1) or germany (35:45).
    #[arg(long)]
    photo_format: Option<PhotoFormat>,

    /// Background colour as #RRGGBB (default #FFFFFF).
    #[arg(long)]
    background: Option<BackgroundColor>,

    /// JSON settings file; command-line flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Face detection confidence threshold (0.0-1.0).
    #[arg(long, default_value_t = DEFAULT_CONFIDENCE)]
    confidence: f64,

    /// Directory searched for model files after the cache.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// BlazeFace ONNX model path.
    #[arg(long)]
    face_model: Option<PathBuf>,

    /// Download URL for the face model when it is not found locally.
    #[arg(long)]
    face_model_url: Option<String>,

    /// Selfie segmentation ONNX model path.
    #[arg(long)]
    segmentation_model: Option<PathBuf>,

    /// Download URL for the segmentation model when it is not found locally.
    #[arg(long)]
    segmentation_model_url: Option<String>,

    /// Super-resolution ONNX model path (falls back to interpolation).
    #[arg(long)]
    upscale_model: Option<PathBuf>,

    /// Download URL for the super-resolution model.
    #[arg(long)]
    upscale_model_url: Option<String>,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    validate(&cli)?;

    let config = load_settings(&cli)?.into_config()?;
    let output = match &cli.output {
        Some(path) => path.clone(),
        None => default_output_path(&cli.input, cli.output_dir.as_deref())?,
    };
    log::info!(
        "Mode: {}, ratio {}, background {}",
        config.matte.name(),
        config.target_ratio,
        config.background
    );

    let pipeline = build_pipeline(&cli, config)?;
    let use_case = GenerateBiometricPhotoUseCase::new(
        Box::new(ImageFileReader::new()),
        Box::new(ImageFileWriter::new()),
        pipeline,
    );

    let mut logger = StdoutPipelineLogger::new();
    use_case.execute(&cli.input, &output, &mut logger)?;
    log::info!("Output written to {}", output.display());
    Ok(())
}

/// Settings file (if any) overlaid with command-line flags.
fn load_settings(cli: &Cli) -> Result<PipelineSettings, Box<dyn std::error::Error>> {
    let file_settings = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {e}", path.display()))?;
            serde_json::from_str(&text)
                .map_err(|e| format!("Invalid config {}: {e}", path.display()))?
        }
        None => PipelineSettings::default(),
    };
    Ok(file_settings.merge(flag_settings(cli)))
}

fn flag_settings(cli: &Cli) -> PipelineSettings {
    PipelineSettings {
        mode: cli.mode,
        kernel_size: cli.kernel_size,
        blur_kernel_size: cli.blur_kernel_size,
        fade_distance: cli.fade_distance,
        upscale: cli.no_upscale.then_some(false),
        ratio: cli.ratio,
        photo_format: cli.photo_format,
        background: cli.background,
    }
}

fn build_pipeline(
    cli: &Cli,
    config: PipelineConfig,
) -> Result<BiometricPhotoPipeline, Box<dyn std::error::Error>> {
    let face_model = resolve_model(
        FACE_MODEL_NAME,
        cli.face_model.as_deref(),
        cli.model_dir.as_deref(),
        cli.face_model_url.as_deref(),
    )?;
    let detector: Arc<dyn FaceDetector> =
        Arc::new(OnnxBlazefaceDetector::new(&face_model, cli.confidence)?);

    let segmentation_model = resolve_model(
        SEGMENTATION_MODEL_NAME,
        cli.segmentation_model.as_deref(),
        cli.model_dir.as_deref(),
        cli.segmentation_model_url.as_deref(),
    )?;
    let segmenter: Arc<dyn SegmentationModel> =
        Arc::new(OnnxSelfieSegmenter::new(&segmentation_model)?);

    let upscaler: Option<Arc<dyn Upscaler>> = if config.upscale {
        let model = resolve_model(
            UPSCALE_MODEL_NAME,
            cli.upscale_model.as_deref(),
            cli.model_dir.as_deref(),
            cli.upscale_model_url.as_deref(),
        )
        .map_err(|e| log::warn!("{e}"))
        .ok();
        Some(Arc::from(create_upscaler(model.as_deref())))
    } else {
        None
    };

    Ok(BiometricPhotoPipeline::new(detector, segmenter, upscaler, config))
}

fn resolve_model(
    name: &str,
    explicit: Option<&Path>,
    bundled_dir: Option<&Path>,
    url: Option<&str>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {name}");
    let source = ModelSource {
        explicit,
        bundled_dir,
        url,
    };
    let path = model_resolver::resolve(name, &source, Some(Box::new(download_progress)))?;
    if url.is_some() {
        eprintln!();
    }
    Ok(path)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    accepted_extension(&cli.input)?;
    if cli.output.is_some() && cli.output_dir.is_some() {
        return Err("OUTPUT and --output-dir are mutually exclusive".into());
    }
    if !(0.0..=1.0).contains(&cli.confidence) {
        return Err(format!(
            "Confidence must be between 0.0 and 1.0, got {}",
            cli.confidence
        )
        .into());
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading model... {pct}%");
    } else {
        eprint!("\rDownloading model... {downloaded} bytes");
    }
}
