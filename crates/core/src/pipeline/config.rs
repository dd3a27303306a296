use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::compositing::domain::background_color::BackgroundColor;
use crate::matting::domain::matte_mode::{EnhancedMatteConfig, MatteMode};
use crate::shared::constants::{DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_FADE_DISTANCE};
use crate::shared::error::BiometricError;
use crate::shared::target_ratio::{PhotoFormat, TargetRatio};

/// Processing variant as named by callers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    Simple,
    Enhanced,
}

impl FromStr for ProcessingMode {
    type Err = BiometricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(ProcessingMode::Simple),
            "enhanced" => Ok(ProcessingMode::Enhanced),
            other => Err(BiometricError::InvalidParameter(format!(
                "mode must be 'simple' or 'enhanced', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessingMode::Simple => write!(f, "simple"),
            ProcessingMode::Enhanced => write!(f, "enhanced"),
        }
    }
}

/// Raw, unvalidated caller parameters.
///
/// Loaded from a JSON settings file and/or command-line flags. Every field
/// is optional so layers can be merged; [`PipelineSettings::into_config`]
/// applies defaults and validates once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct PipelineSettings {
    pub mode: Option<ProcessingMode>,
    pub kernel_size: Option<u32>,
    pub blur_kernel_size: Option<u32>,
    pub fade_distance: Option<f32>,
    pub upscale: Option<bool>,
    pub ratio: Option<TargetRatio>,
    pub photo_format: Option<PhotoFormat>,
    pub background: Option<BackgroundColor>,
}

/// Validated, immutable parameters of one pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineConfig {
    pub target_ratio: TargetRatio,
    pub background: BackgroundColor,
    pub matte: MatteMode,
    /// Only ever true in enhanced mode.
    pub upscale: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_ratio: TargetRatio::DEFAULT,
            background: BackgroundColor::default(),
            matte: MatteMode::Simple,
            upscale: false,
        }
    }
}

impl PipelineSettings {
    /// Field-wise overlay: values set in `overrides` win.
    pub fn merge(self, overrides: PipelineSettings) -> PipelineSettings {
        PipelineSettings {
            mode: overrides.mode.or(self.mode),
            kernel_size: overrides.kernel_size.or(self.kernel_size),
            blur_kernel_size: overrides.blur_kernel_size.or(self.blur_kernel_size),
            fade_distance: overrides.fade_distance.or(self.fade_distance),
            upscale: overrides.upscale.or(self.upscale),
            ratio: overrides.ratio.or(self.ratio),
            photo_format: overrides.photo_format.or(self.photo_format),
            background: overrides.background.or(self.background),
        }
    }

    /// The mode that applies: explicit, else enhanced when a kernel size
    /// was given, else simple.
    pub fn effective_mode(&self) -> ProcessingMode {
        self.mode.unwrap_or(if self.kernel_size.is_some() {
            ProcessingMode::Enhanced
        } else {
            ProcessingMode::Simple
        })
    }

    pub fn into_config(self) -> Result<PipelineConfig, BiometricError> {
        let target_ratio = match (self.ratio, self.photo_format) {
            (Some(ratio), _) => ratio,
            (None, Some(format)) => format.target_ratio(),
            (None, None) => TargetRatio::DEFAULT,
        };
        let background = self.background.unwrap_or_default();

        let (matte, upscale) = match self.effective_mode() {
            ProcessingMode::Simple => {
                self.reject_enhanced_only()?;
                (MatteMode::Simple, false)
            }
            ProcessingMode::Enhanced => {
                let kernel_size = self.kernel_size.ok_or_else(|| {
                    BiometricError::InvalidParameter(
                        "kernel size is required in enhanced mode".to_string(),
                    )
                })?;
                let config = EnhancedMatteConfig::new(
                    kernel_size,
                    self.blur_kernel_size.unwrap_or(DEFAULT_BLUR_KERNEL_SIZE),
                    self.fade_distance.unwrap_or(DEFAULT_FADE_DISTANCE),
                )?;
                (MatteMode::Enhanced(config), self.upscale.unwrap_or(true))
            }
        };

        Ok(PipelineConfig {
            target_ratio,
            background,
            matte,
            upscale,
        })
    }

    fn reject_enhanced_only(&self) -> Result<(), BiometricError> {
        let mut offending = Vec::new();
        if self.kernel_size.is_some() {
            offending.push("kernel_size");
        }
        if self.blur_kernel_size.is_some() {
            offending.push("blur_kernel_size");
        }
        if self.fade_distance.is_some() {
            offending.push("fade_distance");
        }
        if self.upscale == Some(true) {
            offending.push("upscale");
        }
        if offending.is_empty() {
            Ok(())
        } else {
            Err(BiometricError::InvalidParameter(format!(
                "{} only apply in enhanced mode",
                offending.join(", ")
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn enhanced(kernel_size: u32) -> PipelineSettings {
        PipelineSettings {
            mode: Some(ProcessingMode::Enhanced),
            kernel_size: Some(kernel_size),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_settings_give_simple_defaults() {
        let config = PipelineSettings::default().into_config().unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.target_ratio, TargetRatio::DEFAULT);
        assert_eq!(config.background, BackgroundColor::WHITE);
    }

    #[test]
    fn test_enhanced_defaults() {
        let config = enhanced(3).into_config().unwrap();
        let MatteMode::Enhanced(matte) = config.matte else {
            panic!("expected enhanced mode");
        };
        assert_eq!(matte.kernel_size(), 3);
        assert_eq!(matte.blur_kernel_size(), 5);
        assert_eq!(matte.fade_distance(), 20.0);
        assert!(config.upscale);
    }

    #[test]
    fn test_even_kernels_are_normalised() {
        let settings = PipelineSettings {
            blur_kernel_size: Some(4),
            ..enhanced(6)
        };
        let MatteMode::Enhanced(matte) = settings.into_config().unwrap().matte else {
            panic!("expected enhanced mode");
        };
        assert_eq!(matte.kernel_size(), 7);
        assert_eq!(matte.blur_kernel_size(), 5);
    }

    #[test]
    fn test_kernel_size_implies_enhanced() {
        let settings = PipelineSettings {
            kernel_size: Some(5),
            ..Default::default()
        };
        assert_eq!(settings.effective_mode(), ProcessingMode::Enhanced);
        assert!(matches!(
            settings.into_config().unwrap().matte,
            MatteMode::Enhanced(_)
        ));
    }

    #[test]
    fn test_enhanced_without_kernel_is_rejected() {
        let settings = PipelineSettings {
            mode: Some(ProcessingMode::Enhanced),
            ..Default::default()
        };
        assert!(matches!(
            settings.into_config(),
            Err(BiometricError::InvalidParameter(_))
        ));
    }

    #[rstest]
    #[case::kernel(PipelineSettings { kernel_size: Some(3), ..Default::default() })]
    #[case::blur(PipelineSettings { blur_kernel_size: Some(3), ..Default::default() })]
    #[case::fade(PipelineSettings { fade_distance: Some(1.0), ..Default::default() })]
    #[case::upscale(PipelineSettings { upscale: Some(true), ..Default::default() })]
    fn test_enhanced_options_rejected_in_simple_mode(#[case] settings: PipelineSettings) {
        let settings = PipelineSettings {
            mode: Some(ProcessingMode::Simple),
            ..settings
        };
        assert!(matches!(
            settings.into_config(),
            Err(BiometricError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_upscale_off_is_fine_in_simple_mode() {
        let settings = PipelineSettings {
            upscale: Some(false),
            ..Default::default()
        };
        assert!(!settings.into_config().unwrap().upscale);
    }

    #[test]
    fn test_upscale_can_be_disabled_in_enhanced_mode() {
        let settings = PipelineSettings {
            upscale: Some(false),
            ..enhanced(3)
        };
        assert!(!settings.into_config().unwrap().upscale);
    }

    #[test]
    fn test_invalid_fade_is_rejected() {
        let settings = PipelineSettings {
            fade_distance: Some(-2.0),
            ..enhanced(3)
        };
        assert!(settings.into_config().is_err());
    }

    #[rstest]
    #[case::explicit_ratio_wins(Some((3, 4)), Some(PhotoFormat::Us), (3, 4))]
    #[case::preset(None, Some(PhotoFormat::Germany), (35, 45))]
    #[case::us_preset(None, Some(PhotoFormat::Us), (1, 1))]
    #[case::default(None, None, (4, 5))]
    fn test_ratio_resolution(
        #[case] ratio: Option<(u32, u32)>,
        #[case] format: Option<PhotoFormat>,
        #[case] expected: (u32, u32),
    ) {
        let settings = PipelineSettings {
            ratio: ratio.map(|(w, h)| TargetRatio::new(w, h).unwrap()),
            photo_format: format,
            ..Default::default()
        };
        let config = settings.into_config().unwrap();
        assert_eq!(<(u32, u32)>::from(config.target_ratio), expected);
    }

    #[test]
    fn test_merge_prefers_overrides() {
        let file = PipelineSettings {
            kernel_size: Some(3),
            fade_distance: Some(10.0),
            ..Default::default()
        };
        let flags = PipelineSettings {
            kernel_size: Some(9),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.kernel_size, Some(9));
        assert_eq!(merged.fade_distance, Some(10.0));
    }

    #[test]
    fn test_settings_from_json() {
        let json = r##"{
            "mode": "enhanced",
            "kernel_size": 4,
            "fade_distance": 12.5,
            "ratio": [35, 45],
            "background": "#EEEEEE"
        }"##;
        let settings: PipelineSettings = serde_json::from_str(json).unwrap();
        let config = settings.into_config().unwrap();
        assert_eq!(config.background, BackgroundColor([0xEE, 0xEE, 0xEE]));
        assert_eq!(config.target_ratio.to_string(), "35:45");
        let MatteMode::Enhanced(matte) = config.matte else {
            panic!("expected enhanced mode");
        };
        assert_eq!(matte.kernel_size(), 5);
        assert_eq!(matte.fade_distance(), 12.5);
    }

    #[test]
    fn test_unknown_json_fields_are_rejected() {
        let json = r#"{ "kernelSize": 3 }"#;
        assert!(serde_json::from_str::<PipelineSettings>(json).is_err());
    }

    #[test]
    fn test_invalid_json_ratio_is_rejected() {
        let json = r#"{ "ratio": [0, 5] }"#;
        assert!(serde_json::from_str::<PipelineSettings>(json).is_err());
    }

    #[rstest]
    #[case("simple", ProcessingMode::Simple)]
    #[case("Enhanced", ProcessingMode::Enhanced)]
    fn test_mode_from_str(#[case] input: &str, #[case] expected: ProcessingMode) {
        assert_eq!(input.parse::<ProcessingMode>().unwrap(), expected);
        assert!("fancy".parse::<ProcessingMode>().is_err());
    }
}
