use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::shared::error::BiometricError;

/// Width:height proportion the final crop should match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct TargetRatio {
    width: u32,
    height: u32,
}

impl TargetRatio {
    pub const DEFAULT: TargetRatio = TargetRatio {
        width: 4,
        height: 5,
    };

    pub fn new(width: u32, height: u32) -> Result<Self, BiometricError> {
        if width == 0 || height == 0 {
            return Err(BiometricError::InvalidParameter(format!(
                "ratio terms must be positive, got {width}:{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_f64(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// `round(width × h / w)`.
    pub fn height_for_width(&self, width: u32) -> u32 {
        (width as f64 * self.height as f64 / self.width as f64).round() as u32
    }
}

impl Default for TargetRatio {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<(u32, u32)> for TargetRatio {
    type Error = BiometricError;

    fn try_from((w, h): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(w, h)
    }
}

impl From<TargetRatio> for (u32, u32) {
    fn from(r: TargetRatio) -> Self {
        (r.width, r.height)
    }
}

impl FromStr for TargetRatio {
    type Err = BiometricError;

    /// Parses `W:H` (also accepts `W/H` and `WxH`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BiometricError::InvalidParameter(format!("ratio must look like 4:5, got '{s}'"));
        let (w, h) = s
            .split_once([':', '/', 'x'])
            .ok_or_else(invalid)?;
        let w = w.trim().parse::<u32>().map_err(|_| invalid())?;
        let h = h.trim().parse::<u32>().map_err(|_| invalid())?;
        Self::new(w, h)
    }
}

impl fmt::Display for TargetRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Named document formats and the crop ratio each one prescribes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoFormat {
    /// 4:5 head-and-shoulders portrait.
    #[default]
    Standard,
    /// US passport and visa, 2 × 2 in.
    Us,
    /// German passport, 35 × 45 mm.
    Germany,
}

impl PhotoFormat {
    pub const ALL: &[PhotoFormat] = &[PhotoFormat::Standard, PhotoFormat::Us, PhotoFormat::Germany];

    pub fn target_ratio(&self) -> TargetRatio {
        match self {
            PhotoFormat::Standard => TargetRatio::DEFAULT,
            PhotoFormat::Us => TargetRatio {
                width: 1,
                height: 1,
            },
            PhotoFormat::Germany => TargetRatio {
                width: 35,
                height: 45,
            },
        }
    }
}

impl FromStr for PhotoFormat {
    type Err = BiometricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(PhotoFormat::Standard),
            "us" => Ok(PhotoFormat::Us),
            "germany" | "de" => Ok(PhotoFormat::Germany),
            other => Err(BiometricError::InvalidParameter(format!(
                "photo format must be one of: standard, us, germany, got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for PhotoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoFormat::Standard => write!(f, "standard"),
            PhotoFormat::Us => write!(f, "us"),
            PhotoFormat::Germany => write!(f, "germany"),
        }
    }
}
