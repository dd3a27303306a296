use std::fmt;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Serialize};

use crate::shared::error::BiometricError;

/// Flat colour painted wherever the matte is transparent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(pub [u8; 3]);

impl BackgroundColor {
    pub const WHITE: BackgroundColor = BackgroundColor([255, 255, 255]);

    pub fn rgb(&self) -> Rgb<u8> {
        Rgb(self.0)
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for BackgroundColor {
    type Err = BiometricError;

    /// Parses `#RRGGBB` or `RRGGBB`, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid =
            || BiometricError::InvalidParameter(format!("background must look like #RRGGBB, got '{s}'"));
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let mut rgb = [0u8; 3];
        for (i, channel) in rgb.iter_mut().enumerate() {
            *channel = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(rgb))
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = BiometricError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<BackgroundColor> for String {
    fn from(c: BackgroundColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for BackgroundColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "#{r:02X}{g:02X}{b:02X}")
    }
}
