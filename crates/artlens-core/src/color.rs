//! Color records shared by the palette extractor and the color-theory stage.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB` form.
    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// HSL triple: hue in degrees `0..=359`, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hsl {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

/// One palette entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorSample {
    pub hex: String,
    pub rgb: Rgb,
    pub hsl: Hsl,
    /// Share of sampled pixels in this bucket, `(0, 100]`.
    pub percentage: f64,
    pub name: String,
}

/// Harmony classification of a palette, derived from its hue range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorHarmony {
    Monochromatic,
    Analogous,
    Complementary,
    Triadic,
}

impl ColorHarmony {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monochromatic => "monochromatic",
            Self::Analogous => "analogous",
            Self::Complementary => "complementary",
            Self::Triadic => "triadic",
        }
    }
}

impl fmt::Display for ColorHarmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Temperature classification by counting warm and cool hues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTemperature {
    Warm,
    Cool,
    Balanced,
}

impl ColorTemperature {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ColorTemperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mood classification from average saturation and lightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMood {
    Energetic,
    Dramatic,
    Calm,
    Serene,
    Balanced,
}

impl ColorMood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Energetic => "energetic",
            Self::Dramatic => "dramatic",
            Self::Calm => "calm",
            Self::Serene => "serene",
            Self::Balanced => "balanced",
        }
    }
}

impl fmt::Display for ColorMood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Color-theory reading of a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAnalysis {
    pub dominant_colors: Vec<ColorSample>,
    pub harmony: ColorHarmony,
    pub temperature: ColorTemperature,
    pub mood: ColorMood,
    pub average_saturation: f64,
    pub average_lightness: f64,
    pub insights: Vec<String>,
}
