use serde::{Deserialize, Serialize};

use crate::model::{blue, green, red};

/// Scalar projections of a packed RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RgbTransform {
    Red,
    Green,
    Blue,
    Hue,
    Saturation,
    RgbMean,
    RedChromaticity,
    GreenChromaticity,
    BlueChromaticity,
}

impl RgbTransform {
    pub const SIMPLE: [Self; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Hue,
        Self::Saturation,
        Self::RgbMean,
    ];

    pub const CHROMATICITY: [Self; 3] = [
        Self::RedChromaticity,
        Self::GreenChromaticity,
        Self::BlueChromaticity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Hue => "Hue",
            Self::Saturation => "Saturation",
            Self::RgbMean => "RGB mean",
            Self::RedChromaticity => "Red chromaticity",
            Self::GreenChromaticity => "Green chromaticity",
            Self::BlueChromaticity => "Blue chromaticity",
        }
    }

    /// Only the plain channel projections can be summed meaningfully.
    pub fn is_additive(self) -> bool {
        matches!(self, Self::Red | Self::Green | Self::Blue)
    }

    pub fn max_allowed(self) -> f32 {
        match self {
            Self::Red | Self::Green | Self::Blue | Self::RgbMean => 255.0,
            _ => 1.0,
        }
    }

    pub fn lut_color(self) -> Option<u32> {
        match self {
            Self::Red => Some(0xff0000),
            Self::Green => Some(0x00ff00),
            Self::Blue => Some(0x0000ff),
            _ => None,
        }
    }

    pub fn value(self, rgb: u32) -> f32 {
        let (r, g, b) = (
            f32::from(red(rgb)),
            f32::from(green(rgb)),
            f32::from(blue(rgb)),
        );
        match self {
            Self::Red => r,
            Self::Green => g,
            Self::Blue => b,
            Self::RgbMean => (r + g + b) / 3.0,
            Self::Hue => hue(r, g, b),
            Self::Saturation => saturation(r, g, b),
            Self::RedChromaticity => chromaticity(r, r + g + b),
            Self::GreenChromaticity => chromaticity(g, r + g + b),
            Self::BlueChromaticity => chromaticity(b, r + g + b),
        }
    }
}

fn chromaticity(value: f32, sum: f32) -> f32 {
    if sum == 0.0 { 0.0 } else { value / sum }
}

fn saturation(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    if max == 0.0 { 0.0 } else { (max - min) / max }
}

/// Hue in `[0, 1)`, zero for achromatic pixels.
fn hue(r: f32, g: f32, b: f32) -> f32 {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    if delta == 0.0 {
        return 0.0;
    }
    let red_c = (max - r) / delta;
    let green_c = (max - g) / delta;
    let blue_c = (max - b) / delta;
    let sector = if r == max {
        blue_c - green_c
    } else if g == max {
        2.0 + red_c - blue_c
    } else {
        4.0 + green_c - red_c
    };
    let hue = sector / 6.0;
    if hue < 0.0 { hue + 1.0 } else { hue }
}
