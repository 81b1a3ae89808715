use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PixelType {
    #[default]
    U8,
    U16,
    F32,
}

impl PixelType {
    pub fn bits_per_pixel(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::F32 => 32,
        }
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, Self::F32)
    }

    /// Upper bound of the representable range. Floating point images report 1.0
    /// and rely on histograms to widen the allowed range.
    pub fn max_value(self) -> f32 {
        match self {
            Self::U8 => 255.0,
            Self::U16 => 65_535.0,
            Self::F32 => 1.0,
        }
    }
}
