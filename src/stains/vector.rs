use serde::{Deserialize, Serialize};

use crate::model::{clamp8, pack_rgb};

use super::{Result, StainError};

/// Unit-length optical density direction of one stain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StainVector {
    name: String,
    r: f64,
    g: f64,
    b: f64,
}

impl StainVector {
    pub fn new(name: impl Into<String>, r: f64, g: f64, b: f64) -> Result<Self> {
        let name = name.into();
        let norm = (r * r + g * g + b * b).sqrt();
        if !norm.is_finite() || norm <= f64::EPSILON {
            return Err(StainError::ZeroVector(name));
        }
        Ok(Self {
            name,
            r: r / norm,
            g: g / norm,
            b: b / norm,
        })
    }

    /// Built-in stain constants; `components` must be non-zero.
    pub(crate) fn preset(name: &str, components: [f64; 3]) -> Self {
        let [r, g, b] = components;
        let norm = (r * r + g * g + b * b).sqrt();
        Self {
            name: name.to_string(),
            r: r / norm,
            g: g / norm,
            b: b / norm,
        }
    }

    /// Normalised cross product of two stains.
    pub fn residual(first: &Self, second: &Self) -> Result<Self> {
        let r = first.g * second.b - first.b * second.g;
        let g = first.b * second.r - first.r * second.b;
        let b = first.r * second.g - first.g * second.r;
        // Absorbance directions stay in the positive octant.
        let sign = if r + g + b < 0.0 { -1.0 } else { 1.0 };
        Self::new("Residual", r * sign, g * sign, b * sign)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_residual(&self) -> bool {
        self.name == "Residual"
    }

    pub fn components(&self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Colour the stain appears in under transmitted white light.
    pub fn color(&self) -> u32 {
        pack_rgb(
            clamp8((255.0 - self.r * 255.0) as f32),
            clamp8((255.0 - self.g * 255.0) as f32),
            clamp8((255.0 - self.b * 255.0) as f32),
        )
    }
}
