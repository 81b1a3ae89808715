use serde::{Deserialize, Serialize};

use crate::model::{blue, clamp8, green, pack_rgb, red};

use super::{Result, StainError, StainVector};

/// Three stain vectors plus the background (white) intensity of each RGB channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDeconvolutionStains {
    name: String,
    stains: [StainVector; 3],
    max_rgb: [f64; 3],
}

pub type OdLuts = [[f32; 256]; 3];

impl ColorDeconvolutionStains {
    pub fn new(name: impl Into<String>, stains: [StainVector; 3], max_rgb: [f64; 3]) -> Self {
        Self {
            name: name.into(),
            stains,
            max_rgb,
        }
    }

    /// Two stains with a residual third vector.
    pub fn with_residual(
        name: impl Into<String>,
        first: StainVector,
        second: StainVector,
        max_rgb: [f64; 3],
    ) -> Result<Self> {
        let residual = StainVector::residual(&first, &second)?;
        Ok(Self::new(name, [first, second, residual], max_rgb))
    }

    pub fn hematoxylin_eosin() -> Self {
        Self::preset(
            "H&E default",
            ("Hematoxylin", [0.651, 0.701, 0.290]),
            ("Eosin", [0.216, 0.801, 0.558]),
        )
    }

    pub fn hematoxylin_dab() -> Self {
        Self::preset(
            "H-DAB default",
            ("Hematoxylin", [0.650, 0.704, 0.286]),
            ("DAB", [0.268, 0.570, 0.776]),
        )
    }

    fn preset(name: &str, first: (&str, [f64; 3]), second: (&str, [f64; 3])) -> Self {
        let first = StainVector::preset(first.0, first.1);
        let second = StainVector::preset(second.0, second.1);
        let residual = StainVector::residual(&first, &second)
            .unwrap_or_else(|_| StainVector::preset("Residual", [0.0, 0.0, 1.0]));
        Self::new(name, [first, second, residual], [255.0; 3])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stain(&self, index: usize) -> Option<&StainVector> {
        self.stains.get(index)
    }

    pub fn stains(&self) -> &[StainVector; 3] {
        &self.stains
    }

    pub fn max_rgb(&self) -> [f64; 3] {
        self.max_rgb
    }

    pub fn set_stain(&mut self, index: usize, stain: StainVector) {
        if let Some(slot) = self.stains.get_mut(index) {
            *slot = stain;
        }
    }

    /// Compares stain directions and background values, ignoring names.
    pub fn has_same_vectors(&self, other: &Self) -> bool {
        self.max_rgb == other.max_rgb
            && self
                .stains
                .iter()
                .zip(&other.stains)
                .all(|(left, right)| left.components() == right.components())
    }

    /// Inverse of the matrix whose rows are the stain vectors.
    pub fn matrix_inverse(&self) -> Result<[[f64; 3]; 3]> {
        let m = self.stains.each_ref().map(StainVector::components);
        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(StainError::SingularMatrix(self.name.clone()));
        }
        let inv_det = 1.0 / det;
        Ok([
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ])
    }

    pub fn od_luts(&self) -> OdLuts {
        self.max_rgb.map(od_lut)
    }

    pub fn optical_density(&self, rgb: u32, luts: &OdLuts) -> [f64; 3] {
        [
            f64::from(luts[0][usize::from(red(rgb))]),
            f64::from(luts[1][usize::from(green(rgb))]),
            f64::from(luts[2][usize::from(blue(rgb))]),
        ]
    }

    /// Stain concentrations of one packed RGB pixel.
    pub fn deconvolve(&self, rgb: u32, inverse: &[[f64; 3]; 3], luts: &OdLuts) -> [f64; 3] {
        let od = self.optical_density(rgb, luts);
        std::array::from_fn(|stain| {
            od[0] * inverse[0][stain] + od[1] * inverse[1][stain] + od[2] * inverse[2][stain]
        })
    }

    /// Packed RGB produced by the given concentrations of these stains.
    pub fn reconvolve(&self, concentrations: [f64; 3]) -> u32 {
        let channel = |index: usize| {
            let od: f64 = self
                .stains
                .iter()
                .zip(concentrations)
                .map(|(stain, concentration)| stain.components()[index] * concentration)
                .sum();
            clamp8((self.max_rgb[index] * 10f64.powf(-od)) as f32)
        };
        pack_rgb(channel(0), channel(1), channel(2))
    }
}

/// Optical density of every 8-bit value for a channel with the given background.
pub fn od_lut(max_value: f64) -> [f32; 256] {
    let max_value = max_value.max(1.0);
    std::array::from_fn(|value| -((value.max(1) as f64) / max_value).log10() as f32)
}
