use std::sync::Arc;

use tracing::debug;

use crate::model::{clamp8, pack_rgb};
use crate::stains::{ColorDeconvolutionStains, OdLuts, StainsHandle, od_lut};

use super::DisplayWindow;

/// Minimum optical density norm for a pixel to count as stained.
pub const NORMALIZED_OD_CLIP: f64 = 0.1;

const WHITE: u32 = 0x00ff_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StainSelector {
    /// Index into the image's three stain vectors.
    Stain(usize),
    OpticalDensitySum,
}

impl StainSelector {
    pub fn placeholder_name(self) -> String {
        match self {
            Self::Stain(index) => format!("Stain {}", index + 1),
            Self::OpticalDensitySum => "Optical density sum".to_string(),
        }
    }

    pub fn default_window(self) -> DisplayWindow {
        match self {
            Self::Stain(_) => DisplayWindow::new(0.0, 3.0).with_display(0.0, 1.5),
            Self::OpticalDensitySum => DisplayWindow::new(0.0, 5.0).with_display(0.0, 2.5),
        }
    }

    pub fn name(self, stains: Option<&ColorDeconvolutionStains>) -> String {
        match (self, stains) {
            (Self::Stain(index), Some(stains)) => stains
                .stain(index)
                .map(|stain| stain.name().to_string())
                .unwrap_or_else(|| self.placeholder_name()),
            _ => self.placeholder_name(),
        }
    }

    pub fn color(self, stains: Option<&ColorDeconvolutionStains>) -> u32 {
        match (self, stains) {
            (Self::Stain(index), Some(stains)) => {
                stains.stain(index).map(|stain| stain.color()).unwrap_or(WHITE)
            }
            _ => WHITE,
        }
    }
}

/// Stains resolved once for a tile or pixel query.
pub(crate) struct DeconvolutionContext {
    stains: Arc<ColorDeconvolutionStains>,
    inverse: Option<[[f64; 3]; 3]>,
    luts: OdLuts,
}

impl DeconvolutionContext {
    pub(crate) fn resolve(handle: &StainsHandle) -> Option<Self> {
        let (stains, version) = handle.current();
        let stains = stains?;
        let inverse = match stains.matrix_inverse() {
            Ok(inverse) => Some(inverse),
            Err(error) => {
                debug!(version, %error, "stain matrix cannot be inverted");
                None
            }
        };
        let luts = stains.od_luts();
        Some(Self {
            stains,
            inverse,
            luts,
        })
    }

    pub(crate) fn stains(&self) -> &ColorDeconvolutionStains {
        &self.stains
    }

    pub(crate) fn value(&self, selector: StainSelector, rgb: u32) -> f32 {
        match selector {
            StainSelector::OpticalDensitySum => {
                let od = self.stains.optical_density(rgb, &self.luts);
                (od[0] + od[1] + od[2]) as f32
            }
            StainSelector::Stain(index) => match &self.inverse {
                Some(inverse) if index < 3 => {
                    self.stains.deconvolve(rgb, inverse, &self.luts)[index] as f32
                }
                _ => 0.0,
            },
        }
    }

    /// Re-renders a pixel as if it had been stained with `target`.
    pub(crate) fn reconvolve(
        &self,
        target: &ColorDeconvolutionStains,
        discard_residual: bool,
        rgb: u32,
    ) -> u32 {
        let Some(inverse) = &self.inverse else {
            return rgb;
        };
        let mut concentrations = self.stains.deconvolve(rgb, inverse, &self.luts);
        if discard_residual {
            concentrations[2] = 0.0;
        }
        target.reconvolve(concentrations)
    }
}

pub(crate) fn default_od_luts() -> OdLuts {
    [od_lut(255.0), od_lut(255.0), od_lut(255.0)]
}

pub(crate) fn normalized_od_pixel(luts: &OdLuts, rgb: u32) -> u32 {
    let od = [
        f64::from(luts[0][usize::from(crate::model::red(rgb))]),
        f64::from(luts[1][usize::from(crate::model::green(rgb))]),
        f64::from(luts[2][usize::from(crate::model::blue(rgb))]),
    ];
    let norm = (od[0] * od[0] + od[1] * od[1] + od[2] * od[2]).sqrt();
    if norm < NORMALIZED_OD_CLIP {
        return WHITE;
    }
    let channel = |value: f64| clamp8((255.0 * 10f64.powf(-value / norm)) as f32);
    pack_rgb(channel(od[0]), channel(od[1]), channel(od[2]))
}
