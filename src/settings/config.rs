use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::histogram::{DEFAULT_BINS, DEFAULT_SATURATION};

use super::{Result, SettingsError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub use_color_luts: bool,
    /// Fraction of histogram mass clipped at each tail by auto-ranging.
    pub saturation: f64,
    pub histogram_bins: usize,
    pub clip_to_allowed: bool,
    pub seed_timeout_secs: u64,
    /// Write display state into the image properties after every change.
    pub persist_state: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            use_color_luts: true,
            saturation: DEFAULT_SATURATION,
            histogram_bins: DEFAULT_BINS,
            clip_to_allowed: false,
            seed_timeout_secs: 30,
            persist_state: true,
        }
    }
}

impl DisplaySettings {
    pub fn seed_timeout(&self) -> Duration {
        Duration::from_secs(self.seed_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins < 2 {
            return Err(SettingsError::Invalid(format!(
                "histogram_bins must be at least 2, got {}",
                self.histogram_bins
            )));
        }
        if !self.saturation.is_finite() {
            return Err(SettingsError::Invalid(format!(
                "saturation must be finite, got {}",
                self.saturation
            )));
        }
        Ok(())
    }
}
