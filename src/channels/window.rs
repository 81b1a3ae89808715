use serde::{Deserialize, Serialize};

use crate::model::clamp8;

/// Allowed range and brightness/contrast window of one channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayWindow {
    min_allowed: f32,
    max_allowed: f32,
    /// `max_allowed` as constructed, before any histogram widened it.
    initial_max_allowed: f32,
    min_display: f32,
    max_display: f32,
    clip_to_allowed: bool,
}

impl DisplayWindow {
    pub fn new(min_allowed: f32, max_allowed: f32) -> Self {
        let mut window = Self {
            min_allowed: 0.0,
            max_allowed: 0.0,
            initial_max_allowed: 0.0,
            min_display: 0.0,
            max_display: 0.0,
            clip_to_allowed: false,
        };
        window.set_min_max_allowed(min_allowed, max_allowed);
        window.initial_max_allowed = window.max_allowed;
        window.min_display = window.min_allowed;
        window.max_display = window.max_allowed;
        window
    }

    pub fn with_display(mut self, min_display: f32, max_display: f32) -> Self {
        self.set_min_display(min_display);
        self.set_max_display(max_display);
        self
    }

    pub fn min_allowed(&self) -> f32 {
        self.min_allowed
    }

    pub fn max_allowed(&self) -> f32 {
        self.max_allowed
    }

    pub fn initial_max_allowed(&self) -> f32 {
        self.initial_max_allowed
    }

    pub fn min_display(&self) -> f32 {
        self.min_display
    }

    pub fn max_display(&self) -> f32 {
        self.max_display
    }

    pub fn clip_to_allowed(&self) -> bool {
        self.clip_to_allowed
    }

    /// Keeps `max_allowed > min_allowed`, moving the maximum if needed.
    pub fn set_min_max_allowed(&mut self, min_allowed: f32, max_allowed: f32) {
        self.min_allowed = min_allowed;
        self.max_allowed = if max_allowed > min_allowed {
            max_allowed
        } else {
            min_allowed + 1.0
        };
        if self.clip_to_allowed {
            self.clip_display();
        }
    }

    pub fn set_clip_to_allowed(&mut self, clip: bool) {
        self.clip_to_allowed = clip;
        if clip {
            self.clip_display();
        }
    }

    pub fn set_min_display(&mut self, value: f32) {
        self.min_display = if self.clip_to_allowed {
            value.clamp(self.min_allowed, self.max_allowed)
        } else {
            value
        };
    }

    pub fn set_max_display(&mut self, value: f32) {
        self.max_display = if self.clip_to_allowed {
            value.clamp(self.min_allowed, self.max_allowed)
        } else {
            value
        };
    }

    pub fn offset(&self) -> f32 {
        self.min_display
    }

    pub fn scale_to_byte(&self) -> f32 {
        255.0 / (self.max_display - self.min_display)
    }

    pub fn is_byte_range(&self) -> bool {
        self.min_display == 0.0 && self.max_display == 255.0
    }

    /// Maps a raw value to an 8-bit intensity.
    ///
    /// A collapsed window (`min_display == max_display`) is a step: values above
    /// it are full intensity, everything else is black.
    pub fn intensity(&self, value: f32) -> u8 {
        if value.is_nan() {
            return 0;
        }
        let span = self.max_display - self.min_display;
        if span == 0.0 {
            return if value > self.min_display { 255 } else { 0 };
        }
        let scale = ((value - self.min_display) / span).clamp(0.0, 1.0);
        clamp8(scale * 255.0)
    }

    /// Rescales one 8-bit sub-channel through the window.
    pub fn rescale_byte(&self, value: u8) -> u8 {
        clamp8((f32::from(value) - self.offset()) * self.scale_to_byte())
    }

    fn clip_display(&mut self) {
        self.min_display = self.min_display.clamp(self.min_allowed, self.max_allowed);
        self.max_display = self.max_display.clamp(self.min_allowed, self.max_allowed);
    }
}
