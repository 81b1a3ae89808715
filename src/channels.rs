mod blend;
mod error;
mod info;
mod lut;
mod rgb;
mod stain;
mod window;

#[cfg(test)]
mod tests;

pub use blend::blend_additive;
pub use error::{ChannelError, Result};
pub use info::{ChannelInfo, ChannelKey, ChannelKind};
pub use lut::ColorLut;
pub use rgb::RgbTransform;
pub use stain::{NORMALIZED_OD_CLIP, StainSelector};
pub use window::DisplayWindow;
