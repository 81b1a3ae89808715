mod codec;
mod error;
mod legacy;

#[cfg(test)]
mod tests;

pub use codec::{ChannelDisplayState, to_json, update_from_json};
pub use error::{Result, StateError};
pub use legacy::{LEGACY_COLOR_PREFIX, apply_legacy_colors, legacy_color_key};
