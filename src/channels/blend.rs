use crate::model::{blue, green, pack_rgb, red};

/// Adds two packed RGB values with per-channel saturation.
///
/// An accumulator of `0` has not been written yet, so the new value replaces it.
pub fn blend_additive(acc: u32, own: u32) -> u32 {
    if acc == 0 {
        return own;
    }
    if own == 0 {
        return acc;
    }
    let add = |a: u8, b: u8| a.saturating_add(b);
    pack_rgb(
        add(red(acc), red(own)),
        add(green(acc), green(own)),
        add(blue(acc), blue(own)),
    )
}
