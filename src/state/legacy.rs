use crate::display::ImageDisplay;
use crate::model::PropertyStore;

pub const LEGACY_COLOR_PREFIX: &str = "COLOR_CHANNEL_";

pub fn legacy_color_key(channel_name: &str) -> String {
    format!("{LEGACY_COLOR_PREFIX}{channel_name}")
}

/// Restores colours stored one property per channel. Only channels with a
/// settable colour are updated and display ranges are left alone.
pub fn apply_legacy_colors(display: &mut ImageDisplay, properties: &dyn PropertyStore) -> usize {
    let colors: Vec<(usize, u32)> = display
        .channels()
        .iter()
        .enumerate()
        .filter(|(_, channel)| channel.has_settable_color())
        .filter_map(|(index, channel)| {
            let raw = properties.get_property(&legacy_color_key(&channel.name()))?;
            let packed = raw.trim().parse::<i64>().ok()?;
            Some((index, (packed & 0x00ff_ffff) as u32))
        })
        .collect();

    let mut applied = 0;
    for (index, color) in colors {
        let updated = display
            .channel_entry(index)
            .is_ok_and(|channel| channel.set_lut_color(color).is_ok());
        if updated {
            applied += 1;
        }
    }
    applied
}
