use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::channels::ChannelInfo;
use crate::display::ImageDisplay;

use super::Result;

/// Stored settings of one catalog channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDisplayState {
    pub name: String,
    #[serde(default, alias = "class", skip_serializing_if = "Option::is_none")]
    pub implementation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_display: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_display: Option<f32>,
    /// Packed `0x00RRGGBB` stored as a signed 32-bit integer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<i32>,
    #[serde(default)]
    pub selected: bool,
}

impl ChannelDisplayState {
    fn matches(&self, channel: &ChannelInfo) -> bool {
        channel.name() == self.name.as_str()
            && self
                .implementation_id
                .as_deref()
                .is_none_or(|id| id == channel.implementation_id())
    }
}

/// One record per catalog channel, in catalog order.
pub fn to_json(channels: &[Arc<ChannelInfo>], selected: &[usize]) -> Result<String> {
    let records: Vec<ChannelDisplayState> = channels
        .iter()
        .enumerate()
        .map(|(index, channel)| ChannelDisplayState {
            name: channel.name().into_owned(),
            implementation_id: Some(channel.implementation_id().to_string()),
            min_display: Some(channel.min_display()),
            max_display: Some(channel.max_display()),
            color: channel.color().map(|color| (color & 0x00ff_ffff) as i32),
            selected: selected.contains(&index),
        })
        .collect();
    Ok(serde_json::to_string(&records)?)
}

/// Applies stored records to the matching channels of `display` and returns
/// how many matched. Records without a matching channel are ignored.
///
/// Nothing changes if `json` does not parse.
pub fn update_from_json(display: &mut ImageDisplay, json: &str) -> Result<usize> {
    let records: Vec<ChannelDisplayState> = serde_json::from_str(json)?;
    let mut remove = Vec::new();
    let mut add = Vec::new();
    for record in &records {
        let Some(index) = display
            .channels()
            .iter()
            .position(|channel| record.matches(channel))
        else {
            continue;
        };
        let channel = display.channel_entry(index)?;
        if let Some(min_display) = record.min_display {
            channel.window_mut().set_min_display(min_display);
        }
        if let Some(max_display) = record.max_display {
            channel.window_mut().set_max_display(max_display);
        }
        if let Some(color) = record.color.filter(|_| channel.has_settable_color()) {
            channel.set_lut_color(color as u32 & 0x00ff_ffff)?;
        }
        if record.selected {
            add.push(index);
        } else {
            remove.push(index);
        }
    }
    let matched = add.len() + remove.len();
    display.apply_selection_changes(&remove, &add);
    display.touch();
    Ok(matched)
}
