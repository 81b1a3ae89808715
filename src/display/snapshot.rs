use std::sync::Arc;

use crate::channels::ChannelInfo;

/// Immutable view of the display state taken for one render.
///
/// Later edits on the display copy the channels they touch, so a snapshot
/// never observes them.
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    channels: Vec<Arc<ChannelInfo>>,
    selected: Vec<usize>,
    use_color_luts: bool,
    version: u64,
}

impl DisplaySnapshot {
    pub(crate) fn new(
        channels: Vec<Arc<ChannelInfo>>,
        selected: Vec<usize>,
        use_color_luts: bool,
        version: u64,
    ) -> Self {
        Self {
            channels,
            selected,
            use_color_luts,
            version,
        }
    }

    pub fn channels(&self) -> &[Arc<ChannelInfo>] {
        &self.channels
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_channels(&self) -> impl Iterator<Item = &Arc<ChannelInfo>> + '_ {
        self.selected
            .iter()
            .filter_map(|index| self.channels.get(*index))
    }

    pub fn use_color_luts(&self) -> bool {
        self.use_color_luts
    }

    /// Change timestamp of the display when the snapshot was taken.
    pub fn version(&self) -> u64 {
        self.version
    }
}
