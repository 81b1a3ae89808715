use std::sync::Arc;

use tracing::{debug, warn};

use crate::channels::{ChannelInfo, ChannelKey, ChannelKind};
use crate::histogram::{
    Histogram, HistogramCache, auto_set_display_range, update_allowed_from_histogram,
};
use crate::model::{ImageData, ImageType};
use crate::settings::DisplaySettings;
use crate::stains::ColorDeconvolutionStains;
use crate::state;

use super::catalog::{CatalogSignature, build_catalog};
use super::seed::{SeedReport, seed_thumbnails};
use super::{DisplayError, DisplaySnapshot, Result};

/// Image property holding the serialized display state.
pub const DISPLAY_PROPERTY_KEY: &str = "image-display.channels";

/// Channel catalog, selection and ranges for the currently open image.
///
/// While an image is loaded the selection is never empty and only holds
/// catalog indices. It contains several channels only if all of them are
/// additive and colour LUTs are enabled.
#[derive(Debug)]
pub struct ImageDisplay {
    settings: DisplaySettings,
    image: Option<ImageData>,
    signature: Option<CatalogSignature>,
    stains_version: u64,
    catalog: Vec<Arc<ChannelInfo>>,
    selected: Vec<usize>,
    last_selected: Option<usize>,
    use_color_luts: bool,
    cache: HistogramCache,
    change_timestamp: u64,
}

impl Default for ImageDisplay {
    fn default() -> Self {
        Self::new(DisplaySettings::default())
    }
}

impl ImageDisplay {
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            use_color_luts: settings.use_color_luts,
            settings,
            image: None,
            signature: None,
            stains_version: 0,
            catalog: Vec::new(),
            selected: Vec::new(),
            last_selected: None,
            cache: HistogramCache::new(),
            change_timestamp: 0,
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn image(&self) -> Option<&ImageData> {
        self.image.as_ref()
    }

    pub fn channels(&self) -> &[Arc<ChannelInfo>] {
        &self.catalog
    }

    pub fn channel(&self, index: usize) -> Option<&ChannelInfo> {
        self.catalog.get(index).map(Arc::as_ref)
    }

    pub fn find_channel(&self, name: &str) -> Option<usize> {
        self.catalog.iter().position(|channel| channel.name() == name)
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_channels(&self) -> impl Iterator<Item = &ChannelInfo> + '_ {
        self.selected.iter().map(|index| self.catalog[*index].as_ref())
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn last_selected(&self) -> Option<usize> {
        self.last_selected
    }

    pub fn use_color_luts(&self) -> bool {
        self.use_color_luts
    }

    /// Bumped by every change that affects rendering.
    pub fn change_timestamp(&self) -> u64 {
        self.change_timestamp
    }

    pub fn histogram_cache(&self) -> &HistogramCache {
        &self.cache
    }

    pub fn histogram(&self, index: usize) -> Option<Arc<Histogram>> {
        let channel = self.catalog.get(index)?;
        self.cache
            .get(self.image_key()?)?
            .get(&channel.key())
            .flatten()
            .cloned()
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot::new(
            self.catalog.clone(),
            self.selected.clone(),
            self.use_color_luts,
            self.change_timestamp,
        )
    }

    /// Switches to `image`, rebuilding the catalog and restoring any
    /// persisted state. Returns the seeding report when thumbnails had to
    /// be fetched, `None` when cached ones were reused or no image is set.
    pub fn set_image(&mut self, image: Option<ImageData>) -> Option<SeedReport> {
        self.image = image;
        self.catalog.clear();
        self.selected.clear();
        self.last_selected = None;
        self.signature = None;
        self.change_timestamp += 1;

        let data = self.image.as_ref()?;
        self.signature = Some(CatalogSignature::of(data));
        self.stains_version = data.stains().version();
        self.catalog = self.new_catalog(data);
        self.selected = self.default_selection();

        let report = self.ensure_thumbnails();
        for index in 0..self.catalog.len() {
            self.apply_histogram(index);
        }
        self.restore_state();
        report
    }

    /// Rebuilds the catalog when the image's layout, bit depth or type
    /// changed, keeping selected channels that still exist. Returns whether
    /// the catalog was rebuilt.
    pub fn refresh_channel_options(&mut self) -> bool {
        let Some(data) = self.image.as_ref() else {
            return false;
        };
        let signature = CatalogSignature::of(data);
        if self.signature == Some(signature) {
            if self.sync_stains() {
                self.touch();
            }
            return false;
        }

        let previous: Vec<ChannelKey> = self.selected_channels().map(ChannelInfo::key).collect();
        let last = self.last_selected.map(|index| self.catalog[index].key());
        let version = data.stains().version();
        let stains_changed = version != self.stains_version;
        self.signature = Some(signature);
        self.stains_version = version;
        self.catalog = self.new_catalog(data);
        if stains_changed {
            self.invalidate_stain_histograms();
        }

        let position = |key: &ChannelKey| self.catalog.iter().position(|c| c.key() == *key);
        self.selected = previous.iter().filter_map(position).collect();
        self.last_selected = last.as_ref().and_then(position);
        if self.selected.is_empty() {
            self.selected = self.default_selection();
        }
        for index in 0..self.catalog.len() {
            self.apply_histogram(index);
        }
        debug!(channels = self.catalog.len(), "channel options refreshed");
        self.touch();
        true
    }

    /// Changes the image type, which rebuilds the catalog and resets stains.
    pub fn set_image_type(&mut self, image_type: ImageType) -> Result<bool> {
        self.image.as_mut().ok_or(DisplayError::NoImage)?.set_image_type(image_type);
        Ok(self.refresh_channel_options())
    }

    pub fn set_stains(&mut self, stains: Option<ColorDeconvolutionStains>) -> Result<()> {
        self.image
            .as_ref()
            .ok_or(DisplayError::NoImage)?
            .stains()
            .set(stains);
        self.refresh_channel_options();
        Ok(())
    }

    /// Toggles one channel in or out of the selection.
    pub fn set_channel_selected(&mut self, index: usize, selected: bool) -> Result<()> {
        self.check_index(index)?;
        if selected {
            self.select(index);
        } else {
            self.deselect(index);
        }
        self.ensure_selection();
        self.touch();
        Ok(())
    }

    /// Makes `indices` the selection, subject to the usual toggle rules.
    pub fn select_channels(&mut self, indices: &[usize]) -> Result<()> {
        for index in indices {
            self.check_index(*index)?;
        }
        let remove: Vec<usize> = (0..self.catalog.len())
            .filter(|index| !indices.contains(index))
            .collect();
        self.apply_selection_changes(&remove, indices);
        self.touch();
        Ok(())
    }

    /// Applies removals first, then additions through the toggle rules.
    pub(crate) fn apply_selection_changes(&mut self, remove: &[usize], add: &[usize]) {
        for index in remove {
            self.deselect(*index);
        }
        for index in add {
            if !self.is_selected(*index) {
                self.select(*index);
            }
        }
        self.ensure_selection();
    }

    /// Disabling LUTs collapses the selection to a single channel.
    pub fn set_use_color_luts(&mut self, use_color_luts: bool) {
        if self.use_color_luts == use_color_luts {
            return;
        }
        self.use_color_luts = use_color_luts;
        if !use_color_luts && self.selected.len() > 1 {
            let keep = self
                .last_selected
                .filter(|index| self.is_selected(*index))
                .unwrap_or(self.selected[0]);
            self.selected = vec![keep];
        }
        self.touch();
    }

    pub fn set_min_display(&mut self, index: usize, value: f32) -> Result<()> {
        self.channel_entry(index)?.window_mut().set_min_display(value);
        self.touch();
        Ok(())
    }

    pub fn set_max_display(&mut self, index: usize, value: f32) -> Result<()> {
        self.channel_entry(index)?.window_mut().set_max_display(value);
        self.touch();
        Ok(())
    }

    pub fn set_min_max_display(&mut self, index: usize, min: f32, max: f32) -> Result<()> {
        let window = self.channel_entry(index)?.window_mut();
        window.set_min_display(min);
        window.set_max_display(max);
        self.touch();
        Ok(())
    }

    pub fn set_lut_color(&mut self, index: usize, color: u32) -> Result<()> {
        self.channel_entry(index)?.set_lut_color(color)?;
        self.touch();
        Ok(())
    }

    /// Auto-ranges one channel from its histogram. Returns `false` when the
    /// channel has no histogram and keeps its window.
    pub fn auto_set_display_range(&mut self, index: usize, saturation: Option<f64>) -> Result<bool> {
        self.check_index(index)?;
        let saturation = saturation.unwrap_or(self.settings.saturation);
        let histogram = self.histogram(index);
        let channel = self.channel_entry(index)?;
        if histogram.is_none() && !matches!(channel.kind(), ChannelKind::RgbDirect) {
            warn!(channel = %channel.name(), "no histogram available for auto-ranging");
        }
        let applied = auto_set_display_range(channel.window_mut(), histogram.as_deref(), saturation);
        if applied {
            self.touch();
        }
        Ok(applied)
    }

    /// Auto-ranges every channel that has a histogram.
    pub fn auto_set_all(&mut self, saturation: Option<f64>) -> usize {
        let saturation = saturation.unwrap_or(self.settings.saturation);
        let mut applied = 0;
        for index in 0..self.catalog.len() {
            let Some(histogram) = self.histogram(index) else {
                continue;
            };
            let window = Arc::make_mut(&mut self.catalog[index]).window_mut();
            if auto_set_display_range(window, Some(&histogram), saturation) {
                applied += 1;
            }
        }
        if applied > 0 {
            self.touch();
        }
        applied
    }

    /// Releases the scratch buffers of every channel.
    pub fn reset_buffers(&self) {
        for channel in &self.catalog {
            channel.reset_buffers();
        }
    }

    /// Fetches fresh thumbnails for the current image and recomputes every
    /// histogram from them.
    pub fn seed_histograms(&mut self) -> Option<SeedReport> {
        let data = self.image.as_ref()?;
        let (thumbnails, report) = seed_thumbnails(data.server(), self.settings.seed_timeout());
        self.cache
            .entry(data.server().path())
            .set_thumbnails(thumbnails);
        for index in 0..self.catalog.len() {
            self.apply_histogram(index);
        }
        self.touch();
        Some(report)
    }

    /// Writes the current state to the image properties.
    pub fn persist_state(&self) {
        if !self.settings.persist_state {
            return;
        }
        let Some(data) = self.image.as_ref() else {
            return;
        };
        match state::to_json(&self.catalog, &self.selected) {
            Ok(json) => data.properties().set_property(DISPLAY_PROPERTY_KEY, json),
            Err(error) => warn!(%error, "display state not persisted"),
        }
    }

    pub(crate) fn channel_entry(&mut self, index: usize) -> Result<&mut ChannelInfo> {
        self.check_index(index)?;
        Ok(Arc::make_mut(&mut self.catalog[index]))
    }

    pub(crate) fn touch(&mut self) {
        self.change_timestamp += 1;
        self.persist_state();
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.catalog.len() {
            return Err(DisplayError::ChannelOutOfRange {
                index,
                len: self.catalog.len(),
            });
        }
        Ok(())
    }

    fn image_key(&self) -> Option<&str> {
        self.image.as_ref().map(|data| data.server().path())
    }

    fn new_catalog(&self, data: &ImageData) -> Vec<Arc<ChannelInfo>> {
        build_catalog(data)
            .into_iter()
            .map(|mut channel| {
                channel
                    .window_mut()
                    .set_clip_to_allowed(self.settings.clip_to_allowed);
                Arc::new(channel)
            })
            .collect()
    }

    fn default_selection(&self) -> Vec<usize> {
        let rgb = self
            .image
            .as_ref()
            .is_some_and(|data| data.server().is_rgb());
        match self.catalog.len() {
            0 => Vec::new(),
            len if !rgb && self.use_color_luts => (0..len).collect(),
            _ => vec![0],
        }
    }

    fn select(&mut self, index: usize) {
        let additive = self.catalog[index].is_additive();
        let first_non_additive = self
            .selected
            .first()
            .is_some_and(|first| !self.catalog[*first].is_additive());
        if !self.use_color_luts || !additive || first_non_additive {
            self.selected.clear();
        }
        if !self.selected.contains(&index) {
            self.selected.push(index);
        }
        self.last_selected = Some(index);
    }

    fn deselect(&mut self, index: usize) {
        if self.is_selected(index) {
            self.selected.retain(|selected| *selected != index);
            self.last_selected = None;
        }
    }

    fn ensure_selection(&mut self) {
        if self.selected.is_empty() && !self.catalog.is_empty() {
            self.selected.push(0);
        }
    }

    fn ensure_thumbnails(&mut self) -> Option<SeedReport> {
        let data = self.image.as_ref()?;
        let key = data.server().path();
        if self.cache.get(key).is_some_and(|entry| entry.has_thumbnails()) {
            debug!(path = key, "reusing cached histograms");
            return None;
        }
        let (thumbnails, report) = seed_thumbnails(data.server(), self.settings.seed_timeout());
        self.cache.entry(key).set_thumbnails(thumbnails);
        Some(report)
    }

    /// Builds the histogram of one channel and updates its ranges from it.
    /// Channels that look 8-bit keep their default window.
    fn apply_histogram(&mut self, index: usize) {
        let Some(data) = self.image.as_ref() else {
            return;
        };
        let entry = self.cache.entry(data.server().path());
        let Some(histogram) = entry.ensure(&self.catalog[index], self.settings.histogram_bins)
        else {
            return;
        };
        let window = Arc::make_mut(&mut self.catalog[index]).window_mut();
        if !update_allowed_from_histogram(window, &histogram) {
            auto_set_display_range(window, Some(&histogram), self.settings.saturation);
        }
    }

    /// Recomputes stain-dependent histograms after the stains were edited.
    fn sync_stains(&mut self) -> bool {
        let Some(data) = self.image.as_ref() else {
            return false;
        };
        let version = data.stains().version();
        if version == self.stains_version {
            return false;
        }
        self.stains_version = version;
        self.invalidate_stain_histograms();
        let dependent: Vec<usize> = (0..self.catalog.len())
            .filter(|index| self.catalog[*index].kind().depends_on_stains())
            .collect();
        for index in dependent {
            self.apply_histogram(index);
        }
        debug!(version, "stain-dependent channels updated");
        true
    }

    fn invalidate_stain_histograms(&mut self) {
        let Some(data) = self.image.as_ref() else {
            return;
        };
        if let Some(entry) = self.cache.get_mut(data.server().path()) {
            entry.invalidate_where(ChannelKey::depends_on_stains);
        }
    }

    fn restore_state(&mut self) {
        let Some(properties) = self.image.as_ref().map(|data| Arc::clone(data.properties())) else {
            return;
        };
        if let Some(json) = properties.get_property(DISPLAY_PROPERTY_KEY) {
            match state::update_from_json(self, &json) {
                Ok(matched) => {
                    debug!(matched, "display state restored");
                    return;
                }
                Err(error) => warn!(%error, "malformed display state, trying legacy colors"),
            }
        }
        let applied = state::apply_legacy_colors(self, properties.as_ref());
        if applied > 0 {
            debug!(applied, "legacy channel colors restored");
            self.touch();
        }
    }
}
