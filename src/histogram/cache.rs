use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::channels::{ChannelInfo, ChannelKey};
use crate::model::{Region, Tile};

use super::Histogram;

/// Thumbnails and histograms computed for one image.
#[derive(Debug, Default, Clone)]
pub struct ImageHistograms {
    thumbnails: Vec<Tile>,
    histograms: HashMap<ChannelKey, Option<Arc<Histogram>>>,
}

impl ImageHistograms {
    pub fn thumbnails(&self) -> &[Tile] {
        &self.thumbnails
    }

    pub fn has_thumbnails(&self) -> bool {
        !self.thumbnails.is_empty()
    }

    /// Replaces the thumbnails and drops every histogram built from the old ones.
    pub fn set_thumbnails(&mut self, thumbnails: Vec<Tile>) {
        self.thumbnails = thumbnails;
        self.histograms.clear();
    }

    pub fn get(&self, key: &ChannelKey) -> Option<Option<&Arc<Histogram>>> {
        self.histograms.get(key).map(Option::as_ref)
    }

    pub fn contains(&self, key: &ChannelKey) -> bool {
        self.histograms.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Histogram of `channel` pooled over every thumbnail, built on first use.
    ///
    /// Channels without scalar values are recorded as `None`. So are channels
    /// whose thumbnails contain no finite values.
    pub fn ensure(&mut self, channel: &ChannelInfo, n_bins: usize) -> Option<Arc<Histogram>> {
        let key = channel.key();
        if let Some(cached) = self.histograms.get(&key) {
            return cached.clone();
        }
        let histogram = self.build(channel, n_bins).map(Arc::new);
        debug!(
            channel = %key.name,
            kind = key.implementation_id,
            built = histogram.is_some(),
            "histogram computed"
        );
        self.histograms.insert(key, histogram.clone());
        histogram
    }

    fn build(&self, channel: &ChannelInfo, n_bins: usize) -> Option<Histogram> {
        if !channel.supports_histogram() || self.thumbnails.is_empty() {
            return None;
        }
        let mut pooled = Vec::new();
        let mut values = Vec::new();
        for thumbnail in &self.thumbnails {
            let region = Region::new(0, 0, thumbnail.width(), thumbnail.height());
            if channel.extract_values_into(thumbnail, region, &mut values) {
                pooled.extend_from_slice(&values);
            }
        }
        match Histogram::from_values(&pooled, n_bins) {
            Ok(histogram) => Some(histogram.normalized()),
            Err(error) => {
                debug!(channel = %channel.name(), %error, "histogram skipped");
                None
            }
        }
    }

    /// Forgets the histogram of one channel so the next `ensure` rebuilds it.
    pub fn invalidate(&mut self, key: &ChannelKey) {
        self.histograms.remove(key);
    }

    pub fn invalidate_where(&mut self, mut stale: impl FnMut(&ChannelKey) -> bool) {
        self.histograms.retain(|key, _| !stale(key));
    }
}

/// Histograms keyed by a stable per-image identity such as its path.
#[derive(Debug, Default)]
pub struct HistogramCache {
    images: HashMap<String, ImageHistograms>,
}

impl HistogramCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, image_key: &str) -> bool {
        self.images.contains_key(image_key)
    }

    pub fn get(&self, image_key: &str) -> Option<&ImageHistograms> {
        self.images.get(image_key)
    }

    pub fn get_mut(&mut self, image_key: &str) -> Option<&mut ImageHistograms> {
        self.images.get_mut(image_key)
    }

    pub fn entry(&mut self, image_key: &str) -> &mut ImageHistograms {
        self.images.entry(image_key.to_string()).or_default()
    }

    pub fn remove(&mut self, image_key: &str) -> Option<ImageHistograms> {
        self.images.remove(image_key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }
}
