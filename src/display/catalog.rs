use std::collections::HashMap;

use tracing::debug;

use crate::channels::{ChannelInfo, RgbTransform, StainSelector};
use crate::model::{ImageData, ImageType, PixelType};

/// Properties of an image that decide which channels it offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CatalogSignature {
    is_rgb: bool,
    pixel_type: PixelType,
    n_channels: usize,
    image_type: ImageType,
}

impl CatalogSignature {
    pub(crate) fn of(data: &ImageData) -> Self {
        let server = data.server();
        Self {
            is_rgb: server.is_rgb(),
            pixel_type: server.pixel_type(),
            n_channels: server.n_channels(),
            image_type: data.image_type(),
        }
    }
}

pub(crate) fn build_catalog(data: &ImageData) -> Vec<ChannelInfo> {
    let mut channels = if data.server().is_rgb() {
        rgb_channels(data)
    } else {
        band_channels(data)
    };
    make_names_unique(&mut channels);
    debug!(
        path = data.server().path(),
        channels = channels.len(),
        rgb = data.server().is_rgb(),
        "channel catalog built"
    );
    channels
}

fn rgb_channels(data: &ImageData) -> Vec<ChannelInfo> {
    let mut channels = vec![ChannelInfo::rgb_direct()];
    let image_type = data.image_type();
    if image_type.is_brightfield() && image_type.has_recognized_stain_preset() {
        let stains = data.stains();
        for index in 0..3 {
            channels.push(ChannelInfo::stain_deconvolution(
                StainSelector::Stain(index),
                stains.clone(),
            ));
        }
        channels.push(ChannelInfo::stain_deconvolution(
            StainSelector::OpticalDensitySum,
            stains.clone(),
        ));
        if let Some(target) = image_type.default_stains() {
            channels.push(ChannelInfo::reconvolution(target, false, stains.clone()));
        }
        channels.push(ChannelInfo::normalized_optical_density(stains.clone()));
    }
    channels.extend(RgbTransform::SIMPLE.into_iter().map(ChannelInfo::rgb_transform));
    channels.extend(
        RgbTransform::CHROMATICITY
            .into_iter()
            .map(ChannelInfo::rgb_transform),
    );
    channels
}

fn band_channels(data: &ImageData) -> Vec<ChannelInfo> {
    let server = data.server();
    (0..server.n_channels())
        .map(|band| {
            let name = server
                .channel_name(band)
                .unwrap_or_else(|| format!("Channel {}", band + 1));
            ChannelInfo::multi_band(
                name,
                band,
                server.default_channel_color(band),
                server.pixel_type(),
            )
        })
        .collect()
}

/// Suffixes repeated names with ` (2)`, ` (3)`, ... so names identify channels.
fn make_names_unique(channels: &mut [ChannelInfo]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    for channel in channels.iter_mut() {
        let name = channel.name().into_owned();
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let mut suffix = *count;
            while seen.contains_key(&format!("{name} ({suffix})")) {
                suffix += 1;
            }
            channel.set_name_suffix(Some(suffix));
            seen.insert(channel.name().into_owned(), 1);
        }
    }
}
