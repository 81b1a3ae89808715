use std::fmt::Debug;

use super::{PixelType, Result, Tile, pack_rgb};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Region {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Source of decoded rasters for one image.
pub trait ImageServer: Debug + Send + Sync {
    /// Stable identity of the image, used to key cached histograms.
    fn path(&self) -> &str;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn n_channels(&self) -> usize;
    fn n_z_slices(&self) -> usize;
    fn pixel_type(&self) -> PixelType;
    fn is_rgb(&self) -> bool;
    fn read_tile(&self, region: Region, z: usize) -> Result<Tile>;
    fn default_thumbnail(&self, z: usize) -> Result<Tile>;

    fn bits_per_pixel(&self) -> u32 {
        self.pixel_type().bits_per_pixel()
    }

    fn channel_name(&self, _channel: usize) -> Option<String> {
        None
    }

    fn default_channel_color(&self, channel: usize) -> u32 {
        if self.n_channels() == 1 {
            return pack_rgb(255, 255, 255);
        }
        default_channel_color(channel)
    }
}

pub fn default_channel_color(channel: usize) -> u32 {
    const COLORS: [u32; 6] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0x00ffff, 0xff00ff];
    COLORS[channel % COLORS.len()]
}
