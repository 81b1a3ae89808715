use image::{Rgb, RgbImage};

use crate::model::{Tile, unpack_rgb};

use super::{RenderError, Result};

/// Packed `0x00RRGGBB` output of the compositor, row major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbRaster {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl RgbRaster {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.pixels
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn into_pixels(self) -> Vec<u32> {
        self.pixels
    }

    pub(crate) fn fits(&self, tile: &Tile) -> bool {
        self.width == tile.width() && self.height == tile.height()
    }
}

pub fn to_image(raster: &RgbRaster) -> Result<RgbImage> {
    let too_large = || RenderError::RasterTooLarge {
        width: raster.width,
        height: raster.height,
    };
    let width = u32::try_from(raster.width).map_err(|_| too_large())?;
    let height = u32::try_from(raster.height).map_err(|_| too_large())?;
    let mut bytes = Vec::with_capacity(raster.pixels.len() * 3);
    for rgb in &raster.pixels {
        let (r, g, b) = unpack_rgb(*rgb);
        bytes.extend_from_slice(&[r, g, b]);
    }
    let image: Option<RgbImage> = image::ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, bytes);
    image.ok_or_else(too_large)
}
