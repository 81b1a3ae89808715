use std::path::Path;

use image::DynamicImage;

use crate::model::{MemoryImageServer, PixelType, Tile};

use super::Result;
use super::util::{source_name, widen};

/// 8-bit colour images become packed RGB tiles. Grayscale images keep their
/// raw sample values in a single band and 16-bit colour keeps three bands.
pub(crate) fn read_common_raster(path: &Path) -> Result<MemoryImageServer> {
    let image = image::open(path)?;
    let name = source_name(path);
    let server = match image {
        DynamicImage::ImageLuma8(buffer) => {
            let (width, height) = buffer.dimensions();
            let tile = Tile::from_band_values(
                width as usize,
                height as usize,
                vec![widen(buffer.as_raw().as_slice())],
            )?;
            MemoryImageServer::new(name, PixelType::U8, vec![tile])?
        }
        DynamicImage::ImageLuma16(buffer) => {
            let (width, height) = buffer.dimensions();
            let tile = Tile::from_band_values(
                width as usize,
                height as usize,
                vec![widen(buffer.as_raw().as_slice())],
            )?;
            MemoryImageServer::new(name, PixelType::U16, vec![tile])?
        }
        DynamicImage::ImageRgb16(buffer) => {
            let (width, height) = buffer.dimensions();
            let mut bands = vec![Vec::with_capacity(width as usize * height as usize); 3];
            for pixel in buffer.pixels() {
                for (band, value) in bands.iter_mut().zip(pixel.0) {
                    band.push(f32::from(value));
                }
            }
            let tile = Tile::from_band_values(width as usize, height as usize, bands)?;
            MemoryImageServer::new(name, PixelType::U16, vec![tile])?
                .with_channel_names(vec!["Red".into(), "Green".into(), "Blue".into()])
        }
        other => {
            let rgb = other.to_rgb8();
            let (width, height) = rgb.dimensions();
            let tile = Tile::from_rgb_bytes(width as usize, height as usize, rgb.as_raw())?;
            MemoryImageServer::new(name, PixelType::U8, vec![tile])?
        }
    };
    Ok(server)
}
