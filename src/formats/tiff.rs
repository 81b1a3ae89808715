use std::fs::File;
use std::path::Path;

use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

use crate::model::{MemoryImageServer, PixelType, Tile};

use super::util::{source_name, widen};
use super::{IoError, Result};

/// Reads every page of a TIFF as one Z slice.
///
/// Gray pages keep their raw samples in a single band. 8-bit RGB pages become
/// packed RGB tiles. All pages must share the first page's size and layout.
pub(crate) fn read_tiff(path: &Path) -> Result<MemoryImageServer> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;
    let mut slices = Vec::new();
    let mut pixel_type = PixelType::U8;

    loop {
        let (tile, page_type) = decode_tiff_page(&mut decoder, width, height)?;
        if slices.is_empty() {
            pixel_type = page_type;
        } else if page_type != pixel_type {
            return Err(IoError::UnsupportedLayout(
                "TIFF pages must share one sample type".into(),
            ));
        }
        slices.push(tile);
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
        let (other_width, other_height) = decoder.dimensions()?;
        if other_width != width || other_height != height {
            return Err(IoError::UnsupportedLayout(
                "TIFF pages must have identical dimensions".into(),
            ));
        }
    }

    Ok(MemoryImageServer::new(source_name(path), pixel_type, slices)?)
}

fn decode_tiff_page(
    decoder: &mut Decoder<File>,
    width: u32,
    height: u32,
) -> Result<(Tile, PixelType)> {
    let (width, height) = (width as usize, height as usize);
    let color_type = decoder.colortype()?;
    let samples = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::RGB(8) => 3,
        other => {
            return Err(IoError::UnsupportedLayout(format!(
                "unsupported TIFF colour type: {other:?}"
            )));
        }
    };

    let page = match decoder.read_image()? {
        DecodingResult::U8(buffer) if samples == 3 => {
            (Tile::from_rgb_bytes(width, height, &buffer)?, PixelType::U8)
        }
        DecodingResult::U8(buffer) => (gray_tile(width, height, widen(buffer.as_slice()))?, PixelType::U8),
        DecodingResult::U16(buffer) if samples == 1 => {
            (gray_tile(width, height, widen(buffer.as_slice()))?, PixelType::U16)
        }
        DecodingResult::F32(buffer) if samples == 1 => {
            (gray_tile(width, height, buffer)?, PixelType::F32)
        }
        _ => {
            return Err(IoError::UnsupportedLayout(format!(
                "unsupported TIFF sample type for {color_type:?}"
            )));
        }
    };
    Ok(page)
}

fn gray_tile(width: usize, height: usize, values: Vec<f32>) -> Result<Tile> {
    Ok(Tile::from_band_values(width, height, vec![values])?)
}
