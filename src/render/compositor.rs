use crate::display::DisplaySnapshot;
use crate::model::Tile;

use super::{Result, RgbRaster};

/// Composites the selected channels of `snapshot` over `tile`.
///
/// `dest` is reused when it already has the tile's size. The first selected
/// channel writes every pixel and later channels accumulate additively. A
/// single channel that leaves pixels unchanged is copied straight through.
pub fn render(snapshot: &DisplaySnapshot, tile: &Tile, dest: Option<RgbRaster>) -> Result<RgbRaster> {
    let mut raster = match dest {
        Some(raster) if raster.fits(tile) => raster,
        _ => RgbRaster::new(tile.width(), tile.height()),
    };

    let mut selected = snapshot.selected_channels();
    let Some(first) = selected.next() else {
        raster.pixels_mut().fill(0);
        return Ok(raster);
    };

    if snapshot.selected_len() == 1 && !first.does_something() {
        copy_tile(tile, raster.pixels_mut());
        return Ok(raster);
    }

    let use_luts = snapshot.use_color_luts();
    first.fill_rgb(tile, raster.pixels_mut(), use_luts)?;
    for channel in selected {
        channel.accumulate_rgb(tile, raster.pixels_mut(), use_luts)?;
    }
    Ok(raster)
}

fn copy_tile(tile: &Tile, out: &mut [u32]) {
    match tile.rgb_pixels() {
        Some(pixels) => out.copy_from_slice(pixels),
        None => {
            let width = tile.width();
            for (index, pixel) in out.iter_mut().enumerate() {
                *pixel = tile.rgb_at(index % width, index / width);
            }
        }
    }
}

/// Raw values of the selected channels at one pixel, comma separated.
pub fn value_as_string(snapshot: &DisplaySnapshot, tile: &Tile, x: usize, y: usize) -> String {
    snapshot
        .selected_channels()
        .filter_map(|channel| channel.value_as_string(tile, x, y))
        .collect::<Vec<_>>()
        .join(", ")
}
