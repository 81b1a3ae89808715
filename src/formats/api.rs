use std::path::Path;

use tracing::debug;

use crate::model::{ImageServer, MemoryImageServer};
use crate::render::{RgbRaster, to_image};

use super::raster::read_common_raster;
use super::tiff::read_tiff;
use super::util::extension;
use super::{IoError, Result};

/// Decodes an image file into a fully loaded image server.
///
/// PNG and JPEG files hold a single Z slice. Every page of a TIFF becomes one
/// Z slice.
pub fn read_image(path: impl AsRef<Path>) -> Result<MemoryImageServer> {
    let path = path.as_ref();
    let extension = extension(path)?;
    let server = match extension.as_str() {
        "png" | "jpg" | "jpeg" => read_common_raster(path)?,
        "tif" | "tiff" => read_tiff(path)?,
        other => return Err(IoError::UnsupportedFormat(other.to_string())),
    };
    debug!(
        path = %path.display(),
        width = server.width(),
        height = server.height(),
        channels = server.n_channels(),
        z_slices = server.n_z_slices(),
        rgb = server.is_rgb(),
        "decoded image"
    );
    Ok(server)
}

/// Writes a composited raster as an 8-bit RGB PNG.
pub fn write_png(path: impl AsRef<Path>, raster: &RgbRaster) -> Result<()> {
    let path = path.as_ref();
    let extension = extension(path)?;
    if extension != "png" {
        return Err(IoError::UnsupportedFormat(extension));
    }
    to_image(raster)?.save(path)?;
    Ok(())
}

pub fn supported_formats() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "tif", "tiff"]
}
