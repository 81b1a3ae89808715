use std::path::Path;

use crate::model::MemoryImageServer;
use crate::render::RgbRaster;

use super::{Result, read_image, supported_formats, write_png};

pub trait ImageReader {
    fn supports_extension(&self, extension: &str) -> bool;
    fn read(&self, path: &Path) -> Result<MemoryImageServer>;
}

pub trait RasterWriter {
    fn supports_extension(&self, extension: &str) -> bool;
    fn write(&self, path: &Path, raster: &RgbRaster) -> Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultImageCodec;

impl ImageReader for DefaultImageCodec {
    fn supports_extension(&self, extension: &str) -> bool {
        supported_formats().contains(&extension)
    }

    fn read(&self, path: &Path) -> Result<MemoryImageServer> {
        read_image(path)
    }
}

impl RasterWriter for DefaultImageCodec {
    fn supports_extension(&self, extension: &str) -> bool {
        extension == "png"
    }

    fn write(&self, path: &Path, raster: &RgbRaster) -> Result<()> {
        write_png(path, raster)
    }
}
