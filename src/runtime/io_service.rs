use std::path::Path;
use std::sync::Arc;

use crate::formats::{DefaultImageCodec, ImageReader, RasterWriter};
use crate::model::{ImageData, ImageType};
use crate::render::RgbRaster;

use super::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct IoService {
    codec: DefaultImageCodec,
}

impl IoService {
    pub fn read(&self, path: impl AsRef<Path>, image_type: ImageType) -> Result<ImageData> {
        let server = ImageReader::read(&self.codec, path.as_ref())?;
        Ok(ImageData::new(Arc::new(server), image_type))
    }

    pub fn write(&self, path: impl AsRef<Path>, raster: &RgbRaster) -> Result<()> {
        RasterWriter::write(&self.codec, path.as_ref(), raster)?;
        Ok(())
    }
}
