mod api;
mod codec;
mod error;
mod raster;
mod tiff;
mod util;

#[cfg(test)]
mod tests;

pub use api::{read_image, supported_formats, write_png};
pub use codec::{DefaultImageCodec, ImageReader, RasterWriter};
pub use error::{IoError, Result};
