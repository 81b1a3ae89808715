mod compositor;
mod error;
mod raster;


pub use compositor::{render, value_as_string};
pub use error::{RenderError, Result};
pub use raster::{RgbRaster, to_image};
