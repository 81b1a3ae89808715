mod color;
mod error;
mod image_data;
mod memory;
mod pixel;
mod properties;
mod server;
mod tile;

#[cfg(test)]
mod tests;

pub use color::{blue, clamp8, green, pack_rgb, red, unpack_rgb};
pub use error::{CoreError, Result};
pub use image_data::{ImageData, ImageType};
pub use memory::MemoryImageServer;
pub use pixel::PixelType;
pub use properties::{MemoryPropertyStore, PropertyStore};
pub use server::{ImageServer, Region, default_channel_color};
pub use tile::{Tile, TilePixels};
