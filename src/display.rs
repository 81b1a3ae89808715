mod catalog;
mod error;
mod image_display;
mod seed;
mod snapshot;


pub use error::{DisplayError, Result};
pub use image_display::{DISPLAY_PROPERTY_KEY, ImageDisplay};
pub use seed::SeedReport;
pub use snapshot::DisplaySnapshot;
