mod autorange;
mod bins;
mod cache;
mod error;


pub use autorange::{DEFAULT_SATURATION, auto_set_display_range, update_allowed_from_histogram};
pub use bins::{DEFAULT_BINS, Histogram};
pub use cache::{HistogramCache, ImageHistograms};
pub use error::{HistogramError, Result};
