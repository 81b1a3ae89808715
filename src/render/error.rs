use thiserror::Error;

use crate::channels::ChannelError;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("channel failure during compositing: {0}")]
    Channel(#[from] ChannelError),

    #[error("raster of {width}x{height} does not fit the image encoder")]
    RasterTooLarge { width: usize, height: usize },
}
