use thiserror::Error;

use crate::channels::ChannelError;

pub type Result<T> = std::result::Result<T, DisplayError>;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("no image is loaded")]
    NoImage,

    #[error("channel index {index} out of range (catalog has {len})")]
    ChannelOutOfRange { index: usize, len: usize },

    #[error("no channel named `{0}`")]
    UnknownChannel(String),

    #[error("channel update failed: {0}")]
    Channel(#[from] ChannelError),
}
