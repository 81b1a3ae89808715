use thiserror::Error;

use crate::channels::ChannelError;
use crate::display::DisplayError;

pub type Result<T> = std::result::Result<T, StateError>;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("display state serialization failure: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("display state could not be applied: {0}")]
    Display(#[from] DisplayError),

    #[error("channel rejected stored state: {0}")]
    Channel(#[from] ChannelError),
}
