use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChannelError>;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel `{0}` does not support additive composition")]
    NotAdditive(String),

    #[error("channel `{0}` does not have a settable color")]
    ColorNotSettable(String),

    #[error("channel `{name}` expects {expected} samples, destination holds {actual}")]
    BufferSizeMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
}
