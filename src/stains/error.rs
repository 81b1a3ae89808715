use thiserror::Error;

pub type Result<T> = std::result::Result<T, StainError>;

#[derive(Debug, Error)]
pub enum StainError {
    #[error("stain vector `{0}` has zero length")]
    ZeroVector(String),

    #[error("stain matrix for `{0}` is singular")]
    SingularMatrix(String),
}
