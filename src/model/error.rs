use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("tile buffer mismatch: expected {expected} samples for {width}x{height}, found {actual}")]
    TileSizeMismatch {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[error("invalid tile dimensions {width}x{height}")]
    ZeroSizedTile { width: usize, height: usize },

    #[error("region {x},{y} {width}x{height} lies outside a {image_width}x{image_height} image")]
    RegionOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        image_width: usize,
        image_height: usize,
    },

    #[error("z-slice {z} out of range (image has {n_z})")]
    SliceOutOfRange { z: usize, n_z: usize },

    #[error("image source failure: {0}")]
    Source(String),
}
