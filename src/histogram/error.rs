use thiserror::Error;

pub type Result<T> = std::result::Result<T, HistogramError>;

#[derive(Debug, Error)]
pub enum HistogramError {
    #[error("histogram needs at least 2 bins, got {0}")]
    TooFewBins(usize),

    #[error("no finite values to build a histogram from")]
    NoFiniteValues,
}
