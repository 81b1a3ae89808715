mod deconvolution;
mod error;
mod handle;
mod vector;


pub use deconvolution::{ColorDeconvolutionStains, OdLuts, od_lut};
pub use error::{Result, StainError};
pub use handle::StainsHandle;
pub use vector::StainVector;
