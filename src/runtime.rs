mod context;
mod display_service;
mod error;
mod io_service;


pub use context::AppContext;
pub use display_service::DisplayService;
pub use error::{AppError, Result};
pub use io_service::IoService;
