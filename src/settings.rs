mod config;
mod error;
mod io;

#[cfg(test)]
mod tests;

pub use config::DisplaySettings;
pub use error::{Result, SettingsError};
pub use io::{load_settings, save_settings};
