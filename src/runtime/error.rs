use crate::display::DisplayError;
use crate::formats::IoError;
use crate::model::CoreError;
use crate::render::RenderError;
use crate::settings::SettingsError;
use crate::state::StateError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("image source error: {0}")]
    Core(#[from] CoreError),

    #[error("I/O service error: {0}")]
    Io(#[from] IoError),

    #[error("display error: {0}")]
    Display(#[from] DisplayError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("display state error: {0}")]
    State(#[from] StateError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("report serialization failure: {0}")]
    Report(#[from] serde_json::Error),

    #[error("state file failure: {0}")]
    StateFile(#[from] std::io::Error),
}
