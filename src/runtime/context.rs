use crate::settings::DisplaySettings;

use super::{DisplayService, IoService};

#[derive(Debug, Clone, Default)]
pub struct AppContext {
    display_service: DisplayService,
    io_service: IoService,
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DisplaySettings) -> Self {
        Self {
            display_service: DisplayService::new(settings),
            io_service: IoService::default(),
        }
    }

    pub fn display_service(&self) -> &DisplayService {
        &self.display_service
    }

    pub fn io_service(&self) -> &IoService {
        &self.io_service
    }
}
