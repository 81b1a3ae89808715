use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::display::{DisplayError, ImageDisplay, SeedReport};
use crate::model::{ImageData, Region};
use crate::render::{self, RgbRaster};
use crate::settings::DisplaySettings;
use crate::state;

use super::Result;

/// Drives an [`ImageDisplay`] for one image at a time.
#[derive(Debug, Clone, Default)]
pub struct DisplayService {
    settings: DisplaySettings,
}

impl DisplayService {
    pub fn new(settings: DisplaySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    pub fn open(&self, image: ImageData) -> (ImageDisplay, Option<SeedReport>) {
        let mut display = ImageDisplay::new(self.settings.clone());
        let report = display.set_image(Some(image));
        if let Some(report) = report.as_ref().filter(|report| !report.is_complete()) {
            warn!(
                requested = report.requested,
                completed = report.completed,
                "display opened with partial histograms"
            );
        }
        (display, report)
    }

    /// Selects channels by name, in the order given.
    pub fn select_by_name(&self, display: &mut ImageDisplay, names: &[String]) -> Result<()> {
        let indices = names
            .iter()
            .map(|name| {
                display
                    .find_channel(name)
                    .ok_or_else(|| DisplayError::UnknownChannel(name.clone()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        display.select_channels(&indices)?;
        Ok(())
    }

    pub fn load_state(&self, display: &mut ImageDisplay, path: impl AsRef<Path>) -> Result<usize> {
        let json = fs::read_to_string(path.as_ref())?;
        let matched = state::update_from_json(display, &json)?;
        info!(path = %path.as_ref().display(), matched, "applied display state");
        Ok(matched)
    }

    pub fn save_state(&self, display: &ImageDisplay, path: impl AsRef<Path>) -> Result<()> {
        let json = state::to_json(display.channels(), display.selected())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Composites the full extent of Z slice 0.
    pub fn render(&self, display: &ImageDisplay) -> Result<RgbRaster> {
        let image = display.image().ok_or(DisplayError::NoImage)?;
        let server = image.server();
        let tile = server.read_tile(Region::new(0, 0, server.width(), server.height()), 0)?;
        Ok(render::render(&display.snapshot(), &tile, None)?)
    }

    pub fn value_at(&self, display: &ImageDisplay, x: usize, y: usize) -> Result<String> {
        let image = display.image().ok_or(DisplayError::NoImage)?;
        let tile = image.server().read_tile(Region::new(x, y, 1, 1), 0)?;
        Ok(render::value_as_string(&display.snapshot(), &tile, 0, 0))
    }
}
