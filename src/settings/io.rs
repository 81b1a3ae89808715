use std::fs;
use std::path::Path;

use super::{DisplaySettings, Result};

fn is_yaml(path: &Path) -> bool {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    matches!(extension.as_str(), "yaml" | "yml")
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<DisplaySettings> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let settings = if is_yaml(path) {
        serde_yaml::from_str::<DisplaySettings>(&raw)?
    } else {
        serde_json::from_str::<DisplaySettings>(&raw)?
    };
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(path: impl AsRef<Path>, settings: &DisplaySettings) -> Result<()> {
    let path = path.as_ref();
    settings.validate()?;
    let serialized = if is_yaml(path) {
        serde_yaml::to_string(settings)?
    } else {
        serde_json::to_string_pretty(settings)?
    };
    fs::write(path, serialized)?;
    Ok(())
}
