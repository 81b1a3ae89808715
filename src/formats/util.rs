use std::path::Path;

use super::{IoError, Result};

pub(crate) fn extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))?;
    Ok(ext)
}

pub(crate) fn source_name(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub(crate) fn widen<T: Copy + Into<f32>>(samples: &[T]) -> Vec<f32> {
    samples.iter().map(|value| (*value).into()).collect()
}
