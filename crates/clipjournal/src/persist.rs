//! TOML documents written with the temp-file-and-rename pattern.

use crate::{AppError, AppResult};

use std::{fs, io::Write, panic::Location, path::Path};

use error_location::ErrorLocation;
use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

/// Reads `path` as TOML, or returns `T::default()` if it does not exist.
#[track_caller]
pub(crate) fn read_toml<T>(path: &Path) -> AppResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }

    let contents = fs::read_to_string(path)?;

    toml::from_str(&contents).map_err(|e| AppError::StorageError {
        reason: format!("Failed to parse {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Serializes `value` and atomically replaces `path` with it.
#[track_caller]
pub(crate) fn write_toml<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    let contents = toml::to_string_pretty(value).map_err(|e| AppError::StorageError {
        reason: format!("Failed to serialize {}: {}", path.display(), e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("toml.tmp");
    let mut temp_file = fs::File::create(&temp_path)?;
    temp_file.write_all(contents.as_bytes())?;
    temp_file.sync_all()?;
    fs::rename(&temp_path, path)?;

    debug!(path = ?path, "Document written (atomic write)");

    Ok(())
}
