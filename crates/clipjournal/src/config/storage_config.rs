use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where clips, backups and the upload queue live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Scratch directory the camera writes finished recordings to.
    pub capture_dir: PathBuf,
    /// Directory holding backed-up clips and their manifest.
    pub backup_dir: PathBuf,
    /// TOML file holding queued upload jobs.
    pub queue_file: PathBuf,
}
