//! Local clip backup.
//!
//! Every saved clip is copied into a permanent directory before anything
//! else happens to it, and listed in a TOML manifest of pending uploads.
//! A crash between capture and upload therefore never loses a clip.

use crate::{AppResult, persist};

use clipjournal_core::{BackupHandle, CapturedClip, CoreError, CoreResult, LocalBackup, OwnerId};

use std::{
    fs, io,
    panic::Location,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

const MANIFEST_FILE: &str = "pending_videos.toml";
const DEFAULT_EXTENSION: &str = "mov";

/// A backed-up clip that has not been uploaded yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingBackup {
    /// Manifest entry id, `pending_<millis>`.
    pub id: String,
    /// File name relative to the backup directory.
    pub file_name: String,
    /// Account that owns the clip.
    pub owner_id: String,
    /// Milliseconds since the Unix epoch when the backup was taken.
    pub created_at_ms: u64,
    /// Length of the recording in seconds.
    pub duration_seconds: f64,
    /// Size of the backed-up file.
    pub size_bytes: u64,
    /// Number of upload attempts so far.
    #[serde(default)]
    pub upload_attempts: u32,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct BackupManifest {
    #[serde(default)]
    pending: Vec<PendingBackup>,
}

/// [`LocalBackup`] over a directory on disk.
#[derive(Debug)]
pub struct FileBackupWriter {
    dir: PathBuf,
}

impl FileBackupWriter {
    /// Creates a writer storing clips under `dir`.
    #[track_caller]
    pub fn new(dir: impl Into<PathBuf>) -> AppResult<Self> {
        let dir = dir.into();

        if !dir.exists() {
            fs::create_dir_all(&dir)?;
            debug!(backup_dir = ?dir, "Created backup directory");
        }

        Ok(Self { dir })
    }

    /// Backups still waiting for upload, oldest first.
    pub fn pending(&self) -> AppResult<Vec<PendingBackup>> {
        Ok(self.read_manifest()?.pending)
    }

    /// Absolute path of a pending backup.
    pub fn path_of(&self, entry: &PendingBackup) -> PathBuf {
        self.dir.join(&entry.file_name)
    }

    /// Removes an entry from the manifest. The file stays on disk.
    ///
    /// Returns whether the entry existed.
    #[instrument(skip(self))]
    pub fn remove_pending(&self, id: &str) -> AppResult<bool> {
        let mut manifest = self.read_manifest()?;
        let before = manifest.pending.len();
        manifest.pending.retain(|entry| entry.id != id);

        if manifest.pending.len() == before {
            return Ok(false);
        }

        self.write_manifest(&manifest)?;
        info!(backup_id = %id, "Removed from pending backups");
        Ok(true)
    }

    /// Drops manifest entries whose file no longer exists.
    ///
    /// Returns the number of entries removed.
    #[instrument(skip(self))]
    pub fn cleanup_missing(&self) -> AppResult<usize> {
        let mut manifest = self.read_manifest()?;
        let before = manifest.pending.len();

        manifest.pending.retain(|entry| {
            let exists = self.dir.join(&entry.file_name).exists();
            if !exists {
                warn!(
                    backup_id = %entry.id,
                    file_name = %entry.file_name,
                    "Removing backup with missing file"
                );
            }
            exists
        });

        let removed = before - manifest.pending.len();
        if removed > 0 {
            self.write_manifest(&manifest)?;
        }

        info!(removed, remaining = manifest.pending.len(), "Backup cleanup complete");
        Ok(removed)
    }

    fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    fn read_manifest(&self) -> AppResult<BackupManifest> {
        persist::read_toml(&self.manifest_path())
    }

    fn write_manifest(&self, manifest: &BackupManifest) -> AppResult<()> {
        persist::write_toml(&self.manifest_path(), manifest)
    }

    /// Picks `backup_<millis>.<ext>`, bumping the stamp past existing files.
    fn target_for(&self, clip: &CapturedClip) -> (u64, String) {
        let extension = clip
            .local_uri
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(DEFAULT_EXTENSION);

        let mut stamp = millis_since_epoch(SystemTime::now());
        loop {
            let file_name = format!("backup_{}.{}", stamp, extension);
            if !self.dir.join(&file_name).exists() {
                return (stamp, file_name);
            }
            stamp += 1;
        }
    }
}

impl LocalBackup for FileBackupWriter {
    #[track_caller]
    #[instrument(skip(self, clip), fields(uri = ?clip.local_uri))]
    fn backup(&mut self, clip: CapturedClip, owner: &OwnerId) -> CoreResult<BackupHandle> {
        let caller = Location::caller();
        let failed = |reason: String| CoreError::BackupFailed {
            reason,
            location: ErrorLocation::from(caller),
        };

        if !clip.local_uri.exists() {
            return Err(failed(format!(
                "captured file not found: {}",
                clip.local_uri.display()
            )));
        }

        let (stamp, file_name) = self.target_for(&clip);
        let target = self.dir.join(&file_name);

        let size_bytes = fs::copy(&clip.local_uri, &target)
            .map_err(|e| failed(format!("copy to {} failed: {}", target.display(), e)))?;

        let entry = PendingBackup {
            id: format!("pending_{}", stamp),
            file_name,
            owner_id: owner.0.clone(),
            created_at_ms: millis_since_epoch(clip.created_at),
            duration_seconds: clip.duration_seconds,
            size_bytes,
            upload_attempts: 0,
        };

        let mut manifest = self.read_manifest().map_err(|e| failed(e.to_string()))?;
        manifest.pending.push(entry.clone());
        self.write_manifest(&manifest)
            .map_err(|e| failed(e.to_string()))?;

        if let Err(e) = fs::remove_file(&clip.local_uri) {
            warn!(uri = ?clip.local_uri, error = %e, "Backed-up capture could not be removed");
        }

        info!(backup_id = %entry.id, size_bytes, "Clip backed up locally");

        Ok(BackupHandle {
            id: entry.id,
            uri: target,
            size_bytes,
        })
    }

    #[track_caller]
    #[instrument(skip(self))]
    fn discard(&mut self, uri: &Path) -> CoreResult<()> {
        match fs::remove_file(uri) {
            Ok(()) => {
                info!(uri = ?uri, "Captured file discarded");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(uri = ?uri, "Captured file already gone");
                Ok(())
            }
            Err(e) => Err(CoreError::DiscardFailed {
                reason: format!("{}: {}", uri.display(), e),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

fn millis_since_epoch(at: SystemTime) -> u64 {
    at.duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
