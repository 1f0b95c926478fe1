//! Configuration management for clipjournal.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{CaptureConfig, DeviceConfig, GestureSettings, PolicyConfig, StorageConfig},
};

use clipjournal_core::{
    CoordinatorConfig, GestureClassifier, GestureConfig, PresentationSlot, StallPolicy,
    VideoQuality,
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use crate::config::{DEFAULT_MAX_DURATION_SECS, DEFAULT_STABILIZATION_DELAY_MS};
use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Main configuration struct.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Recording settings.
    pub capture: CaptureConfig,
    /// Gesture classifier tuning.
    #[serde(default)]
    pub gesture: GestureSettings,
    /// Stall detection thresholds.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Clip, backup and queue locations.
    pub storage: StorageConfig,
    /// Simulated camera timings.
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default one if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Self::defaults_in(&Self::data_dir()?);
            config.save_to(&config_path)?;
            info!(
                config_path = ?config_path,
                owner_id = %config.capture.owner_id,
                "Default config created"
            );
            Ok(config)
        }
    }

    /// Load and validate configuration from `path`.
    #[track_caller]
    #[instrument]
    pub fn load_from(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?path, "Configuration loaded");

        Ok(config)
    }

    /// Default configuration with storage under `data_dir` and a fresh owner id.
    pub fn defaults_in(data_dir: &Path) -> Self {
        Config {
            capture: CaptureConfig {
                max_duration_secs: DEFAULT_MAX_DURATION_SECS,
                quality: VideoQuality::default(),
                mirror: false,
                stabilization_delay_ms: DEFAULT_STABILIZATION_DELAY_MS,
                owner_id: Uuid::new_v4().to_string(),
                default_chapter: None,
            },
            gesture: GestureSettings::default(),
            policy: PolicyConfig::default(),
            storage: StorageConfig {
                capture_dir: data_dir.join("captures"),
                backup_dir: data_dir.join("video_backups"),
                queue_file: data_dir.join("upload_queue.toml"),
            },
            device: DeviceConfig::default(),
        }
    }

    /// Check every value the coordinator and classifier depend on.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn validate(&self) -> AppResult<()> {
        if self.capture.max_duration_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "capture.max_duration_secs must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.capture.owner_id.trim().is_empty() {
            return Err(AppError::ConfigError {
                reason: "capture.owner_id must not be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.policy.stuck_timeout_secs == 0 {
            return Err(AppError::ConfigError {
                reason: "policy.stuck_timeout_secs must be greater than zero".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let gesture = self.gesture_config()?;
        GestureClassifier::new(gesture)?;

        debug!("Configuration validated");

        Ok(())
    }

    /// Save configuration to `path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let temp_path = path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Coordinator settings derived from `[capture]`.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            record_options: self.capture.record_options(),
            stabilization_delay: self.capture.stabilization_delay(),
            initial_slot: PresentationSlot::Main,
            owner: self.capture.owner(),
            chapter: self.capture.chapter(),
        }
    }

    /// Classifier settings derived from `[gesture]`.
    #[track_caller]
    pub fn gesture_config(&self) -> AppResult<GestureConfig> {
        Ok(self.gesture.classifier_config()?)
    }

    /// Stall policy derived from `[policy]` and the capture max duration.
    pub fn stall_policy(&self) -> StallPolicy {
        self.policy
            .stall_policy(self.capture.record_options().max_duration)
    }

    /// Platform data directory, created on first use.
    #[track_caller]
    pub fn data_dir() -> AppResult<PathBuf> {
        let data_dir = Self::project_dirs()?.data_dir().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir)?;
            debug!(data_dir = ?data_dir, "Created data directory");
        }

        Ok(data_dir)
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "clipjournal", "Clipjournal").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
