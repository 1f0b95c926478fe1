//! Clipjournal: recording session host driven by line commands on stdin.

mod app;
mod app_command;
mod backup_writer;
mod config;
mod device_event;
mod error;
mod persist;
mod simulated_camera;
mod upload_queue;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    backup_writer::FileBackupWriter,
    device_event::DeviceEvent,
    error::{AppError, Result as AppResult},
    simulated_camera::SimulatedCamera,
    upload_queue::FileUploadQueue,
};

use crate::config::Config;

use clipjournal_core::{GestureClassifier, SessionCoordinator};

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "clipjournal=debug,clipjournal_core=debug";

/// Application entry point.
#[tokio::main]
async fn main() {
    let data_dir = match Config::data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to resolve data directory: {}", e);
            std::process::exit(1);
        }
    };

    // Dropping the guard flushes and stops the file writer.
    let _log_guard = init_tracing(&data_dir.join("logs"));

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let app = match build_app(&config) {
        Ok(app) => app,
        Err(e) => {
            error!("Failed to start: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = app.run().await {
        error!(error = ?e, "App error");
        std::process::exit(1);
    }
}

fn build_app(config: &Config) -> AppResult<App> {
    let classifier = GestureClassifier::new(config.gesture_config()?)?;
    let backup = FileBackupWriter::new(&config.storage.backup_dir)?;
    let uploads = FileUploadQueue::new(&config.storage.queue_file);

    match backup.cleanup_missing() {
        Ok(0) => {}
        Ok(removed) => info!(removed, "Dropped pending backups with missing files"),
        Err(e) => error!(error = %e, "Backup cleanup failed"),
    }

    let (device_tx, device_rx) = mpsc::channel(32);
    let camera = SimulatedCamera::new(
        device_tx,
        &config.storage.capture_dir,
        config.device.clone(),
    );

    let coordinator =
        SessionCoordinator::new(camera, backup, uploads, config.coordinator_config());

    Ok(App {
        coordinator,
        classifier,
        policy: config.stall_policy(),
        device_rx,
        reported_stuck: None,
    })
}

fn init_tracing(log_dir: &Path) -> WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(log_dir, "clipjournal.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .init();

    guard
}
