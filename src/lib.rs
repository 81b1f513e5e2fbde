pub mod accounts;
pub mod db;
pub mod models;
pub mod monitor;
pub mod persistence;
pub mod sensing;
pub mod settings;
pub mod storage;
mod utils;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use log::{error, info, warn};
use tokio::sync::{broadcast::error::RecvError, Mutex};

use accounts::AccountService;
use db::Database;
use monitor::{Metric, MonitorController, MonitorEvent};
use persistence::MonitoringStore;
use sensing::{RandomReadingSource, SensorRegistry};
use settings::SettingsStore;
use storage::SqliteStore;

const DATA_DIR_ENV: &str = "SMARTAGRI_DATA_DIR";
const DEBUG_ENV: &str = "SMARTAGRI_DEBUG";

/// Everything the app screens talk to, wired to on-device storage.
pub struct AppState {
    pub db: Database,
    pub settings: SettingsStore,
    pub accounts: AccountService<SqliteStore>,
    pub monitor: MonitorController<SqliteStore>,
    pub sensors: Mutex<SensorRegistry>,
}

impl AppState {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir).with_context(|| {
            format!("failed to create data directory {}", data_dir.display())
        })?;

        let settings = SettingsStore::new(data_dir.join("settings.json"))?;
        let app_settings = settings.get();

        let db = Database::new(data_dir.join(&app_settings.storage.database_file))?;
        let store = SqliteStore::new(db.clone());

        let monitor = MonitorController::with_options(
            MonitoringStore::new(store.clone()),
            Arc::new(RandomReadingSource::new()),
            app_settings.monitoring.persist_on_tick,
        );

        Ok(Self {
            db,
            settings,
            accounts: AccountService::new(store),
            monitor,
            sensors: Mutex::new(SensorRegistry::new()),
        })
    }
}

fn debug_mode() -> bool {
    std::env::var(DEBUG_ENV)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

fn data_dir() -> PathBuf {
    std::env::var_os(DATA_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

/// Headless monitoring session: ticks at the configured interval until
/// Ctrl-C, then saves and exits.
pub fn run() {
    // Initialize logging (reads RUST_LOG env var)
    let default_level = if debug_mode() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(default_level)
        .init();

    info!("SmartAgri starting up...");

    let result = tokio::runtime::Runtime::new()
        .context("failed to start async runtime")
        .and_then(|runtime| runtime.block_on(run_session(data_dir())));

    if let Err(err) = result {
        error!("SmartAgri exited with error: {err:#}");
        std::process::exit(1);
    }
}

async fn run_session(data_dir: PathBuf) -> Result<()> {
    let app = AppState::open(&data_dir)?;
    let params = app.settings.monitoring().params();

    let mut events = app.monitor.subscribe();
    let snapshot = app.monitor.mount(params).await;
    info!(
        "Monitoring every {} (threshold {}); {} stored log entries",
        params.interval.label(),
        params.threshold,
        snapshot.state.data.logs.len()
    );

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    error!("Failed to listen for Ctrl-C: {err}");
                }
                break;
            }
            event = events.recv() => match event {
                Ok(MonitorEvent::ReadingRecorded { reading, below_threshold }) => {
                    let line = format!(
                        "{} {} moisture={}% temperature={}°C humidity={}%",
                        reading.date, reading.time, reading.moisture, reading.temperature, reading.humidity
                    );
                    if below_threshold {
                        warn!("{line} (below threshold)");
                    } else {
                        info!("{line}");
                    }
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!("Event stream lagged by {skipped} events"),
                Err(RecvError::Closed) => break,
            }
        }
    }

    app.monitor.unmount().await;
    for metric in Metric::ALL {
        let series = app.monitor.chart(metric).await;
        info!("{} ({}): {:?}", series.title, series.unit, series.data);
    }
    info!("Monitoring data saved to {}", app.db.path().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoginOutcome;

    #[tokio::test]
    async fn app_state_wires_shared_storage() {
        let dir = std::env::temp_dir().join(format!("smartagri-app-{}", uuid::Uuid::new_v4()));
        let app = AppState::open(&dir).unwrap();

        app.accounts.sign_up("grower@farm.io", "pw").await.unwrap();
        assert_eq!(
            app.accounts.log_in("grower@farm.io", "pw").await.unwrap(),
            LoginOutcome::Success
        );

        app.monitor.tick_now().await;
        app.monitor.persist().await;
        let stored = app.monitor.store().load().await.unwrap();
        assert_eq!(stored.logs.len(), 1);

        let sensor = app
            .sensors
            .lock()
            .await
            .configure("Soil Moisture", Some(30.0))
            .unwrap();
        assert_eq!(app.sensors.lock().await.list(), &[sensor][..]);
        assert!(app.db.path().starts_with(&dir));

        drop(app);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
