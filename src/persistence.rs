//! Durable storage of the monitoring aggregate.
//!
//! The whole `MonitoringState` is stored as one JSON value under
//! `STORAGE_KEY`. None of these operations report failure to the caller:
//! storage and parse faults are logged and the call behaves as if nothing
//! was stored.

use anyhow::{bail, Context, Result};

use crate::{
    models::{MonitoringState, Reading},
    storage::KeyValueStore,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

pub const STORAGE_KEY: &str = "@SoilMonitoringData";

#[derive(Clone)]
pub struct MonitoringStore<S> {
    store: S,
}

impl<S: KeyValueStore> MonitoringStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Replace the stored aggregate with `state`.
    pub async fn save(&self, state: &MonitoringState) {
        if let Err(err) = self.try_save(state).await {
            log_error!("Error saving soil monitoring data: {err:#}");
        }
    }

    /// `None` when nothing is stored or the stored value cannot be read.
    pub async fn load(&self) -> Option<MonitoringState> {
        match self.try_load().await {
            Ok(state) => state,
            Err(err) => {
                log_error!("Error loading soil monitoring data: {err:#}");
                None
            }
        }
    }

    pub async fn clear(&self) {
        if let Err(err) = self.store.delete(STORAGE_KEY).await {
            log_error!("Error clearing soil monitoring data: {err:#}");
        }
    }

    /// Prepend `entry` to the stored log. Does nothing when no aggregate
    /// has been saved yet.
    pub async fn add_log_entry(&self, entry: Reading) {
        let Some(mut state) = self.load().await else {
            log_info!("add_log_entry skipped: no stored monitoring data");
            return;
        };

        state.logs.push(entry);
        if let Err(err) = self.try_save(&state).await {
            log_error!("Error adding log entry: {err:#}");
        }
    }

    /// Overwrite only the current triple. Does nothing when no aggregate
    /// has been saved yet.
    pub async fn update_current_readings(&self, moisture: f64, temperature: f64, humidity: f64) {
        let Some(mut state) = self.load().await else {
            log_info!("update_current_readings skipped: no stored monitoring data");
            return;
        };

        state.current_moisture = moisture;
        state.current_temperature = temperature;
        state.current_humidity = humidity;
        if let Err(err) = self.try_save(&state).await {
            log_error!("Error updating current readings: {err:#}");
        }
    }

    /// Non-finite numbers would be written as `null` and make the stored
    /// record unreadable, so they are refused and the prior record kept.
    async fn try_save(&self, state: &MonitoringState) -> Result<()> {
        if !state.is_finite() {
            bail!("monitoring data contains a non-finite value");
        }
        let serialized =
            serde_json::to_string(state).context("failed to serialize monitoring data")?;
        self.store.set(STORAGE_KEY, serialized).await
    }

    async fn try_load(&self) -> Result<Option<MonitoringState>> {
        let Some(raw) = self.store.get(STORAGE_KEY).await? else {
            return Ok(None);
        };
        let state = serde_json::from_str(&raw).context("stored monitoring data is malformed")?;
        Ok(Some(state))
    }
}
