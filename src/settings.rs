use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    models::IntervalSelector,
    monitor::{MonitorParams, DEFAULT_THRESHOLD},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitoringSettings {
    pub default_interval: String,
    pub threshold: f64,
    /// Save the aggregate after every generated reading, not only on
    /// mount/unmount.
    pub persist_on_tick: bool,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            default_interval: IntervalSelector::default().as_str().into(),
            threshold: DEFAULT_THRESHOLD,
            persist_on_tick: false,
        }
    }
}

impl MonitoringSettings {
    pub fn params(&self) -> MonitorParams {
        MonitorParams::new(IntervalSelector::parse(&self.default_interval), self.threshold)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageSettings {
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "smartagri.sqlite3".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub monitoring: MonitoringSettings,
    pub storage: StorageSettings,
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable settings at {}: {err}", path.display());
                AppSettings::default()
            })
        } else {
            AppSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn get(&self) -> AppSettings {
        self.read().clone()
    }

    pub fn monitoring(&self) -> MonitoringSettings {
        self.read().monitoring.clone()
    }

    pub fn update_monitoring(&self, settings: MonitoringSettings) -> Result<()> {
        let mut guard = self.write();
        guard.monitoring = settings;
        self.persist(&guard)
    }

    fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }

    fn read(&self) -> RwLockReadGuard<'_, AppSettings> {
        match self.data.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, AppSettings> {
        match self.data.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
