//! Monitoring aggregate: current readings plus the bounded reading log.
//!
//! `MonitoringState` is the unit of persistence. It is always written and
//! read as a whole, under a single storage key.

use serde::{Deserialize, Deserializer, Serialize};

use super::{IntervalSelector, Reading, Sample};

pub const LOG_CAPACITY: usize = 50;

/// Newest-first log of readings, never longer than `LOG_CAPACITY`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct ReadingLog(Vec<Reading>);

impl ReadingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend `reading`, dropping the oldest entries beyond capacity.
    pub fn push(&mut self, reading: Reading) {
        self.0.insert(0, reading);
        self.0.truncate(LOG_CAPACITY);
    }

    pub fn latest(&self) -> Option<&Reading> {
        self.0.first()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Reading] {
        &self.0
    }
}

impl From<Vec<Reading>> for ReadingLog {
    /// Input is taken as newest-first and clipped to capacity.
    fn from(mut readings: Vec<Reading>) -> Self {
        readings.truncate(LOG_CAPACITY);
        Self(readings)
    }
}

impl<'de> Deserialize<'de> for ReadingLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<Reading>::deserialize(deserializer).map(ReadingLog::from)
    }
}

impl<'a> IntoIterator for &'a ReadingLog {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringState {
    pub current_moisture: f64,
    pub current_temperature: f64,
    pub current_humidity: f64,
    pub logs: ReadingLog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<IntervalSelector>,
}

impl Default for MonitoringState {
    /// Values shown on the monitoring screen before the first reading.
    fn default() -> Self {
        Self {
            current_moisture: 25.0,
            current_temperature: 20.0,
            current_humidity: 45.0,
            logs: ReadingLog::new(),
            interval: None,
        }
    }
}

impl MonitoringState {
    pub fn current(&self) -> Sample {
        Sample::new(
            self.current_moisture,
            self.current_temperature,
            self.current_humidity,
        )
    }

    pub fn set_current(&mut self, sample: Sample) {
        self.current_moisture = sample.moisture;
        self.current_temperature = sample.temperature;
        self.current_humidity = sample.humidity;
    }

    pub fn is_finite(&self) -> bool {
        self.current().is_finite() && self.logs.iter().all(|reading| reading.sample().is_finite())
    }

    /// Make `reading` the current triple and prepend it to the log.
    pub fn record(&mut self, reading: Reading) {
        self.set_current(reading.sample());
        self.logs.push(reading);
    }
}
