//! Read-only derivations the monitoring screen renders from the state:
//! threshold-flagged log rows, chart series and the summary strip.

use serde::{Deserialize, Serialize};

use crate::models::{MonitoringState, Reading, ReadingLog};

const CHART_POINTS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LogEntryView {
    pub reading: Reading,
    pub below_threshold: bool,
}

pub fn log_view(log: &ReadingLog, threshold: f64) -> Vec<LogEntryView> {
    log.iter()
        .map(|reading| LogEntryView {
            below_threshold: reading.is_below_threshold(threshold),
            reading: reading.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Moisture,
    Temperature,
    Humidity,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Moisture, Metric::Temperature, Metric::Humidity];

    pub fn value(&self, reading: &Reading) -> f64 {
        match self {
            Metric::Moisture => reading.moisture,
            Metric::Temperature => reading.temperature,
            Metric::Humidity => reading.humidity,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Metric::Moisture => "Moisture Levels",
            Metric::Temperature => "Temperature",
            Metric::Humidity => "Humidity",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Moisture | Metric::Humidity => "%",
            Metric::Temperature => "°C",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub metric: Metric,
    pub title: String,
    pub unit: String,
    pub labels: Vec<String>,
    pub data: Vec<f64>,
}

/// The newest five readings, oldest first. Labels count down from `T-5`
/// starting at the newest reading, so short logs end before `T-1`.
pub fn chart_series(log: &ReadingLog, metric: Metric) -> ChartSeries {
    let recent = &log.as_slice()[..log.len().min(CHART_POINTS)];
    let labels = (0..recent.len())
        .map(|index| format!("T-{}", CHART_POINTS - index))
        .collect();
    let data = recent.iter().rev().map(|reading| metric.value(reading)).collect();

    ChartSeries {
        metric,
        title: metric.title().to_string(),
        unit: metric.unit().to_string(),
        labels,
        data,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub moisture: String,
    pub temperature: String,
    pub humidity: String,
}

pub fn summary(state: &MonitoringState) -> Summary {
    Summary {
        moisture: format!("{:.1}%", state.current_moisture),
        temperature: format!("{}°C", state.current_temperature),
        humidity: format!("{:.1}%", state.current_humidity),
    }
}
