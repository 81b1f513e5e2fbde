use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{IntervalSelector, MonitoringState, Reading};

use super::params::DEFAULT_THRESHOLD;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum MonitorStatus {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// In-memory state of the monitoring screen. `data` is the aggregate that
/// gets persisted; the rest only lives for the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorState {
    pub status: MonitorStatus,
    pub threshold: f64,
    pub started_at: Option<DateTime<Utc>>,
    pub ticks: u64,
    pub data: MonitoringState,
}

impl Default for MonitorState {
    fn default() -> Self {
        Self {
            status: MonitorStatus::Idle,
            threshold: DEFAULT_THRESHOLD,
            started_at: None,
            ticks: 0,
            data: MonitoringState::default(),
        }
    }
}

impl MonitorState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a previously saved aggregate as the working copy.
    pub fn hydrate(&mut self, stored: MonitoringState) {
        self.data = stored;
    }

    pub fn begin(&mut self, interval: IntervalSelector, started_at: DateTime<Utc>) {
        self.status = MonitorStatus::Running;
        self.data.interval = Some(interval);
        self.started_at = Some(started_at);
    }

    pub fn stop(&mut self) {
        if self.status == MonitorStatus::Running {
            self.status = MonitorStatus::Stopped;
        }
    }

    pub fn record(&mut self, reading: Reading) -> bool {
        let below = reading.is_below_threshold(self.threshold);
        self.data.record(reading);
        self.ticks = self.ticks.wrapping_add(1);
        below
    }

    pub fn interval(&self) -> Option<IntervalSelector> {
        self.data.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sample;

    #[test]
    fn lifecycle_transitions() {
        let mut state = MonitorState::new();
        assert_eq!(state.status, MonitorStatus::Idle);

        state.stop();
        assert_eq!(state.status, MonitorStatus::Idle);

        state.begin(IntervalSelector::OneHour, Utc::now());
        assert_eq!(state.status, MonitorStatus::Running);
        assert_eq!(state.interval(), Some(IntervalSelector::OneHour));

        state.stop();
        assert_eq!(state.status, MonitorStatus::Stopped);
    }

    #[test]
    fn record_reports_threshold_flag() {
        let mut state = MonitorState::new();
        let at = Utc::now();

        assert!(state.record(Reading::stamp(Sample::new(3.0, 20.0, 40.0), at)));
        assert!(!state.record(Reading::stamp(Sample::new(10.0, 20.0, 40.0), at)));
        assert_eq!(state.ticks, 2);
        assert_eq!(state.data.current_moisture, 10.0);
    }
}
