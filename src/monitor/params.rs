use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::models::IntervalSelector;

pub const DEFAULT_THRESHOLD: f64 = 5.0;

/// What the dashboard hands to the monitoring screen.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonitorParams {
    pub interval: IntervalSelector,
    pub threshold: f64,
}

impl Default for MonitorParams {
    fn default() -> Self {
        Self {
            interval: IntervalSelector::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl MonitorParams {
    pub fn new(interval: IntervalSelector, threshold: f64) -> Self {
        Self {
            interval,
            threshold,
        }
    }

    /// Build from raw route values. A missing or blank threshold means the
    /// default; anything that is not a number is rejected.
    pub fn from_route(interval: Option<&str>, threshold: Option<&str>) -> Result<Self> {
        let interval = interval
            .map(IntervalSelector::parse)
            .unwrap_or(IntervalSelector::Unspecified);
        let threshold = parse_threshold(threshold)?;
        Ok(Self {
            interval,
            threshold,
        })
    }
}

pub fn parse_threshold(raw: Option<&str>) -> Result<f64> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(DEFAULT_THRESHOLD);
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => bail!("Threshold must be a number"),
    }
}
