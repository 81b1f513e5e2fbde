use serde::{Deserialize, Serialize};

/// A sensor entry from the dashboard's "Configure Sensor" form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfiguredSensor {
    pub id: String,
    pub sensor_type: String,
    pub threshold: f64,
}
