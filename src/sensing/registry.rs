use anyhow::{bail, Result};
use uuid::Uuid;

use crate::models::ConfiguredSensor;

/// Sensors configured on the dashboard for the current session.
#[derive(Debug, Default)]
pub struct SensorRegistry {
    sensors: Vec<ConfiguredSensor>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn configure(
        &mut self,
        sensor_type: &str,
        threshold: Option<f64>,
    ) -> Result<ConfiguredSensor> {
        let sensor_type = sensor_type.trim();
        if sensor_type.is_empty() {
            bail!("sensor type is required");
        }
        let Some(threshold) = threshold else {
            bail!("threshold is required");
        };
        if !threshold.is_finite() {
            bail!("threshold must be a number");
        }

        let sensor = ConfiguredSensor {
            id: Uuid::new_v4().to_string(),
            sensor_type: sensor_type.to_string(),
            threshold,
        };
        self.sensors.push(sensor.clone());
        Ok(sensor)
    }

    /// Returns the removed sensor, or `None` for an unknown id.
    pub fn remove(&mut self, id: &str) -> Option<ConfiguredSensor> {
        let index = self.sensors.iter().position(|sensor| sensor.id == id)?;
        Some(self.sensors.remove(index))
    }

    pub fn list(&self) -> &[ConfiguredSensor] {
        &self.sensors
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configure_and_remove_keep_insertion_order() {
        let mut registry = SensorRegistry::new();
        let moisture = registry.configure("Soil Moisture", Some(30.0)).unwrap();
        let temp = registry.configure("Temperature", Some(18.0)).unwrap();
        let humidity = registry.configure("Humidity", Some(40.0)).unwrap();

        assert_eq!(registry.list().len(), 3);
        assert_ne!(moisture.id, temp.id);

        let removed = registry.remove(&temp.id).unwrap();
        assert_eq!(removed.sensor_type, "Temperature");
        let ids: Vec<_> = registry.list().iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, vec![moisture.id, humidity.id]);

        assert!(registry.remove(&temp.id).is_none());
    }

    #[test]
    fn incomplete_form_is_rejected() {
        let mut registry = SensorRegistry::new();

        assert!(registry.configure("  ", Some(30.0)).is_err());
        assert!(registry.configure("Soil Moisture", None).is_err());
        assert!(registry.configure("Soil Moisture", Some(f64::NAN)).is_err());
        assert!(registry.is_empty());
    }
}
