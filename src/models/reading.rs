//! Soil reading data models.
//!
//! A `Sample` is what a reading source produces; a `Reading` is a sample
//! stamped with the local date and time it was taken.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Raw moisture/temperature/humidity triple, not yet timestamped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    pub moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl Sample {
    pub fn new(moisture: f64, temperature: f64, humidity: f64) -> Self {
        Self {
            moisture,
            temperature,
            humidity,
        }
    }

    /// JSON has no representation for NaN or infinity.
    pub fn is_finite(&self) -> bool {
        self.moisture.is_finite() && self.temperature.is_finite() && self.humidity.is_finite()
    }
}

/// One log row. Field order matches the stored JSON layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    pub date: String,
    pub time: String,
    pub moisture: f64,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    /// Stamp `sample` with `at`, formatted as `M/D/YYYY` and `H:MM:SS AM`.
    pub fn stamp<Tz>(sample: Sample, at: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            date: at.format("%-m/%-d/%Y").to_string(),
            time: at.format("%-I:%M:%S %p").to_string(),
            moisture: sample.moisture,
            temperature: sample.temperature,
            humidity: sample.humidity,
        }
    }

    pub fn sample(&self) -> Sample {
        Sample::new(self.moisture, self.temperature, self.humidity)
    }

    /// Strictly below: a reading equal to the threshold is not flagged.
    pub fn is_below_threshold(&self, threshold: f64) -> bool {
        self.moisture < threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn stamp_formats_date_and_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 9).unwrap();
        let reading = Reading::stamp(Sample::new(30.0, 22.0, 50.0), at);

        assert_eq!(reading.date, "3/7/2024");
        assert_eq!(reading.time, "2:05:09 PM");
        assert_eq!(reading.sample(), Sample::new(30.0, 22.0, 50.0));
    }

    #[test]
    fn threshold_flag_is_strict() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let dry = Reading::stamp(Sample::new(3.0, 20.0, 40.0), at);
        let wet = Reading::stamp(Sample::new(10.0, 20.0, 40.0), at);
        let edge = Reading::stamp(Sample::new(5.0, 20.0, 40.0), at);

        assert!(dry.is_below_threshold(5.0));
        assert!(!wet.is_below_threshold(5.0));
        assert!(!edge.is_below_threshold(5.0));
    }

    #[test]
    fn serializes_with_stored_field_names() {
        let reading = Reading {
            date: "1/2/2024".into(),
            time: "9:00:00 AM".into(),
            moisture: 12.0,
            temperature: 22.0,
            humidity: 40.0,
        };
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["date"], "1/2/2024");
        assert_eq!(json["time"], "9:00:00 AM");
        assert_eq!(json["moisture"], 12.0);
        assert_eq!(json["humidity"], 40.0);
    }
}
