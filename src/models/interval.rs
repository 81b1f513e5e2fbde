use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, time::Duration};

const FALLBACK_PERIOD: Duration = Duration::from_secs(10);

/// Polling cadence picked on the dashboard and passed to the monitoring screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntervalSelector {
    #[default]
    TenSeconds,
    OneMinute,
    TwoMinutes,
    OneHour,
    TwoHours,
    Daily,
    Weekly,
    Monthly,
    Unspecified,
}

impl IntervalSelector {
    /// Selectable values in picker order.
    pub const PICKER: [IntervalSelector; 8] = [
        IntervalSelector::TenSeconds,
        IntervalSelector::OneMinute,
        IntervalSelector::TwoMinutes,
        IntervalSelector::OneHour,
        IntervalSelector::TwoHours,
        IntervalSelector::Daily,
        IntervalSelector::Weekly,
        IntervalSelector::Monthly,
    ];

    /// Never fails; unknown tags become `Unspecified`.
    pub fn parse(tag: &str) -> Self {
        match tag.trim() {
            "10s" => IntervalSelector::TenSeconds,
            "1min" => IntervalSelector::OneMinute,
            "2min" => IntervalSelector::TwoMinutes,
            "1h" => IntervalSelector::OneHour,
            "2h" => IntervalSelector::TwoHours,
            "1d" => IntervalSelector::Daily,
            "1w" => IntervalSelector::Weekly,
            "1m" => IntervalSelector::Monthly,
            _ => IntervalSelector::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalSelector::TenSeconds => "10s",
            IntervalSelector::OneMinute => "1min",
            IntervalSelector::TwoMinutes => "2min",
            IntervalSelector::OneHour => "1h",
            IntervalSelector::TwoHours => "2h",
            IntervalSelector::Daily => "1d",
            IntervalSelector::Weekly => "1w",
            IntervalSelector::Monthly => "1m",
            IntervalSelector::Unspecified => "",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IntervalSelector::TenSeconds => "10 sec",
            IntervalSelector::OneMinute => "1 minute",
            IntervalSelector::TwoMinutes => "2 minutes",
            IntervalSelector::OneHour => "1 Hour",
            IntervalSelector::TwoHours => "2 Hours",
            IntervalSelector::Daily => "Daily",
            IntervalSelector::Weekly => "Weekly",
            IntervalSelector::Monthly => "Monthly",
            IntervalSelector::Unspecified => "Unspecified",
        }
    }

    /// Tick period. Monthly has no cadence of its own on the monitoring
    /// screen and runs at the 10 second fallback, like `Unspecified`.
    pub fn period(&self) -> Duration {
        match self {
            IntervalSelector::TenSeconds => Duration::from_secs(10),
            IntervalSelector::OneMinute => Duration::from_secs(60),
            IntervalSelector::TwoMinutes => Duration::from_secs(2 * 60),
            IntervalSelector::OneHour => Duration::from_secs(60 * 60),
            IntervalSelector::TwoHours => Duration::from_secs(2 * 60 * 60),
            IntervalSelector::Daily => Duration::from_secs(24 * 60 * 60),
            IntervalSelector::Weekly => Duration::from_secs(7 * 24 * 60 * 60),
            IntervalSelector::Monthly | IntervalSelector::Unspecified => FALLBACK_PERIOD,
        }
    }
}

impl fmt::Display for IntervalSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for IntervalSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IntervalSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        Ok(IntervalSelector::parse(&tag))
    }
}
