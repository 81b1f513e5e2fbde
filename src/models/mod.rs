pub mod account;
pub mod interval;
pub mod monitoring;
pub mod reading;
pub mod sensor;

pub use account::{LoginOutcome, UserDetails};
pub use interval::IntervalSelector;
pub use monitoring::{MonitoringState, ReadingLog, LOG_CAPACITY};
pub use reading::{Reading, Sample};
pub use sensor::ConfiguredSensor;
