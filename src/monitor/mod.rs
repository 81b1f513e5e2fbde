pub mod controller;
pub mod params;
pub mod state;
pub mod views;

pub use controller::{MonitorController, MonitorEvent, MonitorSnapshot};
pub use params::{MonitorParams, DEFAULT_THRESHOLD};
pub use state::{MonitorState, MonitorStatus};
pub use views::{ChartSeries, LogEntryView, Metric, Summary};
