pub mod registry;
pub mod source;

pub use registry::SensorRegistry;
pub use source::{RandomReadingSource, ReadingSource};
