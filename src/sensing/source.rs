use std::ops::RangeInclusive;

use rand::Rng;

use crate::models::Sample;

pub const MOISTURE_RANGE: RangeInclusive<u32> = 10..=60;
pub const TEMPERATURE_RANGE: RangeInclusive<u32> = 15..=35;
pub const HUMIDITY_RANGE: RangeInclusive<u32> = 30..=70;

/// Where readings come from. The scheduler only sees this trait, so a real
/// probe or protocol client can replace the random generator.
pub trait ReadingSource: Send + Sync + 'static {
    fn sample(&self) -> Sample;
}

/// Synthetic source: uniform integers within the fixed ranges.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReadingSource;

impl RandomReadingSource {
    pub fn new() -> Self {
        Self
    }
}

impl ReadingSource for RandomReadingSource {
    fn sample(&self) -> Sample {
        let mut rng = rand::thread_rng();
        Sample::new(
            rng.gen_range(MOISTURE_RANGE) as f64,
            rng.gen_range(TEMPERATURE_RANGE) as f64,
            rng.gen_range(HUMIDITY_RANGE) as f64,
        )
    }
}
