use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trait for clocks that turn recorder sample stamps into time
pub trait SampleClock: Clone + Send + Sync {
    type Sample: Copy + Clone + Send + Sync;
    fn rate_hz(&self) -> f64;
    /// Shifts a recorder stamp onto this clock's origin
    fn rebase(&self, sample: Self::Sample) -> Self::Sample;
    /// Milliseconds for an already rebased sample
    fn to_ms(&self, sample: Self::Sample) -> f64;
    fn elapsed(&self, from: Self::Sample, to: Self::Sample) -> Duration;
}

/// Whether output sample indices keep the recorder clock or start at zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrigin {
    #[default]
    Absolute,
    SessionRelative,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecorderClock {
    rate_hz: f64,
    origin: i64,
}

impl RecorderClock {
    /// Clock on the recorder's absolute sample stamps
    pub fn new(rate_hz: f64) -> Self {
        Self { rate_hz, origin: 0 }
    }

    /// Picks the origin for `first_sample` according to `origin`
    pub fn with_origin(rate_hz: f64, origin: SampleOrigin, first_sample: Option<i64>) -> Self {
        let origin = match origin {
            SampleOrigin::Absolute => 0,
            SampleOrigin::SessionRelative => first_sample.unwrap_or(0),
        };
        Self { rate_hz, origin }
    }

    pub fn origin(&self) -> i64 {
        self.origin
    }
}

impl SampleClock for RecorderClock {
    type Sample = i64;

    fn rate_hz(&self) -> f64 {
        self.rate_hz
    }

    fn rebase(&self, sample: i64) -> i64 {
        sample - self.origin
    }

    fn to_ms(&self, sample: i64) -> f64 {
        sample as f64 * 1000.0 / self.rate_hz
    }

    fn elapsed(&self, from: i64, to: i64) -> Duration {
        let samples = to.saturating_sub(from).max(0) as f64;
        Duration::from_secs_f64(samples / self.rate_hz)
    }
}
