use std::time::Duration;

/// Decides how long the dispatch loop waits after sending the message at
/// `index` (zero-based) out of `total`. The loop never asks after the last
/// message.
pub trait PacingPolicy: Send + Sync {
    fn next_delay(&self, index: usize, total: usize) -> Duration;
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_secs(seconds: u64) -> Self {
        Self::new(Duration::from_secs(seconds))
    }
}

impl PacingPolicy for FixedDelay {
    fn next_delay(&self, _index: usize, _total: usize) -> Duration {
        self.delay
    }
}

/// Fixed delay with a random spread of `±ratio` applied per message.
#[derive(Debug, Clone, Copy)]
pub struct JitteredDelay {
    base: Duration,
    ratio: f64,
}

impl JitteredDelay {
    pub fn new(base: Duration, ratio: f64) -> Self {
        Self {
            base,
            ratio: ratio.clamp(0.0, 1.0),
        }
    }
}

impl PacingPolicy for JitteredDelay {
    fn next_delay(&self, _index: usize, _total: usize) -> Duration {
        if self.ratio == 0.0 {
            return self.base;
        }

        let jitter = rand::random_range(-self.ratio..=self.ratio);
        Duration::try_from_secs_f64(self.base.as_secs_f64() * (1.0 + jitter)).unwrap_or(self.base)
    }
}
