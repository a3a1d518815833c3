use derive_more::Constructor;
use itertools::Itertools;
use std::time::{Duration, Instant};

/// Number that counts up from zero to `target` with an ease-out curve.
#[derive(Clone, Copy, Debug, Constructor)]
pub struct Counter {
    target: u64,
    start: Instant,
    duration: Duration,
}

impl Counter {
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.as_millis() == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub fn value_at(&self, now: Instant) -> u64 {
        (ease_out_cubic(self.progress(now)) * self.target as f64).round() as u64
    }

    pub fn is_done(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress.max(0.0).min(1.0)).powi(3)
}

/// `1234567` becomes `"1,234,567"`.
pub fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or_default())
        .join(",")
}
