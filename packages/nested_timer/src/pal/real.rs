use std::time::{Duration, Instant};

use crate::pal::Platform;

/// Monotonic wall-clock time measured from the moment the platform was created.
#[derive(Debug)]
pub(crate) struct RealPlatform {
    origin: Instant,
}

impl RealPlatform {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Platform for RealPlatform {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
