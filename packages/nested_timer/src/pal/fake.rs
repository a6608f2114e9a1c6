#![cfg_attr(coverage_nightly, coverage(off))]

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::pal::Platform;

/// Fake clock for tests.
///
/// Clones share the same time value, so a test can keep one clone and advance the time
/// while the timer under test holds another.
#[derive(Clone, Debug, Default)]
pub(crate) struct FakePlatform {
    now: Rc<Cell<Duration>>,
}

impl FakePlatform {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_now(&self, now: Duration) {
        self.now.set(now);
    }

    pub(crate) fn advance_millis(&self, millis: u64) {
        self.now.set(
            self.now
                .get()
                .checked_add(Duration::from_millis(millis))
                .expect("fake clock overflow is a test bug"),
        );
    }
}

impl Platform for FakePlatform {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let platform = FakePlatform::new();
        assert_eq!(platform.now(), Duration::ZERO);
    }

    #[test]
    fn clones_share_time() {
        let platform1 = FakePlatform::new();
        let platform2 = platform1.clone();

        platform1.advance_millis(15);
        assert_eq!(platform2.now(), Duration::from_millis(15));

        platform2.set_now(Duration::from_millis(100));
        assert_eq!(platform1.now(), Duration::from_millis(100));
    }
}
