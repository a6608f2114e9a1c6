use std::io::{self, Write};
use std::num::NonZero;
use std::thread;
use std::time::Duration;

use crate::{Error, Result};

/// How hard to try when a file buffer cannot be allocated.
///
/// Large files may not fit in memory on the first attempt while earlier buffers are still
/// being released. Each failed attempt is followed by a pause before the next one.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    attempts: NonZero<u32>,
    delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy that makes up to `attempts` allocation attempts, pausing for `delay`
    /// after each failed one.
    #[must_use]
    pub fn new(attempts: NonZero<u32>, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Maximum number of allocation attempts.
    #[must_use]
    pub fn attempts(&self) -> NonZero<u32> {
        self.attempts
    }

    /// Pause after each failed attempt.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Allocates a zero-filled buffer of exactly `len` bytes.
    ///
    /// Prints `Allocation retries: <n>` to stdout once the attempts are over, whether or not
    /// they succeeded, where `n` is the number of failed attempts.
    pub(crate) fn allocate(&self, len: usize) -> Result<Vec<u8>> {
        self.allocate_reporting(len, &mut io::stdout())
    }

    fn allocate_reporting(&self, len: usize, out: &mut impl Write) -> Result<Vec<u8>> {
        let (result, failed_attempts) = self.try_allocate(len);

        // Write failures, such as a closed pipe, are ignored.
        _ = writeln!(out, "Allocation retries: {failed_attempts}");

        result
    }

    fn try_allocate(&self, len: usize) -> (Result<Vec<u8>>, u32) {
        let mut failed_attempts = 0_u32;

        loop {
            let mut buffer = Vec::new();

            match buffer.try_reserve_exact(len) {
                Ok(()) => {
                    tracing::debug!(len, retries = failed_attempts, "buffer allocated");
                    buffer.resize(len, 0);
                    return (Ok(buffer), failed_attempts);
                }
                Err(source) => {
                    failed_attempts = failed_attempts.saturating_add(1);

                    if failed_attempts >= self.attempts.get() {
                        let error = Error::AllocationFailed {
                            len,
                            attempts: failed_attempts,
                            source,
                        };
                        return (Err(error), failed_attempts);
                    }

                    tracing::warn!(
                        len,
                        attempt = failed_attempts,
                        delay = ?self.delay,
                        "buffer allocation failed, retrying"
                    );
                    thread::sleep(self.delay);
                }
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS, DEFAULT_DELAY)
    }
}

/// Number of allocation attempts unless configured otherwise.
pub const DEFAULT_ATTEMPTS: NonZero<u32> = NonZero::new(3).expect("3 is not zero");

/// Pause between allocation attempts unless configured otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_secs(2);
