//! Running statistics for one aggregation key.

use std::fmt;

use crate::DEFAULT_NAME_WIDTH;

/// Running mean and population standard deviation of the durations recorded under one key.
///
/// The key is either a short event name (e.g. `XOR`) or a full nesting path
/// (e.g. `XOR_TOTAL.XOR`). Values are folded in one at a time with Welford's method, so the
/// statistics stay accurate over long runs without keeping the individual samples.
///
/// # Examples
///
/// ```
/// use nested_timer::Summary;
///
/// let mut summary = Summary::new("XOR");
/// summary.update(10.0);
/// summary.update(20.0);
/// summary.update(30.0);
///
/// assert_eq!(summary.count(), 3);
/// assert!((summary.mean() - 20.0).abs() < 1e-9);
/// assert!((summary.stdv() - 8.164_965_809).abs() < 1e-6);
/// ```
#[derive(Clone, Debug)]
pub struct Summary {
    name: String,
    count: u64,
    mean: f64,

    // Sum of squared differences from the mean. Zero until the second update.
    q: f64,
}

impl Summary {
    /// Creates an empty summary for the given key.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            mean: 0.0,
            q: 0.0,
        }
    }

    /// Folds one more value into the statistics.
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts never approach 2^52 in a measurement session"
    )]
    pub fn update(&mut self, value: f64) {
        self.count = self
            .count
            .checked_add(1)
            .expect("summary sample count overflows u64 - this indicates an unrealistic scenario");

        if self.count == 1 {
            self.mean = value;
        } else {
            let count = self.count as f64;
            let new_mean = self.mean + (value - self.mean) / count;
            self.q += (value - self.mean) * (value - new_mean);
            self.mean = new_mean;
        }
    }

    /// The aggregation key: a short event name or a full nesting path.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of values folded in so far.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of all values, or zero if there are none.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population standard deviation (divisor `count`, not `count - 1`).
    ///
    /// Exactly zero for a single value. Zero if there are no values.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "sample counts never approach 2^52 in a measurement session"
    )]
    pub fn stdv(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }

        (self.q / self.count as f64).sqrt()
    }

    // Halves round up (away from zero), unlike the `{:.0}` formatter which rounds to even.
    pub(crate) fn write_line(&self, f: &mut fmt::Formatter<'_>, name_width: usize) -> fmt::Result {
        write!(
            f,
            "{:<name_width$} {:>8.0} ms {:>8.0} stdv {:>8} iter",
            self.name,
            self.mean().round(),
            self.stdv().round(),
            self.count
        )
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f, DEFAULT_NAME_WIDTH)
    }
}
