//! End-of-session reports.

use std::fmt;

use crate::Summary;
use crate::output;

/// Snapshot of all summaries of a [`Timer`][crate::Timer], sorted by key.
///
/// Obtained from [`Timer::report()`][crate::Timer::report], which refuses to produce a report
/// while events are still open. The `Display` output is the human-readable summary block:
///
/// ```text
///
/// Total
/// =====
/// XOR                                            12 ms        3 stdv       10 iter
/// ```
///
/// # Examples
///
/// ```
/// use nested_timer::Timer;
///
/// let timer = Timer::builder().echo(false).build();
/// timer.measure("XOR", || std::hint::black_box(0x5a_u8 ^ 0xa5)).unwrap();
///
/// let report = timer.report().unwrap();
/// for summary in report.summaries() {
///     println!("{}: {} samples", summary.name(), summary.count());
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Report {
    // Sorted by key, ascending.
    summaries: Box<[Summary]>,
    name_width: usize,
}

impl Report {
    pub(crate) fn new(summaries: Vec<Summary>, name_width: usize) -> Self {
        Self {
            summaries: summaries.into_boxed_slice(),
            name_width,
        }
    }

    /// Iterates over the summaries in key order.
    pub fn summaries(&self) -> impl Iterator<Item = &Summary> {
        self.summaries.iter()
    }

    /// Looks up the summary for a short event name or full event path.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Summary> {
        self.summaries
            .binary_search_by(|summary| summary.name().cmp(key))
            .ok()
            .and_then(|index| self.summaries.get(index))
    }

    /// Number of distinct keys in the report.
    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether no event was ever stopped in the session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Prints the summary block to stdout.
    ///
    /// Write failures, such as a closed pipe, are ignored.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_to_stdout(&self) {
        output::print_stdout(format_args!("{self}"));
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Total")?;
        writeln!(f, "=====")?;

        for summary in &self.summaries {
            summary.write_line(f, self.name_width)?;
            writeln!(f)?;
        }

        Ok(())
    }
}
