//! Summaries keyed by event name and by full event path.

use foldhash::{HashMap, HashMapExt};

use crate::{CompletedEvent, Summary};

/// Running statistics for every key that has received at least one update.
///
/// Short names and full paths share one key space. An event started inside `XOR_TOTAL`
/// under the name `XOR` updates both `XOR` and `XOR_TOTAL.XOR`.
#[derive(Debug)]
pub(crate) struct SummaryRegistry {
    summaries: HashMap<String, Summary>,
}

impl SummaryRegistry {
    pub(crate) fn new() -> Self {
        Self {
            summaries: HashMap::new(),
        }
    }

    /// Folds a completed event into the summary for its full path and, if different,
    /// into the summary for its short name.
    #[expect(
        clippy::cast_precision_loss,
        reason = "millisecond durations never approach 2^52"
    )]
    pub(crate) fn record(&mut self, event: &CompletedEvent) {
        let millis = event.millis() as f64;

        if event.is_nested() {
            self.update(event.full_path(), millis);
        }

        self.update(event.name(), millis);
    }

    pub(crate) fn update(&mut self, key: &str, value: f64) {
        if let Some(summary) = self.summaries.get_mut(key) {
            summary.update(value);
            return;
        }

        let mut summary = Summary::new(key);
        summary.update(value);
        self.summaries.insert(key.to_string(), summary);
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Summary> {
        self.summaries.get(key)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Copies of all summaries, sorted by key.
    pub(crate) fn snapshot(&self) -> Vec<Summary> {
        let mut summaries: Vec<_> = self.summaries.values().cloned().collect();
        summaries.sort_by(|a, b| a.name().cmp(b.name()));
        summaries
    }
}
