//! Open and completed timed events.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use crate::DEFAULT_NAME_WIDTH;

/// Identifies an open event started with [`Timer::start_event()`][crate::Timer::start_event].
///
/// Pass it back to [`Timer::stop_event()`][crate::Timer::stop_event] to stop the event. The
/// handle is consumed when stopping, so an event cannot be stopped twice.
///
/// The handle is only meaningful for the timer that issued it.
#[derive(Debug)]
#[must_use = "an event that is never stopped leaves the timer unbalanced"]
pub struct EventHandle {
    pub(crate) session: u64,
    pub(crate) sequence: u64,
    pub(crate) full_path: Rc<str>,
}

impl EventHandle {
    /// The full nesting path of the event, e.g. `XOR_TOTAL.XOR`.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }
}

/// An event that has been started but not yet stopped, as held by the event stack.
#[derive(Debug)]
pub(crate) struct OpenEvent {
    pub(crate) sequence: u64,
    pub(crate) name: String,
    pub(crate) full_path: Rc<str>,
    pub(crate) start: Duration,
}

/// A stopped event with its measured duration.
///
/// Returned by [`Timer::stop_event()`][crate::Timer::stop_event]. Displays as one line with
/// the name and the duration in whole milliseconds.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompletedEvent {
    name: String,
    full_path: String,
    duration: Duration,
}

impl CompletedEvent {
    pub(crate) fn new(name: String, full_path: String, duration: Duration) -> Self {
        Self {
            name,
            full_path,
            duration,
        }
    }

    /// The short name the event was started with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name prefixed with the full paths of all events that were open when it started.
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Whether the event was started with other events already open.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.full_path != self.name
    }

    /// Wall-clock time between start and stop.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Duration truncated to whole milliseconds, the resolution used for statistics.
    #[must_use]
    pub fn millis(&self) -> u64 {
        self.duration
            .as_millis()
            .try_into()
            .expect("event durations never approach u64::MAX milliseconds")
    }

    pub(crate) fn write_line(&self, f: &mut fmt::Formatter<'_>, name_width: usize) -> fmt::Result {
        write!(f, "{:<name_width$} {:>8} ms", self.name, self.millis())
    }
}

impl fmt::Display for CompletedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_line(f, DEFAULT_NAME_WIDTH)
    }
}

/// Displays a completed event with a custom name column width.
pub(crate) struct EventLine<'a> {
    pub(crate) event: &'a CompletedEvent,
    pub(crate) name_width: usize,
}

impl fmt::Display for EventLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.event.write_line(f, self.name_width)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn top_level_event_is_not_nested() {
        let event = CompletedEvent::new("XOR".to_string(), "XOR".to_string(), Duration::ZERO);
        assert!(!event.is_nested());
    }

    #[test]
    fn inner_event_is_nested() {
        let event = CompletedEvent::new(
            "XOR".to_string(),
            "XOR_TOTAL.XOR".to_string(),
            Duration::ZERO,
        );
        assert!(event.is_nested());
    }

    #[test]
    fn millis_truncates() {
        let event = CompletedEvent::new(
            "A".to_string(),
            "A".to_string(),
            Duration::from_micros(12_999),
        );
        assert_eq!(event.millis(), 12);
    }

    #[test]
    fn display_pads_name_to_default_width() {
        let event = CompletedEvent::new(
            "XOR".to_string(),
            "XOR_TOTAL.XOR".to_string(),
            Duration::from_millis(123),
        );

        assert_eq!(event.to_string(), format!("{:<40}      123 ms", "XOR"));
    }

    #[test]
    fn event_line_uses_custom_width() {
        let event = CompletedEvent::new("AB".to_string(), "AB".to_string(), Duration::from_millis(5));
        let line = EventLine {
            event: &event,
            name_width: 4,
        };

        assert_eq!(line.to_string(), "AB          5 ms");
    }

    #[test]
    fn long_names_are_not_truncated() {
        let name = "N".repeat(50);
        let event = CompletedEvent::new(name.clone(), name.clone(), Duration::from_millis(1));

        assert!(event.to_string().starts_with(&name));
    }
}
