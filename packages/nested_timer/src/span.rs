use std::thread;

use crate::{CompletedEvent, EventHandle, Result, Timer};

/// An open event that is stopped when the span is dropped.
///
/// Created by [`Timer::span()`]. Spans declared in the same scope are dropped in reverse
/// order of declaration, which is exactly the order the timer requires.
///
/// # Panics
///
/// Dropping a span that is not the innermost open event of its timer panics, as this means
/// the start/stop protocol was broken. If the thread is already panicking, the violation is
/// logged instead.
///
/// # Examples
///
/// ```
/// use nested_timer::Timer;
///
/// let timer = Timer::builder().echo(false).build();
/// {
///     let _total = timer.span("XOR_TOTAL");
///     {
///         let _xor = timer.span("XOR");
///         // Work measured as both `XOR` and `XOR_TOTAL.XOR`.
///     }
/// }
///
/// let report = timer.report().unwrap();
/// assert_eq!(report.get("XOR_TOTAL.XOR").unwrap().count(), 1);
/// ```
#[derive(Debug)]
#[must_use = "Measurements are taken between creation and drop"]
pub struct Span<'a> {
    timer: &'a Timer,

    // Only `None` after an explicit `stop()`.
    handle: Option<EventHandle>,
}

impl<'a> Span<'a> {
    pub(crate) fn new(timer: &'a Timer, handle: EventHandle) -> Self {
        Self {
            timer,
            handle: Some(handle),
        }
    }

    /// Stops the event now and returns the measurement.
    ///
    /// Unlike dropping the span, this reports a broken start/stop protocol as an error
    /// instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StackDiscipline`][crate::Error::StackDiscipline] if the span is not
    /// the innermost open event.
    pub fn stop(mut self) -> Result<CompletedEvent> {
        let handle = self
            .handle
            .take()
            .expect("handle is only taken by stop() or drop(), both of which consume the span");

        self.timer.stop_event(handle)
    }
}

impl Drop for Span<'_> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        if let Err(error) = self.timer.stop_event(handle) {
            if thread::panicking() {
                tracing::error!(%error, "span dropped out of order during unwinding");
            } else {
                panic!("{error}");
            }
        }
    }
}
