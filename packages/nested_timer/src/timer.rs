use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use scopeguard::ScopeGuard;

use crate::event::{EventLine, OpenEvent};
use crate::output;
use crate::pal::{Platform, PlatformFacade};
use crate::registry::SummaryRegistry;
use crate::stack::EventStack;
use crate::{
    CompletedEvent, Error, EventHandle, Report, Result, Span, Summary, TimerBuilder,
};

// Distinguishes handles issued by different timers.
static NEXT_SESSION: AtomicU64 = AtomicU64::new(0);

/// Measures nested named operations and aggregates their durations.
///
/// A timer is one measurement session. Events are started and stopped in strict LIFO order;
/// each stopped event updates the running statistics for its short name and, if it was
/// started inside another event, for its full nesting path as well.
///
/// The timer is single-threaded. It uses interior mutability so that nested [`Span`]s and
/// [`measure()`](Self::measure) closures can all share `&Timer`.
///
/// # Examples
///
/// ```
/// use nested_timer::Timer;
///
/// let timer = Timer::builder().echo(false).build();
///
/// let outer = timer.start_event("XOR_TOTAL");
/// let inner = timer.start_event("XOR");
/// assert_eq!(inner.full_path(), "XOR_TOTAL.XOR");
///
/// timer.stop_event(inner).unwrap();
/// timer.stop_event(outer).unwrap();
///
/// let report = timer.report().unwrap();
/// assert_eq!(report.len(), 3); // XOR, XOR_TOTAL, XOR_TOTAL.XOR
/// ```
#[derive(Debug)]
pub struct Timer {
    session: u64,
    next_sequence: Cell<u64>,
    stack: RefCell<EventStack>,
    registry: RefCell<SummaryRegistry>,
    platform: PlatformFacade,
    echo: bool,
    name_width: usize,
}

impl Timer {
    /// Creates a timer that echoes every stopped event to stdout.
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Starts configuring a new timer.
    pub fn builder() -> TimerBuilder {
        TimerBuilder::new()
    }

    pub(crate) fn new_inner(platform: PlatformFacade, echo: bool, name_width: usize) -> Self {
        Self {
            session: NEXT_SESSION.fetch_add(1, Ordering::Relaxed),
            next_sequence: Cell::new(0),
            stack: RefCell::new(EventStack::default()),
            registry: RefCell::new(SummaryRegistry::new()),
            platform,
            echo,
            name_width,
        }
    }

    /// Starts a new event nested inside the innermost open event, if any.
    ///
    /// The full path of the event is fixed here: the name itself at the top level, otherwise
    /// the full path of the innermost open event followed by `.` and the name.
    pub fn start_event(&self, name: impl Into<String>) -> EventHandle {
        let name = name.into();
        let start = self.platform.now();

        let sequence = self.next_sequence.get();
        self.next_sequence.set(
            sequence
                .checked_add(1)
                .expect("event sequence overflows u64 - this indicates an unrealistic scenario"),
        );

        let mut stack = self.stack.borrow_mut();
        let full_path: Rc<str> = stack.path_for(&name).into();

        stack.push(OpenEvent {
            sequence,
            name,
            full_path: Rc::clone(&full_path),
            start,
        });

        tracing::debug!(path = %full_path, depth = stack.depth(), "event started");

        EventHandle {
            session: self.session,
            sequence,
            full_path,
        }
    }

    /// Stops the innermost open event, records its duration and returns the measurement.
    ///
    /// The duration is folded into the summary for the event's short name and, if the event
    /// was nested, into the summary for its full path. If echo is enabled, one line with the
    /// name and duration is printed to stdout. Write failures, such as a closed pipe, are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StackDiscipline`] if `handle` is not the innermost open event of this
    /// timer. Nothing is recorded and the open events are left as they were.
    ///
    /// The rejected handle is consumed all the same. Its event stays open for the rest of the
    /// session of the timer that issued it, so that session can never be balanced again and
    /// its [`report()`] is refused from then on. Treat this error as fatal.
    ///
    /// [`report()`]: Self::report
    pub fn stop_event(&self, handle: EventHandle) -> Result<CompletedEvent> {
        let stop = self.platform.now();

        let open = {
            let mut stack = self.stack.borrow_mut();

            let popped = if handle.session == self.session {
                stack.pop_if_innermost(handle.sequence)
            } else {
                None
            };

            popped.ok_or_else(|| Error::StackDiscipline {
                stopped: handle.full_path.to_string(),
                innermost: stack.innermost_path(),
            })?
        };

        let completed = CompletedEvent::new(
            open.name,
            open.full_path.to_string(),
            stop.saturating_sub(open.start),
        );

        self.registry.borrow_mut().record(&completed);

        tracing::debug!(
            path = completed.full_path(),
            millis = completed.millis(),
            "event stopped"
        );

        if self.echo {
            let line = EventLine {
                event: &completed,
                name_width: self.name_width,
            };
            output::print_stdout(format_args!("{line}\n"));
        }

        Ok(completed)
    }

    /// Measures `work` as an event with the given name.
    ///
    /// The event is stopped on every exit path. If `work` panics, the event is stopped
    /// before the panic continues to unwind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StackDiscipline`] if `work` left events open that it started itself,
    /// so the measured event was no longer the innermost one when `work` returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use nested_timer::Timer;
    ///
    /// let timer = Timer::builder().echo(false).build();
    ///
    /// let checksum = timer
    ///     .measure("XOR_TOTAL", || {
    ///         timer.measure("XOR", || [1_u8, 2, 4].iter().fold(0, |acc, b| acc ^ b))
    ///     })
    ///     .unwrap()
    ///     .unwrap();
    ///
    /// assert_eq!(checksum, 7);
    /// assert_eq!(timer.summary("XOR_TOTAL.XOR").unwrap().count(), 1);
    /// ```
    pub fn measure<R>(&self, name: impl Into<String>, work: impl FnOnce() -> R) -> Result<R> {
        // Only fires when `work` unwinds; the normal path defuses it below.
        let guard = scopeguard::guard(self.start_event(name), |handle| {
            if let Err(error) = self.stop_event(handle) {
                tracing::error!(%error, "event could not be stopped during unwinding");
            }
        });

        let value = work();

        self.stop_event(ScopeGuard::into_inner(guard))?;
        Ok(value)
    }

    /// Starts an event that is stopped when the returned [`Span`] is dropped.
    pub fn span(&self, name: impl Into<String>) -> Span<'_> {
        Span::new(self, self.start_event(name))
    }

    /// Number of currently open events.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.borrow().depth()
    }

    /// Full paths of the currently open events, outermost first.
    #[must_use]
    pub fn open_paths(&self) -> Vec<String> {
        self.stack.borrow().paths()
    }

    /// Current statistics for a short event name or full event path.
    #[must_use]
    pub fn summary(&self, key: &str) -> Option<Summary> {
        self.registry.borrow().get(key).cloned()
    }

    /// Whether no event has been stopped yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.borrow().is_empty()
    }

    /// Creates a report with all summaries sorted by key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnbalancedSession`] if any event is still open, as the report would
    /// silently miss the time spent in those events.
    pub fn report(&self) -> Result<Report> {
        let stack = self.stack.borrow();

        if !stack.is_empty() {
            let open = stack.paths();
            tracing::warn!(?open, "report requested with open events");
            return Err(Error::UnbalancedSession { open });
        }

        Ok(Report::new(self.registry.borrow().snapshot(), self.name_width))
    }

    /// Prints the report to stdout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnbalancedSession`] if any event is still open. Nothing is printed.
    #[cfg_attr(test, mutants::skip)] // Too difficult to test stdout output reliably - manually tested.
    pub fn print_summaries(&self) -> Result<()> {
        self.report()?.print_to_stdout();
        Ok(())
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
