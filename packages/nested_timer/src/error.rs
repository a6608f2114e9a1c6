use thiserror::Error;

/// Errors returned by [`Timer`][crate::Timer] when the caller breaks the start/stop protocol.
///
/// These are programming errors in the caller, not transient conditions. They are never
/// retried and the timer makes no attempt to recover from them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An event was stopped while it was not the innermost open event.
    ///
    /// This happens when events are stopped out of order or when a handle from a different
    /// timer is passed in. The timer state is left unchanged.
    #[error("event not properly stopped: '{stopped}' is not the innermost open event (innermost: {innermost:?})")]
    StackDiscipline {
        /// Full path of the event the caller attempted to stop.
        stopped: String,

        /// Full path of the innermost open event, if any event is open.
        innermost: Option<String>,
    },

    /// A report was requested while some events were still open.
    #[error("cannot report on a session with open events: {open:?}")]
    UnbalancedSession {
        /// Full paths of the open events, outermost first.
        open: Vec<String>,
    },
}

/// A specialized `Result` type for timer operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
