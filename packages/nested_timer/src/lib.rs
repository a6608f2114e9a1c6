#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Wall-clock timing of nested named operations, with running statistics per operation name
//! and per nesting path.
//!
//! The core functionality includes:
//! - [`Timer`] - One measurement session: starts and stops events, aggregates durations
//! - [`Span`] - Stops its event when dropped, for scope-based measurement
//! - [`Summary`] - Running mean and population standard deviation for one key
//! - [`Report`] - Sorted snapshot of all summaries, printable as a text block
//!
//! This package is meant for benchmarks and experiments, not for production telemetry.
//!
//! # Nesting and aggregation keys
//!
//! Every event has a short name and a full path. The full path is the name prefixed with the
//! full path of the innermost event that was open when it started, joined with `.`. When an
//! event stops, its duration is recorded under the full path and, if that differs from the
//! name, under the name as well. The same inner operation can thus be analyzed both in
//! aggregate (`XOR`) and per calling context (`XOR_TOTAL.XOR`).
//!
//! ```
//! use nested_timer::Timer;
//!
//! let timer = Timer::builder().echo(false).build();
//!
//! let data = vec![0x5a_u8; 4096];
//!
//! for _ in 0..3 {
//!     timer.measure("XOR", || data.iter().fold(0, |acc, b| acc ^ b)).unwrap();
//! }
//!
//! timer
//!     .measure("XOR_TOTAL", || {
//!         timer.measure("XOR", || data.iter().fold(0, |acc, b| acc ^ b))
//!     })
//!     .unwrap()
//!     .unwrap();
//!
//! let report = timer.report().unwrap();
//! assert_eq!(report.get("XOR").unwrap().count(), 4);
//! assert_eq!(report.get("XOR_TOTAL.XOR").unwrap().count(), 1);
//!
//! // Prints the "Total" block with one line per key, sorted by key.
//! report.print_to_stdout();
//! ```
//!
//! # Stack discipline
//!
//! Events must be stopped innermost first. Stopping any other event is a programming error
//! reported as [`Error::StackDiscipline`] and leaves the timer unchanged. Asking for a report
//! while events are open is refused with [`Error::UnbalancedSession`].
//!
//! [`Timer::measure()`] and [`Timer::span()`] take care of the ordering for you, including
//! when the measured code panics.
//!
//! # Resolution
//!
//! Durations are measured with a monotonic clock and recorded in whole milliseconds.
//!
//! # Threading
//!
//! A [`Timer`] is single-threaded (`!Sync`). Use one timer per thread of measurement.

mod builder;
mod error;
mod event;
mod output;
mod pal;
mod registry;
mod report;
mod span;
mod stack;
mod summary;
mod timer;

pub use builder::TimerBuilder;
pub use error::Error;
pub(crate) use error::Result;
pub use event::{CompletedEvent, EventHandle};
pub use report::Report;
pub use span::Span;
pub use summary::Summary;
pub use timer::Timer;

/// Default minimum width of the name column in event lines and reports.
pub const DEFAULT_NAME_WIDTH: usize = 40;
