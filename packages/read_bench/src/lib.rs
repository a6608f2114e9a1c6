#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compares ways of reading a file into memory by timing a XOR checksum over its contents.
//!
//! Each read strategy and each checksum pass is measured as an event of a
//! [`nested_timer::Timer`], so the summary at the end shows both the per-operation totals
//! (`XOR`) and the per-context breakdown (`XOR_TOTAL.XOR`).
//!
//! The core logic is exposed via the [`run`] function. The binary entry point is in `main.rs`.

mod buffer;
mod checksum;
mod error;
mod retry;
mod strategy;

use std::path::PathBuf;

pub use buffer::FileBuffer;
pub use checksum::*;
pub use error::Error;
pub(crate) use error::Result;
use nested_timer::Timer;
pub use retry::*;
pub use strategy::ReadStrategy;

/// Number of checksum passes over the buffer unless configured otherwise.
pub const DEFAULT_ITERATIONS: u32 = 10;

/// Input parameters for the `run` function.
///
/// This is the parsed and validated input that the core logic operates on.
#[doc(hidden)]
#[derive(Debug)]
#[allow(
    clippy::exhaustive_structs,
    reason = "This is a hidden struct for internal/test use only"
)]
pub struct RunInput {
    /// The file to read.
    pub path: PathBuf,
    /// How to read the file for the checksum passes.
    pub strategy: ReadStrategy,
    /// Number of checksum passes over the buffer.
    pub iterations: u32,
    /// Use the chunked checksum instead of the plain one.
    pub chunked: bool,
    /// Additionally read and checksum the file once with every strategy.
    pub compare: bool,
    /// What to do when a buffer cannot be allocated.
    pub retry: RetryPolicy,
}

/// The outcome of a successful run.
#[doc(hidden)]
#[derive(Clone, Debug, Eq, PartialEq)]
#[allow(
    clippy::exhaustive_structs,
    reason = "This is a hidden struct for internal/test use only"
)]
pub struct RunOutcome {
    /// XOR of the checksums of all passes.
    pub checksum: u8,
    /// Checksum obtained by each strategy, if comparison was requested.
    pub compared: Vec<(ReadStrategy, u8)>,
}

/// Core logic of the tool, extracted for testability.
///
/// Reads the file once with the configured strategy, runs the configured number of checksum
/// passes over the buffer and, if requested, measures a full read plus checksum with every
/// strategy. All measurements are recorded in `timer`.
///
/// # Errors
///
/// Fails on the first read, allocation or timer error.
#[doc(hidden)]
pub fn run(input: &RunInput, timer: &Timer) -> Result<RunOutcome> {
    tracing::info!(
        path = %input.path.display(),
        strategy = %input.strategy,
        iterations = input.iterations,
        "starting benchmark"
    );

    let buffer = input.strategy.read(&input.path, timer, &input.retry)?;

    let mut checksum = 0;
    for _ in 0..input.iterations {
        checksum ^= if input.chunked {
            xor_chunked(timer, &buffer)?
        } else {
            xor(timer, &buffer)?
        };
    }

    // Release the buffer before the comparison allocates more.
    drop(buffer);

    let compared = if input.compare {
        ReadStrategy::ALL
            .into_iter()
            .map(|strategy| {
                xor_total(timer, &input.path, strategy, &input.retry)
                    .map(|checksum| (strategy, checksum))
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        Vec::new()
    };

    Ok(RunOutcome { checksum, compared })
}
