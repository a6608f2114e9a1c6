#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the read benchmark.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! is impractical - it requires spawning subprocesses and checking exit codes.

use std::io::{self, Write};
use std::num::NonZero;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use argh::FromArgs;
use nested_timer::{Report, Timer};
use read_bench::{
    DEFAULT_ATTEMPTS, DEFAULT_DELAY, DEFAULT_ITERATIONS, Error, ReadStrategy, RetryPolicy,
    RunInput, RunOutcome, run,
};
use tracing::Level;

/// Compares ways of reading a file into memory by timing a XOR checksum over its contents.
#[derive(FromArgs)]
struct Args {
    /// the file to read
    #[argh(positional)]
    filename: PathBuf,

    /// read strategy for the checksum passes (normal, mapped, direct, rfile, stream)
    #[argh(option)]
    strategy: Option<ReadStrategy>,

    /// number of checksum passes over the buffer
    #[argh(option)]
    iterations: Option<u32>,

    /// use the chunked checksum instead of the plain one
    #[argh(switch)]
    chunked: bool,

    /// also time reading plus checksumming once with every strategy
    #[argh(switch)]
    compare: bool,

    /// allocation attempts before giving up
    #[argh(option)]
    retries: Option<NonZero<u32>>,

    /// pause between allocation attempts, in milliseconds
    #[argh(option)]
    retry_delay_ms: Option<u64>,

    /// do not print a line for every measured event
    #[argh(switch, short = 'q')]
    quiet: bool,

    /// log debug details to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    init_logging(args.verbose);

    let input = RunInput {
        path: args.filename,
        strategy: args.strategy.unwrap_or(ReadStrategy::Direct),
        iterations: args.iterations.unwrap_or(DEFAULT_ITERATIONS),
        chunked: args.chunked,
        compare: args.compare,
        retry: RetryPolicy::new(
            args.retries.unwrap_or(DEFAULT_ATTEMPTS),
            args.retry_delay_ms
                .map_or(DEFAULT_DELAY, Duration::from_millis),
        ),
    };

    let timer = Timer::builder().echo(!args.quiet).build();

    match run(&input, &timer).and_then(|outcome| print_outcome(&outcome, &timer)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_outcome(outcome: &RunOutcome, timer: &Timer) -> Result<(), Error> {
    let report = timer.report()?;

    // Write failures, such as a closed pipe, are ignored.
    _ = write_outcome(&mut io::stdout().lock(), outcome, &report);

    Ok(())
}

fn write_outcome(out: &mut impl Write, outcome: &RunOutcome, report: &Report) -> io::Result<()> {
    writeln!(out, "{}", outcome.checksum)?;

    for (strategy, checksum) in &outcome.compared {
        writeln!(out, "{strategy}: {checksum}")?;
    }

    write!(out, "{report}")
}

fn init_logging(verbose: bool) {
    let max_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(io::stderr)
        .init();
}
