//! Program output on stdout.

use std::fmt;
use std::io::{self, Write};

/// Writes to stdout. Write failures, such as a closed pipe, are ignored.
pub(crate) fn print_stdout(args: fmt::Arguments<'_>) {
    write_ignoring_errors(&mut io::stdout().lock(), args);
}

pub(crate) fn write_ignoring_errors(out: &mut impl Write, args: fmt::Arguments<'_>) {
    _ = out.write_fmt(args);
}
