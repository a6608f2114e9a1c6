use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading and checksumming a file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The file could not be opened, inspected, mapped or read.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },

    /// The file yielded fewer bytes than its length promised.
    #[error("didn't read all bytes of '{}': expected {expected}, got {actual}", path.display())]
    ShortRead {
        /// The file being read.
        path: PathBuf,

        /// File length at the time it was opened.
        expected: usize,

        /// Number of bytes actually read.
        actual: usize,
    },

    /// The file length does not fit in the address space of this process.
    #[error("'{}' is too large to read into memory ({len} bytes)", path.display())]
    TooLarge {
        /// The file being read.
        path: PathBuf,

        /// File length in bytes.
        len: u64,
    },

    /// A buffer for the file contents could not be allocated, even after retrying.
    #[error("cannot allocate {len} bytes after {attempts} attempts")]
    AllocationFailed {
        /// Requested buffer size in bytes.
        len: usize,

        /// Number of allocation attempts made.
        attempts: u32,

        /// Error from the last attempt.
        source: TryReserveError,
    },

    /// The timer start/stop protocol was broken.
    #[error(transparent)]
    Timer(#[from] nested_timer::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// A specialized `Result` type for benchmark operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::fmt::Debug;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Error: Send, Sync, Debug);

    #[test]
    fn io_error_names_path() {
        let error = Error::io("/no/such/file")(io::Error::from(io::ErrorKind::NotFound));

        let message = error.to_string();
        assert!(message.contains("/no/such/file"), "{message}");
    }

    #[test]
    fn short_read_reports_counts() {
        let error = Error::ShortRead {
            path: PathBuf::from("data.bin"),
            expected: 10,
            actual: 4,
        };

        let message = error.to_string();
        assert!(message.contains("expected 10, got 4"), "{message}");
    }

    #[test]
    fn timer_error_is_transparent() {
        let inner = nested_timer::Error::UnbalancedSession {
            open: vec!["XOR_TOTAL".to_string()],
        };
        let expected = inner.to_string();

        let error = Error::from(inner);
        assert_eq!(error.to_string(), expected);
    }
}
