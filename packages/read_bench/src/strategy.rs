use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use memmap2::Mmap;
use nested_timer::Timer;

use crate::{Error, FileBuffer, Result, RetryPolicy};

/// A way of getting the contents of a file into memory.
///
/// Every read is measured as a timer event named after the strategy, e.g. `DIRECT_READ`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[allow(
    clippy::exhaustive_enums,
    reason = "the benchmark compares exactly these strategies"
)]
pub enum ReadStrategy {
    /// Reads into a heap buffer sized from the file metadata.
    Normal,

    /// Maps the file into memory without copying it.
    Mapped,

    /// Reads into a fixed-size buffer allocated separately at the exact file length.
    Direct,

    /// Reads the whole file with a single `read` call into a raw byte array.
    RandomAccess,

    /// Reads through a buffered stream until end of file.
    Stream,
}

impl ReadStrategy {
    /// All strategies, in the order they are compared.
    pub const ALL: [Self; 5] = [
        Self::Normal,
        Self::Mapped,
        Self::Direct,
        Self::RandomAccess,
        Self::Stream,
    ];

    /// Name of the timer event that measures a read with this strategy.
    #[must_use]
    pub fn event_name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL_READ",
            Self::Mapped => "MAPPED_READ",
            Self::Direct => "DIRECT_READ",
            Self::RandomAccess => "RFILE_READ",
            Self::Stream => "STREAM_READ",
        }
    }

    /// Reads the whole file, measuring the read as a timer event.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read in full, if no buffer can be allocated for it within
    /// the retry policy, or if the timer start/stop protocol is broken by the caller.
    pub fn read(self, path: &Path, timer: &Timer, retry: &RetryPolicy) -> Result<FileBuffer> {
        timer.measure(self.event_name(), || self.read_untimed(path, retry))?
    }

    fn read_untimed(self, path: &Path, retry: &RetryPolicy) -> Result<FileBuffer> {
        let mut file = File::open(path).map_err(Error::io(path))?;
        let len = file_len(&file, path)?;

        tracing::debug!(strategy = self.event_name(), path = %path.display(), len, "reading file");

        match self {
            Self::Normal => {
                let mut bytes = retry.allocate(len)?;
                let actual = fill(&mut file, &mut bytes).map_err(Error::io(path))?;
                check_len(path, len, actual)?;
                Ok(FileBuffer::heap(bytes))
            }
            Self::Mapped => {
                if len == 0 {
                    // Zero-length mappings are rejected by the operating system.
                    return Ok(FileBuffer::heap(Vec::new()));
                }

                // SAFETY: The benchmark assumes nothing modifies the file while it is being
                // measured. A concurrent truncation could fault on access, which we accept
                // for a measurement tool operating on files the user points it at.
                let map = unsafe { Mmap::map(&file) }.map_err(Error::io(path))?;
                check_len(path, len, map.len())?;
                Ok(FileBuffer::mapped(map))
            }
            Self::Direct => {
                let mut bytes = retry.allocate(len)?.into_boxed_slice();
                let actual = fill(&mut file, &mut bytes).map_err(Error::io(path))?;
                check_len(path, len, actual)?;
                Ok(FileBuffer::fixed(bytes))
            }
            Self::RandomAccess => {
                let mut bytes = retry.allocate(len)?;
                let actual = if len == 0 {
                    0
                } else {
                    file.read(&mut bytes).map_err(Error::io(path))?
                };
                check_len(path, len, actual)?;
                Ok(FileBuffer::heap(bytes))
            }
            Self::Stream => {
                let mut bytes = retry.allocate(len)?;
                bytes.clear();
                let actual = BufReader::new(file)
                    .read_to_end(&mut bytes)
                    .map_err(Error::io(path))?;
                check_len(path, len, actual)?;
                Ok(FileBuffer::heap(bytes))
            }
        }
    }
}

impl fmt::Display for ReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

impl FromStr for ReadStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" | "normal_read" => Ok(Self::Normal),
            "mapped" | "mapped_read" => Ok(Self::Mapped),
            "direct" | "direct_read" => Ok(Self::Direct),
            "rfile" | "rfile_read" => Ok(Self::RandomAccess),
            "stream" | "stream_read" => Ok(Self::Stream),
            _ => Err(format!(
                "Invalid read strategy: '{s}'. Valid options are: normal, mapped, direct, rfile, stream"
            )),
        }
    }
}

fn file_len(file: &File, path: &Path) -> Result<usize> {
    let len = file.metadata().map_err(Error::io(path))?.len();

    usize::try_from(len).map_err(|_| Error::TooLarge {
        path: path.to_path_buf(),
        len,
    })
}

// Reads until the buffer is full or the file ends. Returns the number of bytes read.
fn fill(reader: &mut impl Read, buffer: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;

    while let Some(remaining) = buffer.get_mut(filled..) {
        if remaining.is_empty() {
            break;
        }

        match reader.read(remaining) {
            Ok(0) => break,
            Ok(n) => filled = filled.saturating_add(n),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}

fn check_len(path: &Path, expected: usize, actual: usize) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::ShortRead {
            path: path.to_path_buf(),
            expected,
            actual,
        })
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::io::Write;
    use std::num::NonZero;
    use std::time::Duration;

    use tempfile::NamedTempFile;

    use super::*;

    fn silent_timer() -> Timer {
        Timer::builder().echo(false).build()
    }

    fn retry() -> RetryPolicy {
        RetryPolicy::new(NonZero::new(1).unwrap(), Duration::ZERO)
    }

    fn temp_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn parses_short_and_event_names() {
        assert_eq!("direct".parse::<ReadStrategy>().unwrap(), ReadStrategy::Direct);
        assert_eq!("DIRECT_READ".parse::<ReadStrategy>().unwrap(), ReadStrategy::Direct);
        assert_eq!("Mapped".parse::<ReadStrategy>().unwrap(), ReadStrategy::Mapped);
        assert_eq!("rfile".parse::<ReadStrategy>().unwrap(), ReadStrategy::RandomAccess);
        assert_eq!("stream_read".parse::<ReadStrategy>().unwrap(), ReadStrategy::Stream);
        assert_eq!("normal".parse::<ReadStrategy>().unwrap(), ReadStrategy::Normal);

        let result = "heap".parse::<ReadStrategy>();
        assert!(result.unwrap_err().contains("Invalid read strategy"));
    }

    #[test]
    fn display_is_event_name() {
        assert_eq!(ReadStrategy::RandomAccess.to_string(), "RFILE_READ");
    }

    #[test]
    fn every_strategy_reads_whole_file() {
        let contents: Vec<u8> = (0..100_000_u32).map(|i| u8::try_from(i % 251).unwrap()).collect();
        let file = temp_file(&contents);
        let timer = silent_timer();

        for strategy in ReadStrategy::ALL {
            let buffer = strategy.read(file.path(), &timer, &retry()).unwrap();
            assert_eq!(&*buffer, contents.as_slice(), "{strategy}");
            assert_eq!(buffer.is_mapped(), strategy == ReadStrategy::Mapped);
        }

        for strategy in ReadStrategy::ALL {
            assert_eq!(
                timer.summary(strategy.event_name()).unwrap().count(),
                1,
                "{strategy}"
            );
        }
    }

    #[test]
    fn every_strategy_reads_empty_file() {
        let file = temp_file(&[]);
        let timer = silent_timer();

        for strategy in ReadStrategy::ALL {
            let buffer = strategy.read(file.path(), &timer, &retry()).unwrap();
            assert!(buffer.is_empty(), "{strategy}");
        }
    }

    #[test]
    fn missing_file_is_io_error_and_event_is_still_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.bin");
        let timer = silent_timer();

        let error = ReadStrategy::Direct
            .read(&path, &timer, &retry())
            .unwrap_err();

        assert!(matches!(error, Error::Io { .. }));
        assert_eq!(timer.depth(), 0);
        assert_eq!(timer.summary("DIRECT_READ").unwrap().count(), 1);
    }

    #[test]
    fn fill_stops_at_end_of_input() {
        let mut reader: &[u8] = &[1, 2, 3];
        let mut buffer = [0_u8; 5];

        let filled = fill(&mut reader, &mut buffer).unwrap();

        assert_eq!(filled, 3);
        assert_eq!(buffer, [1, 2, 3, 0, 0]);
    }

    #[test]
    fn check_len_rejects_short_read() {
        let error = check_len(Path::new("x"), 10, 9).unwrap_err();

        assert!(matches!(
            error,
            Error::ShortRead {
                expected: 10,
                actual: 9,
                ..
            }
        ));
    }
}
