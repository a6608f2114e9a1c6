//! XOR checksums over file contents, each measured as a timer event.

use std::path::Path;

use nested_timer::Timer;

use crate::{ReadStrategy, Result, RetryPolicy};

/// Size of the scratch buffer used by [`xor_chunked()`].
pub const CHUNK_SIZE: usize = 65_535;

/// XOR of all bytes, measured as the `XOR` event.
///
/// # Errors
///
/// Fails only if the caller broke the timer start/stop protocol.
pub fn xor(timer: &Timer, data: &[u8]) -> Result<u8> {
    Ok(timer.measure("XOR", || xor_bytes(data))?)
}

/// XOR of all bytes, copied through a fixed-size scratch buffer one chunk at a time.
///
/// Measured as the `XOR3` event. Produces the same value as [`xor()`].
///
/// # Errors
///
/// Fails only if the caller broke the timer start/stop protocol.
pub fn xor_chunked(timer: &Timer, data: &[u8]) -> Result<u8> {
    Ok(timer.measure("XOR3", || xor_chunks(data))?)
}

/// Reads the file with the given strategy and returns the XOR of its bytes.
///
/// The read and the checksum are both measured, nested under one `XOR_TOTAL` event.
///
/// # Errors
///
/// Fails if the file cannot be read or if the timer start/stop protocol is broken.
pub fn xor_total(
    timer: &Timer,
    path: &Path,
    strategy: ReadStrategy,
    retry: &RetryPolicy,
) -> Result<u8> {
    timer.measure("XOR_TOTAL", || {
        let buffer = strategy.read(path, timer, retry)?;
        xor(timer, &buffer)
    })?
}

fn xor_bytes(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

fn xor_chunks(data: &[u8]) -> u8 {
    let mut scratch = vec![0_u8; CHUNK_SIZE];
    let mut checksum = 0;

    for chunk in data.chunks(CHUNK_SIZE) {
        let (head, _) = scratch.split_at_mut(chunk.len());
        head.copy_from_slice(chunk);
        checksum ^= xor_bytes(head);
    }

    checksum
}
