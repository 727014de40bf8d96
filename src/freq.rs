use std::collections::BTreeMap;

use log::trace;
use rayon::prelude::*;

use crate::config::Config;
use crate::error::{InvalidInput, Result};

/// Occurrence count per byte value, holding only the bytes actually seen.
pub type Frequencies = BTreeMap<u8, u64>;

/// One byte value fewer than 256, since zero is never a valid symbol.
pub const MAX_SYMBOLS: usize = u8::MAX as usize;

/// Counts every byte of `bytes`.
///
/// Zero bytes act as a terminator in the alphabet format and are rejected,
/// as is empty input.
pub fn count(bytes: &[u8], config: &Config) -> Result<Frequencies> {
    if bytes.is_empty() {
        return Err(InvalidInput::Empty.into());
    }
    if let Some(position) = bytes.iter().position(|&b| b == 0) {
        return Err(InvalidInput::EmbeddedNul { position }.into());
    }

    let counts = if bytes.len() > config.parallel_threshold {
        count_parallel(bytes, config.effective_chunk_size())
    } else {
        count_serial(bytes)
    };

    let freqs: Frequencies = counts
        .iter()
        .enumerate()
        .filter(|(_, &n)| n > 0)
        .map(|(byte, &n)| (byte as u8, n))
        .collect();

    if freqs.len() > MAX_SYMBOLS {
        return Err(InvalidInput::TooManySymbols(freqs.len()).into());
    }

    trace!("byte frequencies: {:?}", freqs);
    Ok(freqs)
}

fn count_serial(bytes: &[u8]) -> [u64; 256] {
    let mut counts = [0_u64; 256];
    bytes.iter().for_each(|&b| counts[b as usize] += 1);
    counts
}

fn count_parallel(bytes: &[u8], chunk_size: usize) -> [u64; 256] {
    bytes
        .par_chunks(chunk_size)
        .fold(
            || [0_u64; 256],
            |mut counts, chunk| {
                chunk.iter().for_each(|&b| counts[b as usize] += 1);
                counts
            },
        )
        .reduce(
            || [0_u64; 256],
            |mut a, b| {
                a.iter_mut().zip(b).for_each(|(x, y)| *x += y);
                a
            },
        )
}
