mod error;

use std::io::ErrorKind;
use std::io::Read;

pub use error::HuffError;
pub use error::Result;
use log::*;

pub const MAX_SYMBOL_VALUE: u32 = u8::MAX as u32;
pub const ALPHABET_SIZE: usize = MAX_SYMBOL_VALUE as usize + 1;

/// Chunk size for all reads and writes on byte streams
pub const BUFFER_SIZE: usize = 4096;

/// Inputs shorter than this are counted with `count_simple`
const MULTI_COUNT_THRESHOLD: usize = 1024;

pub type CountsTable = [u64; ALPHABET_SIZE];

/// creates a table with the counts of each symbol
#[inline]
pub fn count_simple(input: &[u8]) -> CountsTable {
    let mut counts = [0_u64; ALPHABET_SIZE];

    for byte in input {
        counts[*byte as usize] += 1;
    }
    counts
}

/// creates a table with the counts of each symbol
///
/// Spreads the increments over four tables, so consecutive equal bytes don't stall on the same
/// counter.
#[inline]
pub fn count_multi(input: &[u8]) -> CountsTable {
    let mut counts1 = [0_u64; ALPHABET_SIZE];
    let mut counts2 = [0_u64; ALPHABET_SIZE];
    let mut counts3 = [0_u64; ALPHABET_SIZE];
    let mut counts4 = [0_u64; ALPHABET_SIZE];

    let mut iter = input.chunks_exact(8);
    for chunks in &mut iter {
        counts1[chunks[0] as usize] += 1;
        counts2[chunks[1] as usize] += 1;
        counts3[chunks[2] as usize] += 1;
        counts4[chunks[3] as usize] += 1;
        counts1[chunks[4] as usize] += 1;
        counts2[chunks[5] as usize] += 1;
        counts3[chunks[6] as usize] += 1;
        counts4[chunks[7] as usize] += 1;
    }

    for el in iter.remainder() {
        counts1[*el as usize] += 1;
    }

    let iter = counts1
        .iter_mut()
        .zip(counts2.iter().zip(counts3.iter().zip(counts4.iter())));

    for (el1, (el2, (el3, el4))) in iter {
        *el1 += *el2 + *el3 + *el4;
    }

    counts1
}

/// Occurrence count of every byte value in one input.
///
/// The sum of all counts equals the input length. There is no way to change a table after it
/// was created, a new input needs a new table.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: CountsTable,
    total: u64,
}

impl FrequencyTable {
    pub fn from_bytes(input: &[u8]) -> Self {
        let counts = if input.len() < MULTI_COUNT_THRESHOLD {
            count_simple(input)
        } else {
            count_multi(input)
        };
        FrequencyTable {
            counts,
            total: input.len() as u64,
        }
    }

    /// Counts all bytes until EOF.
    ///
    /// On a read error the partial counts are dropped and the error is returned.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut counts = [0_u64; ALPHABET_SIZE];
        let mut total = 0_u64;
        let mut buffer = [0_u8; BUFFER_SIZE];
        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            };
            for byte in &buffer[..bytes_read] {
                counts[*byte as usize] += 1;
            }
            total += bytes_read as u64;
        }
        debug!("counted {} bytes from reader", total);
        Ok(FrequencyTable { counts, total })
    }

    /// Creates a table from raw counts, the total is derived from them.
    pub fn from_counts(counts: CountsTable) -> Self {
        let total = counts.iter().sum();
        FrequencyTable { counts, total }
    }

    #[inline]
    pub fn count(&self, symbol: u8) -> u64 {
        self.counts[symbol as usize]
    }

    pub fn counts(&self) -> &CountsTable {
        &self.counts
    }

    /// number of bytes counted
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// number of distinct symbols with a count > 0
    pub fn num_symbols(&self) -> usize {
        self.counts.iter().filter(|count| **count != 0).count()
    }

    /// all symbols with a count > 0, ascending by symbol value
    pub fn symbols(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, count)| **count != 0)
            .map(|(symbol, count)| (symbol as u8, *count))
    }

    /// highest symbol value with a count > 0, None for an empty table
    pub fn max_symbol_value(&self) -> Option<u8> {
        self.counts
            .iter()
            .rposition(|count| *count != 0)
            .map(|pos| pos as u8)
    }
}

impl core::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FrequencyTable")
            .field("total", &self.total)
            .field("symbols", &self.symbols().collect::<Vec<_>>())
            .finish()
    }
}
