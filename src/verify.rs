use std::io;
use std::io::ErrorKind;
use std::io::Read;

use common::Result;
use common::BUFFER_SIZE;
use log::*;

use crate::compress::compress;
use crate::decompress::decompress;

/// Byte for byte comparison, lengths are compared first.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.chunks(BUFFER_SIZE)
        .zip(b.chunks(BUFFER_SIZE))
        .all(|(chunk_a, chunk_b)| chunk_a == chunk_b)
}

/// Reads both streams to EOF in chunks and compares them. Streams of different length are not
/// equal.
pub fn streams_equal<A: Read, B: Read>(mut a: A, mut b: B) -> io::Result<bool> {
    let mut buf_a = [0_u8; BUFFER_SIZE];
    let mut buf_b = [0_u8; BUFFER_SIZE];
    loop {
        let len_a = fill(&mut a, &mut buf_a)?;
        let len_b = fill(&mut b, &mut buf_b)?;
        if len_a != len_b || buf_a[..len_a] != buf_b[..len_b] {
            return Ok(false);
        }
        if len_a == 0 {
            return Ok(true);
        }
    }
}

/// Reads until `buf` is full or the reader is at EOF, so short reads of either side don't show up
/// as a difference.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Compresses and decompresses `input` and checks the result is identical.
pub fn verify_round_trip(input: &[u8]) -> Result<bool> {
    let compressed = compress(input)?;
    let decompressed = decompress(&compressed)?;
    let equal = bytes_equal(input, &decompressed);
    if !equal {
        warn!(
            "round trip mismatch: {} bytes in, {} bytes out",
            input.len(),
            decompressed.len()
        );
    }
    Ok(equal)
}
