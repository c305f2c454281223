use std::io::Read;
use std::io::Write;

use bitstream::bytes_for_bits;
use bitstream::BitReader;
use common::HuffError;
use common::Result;
use common::BUFFER_SIZE;
use hufftree::Tree;
use log::*;

use crate::header::Header;

/// Walks `tree` bit by bit, `0` goes left and `1` goes right. Every leaf reached emits its symbol
/// and restarts at the root.
///
/// A tree with a single leaf has the code `0` for that leaf, a `1` bit is corrupt.
fn decode_symbols<R, F>(reader: &mut BitReader<R>, tree: &Tree, mut emit: F) -> Result<()>
where
    R: Read,
    F: FnMut(u8) -> Result<()>,
{
    let root = tree.get_root_node();
    if tree.is_single_leaf() {
        let symbol = root.symbol().unwrap_or_default();
        while let Some(bit) = reader.read_bit()? {
            if bit {
                return Err(HuffError::corrupt(
                    reader.bits_consumed() - 1,
                    "no code starts with 1 in a single symbol tree",
                ));
            }
            emit(symbol)?;
        }
        return Ok(());
    }

    let mut node = root;
    while let Some(bit) = reader.read_bit()? {
        let next = if bit { node.right() } else { node.left() };
        let next = next.ok_or_else(|| {
            HuffError::corrupt(reader.bits_consumed() - 1, "bit leads out of the tree")
        })?;
        node = tree.get_node(next);
        if let Some(symbol) = node.symbol() {
            emit(symbol)?;
            node = root;
        }
    }
    if !std::ptr::eq(node, root) {
        return Err(HuffError::corrupt(
            reader.bits_consumed(),
            "stream ends inside a code",
        ));
    }
    Ok(())
}

/// Decodes the first `bit_count` bits of `data`.
pub fn decode_bits(data: &[u8], tree: &Tree, bit_count: u64) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    // every code has at least one bit
    out.try_reserve((bit_count as usize).min(data.len().saturating_mul(8)))?;
    let mut reader = BitReader::new(data, bit_count);
    decode_symbols(&mut reader, tree, |symbol| {
        out.push(symbol);
        Ok(())
    })?;
    Ok(out)
}

/// Decodes `bit_count` bits from `input` into `output`, returns the number of bytes written.
pub fn read_decoded<R: Read, W: Write>(
    input: R,
    mut output: W,
    tree: &Tree,
    bit_count: u64,
) -> Result<u64> {
    let mut reader = BitReader::new(input, bit_count);
    let mut buffer = Vec::with_capacity(BUFFER_SIZE);
    let mut bytes_written = 0_u64;
    decode_symbols(&mut reader, tree, |symbol| {
        buffer.push(symbol);
        if buffer.len() == BUFFER_SIZE {
            output.write_all(&buffer)?;
            bytes_written += buffer.len() as u64;
            buffer.clear();
        }
        Ok(())
    })?;
    output.write_all(&buffer)?;
    bytes_written += buffer.len() as u64;
    output.flush()?;
    Ok(bytes_written)
}

/// Decompresses a container produced by [`compress`](crate::compress).
pub fn decompress(input: &[u8]) -> Result<Vec<u8>> {
    let mut rest = input;
    let header = Header::read(&mut rest)?;
    let payload_len = bytes_for_bits(header.bit_count);
    if (rest.len() as u64) < payload_len {
        return Err(HuffError::corrupt(
            rest.len() as u64 * 8,
            "payload ends before the declared bit count",
        ));
    }
    if (rest.len() as u64) > payload_len {
        return Err(HuffError::corrupt(
            header.bit_count,
            "trailing bytes after the payload",
        ));
    }
    let out = decode_bits(rest, &header.tree, header.bit_count)?;
    debug!(
        "decompressed {} bytes into {} bytes",
        input.len(),
        out.len()
    );
    Ok(out)
}

/// Decompresses one container from `input` into `output`, returns the number of bytes written.
///
/// Only the container is read from `input`, anything after it stays in the reader.
pub fn decompress_stream<R: Read, W: Write>(mut input: R, output: W) -> Result<u64> {
    let header = Header::read(&mut input)?;
    let bytes_written = read_decoded(&mut input, output, &header.tree, header.bit_count)?;
    debug!(
        "decompressed {} payload bits into {} bytes",
        header.bit_count, bytes_written
    );
    Ok(bytes_written)
}
