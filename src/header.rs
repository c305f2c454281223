use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;

use bitstream::bytes_for_bits;
use bitstream::BitReader;
use bitstream::BitWriter;
use common::HuffError;
use common::Result;
use common::ALPHABET_SIZE;
use hufftree::Tree;
use log::*;

pub const MAGIC: &[u8; 4] = b"HFPK";
pub const FORMAT_VERSION: u8 = 1;

/// magic, version, symbol count
const FIXED_PREFIX_LEN: u64 = 4 + 1 + 4;
const BIT_COUNT_LEN: u64 = 8;

/// Everything a decoder needs besides the payload.
///
/// ```text
/// | magic "HFPK" | version u8 | symbols u32 LE | tree shape | bit count u64 LE |
/// ```
///
/// The tree shape is stored instead of the counts, so decoding doesn't depend on how the encoder
/// broke ties between equal counts.
#[derive(Debug)]
pub struct Header {
    pub tree: Tree,
    /// meaningful bits in the payload following the header
    pub bit_count: u64,
}

impl Header {
    /// size in bytes of a header for a tree with `num_symbols` leaves
    pub fn encoded_len(num_symbols: usize) -> u64 {
        FIXED_PREFIX_LEN + bytes_for_bits(Tree::shape_bit_count(num_symbols)) + BIT_COUNT_LEN
    }

    pub fn write<W: Write>(out: &mut W, tree: &Tree, bit_count: u64) -> Result<()> {
        let num_symbols = tree.get_num_symbol_nodes() as u32;
        out.write_all(MAGIC)?;
        out.write_all(&[FORMAT_VERSION])?;
        out.write_all(&num_symbols.to_le_bytes())?;

        let mut writer = BitWriter::new(&mut *out);
        tree.write_shape(&mut writer)?;
        writer.finish()?;

        out.write_all(&bit_count.to_le_bytes())?;
        Ok(())
    }

    /// Reads exactly the header bytes from `input`, the payload stays in the reader.
    pub fn read<R: Read>(input: &mut R) -> Result<Header> {
        let mut magic = [0_u8; 4];
        read_header_bytes(input, &mut magic)?;
        if &magic != MAGIC {
            return Err(HuffError::InvalidHeader("magic bytes don't match"));
        }

        let mut version = [0_u8; 1];
        read_header_bytes(input, &mut version)?;
        if version[0] != FORMAT_VERSION {
            return Err(HuffError::InvalidHeader("unsupported format version"));
        }

        let mut num_symbols = [0_u8; 4];
        read_header_bytes(input, &mut num_symbols)?;
        let num_symbols = u32::from_le_bytes(num_symbols) as usize;
        if num_symbols == 0 || num_symbols > ALPHABET_SIZE {
            return Err(HuffError::InvalidHeader("symbol count out of range"));
        }

        let shape_bits = Tree::shape_bit_count(num_symbols);
        let mut shape = vec![0_u8; bytes_for_bits(shape_bits) as usize];
        read_header_bytes(input, &mut shape)?;
        let mut reader = BitReader::new(&shape[..], shape_bits);
        let tree = Tree::read_shape(&mut reader, num_symbols)?;

        let mut bit_count = [0_u8; 8];
        read_header_bytes(input, &mut bit_count)?;
        let bit_count = u64::from_le_bytes(bit_count);

        debug!(
            "read header: {} symbols, {} payload bits",
            num_symbols, bit_count
        );
        Ok(Header { tree, bit_count })
    }
}

fn read_header_bytes<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<()> {
    input.read_exact(buf).map_err(|err| {
        if err.kind() == ErrorKind::UnexpectedEof {
            HuffError::InvalidHeader("header is truncated")
        } else {
            HuffError::Io(err)
        }
    })
}
