use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;

use bitstream::bytes_for_bits;
use bitstream::BitWriter;
use common::FrequencyTable;
use common::HuffError;
use common::Result;
use common::BUFFER_SIZE;
use hufftree::build_tree;
use hufftree::CodeTable;
use log::*;

use crate::header::Header;

/// Code bits of one input, the last byte is zero padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream {
    pub data: Vec<u8>,
    /// number of meaningful bits in `data`
    pub bit_count: u64,
}

/// Sizes of one compressed input, for callers that want to report them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressInfo {
    pub original_len: u64,
    pub bit_count: u64,
    /// header and payload
    pub compressed_len: u64,
}

#[inline]
fn encode_symbols<W: Write>(input: &[u8], table: &CodeTable, writer: &mut BitWriter<W>) -> Result<()> {
    for &symbol in input {
        let code = table
            .get(symbol)
            .ok_or(HuffError::SymbolNotInTable(symbol))?;
        writer.add_packed(code.as_packed(), code.len())?;
    }
    Ok(())
}

/// Replaces every byte with its code.
pub fn encode_bytes(input: &[u8], table: &CodeTable) -> Result<EncodedStream> {
    let mut data = Vec::new();
    data.try_reserve(input.len())?;
    let mut writer = BitWriter::new(data);
    encode_symbols(input, table, &mut writer)?;
    let (data, bit_count) = writer.finish()?;
    Ok(EncodedStream { data, bit_count })
}

/// Encodes everything `input` yields into `output` and returns the number of meaningful bits.
pub fn write_encoded<R: Read, W: Write>(mut input: R, output: W, table: &CodeTable) -> Result<u64> {
    let mut writer = BitWriter::new(output);
    let mut buffer = [0_u8; BUFFER_SIZE];
    loop {
        let bytes_read = match input.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        encode_symbols(&buffer[..bytes_read], table, &mut writer)?;
    }
    let (_, bit_count) = writer.finish()?;
    Ok(bit_count)
}

/// Compresses `input` into a self describing container, see [`Header`].
///
/// Empty input fails with `HuffError::EmptyInput`.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    let counts = FrequencyTable::from_bytes(input);
    let tree = build_tree(&counts)?;
    let table = CodeTable::from_tree(&tree);
    let bit_count = table.encoded_bit_count(&counts);

    let mut out = Vec::new();
    out.try_reserve((Header::encoded_len(counts.num_symbols()) + bytes_for_bits(bit_count)) as usize)?;
    Header::write(&mut out, &tree, bit_count)?;

    let mut writer = BitWriter::new(out);
    encode_symbols(input, &table, &mut writer)?;
    let (out, bits_written) = writer.finish()?;
    debug_assert_eq!(bits_written, bit_count);

    debug!(
        "compressed {} bytes into {} bytes ({} payload bits)",
        input.len(),
        out.len(),
        bit_count
    );
    Ok(out)
}

/// Compresses `input` from its current position to EOF into `output`.
///
/// Reads the input twice, first to count and then, after seeking back, to encode. The header
/// goes out before the payload, its bit count is computed from the counts.
pub fn compress_stream<R: Read + Seek, W: Write>(mut input: R, mut output: W) -> Result<CompressInfo> {
    let start = input.seek(SeekFrom::Current(0))?;
    let counts = FrequencyTable::from_reader(&mut input)?;
    let tree = build_tree(&counts)?;
    let table = CodeTable::from_tree(&tree);
    let bit_count = table.encoded_bit_count(&counts);

    Header::write(&mut output, &tree, bit_count)?;

    input.seek(SeekFrom::Start(start))?;
    let bits_written = write_encoded((&mut input).take(counts.total()), &mut output, &table)?;
    if bits_written != bit_count {
        return Err(HuffError::Io(io::Error::new(
            ErrorKind::InvalidData,
            "input changed between counting and encoding",
        )));
    }

    let info = CompressInfo {
        original_len: counts.total(),
        bit_count,
        compressed_len: Header::encoded_len(counts.num_symbols()) + bytes_for_bits(bit_count),
    };
    debug!("{:?}", info);
    Ok(info)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hufftree::build_tree;
    use std::io::Cursor;

    fn table_for(data: &[u8]) -> CodeTable {
        CodeTable::from_tree(&build_tree(&FrequencyTable::from_bytes(data)).unwrap())
    }

    #[test]
    fn test_encode_single_symbol() {
        let encoded = encode_bytes(b"aaa", &table_for(b"aaa")).unwrap();
        assert_eq!(encoded.bit_count, 3);
        assert_eq!(encoded.data, vec![0b0000_0000]);
    }

    #[test]
    fn test_encode_bits_msb_first() {
        let table = table_for(b"AAABBC");
        let encoded = encode_bytes(b"AAABBC", &table).unwrap();
        assert_eq!(encoded.bit_count, 9);
        assert_eq!(encoded.data.len(), 2);

        let mut expected = String::new();
        for symbol in b"AAABBC" {
            expected.push_str(&table.get(*symbol).unwrap().to_string());
        }
        let actual: String = encoded
            .data
            .iter()
            .map(|byte| format!("{:08b}", byte))
            .collect();
        assert_eq!(&actual[..9], expected);
        // padding
        assert_eq!(&actual[9..], "0000000");
    }

    #[test]
    fn test_symbol_not_in_table() {
        let table = table_for(b"abc");
        assert!(matches!(
            encode_bytes(b"abcd", &table),
            Err(HuffError::SymbolNotInTable(b'd'))
        ));
    }

    #[test]
    fn test_writer_matches_slice() {
        let data = include_bytes!("../test_data/lorem_10k.txt");
        let table = table_for(data);
        let encoded = encode_bytes(data, &table).unwrap();

        let mut out = vec![];
        let bits = write_encoded(&data[..], &mut out, &table).unwrap();
        assert_eq!(bits, encoded.bit_count);
        assert_eq!(out, encoded.data);
    }

    #[test]
    fn test_compress_empty() {
        assert!(matches!(compress(&[]), Err(HuffError::EmptyInput)));
        let mut out = vec![];
        assert!(matches!(
            compress_stream(Cursor::new(vec![]), &mut out),
            Err(HuffError::EmptyInput)
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn test_stream_matches_slice() {
        let data = include_bytes!("../test_data/records_json.txt");
        let mut out = vec![];
        let info = compress_stream(Cursor::new(&data[..]), &mut out).unwrap();
        assert_eq!(out, compress(data).unwrap());
        assert_eq!(info.original_len, data.len() as u64);
        assert_eq!(info.compressed_len, out.len() as u64);
        assert!(info.compressed_len < info.original_len);
    }

    #[test]
    fn test_stream_starts_at_current_position() {
        let mut input = Cursor::new(b"skip-me:payload payload".to_vec());
        input.set_position(8);
        let mut out = vec![];
        compress_stream(&mut input, &mut out).unwrap();
        assert_eq!(out, compress(b"payload payload").unwrap());
    }
}
