/*!

Bitstream handles the writing and reading of single bits on top of byte streams.

Bits are packed most significant bit first, the first bit written lands in bit 7 of the first
byte. The last byte is padded with zero bits, so a stream is only meaningful together with its
exact bit count. The reader stops at that count and never looks at the padding.

Some bit hacks are appplied here, it can be helpful to understand these
Bit Operations:

number of bits  >> 3 == number of bytes
number of bits  & 7 == bits used in the last byte

*/

use std::io;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;

use common::HuffError;
use common::Result;
use common::BUFFER_SIZE;
use log::*;

/// number of bytes needed to hold `nb_bits` bits
#[inline]
pub fn bytes_for_bits(nb_bits: u64) -> u64 {
    (nb_bits >> 3) + ((nb_bits & 7) != 0) as u64
}

#[test]
fn test_bytes_for_bits() {
    assert_eq!(bytes_for_bits(0), 0);
    assert_eq!(bytes_for_bits(1), 1);
    assert_eq!(bytes_for_bits(8), 1);
    assert_eq!(bytes_for_bits(9), 2);
    assert_eq!(bytes_for_bits(64), 8);
}

/// Writes bits MSB first into `W`.
///
/// Full bytes are collected in an internal buffer and written in chunks of `BUFFER_SIZE`.
/// `finish` must be called to write the last partial byte.
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    inner: W,
    /// pending bits, aligned to the high end
    bit_container: u8,
    /// number of bits used in `bit_container`, always < 8 between calls
    bit_pos: u32,
    buffer: Vec<u8>,
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    pub fn new(inner: W) -> Self {
        BitWriter {
            inner,
            bit_container: 0,
            bit_pos: 0,
            buffer: Vec::with_capacity(BUFFER_SIZE),
            bits_written: 0,
        }
    }

    /// number of meaningful bits added so far
    #[inline]
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    #[inline]
    pub fn add_bit(&mut self, bit: bool) -> io::Result<()> {
        if bit {
            self.bit_container |= 0x80 >> self.bit_pos;
        }
        self.bit_pos += 1;
        self.bits_written += 1;
        if self.bit_pos == 8 {
            self.push_container()?;
        }
        Ok(())
    }

    /// adds the lowest `nb_bits` of `value`, the highest of them first.
    #[inline]
    pub fn add_bits(&mut self, value: u64, nb_bits: u32) -> io::Result<()> {
        debug_assert!(nb_bits <= 64);
        let mut remaining = nb_bits;
        while remaining > 0 {
            let free = 8 - self.bit_pos;
            let take = free.min(remaining);
            // the next `take` bits of value, counted from the top of the remaining bits
            let chunk = ((value >> (remaining - take)) & ((1_u64 << take) - 1)) as u8;
            self.bit_container |= chunk << (free - take);
            self.bit_pos += take;
            remaining -= take;
            if self.bit_pos == 8 {
                self.push_container()?;
            }
        }
        self.bits_written += nb_bits as u64;
        Ok(())
    }

    /// adds the first `nb_bits` of `packed`, which holds bits MSB first
    pub fn add_packed(&mut self, packed: &[u8], nb_bits: u32) -> io::Result<()> {
        debug_assert!(packed.len() * 8 >= nb_bits as usize);
        let full_bytes = (nb_bits >> 3) as usize;
        for byte in &packed[..full_bytes] {
            self.add_bits(*byte as u64, 8)?;
        }
        let rest = nb_bits & 7;
        if rest != 0 {
            self.add_bits((packed[full_bytes] >> (8 - rest)) as u64, rest)?;
        }
        Ok(())
    }

    #[inline]
    fn push_container(&mut self) -> io::Result<()> {
        self.buffer.push(self.bit_container);
        self.bit_container = 0;
        self.bit_pos = 0;
        if self.buffer.len() >= BUFFER_SIZE {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> io::Result<()> {
        self.inner.write_all(&self.buffer)?;
        self.buffer.clear();
        Ok(())
    }

    /// writes the last partial byte zero padded and returns the writer with the number of meaningful bits
    pub fn finish(mut self) -> io::Result<(W, u64)> {
        if self.bit_pos > 0 {
            let padding = 8 - self.bit_pos;
            trace!("padding last byte with {} bits", padding);
            self.push_container()?;
        }
        self.flush_buffer()?;
        self.inner.flush()?;
        Ok((self.inner, self.bits_written))
    }
}

/// Reads bits MSB first from `R`, exactly `bit_limit` of them.
///
/// Reads from `R` never go beyond the byte holding the last meaningful bit, so data following the
/// bitstream stays in the reader.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    inner: R,
    buffer: Vec<u8>,
    buffer_pos: usize,
    bytes_fetched: u64,
    bit_container: u8,
    /// bits not yet consumed from `bit_container`
    bits_available: u32,
    bits_consumed: u64,
    bit_limit: u64,
}

impl<R: Read> BitReader<R> {
    pub fn new(inner: R, bit_limit: u64) -> Self {
        BitReader {
            inner,
            buffer: Vec::new(),
            buffer_pos: 0,
            bytes_fetched: 0,
            bit_container: 0,
            bits_available: 0,
            bits_consumed: 0,
            bit_limit,
        }
    }

    #[inline]
    pub fn bits_consumed(&self) -> u64 {
        self.bits_consumed
    }

    #[inline]
    pub fn bits_remaining(&self) -> u64 {
        self.bit_limit - self.bits_consumed
    }

    /// returns the next bit, or None after `bit_limit` bits were read
    #[inline]
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_consumed == self.bit_limit {
            return Ok(None);
        }
        if self.bits_available == 0 {
            self.bit_container = self.next_byte()?;
            self.bits_available = 8;
        }
        self.bits_available -= 1;
        self.bits_consumed += 1;
        Ok(Some((self.bit_container >> self.bits_available) & 1 == 1))
    }

    /// reads `nb_bits` bits as a number, the first bit read is the highest
    pub fn read_bits(&mut self, nb_bits: u32) -> Result<u64> {
        debug_assert!(nb_bits <= 64);
        let mut value = 0_u64;
        for _ in 0..nb_bits {
            match self.read_bit()? {
                Some(bit) => value = (value << 1) | bit as u64,
                None => {
                    return Err(HuffError::corrupt(
                        self.bits_consumed,
                        "bit count exhausted in the middle of a value",
                    ))
                }
            }
        }
        Ok(value)
    }

    fn next_byte(&mut self) -> Result<u8> {
        if self.buffer_pos == self.buffer.len() {
            self.refill()?;
        }
        let byte = self.buffer[self.buffer_pos];
        self.buffer_pos += 1;
        Ok(byte)
    }

    fn refill(&mut self) -> Result<()> {
        let bytes_needed = bytes_for_bits(self.bit_limit) - self.bytes_fetched;
        let wanted = (BUFFER_SIZE as u64).min(bytes_needed) as usize;
        self.buffer.resize(wanted, 0);
        self.buffer_pos = 0;
        let bytes_read = loop {
            match self.inner.read(&mut self.buffer) {
                Ok(n) => break n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        if bytes_read == 0 {
            return Err(HuffError::corrupt(
                self.bits_consumed,
                "payload ends before the declared bit count",
            ));
        }
        self.buffer.truncate(bytes_read);
        self.bytes_fetched += bytes_read as u64;
        Ok(())
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all_bits(bits: &[bool]) -> (Vec<u8>, u64) {
        let mut writer = BitWriter::new(Vec::new());
        for bit in bits {
            writer.add_bit(*bit).unwrap();
        }
        writer.finish().unwrap()
    }

    #[test]
    fn test_msb_first_with_padding() {
        let (data, bits) = write_all_bits(&[true, false, true]);
        assert_eq!(bits, 3);
        assert_eq!(data, vec![0b1010_0000]);
    }

    #[test]
    fn test_full_bytes_no_padding_byte() {
        let (data, bits) = write_all_bits(&[true; 16]);
        assert_eq!(bits, 16);
        assert_eq!(data, vec![0xFF, 0xFF]);
    }

    #[test]
    fn test_empty_stream() {
        let (data, bits) = write_all_bits(&[]);
        assert_eq!(bits, 0);
        assert!(data.is_empty());

        let mut reader = BitReader::new(&data[..], 0);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_add_bits_across_byte_boundary() {
        let mut writer = BitWriter::new(Vec::new());
        writer.add_bits(0b101, 3).unwrap();
        writer.add_bits(0b1100_1100_11, 10).unwrap();
        writer.add_bits(u64::MAX, 64).unwrap();
        let (data, bits) = writer.finish().unwrap();
        assert_eq!(bits, 77);
        assert_eq!(data[0], 0b1011_1001);
        assert_eq!(data[1], 0b1001_1111);
        assert_eq!(data.len(), 10);
        assert_eq!(*data.last().unwrap(), 0b1111_1000);

        let mut reader = BitReader::new(&data[..], bits);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        assert_eq!(reader.read_bits(10).unwrap(), 0b1100_1100_11);
        assert_eq!(reader.read_bits(64).unwrap(), u64::MAX);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_add_packed() {
        let mut writer = BitWriter::new(Vec::new());
        writer.add_bit(true).unwrap();
        writer.add_packed(&[0b0101_0101, 0b1110_0000], 11).unwrap();
        let (data, bits) = writer.finish().unwrap();
        assert_eq!(bits, 12);
        assert_eq!(data, vec![0b1010_1010, 0b1111_0000]);
    }

    #[test]
    fn test_reader_stops_at_limit() {
        // the padding bits are ones here, they must never show up
        let data = [0b1111_1111_u8];
        let mut reader = BitReader::new(&data[..], 2);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        assert_eq!(reader.bits_remaining(), 0);
        assert_eq!(reader.read_bit().unwrap(), None);
        assert_eq!(reader.read_bit().unwrap(), None);
    }

    #[test]
    fn test_reader_leaves_trailing_data() {
        let data = [0b1000_0000_u8, 0xAB, 0xCD];
        let mut reader = BitReader::new(&data[..], 1);
        assert_eq!(reader.read_bit().unwrap(), Some(true));
        let mut rest = reader.into_inner();
        let mut tail = vec![];
        rest.read_to_end(&mut tail).unwrap();
        assert_eq!(tail, vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_truncated_payload() {
        let data = [0u8; 1];
        let mut reader = BitReader::new(&data[..], 12);
        assert_eq!(reader.read_bits(8).unwrap(), 0);
        match reader.read_bit() {
            Err(HuffError::CorruptStream { bit_pos, .. }) => assert_eq!(bit_pos, 8),
            other => panic!("expected corrupt stream, got {:?}", other),
        }
    }

    #[test]
    fn test_read_bits_past_limit() {
        let data = [0u8; 1];
        let mut reader = BitReader::new(&data[..], 4);
        assert!(matches!(
            reader.read_bits(5),
            Err(HuffError::CorruptStream { .. })
        ));
    }

    #[test]
    fn test_many_bytes_through_buffer() {
        let num_bits = (BUFFER_SIZE as u64 * 3) * 8 + 5;
        let mut writer = BitWriter::new(Vec::new());
        for i in 0..num_bits {
            writer.add_bit(i % 3 == 0).unwrap();
        }
        let (data, bits) = writer.finish().unwrap();
        assert_eq!(bits, num_bits);
        assert_eq!(data.len() as u64, bytes_for_bits(num_bits));

        let mut reader = BitReader::new(&data[..], bits);
        for i in 0..num_bits {
            assert_eq!(reader.read_bit().unwrap(), Some(i % 3 == 0));
        }
        assert_eq!(reader.read_bit().unwrap(), None);
    }
}
