use common::FrequencyTable;
use common::ALPHABET_SIZE;
use log::Level::Trace;
use log::*;

use crate::tree::Tree;
use crate::MAX_CODE_LENGTH;

const CODE_BYTES: usize = (MAX_CODE_LENGTH + 1) / 8;

/// The path from the root to a leaf, 0 for left and 1 for right.
///
/// Bits are kept in order, packed MSB first. A code is a sequence, not a number: `0` and `00` are
/// different codes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: [u8; CODE_BYTES],
    number_bits: u8,
}

impl Default for Code {
    fn default() -> Self {
        Code {
            bits: [0; CODE_BYTES],
            number_bits: 0,
        }
    }
}

impl Code {
    #[inline]
    pub fn len(&self) -> u32 {
        self.number_bits as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.number_bits == 0
    }

    #[inline]
    pub fn bit(&self, pos: u32) -> bool {
        debug_assert!(pos < self.len());
        (self.bits[(pos >> 3) as usize] >> (7 - (pos & 7))) & 1 == 1
    }

    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |pos| self.bit(pos))
    }

    /// the used bytes, MSB first, the unused low bits of the last byte are 0
    #[inline]
    pub fn as_packed(&self) -> &[u8] {
        &self.bits[..(self.len() as usize + 7) / 8]
    }

    /// returns a copy with one more bit at the end
    #[inline]
    pub fn with_bit(mut self, bit: bool) -> Self {
        debug_assert!((self.number_bits as usize) < MAX_CODE_LENGTH);
        if bit {
            let pos = self.number_bits as usize;
            self.bits[pos >> 3] |= 0x80 >> (pos & 7);
        }
        self.number_bits += 1;
        self
    }

    /// true if all bits of `self` are the first bits of `other`, including `self == other`
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len() <= other.len() && self.bits().zip(other.bits()).all(|(a, b)| a == b)
    }
}

impl core::fmt::Display for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Code {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!(
            "Code{{ bits:{} number_bits:{} }}",
            self, self.number_bits
        ))
    }
}

/// symbol to code, symbols that are not in the tree have no code
#[derive(Clone)]
pub struct CodeTable {
    codes: [Option<Code>; ALPHABET_SIZE],
}

impl CodeTable {
    /// Walks the tree depth first and records the path to every leaf.
    ///
    /// A tree with a single leaf has no edges, its symbol gets the code `0` so every occurence
    /// still costs one bit and the bit count stays meaningful.
    pub fn from_tree(tree: &Tree) -> Self {
        let mut codes = [None; ALPHABET_SIZE];

        if tree.is_single_leaf() {
            if let Some(symbol) = tree.get_root_node().symbol {
                codes[symbol as usize] = Some(Code::default().with_bit(false));
            }
        } else {
            tree.walk_tree(&mut |node, code| {
                if let Some(symbol) = node.symbol {
                    codes[symbol as usize] = Some(*code);
                }
            });
        }

        let table = CodeTable { codes };
        debug!(
            "generated {} codes, max code length {}",
            table.len(),
            table.max_code_length()
        );
        if log_enabled!(Trace) {
            for (symbol, code) in table.iter() {
                trace!("{:#04x}: {}", symbol, code);
            }
        }
        table
    }

    #[inline]
    pub fn get(&self, symbol: u8) -> Option<&Code> {
        self.codes[symbol as usize].as_ref()
    }

    /// all symbols with a code, ascending by symbol
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(symbol, code)| code.as_ref().map(|code| (symbol as u8, code)))
    }

    /// number of symbols with a code
    pub fn len(&self) -> usize {
        self.codes.iter().filter(|code| code.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_code_length(&self) -> u32 {
        self.iter().map(|(_, code)| code.len()).max().unwrap_or(0)
    }

    /// Exact number of bits needed to encode the input `counts` was built from.
    ///
    /// Symbols without a code are ignored, they can't be encoded anyway.
    pub fn encoded_bit_count(&self, counts: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(symbol, code)| counts.count(symbol) * code.len() as u64)
            .sum()
    }
}

impl core::fmt::Debug for CodeTable {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// panics if any code is the prefix of another code
pub fn test_prefix_property(table: &CodeTable) {
    let codes: Vec<(u8, &Code)> = table.iter().collect();
    for (symbol, code) in &codes {
        assert!(!code.is_empty(), "empty code for symbol {}", symbol);
        for (other_symbol, other_code) in &codes {
            if symbol != other_symbol && code.is_prefix_of(other_code) {
                panic!(
                    "invalid prefix detected between {} {:?} and {} {:?}",
                    symbol, code, other_symbol, other_code
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_tree;

    fn code(bits: &str) -> Code {
        bits.chars()
            .fold(Code::default(), |code, c| code.with_bit(c == '1'))
    }

    #[test]
    fn test_code_bits() {
        let c = code("1011001");
        assert_eq!(c.len(), 7);
        assert_eq!(c.to_string(), "1011001");
        assert_eq!(c.as_packed(), &[0b1011_0010]);
        assert!(c.bit(0));
        assert!(!c.bit(1));
    }

    #[test]
    fn test_leading_zeros_matter() {
        assert_ne!(code("0"), code("00"));
        assert!(code("0").is_prefix_of(&code("00")));
        assert!(!code("00").is_prefix_of(&code("0")));
        assert!(!code("01").is_prefix_of(&code("00")));
    }

    #[test]
    fn test_max_length_code() {
        let c = (0..MAX_CODE_LENGTH).fold(Code::default(), |code, i| code.with_bit(i % 2 == 0));
        assert_eq!(c.len() as usize, MAX_CODE_LENGTH);
        assert_eq!(c.as_packed().len(), 32);
        assert!(c.bit(254));
        assert!(!c.bit(253));
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let counts = FrequencyTable::from_bytes(b"aaa");
        let tree = build_tree(&counts).unwrap();
        let table = CodeTable::from_tree(&tree);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(b'a').unwrap().to_string(), "0");
        assert_eq!(table.encoded_bit_count(&counts), 3);
    }

    #[test]
    fn test_frequent_symbols_get_shorter_codes() {
        let counts = FrequencyTable::from_bytes(b"AAABBC");
        let tree = build_tree(&counts).unwrap();
        let table = CodeTable::from_tree(&tree);
        test_prefix_property(&table);

        let len_a = table.get(b'A').unwrap().len() as u64;
        let len_b = table.get(b'B').unwrap().len() as u64;
        let len_c = table.get(b'C').unwrap().len() as u64;
        assert!(len_a <= len_b);
        assert!(len_b <= len_c);
        assert_eq!(
            table.encoded_bit_count(&counts),
            3 * len_a + 2 * len_b + len_c
        );
        // optimal for this distribution
        assert_eq!(table.encoded_bit_count(&counts), 9);
        assert!(table.get(b'D').is_none());
    }

    #[test]
    #[should_panic(expected = "invalid prefix")]
    fn test_prefix_property_detects_violation() {
        let mut codes = [None; ALPHABET_SIZE];
        codes[1] = Some(code("01"));
        codes[2] = Some(code("011"));
        test_prefix_property(&CodeTable { codes });
    }
}
