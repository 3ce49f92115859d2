//! Canonical Huffman tables.

use super::bits::BitReader;
use super::{
    HuffmanCodeOverflowSnafu, HuffmanTableTooLargeSnafu, InvalidHuffmanTableSnafu, Result,
};
use snafu::ensure;

/// The maximum number of symbols in a table.
pub const MAX_SYMBOLS: usize = 256;

/// A Huffman table as defined in a DHT segment,
/// with the canonical code assignment derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct HuffmanTable {
    /// table class, 0 for DC (lossless) and 1 for AC
    class: u8,
    /// table destination identifier, 0 to 3
    id: u8,
    /// number of codes of each length, from 1 to 16 bits
    counts: [u8; 16],
    /// symbols in order of increasing code length
    symbols: Vec<u8>,
    /// smallest code of each length, indexed by length
    mincode: [i32; 17],
    /// largest code of each length, or -1 if there are none
    maxcode: [i32; 17],
    /// index into `symbols` of the first code of each length
    valptr: [usize; 17],
}

/// The outcome of decoding one Huffman code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// A code was matched to this symbol.
    Symbol(u8),
    /// The bit stream ended in the middle of a code.
    EndOfData,
    /// No code of up to 16 bits matches the bits read.
    NoMatch,
}

impl HuffmanTable {
    /// Build the canonical code assignment
    /// from the code length counts and the symbols in order.
    ///
    /// Codes of each length are consecutive,
    /// and the first code of a length is
    /// the successor of the last code of the previous length,
    /// shifted left by one.
    pub fn new(class: u8, id: u8, counts: [u8; 16], symbols: Vec<u8>) -> Result<Self> {
        let total: usize = counts.iter().map(|&c| usize::from(c)).sum();
        ensure!(
            total <= MAX_SYMBOLS,
            HuffmanTableTooLargeSnafu { class, id, total }
        );
        ensure!(total == symbols.len(), InvalidHuffmanTableSnafu { class, id });

        let mut mincode = [0_i32; 17];
        let mut maxcode = [-1_i32; 17];
        let mut valptr = [0_usize; 17];

        let mut code: u32 = 0;
        let mut si = 0_usize;
        for len in 1..=16_usize {
            let count = u32::from(counts[len - 1]);
            if count > 0 {
                // all codes of this length must fit in `len` bits
                ensure!(
                    code + count <= 1 << len,
                    HuffmanCodeOverflowSnafu { class, id, length: len as u8 }
                );
                valptr[len] = si;
                mincode[len] = code as i32;
                code += count;
                si += count as usize;
                maxcode[len] = code as i32 - 1;
            }
            code <<= 1;
        }

        Ok(HuffmanTable {
            class,
            id,
            counts,
            symbols,
            mincode,
            maxcode,
            valptr,
        })
    }

    /// The table class (0 for DC, 1 for AC).
    pub fn class(&self) -> u8 {
        self.class
    }

    /// The table destination identifier.
    pub fn id(&self) -> u8 {
        self.id
    }

    /// The table's symbols, in code order.
    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    /// Read one code from the bit stream, one bit at a time,
    /// and translate it to its symbol.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Lookup {
        let mut code: i32 = 0;
        for len in 1..=16 {
            let bit = match reader.read_bit() {
                Some(bit) => bit,
                None => return Lookup::EndOfData,
            };
            code = (code << 1) | i32::from(bit);
            if code <= self.maxcode[len] {
                let index = self.valptr[len] + (code - self.mincode[len]) as usize;
                return Lookup::Symbol(self.symbols[index]);
            }
        }
        Lookup::NoMatch
    }
}
