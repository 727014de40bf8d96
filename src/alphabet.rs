//! The serialized code table shipped next to compressed data.
//!
//! Layout: byte 0 holds the number of symbols, byte 1 the code width `w` in
//! bytes, then one `1 + w` byte record per symbol in ascending byte order:
//! the symbol followed by its code in the sentinel-terminated fixed-width
//! form of [`PrefixCode::to_fixed_width`].

use log::trace;

use crate::code::{self, CodeTable, PrefixCode};
use crate::error::{try_reserve, InvalidInput, MalformedAlphabet, Result};
use crate::tree::Tree;

const HEADER_LEN: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    width: u8,
    codes: CodeTable,
}

impl Alphabet {
    pub fn from_tree(tree: &Tree) -> Result<Self> {
        Ok(Self {
            width: code::code_width(tree.height())?,
            codes: tree.codes(),
        })
    }

    /// Bytes reserved for each code.
    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn codes(&self) -> &CodeTable {
        &self.codes
    }

    pub fn get(&self, symbol: u8) -> Option<&PrefixCode> {
        self.codes.get(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Size of the serialized block.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN + self.codes.len() * (1 + self.width as usize)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let count = u8::try_from(self.codes.len())
            .map_err(|_| InvalidInput::TooManySymbols(self.codes.len()))?;

        let mut block = Vec::new();
        try_reserve(&mut block, self.encoded_len())?;
        block.push(count);
        block.push(self.width);
        for (&symbol, code) in &self.codes {
            block.push(symbol);
            block.extend_from_slice(&code.to_fixed_width(self.width));
        }

        trace!("alphabet: {} symbols, width {}", count, self.width);
        Ok(block)
    }

    pub fn parse(block: &[u8]) -> Result<Self> {
        let [count, width, records @ ..] = block else {
            return Err(MalformedAlphabet::TooShort(block.len()).into());
        };
        if *count == 0 {
            return Err(MalformedAlphabet::NoSymbols.into());
        }
        if *width == 0 {
            return Err(MalformedAlphabet::ZeroWidth.into());
        }

        let period = 1 + *width as usize;
        let expected = HEADER_LEN + *count as usize * period;
        if block.len() != expected {
            return Err(MalformedAlphabet::LengthMismatch {
                expected,
                actual: block.len(),
            }
            .into());
        }

        let mut codes = CodeTable::new();
        for record in records.chunks_exact(period) {
            let symbol = record[0];
            let code = PrefixCode::from_fixed_width(&record[1..])
                .ok_or(MalformedAlphabet::UnterminatedCode(symbol))?;
            if code.is_empty() {
                return Err(MalformedAlphabet::EmptyCode(symbol).into());
            }
            if codes.insert(symbol, code).is_some() {
                return Err(MalformedAlphabet::DuplicateSymbol(symbol).into());
            }
        }

        let longest = codes.values().map(PrefixCode::len).max().unwrap_or(0);
        let needed = code::code_width(longest)?;
        if needed != *width {
            return Err(MalformedAlphabet::WidthMismatch {
                declared: *width,
                expected: needed,
            }
            .into());
        }

        Ok(Self {
            width: *width,
            codes,
        })
    }
}
