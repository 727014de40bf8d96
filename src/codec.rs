use bitvec::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::alphabet::Alphabet;
use crate::config::Config;
use crate::error::{try_reserve, InvalidInput, Result};
use crate::tree::Tree;

const INITIAL_OUTPUT_CAPACITY: usize = 128;

/// Output of [`compress`]: the packed bit stream, its exact length in bits,
/// and the alphabet block needed to decode it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Compressed {
    pub data: Vec<u8>,
    pub bit_length: u64,
    pub alphabet: Vec<u8>,
    pub original_length: u64,
}

impl Compressed {
    pub fn decompress(&self) -> Result<Vec<u8>> {
        let out = decompress(&self.data, self.bit_length, &self.alphabet)?;
        if out.len() as u64 != self.original_length {
            return Err(InvalidInput::LengthMismatch {
                expected: self.original_length,
                actual: out.len() as u64,
            }
            .into());
        }
        Ok(out)
    }

    /// Original size over packed size.
    pub fn ratio(&self) -> f64 {
        self.original_length as f64 / self.data.len() as f64
    }

    /// Like [`Compressed::ratio`], but charging the alphabet block to the
    /// packed size.
    pub fn ratio_with_alphabet(&self) -> f64 {
        self.original_length as f64 / (self.data.len() + self.alphabet.len()) as f64
    }
}

pub fn compress(bytes: &[u8]) -> Result<Compressed> {
    compress_with(bytes, &Config::default())
}

/// Replaces every byte with its code, packing codes MSB first. The trailing
/// partial byte is zero padded.
pub fn compress_with(bytes: &[u8], config: &Config) -> Result<Compressed> {
    let tree = Tree::build_with(bytes, config)?;
    let alphabet = Alphabet::from_tree(&tree)?;
    let block = alphabet.to_bytes()?;

    let total_bits: u64 = tree
        .frequencies()
        .unwrap_or_default()
        .iter()
        .map(|(sym, &n)| n * alphabet.get(*sym).map_or(0, |c| c.len() as u64))
        .sum();

    let mut buf = Vec::new();
    try_reserve(&mut buf, total_bits.div_ceil(8) as usize)?;
    let mut stream = BitVec::<u8, Msb0>::from_vec(buf);

    for &byte in bytes {
        let code = alphabet.get(byte).ok_or(InvalidInput::UnknownSymbol(byte))?;
        stream.extend_from_bitslice(code.bits());
    }

    let bit_length = stream.len() as u64;
    stream.set_uninitialized(false);
    let data = stream.into_vec();

    debug!(
        "compressed {} bytes into {} bits ({} bytes), alphabet {} bytes",
        bytes.len(),
        bit_length,
        data.len(),
        block.len()
    );

    Ok(Compressed {
        data,
        bit_length,
        alphabet: block,
        original_length: bytes.len() as u64,
    })
}

/// Decodes the first `bit_length` bits of `data` with the tree restored
/// from `alphabet`.
///
/// An alphabet that did not come from the same [`compress`] call yields
/// either an error or unrelated bytes.
pub fn decompress(data: &[u8], bit_length: u64, alphabet: &[u8]) -> Result<Vec<u8>> {
    let available = data.len() as u64 * 8;
    if bit_length > available {
        return Err(InvalidInput::BitLengthOutOfRange {
            bit_length,
            available,
        }
        .into());
    }

    let alphabet = Alphabet::parse(alphabet)?;
    let tree = Tree::restore(&alphabet)?;

    let bits = &data.view_bits::<Msb0>()[..bit_length as usize];
    let mut out = Vec::new();
    try_reserve(&mut out, INITIAL_OUTPUT_CAPACITY)?;
    tree.decode(bits.iter().by_vals(), &mut out)?;
    out.shrink_to_fit();

    debug!("decompressed {} bits into {} bytes", bit_length, out.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, MalformedAlphabet};

    const LOREM: &[u8] = b"Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do \
        eiusmod tempor incididunt ut labore et dolore magna aliqua. Ut enim ad minim veniam, \
        quis nostrud exercitation ullamco laboris nisi ut aliquip ex ea commodo consequat. Duis \
        aute irure dolor in reprehenderit in voluptate velit esse cillum dolore eu fugiat nulla \
        pariatur. Excepteur sint occaecat cupidatat non proident, sunt in culpa qui officia \
        deserunt mollit anim id est laborum.";

    fn round_trip(s: &[u8]) -> Vec<u8> {
        let c = compress(s).unwrap();
        decompress(&c.data, c.bit_length, &c.alphabet).unwrap()
    }

    #[test]
    fn test_encode_decode() {
        for s in [
            LOREM,
            b"abcdefghijklmnopqrstuvwxyz",
            b"abababababababab",
            b"cdadbcdd",
            b"caedbeabedceac",
            b"This is a really long message, I sure do hope it encodes and decodes properly.",
        ] {
            assert_eq!(round_trip(s), s);
        }
    }

    // small LCG so the inputs are reproducible without extra crates
    fn generated_inputs(count: usize) -> Vec<Vec<u8>> {
        let mut state = 0x9e37_79b9_u64;
        let mut next = move || {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            state >> 33
        };

        (0..count)
            .map(|_| {
                let len = 1 + (next() % 300) as usize;
                let alphabet = 1 + next() % 255;
                // squaring skews the distribution so code lengths vary
                (0..len)
                    .map(|_| {
                        let r = next() % alphabet;
                        (1 + r * r / alphabet) as u8
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn generated_inputs_round_trip() {
        for s in generated_inputs(400) {
            let c = compress(&s).unwrap();
            assert_eq!(c.decompress().unwrap(), s);

            let tree = Tree::build(&s).unwrap();
            assert!(tree.height() <= tree.symbol_count() - 1);

            let codes = tree.codes();
            for (a, ca) in &codes {
                for (b, cb) in &codes {
                    if a != b {
                        assert!(!ca.is_prefix_of(cb), "{} prefixes {}", ca, cb);
                    }
                }
            }
        }
    }

    #[test]
    fn abcd() {
        let c = compress(b"abcd").unwrap();

        assert_eq!(c.bit_length, 8);
        assert_eq!(c.data.len(), 1);
        assert_eq!(c.decompress().unwrap(), b"abcd");
    }

    #[test]
    fn two_symbols() {
        let c = compress(b"ab").unwrap();

        assert_eq!(c.bit_length, 2);
        assert_eq!(c.data, vec![0b0100_0000]);
        assert_eq!(round_trip(b"ab"), b"ab");
    }

    #[test]
    fn single_symbol() {
        let c = compress(b"aaaa").unwrap();

        assert_eq!(c.bit_length, 4);
        assert_eq!(c.data, vec![0]);
        assert_eq!(c.alphabet, vec![1, 1, b'a', 0b0100_0000]);
        assert_eq!(c.decompress().unwrap(), b"aaaa");
    }

    #[test]
    fn every_nonzero_byte() {
        let mut text: Vec<u8> = (1..=255).collect();
        text.extend((1..=255u8).rev().step_by(3));

        let c = compress(&text).unwrap();
        assert_eq!(c.alphabet[0], 255);
        assert_eq!(c.decompress().unwrap(), text);
    }

    #[test]
    fn long_codes_cross_byte_boundaries() {
        let text: Vec<u8> = (0..17u32)
            .flat_map(|i| std::iter::repeat(b'A' + i as u8).take(1 << i))
            .collect();

        let c = compress(&text).unwrap();
        assert_eq!(c.alphabet[1], 3);
        assert_eq!(c.decompress().unwrap(), text);
    }

    #[test]
    fn parallel_counting_gives_same_output() {
        let text = LOREM.repeat(4);
        let parallel = Config::new().with_parallel_threshold(0).with_chunk_size(100);

        assert_eq!(compress(&text).unwrap(), compress_with(&text, &parallel).unwrap());
    }

    #[test]
    fn deterministic() {
        assert_eq!(compress(LOREM).unwrap(), compress(LOREM).unwrap());
    }

    #[test]
    fn shrinks_text() {
        let c = compress(LOREM).unwrap();

        assert_eq!(c.data.len() as u64, c.bit_length.div_ceil(8));
        assert!(c.ratio() > 1.0);
        assert!(c.ratio_with_alphabet() < c.ratio());
    }

    #[test]
    fn padding_bits_are_zero() {
        let c = compress(b"cdadbcdd").unwrap();
        let bits = c.data.view_bits::<Msb0>();

        assert!(bits[c.bit_length as usize..].not_any());
    }

    #[test]
    fn rejects_empty_and_nul() {
        assert_eq!(compress(b"").unwrap_err(), Error::InvalidInput(InvalidInput::Empty));
        assert_eq!(
            compress(b"a\0b").unwrap_err(),
            Error::InvalidInput(InvalidInput::EmbeddedNul { position: 1 })
        );
    }

    #[test]
    fn rejects_overlong_bit_length() {
        let c = compress(b"cdadbcdd").unwrap();
        let err = decompress(&c.data, c.data.len() as u64 * 8 + 1, &c.alphabet).unwrap_err();

        assert!(matches!(
            err,
            Error::InvalidInput(InvalidInput::BitLengthOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_code_without_sentinel() {
        let err = decompress(&[0b1010_1010], 8, &[1, 1, b'a', 0]).unwrap_err();

        assert_eq!(err, Error::MalformedAlphabet(MalformedAlphabet::UnterminatedCode(b'a')));
    }

    #[test]
    fn small_crafted_alphabets_never_panic() {
        for code in 0..=u8::MAX {
            let _ = decompress(&[0b1011_0010], 8, &[1, 1, b'a', code]);
            for other in 0..=u8::MAX {
                let _ = decompress(&[0b1011_0010], 8, &[2, 1, b'a', code, b'b', other]);
            }
        }
    }

    #[test]
    fn rejects_conflicting_alphabet() {
        // "0" and "01": the first code is a prefix of the second
        let block = [2, 1, b'a', 0b0100_0000, b'b', 0b0110_0000];
        let err = decompress(&[0], 1, &block).unwrap_err();

        assert_eq!(err, Error::MalformedAlphabet(MalformedAlphabet::PrefixConflict(b'b')));
    }

    #[test]
    fn mismatched_length_is_reported() {
        let mut c = compress(b"abcd").unwrap();
        c.original_length = 5;

        assert_eq!(
            c.decompress().unwrap_err(),
            Error::InvalidInput(InvalidInput::LengthMismatch {
                expected: 5,
                actual: 4
            })
        );
    }

    #[test]
    fn msgpack_round_trip() {
        let c = compress(LOREM).unwrap();

        let packed = rmp_serde::to_vec(&c).unwrap();
        let unpacked: Compressed = rmp_serde::from_slice(&packed).unwrap();

        assert_eq!(unpacked, c);
        assert_eq!(unpacked.decompress().unwrap(), LOREM);
    }
}
