//! Huffman coding over byte strings.
//!
//! [`compress`] packs the input into a bit stream and returns it together
//! with an alphabet block, a compact code table from which [`decompress`]
//! rebuilds a decoding tree. Inputs may not be empty and may not contain a
//! zero byte.
//!
//! ```
//! let packed = huffcode::compress(b"abracadabra")?;
//! let unpacked = huffcode::decompress(&packed.data, packed.bit_length, &packed.alphabet)?;
//! assert_eq!(unpacked, b"abracadabra");
//! # Ok::<(), huffcode::Error>(())
//! ```

pub mod alphabet;
pub mod code;
pub mod codec;
pub mod config;
pub mod error;
pub mod freq;
pub mod tree;

mod heap;

pub use alphabet::Alphabet;
pub use code::{CodeTable, PrefixCode};
pub use codec::{compress, compress_with, decompress, Compressed};
pub use config::Config;
pub use error::{Error, InvalidInput, MalformedAlphabet, Result};
pub use freq::Frequencies;
pub use tree::{Node, NodeId, Tree};

pub fn build_tree(bytes: &[u8]) -> Result<Tree> {
    Tree::build(bytes)
}

pub fn build_tree_with(bytes: &[u8], config: &Config) -> Result<Tree> {
    Tree::build_with(bytes, config)
}

/// Leaf weights of `tree`; `None` if it was restored from an alphabet.
pub fn frequencies(tree: &Tree) -> Option<Frequencies> {
    tree.frequencies()
}

pub fn codes(tree: &Tree) -> CodeTable {
    tree.codes()
}

pub fn height(tree: &Tree) -> usize {
    tree.height()
}
