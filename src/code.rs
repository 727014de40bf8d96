//! Prefix codes and their derivation from a tree.

use std::collections::BTreeMap;
use std::fmt;

use bitvec::prelude::*;

use crate::error::{InvalidInput, Result};
use crate::tree::Tree;

/// Code assigned to each symbol, keyed by byte value.
pub type CodeTable = BTreeMap<u8, PrefixCode>;

/// Bit path from the root of a tree to a leaf: `0` for left, `1` for right.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PrefixCode {
    bits: BitVec<u8, Msb0>,
}

impl PrefixCode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        Self {
            bits: bits.to_bitvec(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn bits(&self) -> &BitSlice<u8, Msb0> {
        &self.bits
    }

    /// The code one level further down, leaving `self` untouched.
    pub fn child(&self, bit: bool) -> Self {
        let mut bits = self.bits.clone();
        bits.push(bit);
        Self { bits }
    }

    pub fn is_prefix_of(&self, other: &PrefixCode) -> bool {
        other.bits.starts_with(self.bits.as_bitslice())
    }

    /// Lays the code out in `width` bytes, MSB first, followed by a single
    /// set sentinel bit; every bit after the sentinel is zero.
    ///
    /// The code must be shorter than `width * 8` bits.
    pub fn to_fixed_width(&self, width: u8) -> Vec<u8> {
        let len = self.bits.len();
        debug_assert!(len < width as usize * 8);

        let mut buf = bitvec![u8, Msb0; 0; width as usize * 8];
        buf[..len].copy_from_bitslice(self.bits.as_bitslice());
        buf.set(len, true);
        buf.into_vec()
    }

    /// Recovers a code from its fixed-width form by locating the last set
    /// bit. Returns `None` when no sentinel is present.
    pub fn from_fixed_width(buf: &[u8]) -> Option<Self> {
        let bits = buf.view_bits::<Msb0>();
        // last_one overflows on an all-zero Msb0 slice
        if bits.not_any() {
            return None;
        }
        let sentinel = bits.last_one()?;
        Some(Self::from_bits(&bits[..sentinel]))
    }
}

impl fmt::Display for PrefixCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits.iter().by_vals() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Bytes needed to hold any code of a tree of the given height plus its
/// sentinel.
pub fn code_width(height: usize) -> Result<u8> {
    u8::try_from(height / 8 + 1).map_err(|_| InvalidInput::WidthOverflow(height).into())
}

/// Walks `tree` depth first, giving every leaf the path that reaches it.
///
/// A tree made of a single leaf has no edges; that leaf gets the code `0`.
pub fn generate(tree: &Tree) -> CodeTable {
    let mut table = CodeTable::new();

    let root = tree.node(tree.root());
    if root.is_leaf() {
        table.insert(root.symbol(), PrefixCode::new().child(false));
        return table;
    }

    let mut stack = vec![(tree.root(), PrefixCode::new())];
    while let Some((id, path)) = stack.pop() {
        let node = tree.node(id);
        if node.is_leaf() {
            table.insert(node.symbol(), path);
            continue;
        }

        if let Some(right) = node.right() {
            stack.push((right, path.child(true)));
        }
        if let Some(left) = node.left() {
            stack.push((left, path.child(false)));
        }
    }

    table
}
