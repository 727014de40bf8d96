use std::fmt;

use derivative::Derivative;
use log::debug;

use crate::alphabet::Alphabet;
use crate::code::{self, CodeTable};
use crate::config::Config;
use crate::error::{try_reserve, InvalidInput, MalformedAlphabet, Result};
use crate::freq::{self, Frequencies, MAX_SYMBOLS};
use crate::heap::MinHeap;

/// Index of a node inside its tree's arena.
pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    symbol: u8,
    weight: u64,
    leaf: bool,
    left: Option<NodeId>,
    right: Option<NodeId>,
}

impl Node {
    fn leaf(symbol: u8, weight: u64) -> Self {
        Self {
            symbol,
            weight,
            leaf: true,
            left: None,
            right: None,
        }
    }

    fn from_children(weight: u64, left: NodeId, right: NodeId) -> Self {
        Self {
            symbol: 0,
            weight,
            leaf: false,
            left: Some(left),
            right: Some(right),
        }
    }

    // internal node of a restored tree, children attached later
    fn placeholder() -> Self {
        Self {
            symbol: 0,
            weight: 0,
            leaf: false,
            left: None,
            right: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.leaf
    }

    /// Meaningful only for leaves.
    pub fn symbol(&self) -> u8 {
        self.symbol
    }

    /// Sum of the leaf weights below this node; always zero in a restored
    /// tree.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// The left child for a `0` bit, the right child for a `1` bit.
    pub fn child(&self, bit: bool) -> Option<NodeId> {
        if bit {
            self.right
        } else {
            self.left
        }
    }

    fn set_child(&mut self, bit: bool, id: NodeId) {
        if bit {
            self.right = Some(id);
        } else {
            self.left = Some(id);
        }
    }

    fn children(&self) -> impl Iterator<Item = NodeId> {
        self.left.into_iter().chain(self.right)
    }
}

/// Heap entry ordered by weight alone.
#[derive(Debug, Derivative)]
#[derivative(PartialEq, Eq, PartialOrd, Ord)]
struct Pending {
    weight: u64,

    #[derivative(PartialEq = "ignore")]
    #[derivative(PartialOrd = "ignore")]
    #[derivative(Ord = "ignore")]
    node: NodeId,
}

/// Huffman tree stored as an arena of nodes.
///
/// A tree is either built from byte frequencies, in which case every node
/// carries its weight, or restored from an [`Alphabet`], in which case it
/// only has the shape needed for decoding.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
    restored: bool,
}

impl Tree {
    pub fn build(bytes: &[u8]) -> Result<Self> {
        Self::build_with(bytes, &Config::default())
    }

    pub fn build_with(bytes: &[u8], config: &Config) -> Result<Self> {
        let freqs = freq::count(bytes, config)?;
        Self::from_frequencies(&freqs)
    }

    /// Merges the two lightest nodes until one remains. Symbols with a zero
    /// count get no leaf.
    pub fn from_frequencies(freqs: &Frequencies) -> Result<Self> {
        let symbols = freqs.values().filter(|&&w| w > 0).count();
        if symbols == 0 {
            return Err(InvalidInput::Empty.into());
        }
        if symbols > MAX_SYMBOLS {
            return Err(InvalidInput::TooManySymbols(symbols).into());
        }

        let mut nodes = Vec::new();
        try_reserve(&mut nodes, 2 * symbols - 1)?;
        let mut heap = MinHeap::new()?;

        for (&symbol, &weight) in freqs.iter().filter(|(_, &w)| w > 0) {
            nodes.push(Node::leaf(symbol, weight));
            heap.insert(Pending {
                weight,
                node: nodes.len() - 1,
            })?;
        }
        debug_assert!(heap.is_heap());

        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.extract_min(), heap.extract_min()) else {
                break;
            };
            let weight = left.weight + right.weight;
            nodes.push(Node::from_children(weight, left.node, right.node));
            heap.insert(Pending {
                weight,
                node: nodes.len() - 1,
            })?;
            debug_assert!(heap.is_heap());
        }

        let root = heap.peek_min().map(|p| p.node).ok_or(InvalidInput::Empty)?;
        let tree = Self {
            nodes,
            root,
            restored: false,
        };
        debug!(
            "built tree: {} symbols, weight {}, height {}",
            symbols,
            tree.weight(),
            tree.height()
        );
        Ok(tree)
    }

    /// Rebuilds the decoding shape described by `alphabet`.
    ///
    /// Internal nodes get placeholder values; the result cannot report
    /// frequencies.
    pub fn restore(alphabet: &Alphabet) -> Result<Self> {
        let mut nodes = Vec::new();
        try_reserve(&mut nodes, 2 * alphabet.len())?;
        nodes.push(Node::placeholder());
        let root = 0;

        for (&symbol, code) in alphabet.codes() {
            let bits = code.bits();
            let Some(last) = bits.len().checked_sub(1) else {
                return Err(MalformedAlphabet::EmptyCode(symbol).into());
            };

            let mut at = root;
            for bit in bits[..last].iter().by_vals() {
                at = match nodes[at].child(bit) {
                    Some(next) if nodes[next].is_leaf() => {
                        return Err(MalformedAlphabet::PrefixConflict(symbol).into());
                    }
                    Some(next) => next,
                    None => {
                        nodes.push(Node::placeholder());
                        let next = nodes.len() - 1;
                        nodes[at].set_child(bit, next);
                        next
                    }
                };
            }

            let bit = bits[last];
            if nodes[at].child(bit).is_some() {
                return Err(MalformedAlphabet::PrefixConflict(symbol).into());
            }
            nodes.push(Node::leaf(symbol, 0));
            let leaf = nodes.len() - 1;
            nodes[at].set_child(bit, leaf);
        }

        Ok(Self {
            nodes,
            root,
            restored: true,
        })
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// # Panics
    ///
    /// If `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn is_restored(&self) -> bool {
        self.restored
    }

    pub fn symbol_count(&self) -> usize {
        self.leaves().count()
    }

    /// Root weight, equal to the length of the input the tree was built from.
    pub fn weight(&self) -> u64 {
        self.nodes[self.root].weight
    }

    /// Longest root-to-leaf path in edges; a lone leaf has height 0.
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack = vec![(self.root, 0)];
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(self.nodes[id].children().map(|c| (c, depth + 1)));
        }
        height
    }

    /// Leaf weights by symbol, or `None` for a restored tree.
    pub fn frequencies(&self) -> Option<Frequencies> {
        if self.restored {
            return None;
        }
        Some(self.leaves().map(|n| (n.symbol, n.weight)).collect())
    }

    pub fn codes(&self) -> CodeTable {
        code::generate(self)
    }

    /// Walks the tree over `bits`, emitting a symbol at every leaf.
    pub(crate) fn decode<I>(&self, bits: I, out: &mut Vec<u8>) -> Result<()>
    where
        I: Iterator<Item = bool>,
    {
        let mut at = self.root;
        for (offset, bit) in bits.enumerate() {
            let next = self.nodes[at]
                .child(bit)
                .ok_or(InvalidInput::UndecodableBits { offset })?;

            let node = &self.nodes[next];
            if node.is_leaf() {
                if out.len() == out.capacity() {
                    try_reserve(out, out.len().max(1))?;
                }
                out.push(node.symbol);
                at = self.root;
            } else {
                at = next;
            }
        }

        if at != self.root {
            return Err(InvalidInput::TruncatedCode.into());
        }
        Ok(())
    }

    fn leaves(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_leaf())
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize, label: &str) -> fmt::Result {
        let node = &self.nodes[id];
        let indent = "  ".repeat(depth);
        if node.is_leaf() {
            return writeln!(
                f,
                "{}{} -> '{}' [weight: {}]",
                indent,
                label,
                char::from(node.symbol).escape_default(),
                node.weight
            );
        }

        writeln!(f, "{}{} [weight: {}]", indent, label, node.weight)?;
        if let Some(left) = node.left {
            self.fmt_node(f, left, depth + 1, "L")?;
        }
        if let Some(right) = node.right {
            self.fmt_node(f, right, depth + 1, "R")?;
        }
        Ok(())
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root, 0, "root")
    }
}
