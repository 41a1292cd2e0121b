//! Shared-prefix storage for move histories.
//!
//! The search keeps many states alive whose histories differ only in their
//! last few moves, so storing a full move vector per state would make the
//! frontier memory quadratic in the number of expansions. Instead every
//! state holds a [`Sequence`] handle: a two-word value containing the tail
//! of its history inline plus a reference into a chain of full blocks owned
//! by the [`Trie`]. Copying a state copies the handle, not the history.

use std::mem::size_of;
use std::num::NonZeroU32;

use crate::graph::Color;

/// Reference to a full block stored in a [`Trie`], 1-based so that
/// `Option<BlockRef>` still fits in four bytes.
type BlockRef = NonZeroU32;

/// Elements stored inline per block, sized so a [`Block`] occupies exactly
/// two machine words.
const BLOCK_LEN: usize =
    (2 * size_of::<usize>() - size_of::<Option<BlockRef>>() - size_of::<u16>()) / size_of::<Color>();

#[derive(Clone, Copy)]
struct Block {
    /// Chain of predecessors, each full with `BLOCK_LEN` elements.
    pred: Option<BlockRef>,
    /// Length of the sequence including all predecessors.
    len: u16,
    data: [Color; BLOCK_LEN],
}

const _: () = assert!(size_of::<Block>() == 2 * size_of::<usize>());

impl Block {
    fn empty() -> Self {
        Self {
            pred: None,
            len: 0,
            data: [0; BLOCK_LEN],
        }
    }

    /// Fresh block chained onto a just-filled predecessor, carrying the
    /// total length but no local elements yet.
    fn chained(pred: BlockRef, len: u16) -> Self {
        Self {
            pred: Some(pred),
            len,
            data: [0; BLOCK_LEN],
        }
    }

    /// Appends in place. Returns true if the block just became full.
    fn push(&mut self, element: Color) -> bool {
        let index = self.len as usize % BLOCK_LEN;
        self.data[index] = element;
        self.len += 1;
        index == BLOCK_LEN - 1
    }
}

/// Handle denoting one immutable sequence of colors inside a [`Trie`].
///
/// Handles are cheap to copy and never invalidated: appending through the
/// trie yields a new handle while every existing one keeps denoting the
/// sequence it was created for.
#[derive(Clone, Copy)]
pub struct Sequence {
    block: Block,
}

impl Sequence {
    /// Number of elements in the sequence.
    pub fn len(&self) -> usize {
        self.block.len as usize
    }

    /// True for the sequence returned by [`Trie::initial`].
    pub fn is_empty(&self) -> bool {
        self.block.len == 0
    }
}

/// Owner of all full history blocks produced during one search.
///
/// Blocks are addressed by index, so the backing vector may grow and
/// reallocate freely without disturbing outstanding [`Sequence`] handles.
#[derive(Default)]
pub struct Trie {
    blocks: Vec<Block>,
}

impl Trie {
    /// An empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for the empty sequence.
    pub fn initial() -> Sequence {
        Sequence {
            block: Block::empty(),
        }
    }

    /// Appends `element` to `sequence`, returning the extended sequence.
    ///
    /// The given handle stays valid and still denotes the unextended
    /// sequence, which is what lets sibling states branch off a shared
    /// prefix.
    pub fn append(&mut self, mut sequence: Sequence, element: Color) -> Sequence {
        debug_assert!(sequence.block.len < u16::MAX, "sequence length exhausted");

        if sequence.block.push(element) {
            self.blocks.push(sequence.block);
            let pred = BlockRef::new(self.blocks.len() as u32).unwrap();
            Sequence {
                block: Block::chained(pred, sequence.block.len),
            }
        } else {
            sequence
        }
    }

    /// Last element of a non-empty sequence.
    pub fn last(&self, sequence: &Sequence) -> Color {
        let block = &sequence.block;
        debug_assert!(block.len > 0, "empty sequence has no last element");

        let index = (block.len as usize - 1) % BLOCK_LEN;
        if index != BLOCK_LEN - 1 {
            block.data[index]
        } else {
            // A freshly chained handle holds no local elements; its last
            // element is the final slot of the predecessor.
            self.block(block.pred.unwrap()).data[BLOCK_LEN - 1]
        }
    }

    /// Copies the sequence into `out`, which must hold exactly
    /// [`len`](Sequence::len) elements.
    pub fn materialize_into(&self, sequence: &Sequence, out: &mut [Color]) {
        assert_eq!(out.len(), sequence.len());

        let mut block = &sequence.block;
        loop {
            let len = block.len as usize;
            if len == 0 {
                break;
            }
            // A freshly chained block claims a full range here; the copy is
            // harmless because its predecessor owns the same range and
            // overwrites it below.
            let local = (len - 1) % BLOCK_LEN + 1;
            out[len - local..len].copy_from_slice(&block.data[..local]);
            match block.pred {
                Some(pred) => block = self.block(pred),
                None => break,
            }
        }
    }

    /// Like [`materialize_into`](Trie::materialize_into), allocating the
    /// output vector.
    pub fn materialize(&self, sequence: &Sequence) -> Vec<Color> {
        let mut out = vec![0; sequence.len()];
        self.materialize_into(sequence, &mut out);
        out
    }

    fn block(&self, reference: BlockRef) -> &Block {
        &self.blocks[reference.get() as usize - 1]
    }
}
