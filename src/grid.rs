//! Bit assignment for component cells and fixed-width cell masks.
//!
//! Each cell of a component is given a bit index in row-major order, so a
//! shape becomes a [`CellMask`] and the overlap test between two shapes is a
//! handful of word ANDs. The width is fixed at [`MASK_CAPACITY`] bits; cells
//! past that bound get no bit and are tracked as overflow instead.

use rustc_hash::FxHashMap;

use crate::arena::Scratch;
use crate::shapes::Cell;

/// Number of distinct cells a mask can represent.
pub const MASK_CAPACITY: usize = 256;

const WORDS: usize = MASK_CAPACITY / 64;

/// A set of cell bit indices below [`MASK_CAPACITY`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellMask([u64; WORDS]);

impl CellMask {
    pub const EMPTY: CellMask = CellMask([0; WORDS]);

    #[inline(always)]
    pub fn insert(&mut self, bit: usize) {
        self.0[bit / 64] |= 1 << (bit % 64);
    }

    #[inline(always)]
    pub fn overlaps(&self, other: &CellMask) -> bool {
        self.0.iter().zip(&other.0).any(|(a, b)| a & b != 0)
    }

    #[inline(always)]
    pub fn union(&self, other: &CellMask) -> CellMask {
        let mut words = self.0;
        for (word, theirs) in words.iter_mut().zip(&other.0) {
            *word |= theirs;
        }
        CellMask(words)
    }

    /// Bits of `self` not in `other`.
    #[inline(always)]
    pub fn difference(&self, other: &CellMask) -> CellMask {
        let mut words = self.0;
        for (word, theirs) in words.iter_mut().zip(&other.0) {
            *word &= !theirs;
        }
        CellMask(words)
    }

    /// Number of cells in the mask.
    #[inline]
    pub fn count(&self) -> u32 {
        self.0.iter().map(|word| word.count_ones()).sum()
    }
}

/// A shape's cells split into mask bits and cells past the mask capacity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Footprint {
    pub mask: CellMask,
    pub overflow: Vec<Cell>,
}

impl Footprint {
    /// Whether the shape is fully representable as a mask.
    #[inline]
    pub fn is_exact(&self) -> bool {
        self.overflow.is_empty()
    }

    pub fn overlaps(&self, other: &Footprint) -> bool {
        self.mask.overlaps(&other.mask)
            || self
                .overflow
                .iter()
                .any(|cell| other.overflow.contains(cell))
    }
}

/// Maps the cells of one component to mask bit indices.
#[derive(Debug, Default)]
pub struct CellIndex {
    bits: FxHashMap<Cell, usize>,
    overflow: usize,
}

impl CellIndex {
    /// Assigns bits to `cells` in the given order, replacing any earlier assignment.
    ///
    /// Only the first [`MASK_CAPACITY`] cells receive a bit.
    pub fn assign(&mut self, cells: &[Cell]) {
        self.reset();
        for (bit, &cell) in cells.iter().take(MASK_CAPACITY).enumerate() {
            self.bits.insert(cell, bit);
        }
        self.overflow = cells.len().saturating_sub(MASK_CAPACITY);
    }

    #[inline]
    pub fn bit_of(&self, cell: Cell) -> Option<usize> {
        self.bits.get(&cell).copied()
    }

    /// Number of assigned cells that did not fit in the mask.
    #[inline]
    pub fn overflow(&self) -> usize {
        self.overflow
    }

    /// Splits `cells` into a mask and the cells without a bit.
    pub fn footprint(&self, cells: &[Cell]) -> Footprint {
        let mut footprint = Footprint::default();
        for &cell in cells {
            match self.bit_of(cell) {
                Some(bit) => footprint.mask.insert(bit),
                None => footprint.overflow.push(cell),
            }
        }
        footprint
    }
}

impl Scratch for CellIndex {
    fn reset(&mut self) {
        self.bits.clear();
        self.overflow = 0;
    }
}
