//! Tagged atom index types.
//!
//! Bond endpoints and atom positions are translated between three distinct
//! numbering spaces at different pipeline stages. Keeping each space as its
//! own type makes every translation an explicit call instead of silent
//! integer arithmetic.

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// An atom slot within one residue type, in `[0, atom_count_of_type)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeAtomIndex(pub usize);

/// An atom position within one model, in `[0, model_atom_count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelAtomIndex(pub usize);

/// An atom position within the whole multiplexed per-model atom stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GlobalAtomIndex(pub usize);

impl TypeAtomIndex {
    /// Re-bases a slot index by a residue instance's atom offset within
    /// the model.
    pub fn rebase(self, offset: ModelAtomIndex) -> ModelAtomIndex {
        ModelAtomIndex(offset.0 + self.0)
    }
}

/// One model's contiguous atom range in the global stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelWindow {
    pub start: GlobalAtomIndex,
    pub stop: GlobalAtomIndex,
}

impl ModelWindow {
    pub fn new(start: usize, atom_count: usize) -> Self {
        Self {
            start: GlobalAtomIndex(start),
            stop: GlobalAtomIndex(start + atom_count),
        }
    }

    pub fn len(&self) -> usize {
        self.stop.0 - self.start.0
    }

    pub fn is_empty(&self) -> bool {
        self.stop.0 == self.start.0
    }

    pub fn contains(&self, index: GlobalAtomIndex) -> bool {
        index >= self.start && index < self.stop
    }

    /// Translates a global index into the model's local space, or `None`
    /// if it falls outside the window.
    pub fn rebase(&self, index: GlobalAtomIndex) -> Option<ModelAtomIndex> {
        self.contains(index).then(|| ModelAtomIndex(index.0 - self.start.0))
    }

    pub fn range(&self) -> Range<usize> {
        self.start.0..self.stop.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_index_rebases_onto_model_offset() {
        let slot = TypeAtomIndex(2);
        assert_eq!(slot.rebase(ModelAtomIndex(10)), ModelAtomIndex(12));
    }

    #[test]
    fn window_contains_its_half_open_range() {
        let window = ModelWindow::new(3, 4);
        assert!(!window.contains(GlobalAtomIndex(2)));
        assert!(window.contains(GlobalAtomIndex(3)));
        assert!(window.contains(GlobalAtomIndex(6)));
        assert!(!window.contains(GlobalAtomIndex(7)));
        assert_eq!(window.len(), 4);
    }

    #[test]
    fn window_rebase_translates_or_rejects() {
        let window = ModelWindow::new(5, 2);
        assert_eq!(window.rebase(GlobalAtomIndex(5)), Some(ModelAtomIndex(0)));
        assert_eq!(window.rebase(GlobalAtomIndex(6)), Some(ModelAtomIndex(1)));
        assert_eq!(window.rebase(GlobalAtomIndex(7)), None);
        assert_eq!(window.rebase(GlobalAtomIndex(0)), None);
    }

    #[test]
    fn window_range_matches_slice_bounds() {
        let window = ModelWindow::new(4, 3);
        assert_eq!(window.range(), 4..7);
        let data = [0, 1, 2, 3, 4, 5, 6, 7];
        assert_eq!(&data[window.range()], &[4, 5, 6]);
    }
}
