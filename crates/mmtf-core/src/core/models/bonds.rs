use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The order of a chemical bond, as the source format's small-integer
/// order column encodes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Quadruple,
    /// Order absent from the file or outside the 1-4 range.
    Unknown,
}

impl Default for BondOrder {
    fn default() -> Self {
        BondOrder::Single
    }
}

impl BondOrder {
    /// Maps a raw order number to a bond order; anything outside 1-4 is
    /// preserved as [`BondOrder::Unknown`].
    pub fn from_order_number(order: i8) -> Self {
        match order {
            1 => Self::Single,
            2 => Self::Double,
            3 => Self::Triple,
            4 => Self::Quadruple,
            _ => Self::Unknown,
        }
    }

    pub fn order_number(&self) -> Option<u8> {
        match self {
            Self::Single => Some(1),
            Self::Double => Some(2),
            Self::Triple => Some(3),
            Self::Quadruple => Some(4),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Quadruple => "Quadruple",
                Self::Unknown => "Unknown",
            }
        )
    }
}

/// An undirected edge between two atom rows of one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(atom1: usize, atom2: usize, order: BondOrder) -> Self {
        Self { atom1, atom2, order }
    }

    pub fn contains(&self, atom: usize) -> bool {
        self.atom1 == atom || self.atom2 == atom
    }
}

#[derive(Debug, Error)]
#[error("bond endpoint {index} out of range for {atom_count} atoms")]
pub struct BondIndexError {
    pub index: usize,
    pub atom_count: usize,
}

/// An undirected bond multigraph over a fixed number of atom rows.
///
/// Duplicate edges are preserved as-is; merging the per-residue and the
/// globally indexed bond sources must not collapse them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BondList {
    atom_count: usize,
    bonds: Vec<Bond>,
}

impl BondList {
    pub fn new(atom_count: usize) -> Self {
        Self {
            atom_count,
            bonds: Vec::new(),
        }
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }

    /// Appends an edge, validating both endpoints against the atom count.
    ///
    /// # Errors
    ///
    /// Returns a [`BondIndexError`] naming the offending endpoint if it is
    /// not below `atom_count`.
    pub fn push(&mut self, atom1: usize, atom2: usize, order: BondOrder) -> Result<(), BondIndexError> {
        for index in [atom1, atom2] {
            if index >= self.atom_count {
                return Err(BondIndexError {
                    index,
                    atom_count: self.atom_count,
                });
            }
        }
        self.bonds.push(Bond::new(atom1, atom2, order));
        Ok(())
    }

    /// Restricts the graph to the given atom rows, re-indexing endpoints to
    /// the new row numbering and dropping edges that touch a removed atom.
    pub fn select(&self, rows: &[usize]) -> Self {
        let mut remap = vec![None; self.atom_count];
        for (new, &old) in rows.iter().enumerate() {
            remap[old] = Some(new);
        }
        let bonds = self
            .bonds
            .iter()
            .filter_map(|bond| match (remap[bond.atom1], remap[bond.atom2]) {
                (Some(a), Some(b)) => Some(Bond::new(a, b, bond.order)),
                _ => None,
            })
            .collect();
        Self {
            atom_count: rows.len(),
            bonds,
        }
    }
}
