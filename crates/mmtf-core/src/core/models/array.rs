//! Columnar atom containers.
//!
//! Every annotation category is a flat array with one entry per atom row,
//! so a structure is a set of parallel columns plus a coordinate buffer.
//! Row selection is synchronized: selecting rows picks the same indices
//! from every column, the coordinates, and the bond list at once.

use super::bonds::BondList;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// Flags for the optional annotation columns a decode may populate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtraColumns {
    pub atom_id: bool,
    pub b_factor: bool,
    pub occupancy: bool,
    pub charge: bool,
}

/// The per-atom annotation columns shared by single-model arrays and
/// multi-model stacks.
///
/// Mandatory columns are always allocated; optional columns exist only when
/// requested at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationTable {
    len: usize,
    pub chain_id: Vec<String>,
    pub res_id: Vec<i32>,
    pub res_name: Vec<String>,
    pub hetero: Vec<bool>,
    pub atom_name: Vec<String>,
    pub element: Vec<String>,
    pub atom_id: Option<Vec<i32>>,
    pub b_factor: Option<Vec<f32>>,
    pub occupancy: Option<Vec<f32>>,
    pub charge: Option<Vec<i32>>,
}

impl AnnotationTable {
    pub fn new(len: usize, extras: ExtraColumns) -> Self {
        Self {
            len,
            chain_id: vec![String::new(); len],
            res_id: vec![0; len],
            res_name: vec![String::new(); len],
            hetero: vec![false; len],
            atom_name: vec![String::new(); len],
            element: vec![String::new(); len],
            atom_id: extras.atom_id.then(|| vec![0; len]),
            b_factor: extras.b_factor.then(|| vec![0.0; len]),
            occupancy: extras.occupancy.then(|| vec![0.0; len]),
            charge: extras.charge.then(|| vec![0; len]),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Picks the given rows from every column, in order.
    ///
    /// Rows must be valid indices below `len()`.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            len: rows.len(),
            chain_id: take(&self.chain_id, rows),
            res_id: take(&self.res_id, rows),
            res_name: take(&self.res_name, rows),
            hetero: take(&self.hetero, rows),
            atom_name: take(&self.atom_name, rows),
            element: take(&self.element, rows),
            atom_id: self.atom_id.as_deref().map(|col| take(col, rows)),
            b_factor: self.b_factor.as_deref().map(|col| take(col, rows)),
            occupancy: self.occupancy.as_deref().map(|col| take(col, rows)),
            charge: self.charge.as_deref().map(|col| take(col, rows)),
        }
    }
}

fn take<T: Clone>(column: &[T], rows: &[usize]) -> Vec<T> {
    rows.iter().map(|&row| column[row].clone()).collect()
}

/// A single-model structure: one annotation row and one coordinate per atom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomArray {
    pub annotations: AnnotationTable,
    pub coords: Vec<Point3<f32>>,
    pub bonds: Option<BondList>,
}

impl AtomArray {
    pub fn new(len: usize, extras: ExtraColumns) -> Self {
        Self {
            annotations: AnnotationTable::new(len, extras),
            coords: vec![Point3::origin(); len],
            bonds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Picks the given rows from the annotations, coordinates, and bond
    /// list simultaneously.
    pub fn select(&self, rows: &[usize]) -> Self {
        Self {
            annotations: self.annotations.select(rows),
            coords: take(&self.coords, rows),
            bonds: self.bonds.as_ref().map(|b| b.select(rows)),
        }
    }
}

/// A multi-model structure: a model-major coordinate stack over one shared
/// annotation table.
///
/// All models have identical topology; only coordinates differ per model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomArrayStack {
    model_count: usize,
    pub annotations: AnnotationTable,
    /// `model_count * len` points, model-major.
    pub coords: Vec<Point3<f32>>,
    pub bonds: Option<BondList>,
}

impl AtomArrayStack {
    pub fn new(model_count: usize, len: usize, extras: ExtraColumns) -> Self {
        Self {
            model_count,
            annotations: AnnotationTable::new(len, extras),
            coords: vec![Point3::origin(); model_count * len],
            bonds: None,
        }
    }

    pub fn model_count(&self) -> usize {
        self.model_count
    }

    /// The number of atoms per model.
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// The coordinate slice of one model, 0-based.
    pub fn model_coords(&self, model: usize) -> &[Point3<f32>] {
        let len = self.len();
        &self.coords[model * len..(model + 1) * len]
    }

    /// Picks the given atom rows from every column and from each model's
    /// coordinate slice.
    pub fn select(&self, rows: &[usize]) -> Self {
        let len = self.len();
        let mut coords = Vec::with_capacity(self.model_count * rows.len());
        for model in 0..self.model_count {
            let base = model * len;
            coords.extend(rows.iter().map(|&row| self.coords[base + row]));
        }
        Self {
            model_count: self.model_count,
            annotations: self.annotations.select(rows),
            coords,
            bonds: self.bonds.as_ref().map(|b| b.select(rows)),
        }
    }
}
