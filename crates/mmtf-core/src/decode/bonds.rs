//! The bond list builder.
//!
//! A model's bond graph merges two sources: intra-residue bonds, defined
//! once per residue type and re-instantiated at each residue occurrence by
//! re-basing the type's slot indices onto the residue's cumulative atom
//! offset, and inter-residue bonds, indexed in the global all-models atom
//! space and sliced to the model's window. The union is not deduplicated;
//! duplicate edges from both sources are preserved as-is.

use super::error::DecodeError;
use super::groups::GroupTypeTable;
use super::length::{StructuralArrays, checked_count, model_layout};
use crate::core::models::bonds::{BondIndexError, BondList, BondOrder};
use crate::core::models::indices::{GlobalAtomIndex, ModelAtomIndex, ModelWindow};

/// Everything the builder reads while reconstructing one model's bonds.
#[derive(Debug, Clone, Copy)]
pub struct BondSource<'a> {
    pub table: &'a GroupTypeTable,
    pub structure: StructuralArrays<'a>,
    /// Flattened (a, b) pairs of global atom indices, when present.
    pub inter_bond_atoms: Option<&'a [i32]>,
    /// Bond orders matched to the pairs; absent orders decode as unknown.
    pub inter_bond_orders: Option<&'a [i32]>,
    /// The declared atom count of the whole file, bounding global indices.
    pub global_atom_count: usize,
}

/// Builds the merged bond list for the given 1-based model over its local
/// atom index space `[0, window.len())`.
///
/// # Errors
///
/// Fails if a bond endpoint falls outside the declared atom count bounds
/// (local for intra-residue bonds, global for inter-residue bonds), or if
/// the inter-residue arrays are malformed.
pub fn build_bond_list(
    model: usize,
    window: ModelWindow,
    source: &BondSource<'_>,
) -> Result<BondList, DecodeError> {
    let mut bonds = BondList::new(window.len());
    add_intra_bonds(model, source, &mut bonds)?;
    add_inter_bonds(window, source, &mut bonds)?;
    Ok(bonds)
}

/// Walks the model's residues in atom stream order, appending each type's
/// bonds re-based by the residue's atom offset within the model.
fn add_intra_bonds(
    model: usize,
    source: &BondSource<'_>,
    bonds: &mut BondList,
) -> Result<(), DecodeError> {
    let structure = &source.structure;
    let layout = model_layout(model, structure)?;
    let mut group = layout.first_group;
    let mut offset = ModelAtomIndex(0);

    for chain in layout.chains.clone() {
        let group_count = checked_count("groupsPerChain", structure.groups_per_chain[chain])?;
        for _ in 0..group_count {
            let type_id =
                *structure
                    .group_type_ids
                    .get(group)
                    .ok_or(DecodeError::ArrayLength {
                        key: "groupTypeList",
                        expected: group + 1,
                        actual: structure.group_type_ids.len(),
                    })?;
            let group_type = source.table.get(type_id)?;
            for bond in &group_type.bonds {
                let atom1 = bond.atom1.rebase(offset);
                let atom2 = bond.atom2.rebase(offset);
                bonds.push(atom1.0, atom2.0, bond.order)?;
            }
            offset = ModelAtomIndex(offset.0 + group_type.atom_count());
            group += 1;
        }
    }
    Ok(())
}

/// Slices the globally indexed bond list to the model's window, re-basing
/// both endpoints to local indices. Pairs with any endpoint outside the
/// window are skipped; endpoints outside the file's declared atom count
/// are a format error.
fn add_inter_bonds(
    window: ModelWindow,
    source: &BondSource<'_>,
    bonds: &mut BondList,
) -> Result<(), DecodeError> {
    let Some(pairs) = source.inter_bond_atoms else {
        return Ok(());
    };
    if pairs.len() % 2 != 0 {
        return Err(DecodeError::UnpairedBonds(pairs.len()));
    }
    if let Some(orders) = source.inter_bond_orders
        && orders.len() != pairs.len() / 2
    {
        return Err(DecodeError::ArrayLength {
            key: "bondOrderList",
            expected: pairs.len() / 2,
            actual: orders.len(),
        });
    }

    for (i, pair) in pairs.chunks_exact(2).enumerate() {
        let mut global = [GlobalAtomIndex(0); 2];
        for (endpoint, &raw) in global.iter_mut().zip(pair) {
            let index = usize::try_from(raw)
                .ok()
                .filter(|&i| i < source.global_atom_count)
                .ok_or(BondIndexError {
                    index: raw.max(0) as usize,
                    atom_count: source.global_atom_count,
                })?;
            *endpoint = GlobalAtomIndex(index);
        }
        let (Some(atom1), Some(atom2)) = (window.rebase(global[0]), window.rebase(global[1]))
        else {
            continue;
        };
        let order = source
            .inter_bond_orders
            .map(|orders| {
                i8::try_from(orders[i])
                    .map(BondOrder::from_order_number)
                    .unwrap_or(BondOrder::Unknown)
            })
            .unwrap_or(BondOrder::Unknown);
        bonds.push(atom1.0, atom2.0, order)?;
    }
    Ok(())
}
