//! Per-model atom counts and offsets.
//!
//! A model is a contiguous run of chains, each chain a contiguous run of
//! residues, and a residue's atom count comes from its type. This module is
//! the single source of truth for "how many atoms does model M have" and,
//! by summation over preceding models, for where model M starts in the
//! global atom stream.

use super::error::DecodeError;
use super::groups::GroupTypeTable;
use crate::core::models::indices::ModelWindow;
use std::ops::Range;

/// The structural count arrays shared by every stage that walks a model.
#[derive(Debug, Clone, Copy)]
pub struct StructuralArrays<'a> {
    /// Chains belonging to each model, in model order.
    pub chains_per_model: &'a [i32],
    /// Residues belonging to each chain, across all models.
    pub groups_per_chain: &'a [i32],
    /// Per-residue type id, across all models.
    pub group_type_ids: &'a [i32],
    /// Per-residue instance id, across all models.
    pub group_ids: &'a [i32],
}

/// Where a model's chains and residues sit in the global count arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ModelLayout {
    /// The model's chain indices into `groups_per_chain` / chain names.
    pub chains: Range<usize>,
    /// The model's first residue index into the per-residue arrays.
    pub first_group: usize,
}

pub(crate) fn checked_count(key: &'static str, value: i32) -> Result<usize, DecodeError> {
    usize::try_from(value).map_err(|_| DecodeError::NegativeValue { key, value })
}

pub(crate) fn model_layout(
    model: usize,
    structure: &StructuralArrays<'_>,
) -> Result<ModelLayout, DecodeError> {
    let model_count = structure.chains_per_model.len();
    if model == 0 || model > model_count {
        return Err(DecodeError::ModelOutOfRange {
            model,
            count: model_count,
        });
    }

    let mut chain_start = 0usize;
    for &chains in &structure.chains_per_model[..model - 1] {
        chain_start += checked_count("chainsPerModel", chains)?;
    }
    let chain_stop = chain_start + checked_count("chainsPerModel", structure.chains_per_model[model - 1])?;
    if structure.groups_per_chain.len() < chain_stop {
        return Err(DecodeError::ArrayLength {
            key: "groupsPerChain",
            expected: chain_stop,
            actual: structure.groups_per_chain.len(),
        });
    }

    let mut first_group = 0usize;
    for &groups in &structure.groups_per_chain[..chain_start] {
        first_group += checked_count("groupsPerChain", groups)?;
    }

    Ok(ModelLayout {
        chains: chain_start..chain_stop,
        first_group,
    })
}

/// Computes the atom count of the given 1-based model.
///
/// # Errors
///
/// Fails if the model index is out of range, the count arrays are shorter
/// than the walk requires, or a residue references an unknown type id.
pub fn model_length(
    model: usize,
    structure: &StructuralArrays<'_>,
    table: &GroupTypeTable,
) -> Result<usize, DecodeError> {
    let layout = model_layout(model, structure)?;
    let mut group = layout.first_group;
    let mut atoms = 0usize;
    for chain in layout.chains.clone() {
        let group_count = checked_count("groupsPerChain", structure.groups_per_chain[chain])?;
        for _ in 0..group_count {
            let type_id = *structure.group_type_ids.get(group).ok_or(
                DecodeError::ArrayLength {
                    key: "groupTypeList",
                    expected: group + 1,
                    actual: structure.group_type_ids.len(),
                },
            )?;
            atoms += table.atom_count(type_id)?;
            group += 1;
        }
    }
    Ok(atoms)
}

/// Computes the given model's atom window in the global stream by summing
/// the lengths of all preceding models.
///
/// Quadratic in the model count, which is small in practice; keeping the
/// length calculator as the only counting code path wins over caching.
pub fn model_window(
    model: usize,
    structure: &StructuralArrays<'_>,
    table: &GroupTypeTable,
) -> Result<ModelWindow, DecodeError> {
    let mut start = 0usize;
    for preceding in 1..model {
        start += model_length(preceding, structure, table)?;
    }
    let length = model_length(model, structure, table)?;
    Ok(ModelWindow::new(start, length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file::GroupRecord;

    fn two_type_table() -> GroupTypeTable {
        // Type 0 has 3 atom slots, type 1 has 1.
        GroupTypeTable::from_records(&[
            GroupRecord {
                group_name: "ALA".into(),
                chem_comp_type: "L-PEPTIDE LINKING".into(),
                atom_name_list: vec!["N".into(), "CA".into(), "C".into()],
                element_list: vec!["N".into(), "C".into(), "C".into()],
                formal_charge_list: vec![0, 0, 0],
                ..Default::default()
            },
            GroupRecord {
                group_name: "HOH".into(),
                chem_comp_type: "NON-POLYMER".into(),
                atom_name_list: vec!["O".into()],
                element_list: vec!["O".into()],
                formal_charge_list: vec![0],
                ..Default::default()
            },
        ])
        .unwrap()
    }

    #[test]
    fn model_length_sums_type_atom_counts() {
        // Model 1: one chain of [ALA, HOH]; model 2: two chains of [ALA] and [HOH, HOH].
        let structure = StructuralArrays {
            chains_per_model: &[1, 2],
            groups_per_chain: &[2, 1, 2],
            group_type_ids: &[0, 1, 0, 1, 1],
            group_ids: &[1, 2, 1, 1, 2],
        };
        let table = two_type_table();
        assert_eq!(model_length(1, &structure, &table).unwrap(), 4);
        assert_eq!(model_length(2, &structure, &table).unwrap(), 5);
    }

    #[test]
    fn model_window_accumulates_preceding_lengths() {
        let structure = StructuralArrays {
            chains_per_model: &[1, 1, 1],
            groups_per_chain: &[1, 1, 1],
            group_type_ids: &[0, 0, 0],
            group_ids: &[1, 1, 1],
        };
        let table = two_type_table();
        let window = model_window(3, &structure, &table).unwrap();
        assert_eq!(window.range(), 6..9);
    }

    #[test]
    fn zero_and_excess_model_indices_are_rejected() {
        let structure = StructuralArrays {
            chains_per_model: &[1],
            groups_per_chain: &[1],
            group_type_ids: &[0],
            group_ids: &[1],
        };
        let table = two_type_table();
        assert!(matches!(
            model_length(0, &structure, &table),
            Err(DecodeError::ModelOutOfRange { model: 0, count: 1 })
        ));
        assert!(matches!(
            model_length(2, &structure, &table),
            Err(DecodeError::ModelOutOfRange { model: 2, count: 1 })
        ));
    }

    #[test]
    fn short_count_arrays_are_rejected() {
        let structure = StructuralArrays {
            chains_per_model: &[2],
            groups_per_chain: &[1],
            group_type_ids: &[0],
            group_ids: &[1],
        };
        let table = two_type_table();
        assert!(matches!(
            model_length(1, &structure, &table),
            Err(DecodeError::ArrayLength {
                key: "groupsPerChain",
                ..
            })
        ));

        let structure = StructuralArrays {
            chains_per_model: &[1],
            groups_per_chain: &[2],
            group_type_ids: &[0],
            group_ids: &[1, 1],
        };
        assert!(matches!(
            model_length(1, &structure, &table),
            Err(DecodeError::ArrayLength {
                key: "groupTypeList",
                ..
            })
        ));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let structure = StructuralArrays {
            chains_per_model: &[-1],
            groups_per_chain: &[],
            group_type_ids: &[],
            group_ids: &[],
        };
        let table = two_type_table();
        assert!(matches!(
            model_length(1, &structure, &table),
            Err(DecodeError::NegativeValue {
                key: "chainsPerModel",
                value: -1
            })
        ));
    }
}
