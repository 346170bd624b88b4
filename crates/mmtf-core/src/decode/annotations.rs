//! The annotation filler.
//!
//! Walks chain → residue → atom slot for one model and broadcasts chain- and
//! residue-level values to every atom, copying per-slot metadata from the
//! type table. The walk visits atoms in exactly the order the model's atoms
//! appear in the global coordinate stream; that ordering identity is what
//! binds the annotation columns to the pre-sliced coordinates.

use super::error::DecodeError;
use super::groups::GroupTypeTable;
use super::length::{StructuralArrays, checked_count, model_layout};
use crate::core::models::array::AnnotationTable;

/// Everything the filler reads while populating one model's columns.
#[derive(Debug, Clone, Copy)]
pub struct AnnotationSource<'a> {
    pub table: &'a GroupTypeTable,
    /// One name per chain across the whole file, contiguous per model.
    pub chain_names: &'a [String],
    pub structure: StructuralArrays<'a>,
    /// Per-residue insertion codes, when the file carries them.
    pub ins_codes: Option<&'a [String]>,
}

/// Populates the caller-allocated columns for the given 1-based model.
///
/// Element symbols are upper-cased during the copy. The formal charge
/// column is filled only when the output table allocated it. Returns the
/// per-atom insertion code scratch column (raw, empty string when the file
/// has none) for the post-hoc row filter.
///
/// # Errors
///
/// Fails if any input array is shorter than the walk requires or the walk
/// does not produce exactly `out.len()` atoms.
pub fn fill_annotations(
    model: usize,
    source: &AnnotationSource<'_>,
    out: &mut AnnotationTable,
) -> Result<Vec<String>, DecodeError> {
    let structure = &source.structure;
    let layout = model_layout(model, structure)?;
    if source.chain_names.len() < layout.chains.end {
        return Err(DecodeError::ArrayLength {
            key: "chainNameList",
            expected: layout.chains.end,
            actual: source.chain_names.len(),
        });
    }

    let expected = out.len();
    let mut ins_scratch = Vec::with_capacity(expected);
    let mut group = layout.first_group;
    let mut row = 0usize;

    for chain in layout.chains.clone() {
        let chain_name = &source.chain_names[chain];
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
            let res_id = *structure
                .group_ids
                .get(group)
                .ok_or(DecodeError::ArrayLength {
                    key: "groupIdList",
                    expected: group + 1,
                    actual: structure.group_ids.len(),
                })?;
            let ins_code = match source.ins_codes {
                Some(codes) => codes
                    .get(group)
                    .ok_or(DecodeError::ArrayLength {
                        key: "insCodeList",
                        expected: group + 1,
                        actual: codes.len(),
                    })?
                    .as_str(),
                None => "",
            };

            for slot in 0..group_type.atom_count() {
                if row >= expected {
                    return Err(DecodeError::ModelLengthMismatch {
                        model,
                        expected,
                        actual: row + 1,
                    });
                }
                out.chain_id[row] = chain_name.clone();
                out.res_id[row] = res_id;
                out.res_name[row] = group_type.name.clone();
                out.hetero[row] = group_type.hetero;
                out.atom_name[row] = group_type.atom_names[slot].clone();
                out.element[row] = group_type.elements[slot].to_ascii_uppercase();
                if let Some(charge) = out.charge.as_mut() {
                    charge[row] = group_type.charges[slot];
                }
                ins_scratch.push(ins_code.to_string());
                row += 1;
            }
            group += 1;
        }
    }

    if row != expected {
        return Err(DecodeError::ModelLengthMismatch {
            model,
            expected,
            actual: row,
        });
    }
    Ok(ins_scratch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::file::GroupRecord;
    use crate::core::models::array::ExtraColumns;

    fn table() -> GroupTypeTable {
        GroupTypeTable::from_records(&[
            GroupRecord {
                group_name: "ALA".into(),
                chem_comp_type: "L-PEPTIDE LINKING".into(),
                atom_name_list: vec!["N".into(), "CA".into(), "C".into()],
                element_list: vec!["n".into(), "c".into(), "c".into()],
                formal_charge_list: vec![0, 0, 0],
                ..Default::default()
            },
            GroupRecord {
                group_name: "FE2".into(),
                chem_comp_type: "NON-POLYMER".into(),
                atom_name_list: vec!["FE".into()],
                element_list: vec!["fe".into()],
                formal_charge_list: vec![2],
                ..Default::default()
            },
        ])
        .unwrap()
    }

    fn chain_names() -> Vec<String> {
        vec!["A".to_string(), "B".to_string()]
    }

    #[test]
    fn filler_broadcasts_in_stream_order() {
        let table = table();
        let chain_names = chain_names();
        let ins = vec![String::new(), "B".to_string()];
        let source = AnnotationSource {
            table: &table,
            chain_names: &chain_names,
            structure: StructuralArrays {
                chains_per_model: &[2],
                groups_per_chain: &[1, 1],
                group_type_ids: &[0, 1],
                group_ids: &[7, 101],
            },
            ins_codes: Some(&ins),
        };

        let mut out = AnnotationTable::new(
            4,
            ExtraColumns {
                charge: true,
                ..Default::default()
            },
        );
        let scratch = fill_annotations(1, &source, &mut out).unwrap();

        assert_eq!(out.chain_id, vec!["A", "A", "A", "B"]);
        assert_eq!(out.res_id, vec![7, 7, 7, 101]);
        assert_eq!(out.res_name, vec!["ALA", "ALA", "ALA", "FE2"]);
        assert_eq!(out.hetero, vec![false, false, false, true]);
        assert_eq!(out.atom_name, vec!["N", "CA", "C", "FE"]);
        assert_eq!(out.charge, Some(vec![0, 0, 0, 2]));
        assert_eq!(scratch, vec!["", "", "", "B"]);
    }

    #[test]
    fn elements_are_upper_cased() {
        let table = table();
        let chain_names = chain_names();
        let source = AnnotationSource {
            table: &table,
            chain_names: &chain_names,
            structure: StructuralArrays {
                chains_per_model: &[1],
                groups_per_chain: &[1],
                group_type_ids: &[1],
                group_ids: &[1],
            },
            ins_codes: None,
        };
        let mut out = AnnotationTable::new(1, ExtraColumns::default());
        fill_annotations(1, &source, &mut out).unwrap();
        assert_eq!(out.element, vec!["FE"]);
    }

    #[test]
    fn second_model_walk_uses_its_own_chains() {
        let table = table();
        let chain_names = chain_names();
        let source = AnnotationSource {
            table: &table,
            chain_names: &chain_names,
            structure: StructuralArrays {
                chains_per_model: &[1, 1],
                groups_per_chain: &[1, 1],
                group_type_ids: &[0, 1],
                group_ids: &[1, 2],
            },
            ins_codes: None,
        };
        let mut out = AnnotationTable::new(1, ExtraColumns::default());
        let scratch = fill_annotations(2, &source, &mut out).unwrap();
        assert_eq!(out.chain_id, vec!["B"]);
        assert_eq!(out.res_name, vec!["FE2"]);
        assert_eq!(scratch, vec![""]);
    }

    #[test]
    fn wrong_output_length_is_rejected() {
        let table = table();
        let chain_names = chain_names();
        let source = AnnotationSource {
            table: &table,
            chain_names: &chain_names,
            structure: StructuralArrays {
                chains_per_model: &[1],
                groups_per_chain: &[1],
                group_type_ids: &[0],
                group_ids: &[1],
            },
            ins_codes: None,
        };
        let mut out = AnnotationTable::new(2, ExtraColumns::default());
        assert!(matches!(
            fill_annotations(1, &source, &mut out),
            Err(DecodeError::ModelLengthMismatch {
                model: 1,
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn missing_chain_name_is_rejected() {
        let table = table();
        let chain_names = vec!["A".to_string()];
        let source = AnnotationSource {
            table: &table,
            chain_names: &chain_names,
            structure: StructuralArrays {
                chains_per_model: &[2],
                groups_per_chain: &[1, 1],
                group_type_ids: &[0, 0],
                group_ids: &[1, 2],
            },
            ins_codes: None,
        };
        let mut out = AnnotationTable::new(6, ExtraColumns::default());
        assert!(matches!(
            fill_annotations(1, &source, &mut out),
            Err(DecodeError::ArrayLength {
                key: "chainNameList",
                ..
            })
        ));
    }
}
