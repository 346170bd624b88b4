//! The residue type table.
//!
//! The source format stores residue metadata once per distinct residue kind
//! and references it by integer id from every instance. The table mirrors
//! that arena: per-instance walks look metadata up by id and never duplicate
//! it in memory. The per-type atom and bond lists are ragged, so they are
//! kept as jagged containers with the per-type lengths implicit in each row;
//! the maximum widths across all types are exposed for scratch sizing.

use super::error::DecodeError;
use crate::core::file::GroupRecord;
use crate::core::models::bonds::BondOrder;
use crate::core::models::indices::TypeAtomIndex;
use phf::phf_set;

/// Chemical-component classifications denoting polymer backbone residues.
/// Any other classification marks the residue type as hetero.
///
/// The set holds the canonical upper-case spellings; classifications are
/// trimmed and upper-cased before the membership check, so padded or
/// mixed-case variants of these four strings still count as polymer.
static LINKING_CATEGORIES: phf::Set<&'static str> = phf_set! {
    "L-PEPTIDE LINKING",
    "PEPTIDE LINKING",
    "DNA LINKING",
    "RNA LINKING",
};

/// A bond between two atom slots of the same residue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntraBond {
    pub atom1: TypeAtomIndex,
    pub atom2: TypeAtomIndex,
    pub order: BondOrder,
}

/// Metadata shared by every instance of one residue kind.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupType {
    pub name: String,
    pub hetero: bool,
    pub atom_names: Vec<String>,
    pub elements: Vec<String>,
    pub charges: Vec<i32>,
    pub bonds: Vec<IntraBond>,
}

impl GroupType {
    pub fn atom_count(&self) -> usize {
        self.atom_names.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }
}

/// The per-type metadata table, indexed by the integer type ids the
/// per-residue arrays reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupTypeTable {
    types: Vec<GroupType>,
    max_atoms: usize,
    max_bonds: usize,
}

impl GroupTypeTable {
    /// Builds the table from the file's type dictionary.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::MalformedGroup`] if a record's parallel lists
    /// do not reconcile or an intra-bond endpoint is not a valid atom slot.
    pub fn from_records(records: &[GroupRecord]) -> Result<Self, DecodeError> {
        let mut types = Vec::with_capacity(records.len());
        for record in records {
            types.push(Self::build_type(record)?);
        }
        let max_atoms = types.iter().map(GroupType::atom_count).max().unwrap_or(0);
        let max_bonds = types.iter().map(GroupType::bond_count).max().unwrap_or(0);
        Ok(Self {
            types,
            max_atoms,
            max_bonds,
        })
    }

    fn build_type(record: &GroupRecord) -> Result<GroupType, DecodeError> {
        let malformed = |reason: String| DecodeError::MalformedGroup {
            name: record.group_name.clone(),
            reason,
        };

        let atom_count = record.atom_name_list.len();
        if record.element_list.len() != atom_count {
            return Err(malformed(format!(
                "{} elements for {} atom names",
                record.element_list.len(),
                atom_count
            )));
        }
        if record.formal_charge_list.len() != atom_count {
            return Err(malformed(format!(
                "{} formal charges for {} atom names",
                record.formal_charge_list.len(),
                atom_count
            )));
        }
        if record.bond_atom_list.len() % 2 != 0 {
            return Err(malformed(format!(
                "bond atom list has odd length {}",
                record.bond_atom_list.len()
            )));
        }

        let pair_count = record.bond_atom_list.len() / 2;
        if !record.bond_order_list.is_empty() && record.bond_order_list.len() != pair_count {
            return Err(malformed(format!(
                "{} bond orders for {} bond pairs",
                record.bond_order_list.len(),
                pair_count
            )));
        }

        let mut bonds = Vec::with_capacity(pair_count);
        for (i, pair) in record.bond_atom_list.chunks_exact(2).enumerate() {
            let mut slots = [TypeAtomIndex(0); 2];
            for (slot, &raw) in slots.iter_mut().zip(pair) {
                if raw < 0 || raw as usize >= atom_count {
                    return Err(malformed(format!(
                        "bond endpoint {raw} out of range for {atom_count} atom slots"
                    )));
                }
                *slot = TypeAtomIndex(raw as usize);
            }
            let order = record
                .bond_order_list
                .get(i)
                .map(|&o| BondOrder::from_order_number(o))
                .unwrap_or(BondOrder::Unknown);
            bonds.push(IntraBond {
                atom1: slots[0],
                atom2: slots[1],
                order,
            });
        }

        Ok(GroupType {
            name: record.group_name.clone(),
            hetero: is_hetero(&record.chem_comp_type),
            atom_names: record.atom_name_list.clone(),
            elements: record.element_list.clone(),
            charges: record.formal_charge_list.clone(),
            bonds,
        })
    }

    /// Looks a type up by the id the per-residue arrays reference.
    pub fn get(&self, id: i32) -> Result<&GroupType, DecodeError> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.types.get(i))
            .ok_or(DecodeError::GroupTypeOutOfRange {
                id,
                count: self.types.len(),
            })
    }

    pub fn atom_count(&self, id: i32) -> Result<usize, DecodeError> {
        self.get(id).map(GroupType::atom_count)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The largest atom slot count across all types.
    pub fn max_atoms(&self) -> usize {
        self.max_atoms
    }

    /// The largest intra-bond count across all types.
    pub fn max_bonds(&self) -> usize {
        self.max_bonds
    }
}

fn is_hetero(chem_comp_type: &str) -> bool {
    !LINKING_CATEGORIES.contains(chem_comp_type.trim().to_ascii_uppercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alanine() -> GroupRecord {
        GroupRecord {
            group_name: "ALA".into(),
            chem_comp_type: "L-PEPTIDE LINKING".into(),
            atom_name_list: vec!["N".into(), "CA".into(), "C".into()],
            element_list: vec!["N".into(), "C".into(), "C".into()],
            formal_charge_list: vec![0, 0, 0],
            bond_atom_list: vec![0, 1, 1, 2],
            bond_order_list: vec![1, 1],
        }
    }

    fn water() -> GroupRecord {
        GroupRecord {
            group_name: "HOH".into(),
            chem_comp_type: "NON-POLYMER".into(),
            atom_name_list: vec!["O".into()],
            element_list: vec!["o".into()],
            formal_charge_list: vec![0],
            ..Default::default()
        }
    }

    #[test]
    fn linking_classifications_are_not_hetero() {
        for class in [
            "L-PEPTIDE LINKING",
            "PEPTIDE LINKING",
            "DNA LINKING",
            "RNA LINKING",
        ] {
            assert!(!is_hetero(class), "{class} should be polymer");
        }
        assert!(is_hetero("NON-POLYMER"));
        assert!(is_hetero("SACCHARIDE"));
        assert!(is_hetero(""));
    }

    #[test]
    fn classification_comparison_ignores_case_and_padding() {
        assert!(!is_hetero("peptide linking"));
        assert!(!is_hetero("  DNA LINKING  "));
    }

    #[test]
    fn table_exposes_type_metadata_and_maxima() {
        let table = GroupTypeTable::from_records(&[alanine(), water()]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.max_atoms(), 3);
        assert_eq!(table.max_bonds(), 2);

        let ala = table.get(0).unwrap();
        assert_eq!(ala.name, "ALA");
        assert!(!ala.hetero);
        assert_eq!(ala.atom_count(), 3);
        assert_eq!(
            ala.bonds[0],
            IntraBond {
                atom1: TypeAtomIndex(0),
                atom2: TypeAtomIndex(1),
                order: BondOrder::Single,
            }
        );

        let hoh = table.get(1).unwrap();
        assert!(hoh.hetero);
        assert_eq!(table.atom_count(1).unwrap(), 1);
    }

    #[test]
    fn missing_bond_orders_fall_back_to_unknown() {
        let mut record = alanine();
        record.bond_order_list.clear();
        let table = GroupTypeTable::from_records(&[record]).unwrap();
        assert!(
            table
                .get(0)
                .unwrap()
                .bonds
                .iter()
                .all(|b| b.order == BondOrder::Unknown)
        );
    }

    #[test]
    fn mismatched_parallel_lists_are_rejected() {
        let mut record = alanine();
        record.element_list.pop();
        assert!(matches!(
            GroupTypeTable::from_records(&[record]),
            Err(DecodeError::MalformedGroup { .. })
        ));

        let mut record = alanine();
        record.formal_charge_list.push(1);
        assert!(matches!(
            GroupTypeTable::from_records(&[record]),
            Err(DecodeError::MalformedGroup { .. })
        ));
    }

    #[test]
    fn out_of_range_bond_slot_is_rejected() {
        let mut record = alanine();
        record.bond_atom_list = vec![0, 3];
        record.bond_order_list = vec![1];
        assert!(matches!(
            GroupTypeTable::from_records(&[record]),
            Err(DecodeError::MalformedGroup { .. })
        ));
    }

    #[test]
    fn unknown_type_id_is_rejected() {
        let table = GroupTypeTable::from_records(&[water()]).unwrap();
        assert!(matches!(
            table.get(1),
            Err(DecodeError::GroupTypeOutOfRange { id: 1, count: 1 })
        ));
        assert!(matches!(
            table.get(-1),
            Err(DecodeError::GroupTypeOutOfRange { id: -1, count: 1 })
        ));
    }
}
