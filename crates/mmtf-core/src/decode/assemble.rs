//! The structure assembler.
//!
//! [`get_structure`] is the top-level entry point: it pulls the required
//! arrays out of the field store, sizes the output via the model length
//! calculator, populates annotations and bonds, normalizes the insertion
//! code and alternate location scratch columns, and applies the row
//! filter's selection to every column synchronously.
//!
//! With no model selected the result is a multi-model stack, which requires
//! every model to have the same atom count; model 1's chain and residue
//! layout then stands in for all models, so per-model identity data is
//! assumed constant across models and only coordinates vary.

use super::annotations::{AnnotationSource, fill_annotations};
use super::bonds::{BondSource, build_bond_list};
use super::error::DecodeError;
use super::filter::select_rows;
use super::groups::GroupTypeTable;
use super::length::{StructuralArrays, model_length, model_window};
use crate::core::file::MmtfFile;
use crate::core::models::array::{AnnotationTable, AtomArray, AtomArrayStack, ExtraColumns};
use crate::core::models::indices::ModelWindow;
use nalgebra::Point3;
use std::str::FromStr;

/// An optional per-atom annotation a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtraField {
    /// Per-atom serial numbers from the file's atom id column.
    AtomId,
    /// Per-atom temperature factors.
    BFactor,
    /// Per-atom occupancies.
    Occupancy,
    /// Per-atom formal charges, broadcast from the residue type table.
    Charge,
}

impl FromStr for ExtraField {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atom_id" => Ok(Self::AtomId),
            "b_factor" => Ok(Self::BFactor),
            "occupancy" => Ok(Self::Occupancy),
            "charge" => Ok(Self::Charge),
            _ => Err(DecodeError::UnknownExtraField(s.to_string())),
        }
    }
}

/// Caller choices for one [`get_structure`] invocation.
#[derive(Debug, Clone, Default)]
pub struct StructureOptions {
    /// `None` decodes all models into a stack; `Some(m)` decodes the
    /// 1-based model `m` into a single-model array.
    pub model: Option<usize>,
    /// Requested (residue id, insertion code) pairs; empty means the
    /// filter's default of keeping atoms without an insertion code.
    pub insertion_codes: Vec<(i32, String)>,
    /// Requested (residue id, alternate location) pairs; empty means the
    /// filter's default of keeping the primary location.
    pub altlocs: Vec<(i32, String)>,
    /// Optional annotation columns to populate.
    pub extra_fields: Vec<ExtraField>,
    /// Whether to reconstruct the bond list.
    pub include_bonds: bool,
}

/// A decoded structure, shaped by the model selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    Single(AtomArray),
    Stack(AtomArrayStack),
}

/// Decodes a structure from the field store.
///
/// # Errors
///
/// Fails with a [`DecodeError`] when a required field is missing or
/// malformed, when a bond endpoint is out of bounds, when an unrecognized
/// extra field is requested, or when all models are requested but their
/// atom counts disagree.
pub fn get_structure(file: &MmtfFile, options: &StructureOptions) -> Result<Structure, DecodeError> {
    let total_atoms = file.count("numAtoms")?;
    let model_count = file.count("numModels")?;

    let chains_per_model = file.int_array("chainsPerModel")?;
    expect_len("chainsPerModel", model_count, chains_per_model.len())?;
    let groups_per_chain = file.int_array("groupsPerChain")?;
    let group_type_ids = file.int_array("groupTypeList")?;
    let group_ids = file.int_array("groupIdList")?;
    expect_len("groupIdList", group_type_ids.len(), group_ids.len())?;
    let chain_names = file.string_array("chainNameList")?;
    let table = GroupTypeTable::from_records(file.group_records("groupList")?)?;

    let xs = file.float_array("xCoordList")?;
    expect_len("xCoordList", total_atoms, xs.len())?;
    let ys = file.float_array("yCoordList")?;
    expect_len("yCoordList", total_atoms, ys.len())?;
    let zs = file.float_array("zCoordList")?;
    expect_len("zCoordList", total_atoms, zs.len())?;

    let ins_codes = file.opt_string_array("insCodeList")?;
    if let Some(codes) = &ins_codes {
        expect_len("insCodeList", group_type_ids.len(), codes.len())?;
    }
    let alt_locs = file.opt_string_array("altLocList")?;
    if let Some(locs) = &alt_locs {
        expect_len("altLocList", total_atoms, locs.len())?;
    }

    let extras = extra_columns(&options.extra_fields);
    let atom_ids = if extras.atom_id {
        let ids = file.int_array("atomIdList")?;
        expect_len("atomIdList", total_atoms, ids.len())?;
        Some(ids)
    } else {
        None
    };
    let b_factors = if extras.b_factor {
        let factors = file.float_array("bFactorList")?;
        expect_len("bFactorList", total_atoms, factors.len())?;
        Some(factors)
    } else {
        None
    };
    let occupancies = if extras.occupancy {
        let occupancies = file.float_array("occupancyList")?;
        expect_len("occupancyList", total_atoms, occupancies.len())?;
        Some(occupancies)
    } else {
        None
    };

    let structure = StructuralArrays {
        chains_per_model: &chains_per_model,
        groups_per_chain: &groups_per_chain,
        group_type_ids: &group_type_ids,
        group_ids: &group_ids,
    };
    let annotation_source = AnnotationSource {
        table: &table,
        chain_names: &chain_names,
        structure,
        ins_codes: ins_codes.as_deref(),
    };
    let inter_bond_atoms = if options.include_bonds {
        file.opt_int_array("bondAtomList")?
    } else {
        None
    };
    let inter_bond_orders = if options.include_bonds {
        file.opt_int_array("bondOrderList")?
    } else {
        None
    };
    let bond_source = BondSource {
        table: &table,
        structure,
        inter_bond_atoms: inter_bond_atoms.as_deref(),
        inter_bond_orders: inter_bond_orders.as_deref(),
        global_atom_count: total_atoms,
    };

    match options.model {
        None => {
            let atoms_per_model = model_length(1, &structure, &table)?;
            if atoms_per_model * model_count != total_atoms {
                return Err(DecodeError::InconsistentModels {
                    model_count,
                    atoms_per_model,
                    total_atoms,
                });
            }
            // Model 1's layout stands in for every model below.
            let window = ModelWindow::new(0, atoms_per_model);

            let mut stack = AtomArrayStack::new(model_count, atoms_per_model, extras);
            let mut ins_scratch = fill_annotations(1, &annotation_source, &mut stack.annotations)?;
            stack.coords = zip_coords(&xs, &ys, &zs);
            copy_window_columns(
                &mut stack.annotations,
                window,
                atom_ids.as_deref(),
                b_factors.as_deref(),
                occupancies.as_deref(),
            );
            if options.include_bonds {
                stack.bonds = Some(build_bond_list(1, window, &bond_source)?);
            }

            let mut alt_scratch = window_column(alt_locs.as_deref(), window);
            normalize_codes(&mut ins_scratch);
            normalize_codes(&mut alt_scratch);
            let rows = select_rows(
                &stack.annotations.res_id,
                &ins_scratch,
                &alt_scratch,
                &options.insertion_codes,
                &options.altlocs,
            );
            Ok(Structure::Stack(stack.select(&rows)))
        }
        Some(model) => {
            let window = model_window(model, &structure, &table)?;
            if window.stop.0 > total_atoms {
                return Err(DecodeError::ModelSpanOutOfBounds {
                    model,
                    stop: window.stop.0,
                    total_atoms,
                });
            }

            let mut array = AtomArray::new(window.len(), extras);
            let mut ins_scratch = fill_annotations(model, &annotation_source, &mut array.annotations)?;
            array.coords = zip_coords(
                &xs[window.range()],
                &ys[window.range()],
                &zs[window.range()],
            );
            copy_window_columns(
                &mut array.annotations,
                window,
                atom_ids.as_deref(),
                b_factors.as_deref(),
                occupancies.as_deref(),
            );
            if options.include_bonds {
                array.bonds = Some(build_bond_list(model, window, &bond_source)?);
            }

            let mut alt_scratch = window_column(alt_locs.as_deref(), window);
            normalize_codes(&mut ins_scratch);
            normalize_codes(&mut alt_scratch);
            let rows = select_rows(
                &array.annotations.res_id,
                &ins_scratch,
                &alt_scratch,
                &options.insertion_codes,
                &options.altlocs,
            );
            Ok(Structure::Single(array.select(&rows)))
        }
    }
}

fn expect_len(key: &'static str, expected: usize, actual: usize) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeError::ArrayLength {
            key,
            expected,
            actual,
        })
    }
}

fn extra_columns(fields: &[ExtraField]) -> ExtraColumns {
    let mut extras = ExtraColumns::default();
    for field in fields {
        match field {
            ExtraField::AtomId => extras.atom_id = true,
            ExtraField::BFactor => extras.b_factor = true,
            ExtraField::Occupancy => extras.occupancy = true,
            ExtraField::Charge => extras.charge = true,
        }
    }
    extras
}

fn zip_coords(xs: &[f32], ys: &[f32], zs: &[f32]) -> Vec<Point3<f32>> {
    xs.iter()
        .zip(ys)
        .zip(zs)
        .map(|((&x, &y), &z)| Point3::new(x, y, z))
        .collect()
}

/// Copies the model's slice of the global per-atom extra columns into the
/// allocated annotation columns.
fn copy_window_columns(
    annotations: &mut AnnotationTable,
    window: ModelWindow,
    atom_ids: Option<&[i32]>,
    b_factors: Option<&[f32]>,
    occupancies: Option<&[f32]>,
) {
    if let (Some(column), Some(source)) = (annotations.atom_id.as_mut(), atom_ids) {
        column.copy_from_slice(&source[window.range()]);
    }
    if let (Some(column), Some(source)) = (annotations.b_factor.as_mut(), b_factors) {
        column.copy_from_slice(&source[window.range()]);
    }
    if let (Some(column), Some(source)) = (annotations.occupancy.as_mut(), occupancies) {
        column.copy_from_slice(&source[window.range()]);
    }
}

fn window_column(column: Option<&[String]>, window: ModelWindow) -> Vec<String> {
    match column {
        Some(values) => values[window.range()].to_vec(),
        None => vec![String::new(); window.len()],
    }
}

/// Replaces empty code entries with the single-space sentinel the row
/// filter expects for "no code present".
fn normalize_codes(codes: &mut [String]) {
    for code in codes {
        if code.is_empty() {
            *code = " ".to_string();
        }
    }
}
