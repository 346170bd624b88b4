use crate::core::file::FileError;
use crate::core::models::bonds::BondIndexError;
use thiserror::Error;

/// Errors surfaced while decoding a structure from the field store.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    File(#[from] FileError),

    #[error("array '{key}' has length {actual}, expected {expected}")]
    ArrayLength {
        key: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("array '{key}' holds negative value {value}")]
    NegativeValue { key: &'static str, value: i32 },

    #[error("malformed group record '{name}': {reason}")]
    MalformedGroup { name: String, reason: String },

    #[error("group type id {id} out of range for {count} group types")]
    GroupTypeOutOfRange { id: i32, count: usize },

    #[error("model {model} out of range for {count} models (models are numbered from 1)")]
    ModelOutOfRange { model: usize, count: usize },

    #[error(
        "model {model} spans atoms up to {stop} but the file declares {total_atoms} atoms in total"
    )]
    ModelSpanOutOfBounds {
        model: usize,
        stop: usize,
        total_atoms: usize,
    },

    #[error("model {model} walk produced {actual} atoms, expected {expected}")]
    ModelLengthMismatch {
        model: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "per-model atom counts are unequal ({model_count} models, {atoms_per_model} atoms in \
         model 1, {total_atoms} atoms in total); select an explicit model instead"
    )]
    InconsistentModels {
        model_count: usize,
        atoms_per_model: usize,
        total_atoms: usize,
    },

    #[error("inter-residue bond atom list has odd length {0}")]
    UnpairedBonds(usize),

    #[error(transparent)]
    BondIndex(#[from] BondIndexError),

    #[error("unknown extra field '{0}' (expected one of atom_id, b_factor, occupancy, charge)")]
    UnknownExtraField(String),
}
