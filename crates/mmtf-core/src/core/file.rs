//! The keyed field store handed to the decoder.
//!
//! An [`MmtfFile`] maps string keys (e.g. `"numAtoms"`, `"xCoordList"`) to
//! field values extracted from the underlying container. Array fields may be
//! stored either as plain typed arrays or as encoded binary columns, which
//! are run through the [codec layer](crate::core::codec) on access. Parsing
//! of the container itself (MessagePack framing, compression) is outside
//! this crate; whatever performs it populates the store.

use crate::core::codec::{CodecError, DecodedArray, decode_column};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// One record of the per-residue-type dictionary (`"groupList"`).
///
/// The parallel atom-level lists are ragged: their common length is the
/// atom slot count of this residue type. `bond_atom_list` holds flattened
/// (a, b) pairs of slot indices, matched one-to-one with `bond_order_list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupRecord {
    pub group_name: String,
    pub chem_comp_type: String,
    pub atom_name_list: Vec<String>,
    pub element_list: Vec<String>,
    pub formal_charge_list: Vec<i32>,
    pub bond_atom_list: Vec<i32>,
    pub bond_order_list: Vec<i8>,
}

/// A single named field of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// An encoded binary column, decoded on access.
    Encoded(Vec<u8>),
    Int(i32),
    Float(f32),
    String(String),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
    Groups(Vec<GroupRecord>),
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("required field '{key}' is missing")]
    Missing { key: String },
    #[error("field '{key}' has unexpected type (expected {expected})")]
    Type { key: String, expected: &'static str },
    #[error("field '{key}' holds negative count {value}")]
    NegativeCount { key: String, value: i32 },
    #[error("failed to decode field '{key}': {source}")]
    Codec {
        key: String,
        #[source]
        source: CodecError,
    },
}

/// The keyed field store for one structure file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MmtfFile {
    fields: HashMap<String, FieldValue>,
}

impl MmtfFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// A required non-negative integer scalar (e.g. `"numAtoms"`).
    pub fn count(&self, key: &str) -> Result<usize, FileError> {
        match self.fields.get(key) {
            None => Err(FileError::Missing { key: key.into() }),
            Some(FieldValue::Int(v)) if *v >= 0 => Ok(*v as usize),
            Some(FieldValue::Int(v)) => Err(FileError::NegativeCount {
                key: key.into(),
                value: *v,
            }),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "integer",
            }),
        }
    }

    /// A required integer array, decoding an encoded column if necessary.
    pub fn int_array(&self, key: &str) -> Result<Vec<i32>, FileError> {
        self.opt_int_array(key)?
            .ok_or_else(|| FileError::Missing { key: key.into() })
    }

    /// An optional integer array; a missing key is `Ok(None)`, a present
    /// but malformed field is an error.
    pub fn opt_int_array(&self, key: &str) -> Result<Option<Vec<i32>>, FileError> {
        match self.decoded(key)? {
            None => Ok(None),
            Some(DecodedArray::Ints(v)) => Ok(Some(v)),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "integer array",
            }),
        }
    }

    pub fn float_array(&self, key: &str) -> Result<Vec<f32>, FileError> {
        self.opt_float_array(key)?
            .ok_or_else(|| FileError::Missing { key: key.into() })
    }

    pub fn opt_float_array(&self, key: &str) -> Result<Option<Vec<f32>>, FileError> {
        match self.decoded(key)? {
            None => Ok(None),
            Some(DecodedArray::Floats(v)) => Ok(Some(v)),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "float array",
            }),
        }
    }

    pub fn string_array(&self, key: &str) -> Result<Vec<String>, FileError> {
        self.opt_string_array(key)?
            .ok_or_else(|| FileError::Missing { key: key.into() })
    }

    pub fn opt_string_array(&self, key: &str) -> Result<Option<Vec<String>>, FileError> {
        match self.decoded(key)? {
            None => Ok(None),
            Some(DecodedArray::Strings(v)) => Ok(Some(v)),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "string array",
            }),
        }
    }

    /// The required per-residue-type dictionary.
    pub fn group_records(&self, key: &str) -> Result<&[GroupRecord], FileError> {
        match self.fields.get(key) {
            None => Err(FileError::Missing { key: key.into() }),
            Some(FieldValue::Groups(records)) => Ok(records),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "group record list",
            }),
        }
    }

    fn decoded(&self, key: &str) -> Result<Option<DecodedArray>, FileError> {
        match self.fields.get(key) {
            None => Ok(None),
            Some(FieldValue::Encoded(bytes)) => decode_column(bytes)
                .map(Some)
                .map_err(|source| FileError::Codec {
                    key: key.into(),
                    source,
                }),
            Some(FieldValue::IntArray(v)) => Ok(Some(DecodedArray::Ints(v.clone()))),
            Some(FieldValue::FloatArray(v)) => Ok(Some(DecodedArray::Floats(v.clone()))),
            Some(FieldValue::StringArray(v)) => Ok(Some(DecodedArray::Strings(v.clone()))),
            Some(_) => Err(FileError::Type {
                key: key.into(),
                expected: "array",
            }),
        }
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<Vec<i32>> for FieldValue {
    fn from(value: Vec<i32>) -> Self {
        FieldValue::IntArray(value)
    }
}

impl From<Vec<f32>> for FieldValue {
    fn from(value: Vec<f32>) -> Self {
        FieldValue::FloatArray(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::StringArray(value)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(value: Vec<&str>) -> Self {
        FieldValue::StringArray(value.into_iter().map(String::from).collect())
    }
}

impl From<Vec<GroupRecord>> for FieldValue {
    fn from(value: Vec<GroupRecord>) -> Self {
        FieldValue::Groups(value)
    }
}
