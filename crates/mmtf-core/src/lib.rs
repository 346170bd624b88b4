//! # MMTF Core Library
//!
//! A decoder that reconstructs molecular structures (atoms, residues, chains,
//! bonds, and optional per-model coordinate trajectories) from MMTF-style
//! binary structural data into columnar in-memory atom arrays.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers with a strict dependency direction,
//! so that the data representation can be reused independently of the
//! decoding pipeline.
//!
//! - **[`core`]: The Foundation.** Contains the array codec layer that
//!   decompresses run-length/delta/recursive-index encoded binary columns,
//!   the keyed field store ([`core::file::MmtfFile`]) that hands decoded
//!   arrays to the pipeline, and the columnar output containers
//!   ([`core::models`]).
//!
//! - **[`decode`]: The Pipeline.** Builds the per-type metadata table,
//!   computes per-model atom counts and offsets, broadcasts annotations into
//!   flat per-atom columns, reconstructs the bond graph, and orchestrates it
//!   all behind the public [`get_structure`] entry point.
//!
//! ## Usage
//!
//! ```ignore
//! use mmtf_core::{get_structure, MmtfFile, Structure, StructureOptions};
//!
//! let file: MmtfFile = /* fields extracted from an MMTF container */;
//! let options = StructureOptions {
//!     model: Some(1),
//!     include_bonds: true,
//!     ..Default::default()
//! };
//! match get_structure(&file, &options)? {
//!     Structure::Single(array) => println!("{} atoms", array.len()),
//!     Structure::Stack(stack) => println!("{} models", stack.model_count()),
//! }
//! ```

pub mod core;
pub mod decode;

pub use crate::core::file::{FieldValue, FileError, GroupRecord, MmtfFile};
pub use crate::core::models::array::{AtomArray, AtomArrayStack};
pub use crate::core::models::bonds::{Bond, BondList, BondOrder};
pub use crate::decode::assemble::{ExtraField, Structure, StructureOptions, get_structure};
pub use crate::decode::error::DecodeError;
