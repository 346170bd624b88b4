//! # Decode Module
//!
//! The pipeline that turns a keyed field store into a columnar structure.
//!
//! ## Overview
//!
//! Decoding proceeds in stages, each grounded in one kind of bookkeeping:
//!
//! - [`groups`] - Builds the residue type table from the file's type
//!   dictionary (one entry per distinct residue kind, referenced by id)
//! - [`length`] - Computes per-model atom counts and global atom offsets
//!   from the chain/residue count arrays
//! - [`annotations`] - Broadcasts chain-, residue- and type-level values
//!   into flat per-atom columns, in coordinate stream order
//! - [`bonds`] - Re-instantiates per-type intra-residue bonds for every
//!   residue occurrence and merges the globally indexed inter-residue bonds
//! - [`filter`] - Selects atom rows by insertion code and alternate
//!   location after all columns are populated
//! - [`assemble`] - Orchestrates the above behind [`assemble::get_structure`]
//!
//! All failures are fatal and synchronous; there is no partial result.

pub mod annotations;
pub mod assemble;
pub mod bonds;
pub mod error;
pub mod filter;
pub mod groups;
pub mod length;
