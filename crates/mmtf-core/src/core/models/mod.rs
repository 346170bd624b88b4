//! # Models Module
//!
//! This module contains the data structures the decoder produces and the
//! index types it computes with.
//!
//! ## Overview
//!
//! Decoded structures are columnar: one flat array per annotation category
//! (chain id, residue id, atom name, ...), one coordinate buffer, and an
//! optional bond list, all indexed by atom row. A single conformation is an
//! [`array::AtomArray`]; an ensemble is an [`array::AtomArrayStack`], which
//! shares one annotation table across a model-major coordinate stack.
//!
//! ## Key Components
//!
//! - [`array`] - Columnar atom containers with synchronized row selection
//! - [`bonds`] - The undirected bond multigraph over one model's atoms
//! - [`indices`] - Tagged index types for the three atom numbering spaces
//!   (slot within a residue type, atom within a model, atom within the
//!   whole multiplexed file stream)

pub mod array;
pub mod bonds;
pub mod indices;
