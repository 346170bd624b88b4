//! # Core Module
//!
//! This module provides the foundation the decoding pipeline is built on:
//! binary column decompression, keyed field access, and the columnar
//! containers the decoder produces.
//!
//! ## Key Components
//!
//! - [`codec`] - Decoders for the MMTF binary array encoding strategies
//!   (run-length, delta, recursive indexing, fixed-point, packed strings)
//! - [`file`] - The keyed field store supplying named arrays and scalars,
//!   decoding encoded columns on access
//! - [`models`] - Columnar atom arrays, bond lists, and the tagged index
//!   types that keep the decoder's three numbering spaces apart

pub mod codec;
pub mod file;
pub mod models;
