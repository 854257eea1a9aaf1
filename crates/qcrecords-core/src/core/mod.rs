//! # Core Module
//!
//! The stateless building blocks of the conversion pipeline.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Elements, atoms, bonds, conformers and molecules
//! - **Identifier Parsing** ([`smiles`]) - Atom-mapped SMILES parsing, map validation and
//!   stereo perception
//! - **Record Schemas** ([`records`]) - Typed optimization and torsion drive records
//! - **File I/O** ([`io`]) - Batch loading, molecule writers and timing output
//! - **Units** ([`units`]) - Bohr/angstrom conversion
//!
//! Nothing in this layer holds state between calls; orchestration lives in
//! [`crate::engine`] and [`crate::workflows`].

pub mod io;
pub mod models;
pub mod records;
pub mod smiles;
pub mod units;
