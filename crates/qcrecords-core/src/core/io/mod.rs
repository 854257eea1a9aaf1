//! Provides input/output for result batches and reconstructed molecules.
//!
//! Batches are read from JSON arrays of result triples. Molecules are written
//! through the [`traits::MolecularFile`] interface as SD or XYZ files, and
//! per-triple timings as CSV.

pub mod batch;
pub mod sdf;
pub mod timings;
pub mod traits;
pub mod xyz;
