//! # QCRecords Core Library
//!
//! Reconstructs typed quantum-chemistry records and 3D molecules from batches of
//! cached archive results.
//!
//! A batch is a JSON array of result triples `[record, mapped_smiles, conformers]`.
//! Each triple becomes a ([`TypedRecord`](core::records::TypedRecord),
//! [`Molecule`](core::models::molecule::Molecule)) pair whose molecule carries one
//! conformer in angstrom.
//!
//! ## Architectural Philosophy
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Molecule`, `Conformer`),
//!   the mapped-SMILES parser, record schemas and I/O.
//!
//! - **[`engine`]: The Pipeline Stages.** Classification of a batch into one
//!   `RecordKind`, per-triple reconstruction, configuration, progress and errors.
//!
//! - **[`workflows`]: The Public API.** [`workflows::convert::run`] ties the stages
//!   together: load, classify, reconstruct in parallel, collect in input order.
//!
//! ## Features
//!
//! - `parallel` (default): reconstruct triples on the rayon thread pool.

pub mod core;
pub mod engine;
pub mod workflows;
