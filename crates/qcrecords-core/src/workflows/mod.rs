//! # Workflows Module
//!
//! End-to-end entry points. A workflow loads a batch, fixes its record kind and
//! reconstructs every triple, reporting progress through an optional observer.
//!
//! - **Conversion Workflow** ([`convert`]) - Batch of result triples to ordered
//!   `(record, molecule)` pairs with per-triple timings.

pub mod convert;
