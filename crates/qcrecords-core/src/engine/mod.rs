//! # Engine Module
//!
//! The stages that turn a loaded batch into typed records and molecules.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Conformer selection, stereo tolerance and failure policy
//! - **Classification** ([`classify`]) - Fixes the batch's record kind and checks homogeneity
//! - **Reconstruction** ([`reconstruct`]) - Per-triple decoding, molecule building and
//!   conformer attachment
//! - **Progress Monitoring** ([`progress`]) - Observer hook for front-ends
//! - **Error Handling** ([`error`]) - The pipeline error type, carrying the failing triple's index
//!
//! The record kind moves through two states: undetermined until [`classify::classify`]
//! succeeds, then fixed for the rest of the run inside a [`reconstruct::Reconstructor`].

pub mod classify;
pub mod config;
pub mod error;
pub mod progress;
pub mod reconstruct;
