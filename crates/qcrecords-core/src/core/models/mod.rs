//! # Core Models Module
//!
//! Data structures describing reconstructed molecules.
//!
//! - [`element`] - Chemical elements and symbol lookup
//! - [`atom`] - Atoms with their map numbers, charges and stereo descriptors
//! - [`topology`] - Bonds, bond orders and bond directions
//! - [`conformer`] - 3D point sets in angstrom
//! - [`molecule`] - The molecule graph together with its conformers
//!
//! ```ignore
//! use qcrecords::core::models::molecule::Molecule;
//!
//! let mol = Molecule::from_mapped_smiles("[C:1]([H:2])([H:3])([H:4])[H:5]", true)?;
//! assert_eq!(mol.n_atoms(), 5);
//! ```

pub mod atom;
pub mod conformer;
pub mod element;
pub mod molecule;
pub mod topology;
