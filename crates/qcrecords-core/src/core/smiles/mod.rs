//! Atom-mapped SMILES: parsing, map validation and stereo perception.
//!
//! The identifiers stored alongside archived results are fully explicit: every
//! hydrogen is written as its own bracket atom and every atom carries a map
//! number. The map number, not the order of appearance, fixes the atom's
//! position in the built [`Molecule`], which is what lets a flat coordinate
//! buffer be attached without any reordering.

pub mod error;
mod parser;
mod stereo;

pub use error::SmilesError;

use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::topology::Bond;
use parser::ParsedGraph;
use tracing::debug;

pub(crate) fn build_mapped_molecule(
    smiles: &str,
    allow_undefined_stereo: bool,
) -> Result<Molecule, SmilesError> {
    let graph = parser::parse(smiles)?;
    let order = map_order(&graph)?;

    let atoms = order
        .iter()
        .enumerate()
        .map(|(index, &source)| {
            let parsed = &graph.atoms[source];
            Atom {
                element: parsed.element,
                map_index: index + 1,
                formal_charge: parsed.charge,
                isotope: parsed.isotope,
                is_aromatic: parsed.is_aromatic,
                chirality: parsed.chirality,
            }
        })
        .collect();

    // Parsed index -> molecule index.
    let mut position = vec![0; order.len()];
    for (index, &source) in order.iter().enumerate() {
        position[source] = index;
    }
    let bonds = graph
        .bonds
        .iter()
        .map(|b| {
            let mut bond = Bond::new(position[b.atom1], position[b.atom2], b.order);
            bond.direction = b.direction;
            bond
        })
        .collect();

    let mut molecule = Molecule::from_parts(atoms, bonds);
    let undefined = stereo::undefined_stereocenters(&molecule);
    if !undefined.is_empty() {
        if !allow_undefined_stereo {
            return Err(SmilesError::UndefinedStereo { centers: undefined });
        }
        debug!(
            count = undefined.len(),
            "Molecule has stereocenters without descriptors"
        );
    }
    molecule.set_undefined_stereo(undefined);
    Ok(molecule)
}

/// For each molecule index `i`, the parsed index of the atom mapped `i + 1`.
fn map_order(graph: &ParsedGraph) -> Result<Vec<usize>, SmilesError> {
    let n_atoms = graph.atoms.len();
    let mut slots: Vec<Option<usize>> = vec![None; n_atoms];

    for (source, atom) in graph.atoms.iter().enumerate() {
        let map = atom
            .map
            .ok_or(SmilesError::UnmappedAtom { index: source })?;
        if atom.hydrogens > 0 {
            return Err(SmilesError::ImplicitHydrogens {
                map,
                count: atom.hydrogens,
            });
        }
        if map == 0 || map > n_atoms {
            return Err(SmilesError::MapOutOfRange { map, n_atoms });
        }
        let slot = &mut slots[map - 1];
        if slot.is_some() {
            return Err(SmilesError::DuplicateMap { map });
        }
        *slot = Some(source);
    }

    // N distinct maps in 1..=N fill every slot.
    Ok(slots.into_iter().flatten().collect())
}
