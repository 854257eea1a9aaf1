use super::atom::Atom;
use super::conformer::{Conformer, ConformerError};
use super::element::Element;
use super::topology::Bond;
use crate::core::smiles::{self, SmilesError};
use itertools::Itertools;
use std::fmt;

/// A stereocenter perceived from the molecular graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StereoCenter {
    /// A tetrahedral center, by atom index.
    Atom(usize),
    /// A double bond with distinguishable substituents on both ends, by atom indices.
    Bond(usize, usize),
}

impl fmt::Display for StereoCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Reported with 1-based map numbers, which is what users see in the identifier.
        match self {
            StereoCenter::Atom(a) => write!(f, "atom :{}", a + 1),
            StereoCenter::Bond(a, b) => write!(f, "bond :{}=:{}", a + 1, b + 1),
        }
    }
}

/// A molecule built from an atom-mapped identifier, plus its conformers.
///
/// Atom `i` always carries map number `i + 1`, so coordinate arrays produced
/// alongside the identifier line up with [`Molecule::atoms`] index by index.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Molecule {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
    adjacency: Vec<Vec<usize>>,
    conformers: Vec<Conformer>,
    undefined_stereo: Vec<StereoCenter>,
}

impl Molecule {
    /// Assembles a molecule from atoms and bonds whose indices refer to `atoms`.
    pub fn from_parts(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for bond in &bonds {
            adjacency[bond.atom1].push(bond.atom2);
            adjacency[bond.atom2].push(bond.atom1);
        }
        Self {
            atoms,
            bonds,
            adjacency,
            conformers: Vec::new(),
            undefined_stereo: Vec::new(),
        }
    }

    /// Builds a molecule from a fully atom-mapped SMILES string.
    ///
    /// Every atom, hydrogens included, must carry a map number and the numbers
    /// must cover `1..=N` exactly. With `allow_undefined_stereo` set, perceived
    /// stereocenters lacking a descriptor are recorded in
    /// [`Molecule::undefined_stereo`] instead of failing the build.
    ///
    /// # Errors
    ///
    /// Returns a [`SmilesError`] for syntax errors, mapping problems and, when
    /// not allowed, undefined stereochemistry.
    pub fn from_mapped_smiles(
        smiles: &str,
        allow_undefined_stereo: bool,
    ) -> Result<Self, SmilesError> {
        smiles::build_mapped_molecule(smiles, allow_undefined_stereo)
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn n_bonds(&self) -> usize {
        self.bonds.len()
    }

    /// Indices of the atoms bonded to `index`, in bond insertion order.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.adjacency.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bond_between(&self, a: usize, b: usize) -> Option<&Bond> {
        self.bonds.iter().find(|bond| bond.partner(a) == Some(b))
    }

    pub fn conformers(&self) -> &[Conformer] {
        &self.conformers
    }

    /// Makes `conformer` the molecule's only conformer, discarding any present.
    ///
    /// # Errors
    ///
    /// Returns [`ConformerError::AtomCountMismatch`] if the conformer does not
    /// have exactly one point per atom.
    pub fn set_conformer(&mut self, conformer: Conformer) -> Result<(), ConformerError> {
        if conformer.len() != self.atoms.len() {
            return Err(ConformerError::AtomCountMismatch {
                points: conformer.len(),
                atoms: self.atoms.len(),
            });
        }
        self.conformers.clear();
        self.conformers.push(conformer);
        Ok(())
    }

    /// Stereocenters that were perceived but carry no descriptor.
    pub fn undefined_stereo(&self) -> &[StereoCenter] {
        &self.undefined_stereo
    }

    pub(crate) fn set_undefined_stereo(&mut self, centers: Vec<StereoCenter>) {
        self.undefined_stereo = centers;
    }

    pub fn total_charge(&self) -> i32 {
        self.atoms.iter().map(|a| a.formal_charge as i32).sum()
    }

    /// Molecular formula in Hill order: carbon, then hydrogen, then the rest
    /// alphabetically. Without carbon every element is alphabetical.
    pub fn hill_formula(&self) -> String {
        let counts = self.atoms.iter().map(|a| a.element).counts();
        let has_carbon = counts.contains_key(&Element::C);

        counts
            .into_iter()
            .sorted_by(|(a, _), (b, _)| {
                let rank = |e: &Element| match (has_carbon, *e) {
                    (true, Element::C) => 0,
                    (true, Element::H) => 1,
                    _ => 2,
                };
                rank(a)
                    .cmp(&rank(b))
                    .then_with(|| a.symbol().cmp(b.symbol()))
            })
            .map(|(element, n)| {
                if n == 1 {
                    element.symbol().to_string()
                } else {
                    format!("{}{}", element.symbol(), n)
                }
            })
            .collect()
    }
}

impl fmt::Display for Molecule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Molecule {} ({} atoms, {} bonds, {} conformer(s))",
            self.hill_formula(),
            self.n_atoms(),
            self.n_bonds(),
            self.conformers.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::BondOrder;
    use crate::core::units::LengthUnit;

    fn water() -> Molecule {
        Molecule::from_parts(
            vec![
                Atom::new(Element::O, 1),
                Atom::new(Element::H, 2),
                Atom::new(Element::H, 3),
            ],
            vec![
                Bond::new(0, 1, BondOrder::Single),
                Bond::new(0, 2, BondOrder::Single),
            ],
        )
    }

    #[test]
    fn adjacency_is_built_from_bonds() {
        let mol = water();
        assert_eq!(mol.neighbors(0), &[1, 2]);
        assert_eq!(mol.neighbors(1), &[0]);
        assert!(mol.neighbors(99).is_empty());
        assert!(mol.bond_between(2, 0).is_some());
        assert!(mol.bond_between(1, 2).is_none());
    }

    #[test]
    fn non_ascii_identifier_is_an_error_not_a_panic() {
        assert!(Molecule::from_mapped_smiles("[xé:1]", true).is_err());
    }

    #[test]
    fn set_conformer_replaces_existing_conformers() {
        let mut mol = water();
        let first = Conformer::from_flat(&[0.0; 9], LengthUnit::Angstrom).unwrap();
        let second = Conformer::from_flat(&[1.0; 9], LengthUnit::Angstrom).unwrap();

        mol.set_conformer(first).unwrap();
        mol.set_conformer(second.clone()).unwrap();

        assert_eq!(mol.conformers().len(), 1);
        assert_eq!(mol.conformers()[0], second);
    }

    #[test]
    fn set_conformer_rejects_wrong_point_count() {
        let mut mol = water();
        let conformer = Conformer::from_flat(&[0.0; 6], LengthUnit::Angstrom).unwrap();

        assert_eq!(
            mol.set_conformer(conformer),
            Err(ConformerError::AtomCountMismatch {
                points: 2,
                atoms: 3
            })
        );
        assert!(mol.conformers().is_empty());
    }

    #[test]
    fn hill_formula_orders_carbon_and_hydrogen_first() {
        let mol = Molecule::from_parts(
            vec![
                Atom::new(Element::O, 1),
                Atom::new(Element::C, 2),
                Atom::new(Element::H, 3),
                Atom::new(Element::H, 4),
                Atom::new(Element::CL, 5),
                Atom::new(Element::C, 6),
            ],
            Vec::new(),
        );
        assert_eq!(mol.hill_formula(), "C2H2ClO");
    }

    #[test]
    fn hill_formula_without_carbon_is_alphabetical() {
        assert_eq!(water().hill_formula(), "H2O");
    }

    #[test]
    fn display_summarizes_the_molecule() {
        assert_eq!(
            water().to_string(),
            "Molecule H2O (3 atoms, 2 bonds, 0 conformer(s))"
        );
    }

    #[test]
    fn stereo_centers_display_map_numbers() {
        assert_eq!(StereoCenter::Atom(0).to_string(), "atom :1");
        assert_eq!(StereoCenter::Bond(1, 4).to_string(), "bond :2=:5");
    }
}
