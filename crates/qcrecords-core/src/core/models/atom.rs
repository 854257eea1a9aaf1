use super::element::Element;
use std::fmt;

/// Tetrahedral stereo descriptor as written in the source identifier.
///
/// The descriptor is relative to the order in which neighbours appear in the
/// identifier, exactly like the `@`/`@@` SMILES notation; it is not a CIP label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Chirality {
    /// No descriptor was given for this atom.
    #[default]
    Unspecified,
    /// `@`: neighbours appear anticlockwise when viewed from the first neighbour.
    CounterClockwise,
    /// `@@`: neighbours appear clockwise when viewed from the first neighbour.
    Clockwise,
}

impl Chirality {
    pub fn is_specified(&self) -> bool {
        !matches!(self, Chirality::Unspecified)
    }
}

impl fmt::Display for Chirality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Chirality::Unspecified => "",
            Chirality::CounterClockwise => "@",
            Chirality::Clockwise => "@@",
        })
    }
}

/// An atom of a [`Molecule`](super::molecule::Molecule).
///
/// Atoms are stored in atom-map order, so `map_index` is always the atom's
/// position in the molecule plus one.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The chemical element of the atom.
    pub element: Element,
    /// The 1-based atom-map number taken from the identifier.
    pub map_index: usize,
    /// The formal charge in elementary charge units.
    pub formal_charge: i8,
    /// The isotope mass number, if one was given.
    pub isotope: Option<u16>,
    /// Whether the atom was written in aromatic (lowercase) form.
    pub is_aromatic: bool,
    /// The tetrahedral stereo descriptor.
    pub chirality: Chirality,
}

impl Atom {
    /// Creates a neutral, non-aromatic atom without stereo information.
    pub fn new(element: Element, map_index: usize) -> Self {
        Self {
            element,
            map_index,
            formal_charge: 0,
            isotope: None,
            is_aromatic: false,
            chirality: Chirality::default(),
        }
    }
}
