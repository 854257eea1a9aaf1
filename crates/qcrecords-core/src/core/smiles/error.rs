use crate::core::models::molecule::StereoCenter;
use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmilesError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier ends in the middle of an atom, bond or branch")]
    UnexpectedEnd,

    #[error("unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("atom {index} has unsupported element symbol '{symbol}'")]
    UnknownElement { symbol: String, index: usize },

    #[error("ring closures cannot be joined: {reason}")]
    ConflictingRingBond { reason: String },

    #[error("atom {index} uses a chirality class other than @ and @@")]
    UnsupportedChirality { index: usize },

    #[error("atom {index} has no atom-map number")]
    UnmappedAtom { index: usize },

    #[error("atom-map number {map} is used more than once")]
    DuplicateMap { map: usize },

    #[error("atom-map number {map} is outside 1..={n_atoms}; map numbers must cover every atom without gaps")]
    MapOutOfRange { map: usize, n_atoms: usize },

    #[error("atom :{map} declares {count} implicit hydrogen(s); all hydrogens must be explicit mapped atoms")]
    ImplicitHydrogens { map: usize, count: u8 },

    #[error("undefined stereochemistry at {}", .centers.iter().join(", "))]
    UndefinedStereo { centers: Vec<StereoCenter> },
}
