use super::error::SmilesError;
use crate::core::models::atom::Chirality;
use crate::core::models::element::Element;
use crate::core::models::topology::{BondDirection, BondOrder};
use purr::feature::{AtomKind, BondKind, BracketSymbol};
use purr::graph::{Atom as GraphAtom, Builder};

/// An atom as written in the identifier, before map validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedAtom {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: Option<u16>,
    pub chirality: Chirality,
    pub hydrogens: u8,
    pub charge: i8,
    pub map: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParsedBond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
    pub direction: BondDirection,
}

/// Atoms in the order they appear in the identifier, and the bonds between them.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParsedGraph {
    pub atoms: Vec<ParsedAtom>,
    pub bonds: Vec<ParsedBond>,
}

/// Parses a SMILES string into its written atoms and bonds.
///
/// The grammar, ring closures and branches are handled by `purr`; this only
/// lifts its atom graph into the element and bond types used by [`Molecule`].
///
/// [`Molecule`]: crate::core::models::molecule::Molecule
pub(crate) fn parse(smiles: &str) -> Result<ParsedGraph, SmilesError> {
    if smiles.trim().is_empty() {
        return Err(SmilesError::Empty);
    }

    let mut builder = Builder::new();
    purr::read::read(smiles, &mut builder, None).map_err(|err| match err {
        purr::read::Error::EndOfLine => SmilesError::UnexpectedEnd,
        purr::read::Error::Character(position) => SmilesError::UnexpectedCharacter {
            // `get` keeps a position that is not on a char boundary from panicking.
            character: smiles
                .get(position..)
                .and_then(|rest| rest.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER),
            position,
        },
    })?;
    let graph = builder
        .build()
        .map_err(|err| SmilesError::ConflictingRingBond {
            reason: format!("{err:?}"),
        })?;

    let atoms = graph
        .iter()
        .enumerate()
        .map(|(index, atom)| lift_atom(index, atom))
        .collect::<Result<Vec<_>, _>>()?;

    let mut bonds = Vec::new();
    for (index, atom) in graph.iter().enumerate() {
        // Every bond is listed on both of its atoms; keep the copy written from
        // the earlier atom so directions read left to right.
        for bond in atom.bonds.iter().filter(|b| b.tid > index) {
            let (order, direction) = match bond.kind {
                BondKind::Elided => {
                    if atoms[index].is_aromatic && atoms[bond.tid].is_aromatic {
                        (BondOrder::Aromatic, BondDirection::None)
                    } else {
                        (BondOrder::Single, BondDirection::None)
                    }
                }
                BondKind::Single => (BondOrder::Single, BondDirection::None),
                BondKind::Double => (BondOrder::Double, BondDirection::None),
                BondKind::Triple => (BondOrder::Triple, BondDirection::None),
                BondKind::Quadruple => (BondOrder::Quadruple, BondDirection::None),
                BondKind::Aromatic => (BondOrder::Aromatic, BondDirection::None),
                BondKind::Up => (BondOrder::Single, BondDirection::Up),
                BondKind::Down => (BondOrder::Single, BondDirection::Down),
            };
            bonds.push(ParsedBond {
                atom1: index,
                atom2: bond.tid,
                order,
                direction,
            });
        }
    }

    Ok(ParsedGraph { atoms, bonds })
}

fn lift_atom(index: usize, atom: &GraphAtom) -> Result<ParsedAtom, SmilesError> {
    let hydrogens = atom.suppressed_hydrogens();
    let (symbol, is_aromatic) = match &atom.kind {
        AtomKind::Star => return Err(unknown("*", index)),
        AtomKind::Aliphatic(aliphatic) => (aliphatic.to_string(), false),
        AtomKind::Aromatic(aromatic) => (aromatic.to_string(), true),
        AtomKind::Bracket { symbol, .. } => match symbol {
            BracketSymbol::Star => return Err(unknown("*", index)),
            BracketSymbol::Element(element) => (element.to_string(), false),
            BracketSymbol::Aromatic(aromatic) => (aromatic.to_string(), true),
        },
    };
    let element = Element::from_symbol(&capitalize(&symbol)).ok_or_else(|| unknown(&symbol, index))?;

    let mut parsed = ParsedAtom {
        element,
        is_aromatic,
        isotope: None,
        chirality: Chirality::Unspecified,
        hydrogens,
        charge: 0,
        map: None,
    };

    // Bracket fields are read through their written form.
    if let AtomKind::Bracket {
        isotope,
        configuration,
        charge,
        map,
        ..
    } = &atom.kind
    {
        parsed.isotope = isotope.as_ref().and_then(|n| n.to_string().parse().ok());
        parsed.map = map.as_ref().and_then(|n| n.to_string().parse().ok());
        parsed.charge = charge
            .as_ref()
            .map_or(0, |c| charge_value(&c.to_string()));
        parsed.chirality = match configuration.as_ref().map(ToString::to_string) {
            None => Chirality::Unspecified,
            Some(text) => match text.as_str() {
                "@" | "@TH1" => Chirality::CounterClockwise,
                "@@" | "@TH2" => Chirality::Clockwise,
                _ => return Err(SmilesError::UnsupportedChirality { index }),
            },
        };
    }

    Ok(parsed)
}

fn unknown(symbol: &str, index: usize) -> SmilesError {
    SmilesError::UnknownElement {
        symbol: symbol.to_string(),
        index,
    }
}

fn capitalize(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// `+`, `-`, `+2`, `--` and friends.
fn charge_value(text: &str) -> i8 {
    let sign = if text.starts_with('-') { -1 } else { 1 };
    let digits = text.trim_start_matches(['+', '-']);
    let repeats = (text.len() - digits.len()) as i8;
    match digits.parse::<i8>() {
        Ok(magnitude) => sign * magnitude,
        Err(_) => sign * repeats,
    }
}
