//! Perception of stereocenters that the identifier leaves undefined.
//!
//! Atoms are ranked by iterative refinement of graph invariants (a Morgan-style
//! partition). Two substituents with the same rank are topologically
//! equivalent, so a center is only stereogenic when its substituents are
//! pairwise distinguishable.

use crate::core::models::molecule::{Molecule, StereoCenter};
use crate::core::models::topology::{BondDirection, BondOrder};
use itertools::Itertools;
use std::collections::{HashSet, VecDeque};

/// Double bonds closing a ring smaller than this cannot be cis/trans isomers.
const MIN_STEREO_RING_SIZE: usize = 8;

/// Returns every perceived stereocenter without an explicit descriptor,
/// tetrahedral centers first, each group in atom order.
pub(crate) fn undefined_stereocenters(molecule: &Molecule) -> Vec<StereoCenter> {
    let ranks = symmetry_ranks(molecule);
    let mut centers = Vec::new();

    for (index, atom) in molecule.atoms().iter().enumerate() {
        if atom.chirality.is_specified() || !is_tetrahedral_center(molecule, &ranks, index) {
            continue;
        }
        centers.push(StereoCenter::Atom(index));
    }

    for bond in molecule.bonds() {
        if bond.order != BondOrder::Double {
            continue;
        }
        let (a, b) = (bond.atom1.min(bond.atom2), bond.atom1.max(bond.atom2));
        if !is_stereo_double_bond(molecule, &ranks, a, b) {
            continue;
        }
        if !has_directional_neighbor(molecule, a, b) || !has_directional_neighbor(molecule, b, a)
        {
            centers.push(StereoCenter::Bond(a, b));
        }
    }

    centers
}

/// Computes graph-symmetry classes: atoms with equal ranks are topologically equivalent.
pub(crate) fn symmetry_ranks(molecule: &Molecule) -> Vec<usize> {
    let invariants: Vec<_> = molecule
        .atoms()
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            (
                atom.element.atomic_number(),
                molecule.neighbors(i).len(),
                atom.formal_charge,
                atom.isotope.unwrap_or(0),
                atom.is_aromatic,
            )
        })
        .collect();
    let mut ranks = dense_ranks(&invariants);
    let mut classes = count_classes(&ranks);

    loop {
        let refined: Vec<_> = (0..ranks.len())
            .map(|i| {
                let neighbor_ranks: Vec<usize> = molecule
                    .neighbors(i)
                    .iter()
                    .map(|&n| ranks[n])
                    .sorted_unstable()
                    .collect();
                (ranks[i], neighbor_ranks)
            })
            .collect();
        let next = dense_ranks(&refined);
        let next_classes = count_classes(&next);
        if next_classes == classes {
            return ranks;
        }
        ranks = next;
        classes = next_classes;
    }
}

fn dense_ranks<T: Ord>(keys: &[T]) -> Vec<usize> {
    let order: Vec<usize> = (0..keys.len()).sorted_by(|&a, &b| keys[a].cmp(&keys[b])).collect();
    let mut ranks = vec![0; keys.len()];
    let mut rank = 0;
    for (pos, &i) in order.iter().enumerate() {
        if pos > 0 && keys[order[pos - 1]] != keys[i] {
            rank += 1;
        }
        ranks[i] = rank;
    }
    ranks
}

fn count_classes(ranks: &[usize]) -> usize {
    ranks.iter().collect::<HashSet<_>>().len()
}

fn is_tetrahedral_center(molecule: &Molecule, ranks: &[usize], index: usize) -> bool {
    let neighbors = molecule.neighbors(index);
    let aromatic = molecule.atoms()[index].is_aromatic;
    !aromatic && neighbors.len() == 4 && neighbors.iter().map(|&n| ranks[n]).all_unique()
}

fn is_stereo_double_bond(molecule: &Molecule, ranks: &[usize], a: usize, b: usize) -> bool {
    let atoms = molecule.atoms();
    if atoms[a].is_aromatic || atoms[b].is_aromatic {
        return false;
    }
    if shortest_path_avoiding_bond(molecule, a, b)
        .is_some_and(|edges| edges + 1 < MIN_STEREO_RING_SIZE)
    {
        return false;
    }
    end_is_stereogenic(molecule, ranks, a, b) && end_is_stereogenic(molecule, ranks, b, a)
}

fn end_is_stereogenic(molecule: &Molecule, ranks: &[usize], end: usize, partner: usize) -> bool {
    let others: Vec<usize> = molecule
        .neighbors(end)
        .iter()
        .copied()
        .filter(|&n| n != partner)
        .collect();
    match others.as_slice() {
        [_] => true,
        [x, y] => ranks[*x] != ranks[*y],
        _ => false,
    }
}

fn has_directional_neighbor(molecule: &Molecule, end: usize, partner: usize) -> bool {
    molecule.neighbors(end).iter().any(|&n| {
        n != partner
            && molecule
                .bond_between(end, n)
                .is_some_and(|bond| bond.direction != BondDirection::None)
    })
}

/// Length in edges of the shortest `from` → `to` path that does not use their direct bond.
fn shortest_path_avoiding_bond(molecule: &Molecule, from: usize, to: usize) -> Option<usize> {
    let mut distance = vec![usize::MAX; molecule.n_atoms()];
    let mut queue = VecDeque::from([from]);
    distance[from] = 0;

    while let Some(current) = queue.pop_front() {
        for &next in molecule.neighbors(current) {
            if current == from && next == to {
                continue;
            }
            if distance[next] == usize::MAX {
                distance[next] = distance[current] + 1;
                if next == to {
                    return Some(distance[next]);
                }
                queue.push_back(next);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(smiles: &str) -> Molecule {
        Molecule::from_mapped_smiles(smiles, true).unwrap()
    }

    #[test]
    fn methane_hydrogens_share_a_rank() {
        let mol = build("[C:1]([H:2])([H:3])([H:4])[H:5]");
        let ranks = symmetry_ranks(&mol);
        assert!(ranks[1..].iter().all(|&r| r == ranks[1]));
        assert_ne!(ranks[0], ranks[1]);
    }

    #[test]
    fn methane_has_no_stereocenters() {
        let mol = build("[C:1]([H:2])([H:3])([H:4])[H:5]");
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn bromochlorofluoromethane_is_an_undefined_tetrahedral_center() {
        let mol = build("[C:1]([F:2])([Cl:3])([Br:4])[H:5]");
        assert_eq!(undefined_stereocenters(&mol), vec![StereoCenter::Atom(0)]);
    }

    #[test]
    fn explicit_chirality_defines_the_center() {
        let mol = build("[C@:1]([F:2])([Cl:3])([Br:4])[H:5]");
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn ethanol_carbons_are_not_stereocenters() {
        let mol = build("[C:1]([C:2]([O:3][H:9])([H:7])[H:8])([H:4])([H:5])[H:6]");
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn difluoroethene_double_bond_is_perceived() {
        let mol = build("[F:1][C:2]([H:5])=[C:3]([H:6])[F:4]");
        assert_eq!(undefined_stereocenters(&mol), vec![StereoCenter::Bond(1, 2)]);
    }

    #[test]
    fn directional_bonds_define_the_double_bond() {
        let mol = build("[F:1]/[C:2]([H:5])=[C:3]([H:6])/[F:4]");
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn terminal_methylene_is_not_stereogenic() {
        let mol = build("[C:1]([H:3])([H:4])=[C:2]([H:5])[F:6]");
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn double_bond_in_small_ring_is_ignored() {
        // Cyclohexene: the ring double bond can only be cis.
        let mol = build(
            "[C:1]1([H:7])=[C:2]([H:8])[C:3]([H:9])([H:10])[C:4]([H:11])([H:12])\
             [C:5]([H:13])([H:14])[C:6]1([H:15])[H:16]",
        );
        assert!(undefined_stereocenters(&mol).is_empty());
    }

    #[test]
    fn shortest_path_skips_the_direct_bond() {
        let mol = build("[C:1]1[C:2][C:3]1");
        assert_eq!(shortest_path_avoiding_bond(&mol, 0, 1), Some(2));

        let chain = build("[C:1][C:2]");
        assert_eq!(shortest_path_avoiding_bond(&chain, 0, 1), None);
    }
}
