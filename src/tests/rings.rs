use crate::graph::rings::*;
use crate::prelude::*;
use crate::samples;
use petgraph::prelude::*;

/// A graph with no coordinates, bonded as listed.
fn skeleton(atoms: usize, bonds: &[(usize, usize)]) -> Molecule {
    let mut mol = Molecule::from_atoms((0..atoms).map(|_| Atom::at(6, 0.0, 0.0, 0.0)));
    for &(a, b) in bonds {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), Bond::single());
    }
    mol
}

/// Rings could be rotated or reversed, this checks all of them, panicking if none match.
#[track_caller]
fn assert_ring_eq(ring: &Ring, expected: &[usize]) {
    let got: Vec<usize> = ring.atoms.iter().map(|a| a.index()).collect();
    let mut b = expected.to_vec();
    if got.len() == b.len() {
        for _ in 0..b.len() {
            b.rotate_right(1);
            if got == b {
                return;
            }
        }
        b.reverse();
        for _ in 0..b.len() {
            b.rotate_right(1);
            if got == b {
                return;
            }
        }
    }
    assert_eq!(got, expected);
}

/// Each bond of the ring joins consecutive atoms, and the last one closes it.
#[track_caller]
fn assert_closed(mol: &Molecule, ring: &Ring) {
    assert_eq!(ring.atoms.len(), ring.bonds.len());
    for (i, &bond) in ring.bonds.iter().enumerate() {
        let (a, b) = mol.endpoints(bond);
        let next = ring.atoms[(i + 1) % ring.len()];
        assert!((a, b) == (ring.atoms[i], next) || (b, a) == (ring.atoms[i], next));
    }
}

#[test]
fn acyclic() {
    let chain = skeleton(4, &[(0, 1), (1, 2), (2, 3)]);
    assert_eq!(num_cycles(&chain), 0);
    let rings = RingSet::perceive(&chain);
    assert!(rings.is_empty());
    assert!(!rings.in_ring(NodeIndex::new(1)));
}

#[test]
fn benzene() {
    let mut mol = samples::benzene();
    create_bonds(&mut mol, false).unwrap();
    assert_eq!(num_cycles(&mol), 1);
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 1);
    let ring = rings.get(0).unwrap();
    assert_ring_eq(ring, &[0, 1, 2, 3, 4, 5]);
    assert_closed(&mol, ring);
    assert!(!rings.in_ring(NodeIndex::new(6)));
}

#[test]
fn naphthalene() {
    let mol = skeleton(
        10,
        &[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 4),
            (4, 5),
            (5, 0),
            (4, 6),
            (6, 7),
            (7, 8),
            (8, 9),
            (9, 5),
        ],
    );
    assert_eq!(num_cycles(&mol), 2);
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 2);
    assert!(rings.iter().all(|r| r.len() == 6));
    let fusion = mol.bond_between(NodeIndex::new(4), NodeIndex::new(5)).unwrap();
    assert_eq!(rings.bond_rings(fusion).len(), 2);
    assert_eq!(rings.atom_rings(NodeIndex::new(0)).len(), 1);
    assert_eq!(rings.sized(6, 6).count(), 2);
    assert_eq!(rings.sized(3, 5).count(), 0);
}

#[test]
fn cubane() {
    let mol = skeleton(
        8,
        &[
            (0, 1),
            (1, 2),
            (2, 3),
            (3, 0),
            (4, 5),
            (5, 6),
            (6, 7),
            (7, 4),
            (0, 4),
            (1, 5),
            (2, 6),
            (3, 7),
        ],
    );
    assert_eq!(num_cycles(&mol), 5);
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 5);
    assert!(rings.iter().all(|r| r.len() == 4));
    for ring in &rings {
        assert_closed(&mol, ring);
    }
    assert!(mol.bonds().all(|b| rings.bond_in_ring(b)));
}

#[test]
fn side_chains_stay_out() {
    let mol = skeleton(6, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5)]);
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 1);
    assert_ring_eq(rings.get(0).unwrap(), &[0, 1, 2]);
    assert_closed(&mol, rings.get(0).unwrap());
    assert!((3..6).all(|a| !rings.in_ring(NodeIndex::new(a))));
}

#[test]
fn bicyclobutane_keeps_small_rings() {
    let mol = skeleton(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (0, 2)]);
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 2);
    assert!(rings.iter().all(|r| r.len() == 3));
}

#[test]
fn metal_bonds_are_not_rings() {
    let mut mol = skeleton(3, &[(0, 1)]);
    mol[NodeIndex::new(2)].protons = 26;
    mol.add_bond(NodeIndex::new(0), NodeIndex::new(2), Bond::metal());
    mol.add_bond(NodeIndex::new(1), NodeIndex::new(2), Bond::metal());
    assert_eq!(num_cycles(&mol), 0);
    assert!(RingSet::perceive(&mol).is_empty());
}

#[test]
fn staleness() {
    let mut mol = skeleton(3, &[(0, 1), (1, 2)]);
    let rings = RingSet::perceive(&mol);
    assert!(rings.is_current(&mol));
    let bond = mol.bond_between(NodeIndex::new(0), NodeIndex::new(1)).unwrap();
    mol.set_order(bond, BondOrder::Double).unwrap();
    assert!(rings.is_current(&mol));
    mol.add_bond(NodeIndex::new(2), NodeIndex::new(0), Bond::single());
    assert!(!rings.is_current(&mol));
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 1);
    mol.remove_bonds(&[bond]);
    assert!(!rings.is_current(&mol));
    assert!(RingSet::perceive(&mol).is_empty());
}
