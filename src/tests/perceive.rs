use super::macros::*;
use crate::graph::rings::RingSet;
use crate::prelude::*;
use crate::samples;
use petgraph::prelude::*;

#[test]
fn benzene() {
    trace_capture!();
    let mut mol = samples::benzene();
    let made = create_bonds(&mut mol, false).unwrap();
    assert_eq!(made, 12);
    for c in (0..6).map(NodeIndex::new) {
        assert_eq!(mol.degree(c), 3);
        assert_eq!(mol.heavy_connections(c), 2);
    }
    for h in (6..12).map(NodeIndex::new) {
        assert!(mol.is_terminal(h));
    }
    assert!(mol.bonds().all(|b| mol[b].order == BondOrder::Single && !mol[b].fixed));
}

#[test]
fn running_twice_adds_nothing() {
    let mut mol = samples::acetonitrile();
    assert_eq!(create_bonds(&mut mol, false), Ok(5));
    assert_eq!(create_bonds(&mut mol, false), Ok(0));
}

/// A carbon with five hydrogens in range.
fn crowded_carbon() -> Molecule {
    Molecule::from_atoms([
        Atom::at(6, 0.0, 0.0, 0.0),
        Atom::at(1, 1.09, 0.0, 0.0),
        Atom::at(1, -1.09, 0.0, 0.0),
        Atom::at(1, 0.0, 1.09, 0.0),
        Atom::at(1, 0.0, -1.09, 0.0),
        Atom::at(1, 0.0, 0.0, 1.09),
    ])
}

#[test]
fn max_valence_strict() {
    trace_capture!();
    let mut mol = crowded_carbon();
    let err = create_bonds(&mut mol, false).unwrap_err();
    assert_eq!(err.kind, PerceptionErrorKind::MaxValence { atom: 0, max: 4 });
    assert_eq!(err.atoms.0, 0);
    assert_eq!(mol.bond_count(), 4);
    assert!(err.to_string().starts_with("couldn't bond atoms 0 and"));
}

#[test]
fn max_valence_lenient() {
    trace_capture!();
    let mut mol = crowded_carbon();
    assert_eq!(create_bonds(&mut mol, true), Ok(4));
    assert_eq!(mol.degree(NodeIndex::new(0)), 4);
}

#[test]
fn hydrogen_keeps_closer_partner() {
    trace_capture!();
    let mut mol = Molecule::from_atoms([
        Atom::at(8, 0.0, 0.0, 0.0),
        Atom::at(1, 0.98, 0.0, 0.0),
        Atom::at(8, 2.18, 0.0, 0.0),
    ]);
    create_bonds(&mut mol, false).unwrap();
    let h = NodeIndex::new(1);
    assert_eq!(mol.degree(h), 1);
    assert!(mol.bond_between(h, NodeIndex::new(0)).is_some());
    assert!(mol.bond_between(h, NodeIndex::new(2)).is_none());
}

#[test]
fn flat_four_ring_loses_diagonal() {
    trace_capture!();
    let mut mol = Molecule::from_atoms([
        Atom::at(6, 0.95, 0.0, 0.0),
        Atom::at(6, 0.0, 1.2247, 0.0),
        Atom::at(6, -0.95, 0.0, 0.0),
        Atom::at(6, 0.0, -1.2247, 0.0),
    ]);
    create_bonds(&mut mol, false).unwrap();
    assert_eq!(mol.bond_count(), 4);
    assert!(mol.bond_between(NodeIndex::new(0), NodeIndex::new(2)).is_none());
    let rings = RingSet::perceive(&mol);
    assert_eq!(rings.len(), 1);
    assert_eq!(rings.iter().next().map(|r| r.len()), Some(4));
}

#[test]
fn long_diphosphorus_bond() {
    trace_capture!();
    // a P2C three-ring where the P-P contact is within bonding range but too long
    let mut mol = Molecule::from_atoms([
        Atom::at(15, -1.23, 0.0, 0.0),
        Atom::at(15, 1.23, 0.0, 0.0),
        Atom::at(6, 0.0, 1.05, 0.0),
    ]);
    create_bonds(&mut mol, false).unwrap();
    assert!(mol.bond_between(NodeIndex::new(0), NodeIndex::new(1)).is_none());
    assert_eq!(mol.bond_count(), 2);
}

#[test]
fn hapto_ring_completion() {
    trace_capture!();
    let mut mol = samples::slipped_half_sandwich();
    create_bonds(&mut mol, false).unwrap();
    let fe = NodeIndex::new(10);
    assert_eq!(mol[fe].protons, 26);
    assert_eq!(mol.degree(fe), 5);
    for c in (0..5).map(NodeIndex::new) {
        let bond = mol.bond_between(fe, c).expect("every ring atom is bonded to the metal");
        assert!(mol[bond].order.is_metal_ligand());
        assert!(mol[bond].fixed);
        assert_eq!(mol.connections(c, false), 3);
        assert_eq!(mol.degree(c), 4);
        assert_eq!(mol.occupied_valence(c), 3);
        assert!(mol.has_metal_bond(c));
    }
    // metal bonds aren't ring bonds
    assert_eq!(RingSet::perceive(&mol).len(), 1);
}

#[test]
fn sandwich() {
    trace_capture!();
    let mut mol = samples::ferrocene();
    create_bonds(&mut mol, false).unwrap();
    let fe = NodeIndex::new(0);
    assert_eq!(mol.degree(fe), 10);
    assert!(mol
        .bonds_of(fe)
        .all(|(e, n)| mol[e].order.is_metal_ligand() && mol[n].protons == 6));
}
