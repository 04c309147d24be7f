use super::macros::*;
use crate::prelude::*;
use petgraph::prelude::*;

/// A ring of the given elements, each with the given number of implicit hydrogens. Returns the
/// molecule and the mask of its ring bonds.
fn ring(members: &[(u8, u8)]) -> (Molecule, BondMask) {
    let mut mol = Molecule::new();
    for &(z, h) in members {
        let mut atom = Atom::at(z, 0.0, 0.0, 0.0);
        atom.set_hydrogens(h).unwrap();
        mol.add_atom(atom);
    }
    let n = members.len();
    let mask = (0..n)
        .map(|i| mol.add_bond(NodeIndex::new(i), NodeIndex::new((i + 1) % n), Bond::single()))
        .collect();
    (mol, mask)
}

/// Apply a resolution and check that it's a valid Kekulé structure.
#[track_caller]
fn check(mol: &mut Molecule, orders: &[(EdgeIndex, BondOrder)]) -> Vec<usize> {
    for &(bond, order) in orders {
        mol.set_order(bond, order).unwrap();
    }
    mol.atoms()
        .map(|a| {
            assert!(!mol.is_over_valent(a), "atom {} is over valent", a.index());
            mol.graph
                .edges(a)
                .filter(|e| e.weight().order == BondOrder::Double)
                .count()
        })
        .collect()
}

#[test]
fn benzene() {
    trace_capture!();
    let (mut mol, mask) = ring(&[(6, 1); 6]);
    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(orders.len(), 6);
    assert_eq!(check(&mut mol, &orders), [1; 6]);
}

#[test]
fn pyridine() {
    trace_capture!();
    let (mut mol, mask) = ring(&[(7, 0), (6, 1), (6, 1), (6, 1), (6, 1), (6, 1)]);
    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(check(&mut mol, &orders), [1; 6]);
}

#[test]
fn pyrrole() {
    trace_capture!();
    let (mut mol, mask) = ring(&[(7, 1), (6, 1), (6, 1), (6, 1), (6, 1)]);
    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(check(&mut mol, &orders), [0, 1, 1, 1, 1]);
}

#[test]
fn thiophene() {
    trace_capture!();
    let (mut mol, mask) = ring(&[(16, 0), (6, 1), (6, 1), (6, 1), (6, 1)]);
    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(check(&mut mol, &orders), [0, 1, 1, 1, 1]);
}

#[test]
fn crowded_atom_needs_relaxed_pass() {
    trace_capture!();
    // one carbon has no valence left for a double bond
    let mut members = [(6, 1); 6];
    members[0] = (6, 2);
    let (mol, mask) = ring(&members);
    assert_eq!(mol.free_valence(NodeIndex::new(0)), 0);
    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(orders.len(), 6);
    let doubles = orders
        .iter()
        .filter(|(_, o)| *o == BondOrder::Double)
        .count();
    assert_eq!(doubles, 3);
}

#[test]
fn step_budget() {
    let (mol, mask) = ring(&[(6, 1); 6]);
    let mut tight = Aromatizer { step_budget: 1 };
    assert_eq!(tight.resolve(&mol, &mask), None);
}

#[test]
fn components() {
    let (mut mol, mut mask) = ring(&[(6, 1); 6]);
    let offset = mol.atom_count();
    for _ in 0..6 {
        let mut atom = Atom::at(6, 0.0, 0.0, 0.0);
        atom.set_hydrogens(1).unwrap();
        mol.add_atom(atom);
    }
    for i in 0..6 {
        let a = NodeIndex::new(offset + i);
        let b = NodeIndex::new(offset + (i + 1) % 6);
        mask.insert(mol.add_bond(a, b, Bond::single()));
    }
    let comps = mask.components(&mol);
    assert_eq!(comps.len(), 2);
    assert!(comps.iter().all(|c| c.len() == 6));

    let orders = Aromatizer::default().resolve(&mol, &mask).unwrap();
    assert_eq!(orders.len(), 12);
    assert_eq!(check(&mut mol, &orders), [1; 12]);
}

#[test]
fn mask_membership() {
    let mut mask = BondMask::new();
    assert!(mask.is_empty());
    mask.insert(EdgeIndex::new(70));
    mask.insert(EdgeIndex::new(3));
    assert!(!mask.is_empty());
    assert_eq!(mask.len(), 2);
    assert!(mask.iter().eq([EdgeIndex::new(3), EdgeIndex::new(70)]));
    mask.remove(EdgeIndex::new(70));
    mask.remove(EdgeIndex::new(3));
    assert!(mask.is_empty());
}
