use crate::graph::walk::*;
use crate::prelude::*;
use petgraph::prelude::*;

/// Isobutylbenzene-ish: a six-ring (0..6) with a branched chain off of atom 0.
fn branched() -> Molecule {
    let mut mol = Molecule::from_atoms((0..10).map(|_| Atom::at(6, 0.0, 0.0, 0.0)));
    mol[NodeIndex::new(9)].protons = 8;
    for (a, b) in [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 4),
        (4, 5),
        (5, 0),
        (0, 6),
        (6, 7),
        (7, 8),
        (7, 9),
    ] {
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), Bond::single());
    }
    mol
}

fn indices(walk: &Walk) -> Vec<usize> {
    walk.atoms.iter().map(|a| a.index()).collect()
}

#[test]
fn longest() {
    let mol = branched();
    let walk = longest_path(&mol, NodeIndex::new(8), |_, _| true);
    // out of the chain and all the way around the ring
    assert_eq!(walk.len(), 8);
    assert_eq!(walk.atoms.len(), 9);
    assert_eq!(&indices(&walk)[..4], &[8, 7, 6, 0]);
    for (i, &bond) in walk.bonds.iter().enumerate() {
        let (a, b) = mol.endpoints(bond);
        assert!([a, b].contains(&walk.atoms[i]) && [a, b].contains(&walk.atoms[i + 1]));
    }
}

#[test]
fn filtered() {
    let mol = branched();
    let walk = longest_path(&mol, NodeIndex::new(1), |_, atom| atom.index() < 6);
    assert_eq!(walk.len(), 5);
    assert!(walk.atoms.iter().all(|a| a.index() < 6));

    let alone = longest_path(&mol, NodeIndex::new(9), |_, atom| mol[atom].protons == 8);
    assert!(alone.is_empty());
    assert_eq!(alone.last(), NodeIndex::new(9));
}

#[test]
fn terminate_on_element() {
    let mol = branched();
    let walk = GraphWalker::new(NodeIndex::new(2))
        .terminate(|mol, path| mol[path[path.len() - 1]].protons == 8)
        .score(|_, _, bonds| -(bonds.len() as f64))
        .run(&mol)
        .unwrap();
    // the short way around the ring
    assert_eq!(indices(&walk), [2, 1, 0, 6, 7, 9]);
    assert_eq!(walk.score, -5.0);
}

#[test]
fn depth_and_first_step() {
    let mol = branched();
    let nothing = GraphWalker::new(NodeIndex::new(3))
        .max_depth(4)
        .terminate(|mol, path| mol[path[path.len() - 1]].protons == 8)
        .run(&mol);
    assert!(nothing.is_none());

    let walk = GraphWalker::new(NodeIndex::new(0))
        .first_step(NodeIndex::new(5))
        .max_depth(3)
        .dead_ends(true)
        .run(&mol)
        .unwrap();
    assert_eq!(indices(&walk), [0, 5, 4, 3]);

    let blocked = GraphWalker::new(NodeIndex::new(0))
        .first_step(NodeIndex::new(3))
        .run(&mol);
    assert!(blocked.is_none());
}
