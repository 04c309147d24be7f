use super::macros::*;
use crate::prelude::*;
use crate::solver::relax::*;
use crate::solver::Workspace;
use petgraph::prelude::*;
use rand::prelude::*;

/// H2C-CH2 with the bond left single, as if relaxation never got to it.
fn flat_ethylene() -> Molecule {
    let mut a = Atom::at(6, 0.0, 0.0, 0.0);
    let mut b = Atom::at(6, 1.34, 0.0, 0.0);
    a.set_hydrogens(2).unwrap();
    b.set_hydrogens(2).unwrap();
    let mut mol = Molecule::from_atoms([a, b]);
    mol.add_bond(NodeIndex::new(0), NodeIndex::new(1), Bond::single());
    mol
}

#[test]
fn forgotten_double_bond() {
    trace_capture!();
    let mut mol = flat_ethylene();
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    ws.hybrid[0] = Hybridization::Sp2;
    ws.hybrid[1] = Hybridization::Sp2;
    assert_eq!(forgotten_doubles(&mut mol, &mut ws), Ok(1));
    let bond = EdgeIndex::new(0);
    assert_eq!(mol[bond].order, BondOrder::Double);
    assert!(ws.is_decided(bond));
    assert_eq!(ws.report.changed_bonds, 1);
    // both carbons are satisfied now
    assert_eq!(forgotten_doubles(&mut mol, &mut ws), Ok(0));
}

#[test]
fn twisted_bonds_are_not_forgotten() {
    let mut mol = flat_ethylene();
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    ws.hybrid[0] = Hybridization::Sp2;
    ws.hybrid[1] = Hybridization::Sp2;
    ws.torsion[0].out_of_plane = true;
    assert_eq!(forgotten_doubles(&mut mol, &mut ws), Ok(0));
    assert_eq!(mol[EdgeIndex::new(0)].order, BondOrder::Single);
}

#[test]
fn relaxation_picks_by_length() {
    trace_capture!();
    let mut mol = flat_ethylene();
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    ws.hybrid[0] = Hybridization::Sp2;
    ws.hybrid[1] = Hybridization::Sp2;
    let bond = EdgeIndex::new(0);
    assert_eq!(classify(&mol, &ws, bond), BondOrder::Double);

    let mut rng = StdRng::seed_from_u64(1);
    assert_eq!(relax(&mut mol, &mut ws, &mut rng), Ok(0));
    assert_eq!(mol[bond].order, BondOrder::Double);
    assert!(ws.is_decided(bond));
    assert_eq!(ws.report.changed_bonds, 1);
}
