use super::macros::*;
use crate::aromatic::*;
use crate::graph::RingSet;
use crate::prelude::*;
use crate::samples;
use crate::solver::Workspace;
use glam::DVec3;
use petgraph::prelude::*;

/// p-Benzoquinone: a flat six-ring with oxygens on opposite carbons.
fn quinone() -> Molecule {
    let mut mol = samples::flat_ring(&[6; 6], 1.40, &[1, 2, 4, 5], DVec3::ZERO);
    for c in [0, 3] {
        let pos = mol.pos(NodeIndex::new(c));
        mol.add_atom(Atom::new(8, pos + pos.normalize() * 1.22));
    }
    mol
}

fn bonded(mut mol: Molecule) -> Molecule {
    create_bonds(&mut mol, false).unwrap();
    mol
}

#[test]
fn benzene() {
    trace_capture!();
    let mut mol = bonded(samples::benzene());
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    let ring = ws.rings(&mol).get(0).unwrap().clone();
    assert!(is_candidate(&mol, &ws, &ring));

    let unresolved = classify(&mut mol, &mut ws, &mut Aromatizer::default()).unwrap();
    assert_eq!(unresolved, 0);
    assert_eq!(ws.report.unresolved_rings, 0);
    let doubles = ring
        .bonds
        .iter()
        .filter(|&&b| mol[b].order == BondOrder::Double)
        .count();
    assert_eq!(doubles, 3);
    assert!(ring.bonds.iter().all(|&b| mol[b].aromatic && mol[b].fixed));
}

#[test]
fn rejects_sp3_and_puckered() {
    let mol = bonded(samples::benzene());
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    let ring = ws.rings(&mol).get(0).unwrap().clone();
    ws.hybrid[2] = Hybridization::Sp3;
    assert!(!is_candidate(&mol, &ws, &ring));

    let mut puckered = samples::benzene();
    puckered[NodeIndex::new(0)].pos.z += 0.7;
    puckered[NodeIndex::new(3)].pos.z += 0.7;
    let puckered = bonded(puckered);
    let ws = Workspace::new(&puckered, &config, &table);
    let ring = RingSet::perceive(&puckered).get(0).unwrap().clone();
    assert!(!is_candidate(&puckered, &ws, &ring));
}

#[test]
fn quinone_stays_localized() {
    trace_capture!();
    let mut mol = bonded(quinone());
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    assert_eq!(classify(&mut mol, &mut ws, &mut Aromatizer::default()), Ok(0));
    for (c, o) in [(0, 10), (3, 11)] {
        let bond = mol
            .bond_between(NodeIndex::new(c), NodeIndex::new(o))
            .unwrap();
        assert_eq!(mol[bond].order, BondOrder::Double);
        assert!(mol[bond].fixed);
    }
    assert!(mol.bonds().all(|b| !mol[b].aromatic));
}

/// Refuses every system it's given.
struct Stubborn(usize);
impl Delocalizer for Stubborn {
    fn resolve(&mut self, _mol: &Molecule, _mask: &BondMask) -> Option<Vec<(EdgeIndex, BondOrder)>> {
        self.0 += 1;
        None
    }
}

#[test]
fn unresolved_rings_stay_delocalized() {
    trace_capture!();
    let mut mol = bonded(samples::benzene());
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    let mut stubborn = Stubborn(0);
    assert_eq!(classify(&mut mol, &mut ws, &mut stubborn), Ok(1));
    assert_eq!(stubborn.0, 1);
    assert_eq!(ws.report.unresolved_rings, 1);
    assert_eq!(ws.report.diagnostics, 1);
    let ring_bonds: Vec<_> = mol
        .bonds()
        .filter(|&b| {
            let (x, y) = mol.endpoints(b);
            mol[x].protons == 6 && mol[y].protons == 6
        })
        .collect();
    assert_eq!(ring_bonds.len(), 6);
    for b in ring_bonds {
        assert_eq!(mol[b].order, BondOrder::Aromatic);
        assert!(mol[b].aromatic);
        assert!(!mol[b].fixed);
    }
    for c in (0..6).map(NodeIndex::new) {
        assert!(!mol.is_over_valent(c));
        assert_eq!(mol.pi_electrons(c), 1);
    }
}

#[test]
fn tolerances() {
    assert!(angle_tolerance(4) < angle_tolerance(6));
    assert!(angle_tolerance(5) < angle_tolerance(4));
    assert_eq!(angle_tolerance(3), angle_tolerance(7));
}

/// A flat five-ring with a hydrogen on each carbon. Bonded by hand, since a heavy atom at the
/// first corner would otherwise reach across the ring.
fn five_ring(hetero: u8) -> Molecule {
    let mut mol = samples::flat_ring(&[hetero, 6, 6, 6, 6], 1.40, &[1, 2, 3, 4], DVec3::ZERO);
    for i in 0..5 {
        mol.add_bond(NodeIndex::new(i), NodeIndex::new((i + 1) % 5), Bond::single());
    }
    for (c, h) in (1..5).zip(5..9) {
        mol.add_bond(NodeIndex::new(c), NodeIndex::new(h), Bond::single());
    }
    mol
}

#[test]
fn ring_members() {
    let config = Config::default();
    let table = StandardLengths::new();
    for (z, candidate) in [(16, true), (34, false), (52, false)] {
        let mol = five_ring(z);
        let mut ws = Workspace::new(&mol, &config, &table);
        let ring = ws.rings(&mol).get(0).unwrap().clone();
        assert_eq!(ring.len(), 5);
        assert_eq!(is_candidate(&mol, &ws, &ring), candidate, "element {z}");
    }
}

#[test]
fn twisted_bond_breaks_the_ring() {
    let mol = bonded(samples::benzene());
    let config = Config::default();
    let table = StandardLengths::new();
    let mut ws = Workspace::new(&mol, &config, &table);
    let ring = ws.rings(&mol).get(0).unwrap().clone();
    assert!(is_candidate(&mol, &ws, &ring));
    ws.torsion[ring.bonds[2].index()].out_of_plane = true;
    assert!(!is_candidate(&mol, &ws, &ring));
}
