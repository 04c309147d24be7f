//! Aromatic ring perception.
//!
//! A ring is a candidate if it's small, flat, made of the right elements, and its bonds look
//! delocalized. Rings that are really a keto tautomer get their C=O fixed instead. Whatever is
//! left goes to a [`Delocalizer`] as one mask.

use crate::atom_info::{aromatic_member, is_chalcogen};
use crate::core::*;
use crate::geom::{polygon_angle_sum, ring_angle_sum};
use crate::graph::rings::Ring;
use crate::kekule::{BondMask, Delocalizer};
use crate::molecule::Molecule;
use crate::solver::{SolveError, Workspace};
use glam::DVec3;
use petgraph::prelude::*;
use smallvec::SmallVec;
use std::f64::consts::PI;
use tracing::*;

/// Largest deviation of a ring's internal angle sum from an ideal polygon.
pub fn angle_tolerance(size: usize) -> f64 {
    match size {
        4 => PI / 20.0,
        5 => PI / 30.0,
        6 => PI / 16.0,
        _ => PI / 15.0,
    }
}

/// Whether a ring could be aromatic, going by its members, geometry, and bond lengths.
pub fn is_candidate(mol: &Molecule, ws: &Workspace, ring: &Ring) -> bool {
    if !(3..=7).contains(&ring.len()) {
        return false;
    }
    // homoatomic four-rings of anything but carbon are ring ions
    if ring.len() == 4 {
        let z = mol[ring.atoms[0]].protons;
        if z != 6 && ring.atoms.iter().all(|&a| mol[a].protons == z) {
            return false;
        }
    }
    for &bond in &ring.bonds {
        let data = &mol[bond];
        if data.fixed || data.order.is_metal_ligand() {
            return false;
        }
        if ws.torsion.get(bond.index()).map_or(false, |t| t.out_of_plane) {
            return false;
        }
    }
    for &atom in &ring.atoms {
        let protons = mol[atom].protons;
        if !aromatic_member(protons) {
            return false;
        }
        match ws.hybrid[atom.index()] {
            Hybridization::Sp1 | Hybridization::Sp3d | Hybridization::Sp3d2 => return false,
            Hybridization::Sp3 if !is_chalcogen(protons) => return false,
            _ => {}
        }
    }
    let pos: SmallVec<DVec3, 8> = ring.atoms.iter().map(|&a| mol.pos(a)).collect();
    let sum = ring_angle_sum(&pos);
    if (sum - polygon_angle_sum(ring.len())).abs() > angle_tolerance(ring.len()) {
        trace!(size = ring.len(), sum, "ring angles are off");
        return false;
    }
    if ring.len() == 5 {
        for &bond in &ring.bonds {
            if ws.torsion.get(bond.index()).map_or(false, |t| t.flat) {
                continue;
            }
            let (a, b) = mol.endpoints(bond);
            let expected = ws.expected(mol, a, b, BondOrder::Aromatic);
            if mol.bond_length(bond) > expected + ws.config.aromatic_tolerance {
                trace!(bond = bond.index(), "five-ring bond is too long");
                return false;
            }
        }
    }
    true
}

/// Terminal oxygens hanging off of a ring atom.
fn exocyclic_oxygens(mol: &Molecule, ring: &Ring, atom: NodeIndex) -> SmallVec<NodeIndex, 2> {
    mol.covalent_neighbors(atom)
        .into_iter()
        .filter(|&o| {
            mol[o].protons == 8
                && !ring.contains_atom(o)
                && mol.is_terminal(o)
                && mol[o].hydrogens() == 0
        })
        .collect()
}

/// Check for pyridinone and quinone forms. If the ring is one, its C=O bonds are fixed as
/// double and this returns true.
pub fn oxo_tautomer(mol: &mut Molecule, ws: &Workspace, ring: &Ring) -> Result<bool, SolveError> {
    let n = ring.len();
    let mut keto = SmallVec::<(NodeIndex, NodeIndex), 4>::new();
    let mut pyridinone = None;
    for (i, &c) in ring.atoms.iter().enumerate() {
        if mol[c].protons != 6 {
            continue;
        }
        for o in exocyclic_oxygens(mol, ring, c) {
            let d = mol.distance(c, o);
            let dev_co = d - ws.expected(mol, c, o, BondOrder::Double);
            if dev_co.abs() < (d - ws.expected(mol, c, o, BondOrder::Single)).abs() {
                keto.push((c, o));
            }
            for nb in [ring.atoms[(i + n - 1) % n], ring.atoms[(i + 1) % n]] {
                if mol[nb].protons != 7 {
                    continue;
                }
                let dev_cn = mol.distance(c, nb) - ws.expected(mol, c, nb, BondOrder::Aromatic);
                if dev_co < dev_cn - ws.config.oxo_margin {
                    pyridinone = Some((c, o));
                }
            }
        }
    }
    let doomed: SmallVec<(NodeIndex, NodeIndex), 4> = if keto.len() >= 2 {
        keto
    } else if let Some(pair) = pyridinone {
        [pair].into_iter().collect()
    } else {
        return Ok(false);
    };
    for (c, o) in doomed {
        let Some(bond) = mol.bond_between(c, o) else {
            continue;
        };
        if mol[bond].fixed {
            continue;
        }
        mol.fix_order(bond, BondOrder::Double)?;
        debug!(carbon = c.index(), oxygen = o.index(), "ring is in its oxo form");
    }
    Ok(true)
}

/// Find aromatic rings and settle their bonds. Returns how many rings couldn't be given a
/// Kekulé structure; their bonds are left delocalized.
#[instrument(level = "debug", skip_all)]
pub fn classify(
    mol: &mut Molecule,
    ws: &mut Workspace,
    resolver: &mut dyn Delocalizer,
) -> Result<usize, SolveError> {
    let rings: Vec<Ring> = ws.rings(mol).sized(3, 7).map(|(_, r)| r.clone()).collect();
    let mut kept = Vec::new();
    let mut mask = BondMask::new();
    for ring in rings {
        if !is_candidate(mol, ws, &ring) {
            continue;
        }
        if oxo_tautomer(mol, ws, &ring)? {
            continue;
        }
        for &bond in &ring.bonds {
            mask.insert(bond);
        }
        kept.push(ring);
    }
    debug!(rings = kept.len(), bonds = mask.len(), "aromatic candidates");

    let mut unresolved = 0;
    for comp in mask.components(mol) {
        match resolver.resolve(mol, &comp) {
            Some(orders) => {
                for (bond, order) in orders {
                    mol.fix_order(bond, order)?;
                    mol[bond].aromatic = true;
                }
            }
            None => {
                let rings = kept
                    .iter()
                    .filter(|r| r.bonds.iter().any(|&b| comp.contains(b)))
                    .count();
                warn!(rings, bonds = comp.len(), "couldn't find a Kekulé structure");
                for bond in comp.iter() {
                    mol.set_order(bond, BondOrder::Aromatic)?;
                    mol[bond].aromatic = true;
                }
                unresolved += rings;
                ws.report.diagnostics += 1;
            }
        }
    }
    ws.report.unresolved_rings += unresolved;
    Ok(unresolved)
}
