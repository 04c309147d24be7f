//! Hybridization from local geometry, and torsion flags for bonds

use crate::config::Config;
use crate::core::*;
use crate::geom::{angle, dihedral, planar_deviation, planarity};
use crate::molecule::Molecule;
use glam::DVec3;
use petgraph::prelude::*;
use smallvec::SmallVec;
use tracing::*;

/// How the substituents on either side of a bond are arranged around it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Torsion {
    /// Some dihedral across the bond is too far from planar for a π bond.
    pub out_of_plane: bool,
    /// Every dihedral across the bond that could be measured is close to planar.
    pub flat: bool,
}

/// Estimate the hybridization of a single atom from its ordinary bonds. Metal-ligand bonds
/// don't count.
pub fn hybridization_of(mol: &Molecule, atom: NodeIndex, config: &Config) -> Hybridization {
    let center = mol.pos(atom);
    let neighbors: SmallVec<DVec3, 6> = mol
        .covalent_neighbors(atom)
        .into_iter()
        .map(|n| mol.pos(n))
        .collect();
    match neighbors[..] {
        [] => Hybridization::Unknown,
        [_] if mol[atom].protons == 8 => Hybridization::Sp2,
        [_] => Hybridization::Sp1,
        [a, b] => {
            if angle(a, center, b) > config.linear_angle {
                Hybridization::Sp1
            } else {
                Hybridization::Sp2
            }
        }
        [a, b, c] => {
            let score = planarity(center, &[a, b, c]);
            if score >= config.sp2_planarity {
                Hybridization::Sp2
            } else if score < config.sp3_planarity {
                Hybridization::Sp3
            } else {
                Hybridization::Unknown
            }
        }
        [_, _, _, _] => Hybridization::Sp3,
        [_, _, _, _, _] => Hybridization::Sp3d,
        _ => Hybridization::Sp3d2,
    }
}

/// Hybridizations for every atom.
#[instrument(level = "debug", skip_all)]
pub fn estimate(mol: &Molecule, config: &Config) -> Vec<Hybridization> {
    let out: Vec<_> = mol
        .atoms()
        .map(|a| hybridization_of(mol, a, config))
        .collect();
    trace!(?out, "estimated hybridizations");
    out
}

/// Torsion flags for every bond, indexed by bond.
#[instrument(level = "debug", skip_all)]
pub fn torsion_flags(mol: &Molecule, config: &Config) -> Vec<Torsion> {
    mol.bonds()
        .map(|bond| {
            if mol[bond].order.is_metal_ligand() {
                return Torsion::default();
            }
            bond_torsion(mol, bond, config)
        })
        .collect()
}

fn bond_torsion(mol: &Molecule, bond: EdgeIndex, config: &Config) -> Torsion {
    let (a, b) = mol.endpoints(bond);
    let xs: SmallVec<NodeIndex, 6> = mol
        .covalent_neighbors(a)
        .into_iter()
        .filter(|&x| x != b)
        .collect();
    let ys: SmallVec<NodeIndex, 6> = mol
        .covalent_neighbors(b)
        .into_iter()
        .filter(|&y| y != a)
        .collect();
    if xs.is_empty() || ys.is_empty() {
        return Torsion::default();
    }
    let (pa, pb) = (mol.pos(a), mol.pos(b));
    let mut tested = 0;
    let mut out = Torsion::default();
    for &x in &xs {
        let px = mol.pos(x);
        // no torsion is defined through a linear angle
        if angle(px, pa, pb) > config.linear_angle {
            continue;
        }
        for &y in &ys {
            let py = mol.pos(y);
            if angle(pa, pb, py) > config.linear_angle {
                continue;
            }
            tested += 1;
            if planar_deviation(dihedral(px, pa, pb, py)) > config.torsion_limit {
                out.out_of_plane = true;
            }
        }
    }
    out.flat = tested > 0 && !out.out_of_plane;
    out
}

/// Fill in undetermined hybridizations from the bond orders.
pub fn refine(mol: &Molecule, hybrid: &mut [Hybridization]) {
    for atom in mol.atoms() {
        let Some(slot) = hybrid.get_mut(atom.index()) else {
            continue;
        };
        if slot.is_known() || mol.connections(atom, false) == 0 {
            continue;
        }
        let mut doubles = 0;
        let mut triple = false;
        let mut delocalized = false;
        for e in mol.graph.edges(atom) {
            match e.weight().order {
                BondOrder::Double => doubles += 1,
                BondOrder::Triple => triple = true,
                BondOrder::Aromatic => delocalized = true,
                _ => {}
            }
        }
        *slot = if triple || doubles >= 2 {
            Hybridization::Sp1
        } else if doubles == 1 || delocalized {
            Hybridization::Sp2
        } else {
            Hybridization::Sp3
        };
        trace!(atom = atom.index(), hybridization = %slot, "refined");
    }
}
