//! Connectivity from coordinates.
//!
//! Two atoms are bonded if they're closer than the sum of their covalent radii plus a tolerance.
//! Organic atoms go first and get ordinary single bonds, then implausible small rings from that
//! are cleaned up, and then metals are bonded to whatever is in range with metal-ligand bonds.

use crate::atom_info::elem;
use crate::config::Config;
use crate::core::*;
use crate::geom::{dihedral, planar_deviation};
use crate::graph::rings::RingSet;
use crate::molecule::Molecule;
use crate::spatial::SpatialIndex;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use petgraph::prelude::*;
use thiserror::Error;
use tracing::*;

use PerceptionErrorKind::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PerceptionErrorKind {
    #[error("atom {atom} already has the maximum of {max} neighbors")]
    MaxValence { atom: usize, max: u8 },
}

/// A bond that should have been made, couldn't be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("couldn't bond atoms {} and {}: {kind}", .atoms.0, .atoms.1)]
pub struct PerceptionError {
    pub atoms: (usize, usize),
    pub kind: PerceptionErrorKind,
}
impl PerceptionError {
    pub const fn new(atoms: (usize, usize), kind: PerceptionErrorKind) -> Self {
        Self { atoms, kind }
    }
}

/// Create bonds from distances, with the default configuration. See [`create_bonds_with`].
pub fn create_bonds(mol: &mut Molecule, lenient: bool) -> Result<usize, PerceptionError> {
    create_bonds_with(mol, lenient, &Config::default())
}

/// Create bonds between every pair of atoms close enough to be bonded, returning how many bonds
/// the molecule gained.
///
/// An atom that would be bonded past its element's neighbor limit is an error, unless `lenient`
/// is set, in which case the offending bond is skipped. The molecule keeps whatever bonds were
/// made before an error.
#[instrument(level = "debug", skip_all, fields(atoms = mol.atom_count(), lenient = lenient))]
pub fn create_bonds_with(
    mol: &mut Molecule,
    lenient: bool,
    config: &Config,
) -> Result<usize, PerceptionError> {
    let before = mol.bond_count();
    let index = SpatialIndex::from_molecule(mol, config.grid_width);

    let organic = contacts(mol, &index, config, |a, b| {
        !a.is_metal() && !b.is_metal() && !(a.protons == 1 && b.protons == 1)
    });
    for (d, a, b) in organic {
        if try_bond(mol, a, b, Bond::single(), lenient)? {
            trace!(a = a.index(), b = b.index(), d, "organic bond");
        }
    }
    clean_small_rings(mol, config);

    let metal = contacts(mol, &index, config, |a, b| a.is_metal() || b.is_metal());
    for (d, a, b) in metal {
        if try_bond(mol, a, b, Bond::metal(), lenient)? {
            trace!(a = a.index(), b = b.index(), d, "metal contact");
        }
    }
    let hapto = complete_hapto(mol, config);
    prune_loose_contacts(mol, config, &hapto);

    let made = mol.bond_count().saturating_sub(before);
    debug!(made, "created bonds");
    Ok(made)
}

/// Every pair accepted by `filter` within bonding distance, closest first.
fn contacts(
    mol: &Molecule,
    index: &SpatialIndex,
    config: &Config,
    filter: impl Fn(&Atom, &Atom) -> bool,
) -> Vec<(f64, NodeIndex, NodeIndex)> {
    let max_radius = mol
        .graph
        .node_weights()
        .map(|a| a.elem().radius)
        .fold(0.0f32, f32::max);
    let mut out = Vec::new();
    for a in mol.atoms() {
        let ra = mol[a].elem().radius;
        if ra <= 0.0 {
            continue;
        }
        let reach = config.cutoff(ra, max_radius);
        for j in index.within(mol.pos(a), reach, true) {
            let b = NodeIndex::new(j);
            if b <= a || !filter(&mol[a], &mol[b]) {
                continue;
            }
            let rb = mol[b].elem().radius;
            if rb <= 0.0 || mol.bond_between(a, b).is_some() {
                continue;
            }
            let d = mol.distance(a, b);
            if d <= config.cutoff(ra, rb) {
                out.push((d, a, b));
            }
        }
    }
    out.sort_by(|x, y| x.0.total_cmp(&y.0));
    out
}

/// Add a bond if neither atom is full. For metal-ligand bonds, only the metals' limits apply.
fn try_bond(
    mol: &mut Molecule,
    a: NodeIndex,
    b: NodeIndex,
    bond: Bond,
    lenient: bool,
) -> Result<bool, PerceptionError> {
    for (atom, other) in [(a, b), (b, a)] {
        if bond.order.is_metal_ligand() && !mol[atom].is_metal() {
            continue;
        }
        let max = mol[atom].elem().max_conn;
        if mol.degree(atom) >= max as usize {
            let err = PerceptionError::new(
                (a.index(), b.index()),
                MaxValence {
                    atom: atom.index(),
                    max,
                },
            );
            if lenient {
                warn!(skipped = other.index(), "{err}");
                return Ok(false);
            }
            return Err(err);
        }
    }
    mol.add_bond(a, b, bond);
    Ok(true)
}

/// Remove bonds that close chemically implausible three-rings.
#[instrument(level = "debug", skip_all)]
fn clean_small_rings(mol: &mut Molecule, config: &Config) {
    let rings = RingSet::perceive(mol);
    let mut doomed = Vec::new();
    let tri: Vec<_> = rings.sized(3, 3).map(|(_, r)| r.clone()).collect();

    // two three-rings sharing a bond that lie flat are really a four-ring with a diagonal
    for (r1, r2) in tri.iter().tuple_combinations() {
        let Some(&shared) = r1.bonds.iter().find(|b| r2.contains_bond(**b)) else {
            continue;
        };
        let (x, y) = mol.endpoints(shared);
        let Some(&p) = r1.atoms.iter().find(|&&a| a != x && a != y) else {
            continue;
        };
        let Some(&q) = r2.atoms.iter().find(|&&a| a != x && a != y) else {
            continue;
        };
        let torsion = dihedral(mol.pos(p), mol.pos(x), mol.pos(y), mol.pos(q));
        if planar_deviation(torsion) >= config.flat_ring_dihedral {
            continue;
        }
        let victim = match mol.bond_between(p, q) {
            Some(other) if mol.bond_length(other) > mol.bond_length(shared) => other,
            _ => shared,
        };
        info!(
            bond = victim.index(),
            length = mol.bond_length(victim),
            "removing the diagonal of a flat four-ring"
        );
        doomed.push(victim);
    }

    for ring in &tri {
        let phos: Vec<_> = ring.atoms.iter().filter(|&&a| mol[a].protons == 15).collect();
        if let [&p1, &p2] = phos[..] {
            if mol.distance(p1, p2) > config.diphosphorus_cutoff {
                if let Some(bond) = mol.bond_between(p1, p2) {
                    debug!(length = mol.distance(p1, p2), "removing a long P-P bond");
                    doomed.push(bond);
                }
            }
        }
        for &h in &ring.atoms {
            if mol[h].protons != 1 {
                continue;
            }
            if let Some(bond) = longer_hydrogen_bond(mol, h) {
                info!(
                    hydrogen = h.index(),
                    length = mol.bond_length(bond),
                    "removing the longer bond of a bridging hydrogen"
                );
                doomed.push(bond);
            }
        }
    }

    // any other hydrogen with two partners keeps the closer one, except boron hydride bridges
    for h in mol.atoms() {
        if mol[h].protons != 1 || mol.degree(h) != 2 || rings.in_ring(h) {
            continue;
        }
        if mol.neighbors(h).any(|n| mol[n].protons == 5) {
            continue;
        }
        if let Some(bond) = longer_hydrogen_bond(mol, h) {
            debug!(hydrogen = h.index(), "hydrogen had two partners");
            doomed.push(bond);
        }
    }

    doomed.sort_unstable();
    doomed.dedup();
    mol.remove_bonds(&doomed);
}

fn longer_hydrogen_bond(mol: &Molecule, h: NodeIndex) -> Option<EdgeIndex> {
    let bonds: Vec<_> = mol
        .bonds_of(h)
        .filter(|&(_, n)| mol[n].protons != 1)
        .map(|(e, _)| e)
        .collect();
    match bonds[..] {
        [b1, b2] => Some(if mol.bond_length(b1) >= mol.bond_length(b2) {
            b1
        } else {
            b2
        }),
        _ => None,
    }
}

/// Finish π-coordination: a metal bonded to most of a ring gets bonded to all of it. Returns
/// the (metal, ring atom) pairs that are part of such a ring.
#[instrument(level = "debug", skip_all)]
fn complete_hapto(mol: &mut Molecule, config: &Config) -> AHashSet<(NodeIndex, NodeIndex)> {
    let rings = RingSet::perceive(mol);
    let mut out = AHashSet::new();
    let metals: Vec<_> = mol.atoms().filter(|&a| mol[a].is_metal()).collect();
    for m in metals {
        for ring in &rings {
            let bonded = ring
                .atoms
                .iter()
                .filter(|&&a| mol.bond_between(m, a).is_some())
                .count();
            if bonded * 2 <= ring.len() {
                continue;
            }
            let rm = mol[m].elem().radius;
            for &a in &ring.atoms {
                out.insert((m, a));
                if mol.bond_between(m, a).is_some() {
                    continue;
                }
                let reach = config.cutoff(rm, mol[a].elem().radius) + config.hapto_slack;
                if mol.distance(m, a) <= reach {
                    trace!(
                        metal = m.index(),
                        atom = a.index(),
                        "completing a π-coordinated ring"
                    );
                    mol.add_bond(m, a, Bond::metal());
                }
            }
        }
    }
    out
}

/// Drop metal contacts much longer than the metal's closest contact to the same element.
#[instrument(level = "debug", skip_all)]
fn prune_loose_contacts(
    mol: &mut Molecule,
    config: &Config,
    hapto: &AHashSet<(NodeIndex, NodeIndex)>,
) {
    let mut doomed = Vec::new();
    for m in mol.atoms().filter(|&a| mol[a].is_metal()) {
        let contacts: Vec<_> = mol
            .bonds_of(m)
            .filter(|&(e, n)| mol[e].order.is_metal_ligand() && !hapto.contains(&(m, n)))
            .map(|(e, n)| (e, mol[n].protons, mol.bond_length(e)))
            .collect();
        let mut shortest = AHashMap::<u8, f64>::new();
        for &(_, z, d) in &contacts {
            let s = shortest.entry(z).or_insert(d);
            *s = s.min(d);
        }
        for (e, z, d) in contacts {
            if d > shortest[&z] + config.metal_contact_slack {
                debug!(
                    metal = m.index(),
                    ligand = elem(z).sym,
                    length = d,
                    "removing a loose metal contact"
                );
                doomed.push(e);
            }
        }
    }
    doomed.sort_unstable();
    doomed.dedup();
    mol.remove_bonds(&doomed);
}
