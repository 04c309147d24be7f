//! Valence and charge correction, run after bond orders are assigned.

use crate::core::*;
use crate::geom::free_direction;
use crate::molecule::Molecule;
use crate::solver::{SolveError, Workspace};
use petgraph::prelude::*;
use smallvec::SmallVec;
use std::f64::consts::FRAC_PI_4;
use tracing::*;

/// Run every correction: valence, metal-ligand charges, and residual charge.
#[instrument(level = "debug", skip_all)]
pub fn correct(mol: &mut Molecule, ws: &mut Workspace) -> Result<(), SolveError> {
    fix_valences(mol, ws)?;
    audit_metal_ligands(mol);
    distribute_charge(mol, ws.config.metal_charge_cap);
    Ok(())
}

/// A neutral nitrogen with four single bonds (hydrogens included).
fn is_quaternary_nitrogen(mol: &Molecule, atom: NodeIndex) -> bool {
    let a = &mol[atom];
    a.protons == 7
        && a.charge == 0
        && mol.connections(atom, true) == 4
        && mol
            .graph
            .edges(atom)
            .all(|e| matches!(e.weight().order, BondOrder::Single | BondOrder::MetalLigand))
}

/// Bring over-valent atoms back in line: quaternary nitrogens become ammonium, everything else
/// loses bond orders. Returns how many changes were made.
pub fn fix_valences(mol: &mut Molecule, ws: &mut Workspace) -> Result<usize, SolveError> {
    let mut changes = 0;
    loop {
        let mut progressed = false;
        for atom in mol.atoms().collect::<Vec<_>>() {
            if !mol.is_over_valent(atom) || mol[atom].valence_override().is_some() {
                continue;
            }
            if is_quaternary_nitrogen(mol, atom) {
                mol[atom].charge = 1;
                let oxide = mol.bonds_of(atom).find(|&(e, o)| {
                    mol[e].order == BondOrder::Single
                        && mol[o].protons == 8
                        && mol[o].charge == 0
                        && mol.is_terminal(o)
                        && mol[o].hydrogens() == 0
                });
                if let Some((_, o)) = oxide {
                    mol[o].charge = -1;
                }
                debug!(atom = atom.index(), oxide = oxide.is_some(), "quaternary nitrogen");
                progressed = true;
                changes += 1;
                continue;
            }
            if let Some(bond) = demotion_target(mol, ws, atom) {
                let order = mol[bond].order;
                let lower = BondOrder::from_units(order.units() - 1).unwrap_or(BondOrder::Single);
                debug!(atom = atom.index(), bond = bond.index(), from = %order, to = %lower, "demoted a bond");
                mol.set_order(bond, lower)?;
                ws.report.changed_bonds += 1;
                progressed = true;
                changes += 1;
            }
        }
        if !progressed {
            break;
        }
    }
    for atom in mol.atoms() {
        if mol.is_over_valent(atom) && mol[atom].valence_override().is_none() {
            warn!(atom = atom.index(), "valence still exceeded");
            ws.report.diagnostics += 1;
        }
    }
    Ok(changes)
}

/// The non-final multiple bond on `atom` stretched the furthest past its expected length.
/// Ties go to a neighbor that's within its own valence.
fn demotion_target(mol: &Molecule, ws: &Workspace, atom: NodeIndex) -> Option<EdgeIndex> {
    mol.bonds_of(atom)
        .filter(|&(e, _)| !mol[e].fixed && mol[e].order.is_multiple())
        .map(|(e, n)| {
            let stretch = mol.bond_length(e) - ws.expected_bond(mol, e, mol[e].order);
            (e, stretch, !mol.is_over_valent(n))
        })
        .max_by(|x, y| x.1.total_cmp(&y.1).then(x.2.cmp(&y.2)))
        .map(|(e, ..)| e)
}

/// Whether an oxygen bonded to a metal would rather be an anion.
fn acidic_oxygen(mol: &Molecule, atom: NodeIndex) -> bool {
    let partners: SmallVec<NodeIndex, 4> = mol
        .covalent_neighbors(atom)
        .into_iter()
        .filter(|&n| !mol[n].is_metal())
        .collect();
    match partners[..] {
        [] => true,
        [center] => {
            matches!(mol[center].protons, 6 | 7 | 15 | 16)
                && mol.covalent_neighbors(center).iter().any(|&o| {
                    o != atom && mol[o].protons == 8 && mol.is_terminal(o)
                })
        }
        _ => false,
    }
}

/// Give ligands that donate to a metal the negative charge they'd carry as free ions.
#[instrument(level = "debug", skip_all)]
pub fn audit_metal_ligands(mol: &mut Molecule) -> usize {
    let mut changed = 0;
    for atom in mol.atoms().collect::<Vec<_>>() {
        let a = &mol[atom];
        if a.is_metal() || a.charge != 0 || !mol.has_metal_bond(atom) {
            continue;
        }
        if mol.free_valence(atom) < 1 {
            continue;
        }
        let protons = a.protons;
        let reason = if protons == 8 && acidic_oxygen(mol, atom) {
            "acidic oxygen"
        } else if protons == 6 && cyanide_carbon(mol, atom) {
            "cyanide carbon"
        } else if a.hydrogens() > 0
            && hydrogen_collides(mol, atom)
            && mol[atom].remove_hydrogen()
        {
            "hydrogen in the way of the metal"
        } else {
            continue;
        };
        mol[atom].charge = -1;
        trace!(atom = atom.index(), reason, "charged a ligand");
        changed += 1;
    }
    changed
}

fn cyanide_carbon(mol: &Molecule, atom: NodeIndex) -> bool {
    let nb = mol.covalent_neighbors(atom);
    let [n] = nb[..] else {
        return false;
    };
    mol[n].protons == 7
        && mol
            .bond_between(atom, n)
            .map_or(false, |b| mol[b].order == BondOrder::Triple)
}

/// Whether the direction an implicit hydrogen would point is within 45° of a metal bond.
fn hydrogen_collides(mol: &Molecule, atom: NodeIndex) -> bool {
    let center = mol.pos(atom);
    let bonded: SmallVec<_, 4> = mol
        .covalent_neighbors(atom)
        .into_iter()
        .map(|n| mol.pos(n))
        .collect();
    let Some(dir) = free_direction(center, &bonded) else {
        return false;
    };
    mol.bonds_of(atom)
        .filter(|&(e, _)| mol[e].order.is_metal_ligand())
        .any(|(_, m)| {
            let to_metal = mol.pos(m) - center;
            to_metal.length_squared() > 0.0 && dir.angle_between(to_metal) < FRAC_PI_4
        })
}

/// Push negative charge left over after every other pass onto metals, so the formal charges
/// add up to the molecule's net charge.
#[instrument(level = "debug", skip_all)]
pub fn distribute_charge(mol: &mut Molecule, cap: i8) -> i16 {
    let residual = mol.formal_charge() - mol.charge;
    if residual >= 0 {
        return 0;
    }
    let metals: SmallVec<NodeIndex, 4> = mol.atoms().filter(|&a| mol[a].is_metal()).collect();
    if metals.is_empty() {
        return 0;
    }
    let mut need = -residual;
    let same_element = metals.iter().all(|&m| mol[m].protons == mol[metals[0]].protons);
    if metals.len() == 1 {
        let m = &mut mol[metals[0]];
        let take = need.min(cap as i16 - m.charge as i16).max(0);
        m.charge += take as i8;
        need -= take;
    } else if same_element && need % metals.len() as i16 == 0 {
        let share = need / metals.len() as i16;
        for &m in &metals {
            let m = &mut mol[m];
            let take = share.min(cap as i16 - m.charge as i16).max(0);
            m.charge += take as i8;
            need -= take;
        }
    } else {
        'outer: while need > 0 {
            let mut any = false;
            for &m in &metals {
                let atom = &mut mol[m];
                let limit = atom.elem().max_ox.min(cap);
                if atom.charge >= limit {
                    continue;
                }
                atom.charge += 1;
                need -= 1;
                any = true;
                if need == 0 {
                    break 'outer;
                }
            }
            if !any {
                break;
            }
        }
    }
    if need > 0 {
        warn!(left = need, "metals couldn't absorb all of the charge");
    }
    debug!(absorbed = -residual - need, "distributed charge to metals");
    -residual - need
}
