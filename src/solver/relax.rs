//! Statistical bond order relaxation.
//!
//! Bonds that nothing else has settled are visited in a random order, and each gets whichever
//! order it has valence for whose expected length is closest to its actual length. This repeats
//! until a round goes by without changes.

use super::{SolveError, Workspace};
use crate::atom_info::pi_capable;
use crate::core::*;
use crate::molecule::Molecule;
use petgraph::prelude::*;
use rand::prelude::*;
use smallvec::SmallVec;
use tracing::*;

/// Free valence of an atom if `bond` were single.
fn free_without(mol: &Molecule, atom: NodeIndex, bond: EdgeIndex) -> i16 {
    mol.free_valence(atom) + mol[bond].order.units() as i16 - 1
}

fn eligible(mol: &Molecule, ws: &Workspace, bond: EdgeIndex) -> bool {
    let data = &mol[bond];
    if data.fixed || data.aromatic || data.order.is_metal_ligand() || ws.is_decided(bond) {
        return false;
    }
    let (a, b) = mol.endpoints(bond);
    pi_capable(mol[a].protons) && pi_capable(mol[b].protons)
}

/// The order a bond should have, given the valence its atoms have left.
pub fn classify(mol: &Molecule, ws: &Workspace, bond: EdgeIndex) -> BondOrder {
    let (a, b) = mol.endpoints(bond);
    let (fa, fb) = (free_without(mol, a, bond), free_without(mol, b, bond));
    let (ha, hb) = (ws.hybrid[a.index()], ws.hybrid[b.index()]);
    let mut options = SmallVec::<BondOrder, 3>::new();
    options.push(BondOrder::Single);
    if fa >= 1 && fb >= 1 && ha != Hybridization::Sp3 && hb != Hybridization::Sp3 {
        options.push(BondOrder::Double);
    }
    if fa >= 2 && fb >= 2 && ha == Hybridization::Sp1 && hb == Hybridization::Sp1 {
        options.push(BondOrder::Triple);
    }
    if options.len() == 1 {
        return BondOrder::Single;
    }
    let length = mol.bond_length(bond);
    options
        .into_iter()
        .map(|o| (o, (ws.expected(mol, a, b, o) - length).abs()))
        .min_by(|x, y| x.1.total_cmp(&y.1))
        .map_or(BondOrder::Single, |(o, _)| o)
}

/// Relax bond orders until they stop changing, or the round limit is hit. Returns the number of
/// changes in the last round.
#[instrument(level = "debug", skip_all)]
pub fn relax<R: Rng + ?Sized>(
    mol: &mut Molecule,
    ws: &mut Workspace,
    rng: &mut R,
) -> Result<usize, SolveError> {
    // keeps the per-bond caches in step with the bonds
    ws.rings(mol);
    let mut changes = 0;
    for round in 0..ws.config.relax_rounds {
        let mut bonds: Vec<EdgeIndex> = mol.bonds().filter(|&b| eligible(mol, ws, b)).collect();
        bonds.shuffle(rng);
        changes = 0;
        for bond in bonds {
            let order = classify(mol, ws, bond);
            if order != mol[bond].order {
                trace!(bond = bond.index(), from = %mol[bond].order, to = %order, "relaxed");
                mol.set_order(bond, order)?;
                changes += 1;
            }
            if order.is_multiple() {
                ws.decided[bond.index()] = true;
            }
        }
        ws.report.rounds = round + 1;
        ws.report.changed_bonds += changes;
        if changes == 0 {
            break;
        }
    }
    ws.report.last_round_changes = changes;
    debug!(rounds = ws.report.rounds, changes, "relaxation done");
    Ok(changes)
}

/// Give a double bond to sp2 carbons that ended up without one, pairing each with the
/// neighbor whose bond is shortest relative to a single bond.
#[instrument(level = "debug", skip_all)]
pub fn forgotten_doubles(mol: &mut Molecule, ws: &mut Workspace) -> Result<usize, SolveError> {
    let mut fixed = 0;
    for atom in mol.atoms().collect::<Vec<_>>() {
        if mol[atom].protons != 6
            || ws.hybrid[atom.index()] != Hybridization::Sp2
            || mol.pi_electrons(atom) != 0
            || mol.free_valence(atom) < 1
        {
            continue;
        }
        let best = mol
            .bonds_of(atom)
            .filter(|&(e, n)| {
                let data = &mol[e];
                !data.fixed
                    && !data.aromatic
                    && !data.order.is_metal_ligand()
                    && !ws.out_of_plane(e)
                    && pi_capable(mol[n].protons)
                    && mol.free_valence(n) >= 1
            })
            .map(|(e, _)| {
                let single = ws.expected_bond(mol, e, BondOrder::Single);
                (e, mol.bond_length(e) / single)
            })
            .min_by(|x, y| x.1.total_cmp(&y.1));
        if let Some((bond, ratio)) = best {
            trace!(atom = atom.index(), bond = bond.index(), ratio, "forgotten double bond");
            mol.set_order(bond, BondOrder::Double)?;
            ws.decided[bond.index()] = true;
            fixed += 1;
        }
    }
    ws.report.changed_bonds += fixed;
    Ok(fixed)
}
