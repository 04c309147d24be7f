//! Functional groups whose orders and charges are known outright.
//!
//! Rules are tried in priority order. Each is keyed on the central atom's element and its
//! number of ordinary bonds, and only runs if none of the bonds it would set are final yet, so
//! running the solver again over its own output leaves everything in place.

use super::{SolveError, Workspace};
use crate::atom_info::{is_chalcogen, ElemGroup};
use crate::core::*;
use crate::geom::angle;
use crate::graph::walk::GraphWalker;
use crate::molecule::Molecule;
use petgraph::prelude::*;
use smallvec::SmallVec;
use std::f64::consts::PI;
use std::ops::RangeInclusive;
use tracing::*;

type Rule = fn(&mut Molecule, &mut Workspace<'_>, NodeIndex) -> Result<bool, SolveError>;

/// A rule: the central elements it applies to (empty for any), the range of ordinary bonds the
/// center may have, the rule itself, and a name for the logs.
struct Entry {
    elements: &'static [u8],
    conn: RangeInclusive<usize>,
    rule: Rule,
    name: &'static str,
}

static RULES: &[Entry] = &[
    Entry {
        elements: &[],
        conn: 0..=6,
        rule: hexafluoride,
        name: "hexafluoride",
    },
    Entry {
        elements: &[17, 35, 53],
        conn: 3..=4,
        rule: halogen_oxoanion,
        name: "halogen oxoanion",
    },
    Entry {
        elements: &[16],
        conn: 1..=6,
        rule: sulfonyl,
        name: "sulfonyl",
    },
    Entry {
        elements: &[15],
        conn: 1..=6,
        rule: phosphoryl,
        name: "phosphoryl",
    },
    Entry {
        elements: &[7],
        conn: 3..=3,
        rule: nitro,
        name: "nitro",
    },
    Entry {
        elements: &[6],
        conn: 2..=3,
        rule: carboxylate,
        name: "carboxylate",
    },
    Entry {
        elements: &[6],
        conn: 1..=1,
        rule: cyanide,
        name: "cyanide",
    },
    Entry {
        elements: &[6],
        conn: 2..=2,
        rule: cyanate,
        name: "cyanate",
    },
    Entry {
        elements: &[7],
        conn: 1..=1,
        rule: azide,
        name: "azide",
    },
    Entry {
        elements: &[7],
        conn: 2..=2,
        rule: nitroso,
        name: "nitroso",
    },
    Entry {
        elements: &[79],
        conn: 0..=0,
        rule: linear_gold,
        name: "linear gold",
    },
];

/// Apply every matching rule. Returns how many groups were matched.
#[instrument(level = "debug", skip_all)]
pub fn apply(mol: &mut Molecule, ws: &mut Workspace) -> Result<usize, SolveError> {
    let mut matched = ring_ions(mol, ws)?;
    for entry in RULES {
        for atom in mol.atoms().collect::<Vec<_>>() {
            let protons = mol[atom].protons;
            if !entry.elements.is_empty() && !entry.elements.contains(&protons) {
                continue;
            }
            if !entry.conn.contains(&mol.connections(atom, false)) {
                continue;
            }
            if (entry.rule)(mol, ws, atom)? {
                debug!(atom = atom.index(), group = entry.name, "matched a known group");
                matched += 1;
            }
        }
    }
    ws.report.groups += matched;
    Ok(matched)
}

/// Terminal oxygens (no other bonds, no hydrogens) on an atom, closest first.
fn terminal_oxygens(mol: &Molecule, atom: NodeIndex) -> SmallVec<(EdgeIndex, NodeIndex), 4> {
    let mut out: SmallVec<(EdgeIndex, NodeIndex), 4> = mol
        .bonds_of(atom)
        .filter(|&(e, o)| {
            !mol[e].order.is_metal_ligand()
                && mol[o].protons == 8
                && mol.is_terminal(o)
                && mol[o].hydrogens() == 0
        })
        .collect();
    out.sort_by(|x, y| mol.bond_length(x.0).total_cmp(&mol.bond_length(y.0)));
    out
}

fn any_final(mol: &Molecule, bonds: impl IntoIterator<Item = EdgeIndex>) -> bool {
    bonds.into_iter().any(|b| mol[b].fixed)
}

/// Give the closest `doubles` oxygens a double bond and the rest a single bond and a negative
/// charge.
fn oxo_pattern(
    mol: &mut Molecule,
    oxygens: &[(EdgeIndex, NodeIndex)],
    doubles: usize,
) -> Result<(), SolveError> {
    for (i, &(bond, o)) in oxygens.iter().enumerate() {
        if i < doubles {
            mol.fix_order(bond, BondOrder::Double)?;
        } else {
            mol.fix_order(bond, BondOrder::Single)?;
            mol[o].charge = -1;
        }
    }
    Ok(())
}

/// XF6: the fluorines are single bonded and the center takes whatever charge its element needs.
fn hexafluoride(
    mol: &mut Molecule,
    _ws: &mut Workspace,
    atom: NodeIndex,
) -> Result<bool, SolveError> {
    let bonds: SmallVec<EdgeIndex, 6> = mol
        .bonds_of(atom)
        .filter(|&(_, n)| mol[n].protons == 9)
        .map(|(e, _)| e)
        .collect();
    if bonds.len() != 6 || mol.degree(atom) != 6 || any_final(mol, bonds.iter().copied()) {
        return Ok(false);
    }
    for &bond in &bonds {
        if !mol[bond].order.is_metal_ligand() {
            mol.fix_order(bond, BondOrder::Single)?;
        }
    }
    let center = &mut mol[atom];
    center.charge = match center.protons {
        15 | 33 | 51 => -1,
        14 | 32 | 50 => -2,
        // SF6, SeF6, TeF6, XeF6
        16 | 34 | 52 | 54 => 0,
        _ if center.elem().group == ElemGroup::Trans => -2,
        _ => 0,
    };
    if !center.is_metal() {
        center.set_valence_override(Some(6))?;
    }
    Ok(true)
}

/// Perchlorate and friends: three X=O, the rest single and negative.
fn halogen_oxoanion(
    mol: &mut Molecule,
    _ws: &mut Workspace,
    atom: NodeIndex,
) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    if oxygens.len() < 3 || any_final(mol, oxygens.iter().map(|o| o.0)) {
        return Ok(false);
    }
    oxo_pattern(mol, &oxygens, 3)?;
    Ok(true)
}

/// Sulfoxides, sulfones, sulfonates, and sulfates: up to two S=O, the rest negative.
fn sulfonyl(mol: &mut Molecule, _ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    if oxygens.is_empty() || any_final(mol, oxygens.iter().map(|o| o.0)) {
        return Ok(false);
    }
    oxo_pattern(mol, &oxygens, 2)?;
    Ok(true)
}

/// Phosphates, phosphonates, and phosphine oxides: one P=O, the rest negative.
fn phosphoryl(
    mol: &mut Molecule,
    _ws: &mut Workspace,
    atom: NodeIndex,
) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    if oxygens.is_empty() || any_final(mol, oxygens.iter().map(|o| o.0)) {
        return Ok(false);
    }
    oxo_pattern(mol, &oxygens, 1)?;
    Ok(true)
}

/// Nitro groups and nitrate: one N=O, a positive nitrogen, the rest negative.
fn nitro(mol: &mut Molecule, _ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    if oxygens.len() < 2 || any_final(mol, oxygens.iter().map(|o| o.0)) {
        return Ok(false);
    }
    oxo_pattern(mol, &oxygens, 1)?;
    mol[atom].charge = 1;
    Ok(true)
}

/// Carboxylates and carbonate: one C=O, the rest negative. Linear O-C-O is carbon dioxide.
fn carboxylate(
    mol: &mut Molecule,
    ws: &mut Workspace,
    atom: NodeIndex,
) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    if oxygens.len() < 2 || any_final(mol, oxygens.iter().map(|o| o.0)) {
        return Ok(false);
    }
    if let [(_, o1), (_, o2)] = oxygens[..] {
        let linear = angle(mol.pos(o1), mol.pos(atom), mol.pos(o2)) > ws.config.linear_angle;
        if linear && mol.connections(atom, false) == 2 {
            oxo_pattern(mol, &oxygens, 2)?;
            return Ok(true);
        }
    }
    oxo_pattern(mol, &oxygens, 1)?;
    Ok(true)
}

/// The only ordinary bond on `atom`, if it has exactly one.
fn sole_bond(mol: &Molecule, atom: NodeIndex) -> Option<(EdgeIndex, NodeIndex)> {
    let mut it = mol
        .bonds_of(atom)
        .filter(|&(e, _)| !mol[e].order.is_metal_ligand());
    let first = it.next()?;
    it.next().is_none().then_some(first)
}

/// Free cyanide: a lone C-N pair.
fn cyanide(mol: &mut Molecule, _ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let Some((bond, n)) = sole_bond(mol, atom) else {
        return Ok(false);
    };
    if mol[n].protons != 7 || !mol.is_terminal(n) || mol[bond].fixed {
        return Ok(false);
    }
    mol.fix_order(bond, BondOrder::Triple)?;
    mol[atom].charge = -1;
    Ok(true)
}

/// Linear X-C-N with a chalcogen X: cyanate and thiocyanate ions, or isocyanates and
/// isothiocyanates if the nitrogen has a substituent.
fn cyanate(mol: &mut Molecule, ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let nb: SmallVec<(EdgeIndex, NodeIndex), 2> = mol
        .bonds_of(atom)
        .filter(|&(e, _)| !mol[e].order.is_metal_ligand())
        .collect();
    let (Some(&(cn, n)), Some(&(cx, x))) = (
        nb.iter().find(|p| mol[p.1].protons == 7),
        nb.iter().find(|p| matches!(mol[p.1].protons, 8 | 16)),
    ) else {
        return Ok(false);
    };
    if !mol.is_terminal(x) || mol[x].hydrogens() > 0 || any_final(mol, [cn, cx]) {
        return Ok(false);
    }
    if angle(mol.pos(n), mol.pos(atom), mol.pos(x)) <= ws.config.linear_angle {
        return Ok(false);
    }
    match mol.connections(n, false) {
        1 => {
            mol.fix_order(cn, BondOrder::Triple)?;
            mol.fix_order(cx, BondOrder::Single)?;
            mol[x].charge = -1;
        }
        2 => {
            mol.fix_order(cn, BondOrder::Double)?;
            mol.fix_order(cx, BondOrder::Double)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// Azide ions and groups, walked from the terminal nitrogen.
///
/// Of the two resonance forms, the one whose N-N lengths fit better wins: `N=N=N` with the
/// charges spread out, or `N#N-N` with them piled on the far end.
fn azide(mol: &mut Molecule, ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let Some(walk) = GraphWalker::new(atom)
        .max_depth(2)
        .extend(|mol, _, bond, next| {
            mol[next].protons == 7 && !mol[bond].order.is_metal_ligand()
        })
        .terminate(|_, path| path.len() == 3)
        .run(mol)
    else {
        return Ok(false);
    };
    let [end, center, inner] = walk.atoms[..] else {
        return Ok(false);
    };
    let [outer_bond, inner_bond] = walk.bonds[..] else {
        return Ok(false);
    };
    if mol.connections(center, false) != 2 || any_final(mol, [outer_bond, inner_bond]) {
        return Ok(false);
    }
    // the terminal nitrogen is bare and the chain is straight at the center
    if mol[end].hydrogens() > 0
        || angle(mol.pos(end), mol.pos(center), mol.pos(inner)) <= ws.config.linear_angle
    {
        return Ok(false);
    }
    let ion = mol.is_terminal(inner) && mol[inner].hydrogens() == 0;
    if !ion && mol.connections(inner, true) != 2 {
        return Ok(false);
    }
    // only handle an ion once, from its lower numbered end
    if ion && inner < end {
        return Ok(false);
    }
    let d_outer = mol.bond_length(outer_bond);
    let d_inner = mol.bond_length(inner_bond);
    let double = ws.expected(mol, end, center, BondOrder::Double);
    let triple = ws.expected(mol, end, center, BondOrder::Triple);
    let single = ws.expected(mol, end, center, BondOrder::Single);

    let cumulated = (d_outer - double).abs() + (d_inner - double).abs();
    if ion {
        // the triple bond goes to whichever end is closer
        let (t, s, t_end, s_end) = if d_outer <= d_inner {
            (outer_bond, inner_bond, end, inner)
        } else {
            (inner_bond, outer_bond, inner, end)
        };
        let split =
            (mol.bond_length(t) - triple).abs() + (mol.bond_length(s) - single).abs();
        if cumulated <= split {
            mol.fix_order(outer_bond, BondOrder::Double)?;
            mol.fix_order(inner_bond, BondOrder::Double)?;
            mol[end].charge = -1;
            mol[inner].charge = -1;
        } else {
            mol.fix_order(t, BondOrder::Triple)?;
            mol.fix_order(s, BondOrder::Single)?;
            mol[t_end].charge = 0;
            mol[s_end].charge = -2;
        }
    } else {
        let split = (d_outer - triple).abs() + (d_inner - single).abs();
        if cumulated <= split {
            mol.fix_order(outer_bond, BondOrder::Double)?;
            mol.fix_order(inner_bond, BondOrder::Double)?;
            mol[end].charge = -1;
        } else {
            mol.fix_order(outer_bond, BondOrder::Triple)?;
            mol.fix_order(inner_bond, BondOrder::Single)?;
            mol[inner].charge = -1;
        }
    }
    mol[center].charge = 1;
    Ok(true)
}

/// R-N=O
fn nitroso(mol: &mut Molecule, _ws: &mut Workspace, atom: NodeIndex) -> Result<bool, SolveError> {
    let oxygens = terminal_oxygens(mol, atom);
    let [(bond, _)] = oxygens[..] else {
        return Ok(false);
    };
    if mol.heavy_connections(atom) != 2 || mol[bond].fixed {
        return Ok(false);
    }
    mol.fix_order(bond, BondOrder::Double)?;
    Ok(true)
}

/// Gold(I) sits in linear two-coordination.
fn linear_gold(
    mol: &mut Molecule,
    _ws: &mut Workspace,
    atom: NodeIndex,
) -> Result<bool, SolveError> {
    if mol[atom].charge != 0 {
        return Ok(false);
    }
    let ligands: SmallVec<NodeIndex, 2> = mol.neighbors(atom).collect();
    let [a, b] = ligands[..] else {
        return Ok(false);
    };
    if angle(mol.pos(a), mol.pos(atom), mol.pos(b)) <= 0.9 * PI {
        return Ok(false);
    }
    mol[atom].charge = 1;
    Ok(true)
}

/// Isolated four-rings of a single chalcogen or pnictogen, like S4²⁺. The bonds are
/// delocalized, and chalcogen rings carry +1 on two opposite atoms.
///
/// A chain of four chalcogens laid out as a square but missing its closing bond can't be made
/// sense of, and is an error.
fn ring_ions(mol: &mut Molecule, ws: &mut Workspace) -> Result<usize, SolveError> {
    let isolated = |mol: &Molecule, atoms: &[NodeIndex]| {
        let z = mol[atoms[0]].protons;
        atoms.iter().all(|&a| {
            mol[a].protons == z
                && mol.covalent_neighbors(a).iter().all(|n| atoms.contains(n))
        })
    };

    let rings: Vec<_> = ws.rings(mol).sized(4, 4).map(|(_, r)| r.clone()).collect();
    let mut matched = 0;
    for ring in rings {
        let z = mol[ring.atoms[0]].protons;
        let ionic = (is_chalcogen(z) && z != 8) || matches!(z, 7 | 15);
        if !ionic || !isolated(mol, &ring.atoms[..]) {
            continue;
        }
        if any_final(mol, ring.bonds.iter().copied()) {
            continue;
        }
        for &bond in &ring.bonds {
            mol.fix_order(bond, BondOrder::Aromatic)?;
            mol[bond].aromatic = true;
        }
        if is_chalcogen(z) {
            mol[ring.atoms[0]].charge = 1;
            mol[ring.atoms[2]].charge = 1;
        }
        debug!(element = z, "four-membered ring ion");
        matched += 1;
    }

    // open chains that should have been rings
    for start in mol.atoms() {
        let z = mol[start].protons;
        if !is_chalcogen(z) || z == 8 || !mol.is_terminal(start) {
            continue;
        }
        let Some(walk) = GraphWalker::new(start)
            .max_depth(3)
            .extend(move |mol, _, bond, next| {
                mol[next].protons == z && !mol[bond].order.is_metal_ligand()
            })
            .terminate(|_, path| path.len() == 4)
            .run(mol)
        else {
            continue;
        };
        let end = walk.last();
        if !mol.is_terminal(end) || !isolated(mol, &walk.atoms[..]) {
            continue;
        }
        let mean = walk.bonds.iter().map(|&b| mol.bond_length(b)).sum::<f64>() / 3.0;
        if mol.distance(start, end) <= mean * 1.25 {
            return Err(SolveError::Topology {
                atom: start.index(),
                reason: "expected a bond closing a four-membered chalcogen ring",
            });
        }
    }
    Ok(matched)
}
