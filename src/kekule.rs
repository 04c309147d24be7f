//! Kekulé structures for delocalized systems.
//!
//! A [`Delocalizer`] gets a set of bonds known to be aromatic and has to pick single and double
//! orders for them. The default, [`Aromatizer`], is a backtracking search that places one double
//! bond per atom wherever it can.

use crate::atom_info::{is_chalcogen, main_group};
use crate::config::Config;
use crate::core::BondOrder;
use crate::molecule::Molecule;
use crate::utils::bitset::BitSet;
use petgraph::prelude::*;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use tracing::*;

/// A set of bonds, by index.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BondMask(BitSet<usize, 2>);
impl BondMask {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn insert(&mut self, bond: EdgeIndex) {
        self.0.set(bond.index(), true);
    }
    pub fn remove(&mut self, bond: EdgeIndex) {
        self.0.set(bond.index(), false);
    }
    pub fn contains(&self, bond: EdgeIndex) -> bool {
        self.0.get(bond.index())
    }
    pub fn len(&self) -> usize {
        self.0.count_ones()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_zero()
    }
    pub fn iter(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.0.iter_ones().map(EdgeIndex::new)
    }

    /// Split into connected pieces.
    pub fn components(&self, mol: &Molecule) -> Vec<BondMask> {
        let mut union = UnionFind::new(mol.atom_count());
        for bond in self.iter() {
            let (a, b) = mol.endpoints(bond);
            union.union(a.index(), b.index());
        }
        let mut out: Vec<(usize, BondMask)> = Vec::new();
        for bond in self.iter() {
            let root = union.find(mol.endpoints(bond).0.index());
            match out.iter_mut().find(|(r, _)| *r == root) {
                Some((_, mask)) => mask.insert(bond),
                None => out.push((root, std::iter::once(bond).collect())),
            }
        }
        out.into_iter().map(|(_, m)| m).collect()
    }
}
impl FromIterator<EdgeIndex> for BondMask {
    fn from_iter<I: IntoIterator<Item = EdgeIndex>>(iter: I) -> Self {
        Self(iter.into_iter().map(|e| e.index()).collect())
    }
}

/// Something that can choose a Kekulé structure for a set of delocalized bonds.
pub trait Delocalizer {
    /// Orders for every bond in `mask`, or `None` if no acceptable structure was found.
    fn resolve(&mut self, mol: &Molecule, mask: &BondMask) -> Option<Vec<(EdgeIndex, BondOrder)>>;
}
impl<D: Delocalizer + ?Sized> Delocalizer for &mut D {
    fn resolve(&mut self, mol: &Molecule, mask: &BondMask) -> Option<Vec<(EdgeIndex, BondOrder)>> {
        D::resolve(self, mol, mask)
    }
}

/// Backtracking Kekulé search.
///
/// Each connected piece of the mask is solved separately, first strictly (only atoms with free
/// valence take double bonds, and only as many go without as parity forces), then relaxed (any
/// atom may take one, and one more may go without per independent cycle). Valence correction
/// cleans up after a relaxed result. Lone-pair donors, like pyrrole nitrogen or thiophene sulfur,
/// prefer going without.
#[derive(Debug, Clone)]
pub struct Aromatizer {
    pub step_budget: usize,
}
impl Aromatizer {
    pub fn new(config: &Config) -> Self {
        Self {
            step_budget: config.kekule_step_budget,
        }
    }
}
impl Default for Aromatizer {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
impl Delocalizer for Aromatizer {
    #[instrument(level = "debug", skip_all, fields(bonds = mask.len()))]
    fn resolve(&mut self, mol: &Molecule, mask: &BondMask) -> Option<Vec<(EdgeIndex, BondOrder)>> {
        let mut out = Vec::with_capacity(mask.len());
        for comp in mask.components(mol) {
            let system = System::new(mol, &comp);
            let parity = system.atoms.len() % 2;
            let cycles = (system.bonds.len() + 1).saturating_sub(system.atoms.len());
            let found = system
                .solve(parity, self.step_budget, true)
                .or_else(|| system.solve(parity + cycles, self.step_budget, false));
            let Some(double) = found else {
                debug!(
                    atoms = system.atoms.len(),
                    bonds = system.bonds.len(),
                    "no Kekulé structure found"
                );
                return None;
            };
            out.extend(system.bonds.iter().zip(double).map(|(b, d)| {
                (
                    b.id,
                    if d {
                        BondOrder::Double
                    } else {
                        BondOrder::Single
                    },
                )
            }));
        }
        Some(out)
    }
}

#[derive(Debug, Clone, Copy)]
struct SysBond {
    id: EdgeIndex,
    ends: [usize; 2],
}

#[derive(Debug)]
struct SysAtom {
    /// Can take a double bond.
    open: bool,
    /// Has a lone pair to put into the ring instead.
    donor: bool,
    /// (bond, other atom), local indices
    edges: SmallVec<(usize, usize), 4>,
}

/// One connected delocalized system, renumbered locally.
struct System {
    atoms: Vec<SysAtom>,
    bonds: Vec<SysBond>,
}

/// Search state, cloned at every branch.
#[derive(Clone)]
struct Snapshot {
    double: Vec<bool>,
    done: Vec<bool>,
    skips: usize,
}

impl System {
    fn new(mol: &Molecule, mask: &BondMask) -> Self {
        let mut nodes: Vec<NodeIndex> = Vec::new();
        let mut bonds = Vec::with_capacity(mask.len());
        for id in mask.iter() {
            let (a, b) = mol.endpoints(id);
            let mut local = |n: NodeIndex| match nodes.iter().position(|&x| x == n) {
                Some(i) => i,
                None => {
                    nodes.push(n);
                    nodes.len() - 1
                }
            };
            let ends = [local(a), local(b)];
            bonds.push(SysBond { id, ends });
        }
        let atoms = nodes
            .iter()
            .enumerate()
            .map(|(i, &n)| {
                let edges = bonds
                    .iter()
                    .enumerate()
                    .filter_map(|(bi, b)| match b.ends {
                        [x, y] if x == i => Some((bi, y)),
                        [x, y] if y == i => Some((bi, x)),
                        _ => None,
                    })
                    .collect::<SmallVec<_, 4>>();
                // free valence with the masked bonds counted as single
                let mut free = mol.free_valence(n);
                let mut delocalized = false;
                for (e, _) in mol.bonds_of(n) {
                    if mask.contains(e) {
                        let order = mol[e].order;
                        delocalized |= order == BondOrder::Aromatic;
                        free += order.units() as i16 - 1;
                    }
                }
                if delocalized {
                    free += 1;
                }
                let conn = mol.connections(n, true);
                let protons = mol[n].protons;
                let donor = (is_chalcogen(protons) && conn == 2)
                    || (main_group(protons) == 15 && conn == 3);
                SysAtom {
                    open: free >= 1,
                    donor,
                    edges,
                }
            })
            .collect();
        Self { atoms, bonds }
    }

    fn solve(&self, skips: usize, budget: usize, strict: bool) -> Option<Vec<bool>> {
        let start = Snapshot {
            double: vec![false; self.bonds.len()],
            done: vec![false; self.atoms.len()],
            skips,
        };
        let mut search = Search {
            system: self,
            strict,
            budget,
            steps: 0,
        };
        let found = search.step(start);
        trace!(strict, skips, steps = search.steps, found = found.is_some(), "Kekulé search");
        found.map(|s| s.double)
    }
}

/// One attempt at a system. A strict search only gives double bonds to atoms with free valence
/// left; a relaxed one treats every atom as open.
struct Search<'a> {
    system: &'a System,
    strict: bool,
    budget: usize,
    steps: usize,
}
impl Search<'_> {
    fn open(&self, atom: usize) -> bool {
        !self.strict || self.system.atoms[atom].open
    }

    /// Open neighbors of an atom that haven't been given a double bond yet.
    fn options(&self, snap: &Snapshot, atom: usize) -> SmallVec<(usize, usize), 4> {
        self.system.atoms[atom]
            .edges
            .iter()
            .copied()
            .filter(|&(_, n)| !snap.done[n] && self.open(n))
            .collect()
    }

    fn skip(&mut self, snap: &Snapshot, atom: usize) -> Option<Snapshot> {
        if snap.skips == 0 {
            return None;
        }
        let mut branch = snap.clone();
        branch.skips -= 1;
        branch.done[atom] = true;
        self.step(branch)
    }

    fn step(&mut self, snap: Snapshot) -> Option<Snapshot> {
        self.steps += 1;
        if self.steps > self.budget {
            return None;
        }
        // most constrained atom first, donors before everything else
        let next = (0..self.system.atoms.len())
            .filter(|&i| !snap.done[i])
            .min_by_key(|&i| {
                (
                    !self.system.atoms[i].donor,
                    self.open(i),
                    self.options(&snap, i).len(),
                )
            });
        let Some(atom) = next else {
            return Some(snap);
        };
        let open = self.open(atom);
        let donor = self.system.atoms[atom].donor;

        if !open || donor {
            if let Some(found) = self.skip(&snap, atom) {
                return Some(found);
            }
            if !open {
                return None;
            }
        }
        for (bond, other) in self.options(&snap, atom) {
            let mut branch = snap.clone();
            branch.double[bond] = true;
            branch.done[atom] = true;
            branch.done[other] = true;
            if let Some(found) = self.step(branch) {
                return Some(found);
            }
        }
        if donor {
            None
        } else {
            self.skip(&snap, atom)
        }
    }
}
