//! Smallest set of smallest rings over the ordinary bonds of a molecule.
//!
//! Candidates are Horton's: from every ring atom, a breadth-first tree is grown, and each bond
//! whose ends hang off different branches of the tree closes a cycle through the root. The
//! candidates are then taken smallest-first, keeping each one that is independent (over GF(2), as
//! a set of bonds) of those already kept, until there are as many rings as the cycle space has
//! dimensions.

use crate::molecule::Molecule;
use crate::utils::bitset::BitSet;
use ahash::AHashSet;
use petgraph::prelude::*;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;
use std::collections::VecDeque;
use tracing::*;

type EdgeSet = BitSet<usize, 2>;

/// A ring, as atoms in cyclic order. `bonds[i]` joins `atoms[i]` and `atoms[i + 1]`, wrapping
/// around at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    pub atoms: SmallVec<NodeIndex, 8>,
    pub bonds: SmallVec<EdgeIndex, 8>,
}
impl Ring {
    pub fn len(&self) -> usize {
        self.atoms.len()
    }
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
    pub fn contains_atom(&self, atom: NodeIndex) -> bool {
        self.atoms.contains(&atom)
    }
    pub fn contains_bond(&self, bond: EdgeIndex) -> bool {
        self.bonds.contains(&bond)
    }
    /// Position of an atom in the ring.
    pub fn position(&self, atom: NodeIndex) -> Option<usize> {
        self.atoms.iter().position(|&a| a == atom)
    }
}

/// Find the number of independent cycles by counting the edges that aren't in a spanning forest.
pub fn num_cycles(mol: &Molecule) -> usize {
    let mut union = UnionFind::new(mol.atom_count());
    let mut out = 0;
    for edge in mol.graph.edge_references() {
        if edge.weight().order.is_metal_ligand() {
            continue;
        }
        if !union.union(edge.source().index(), edge.target().index()) {
            out += 1;
        }
    }
    out
}

/// Rings of a molecule, with per-atom and per-bond membership.
#[derive(Debug, Clone, Default)]
pub struct RingSet {
    rings: Vec<Ring>,
    atom_rings: Vec<SmallVec<u16, 4>>,
    bond_rings: Vec<SmallVec<u16, 4>>,
    topology: Option<u64>,
}
impl RingSet {
    /// Perceive the rings of the current bond graph. Metal-ligand bonds are ignored.
    #[instrument(level = "debug", skip_all, fields(atoms = mol.atom_count(), bonds = mol.bond_count()))]
    pub fn perceive(mol: &Molecule) -> Self {
        let target = num_cycles(mol);
        let mut this = Self {
            rings: Vec::with_capacity(target),
            atom_rings: vec![SmallVec::new(); mol.atom_count()],
            bond_rings: vec![SmallVec::new(); mol.bond_count()],
            topology: Some(mol.topology()),
        };
        if target == 0 {
            return this;
        }

        let mut candidates: Vec<(EdgeSet, Ring)> = Vec::new();
        let mut seen = AHashSet::new();
        let mut tree = Tree::new(mol);
        for root in mol.atoms() {
            if !tree.core[root.index()] {
                continue;
            }
            tree.grow(mol, root);
            for i in 0..tree.reached.len() {
                let atom = tree.reached[i];
                for (bond, next) in mol.bonds_of(atom) {
                    // each bond once, from its lower end
                    if next < atom || mol[bond].order.is_metal_ligand() {
                        continue;
                    }
                    let Some(ring) = tree.cycle(mol, bond) else {
                        continue;
                    };
                    let mut key: Vec<usize> = ring.bonds.iter().map(|e| e.index()).collect();
                    key.sort_unstable();
                    if seen.insert(key) {
                        let set = ring.bonds.iter().map(|e| e.index()).collect();
                        candidates.push((set, ring));
                    }
                }
            }
        }
        candidates.sort_by_key(|(_, r)| r.len());
        trace!(candidates = candidates.len(), "ring candidates");

        // reduced basis, keyed by lowest set bit
        let mut basis: Vec<(usize, EdgeSet)> = Vec::with_capacity(target);
        for (set, ring) in candidates {
            if this.rings.len() == target {
                break;
            }
            let mut reduced = set;
            loop {
                let Some(pivot) = reduced.first_one() else {
                    trace!(size = ring.len(), "dependent ring candidate");
                    break;
                };
                if let Some(i) = basis.iter().position(|(p, _)| *p == pivot) {
                    reduced ^= &basis[i].1;
                } else {
                    basis.push((pivot, reduced));
                    this.push(ring);
                    break;
                }
            }
        }
        if this.rings.len() < target {
            debug!(
                found = this.rings.len(),
                target, "couldn't complete the ring basis"
            );
        }
        this
    }

    fn push(&mut self, ring: Ring) {
        let idx = self.rings.len() as u16;
        for a in &ring.atoms {
            self.atom_rings[a.index()].push(idx);
        }
        for b in &ring.bonds {
            self.bond_rings[b.index()].push(idx);
        }
        self.rings.push(ring);
    }

    /// Whether this was perceived from the molecule's current topology.
    pub fn is_current(&self, mol: &Molecule) -> bool {
        self.topology == Some(mol.topology())
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
    pub fn iter(&self) -> std::slice::Iter<'_, Ring> {
        self.rings.iter()
    }
    pub fn get(&self, idx: usize) -> Option<&Ring> {
        self.rings.get(idx)
    }

    /// Indices of the rings containing an atom.
    pub fn atom_rings(&self, atom: NodeIndex) -> &[u16] {
        self.atom_rings
            .get(atom.index())
            .map(|r| r.as_slice())
            .unwrap_or(&[])
    }
    /// Indices of the rings containing a bond.
    pub fn bond_rings(&self, bond: EdgeIndex) -> &[u16] {
        self.bond_rings
            .get(bond.index())
            .map(|r| r.as_slice())
            .unwrap_or(&[])
    }
    pub fn in_ring(&self, atom: NodeIndex) -> bool {
        !self.atom_rings(atom).is_empty()
    }
    pub fn bond_in_ring(&self, bond: EdgeIndex) -> bool {
        !self.bond_rings(bond).is_empty()
    }
    /// Rings with between `min` and `max` atoms, inclusive.
    pub fn sized(&self, min: usize, max: usize) -> impl Iterator<Item = (usize, &Ring)> {
        self.rings
            .iter()
            .enumerate()
            .filter(move |(_, r)| (min..=max).contains(&r.len()))
    }
}
impl<'a> IntoIterator for &'a RingSet {
    type Item = &'a Ring;
    type IntoIter = std::slice::Iter<'a, Ring>;

    fn into_iter(self) -> Self::IntoIter {
        self.rings.iter()
    }
}

/// A breadth-first tree over ordinary bonds, reused between roots. Only atoms that survive
/// stripping away chain ends are walked, since nothing else can be in a ring.
struct Tree {
    core: Vec<bool>,
    parent: Vec<Option<(NodeIndex, EdgeIndex)>>,
    seen: Vec<bool>,
    reached: Vec<NodeIndex>,
    queue: VecDeque<NodeIndex>,
}
impl Tree {
    fn new(mol: &Molecule) -> Self {
        let n = mol.atom_count();
        let mut degree: Vec<usize> = mol.atoms().map(|a| mol.connections(a, false)).collect();
        let mut core = vec![true; n];
        let mut ends: Vec<NodeIndex> = mol.atoms().filter(|a| degree[a.index()] < 2).collect();
        while let Some(atom) = ends.pop() {
            if !core[atom.index()] {
                continue;
            }
            core[atom.index()] = false;
            for (bond, next) in mol.bonds_of(atom) {
                if mol[bond].order.is_metal_ligand() || !core[next.index()] {
                    continue;
                }
                degree[next.index()] -= 1;
                if degree[next.index()] < 2 {
                    ends.push(next);
                }
            }
        }
        Self {
            core,
            parent: vec![None; n],
            seen: vec![false; n],
            reached: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    fn grow(&mut self, mol: &Molecule, root: NodeIndex) {
        for atom in self.reached.drain(..) {
            self.parent[atom.index()] = None;
            self.seen[atom.index()] = false;
        }
        self.queue.clear();
        self.seen[root.index()] = true;
        self.reached.push(root);
        self.queue.push_back(root);
        while let Some(atom) = self.queue.pop_front() {
            for edge in mol.graph.edges(atom) {
                if edge.weight().order.is_metal_ligand() {
                    continue;
                }
                let next = if edge.source() == atom {
                    edge.target()
                } else {
                    edge.source()
                };
                if !self.core[next.index()] || self.seen[next.index()] {
                    continue;
                }
                self.seen[next.index()] = true;
                self.parent[next.index()] = Some((atom, edge.id()));
                self.reached.push(next);
                self.queue.push_back(next);
            }
        }
    }

    /// Atoms from `atom` up to the root, and the bonds between them.
    fn path(&self, atom: NodeIndex) -> (SmallVec<NodeIndex, 8>, SmallVec<EdgeIndex, 8>) {
        let mut atoms = SmallVec::<NodeIndex, 8>::new();
        let mut bonds = SmallVec::<EdgeIndex, 8>::new();
        let mut cur = atom;
        atoms.push(cur);
        while let Some((prev, bond)) = self.parent[cur.index()] {
            bonds.push(bond);
            atoms.push(prev);
            cur = prev;
        }
        (atoms, bonds)
    }

    /// The cycle `closing` makes with the tree paths from its ends to the root, if those paths
    /// only meet at the root.
    fn cycle(&self, mol: &Molecule, closing: EdgeIndex) -> Option<Ring> {
        let (x, y) = mol.endpoints(closing);
        if !self.seen[x.index()] || !self.seen[y.index()] {
            return None;
        }
        let (mut atoms, mut bonds) = self.path(x);
        let (back_atoms, back_bonds) = self.path(y);
        if bonds.contains(&closing) || back_bonds.contains(&closing) {
            return None;
        }
        let shared = atoms[..atoms.len() - 1]
            .iter()
            .any(|a| back_atoms.contains(a));
        if shared {
            return None;
        }
        // x up to the root, then down to y; the closing bond joins y back to x
        atoms.extend(back_atoms.iter().rev().skip(1).copied());
        bonds.extend(back_bonds.iter().rev().copied());
        bonds.push(closing);
        Some(Ring { atoms, bonds })
    }
}
