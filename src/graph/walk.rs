//! Depth-first path walks with backtracking.

use crate::molecule::Molecule;
use petgraph::prelude::*;
use smallvec::SmallVec;

/// A simple path through the bond graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Walk {
    /// Atoms in the order they were visited, starting at the root.
    pub atoms: SmallVec<NodeIndex, 8>,
    /// `bonds[i]` joins `atoms[i]` and `atoms[i + 1]`.
    pub bonds: SmallVec<EdgeIndex, 8>,
    pub score: f64,
}
impl Walk {
    pub fn len(&self) -> usize {
        self.bonds.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
    pub fn last(&self) -> NodeIndex {
        self.atoms[self.atoms.len() - 1]
    }
}

type Extend<'a> = Box<dyn FnMut(&Molecule, &[NodeIndex], EdgeIndex, NodeIndex) -> bool + 'a>;
type Terminate<'a> = Box<dyn FnMut(&Molecule, &[NodeIndex]) -> bool + 'a>;
type Score<'a> = Box<dyn FnMut(&Molecule, &[NodeIndex], &[EdgeIndex]) -> f64 + 'a>;

/// Walks every simple path out of a root, keeping the best scoring one that terminated.
///
/// A path stops growing as soon as `terminate` accepts it, and is then scored. With
/// `dead_ends`, paths that can't grow any further (or hit the depth limit) are scored too.
pub struct GraphWalker<'a> {
    root: NodeIndex,
    first: Option<NodeIndex>,
    max_depth: usize,
    dead_ends: bool,
    extend: Extend<'a>,
    terminate: Terminate<'a>,
    score: Score<'a>,
}
impl<'a> GraphWalker<'a> {
    pub fn new(root: NodeIndex) -> Self {
        Self {
            root,
            first: None,
            max_depth: usize::MAX,
            dead_ends: false,
            extend: Box::new(|_, _, _, _| true),
            terminate: Box::new(|_, _| false),
            score: Box::new(|_, _, bonds| bonds.len() as f64),
        }
    }
    /// Force the first step to go to `atom`.
    pub fn first_step(mut self, atom: NodeIndex) -> Self {
        self.first = Some(atom);
        self
    }
    /// Longest path, in bonds.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
    pub fn dead_ends(mut self, dead_ends: bool) -> Self {
        self.dead_ends = dead_ends;
        self
    }
    /// Whether the path may continue over `bond` to the atom after it.
    pub fn extend(
        mut self,
        f: impl FnMut(&Molecule, &[NodeIndex], EdgeIndex, NodeIndex) -> bool + 'a,
    ) -> Self {
        self.extend = Box::new(f);
        self
    }
    pub fn terminate(mut self, f: impl FnMut(&Molecule, &[NodeIndex]) -> bool + 'a) -> Self {
        self.terminate = Box::new(f);
        self
    }
    /// Higher is better. Defaults to the path length.
    pub fn score(
        mut self,
        f: impl FnMut(&Molecule, &[NodeIndex], &[EdgeIndex]) -> f64 + 'a,
    ) -> Self {
        self.score = Box::new(f);
        self
    }

    /// Run the walk. Ties keep the path found first.
    pub fn run(mut self, mol: &Molecule) -> Option<Walk> {
        let mut state = State {
            atoms: SmallVec::new(),
            bonds: SmallVec::new(),
            on_path: vec![false; mol.atom_count()],
            best: None,
        };
        state.atoms.push(self.root);
        state.on_path[self.root.index()] = true;
        if let Some(first) = self.first {
            let bond = mol.bond_between(self.root, first)?;
            if !(self.extend)(mol, &state.atoms[..], bond, first) {
                return None;
            }
            state.atoms.push(first);
            state.bonds.push(bond);
            state.on_path[first.index()] = true;
        }
        self.step(mol, &mut state);
        state.best
    }

    fn step(&mut self, mol: &Molecule, state: &mut State) {
        if !state.bonds.is_empty() && (self.terminate)(mol, &state.atoms[..]) {
            self.record(mol, state);
            return;
        }
        let mut grew = false;
        if state.bonds.len() < self.max_depth {
            let tip = state.atoms[state.atoms.len() - 1];
            let next: SmallVec<(EdgeIndex, NodeIndex), 6> = mol.bonds_of(tip).collect();
            for (bond, atom) in next {
                if state.on_path[atom.index()] {
                    continue;
                }
                if !(self.extend)(mol, &state.atoms[..], bond, atom) {
                    continue;
                }
                grew = true;
                state.atoms.push(atom);
                state.bonds.push(bond);
                state.on_path[atom.index()] = true;
                self.step(mol, state);
                state.on_path[atom.index()] = false;
                state.bonds.pop();
                state.atoms.pop();
            }
        }
        if !grew && self.dead_ends {
            self.record(mol, state);
        }
    }

    fn record(&mut self, mol: &Molecule, state: &mut State) {
        let score = (self.score)(mol, &state.atoms[..], &state.bonds[..]);
        if state.best.as_ref().map_or(true, |b| score > b.score) {
            state.best = Some(Walk {
                atoms: state.atoms.clone(),
                bonds: state.bonds.clone(),
                score,
            });
        }
    }
}

struct State {
    atoms: SmallVec<NodeIndex, 8>,
    bonds: SmallVec<EdgeIndex, 8>,
    on_path: Vec<bool>,
    best: Option<Walk>,
}

/// The longest simple path from `root` over bonds that `filter` accepts.
pub fn longest_path(
    mol: &Molecule,
    root: NodeIndex,
    mut filter: impl FnMut(EdgeIndex, NodeIndex) -> bool,
) -> Walk {
    GraphWalker::new(root)
        .dead_ends(true)
        .extend(move |_, _, bond, atom| filter(bond, atom))
        .run(mol)
        .unwrap_or_else(|| Walk {
            atoms: [root].into_iter().collect(),
            bonds: SmallVec::new(),
            score: 0.0,
        })
}
