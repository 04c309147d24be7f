//! The molecule graph API that every pass works through

use crate::atom_info::main_group;
use crate::core::*;
use glam::DVec3;
use petgraph::prelude::*;
use smallvec::SmallVec;
use std::ops::{Index, IndexMut};
use thiserror::Error;

/// Something tried to address a bond in a way it can't be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum BondError {
    #[error("bond {0} between atoms {1} and {2} is final and can't be reassigned")]
    Final(usize, usize, usize),
    #[error("no bond exists between atoms {0} and {1}")]
    Missing(usize, usize),
}

/// A molecule: the bond graph, plus the net charge that formal charges have to add up to.
///
/// Every change to the set of bonds bumps the topology version, which the derived caches
/// compare against to know when they're stale. Order changes don't bump it, since nothing
/// cached depends on them.
#[derive(Debug, Clone, Default)]
pub struct Molecule {
    pub graph: MoleculeGraph,
    pub charge: i16,
    topology: u64,
}
impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn from_atoms(atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut this = Self::new();
        for atom in atoms {
            this.graph.add_node(atom);
        }
        this
    }

    pub fn add_atom(&mut self, atom: Atom) -> NodeIndex {
        self.graph.add_node(atom)
    }
    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }
    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }
    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> {
        self.graph.node_indices()
    }
    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> {
        self.graph.edge_indices()
    }

    /// The current topology version.
    pub fn topology(&self) -> u64 {
        self.topology
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: Bond) -> EdgeIndex {
        self.topology += 1;
        self.graph.add_edge(a, b, bond)
    }
    /// Delete every bond in `doomed`. Indices refer to the bonds as they were before the call;
    /// surviving bonds may be renumbered.
    pub fn remove_bonds(&mut self, doomed: &[EdgeIndex]) {
        if doomed.is_empty() {
            return;
        }
        self.topology += 1;
        self.graph.retain_edges(|_, e| !doomed.contains(&e));
    }
    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }
    pub fn endpoints(&self, bond: EdgeIndex) -> (NodeIndex, NodeIndex) {
        self.graph
            .edge_endpoints(bond)
            .unwrap_or_else(|| panic!("bond {} doesn't exist", bond.index()))
    }
    /// The atom on the other end of `bond`.
    pub fn other(&self, bond: EdgeIndex, atom: NodeIndex) -> NodeIndex {
        let (a, b) = self.endpoints(bond);
        if a == atom {
            b
        } else {
            a
        }
    }

    /// Set a bond's order, refusing if it's already final.
    pub fn set_order(&mut self, bond: EdgeIndex, order: BondOrder) -> Result<(), BondError> {
        let (a, b) = self.endpoints(bond);
        let data = &mut self.graph[bond];
        if data.fixed {
            return Err(BondError::Final(bond.index(), a.index(), b.index()));
        }
        data.order = order;
        Ok(())
    }
    /// Set a bond's order and mark it final.
    pub fn fix_order(&mut self, bond: EdgeIndex, order: BondOrder) -> Result<(), BondError> {
        self.set_order(bond, order)?;
        self.graph[bond].fixed = true;
        Ok(())
    }
    /// Set the order of the bond between two atoms and mark it final.
    pub fn fix_between(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        order: BondOrder,
    ) -> Result<EdgeIndex, BondError> {
        let bond = self
            .bond_between(a, b)
            .ok_or(BondError::Missing(a.index(), b.index()))?;
        self.fix_order(bond, order)?;
        Ok(bond)
    }

    pub fn neighbors(&self, atom: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(atom)
    }
    /// Bonds and the atoms they lead to.
    pub fn bonds_of(&self, atom: NodeIndex) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph.edges(atom).map(move |e| {
            let other = if e.source() == atom {
                e.target()
            } else {
                e.source()
            };
            (e.id(), other)
        })
    }
    /// Neighbors through ordinary, non-metal-ligand bonds.
    pub fn covalent_neighbors(&self, atom: NodeIndex) -> SmallVec<NodeIndex, 6> {
        self.bonds_of(atom)
            .filter(|&(e, _)| !self.graph[e].order.is_metal_ligand())
            .map(|(_, n)| n)
            .collect()
    }
    /// Every bonded neighbor, metal-ligand bonds included.
    pub fn degree(&self, atom: NodeIndex) -> usize {
        self.graph.edges(atom).count()
    }
    /// Number of ordinary bonds, optionally counting implicit hydrogens too.
    pub fn connections(&self, atom: NodeIndex, with_h: bool) -> usize {
        let bonds = self
            .graph
            .edges(atom)
            .filter(|e| !e.weight().order.is_metal_ligand())
            .count();
        if with_h {
            bonds + self.graph[atom].hydrogens() as usize
        } else {
            bonds
        }
    }
    /// Number of heavy (non-hydrogen) ordinary neighbors.
    pub fn heavy_connections(&self, atom: NodeIndex) -> usize {
        self.covalent_neighbors(atom)
            .iter()
            .filter(|&&n| self.graph[n].protons != 1)
            .count()
    }
    /// Terminal atoms have exactly one ordinary bond.
    pub fn is_terminal(&self, atom: NodeIndex) -> bool {
        self.connections(atom, false) == 1
    }
    pub fn has_metal_bond(&self, atom: NodeIndex) -> bool {
        self.graph
            .edges(atom)
            .any(|e| e.weight().order.is_metal_ligand())
    }
    fn has_delocalized(&self, atom: NodeIndex) -> bool {
        self.graph
            .edges(atom)
            .any(|e| e.weight().order == BondOrder::Aromatic)
    }

    /// Electrons committed to multiple bonds beyond their first unit.
    pub fn pi_electrons(&self, atom: NodeIndex) -> u8 {
        let localized: u8 = self
            .graph
            .edges(atom)
            .map(|e| e.weight().order.units().saturating_sub(1))
            .sum();
        localized + self.has_delocalized(atom) as u8
    }
    /// Valence in use: bond units plus implicit hydrogens. Metal-ligand bonds don't count.
    pub fn occupied_valence(&self, atom: NodeIndex) -> u8 {
        let bonds: u8 = self
            .graph
            .edges(atom)
            .map(|e| e.weight().order.units())
            .sum();
        bonds + self.graph[atom].hydrogens() + self.has_delocalized(atom) as u8
    }
    /// The most valence this atom may use, given its element, charge, and radical state.
    pub fn allowed_valence(&self, atom: NodeIndex) -> u8 {
        let atom = &self.graph[atom];
        if let Some(v) = atom.valence_override() {
            return v;
        }
        let base = atom.elem().valence as i16;
        let charge = atom.charge as i16;
        let adjusted = match main_group(atom.protons) {
            13 => base - charge,
            14 => base - charge.abs(),
            // a lone pair becomes a bond per positive charge, and a bond a lone pair per negative
            15..=17 if base <= 3 => base + charge,
            // expanded octets only grow
            15..=17 => base + (-charge).max(0),
            _ => base,
        };
        (adjusted - atom.radical().electrons() as i16).clamp(0, 15) as u8
    }
    /// Valence left before the atom exceeds its allowed valence. Negative if it's already over.
    pub fn free_valence(&self, atom: NodeIndex) -> i16 {
        self.allowed_valence(atom) as i16 - self.occupied_valence(atom) as i16
    }
    pub fn is_over_valent(&self, atom: NodeIndex) -> bool {
        self.free_valence(atom) < 0
    }

    pub fn pos(&self, atom: NodeIndex) -> DVec3 {
        self.graph[atom].pos
    }
    pub fn distance(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        self.pos(a).distance(self.pos(b))
    }
    pub fn bond_length(&self, bond: EdgeIndex) -> f64 {
        let (a, b) = self.endpoints(bond);
        self.distance(a, b)
    }

    /// Sum of formal charges.
    pub fn formal_charge(&self) -> i16 {
        self.graph
            .node_weights()
            .map(|a| a.charge as i16)
            .sum()
    }
}
impl Index<NodeIndex> for Molecule {
    type Output = Atom;

    fn index(&self, index: NodeIndex) -> &Atom {
        &self.graph[index]
    }
}
impl IndexMut<NodeIndex> for Molecule {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Atom {
        &mut self.graph[index]
    }
}
impl Index<EdgeIndex> for Molecule {
    type Output = Bond;

    fn index(&self, index: EdgeIndex) -> &Bond {
        &self.graph[index]
    }
}
impl IndexMut<EdgeIndex> for Molecule {
    fn index_mut(&mut self, index: EdgeIndex) -> &mut Bond {
        &mut self.graph[index]
    }
}
