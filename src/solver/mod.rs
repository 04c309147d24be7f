//! Bond order and charge assignment.
//!
//! Everything here works on a molecule that already has its connectivity, usually from
//! [`create_bonds`](crate::perceive::create_bonds). The passes run in order: hybridization,
//! aromatic rings, known functional groups, statistical relaxation of whatever is left, valence
//! and charge correction, and finally filling in hybridizations that geometry couldn't settle.

use crate::aromatic;
use crate::config::Config;
use crate::core::*;
use crate::graph::rings::RingSet;
use crate::hybrid::{self, Torsion};
use crate::kekule::{Aromatizer, Delocalizer};
use crate::molecule::{BondError, Molecule};
use crate::perceive::{create_bonds_with, PerceptionError};
use crate::stats::*;
use crate::valence;
use petgraph::prelude::*;
use rand::prelude::*;
use thiserror::Error;
use tracing::*;

pub mod groups;
pub mod relax;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    #[error(transparent)]
    Bond(#[from] BondError),
    #[error("unexpected topology at atom {atom}: {reason}")]
    Topology { atom: usize, reason: &'static str },
    #[error(transparent)]
    Perception(#[from] PerceptionError),
    #[error(transparent)]
    Valence(#[from] BadValence),
}

/// What a run did, for callers that want to know how good the result is.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SolveReport {
    /// Relaxation rounds that ran.
    pub rounds: usize,
    /// Order changes in the last relaxation round. Zero means it reached a fixpoint.
    pub last_round_changes: usize,
    /// Order changes across every pass.
    pub changed_bonds: usize,
    /// Functional groups matched by a known rule.
    pub groups: usize,
    /// Aromatic rings left delocalized without a Kekulé structure.
    pub unresolved_rings: usize,
    /// Warnings raised along the way.
    pub diagnostics: usize,
}

/// State derived from the molecule for the length of one run.
pub struct Workspace<'a> {
    pub config: &'a Config,
    pub table: &'a dyn BondLengthTable,
    rings: RingSet,
    /// Hybridization for each atom.
    pub hybrid: Vec<Hybridization>,
    /// Torsion flags for each bond.
    pub torsion: Vec<Torsion>,
    /// Bonds that relaxation has settled as multiple.
    pub decided: Vec<bool>,
    pub report: SolveReport,
}
impl<'a> Workspace<'a> {
    pub fn new(mol: &Molecule, config: &'a Config, table: &'a dyn BondLengthTable) -> Self {
        Self {
            config,
            table,
            rings: RingSet::perceive(mol),
            hybrid: hybrid::estimate(mol, config),
            torsion: hybrid::torsion_flags(mol, config),
            decided: vec![false; mol.bond_count()],
            report: SolveReport::default(),
        }
    }

    /// The rings of the molecule, perceived again if bonds were added or removed since.
    pub fn rings(&mut self, mol: &Molecule) -> &RingSet {
        if !self.rings.is_current(mol) {
            debug!("ring cache is stale");
            self.rings = RingSet::perceive(mol);
            self.torsion = hybrid::torsion_flags(mol, self.config);
            self.decided.resize(mol.bond_count(), false);
        }
        &self.rings
    }

    /// Expected length of a bond of `order` between two atoms in their current state.
    pub fn expected(&self, mol: &Molecule, a: NodeIndex, b: NodeIndex, order: BondOrder) -> f64 {
        expected_length(self.table, &BondLengthKey::between(mol, a, b, order), self.config)
    }
    pub fn expected_bond(&self, mol: &Molecule, bond: EdgeIndex, order: BondOrder) -> f64 {
        let (a, b) = mol.endpoints(bond);
        self.expected(mol, a, b, order)
    }

    pub fn out_of_plane(&self, bond: EdgeIndex) -> bool {
        self.torsion
            .get(bond.index())
            .map_or(false, |t| t.out_of_plane)
    }
    pub fn is_decided(&self, bond: EdgeIndex) -> bool {
        self.decided.get(bond.index()).copied().unwrap_or(false)
    }
}

/// Assign bond orders and charges with the default configuration, length table, and Kekulé
/// search.
pub fn calculate_bond_orders<R: Rng + ?Sized>(
    mol: &mut Molecule,
    rng: &mut R,
) -> Result<SolveReport, SolveError> {
    let config = Config::default();
    calculate_bond_orders_with(
        mol,
        rng,
        &config,
        &StandardLengths::new(),
        &mut Aromatizer::new(&config),
    )
}

/// Assign bond orders, formal charges, and hybridizations to a bonded molecule.
///
/// On error, the molecule is left as far as the passes got.
#[instrument(level = "debug", skip_all, fields(atoms = mol.atom_count(), bonds = mol.bond_count()))]
pub fn calculate_bond_orders_with<R: Rng + ?Sized>(
    mol: &mut Molecule,
    rng: &mut R,
    config: &Config,
    table: &dyn BondLengthTable,
    resolver: &mut dyn Delocalizer,
) -> Result<SolveReport, SolveError> {
    let mut ws = Workspace::new(mol, config, table);

    aromatic::classify(mol, &mut ws, resolver)?;
    groups::apply(mol, &mut ws)?;
    relax::relax(mol, &mut ws, rng)?;
    relax::forgotten_doubles(mol, &mut ws)?;
    valence::correct(mol, &mut ws)?;
    hybrid::refine(mol, &mut ws.hybrid);

    debug!(report = ?ws.report, "assigned bond orders");
    Ok(ws.report)
}

/// The hybridizations the solver ends up with, for callers that want them after a run.
pub fn hybridizations(mol: &Molecule, config: &Config) -> Vec<Hybridization> {
    let mut out = hybrid::estimate(mol, config);
    hybrid::refine(mol, &mut out);
    out
}

/// Perceive bonds and then assign orders, seeding the generator from the configuration.
pub fn perceive_and_assign(
    mol: &mut Molecule,
    lenient: bool,
    config: &Config,
) -> Result<SolveReport, SolveError> {
    create_bonds_with(mol, lenient, config)?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    calculate_bond_orders_with(
        mol,
        &mut rng,
        config,
        &StandardLengths::new(),
        &mut Aromatizer::new(config),
    )
}
