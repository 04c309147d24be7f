//! Tunable constants for perception and bond-order assignment

use std::f64::consts::PI;

/// Every empirical threshold the pipeline uses. Distances are in angstroms, angles in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Cell width of the spatial grid.
    pub grid_width: f64,
    /// Added to the sum of covalent radii to get the bonding cutoff.
    pub bond_tolerance: f64,
    /// Extra reach when completing a π-coordinated ring.
    pub hapto_slack: f64,
    /// How much longer than the shortest contact to the same element a metal contact may be.
    pub metal_contact_slack: f64,
    /// P-P bonds in three-rings longer than this are dropped.
    pub diphosphorus_cutoff: f64,
    /// Largest dihedral for a four-ring to count as flat.
    pub flat_ring_dihedral: f64,
    /// Angles above this are linear.
    pub linear_angle: f64,
    /// Planarity score at and above which a three-connected atom is sp2.
    pub sp2_planarity: f64,
    /// Planarity score below which a three-connected atom is sp3.
    pub sp3_planarity: f64,
    /// Largest deviation from a planar dihedral before a bond is out of plane.
    pub torsion_limit: f64,
    /// How far past its aromatic length a five-ring bond may be.
    pub aromatic_tolerance: f64,
    /// How much better a C=O has to fit than an aromatic C-N to win the tautomer.
    pub oxo_margin: f64,
    /// Fallback double bond length, relative to single.
    pub double_scale: f64,
    /// Fallback triple bond length, relative to double.
    pub triple_scale: f64,
    pub relax_rounds: usize,
    /// Steps the Kekulé search may take per component.
    pub kekule_step_budget: usize,
    /// Most charge a single metal may absorb.
    pub metal_charge_cap: i8,
    /// Seed for the convenience entry point's generator.
    pub seed: u64,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            grid_width: 1.1,
            bond_tolerance: 0.45,
            hapto_slack: 0.5,
            metal_contact_slack: 0.2,
            diphosphorus_cutoff: 2.42,
            flat_ring_dihedral: 0.2,
            linear_angle: 0.85 * PI,
            sp2_planarity: 0.80,
            sp3_planarity: 0.50,
            torsion_limit: 0.20 * PI,
            aromatic_tolerance: 0.1,
            oxo_margin: 0.05,
            double_scale: 0.92,
            triple_scale: 0.88,
            relax_rounds: 8,
            kekule_step_budget: 100_000,
            metal_charge_cap: 8,
            seed: 0,
        }
    }
}
impl Config {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_bond_tolerance(mut self, tolerance: f64) -> Self {
        self.bond_tolerance = tolerance;
        self
    }
    pub fn with_grid_width(mut self, width: f64) -> Self {
        self.grid_width = width;
        self
    }
    pub fn with_relax_rounds(mut self, rounds: usize) -> Self {
        self.relax_rounds = rounds;
        self
    }
    pub fn with_kekule_step_budget(mut self, budget: usize) -> Self {
        self.kekule_step_budget = budget;
        self
    }
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The bonding cutoff between two elements with the given radii.
    #[inline]
    pub fn cutoff(&self, r1: f32, r2: f32) -> f64 {
        r1 as f64 + r2 as f64 + self.bond_tolerance
    }
}
