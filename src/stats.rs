//! Expected bond lengths.
//!
//! The pipeline asks a [`BondLengthTable`] what length a bond of some order between two atoms
//! in their current state should have. Tables are free to ignore parts of the key they don't
//! resolve; anything they don't know about falls back to an estimate from covalent radii.

use crate::atom_info::elem;
use crate::config::Config;
use crate::core::BondOrder;
use crate::molecule::Molecule;
use ahash::AHashMap;
use petgraph::prelude::*;

/// Everything a length lookup can depend on. The atom-specific fields are stored with the
/// lower atomic number first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BondLengthKey {
    pub order: BondOrder,
    pub aromatic: bool,
    pub protons: [u8; 2],
    pub pi: [u8; 2],
    pub conn: [u8; 2],
}
impl BondLengthKey {
    pub fn new(order: BondOrder, aromatic: bool, a: (u8, u8, u8), b: (u8, u8, u8)) -> Self {
        let (a, b) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self {
            order,
            aromatic,
            protons: [a.0, b.0],
            pi: [a.1, b.1],
            conn: [a.2, b.2],
        }
    }
    /// Key for a bond of `order` between two atoms, as they currently are in `mol`.
    pub fn between(mol: &Molecule, a: NodeIndex, b: NodeIndex, order: BondOrder) -> Self {
        let state = |n: NodeIndex| {
            (
                mol[n].protons,
                mol.pi_electrons(n),
                mol.connections(n, true) as u8,
            )
        };
        Self::new(order, order == BondOrder::Aromatic, state(a), state(b))
    }
}

/// Opaque handle into a table's statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatIndex(pub usize);

/// A source of bond length statistics.
pub trait BondLengthTable {
    fn lookup(&self, key: &BondLengthKey) -> Option<StatIndex>;
    /// Mean and standard deviation, in angstroms.
    fn stats(&self, idx: StatIndex) -> (f64, f64);
}
impl<T: BondLengthTable + ?Sized> BondLengthTable for &T {
    fn lookup(&self, key: &BondLengthKey) -> Option<StatIndex> {
        T::lookup(self, key)
    }
    fn stats(&self, idx: StatIndex) -> (f64, f64) {
        T::stats(self, idx)
    }
}

/// (lower Z, higher Z, order, mean, standard deviation). `Aromatic` rows are for bonds inside a
/// delocalized ring.
#[rustfmt::skip]
static STANDARD: &[(u8, u8, BondOrder, f64, f64)] = &[
    (1, 5, BondOrder::Single, 1.19, 0.03),
    (1, 6, BondOrder::Single, 1.09, 0.02),
    (1, 7, BondOrder::Single, 1.01, 0.02),
    (1, 8, BondOrder::Single, 0.96, 0.02),
    (1, 14, BondOrder::Single, 1.48, 0.02),
    (1, 15, BondOrder::Single, 1.42, 0.03),
    (1, 16, BondOrder::Single, 1.34, 0.02),
    (5, 6, BondOrder::Single, 1.57, 0.03),
    (5, 7, BondOrder::Single, 1.55, 0.04),
    (5, 8, BondOrder::Single, 1.37, 0.03),
    (6, 6, BondOrder::Single, 1.53, 0.02),
    (6, 6, BondOrder::Double, 1.34, 0.02),
    (6, 6, BondOrder::Triple, 1.20, 0.01),
    (6, 6, BondOrder::Aromatic, 1.39, 0.02),
    (6, 7, BondOrder::Single, 1.47, 0.02),
    (6, 7, BondOrder::Double, 1.28, 0.02),
    (6, 7, BondOrder::Triple, 1.16, 0.01),
    (6, 7, BondOrder::Aromatic, 1.34, 0.02),
    (6, 8, BondOrder::Single, 1.43, 0.02),
    (6, 8, BondOrder::Double, 1.21, 0.02),
    (6, 8, BondOrder::Aromatic, 1.36, 0.02),
    (6, 9, BondOrder::Single, 1.35, 0.02),
    (6, 14, BondOrder::Single, 1.87, 0.02),
    (6, 15, BondOrder::Single, 1.84, 0.03),
    (6, 15, BondOrder::Double, 1.67, 0.03),
    (6, 16, BondOrder::Single, 1.82, 0.02),
    (6, 16, BondOrder::Double, 1.67, 0.03),
    (6, 16, BondOrder::Aromatic, 1.72, 0.02),
    (6, 17, BondOrder::Single, 1.77, 0.02),
    (6, 34, BondOrder::Single, 1.95, 0.03),
    (6, 34, BondOrder::Double, 1.80, 0.03),
    (6, 35, BondOrder::Single, 1.94, 0.02),
    (6, 53, BondOrder::Single, 2.14, 0.03),
    (7, 7, BondOrder::Single, 1.45, 0.02),
    (7, 7, BondOrder::Double, 1.25, 0.02),
    (7, 7, BondOrder::Triple, 1.10, 0.01),
    (7, 7, BondOrder::Aromatic, 1.35, 0.02),
    (7, 8, BondOrder::Single, 1.40, 0.03),
    (7, 8, BondOrder::Double, 1.21, 0.02),
    (7, 8, BondOrder::Aromatic, 1.36, 0.02),
    (7, 9, BondOrder::Single, 1.41, 0.03),
    (7, 15, BondOrder::Single, 1.67, 0.03),
    (7, 15, BondOrder::Double, 1.57, 0.03),
    (7, 16, BondOrder::Single, 1.71, 0.03),
    (7, 16, BondOrder::Double, 1.54, 0.03),
    (7, 16, BondOrder::Aromatic, 1.63, 0.03),
    (8, 8, BondOrder::Single, 1.48, 0.02),
    (8, 8, BondOrder::Double, 1.21, 0.02),
    (8, 14, BondOrder::Single, 1.63, 0.02),
    (8, 15, BondOrder::Single, 1.60, 0.03),
    (8, 15, BondOrder::Double, 1.48, 0.02),
    (8, 16, BondOrder::Single, 1.58, 0.03),
    (8, 16, BondOrder::Double, 1.43, 0.02),
    (8, 17, BondOrder::Single, 1.70, 0.04),
    (8, 17, BondOrder::Double, 1.44, 0.03),
    (8, 34, BondOrder::Single, 1.74, 0.03),
    (8, 34, BondOrder::Double, 1.61, 0.03),
    (15, 15, BondOrder::Single, 2.21, 0.03),
    (15, 15, BondOrder::Double, 2.03, 0.03),
    (15, 16, BondOrder::Single, 2.11, 0.04),
    (15, 16, BondOrder::Double, 1.95, 0.03),
    (16, 16, BondOrder::Single, 2.05, 0.03),
    (16, 16, BondOrder::Double, 1.89, 0.03),
    (16, 16, BondOrder::Aromatic, 2.00, 0.04),
    (34, 34, BondOrder::Single, 2.34, 0.03),
    (34, 34, BondOrder::Aromatic, 2.28, 0.04),
];

/// A small table of well-established organic bond lengths. It only resolves the element
/// pair, the order, and aromaticity.
#[derive(Debug, Clone)]
pub struct StandardLengths {
    index: AHashMap<(u8, u8, BondOrder), usize>,
}
impl StandardLengths {
    pub fn new() -> Self {
        Self {
            index: STANDARD
                .iter()
                .enumerate()
                .map(|(i, &(a, b, order, ..))| ((a, b, order), i))
                .collect(),
        }
    }
}
impl Default for StandardLengths {
    fn default() -> Self {
        Self::new()
    }
}
impl BondLengthTable for StandardLengths {
    fn lookup(&self, key: &BondLengthKey) -> Option<StatIndex> {
        let order = if key.aromatic { BondOrder::Aromatic } else { key.order };
        self.index
            .get(&(key.protons[0], key.protons[1], order))
            .copied()
            .map(StatIndex)
    }
    fn stats(&self, idx: StatIndex) -> (f64, f64) {
        let (.., mean, sd) = STANDARD[idx.0];
        (mean, sd)
    }
}

/// Estimate from covalent radii, for when there are no statistics.
pub fn estimated_length(key: &BondLengthKey, config: &Config) -> f64 {
    let single = elem(key.protons[0]).radius as f64 + elem(key.protons[1]).radius as f64;
    let double = single * config.double_scale;
    match key.order {
        _ if key.aromatic => (single + double) * 0.5,
        BondOrder::MetalLigand | BondOrder::Single => single,
        BondOrder::Double => double,
        BondOrder::Aromatic => (single + double) * 0.5,
        // anything past triple is too rare to be worth telling apart
        _ => double * config.triple_scale,
    }
}

/// The expected length for `key`: the table's mean if it knows the bond, an estimate otherwise.
pub fn expected_length<T: BondLengthTable + ?Sized>(
    table: &T,
    key: &BondLengthKey,
    config: &Config,
) -> f64 {
    table
        .lookup(key)
        .map_or_else(|| estimated_length(key, config), |i| table.stats(i).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_keys() {
        let a = BondLengthKey::new(BondOrder::Double, false, (8, 0, 1), (6, 1, 3));
        let b = BondLengthKey::new(BondOrder::Double, false, (6, 1, 3), (8, 0, 1));
        assert_eq!(a, b);
        assert_eq!(a.protons, [6, 8]);
        assert_eq!(a.conn, [3, 1]);
    }

    #[test]
    fn table_and_fallback() {
        let table = StandardLengths::new();
        let config = Config::default();
        let cc = BondLengthKey::new(BondOrder::Aromatic, true, (6, 1, 3), (6, 1, 3));
        assert_eq!(expected_length(&table, &cc, &config), 1.39);
        let cn = BondLengthKey::new(BondOrder::Triple, false, (6, 2, 2), (7, 2, 1));
        assert_eq!(expected_length(&table, &cn, &config), 1.16);
        // no Ge-Ge row: estimated from radii
        let gege = BondLengthKey::new(BondOrder::Double, false, (32, 1, 3), (32, 1, 3));
        assert!(table.lookup(&gege).is_none());
        let single = 2.0 * elem(32).radius as f64;
        assert!((expected_length(&table, &gege, &config) - single * 0.92).abs() < 1e-9);
        let triple = BondLengthKey { order: BondOrder::Triple, ..gege };
        assert!((estimated_length(&triple, &config) - single * 0.92 * 0.88).abs() < 1e-9);
    }
}
