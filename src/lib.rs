#[rustfmt::skip]
pub mod atom_info;
pub mod aromatic;
pub mod config;
pub mod core;
pub mod geom;
pub mod graph;
pub mod hybrid;
pub mod kekule;
pub mod molecule;
pub mod perceive;
pub mod samples;
pub mod solver;
pub mod spatial;
pub mod stats;
pub mod utils;
pub mod valence;

pub mod prelude {
    pub use crate::config::Config;
    pub use crate::core::*;
    pub use crate::kekule::{Aromatizer, BondMask, Delocalizer};
    pub use crate::molecule::{BondError, Molecule};
    pub use crate::perceive::{create_bonds, create_bonds_with, PerceptionError, PerceptionErrorKind};
    pub use crate::solver::{
        calculate_bond_orders, calculate_bond_orders_with, hybridizations, perceive_and_assign,
        SolveError, SolveReport,
    };
    pub use crate::stats::{BondLengthKey, BondLengthTable, StandardLengths};
}

#[cfg(test)]
mod tests;
