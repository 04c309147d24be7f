#![allow(clippy::identity_op)]
//! Atom and bond types for the molecule graph

use crate::atom_info::{elem, is_organic, ElemData};
use c_enum::*;
use glam::DVec3;
use modular_bitfield::prelude::*;
use petgraph::prelude::*;
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("too many hydrogens: attempted to set {0}, the max is 15")]
pub struct TooManyHydrogens(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[error("valence override {0} is out of range, the max is 15")]
pub struct BadValence(pub u8);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, BitfieldSpecifier)]
pub enum Radical {
    #[default]
    None,
    Singlet,
    Doublet,
    Triplet,
}
impl Radical {
    /// Unpaired electrons that don't take part in bonding.
    pub fn electrons(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Doublet => 1,
            Self::Singlet | Self::Triplet => 2,
        }
    }
}

/// Bit-packed per-atom state: implicit hydrogens, radical state, and an abnormal valence override
/// (zero for none)
#[bitfield]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AtomData {
    pub hydrogen: B4,
    pub radical: Radical,
    pub valence: B4,
    #[skip]
    __: B6,
}

/// An atom in the molecule graph
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub protons: u8,
    pub charge: i8,
    pub pos: DVec3,
    pub data: AtomData,
    pub label: Option<Box<str>>,
}
impl Atom {
    pub fn new(protons: u8, pos: DVec3) -> Self {
        Self {
            protons,
            charge: 0,
            pos,
            data: AtomData::new(),
            label: None,
        }
    }
    pub fn at(protons: u8, x: f64, y: f64, z: f64) -> Self {
        Self::new(protons, DVec3::new(x, y, z))
    }
    pub fn with_label(mut self, label: impl Into<Box<str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline(always)]
    pub fn elem(&self) -> &'static ElemData {
        elem(self.protons)
    }
    /// Anything outside the organic subset is bonded as a metal.
    #[inline(always)]
    pub fn is_metal(&self) -> bool {
        !is_organic(self.protons)
    }

    #[inline(always)]
    pub fn hydrogens(&self) -> u8 {
        self.data.hydrogen()
    }
    pub fn set_hydrogens(&mut self, h: u8) -> Result<(), TooManyHydrogens> {
        if h < 16 {
            self.data.set_hydrogen(h);
            Ok(())
        } else {
            Err(TooManyHydrogens(h))
        }
    }
    pub fn add_hydrogens(&mut self, h: u8) -> Result<(), TooManyHydrogens> {
        self.set_hydrogens(self.hydrogens().saturating_add(h))
    }
    /// Take away one implicit hydrogen. Returns false if there were none.
    pub fn remove_hydrogen(&mut self) -> bool {
        match self.hydrogens() {
            0 => false,
            h => {
                self.data.set_hydrogen(h - 1);
                true
            }
        }
    }

    #[inline(always)]
    pub fn radical(&self) -> Radical {
        self.data.radical()
    }
    pub fn set_radical(&mut self, radical: Radical) {
        self.data.set_radical(radical);
    }

    /// The abnormal valence override, if one was set.
    pub fn valence_override(&self) -> Option<u8> {
        match self.data.valence() {
            0 => None,
            v => Some(v),
        }
    }
    pub fn set_valence_override(&mut self, valence: Option<u8>) -> Result<(), BadValence> {
        match valence {
            None => self.data.set_valence(0),
            Some(v @ 1..=15) => self.data.set_valence(v),
            Some(v) => return Err(BadValence(v)),
        }
        Ok(())
    }
}
impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            return f.write_str(label);
        }
        if f.alternate() {
            return f.write_str(self.elem().name);
        }
        use fmtastic::*;
        f.write_str(self.elem().sym)?;
        match self.hydrogens() {
            0 => {}
            1 => f.write_str("H")?,
            h => write!(f, "H{}", Subscript(h))?,
        }
        match self.charge {
            0 => {}
            1 => f.write_str("⁺")?,
            -1 => f.write_str("⁻")?,
            c if c > 0 => write!(f, "{}⁺", Superscript(c))?,
            c => write!(f, "{}⁻", Superscript(c.unsigned_abs()))?,
        }
        Ok(())
    }
}

c_enum! {
    /// The order of a bond. Metal-ligand bonds have order zero and don't count towards valence.
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    pub enum BondOrder: u8 {
        MetalLigand,
        Single,
        Double,
        Triple,
        Quad,
        Quint,
        /// Delocalized, part of an aromatic system without a settled Kekulé pattern
        Aromatic,
    }
}
impl BondOrder {
    /// How many valence units this bond takes from each of its atoms. Delocalized bonds count
    /// as single here; their extra half is accounted for per atom.
    pub fn units(self) -> u8 {
        match self {
            Self::MetalLigand => 0,
            Self::Single | Self::Aromatic => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Quad => 4,
            Self::Quint => 5,
            _ => panic!("invalid bond order!"),
        }
    }
    /// The localized order with the given number of units.
    pub fn from_units(units: u8) -> Option<Self> {
        match units {
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Triple),
            4 => Some(Self::Quad),
            5 => Some(Self::Quint),
            _ => None,
        }
    }
    pub fn is_metal_ligand(self) -> bool {
        self == Self::MetalLigand
    }
    /// Double, triple, or higher.
    pub fn is_multiple(self) -> bool {
        matches!(self, Self::Double | Self::Triple | Self::Quad | Self::Quint)
    }
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::MetalLigand => "metal-ligand",
            Self::Single => "single",
            Self::Double => "double",
            Self::Triple => "triple",
            Self::Quad => "quadruple",
            Self::Quint => "quintuple",
            Self::Aromatic => "aromatic",
            _ => panic!("invalid bond order!"),
        }
    }
}
impl Display for BondOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

/// A bond in the molecule graph.
///
/// `fixed` marks the order as final: nothing may reassign it afterwards. `aromatic` is set for
/// members of a perceived aromatic system, whether or not a Kekulé pattern was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub order: BondOrder,
    pub fixed: bool,
    pub aromatic: bool,
}
impl Bond {
    pub const fn new(order: BondOrder) -> Self {
        Self {
            order,
            fixed: false,
            aromatic: false,
        }
    }
    pub const fn single() -> Self {
        Self::new(BondOrder::Single)
    }
    /// Metal-ligand bonds are settled as soon as they're made.
    pub const fn metal() -> Self {
        Self {
            order: BondOrder::MetalLigand,
            fixed: true,
            aromatic: false,
        }
    }
}
impl Display for Bond {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.order, f)?;
        if self.aromatic && self.order != BondOrder::Aromatic {
            f.write_str(" (aromatic)")?;
        }
        Ok(())
    }
}

/// Local electronic geometry of an atom
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hybridization {
    /// Not determined yet
    #[default]
    Unknown,
    Sp1,
    Sp2,
    Sp3,
    Sp3d,
    Sp3d2,
}
impl Hybridization {
    pub fn is_known(self) -> bool {
        self != Self::Unknown
    }
    pub fn as_static_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Sp1 => "sp",
            Self::Sp2 => "sp2",
            Self::Sp3 => "sp3",
            Self::Sp3d => "sp3d",
            Self::Sp3d2 => "sp3d2",
        }
    }
}
impl Display for Hybridization {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_static_str())
    }
}

/// A molecule graph is an undirected graph between atoms, connected with bonds
pub type MoleculeGraph = UnGraph<Atom, Bond>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atom_bits() {
        let mut atom = Atom::at(7, 0.0, 0.0, 0.0);
        atom.set_hydrogens(3).unwrap();
        atom.set_radical(Radical::Doublet);
        atom.set_valence_override(Some(5)).unwrap();
        assert_eq!(atom.hydrogens(), 3);
        assert_eq!(atom.radical(), Radical::Doublet);
        assert_eq!(atom.valence_override(), Some(5));
        assert!(atom.set_hydrogens(16).is_err());
        assert!(atom.set_valence_override(Some(16)).is_err());
        atom.set_valence_override(None).unwrap();
        assert_eq!(atom.valence_override(), None);
        assert_eq!(atom.hydrogens(), 3);
    }

    #[test]
    fn removing_hydrogens() {
        let mut atom = Atom::at(7, 0.0, 0.0, 0.0);
        atom.set_hydrogens(1).unwrap();
        atom.set_radical(Radical::Singlet);
        assert!(atom.remove_hydrogen());
        assert_eq!(atom.hydrogens(), 0);
        assert!(!atom.remove_hydrogen());
        assert_eq!(atom.hydrogens(), 0);
        assert_eq!(atom.radical(), Radical::Singlet);
    }

    #[test]
    fn display() {
        let mut atom = Atom::at(8, 0.0, 0.0, 0.0);
        atom.charge = -1;
        assert_eq!(atom.to_string(), "O⁻");
        atom.set_hydrogens(2).unwrap();
        atom.charge = 1;
        assert_eq!(atom.to_string(), "OH₂⁺");
        assert_eq!(format!("{atom:#}"), "oxygen");
        assert_eq!(atom.with_label("OW").to_string(), "OW");
    }

    #[test]
    fn orders() {
        assert_eq!(BondOrder::MetalLigand.units(), 0);
        assert_eq!(BondOrder::Aromatic.units(), 1);
        assert_eq!(BondOrder::from_units(3), Some(BondOrder::Triple));
        assert!(BondOrder::Double.is_multiple());
        assert!(!BondOrder::Aromatic.is_multiple());
        assert!(Bond::metal().fixed);
    }
}
