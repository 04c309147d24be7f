//! This file is pretty much a periodic table, with the bonding data perception needs

use ElemGroup::*;

/// Element group on the periodic table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElemGroup {
    /// Alkali metal
    Alkali,
    /// Alkaline earth metal
    AlkEar,
    /// Transition metal
    Trans,
    /// Post-transition metal
    Poor,
    /// Metalloid
    Metoid,
    /// Nonmetal
    Nonmet,
    /// Halogen
    Halogn,
    /// Noble gas
    Noble,
    /// Rare earth
    RarEar,
}

/// Per-element data.
///
/// `radius` is the single-bond covalent radius in angstroms, `0.0` if unknown (such atoms never
/// get bonds). `max_conn` caps the neighbors an atom may gain during perception, `valence` is the
/// highest neutral valence, and `max_ox` is the highest known oxidation state, used when
/// pushing charge onto metals.
#[derive(Debug, Clone, Copy)]
pub struct ElemData {
    pub name: &'static str,
    pub sym: &'static str,
    pub group: ElemGroup,
    pub radius: f32,
    pub max_conn: u8,
    pub valence: u8,
    pub max_ox: i8,
}
impl ElemData {
    pub const fn new(
        name: &'static str,
        sym: &'static str,
        group: ElemGroup,
        radius: f32,
        max_conn: u8,
        valence: u8,
        max_ox: i8,
    ) -> Self {
        Self {
            name,
            sym,
            group,
            radius,
            max_conn,
            valence,
            max_ox,
        }
    }
}

/// All of the data, just index the array by the atomic number
#[rustfmt::skip]
pub static ATOM_DATA: &[ElemData] = &[
    //            name             sym   group   radius conn val  ox
    ElemData::new("unknown",       "R",  Nonmet, 0.00,  0,   0,   0),
    ElemData::new("hydrogen",      "H",  Nonmet, 0.31,  2,   1,   1),
    ElemData::new("helium",        "He", Noble , 0.28,  0,   0,   0),
    ElemData::new("lithium",       "Li", Alkali, 1.28,  8,   1,   1),
    ElemData::new("beryllium",     "Be", AlkEar, 0.96,  4,   2,   2),
    ElemData::new("boron",         "B",  Metoid, 0.84,  4,   3,   3),
    ElemData::new("carbon",        "C",  Nonmet, 0.76,  4,   4,   4),
    ElemData::new("nitrogen",      "N",  Nonmet, 0.71,  4,   3,   5),
    ElemData::new("oxygen",        "O",  Nonmet, 0.66,  3,   2,   0),
    ElemData::new("fluorine",      "F",  Halogn, 0.57,  1,   1,   0),
    ElemData::new("neon",          "Ne", Noble , 0.58,  0,   0,   0),
    ElemData::new("sodium",        "Na", Alkali, 1.66,  8,   1,   1),
    ElemData::new("magnesium",     "Mg", AlkEar, 1.41,  8,   2,   2),
    ElemData::new("aluminum",      "Al", Poor  , 1.21,  6,   3,   3), // yes I'm american, sue me
    ElemData::new("silicon",       "Si", Metoid, 1.11,  6,   4,   4),
    ElemData::new("phosphorus",    "P",  Nonmet, 1.07,  6,   5,   5),
    ElemData::new("sulfur",        "S",  Nonmet, 1.05,  6,   6,   6),
    ElemData::new("chlorine",      "Cl", Halogn, 1.02,  4,   7,   7),
    ElemData::new("argon",         "Ar", Noble , 1.06,  0,   0,   0),
    ElemData::new("potassium",     "K",  Alkali, 2.03,  8,   1,   1),
    ElemData::new("calcium",       "Ca", AlkEar, 1.76,  8,   2,   2),
    ElemData::new("scandium",      "Sc", Trans , 1.70,  8,   3,   3),
    ElemData::new("titanium",      "Ti", Trans , 1.60,  8,   4,   4),
    ElemData::new("vanadium",      "V",  Trans , 1.53,  8,   5,   5),
    ElemData::new("chromium",      "Cr", Trans , 1.39,  8,   6,   6),
    ElemData::new("manganese",     "Mn", Trans , 1.39,  8,   7,   7),
    ElemData::new("iron",          "Fe", Trans , 1.32, 12,   6,   6),
    ElemData::new("cobalt",        "Co", Trans , 1.26, 12,   5,   5),
    ElemData::new("nickel",        "Ni", Trans , 1.24, 12,   4,   4),
    ElemData::new("copper",        "Cu", Trans , 1.32,  8,   4,   4),
    ElemData::new("zinc",          "Zn", Trans , 1.22,  8,   2,   2),
    ElemData::new("gallium",       "Ga", Poor  , 1.22,  6,   3,   3),
    ElemData::new("germanium",     "Ge", Metoid, 1.20,  6,   4,   4),
    ElemData::new("arsenic",       "As", Metoid, 1.19,  6,   5,   5),
    ElemData::new("selenium",      "Se", Nonmet, 1.20,  6,   6,   6),
    ElemData::new("bromine",       "Br", Halogn, 1.20,  4,   7,   7),
    ElemData::new("krypton",       "Kr", Noble , 1.16,  2,   2,   2),
    ElemData::new("rubidium",      "Rb", Alkali, 2.20,  8,   1,   1),
    ElemData::new("strontium",     "Sr", AlkEar, 1.95,  8,   2,   2),
    ElemData::new("yttrium",       "Y",  Trans , 1.90,  8,   3,   3),
    ElemData::new("zirconium",     "Zr", Trans , 1.75,  8,   4,   4),
    ElemData::new("niobium",       "Nb", Trans , 1.64,  8,   5,   5),
    ElemData::new("molybdenum",    "Mo", Trans , 1.54,  8,   6,   6),
    ElemData::new("technetium",    "Tc", Trans , 1.47,  8,   7,   7),
    ElemData::new("ruthenium",     "Ru", Trans , 1.46, 12,   8,   8),
    ElemData::new("rhodium",       "Rh", Trans , 1.42, 12,   6,   6),
    ElemData::new("palladium",     "Pd", Trans , 1.39,  8,   4,   4),
    ElemData::new("silver",        "Ag", Trans , 1.45,  8,   3,   3),
    ElemData::new("cadmium",       "Cd", Trans , 1.44,  8,   2,   2),
    ElemData::new("indium",        "In", Poor  , 1.42,  6,   3,   3),
    ElemData::new("tin",           "Sn", Poor  , 1.39,  6,   4,   4),
    ElemData::new("antimony",      "Sb", Metoid, 1.39,  6,   5,   5),
    ElemData::new("tellurium",     "Te", Metoid, 1.38,  6,   6,   6),
    ElemData::new("iodine",        "I",  Halogn, 1.39,  6,   7,   7),
    ElemData::new("xenon",         "Xe", Noble , 1.40,  6,   8,   8),
    ElemData::new("cesium",        "Cs", Alkali, 2.44, 12,   1,   1),
    ElemData::new("barium",        "Ba", AlkEar, 2.15, 12,   2,   2),
    ElemData::new("lanthanum",     "La", RarEar, 2.07, 12,   3,   3),
    ElemData::new("cerium",        "Ce", RarEar, 2.04, 12,   4,   4),
    ElemData::new("praseodymium",  "Pr", RarEar, 2.03, 12,   4,   4),
    ElemData::new("neodymium",     "Nd", RarEar, 2.01, 12,   3,   3),
    ElemData::new("prometheum",    "Pm", RarEar, 1.99, 12,   3,   3),
    ElemData::new("samarium",      "Sm", RarEar, 1.98, 12,   3,   3),
    ElemData::new("europium",      "Eu", RarEar, 1.98, 12,   3,   3),
    ElemData::new("gadolinium",    "Gd", RarEar, 1.96, 12,   3,   3),
    ElemData::new("terbium",       "Tb", RarEar, 1.94, 12,   4,   4),
    ElemData::new("dysprosium",    "Dy", RarEar, 1.92, 12,   3,   3),
    ElemData::new("holmium",       "Ho", RarEar, 1.92, 12,   3,   3),
    ElemData::new("erbium",        "Er", RarEar, 1.89, 12,   3,   3),
    ElemData::new("thulium",       "Tm", RarEar, 1.90, 12,   3,   3),
    ElemData::new("ytterbium",     "Yb", RarEar, 1.87, 12,   3,   3),
    ElemData::new("lutetium",      "Lu", RarEar, 1.87, 12,   3,   3),
    ElemData::new("hafnium",       "Hf", Trans , 1.75,  8,   4,   4),
    ElemData::new("tantalum",      "Ta", Trans , 1.70,  8,   5,   5),
    ElemData::new("tungsten",      "W",  Trans , 1.62,  8,   6,   6),
    ElemData::new("rhenium",       "Re", Trans , 1.51,  8,   7,   7),
    ElemData::new("osmium",        "Os", Trans , 1.44, 12,   8,   8),
    ElemData::new("iridium",       "Ir", Trans , 1.41, 12,   6,   6),
    ElemData::new("platinum",      "Pt", Trans , 1.36,  8,   6,   6),
    ElemData::new("gold",          "Au", Trans , 1.36,  8,   5,   5),
    ElemData::new("mercury",       "Hg", Trans , 1.32,  8,   2,   2),
    ElemData::new("thallium",      "Tl", Poor  , 1.45,  6,   3,   3),
    ElemData::new("lead",          "Pb", Poor  , 1.46,  8,   4,   4),
    ElemData::new("bismuth",       "Bi", Poor  , 1.48,  8,   5,   5),
    ElemData::new("polonium",      "Po", Poor  , 1.40,  6,   6,   6),
    ElemData::new("astatine",      "At", Halogn, 1.50,  1,   1,   7),
    ElemData::new("radon",         "Rn", Noble , 1.50,  6,   6,   6),
    ElemData::new("francium",      "Fr", Alkali, 2.60, 12,   1,   1),
    ElemData::new("radium",        "Ra", AlkEar, 2.21, 12,   2,   2),
    ElemData::new("actinium",      "Ac", RarEar, 2.15, 12,   3,   3),
    ElemData::new("thorium",       "Th", RarEar, 2.06, 12,   4,   4),
    ElemData::new("protactinium",  "Pa", RarEar, 2.00, 12,   5,   5),
    ElemData::new("uranium",       "U",  RarEar, 1.96, 12,   6,   6),
    ElemData::new("neptunium",     "Np", RarEar, 1.90, 12,   7,   7),
    ElemData::new("plutonium",     "Pu", RarEar, 1.87, 12,   7,   7),
    ElemData::new("americium",     "Am", RarEar, 1.80, 12,   7,   7),
    ElemData::new("curium",        "Cm", RarEar, 1.69, 12,   4,   4),
    ElemData::new("berkelium",     "Bk", RarEar, 0.00,  0,   4,   4),
    ElemData::new("californium",   "Cf", RarEar, 0.00,  0,   4,   4),
    ElemData::new("einsteinium",   "Es", RarEar, 0.00,  0,   4,   4),
    ElemData::new("fermium",       "Fm", RarEar, 0.00,  0,   3,   3),
    ElemData::new("mendelvium",    "Md", RarEar, 0.00,  0,   3,   3),
    ElemData::new("nobelium",      "No", RarEar, 0.00,  0,   3,   3),
    ElemData::new("lawrencium",    "Lr", RarEar, 0.00,  0,   3,   3),
    ElemData::new("rutherfordium", "Rf", Trans , 0.00,  0,   4,   4),
    ElemData::new("dubnium",       "Db", Trans , 0.00,  0,   5,   5),
    ElemData::new("seaborgium",    "Sg", Trans , 0.00,  0,   6,   6),
    ElemData::new("bohrium",       "Bh", Trans , 0.00,  0,   7,   7),
    ElemData::new("hassium",       "Hs", Trans , 0.00,  0,   8,   8),
    ElemData::new("meitnerium",    "Mt", Trans , 0.00,  0,   6,   6),
    ElemData::new("darmstadtium",  "Ds", Trans , 0.00,  0,   6,   6),
    ElemData::new("roentgenium",   "Rg", Trans , 0.00,  0,   5,   5),
    ElemData::new("copernicium",   "Cn", Trans , 0.00,  0,   2,   2),
    ElemData::new("nihonium",      "Nh", Poor  , 0.00,  0,   3,   3),
    ElemData::new("flerovium",     "Fl", Poor  , 0.00,  0,   4,   4),
    ElemData::new("moscovium",     "Mc", Poor  , 0.00,  0,   5,   5),
    ElemData::new("livermorium",   "Lv", Poor  , 0.00,  0,   6,   6),
    ElemData::new("tenessine",     "Ts", Halogn, 0.00,  0,   7,   7),
    ElemData::new("oganesson",     "Og", Noble , 0.00,  0,   8,   8),
];

/// Look up an element's data, falling back to the unknown entry for out-of-range numbers.
#[inline]
pub fn elem(protons: u8) -> &'static ElemData {
    ATOM_DATA.get(protons as usize).unwrap_or(&ATOM_DATA[0])
}

/// Find the atomic number for an element symbol.
pub fn find_symbol(sym: &str) -> Option<u8> {
    ATOM_DATA
        .iter()
        .position(|d| d.sym.eq_ignore_ascii_case(sym))
        .map(|i| i as u8)
}

/// Elements that are connected in the first, organic, perception pass. Everything else is
/// treated as a metal and gets metal-ligand bonds.
pub const fn is_organic(protons: u8) -> bool {
    matches!(protons, 1 | 5 | 6 | 7 | 8 | 9 | 14 | 15 | 16 | 17 | 33 | 34 | 35 | 52 | 53)
}

/// Elements that can carry a localized double or triple bond.
pub const fn pi_capable(protons: u8) -> bool {
    matches!(protons, 5 | 6 | 7 | 8 | 14 | 15 | 16 | 33 | 34 | 52)
}

/// Group 16, the chalcogens that can donate a lone pair into a ring.
pub const fn is_chalcogen(protons: u8) -> bool {
    matches!(protons, 8 | 16 | 34 | 52)
}

/// Elements allowed as members of an aromatic ring.
pub const fn aromatic_member(protons: u8) -> bool {
    matches!(protons, 5 | 6 | 7 | 8 | 14 | 15 | 16)
}

/// Main group column, 13 through 17, for valence-charge bookkeeping. Zero for everything else.
pub const fn main_group(protons: u8) -> u8 {
    match protons {
        5 | 13 | 31 | 49 | 81 => 13,
        6 | 14 | 32 | 50 | 82 => 14,
        7 | 15 | 33 | 51 | 83 => 15,
        8 | 16 | 34 | 52 | 84 => 16,
        9 | 17 | 35 | 53 | 85 => 17,
        _ => 0,
    }
}
