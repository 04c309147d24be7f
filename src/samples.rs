//! Small molecules with realistic coordinates, for demos and tests. None of them have bonds
//! yet; run [`create_bonds`](crate::perceive::create_bonds) on them first.

use crate::core::*;
use crate::molecule::Molecule;
use glam::DVec3;
use std::f64::consts::{PI, TAU};

/// Angle between a tetrahedral substituent and the axis opposite its partner.
const TETRAHEDRAL_TILT: f64 = 70.53 * PI / 180.0;

/// Every built-in sample, by name.
pub const NAMES: &[&str] = &[
    "benzene",
    "formate",
    "acetonitrile",
    "ammonium-oxide",
    "ferrocene-like",
];

/// Look up a sample by name.
pub fn by_name(name: &str) -> Option<Molecule> {
    Some(match name {
        "benzene" => benzene(),
        "formate" => formate(),
        "acetonitrile" => acetonitrile(),
        "ammonium-oxide" => ammonium_oxide(),
        "ferrocene-like" => ferrocene(),
        _ => return None,
    })
}

/// Points on a regular polygon of `n` vertices in the plane `z`, centered on `center`.
pub fn polygon(n: usize, radius: f64, center: DVec3, phase: f64) -> impl Iterator<Item = DVec3> {
    (0..n).map(move |k| {
        let a = phase + TAU * k as f64 / n as f64;
        center + DVec3::new(radius * a.cos(), radius * a.sin(), 0.0)
    })
}

/// Circumradius of a regular polygon with `n` sides of length `side`.
pub fn circumradius(n: usize, side: f64) -> f64 {
    side / (2.0 * (PI / n as f64).sin())
}

/// A flat ring of `elements` with one hydrogen pointing outwards from each atom listed in
/// `with_h`.
pub fn flat_ring(elements: &[u8], side: f64, with_h: &[usize], center: DVec3) -> Molecule {
    let n = elements.len();
    let r = circumradius(n, side);
    let mut mol = Molecule::new();
    let ring: Vec<DVec3> = polygon(n, r, center, 0.0).collect();
    for (&z, &p) in elements.iter().zip(&ring) {
        mol.add_atom(Atom::new(z, p));
    }
    for &i in with_h {
        let out = (ring[i] - center).normalize_or_zero();
        mol.add_atom(Atom::new(1, ring[i] + out * 1.08));
    }
    mol
}

/// Three tetrahedral hydrogens on `center`, pointing away from `partner`.
fn methyl_hydrogens(center: DVec3, partner: DVec3, length: f64) -> [Atom; 3] {
    let axis = (center - partner).normalize_or_zero();
    let side = axis.any_orthonormal_vector();
    let third = axis.cross(side);
    [0.0, 1.0, 2.0].map(|k: f64| {
        let phi = k * TAU / 3.0;
        let dir = axis * TETRAHEDRAL_TILT.cos()
            + (side * phi.cos() + third * phi.sin()) * TETRAHEDRAL_TILT.sin();
        Atom::new(1, center + dir * length)
    })
}

pub fn benzene() -> Molecule {
    flat_ring(&[6; 6], 1.39, &[0, 1, 2, 3, 4, 5], DVec3::ZERO)
}

/// HCO₂⁻, with one short and one long C-O.
pub fn formate() -> Molecule {
    let third = TAU / 3.0;
    let at = |a: f64, d: f64| DVec3::new(d * a.cos(), d * a.sin(), 0.0);
    let mut mol = Molecule::from_atoms([
        Atom::new(6, DVec3::ZERO),
        Atom::new(8, at(0.0, 1.20)).with_label("O1"),
        Atom::new(8, at(third, 1.26)).with_label("O2"),
        Atom::new(1, at(2.0 * third, 1.09)),
    ]);
    mol.charge = -1;
    mol
}

/// CH₃-C≡N laid out along z.
pub fn acetonitrile() -> Molecule {
    let n = DVec3::new(0.0, 0.0, 1.15);
    let c = DVec3::ZERO;
    let methyl = DVec3::new(0.0, 0.0, -1.46);
    let mut mol = Molecule::from_atoms([Atom::new(7, n), Atom::new(6, c), Atom::new(6, methyl)]);
    for h in methyl_hydrogens(methyl, c, 1.09) {
        mol.add_atom(h);
    }
    mol
}

/// H₃N-O, which only balances as H₃N⁺-O⁻.
pub fn ammonium_oxide() -> Molecule {
    let n = DVec3::ZERO;
    let o = DVec3::new(0.0, 0.0, 1.40);
    let mut mol = Molecule::from_atoms([Atom::new(7, n), Atom::new(8, o)]);
    for h in methyl_hydrogens(n, o, 1.01) {
        mol.add_atom(h);
    }
    mol
}

/// An iron between two staggered cyclopentadienyl rings.
pub fn ferrocene() -> Molecule {
    let r = circumradius(5, 1.41);
    let mut mol = Molecule::from_atoms([Atom::new(26, DVec3::ZERO)]);
    for (z, phase) in [(1.66, 0.0), (-1.66, PI / 5.0)] {
        let center = DVec3::new(0.0, 0.0, z);
        for p in polygon(5, r, center, phase) {
            mol.add_atom(Atom::new(6, p));
        }
        for p in polygon(5, r + 1.08, center, phase) {
            mol.add_atom(Atom::new(1, p));
        }
    }
    mol
}

/// One cyclopentadienyl ring with an iron pushed off-center below it, so that only three of
/// the ring atoms are within bonding distance.
pub fn slipped_half_sandwich() -> Molecule {
    let mut mol = flat_ring(&[6; 5], 1.41, &[0, 1, 2, 3, 4], DVec3::new(0.0, 0.0, 1.70));
    mol.add_atom(Atom::new(26, DVec3::new(0.8, 0.0, 0.0)));
    mol
}
