//! Geometry helpers over atom coordinates

use glam::DVec3;
use std::f64::consts::PI;

/// Sum of the three bond angles around an ideal tetrahedral center, as a fraction of π.
pub const SP3_ANGLE_SUM: f64 = 1.833 * PI;
/// Sum of the three bond angles around an ideal trigonal planar center.
pub const SP2_ANGLE_SUM: f64 = 2.0 * PI;

/// The angle a-center-b, in radians.
pub fn angle(a: DVec3, center: DVec3, b: DVec3) -> f64 {
    let u = a - center;
    let v = b - center;
    if u.length_squared() == 0.0 || v.length_squared() == 0.0 {
        return 0.0;
    }
    u.angle_between(v)
}

/// The signed dihedral angle a-b-c-d, in (-π, π].
pub fn dihedral(a: DVec3, b: DVec3, c: DVec3, d: DVec3) -> f64 {
    let b0 = a - b;
    let b1 = c - b;
    let b2 = d - c;
    let len = b1.length();
    if len == 0.0 {
        return 0.0;
    }
    let b1 = b1 / len;
    let v = b0 - b1 * b0.dot(b1);
    let w = b2 - b1 * b2.dot(b1);
    let x = v.dot(w);
    let y = b1.cross(v).dot(w);
    y.atan2(x)
}

/// How far a dihedral is from the nearest planar arrangement (0 or π).
pub fn planar_deviation(dihedral: f64) -> f64 {
    let d = dihedral.abs();
    d.min(PI - d)
}

/// Sum of the pairwise angles between the bonds from `center`.
pub fn angle_sum(center: DVec3, neighbors: &[DVec3]) -> f64 {
    let mut sum = 0.0;
    for (i, &a) in neighbors.iter().enumerate() {
        for &b in &neighbors[(i + 1)..] {
            sum += angle(a, center, b);
        }
    }
    sum
}

/// Planarity score of a three-connected center: 0 for an ideal tetrahedral angle sum, 1 for a
/// flat one. Can fall outside of [0, 1] for strained geometries.
pub fn planarity(center: DVec3, neighbors: &[DVec3; 3]) -> f64 {
    (angle_sum(center, neighbors) - SP3_ANGLE_SUM) / (SP2_ANGLE_SUM - SP3_ANGLE_SUM)
}

/// The internal angle sum of a flat polygon with `n` corners.
pub fn polygon_angle_sum(n: usize) -> f64 {
    (n as f64 - 2.0) * PI
}

/// Sum of the internal angles of a ring, given its atoms in cyclic order.
pub fn ring_angle_sum(ring: &[DVec3]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| angle(ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]))
        .sum()
}

/// The direction a new substituent on `center` would point: away from the average of the
/// existing bond directions. `None` if the existing bonds cancel out or there are none.
pub fn free_direction(center: DVec3, neighbors: &[DVec3]) -> Option<DVec3> {
    let sum: DVec3 = neighbors
        .iter()
        .map(|&n| (n - center).normalize_or_zero())
        .sum();
    (-sum).try_normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn right_angle() {
        let a = angle(DVec3::X, DVec3::ZERO, DVec3::Y);
        assert!((a - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn dihedrals() {
        let cis = dihedral(
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 1.0, 0.0),
        );
        assert!(cis.abs() < EPS);
        let trans = dihedral(
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, -1.0, 0.0),
        );
        assert!((trans.abs() - PI).abs() < EPS);
        let perp = dihedral(
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::ZERO,
            DVec3::X,
            DVec3::new(1.0, 0.0, 1.0),
        );
        assert!((perp.abs() - PI / 2.0).abs() < EPS);
        assert!(planar_deviation(trans) < EPS);
        assert!((planar_deviation(perp) - PI / 2.0).abs() < EPS);
    }

    #[test]
    fn planarity_scores() {
        let flat = [
            DVec3::X,
            DVec3::new(-0.5, 0.75f64.sqrt(), 0.0),
            DVec3::new(-0.5, -(0.75f64.sqrt()), 0.0),
        ];
        assert!((planarity(DVec3::ZERO, &flat) - 1.0).abs() < 1e-6);
        // methane-like: three of the four tetrahedral directions
        let tet = [
            DVec3::new(1.0, 1.0, 1.0),
            DVec3::new(1.0, -1.0, -1.0),
            DVec3::new(-1.0, 1.0, -1.0),
        ];
        assert!(planarity(DVec3::ZERO, &tet) < 0.1);
    }

    #[test]
    fn hexagon() {
        let ring: Vec<DVec3> = (0..6)
            .map(|i| {
                let t = i as f64 * PI / 3.0;
                DVec3::new(t.cos(), t.sin(), 0.0)
            })
            .collect();
        assert!((ring_angle_sum(&ring) - polygon_angle_sum(6)).abs() < 1e-9);
    }

    #[test]
    fn free_directions() {
        let dir = free_direction(DVec3::ZERO, &[DVec3::X]).unwrap();
        assert!((dir + DVec3::X).length() < EPS);
        assert!(free_direction(DVec3::ZERO, &[DVec3::X, -DVec3::X]).is_none());
    }
}
