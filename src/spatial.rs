//! Uniform grid over atom coordinates, to keep distance checks away from all-pairs

use crate::molecule::Molecule;
use ahash::AHashMap;
use glam::DVec3;
use smallvec::SmallVec;

type Cell = [i32; 3];

/// Buckets point indices into cubic cells anchored at the minimum corner of the bounding box.
///
/// Radius queries scan every cell the query sphere's bounding cube touches, so without exact
/// filtering they can return points up to a cell diagonal further out than asked for.
#[derive(Debug, Clone)]
pub struct SpatialIndex {
    cells: AHashMap<Cell, SmallVec<usize, 4>>,
    points: Vec<DVec3>,
    origin: DVec3,
    width: f64,
}
impl SpatialIndex {
    pub const DEFAULT_WIDTH: f64 = 1.1;

    pub fn new(points: impl IntoIterator<Item = DVec3>, width: f64) -> Self {
        let mut this = Self {
            cells: AHashMap::new(),
            points: Vec::new(),
            origin: DVec3::ZERO,
            width: if width > 0.0 {
                width
            } else {
                Self::DEFAULT_WIDTH
            },
        };
        this.rebuild(points);
        this
    }
    pub fn from_molecule(mol: &Molecule, width: f64) -> Self {
        Self::new(mol.graph.node_weights().map(|a| a.pos), width)
    }

    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
    pub fn point(&self, idx: usize) -> Option<DVec3> {
        self.points.get(idx).copied()
    }

    fn cell_of(&self, pos: DVec3) -> Cell {
        let rel = (pos - self.origin) / self.width;
        [
            rel.x.floor() as i32,
            rel.y.floor() as i32,
            rel.z.floor() as i32,
        ]
    }

    /// Throw away the current contents and index `points` instead.
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = DVec3>) {
        self.points.clear();
        self.points.extend(points);
        self.cells.clear();
        self.origin = self
            .points
            .iter()
            .copied()
            .reduce(DVec3::min)
            .unwrap_or(DVec3::ZERO);
        self.cells.reserve(self.points.len());
        for (i, &p) in self.points.iter().enumerate() {
            let cell = self.cell_of(p);
            self.cells.entry(cell).or_default().push(i);
        }
    }

    /// Move a single point. Points that leave the original bounding box are still found, they
    /// just land in cells outside of it.
    pub fn update(&mut self, idx: usize, pos: DVec3) {
        let Some(&old) = self.points.get(idx) else {
            return;
        };
        let from = self.cell_of(old);
        let to = self.cell_of(pos);
        self.points[idx] = pos;
        if from == to {
            return;
        }
        if let Some(cell) = self.cells.get_mut(&from) {
            cell.retain(|i| *i != idx);
            if cell.is_empty() {
                self.cells.remove(&from);
            }
        }
        self.cells.entry(to).or_default().push(idx);
    }

    /// Indices of points within `radius` of `pos`, sorted. Without `exact`, this is every point
    /// in a touched cell, which is a superset of the real answer.
    pub fn within(&self, pos: DVec3, radius: f64, exact: bool) -> Vec<usize> {
        let lo = self.cell_of(pos - DVec3::splat(radius));
        let hi = self.cell_of(pos + DVec3::splat(radius));
        let mut out = Vec::new();
        for x in lo[0]..=hi[0] {
            for y in lo[1]..=hi[1] {
                for z in lo[2]..=hi[2] {
                    let Some(cell) = self.cells.get(&[x, y, z]) else {
                        continue;
                    };
                    if exact {
                        let r2 = radius * radius;
                        out.extend(
                            cell.iter()
                                .copied()
                                .filter(|&i| self.points[i].distance_squared(pos) <= r2),
                        );
                    } else {
                        out.extend_from_slice(cell);
                    }
                }
            }
        }
        out.sort_unstable();
        out
    }

    /// The closest point to `pos`, other than `exclude`, and its distance.
    pub fn closest(&self, pos: DVec3, exclude: Option<usize>) -> Option<(usize, f64)> {
        let center = self.cell_of(pos);
        let max_shell = self
            .cells
            .keys()
            .map(|k| {
                (0..3)
                    .map(|i| (k[i] - center[i]).abs())
                    .max()
                    .unwrap_or(0)
            })
            .max()?;
        let mut best: Option<(usize, f64)> = None;
        for shell in 0..=max_shell {
            // everything in this shell is at least (shell - 1) cells away
            if let Some((_, d)) = best {
                if (shell - 1) as f64 * self.width > d {
                    break;
                }
            }
            for x in -shell..=shell {
                for y in -shell..=shell {
                    for z in -shell..=shell {
                        if x.abs().max(y.abs()).max(z.abs()) != shell {
                            continue;
                        }
                        let key = [center[0] + x, center[1] + y, center[2] + z];
                        let Some(cell) = self.cells.get(&key) else {
                            continue;
                        };
                        for &i in cell {
                            if Some(i) == exclude {
                                continue;
                            }
                            let d = self.points[i].distance(pos);
                            if best.map_or(true, |(_, b)| d < b) {
                                best = Some((i, d));
                            }
                        }
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize, step: f64) -> SpatialIndex {
        SpatialIndex::new((0..n).map(|i| DVec3::new(i as f64 * step, 0.0, 0.0)), 1.1)
    }

    #[test]
    fn radius_query() {
        let grid = line(10, 1.0);
        assert_eq!(grid.within(DVec3::new(3.0, 0.0, 0.0), 1.5, true), vec![2, 3, 4]);
        let loose = grid.within(DVec3::new(3.0, 0.0, 0.0), 1.5, false);
        assert!(loose.len() >= 3);
        assert!([2, 3, 4].iter().all(|i| loose.contains(i)));
    }

    #[test]
    fn empty_query() {
        let grid = line(3, 1.0);
        assert!(grid.within(DVec3::splat(100.0), 1.0, false).is_empty());
        let empty = SpatialIndex::new(std::iter::empty(), 1.0);
        assert!(empty.is_empty());
        assert_eq!(empty.closest(DVec3::ZERO, None), None);
    }

    #[test]
    fn nearest() {
        let grid = SpatialIndex::new(
            [
                DVec3::ZERO,
                DVec3::new(5.0, 0.0, 0.0),
                DVec3::new(5.0, 4.0, 0.0),
            ],
            1.1,
        );
        let (i, d) = grid.closest(DVec3::new(4.0, 0.5, 0.0), None).unwrap();
        assert_eq!(i, 1);
        assert!((d - 1.25f64.sqrt()).abs() < 1e-9);
        assert_eq!(grid.closest(DVec3::new(5.0, 0.0, 0.0), Some(1)).unwrap().0, 2);
        // far outside of the box
        assert_eq!(grid.closest(DVec3::new(-20.0, 0.0, 0.0), None).unwrap().0, 0);
    }

    #[test]
    fn moving_points() {
        let mut grid = line(4, 1.0);
        grid.update(0, DVec3::new(10.0, 0.0, 0.0));
        assert_eq!(grid.within(DVec3::ZERO, 0.5, true), Vec::<usize>::new());
        assert_eq!(grid.within(DVec3::new(10.0, 0.0, 0.0), 0.5, true), vec![0]);
        assert_eq!(grid.closest(DVec3::new(9.0, 0.0, 0.0), None).unwrap().0, 0);
    }
}
