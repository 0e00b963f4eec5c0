//! Pinned heat sources
//!
//! A [`SourceSet`] is always sorted by `(row, col)` so the relaxation sweep can
//! walk it in lockstep with its own row-major scan.

use super::lattice::{GridShape, HeatGrid};
use crate::error::GeometryError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A cell whose value is fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePoint {
    /// Row index (0 to rows-1)
    pub row: usize,
    /// Column index (0 to cols-1)
    pub col: usize,
    /// Fixed value held by the cell
    pub value: f64,
}

impl SourcePoint {
    #[must_use]
    pub const fn new(row: usize, col: usize, value: f64) -> Self {
        Self { row, col, value }
    }

    /// Coordinate key in row-major order
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

/// Source points sorted ascending by `(row, col)` with unique coordinates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SourcePoint>", into = "Vec<SourcePoint>")]
pub struct SourceSet {
    points: Vec<SourcePoint>,
}

impl SourceSet {
    /// Build a sorted set from points in any order
    ///
    /// Points sharing a coordinate collapse to the last one given, which is
    /// the value a grid initialised in input order would hold.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = SourcePoint>) -> Self {
        let mut by_coord: FxHashMap<(usize, usize), SourcePoint> = FxHashMap::default();
        let mut given = 0_usize;
        for point in points {
            given += 1;
            by_coord.insert(point.coord(), point);
        }

        if by_coord.len() != given {
            warn!(
                "{} duplicate source coordinate(s) collapsed, last value kept",
                given - by_coord.len()
            );
        }

        let mut points: Vec<SourcePoint> = by_coord.into_values().collect();
        points.sort_unstable_by_key(SourcePoint::coord);
        Self { points }
    }

    /// Number of source points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[SourcePoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourcePoint> {
        self.points.iter()
    }

    /// Sum of the fixed source values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Check that every point lies inside `shape`
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::SourceOutOfBounds`] for the first point outside the grid.
    pub fn check_within(&self, shape: GridShape) -> Result<(), GeometryError> {
        match self.points.iter().find(|p| !shape.contains(p.row, p.col)) {
            Some(p) => Err(GeometryError::SourceOutOfBounds {
                row: p.row,
                col: p.col,
                rows: shape.rows(),
                cols: shape.cols(),
            }),
            None => Ok(()),
        }
    }

    /// Write every source value into `grid`
    pub fn pin(&self, grid: &mut HeatGrid) {
        for p in &self.points {
            grid.set(p.row, p.col, p.value);
        }
    }
}

impl From<Vec<SourcePoint>> for SourceSet {
    fn from(points: Vec<SourcePoint>) -> Self {
        Self::new(points)
    }
}

impl From<SourceSet> for Vec<SourcePoint> {
    fn from(set: SourceSet) -> Self {
        set.points
    }
}

impl FromIterator<SourcePoint> for SourceSet {
    fn from_iter<T: IntoIterator<Item = SourcePoint>>(iter: T) -> Self {
        Self::new(iter)
    }
}
