//! Grid storage for the relaxation engine
//!
//! Cells are stored as a flat `Vec<f64>` in row-major order. The engine never
//! resizes a grid; it only reads and writes cells through a [`GridShape`].

use crate::error::GeometryError;
use serde::{Deserialize, Serialize};

/// Grid dimensions: `rows` (m) by `cols` (n), addressed row-major
///
/// Both dimensions are positive; deserialization goes through
/// [`GridShape::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ShapeFields")]
pub struct GridShape {
    rows: usize,
    cols: usize,
}

#[derive(Deserialize)]
struct ShapeFields {
    rows: usize,
    cols: usize,
}

impl TryFrom<ShapeFields> for GridShape {
    type Error = GeometryError;

    fn try_from(fields: ShapeFields) -> Result<Self, Self::Error> {
        Self::new(fields.rows, fields.cols)
    }
}

impl GridShape {
    /// Create a shape, rejecting empty grids
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyGrid`] if either dimension is zero.
    pub fn new(rows: usize, cols: usize) -> Result<Self, GeometryError> {
        if rows == 0 || cols == 0 {
            return Err(GeometryError::EmptyGrid { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Number of rows (m)
    #[inline]
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (n)
    #[inline]
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Flat index of `(row, col)`
    #[inline]
    #[must_use]
    pub const fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Whether `(row, col)` addresses a cell of this shape
    #[must_use]
    pub const fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }
}

/// Owned heat grid
///
/// Stores cell values as a flat `Vec<f64>` in row-major order
/// (`row * cols + col`). The buffer length always matches the shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatGrid {
    data: Vec<f64>,
    shape: GridShape,
}

impl HeatGrid {
    /// Create a grid with every cell at zero
    #[must_use]
    pub fn new(shape: GridShape) -> Self {
        Self::with_value(shape, 0.0)
    }

    /// Create a grid with every cell at `value`
    #[must_use]
    pub fn with_value(shape: GridShape, value: f64) -> Self {
        Self {
            data: vec![value; shape.cell_count()],
            shape,
        }
    }

    /// Wrap existing row-major data
    ///
    /// Returns `None` if `data.len()` does not match the shape.
    #[must_use]
    pub fn from_vec(shape: GridShape, data: Vec<f64>) -> Option<Self> {
        (data.len() == shape.cell_count()).then_some(Self { data, shape })
    }

    /// Grid dimensions
    #[must_use]
    pub const fn shape(&self) -> GridShape {
        self.shape
    }

    /// Get reference to cell data
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Get mutable reference to cell data
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Iterate rows as slices, top to bottom
    pub fn row_slices(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.shape.cols)
    }

    /// Get value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(self.shape.contains(row, col), "Coordinates out of bounds");
        self.data[self.shape.index(row, col)]
    }

    /// Set value at `(row, col)`
    ///
    /// # Panics
    ///
    /// Panics if coordinates are out of bounds
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        assert!(self.shape.contains(row, col), "Coordinates out of bounds");
        let index = self.shape.index(row, col);
        self.data[index] = value;
    }

    /// Sum of all cell values
    #[must_use]
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_rejects_empty() {
        assert_eq!(
            GridShape::new(0, 4),
            Err(GeometryError::EmptyGrid { rows: 0, cols: 4 })
        );
        assert!(GridShape::new(3, 0).is_err());
        let shape = GridShape::new(3, 4).unwrap();
        assert_eq!((shape.rows(), shape.cols()), (3, 4));
        assert_eq!(shape.cell_count(), 12);
    }

    #[test]
    fn test_shape_deserialize_validates() {
        let shape: GridShape = serde_json::from_str(r#"{"rows":2,"cols":5}"#).unwrap();
        assert_eq!(shape, GridShape::new(2, 5).unwrap());

        let err = serde_json::from_str::<GridShape>(r#"{"rows":0,"cols":3}"#).unwrap_err();
        assert!(err.to_string().contains("grid dimensions must be positive"));
    }

    #[test]
    fn test_shape_serializes_dimensions() {
        let json = serde_json::to_string(&GridShape::new(2, 5).unwrap()).unwrap();
        assert_eq!(json, r#"{"rows":2,"cols":5}"#);
    }

    #[test]
    fn test_grid_get_set_row_major() {
        let shape = GridShape::new(3, 4).unwrap();
        let mut grid = HeatGrid::new(shape);
        grid.set(2, 1, 7.5);
        assert_eq!(grid.get(2, 1), 7.5);
        assert_eq!(grid.as_slice()[2 * 4 + 1], 7.5);
        assert_eq!(grid.total(), 7.5);
    }

    #[test]
    fn test_row_slices_iterate_by_row() {
        let shape = GridShape::new(2, 3).unwrap();
        let grid = HeatGrid::from_vec(shape, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let rows: Vec<&[f64]> = grid.row_slices().collect();
        assert_eq!(rows, vec![&[1.0, 2.0, 3.0][..], &[4.0, 5.0, 6.0][..]]);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let shape = GridShape::new(2, 2).unwrap();
        assert!(HeatGrid::from_vec(shape, vec![0.0; 3]).is_none());
    }

    #[test]
    #[should_panic(expected = "Coordinates out of bounds")]
    fn test_grid_bounds_check() {
        let grid = HeatGrid::with_value(GridShape::new(2, 2).unwrap(), 1.0);
        let _ = grid.get(2, 0);
    }
}
