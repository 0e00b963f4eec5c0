//! Von Neumann neighbour lookup with cyclic or clamped edges
//!
//! Reads always use wrapped indices first. In clamped mode each edge condition
//! then zeroes its own neighbour on its own, so a single-row grid loses both
//! `top` and `bottom`, and a single-column grid loses both `left` and `right`.

use super::boundary::BoundaryMode;
use crate::grid::GridShape;

/// The four neighbour values of one cell
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Neighbors {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Resolve the neighbours of `(row, col)`
///
/// `cells` is the row-major grid buffer for `shape`; the coordinate must lie
/// inside the shape.
#[inline]
#[must_use]
pub fn resolve(
    cells: &[f64],
    shape: GridShape,
    boundary: BoundaryMode,
    row: usize,
    col: usize,
) -> Neighbors {
    let (m, n) = (shape.rows(), shape.cols());
    let above = if row == 0 { m - 1 } else { row - 1 };
    let below = (row + 1) % m;
    let before = if col == 0 { n - 1 } else { col - 1 };
    let after = (col + 1) % n;

    let mut neighbors = Neighbors {
        top: cells[shape.index(above, col)],
        bottom: cells[shape.index(below, col)],
        left: cells[shape.index(row, before)],
        right: cells[shape.index(row, after)],
    };

    if boundary == BoundaryMode::Clamped {
        if row == 0 {
            neighbors.top = 0.0;
        }
        if row == m - 1 {
            neighbors.bottom = 0.0;
        }
        if col == 0 {
            neighbors.left = 0.0;
        }
        if col == n - 1 {
            neighbors.right = 0.0;
        }
    }

    neighbors
}

#[cfg(test)]
mod tests {
    use super::*;

    // 3x3 grid holding 0..9 so every read is identifiable
    fn numbered() -> (Vec<f64>, GridShape) {
        let shape = GridShape::new(3, 3).unwrap();
        ((0..9).map(f64::from).collect(), shape)
    }

    #[test]
    fn test_interior_same_in_both_modes() {
        let (cells, shape) = numbered();
        let expected = Neighbors {
            top: 1.0,
            bottom: 7.0,
            left: 3.0,
            right: 5.0,
        };
        assert_eq!(resolve(&cells, shape, BoundaryMode::Cyclic, 1, 1), expected);
        assert_eq!(resolve(&cells, shape, BoundaryMode::Clamped, 1, 1), expected);
    }

    #[test]
    fn test_corner_wraps_when_cyclic() {
        let (cells, shape) = numbered();
        let n = resolve(&cells, shape, BoundaryMode::Cyclic, 0, 0);
        assert_eq!(n.top, 6.0);
        assert_eq!(n.bottom, 3.0);
        assert_eq!(n.left, 2.0);
        assert_eq!(n.right, 1.0);

        let n = resolve(&cells, shape, BoundaryMode::Cyclic, 2, 2);
        assert_eq!(n.bottom, 2.0);
        assert_eq!(n.right, 6.0);
    }

    #[test]
    fn test_corner_zeroed_when_clamped() {
        let (cells, shape) = numbered();
        let n = resolve(&cells, shape, BoundaryMode::Clamped, 0, 0);
        assert_eq!(n.top, 0.0);
        assert_eq!(n.left, 0.0);
        assert_eq!(n.bottom, 3.0);
        assert_eq!(n.right, 1.0);

        let n = resolve(&cells, shape, BoundaryMode::Clamped, 2, 2);
        assert_eq!(n.bottom, 0.0);
        assert_eq!(n.right, 0.0);
        assert_eq!(n.top, 5.0);
        assert_eq!(n.left, 7.0);
    }

    #[test]
    fn test_single_row_zeroes_top_and_bottom() {
        let shape = GridShape::new(1, 3).unwrap();
        let cells = [10.0, 20.0, 30.0];
        let n = resolve(&cells, shape, BoundaryMode::Clamped, 0, 1);
        assert_eq!(n.top, 0.0);
        assert_eq!(n.bottom, 0.0);
        assert_eq!(n.left, 10.0);
        assert_eq!(n.right, 30.0);

        // Cyclic single row reads the cell itself vertically
        let n = resolve(&cells, shape, BoundaryMode::Cyclic, 0, 1);
        assert_eq!(n.top, 20.0);
        assert_eq!(n.bottom, 20.0);
    }

    #[test]
    fn test_single_cell_clamped_is_all_zero() {
        let shape = GridShape::new(1, 1).unwrap();
        let cells = [5.0];
        assert_eq!(
            resolve(&cells, shape, BoundaryMode::Clamped, 0, 0),
            Neighbors::default()
        );
        let n = resolve(&cells, shape, BoundaryMode::Cyclic, 0, 0);
        assert_eq!([n.top, n.bottom, n.left, n.right], [5.0; 4]);
    }
}
