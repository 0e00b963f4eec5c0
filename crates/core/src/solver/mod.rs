//! Relaxation solver
//!
//! Neighbour resolution, update kernels and the Gauss-Seidel convergence loop.
//!
//! # Example
//!
//! ```rust
//! use heat_relax_core::grid::{GridShape, HeatGrid, SourcePoint, SourceSet};
//! use heat_relax_core::solver::{relax, BoundaryMode, ConvergenceCriterion, HeatEquationKernel};
//!
//! let shape = GridShape::new(4, 4).unwrap();
//! let sources = SourceSet::new(vec![SourcePoint::new(1, 1, 100.0)]);
//! let mut grid = HeatGrid::new(shape);
//! sources.pin(&mut grid);
//!
//! let criterion = ConvergenceCriterion::new(1e-3, 500).unwrap();
//! let kernel = HeatEquationKernel::default();
//! let delta = relax(&kernel, &mut grid, &sources, criterion, BoundaryMode::Clamped);
//! assert!(delta >= 0.0);
//! assert_eq!(grid.get(1, 1), 100.0);
//! ```

mod boundary;
pub mod kernel;
pub mod neighbors;
pub mod relaxation;

pub use boundary::BoundaryMode;
pub use kernel::{HeatEquationKernel, UpdateKernel, WeightedAverageKernel};
pub use neighbors::Neighbors;
pub use relaxation::{
    relax, sweep, ConvergenceCriterion, EnergyAccounting, Relaxation, RelaxationOutcome,
    RelaxationParams, StopReason, SweepState,
};
