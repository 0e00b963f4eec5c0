//! Heat Relaxation Core Library
//!
//! Steady-state heat diffusion on a 2D grid by in-place (Gauss-Seidel)
//! relaxation. Every non-source cell is repeatedly replaced by an update
//! kernel of itself and its four neighbours until the energy change between
//! sweeps falls below a threshold or a sweep cap is reached.
//!
//! - [`grid`]: cell storage and pinned heat sources
//! - [`solver`]: neighbour resolution, kernels and the convergence loop
//! - [`simulation`]: block-by-block driver with per-block reports
//! - [`io`]: problem description loader and snapshot rendering

pub mod error;
pub mod grid;
pub mod io;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use error::{GeometryError, LoadError};
pub use grid::{GridShape, HeatGrid, SourcePoint, SourceSet};
pub use io::{ProblemDescription, SnapshotFormat};
pub use simulation::{BlockReport, HeatSimulation, RunSummary};
pub use solver::{
    relax, BoundaryMode, ConvergenceCriterion, EnergyAccounting, HeatEquationKernel, Relaxation,
    RelaxationOutcome, RelaxationParams, StopReason, UpdateKernel, WeightedAverageKernel,
};
