//! In-place relaxation sweeps and the convergence loop
//!
//! Each sweep visits every cell in row-major order and writes the kernel
//! result straight back into the grid, so later cells in the same sweep see
//! values already updated by earlier ones (Gauss-Seidel ordering). Switching
//! to a two-buffer (Jacobi) update would change the numbers, not just the speed.
//!
//! Source cells are skipped by walking a cursor through the sorted
//! [`SourceSet`] alongside the scan, giving `O(m·n + sources)` per sweep.
//!
//! # Termination
//!
//! ```text
//! prev = cur; cur = sweep(); rounds += 1
//! rounds == max_iterations    -> stop (IterationCap)
//! not |cur - prev| >= threshold -> stop (Converged; a NaN delta stops here too)
//! ```
//!
//! A fresh run starts with `prev = cur = 0`, so the first delta is the first
//! sweep's whole energy.

use super::boundary::BoundaryMode;
use super::kernel::UpdateKernel;
use super::neighbors;
use crate::error::GeometryError;
use crate::grid::{GridShape, HeatGrid, SourcePoint, SourceSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Which cells contribute to a sweep's energy sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyAccounting {
    /// Only cells rewritten by the sweep are summed; pinned sources are left out
    #[default]
    UpdatedCellsOnly,
    /// Source cells add their current grid value too
    IncludeSources,
}

/// Stopping rule: energy-delta threshold plus a hard sweep cap
///
/// The threshold is finite and non-negative and the cap is positive;
/// deserialization goes through [`ConvergenceCriterion::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CriterionFields")]
pub struct ConvergenceCriterion {
    threshold: f64,
    max_iterations: u32,
}

#[derive(Deserialize)]
struct CriterionFields {
    threshold: f64,
    max_iterations: u32,
}

impl TryFrom<CriterionFields> for ConvergenceCriterion {
    type Error = GeometryError;

    fn try_from(fields: CriterionFields) -> Result<Self, Self::Error> {
        Self::new(fields.threshold, fields.max_iterations)
    }
}

impl ConvergenceCriterion {
    /// Validated constructor
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvalidThreshold`] for a negative or non-finite
    /// threshold and [`GeometryError::ZeroIterationCap`] when `max_iterations` is 0.
    pub fn new(threshold: f64, max_iterations: u32) -> Result<Self, GeometryError> {
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(GeometryError::InvalidThreshold(threshold));
        }
        if max_iterations == 0 {
            return Err(GeometryError::ZeroIterationCap);
        }
        Ok(Self {
            threshold,
            max_iterations,
        })
    }

    /// Energy delta below which a run counts as settled
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Maximum sweeps per run
    #[must_use]
    pub const fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Whether `delta` ends the loop
    ///
    /// Looping continues only while `delta >= threshold`, so a NaN delta
    /// stops the run instead of spinning to the cap.
    #[inline]
    #[must_use]
    pub fn is_met(&self, delta: f64) -> bool {
        delta.is_nan() || delta < self.threshold
    }
}

impl Default for ConvergenceCriterion {
    fn default() -> Self {
        Self {
            threshold: 1e-3,
            max_iterations: 1000,
        }
    }
}

/// Everything fixed for a run besides the kernel and the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RelaxationParams {
    pub boundary: BoundaryMode,
    pub criterion: ConvergenceCriterion,
    pub energy: EnergyAccounting,
}

/// Engine-local accumulator state carried from sweep to sweep
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SweepState {
    pub previous_sum: f64,
    pub current_sum: f64,
    /// Sweeps performed since this state was created
    pub rounds: u32,
}

impl SweepState {
    /// Continue from the energy an earlier run finished with
    #[must_use]
    pub const fn resume(energy: f64) -> Self {
        Self {
            previous_sum: energy,
            current_sum: energy,
            rounds: 0,
        }
    }

    /// Absolute energy change of the last sweep
    #[inline]
    #[must_use]
    pub fn delta(&self) -> f64 {
        (self.current_sum - self.previous_sum).abs()
    }

    #[inline]
    fn advance(self, sweep_sum: f64) -> Self {
        Self {
            previous_sum: self.current_sum,
            current_sum: sweep_sum,
            rounds: self.rounds + 1,
        }
    }
}

/// Which stopping condition ended a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopReason {
    /// Delta fell below the threshold
    Converged,
    /// The sweep cap was reached first (checked before the threshold)
    IterationCap,
}

/// Result of one multi-sweep run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxationOutcome {
    /// `|current - previous|` after the last sweep
    pub delta: f64,
    /// Energy sum of the last sweep
    pub energy: f64,
    pub sweeps: u32,
    pub stop: StopReason,
}

/// Lockstep cursor over a row-major sorted source list
struct SourceCursor<'a> {
    points: &'a [SourcePoint],
    next: usize,
}

impl<'a> SourceCursor<'a> {
    fn new(points: &'a [SourcePoint]) -> Self {
        Self { points, next: 0 }
    }

    /// True (and advance) if the scan has reached the next source
    #[inline]
    fn at_source(&mut self, row: usize, col: usize) -> bool {
        match self.points.get(self.next) {
            Some(p) if p.row == row && p.col == col => {
                self.next += 1;
                true
            }
            _ => false,
        }
    }
}

/// One full row-major sweep; returns the sweep's energy sum
///
/// Every source must lie inside `shape`.
///
/// # Panics
///
/// Panics if `cells` does not hold exactly `shape.cell_count()` values.
pub fn sweep<K>(
    kernel: &K,
    cells: &mut [f64],
    shape: GridShape,
    sources: &SourceSet,
    boundary: BoundaryMode,
    energy: EnergyAccounting,
) -> f64
where
    K: UpdateKernel + ?Sized,
{
    assert_eq!(
        cells.len(),
        shape.cell_count(),
        "cell buffer does not match grid shape"
    );

    let mut cursor = SourceCursor::new(sources.as_slice());
    let mut sum = 0.0;

    for row in 0..shape.rows() {
        for col in 0..shape.cols() {
            let idx = shape.index(row, col);
            if cursor.at_source(row, col) {
                if energy == EnergyAccounting::IncludeSources {
                    sum += cells[idx];
                }
                continue;
            }

            let n = neighbors::resolve(cells, shape, boundary, row, col);
            let value = kernel.update(cells[idx], n.right, n.top, n.left, n.bottom);
            cells[idx] = value;
            sum += value;
        }
    }

    sum
}

/// Convergence-loop driver
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Relaxation {
    pub params: RelaxationParams,
}

impl Relaxation {
    #[must_use]
    pub const fn new(params: RelaxationParams) -> Self {
        Self { params }
    }

    /// Run the convergence loop from a fresh state
    pub fn run<K>(
        &self,
        kernel: &K,
        cells: &mut [f64],
        shape: GridShape,
        sources: &SourceSet,
    ) -> RelaxationOutcome
    where
        K: UpdateKernel + ?Sized,
    {
        self.run_from(SweepState::default(), kernel, cells, shape, sources)
    }

    /// Run the convergence loop starting from `state`
    pub fn run_from<K>(
        &self,
        mut state: SweepState,
        kernel: &K,
        cells: &mut [f64],
        shape: GridShape,
        sources: &SourceSet,
    ) -> RelaxationOutcome
    where
        K: UpdateKernel + ?Sized,
    {
        let RelaxationParams {
            boundary,
            criterion,
            energy,
        } = self.params;

        let stop = loop {
            let sum = sweep(kernel, cells, shape, sources, boundary, energy);
            state = state.advance(sum);
            trace!(
                "sweep {}: energy {:.6}, delta {:.6}",
                state.rounds,
                state.current_sum,
                state.delta()
            );

            if state.rounds == criterion.max_iterations() {
                break StopReason::IterationCap;
            }
            if criterion.is_met(state.delta()) {
                if state.delta().is_nan() {
                    warn!("energy delta is NaN after sweep {}, stopping", state.rounds);
                }
                break StopReason::Converged;
            }
        };

        let outcome = RelaxationOutcome {
            delta: state.delta(),
            energy: state.current_sum,
            sweeps: state.rounds,
            stop,
        };
        debug!(
            "relaxation stopped after {} sweep(s) ({:?}), delta {:.6}",
            outcome.sweeps, outcome.stop, outcome.delta
        );
        outcome
    }

    /// [`Relaxation::run`] over an owned grid
    pub fn run_grid<K>(
        &self,
        kernel: &K,
        grid: &mut HeatGrid,
        sources: &SourceSet,
    ) -> RelaxationOutcome
    where
        K: UpdateKernel + ?Sized,
    {
        let shape = grid.shape();
        self.run(kernel, grid.as_mut_slice(), shape, sources)
    }
}

/// Relax `grid` until the energy delta drops below the threshold or the cap
/// is hit, returning the final delta
///
/// Each call starts from zero energy; call repeatedly to continue a run.
pub fn relax<K>(
    kernel: &K,
    grid: &mut HeatGrid,
    sources: &SourceSet,
    criterion: ConvergenceCriterion,
    boundary: BoundaryMode,
) -> f64
where
    K: UpdateKernel + ?Sized,
{
    let relaxation = Relaxation::new(RelaxationParams {
        boundary,
        criterion,
        energy: EnergyAccounting::UpdatedCellsOnly,
    });
    relaxation.run_grid(kernel, grid, sources).delta
}
