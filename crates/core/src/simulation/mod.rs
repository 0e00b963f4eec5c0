//! Block-driven heat simulation
//!
//! A run is a sequence of blocks. Each block is one full relaxation (fresh
//! sweep state, iteration cap as block length) followed by a report to the
//! caller, and blocks repeat while the block's delta is still at or above the
//! threshold. The caller can end a run early by returning
//! [`ControlFlow::Break`] from its block callback.

use crate::grid::{HeatGrid, SourceSet};
use crate::io::ProblemDescription;
use crate::solver::{
    EnergyAccounting, Relaxation, RelaxationOutcome, RelaxationParams, UpdateKernel,
};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

/// Snapshot handed to the caller after every block
#[derive(Debug, Clone, Copy)]
pub struct BlockReport<'a> {
    /// 1-based block number
    pub block: usize,
    pub outcome: RelaxationOutcome,
    /// Grid state at the end of the block
    pub grid: &'a HeatGrid,
}

/// Totals for a finished run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub blocks: usize,
    pub total_sweeps: u64,
    pub final_delta: f64,
    /// Whether the last block ended below the threshold (never for a NaN delta)
    pub converged: bool,
}

/// Grid, sources, parameters and kernel of one simulation
#[derive(Debug, Clone)]
pub struct HeatSimulation<K> {
    grid: HeatGrid,
    sources: SourceSet,
    relaxation: Relaxation,
    kernel: K,
    blocks: usize,
}

impl<K: UpdateKernel> HeatSimulation<K> {
    /// Create a simulation; source values are written into `grid`
    #[must_use]
    pub fn new(
        mut grid: HeatGrid,
        sources: SourceSet,
        params: RelaxationParams,
        kernel: K,
    ) -> Self {
        sources.pin(&mut grid);
        debug!(
            "pinned {} source(s) holding {:.4} total",
            sources.len(),
            sources.total()
        );
        Self {
            grid,
            sources,
            relaxation: Relaxation::new(params),
            kernel,
            blocks: 0,
        }
    }

    /// Build from a loaded description
    #[must_use]
    pub fn from_description(
        description: &ProblemDescription,
        kernel: K,
        energy: EnergyAccounting,
    ) -> Self {
        let params = RelaxationParams {
            boundary: description.boundary(),
            criterion: description.criterion(),
            energy,
        };
        Self::new(
            description.initial_grid(),
            description.source_set(),
            params,
            kernel,
        )
    }

    #[must_use]
    pub fn grid(&self) -> &HeatGrid {
        &self.grid
    }

    #[must_use]
    pub fn params(&self) -> &RelaxationParams {
        &self.relaxation.params
    }

    /// Blocks run so far
    #[must_use]
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Run one block
    pub fn step_block(&mut self) -> BlockReport<'_> {
        let outcome = self
            .relaxation
            .run_grid(&self.kernel, &mut self.grid, &self.sources);
        self.blocks += 1;
        BlockReport {
            block: self.blocks,
            outcome,
            grid: &self.grid,
        }
    }

    /// Run blocks until a block's delta drops below the threshold
    ///
    /// `max_blocks` bounds runs whose threshold can never be met (for example a
    /// threshold of zero); `None` runs without a bound. A NaN delta ends the
    /// run like a converged one.
    pub fn run_until_converged<F>(
        &mut self,
        max_blocks: Option<usize>,
        mut on_block: F,
    ) -> RunSummary
    where
        F: FnMut(&BlockReport<'_>) -> ControlFlow<()>,
    {
        let criterion = self.relaxation.params.criterion;
        let threshold = criterion.threshold();
        let mut total_sweeps = 0_u64;
        let mut run_blocks = 0_usize;

        let final_delta = loop {
            let report = self.step_block();
            run_blocks += 1;
            total_sweeps += u64::from(report.outcome.sweeps);
            let delta = report.outcome.delta;
            if on_block(&report).is_break() {
                info!("run stopped by caller after block {}", run_blocks);
                break delta;
            }

            if criterion.is_met(delta) {
                if delta.is_nan() {
                    warn!("block {} ended with a NaN delta, stopping", run_blocks);
                }
                break delta;
            }
            if max_blocks.is_some_and(|limit| run_blocks >= limit) {
                warn!(
                    "stopping after {} block(s) without reaching threshold {} (delta {:.6})",
                    run_blocks, threshold, delta
                );
                break delta;
            }
        };

        let summary = RunSummary {
            blocks: run_blocks,
            total_sweeps,
            final_delta,
            converged: final_delta < threshold,
        };
        info!(
            "simulation finished: {} block(s), {} sweep(s), final delta {:.6}",
            summary.blocks, summary.total_sweeps, summary.final_delta
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridShape, SourcePoint};
    use crate::solver::{BoundaryMode, ConvergenceCriterion, HeatEquationKernel};

    fn simulation(threshold: f64, max_iterations: u32) -> HeatSimulation<HeatEquationKernel> {
        let shape = GridShape::new(4, 4).unwrap();
        let sources = SourceSet::new(vec![
            SourcePoint::new(0, 0, 50.0),
            SourcePoint::new(3, 3, -10.0),
        ]);
        let params = RelaxationParams {
            boundary: BoundaryMode::Clamped,
            criterion: ConvergenceCriterion::new(threshold, max_iterations).unwrap(),
            energy: EnergyAccounting::UpdatedCellsOnly,
        };
        HeatSimulation::new(HeatGrid::new(shape), sources, params, HeatEquationKernel::default())
    }

    #[test]
    fn test_new_pins_sources() {
        let sim = simulation(1e-3, 10);
        assert_eq!(sim.grid().get(0, 0), 50.0);
        assert_eq!(sim.grid().get(3, 3), -10.0);
        assert_eq!(sim.blocks(), 0);
    }

    #[test]
    fn test_blocks_repeat_until_below_threshold() {
        let mut sim = simulation(1e-4, 5);
        let mut deltas = Vec::new();
        let summary = sim.run_until_converged(None, |report| {
            assert_eq!(report.grid.get(0, 0), 50.0);
            deltas.push(report.outcome.delta);
            ControlFlow::Continue(())
        });

        assert!(summary.converged);
        assert_eq!(summary.blocks, deltas.len());
        assert!(summary.final_delta < 1e-4);
        assert!(deltas[..deltas.len() - 1].iter().all(|&d| d >= 1e-4));
    }

    #[test]
    fn test_max_blocks_bounds_unreachable_threshold() {
        let mut sim = simulation(0.0, 3);
        let summary = sim.run_until_converged(Some(4), |_| ControlFlow::Continue(()));
        assert_eq!(summary.blocks, 4);
        assert_eq!(summary.total_sweeps, 12);
        assert!(!summary.converged);
        assert_eq!(sim.blocks(), 4);
    }

    #[test]
    fn test_callback_break_stops_run() {
        let mut sim = simulation(0.0, 2);
        let mut seen = 0;
        let summary = sim.run_until_converged(None, |report| {
            seen += 1;
            if report.block == 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, 3);
        assert_eq!(summary.blocks, 3);
        assert_eq!(sim.blocks(), 3);
        assert!(!summary.converged);
    }

    #[test]
    fn test_nan_delta_ends_run_after_one_block() {
        let shape = GridShape::new(3, 3).unwrap();
        let params = RelaxationParams {
            criterion: ConvergenceCriterion::new(0.5, 5).unwrap(),
            ..RelaxationParams::default()
        };
        let nan = |_: f64, _: f64, _: f64, _: f64, _: f64| f64::NAN;
        let mut sim = HeatSimulation::new(HeatGrid::new(shape), SourceSet::default(), params, nan);

        let summary = sim.run_until_converged(Some(50), |_| ControlFlow::Continue(()));

        assert_eq!(summary.blocks, 1);
        assert_eq!(summary.total_sweeps, 1);
        assert!(summary.final_delta.is_nan());
        assert!(!summary.converged);
    }

    #[test]
    fn test_unstable_diffusivity_terminates_without_block_cap() {
        let shape = GridShape::new(3, 3).unwrap();
        let sources = SourceSet::new(vec![SourcePoint::new(1, 1, 100.0)]);
        let params = RelaxationParams {
            criterion: ConvergenceCriterion::new(1e-3, 200).unwrap(),
            ..RelaxationParams::default()
        };
        let kernel = HeatEquationKernel { diffusivity: 1e300 };
        let mut sim = HeatSimulation::new(HeatGrid::new(shape), sources, params, kernel);

        let summary = sim.run_until_converged(None, |_| ControlFlow::Continue(()));

        assert_eq!(summary.blocks, 1);
        assert!(!summary.converged);
    }
}
