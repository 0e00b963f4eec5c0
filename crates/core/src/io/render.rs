//! Snapshot rendering for block reports
//!
//! Text output is one delta line (six decimals) followed by the grid, one
//! row per line, every cell written as `{:2.4}` plus a trailing comma. JSON
//! output writes one object per block on its own line.

use crate::grid::HeatGrid;
use crate::simulation::BlockReport;
use crate::solver::StopReason;
use serde::Serialize;
use std::io::{self, Write};

/// Output format for block snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SnapshotFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
struct BlockJson<'a> {
    block: usize,
    delta: f64,
    sweeps: u32,
    stop: StopReason,
    grid: Vec<&'a [f64]>,
}

/// Write the grid rows in text form
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_grid<W: Write>(out: &mut W, grid: &HeatGrid) -> io::Result<()> {
    for row in grid.row_slices() {
        for value in row {
            write!(out, "{value:2.4},")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Write a delta line followed by the grid
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_text_block<W: Write>(out: &mut W, delta: f64, grid: &HeatGrid) -> io::Result<()> {
    writeln!(out, "{delta:.6}")?;
    write_grid(out, grid)
}

/// Write one block report in the requested format
///
/// # Errors
///
/// Propagates write and serialization failures.
pub fn write_block<W: Write>(
    out: &mut W,
    report: &BlockReport<'_>,
    format: SnapshotFormat,
) -> io::Result<()> {
    match format {
        SnapshotFormat::Text => write_text_block(out, report.outcome.delta, report.grid),
        SnapshotFormat::Json => {
            let json = BlockJson {
                block: report.block,
                delta: report.outcome.delta,
                sweeps: report.outcome.sweeps,
                stop: report.outcome.stop,
                grid: report.grid.row_slices().collect(),
            };
            serde_json::to_writer(&mut *out, &json)?;
            writeln!(out)
        }
    }
}

/// Text block as a `String`
#[must_use]
pub fn render_text_block(delta: f64, grid: &HeatGrid) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail
    let _ = write_text_block(&mut buf, delta, grid);
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridShape;
    use crate::solver::RelaxationOutcome;

    fn grid() -> HeatGrid {
        let shape = GridShape::new(2, 2).unwrap();
        HeatGrid::from_vec(shape, vec![1.0, 0.5, -2.25, 12.34567]).unwrap()
    }

    #[test]
    fn test_text_block_layout() {
        let text = render_text_block(0.125, &grid());
        assert_eq!(text, "0.125000\n1.0000,0.5000,\n-2.2500,12.3457,\n");
    }

    #[test]
    fn test_json_block() {
        let grid = grid();
        let report = BlockReport {
            block: 3,
            outcome: RelaxationOutcome {
                delta: 0.5,
                energy: 11.0,
                sweeps: 4,
                stop: StopReason::IterationCap,
            },
            grid: &grid,
        };
        let mut out = Vec::new();
        write_block(&mut out, &report, SnapshotFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["block"], 3);
        assert_eq!(value["sweeps"], 4);
        assert_eq!(value["stop"], "IterationCap");
        assert_eq!(value["grid"][1][0], -2.25);
        assert!(out.ends_with(b"\n"));
    }
}
