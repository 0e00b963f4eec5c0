//! Headless heat relaxation runner
//!
//! Loads a problem description, relaxes it block by block and prints the
//! delta and grid after every block until a block ends below the threshold.
//!
//! # Usage
//!
//! ```bash
//! cargo run --package demo-headless -- problem.txt
//! cargo run --package demo-headless -- problem.txt --format json --max-blocks 50
//! ```

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use heat_relax_core::io::write_block;
use heat_relax_core::{
    EnergyAccounting, HeatEquationKernel, HeatSimulation, ProblemDescription, SnapshotFormat,
};
use std::io::{self, BufWriter, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Steady-state heat relaxation on a 2D grid
#[derive(Parser, Debug)]
#[command(name = "heat-relax")]
#[command(about = "Relax a heat grid until the energy delta settles", long_about = None)]
struct Args {
    /// Problem description file
    input: PathBuf,

    /// Heat equation diffusion coefficient, in (0, 0.25]; 0.25 averages the four neighbours
    #[arg(short, long, default_value_t = 0.25, value_parser = parse_diffusivity)]
    diffusivity: f64,

    /// Stop after this many blocks even if the threshold is never met
    #[arg(short, long)]
    max_blocks: Option<usize>,

    /// Snapshot output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Cells counted in each sweep's energy sum
    #[arg(long, value_enum, default_value_t = Energy::Updated)]
    energy: Energy,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Energy {
    /// Only cells rewritten by the sweep
    Updated,
    /// Rewritten cells plus pinned sources
    All,
}

impl From<Format> for SnapshotFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => Self::Text,
            Format::Json => Self::Json,
        }
    }
}

impl From<Energy> for EnergyAccounting {
    fn from(energy: Energy) -> Self {
        match energy {
            Energy::Updated => Self::UpdatedCellsOnly,
            Energy::All => Self::IncludeSources,
        }
    }
}

/// Accept only diffusivities the explicit heat step is stable for
fn parse_diffusivity(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .parse()
        .map_err(|_| format!("'{text}' is not a number"))?;
    if value > 0.0 && value <= 0.25 {
        Ok(value)
    } else {
        Err(format!("{value} is outside the stable range (0, 0.25]"))
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(args: &Args) -> Result<()> {
    let description = ProblemDescription::from_path(&args.input)?;
    info!(
        "{}x{} grid, {} source(s), threshold {}, {} sweep(s) per block, {:?}",
        description.shape().rows(),
        description.shape().cols(),
        description.sources().len(),
        description.criterion().threshold(),
        description.criterion().max_iterations(),
        description.boundary()
    );

    let kernel = HeatEquationKernel {
        diffusivity: args.diffusivity,
    };
    let mut sim = HeatSimulation::from_description(&description, kernel, args.energy.into());
    let format = SnapshotFormat::from(args.format);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut write_result = Ok(());
    let summary = sim.run_until_converged(args.max_blocks, |report| {
        match write_block(&mut out, report, format) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                write_result = Err(e);
                ControlFlow::Break(())
            }
        }
    });
    write_result.context("failed to write snapshot")?;
    out.flush().context("failed to flush output")?;

    debug!("{:?}", summary);
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
