use heat_relax_core::io::{write_block, SnapshotFormat};
use heat_relax_core::{
    BoundaryMode, EnergyAccounting, HeatEquationKernel, HeatSimulation, LoadError,
    ProblemDescription,
};
use std::io::Write;
use std::ops::ControlFlow;
use tempfile::NamedTempFile;

#[ctor::ctor]
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn problem_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn run_text(description: &ProblemDescription, max_blocks: usize) -> (String, usize) {
    let mut sim = HeatSimulation::from_description(
        description,
        HeatEquationKernel::default(),
        EnergyAccounting::UpdatedCellsOnly,
    );
    let mut out = Vec::new();
    let summary = sim.run_until_converged(Some(max_blocks), |report| {
        write_block(&mut out, report, SnapshotFormat::Text).unwrap();
        ControlFlow::Continue(())
    });
    (String::from_utf8(out).unwrap(), summary.blocks)
}

#[test]
fn test_single_row_file_converges_in_one_block() {
    let file = problem_file("1, 3\n----\n0, 1, 8\n----\n0.5\n10\n0\n");
    let description = ProblemDescription::from_path(file.path()).unwrap();
    assert_eq!(description.boundary(), BoundaryMode::Clamped);

    let (text, blocks) = run_text(&description, 10);

    // second sweep repeats the first exactly, so the block ends with delta 0
    assert_eq!(blocks, 1);
    assert_eq!(text, "0.000000\n2.0000,8.0000,2.0000,\n");
}

#[test]
fn test_one_sweep_blocks_never_meet_threshold() {
    // every block restarts from zero energy, so a one-sweep block always
    // reports the whole grid energy
    let file = problem_file("1, 3\n----\n0, 1, 8\n----\n0.5\n1\n0\n");
    let description = ProblemDescription::from_path(file.path()).unwrap();

    let (text, blocks) = run_text(&description, 3);

    assert_eq!(blocks, 3);
    assert_eq!(text.matches("4.000000\n").count(), 3);
}

#[test]
fn test_cyclic_file_keeps_sources_pinned() {
    let file = problem_file("4, 4\n----\n3, 3, 12\n0, 0, -4\n----\n0.0001\n25\n1\n");
    let description = ProblemDescription::from_path(file.path()).unwrap();
    let mut sim = HeatSimulation::from_description(
        &description,
        HeatEquationKernel::default(),
        EnergyAccounting::IncludeSources,
    );

    let summary = sim.run_until_converged(Some(100), |report| {
        assert_eq!(report.grid.get(3, 3), 12.0);
        assert_eq!(report.grid.get(0, 0), -4.0);
        ControlFlow::Continue(())
    });

    assert!(summary.converged);
    assert_eq!(sim.params().boundary, BoundaryMode::Cyclic);
}

#[test]
fn test_diverging_kernel_stops_on_nan_delta() {
    let file = problem_file("3, 3\n----\n1, 1, 100\n----\n0.001\n200\n0\n");
    let description = ProblemDescription::from_path(file.path()).unwrap();
    let mut sim = HeatSimulation::from_description(
        &description,
        HeatEquationKernel { diffusivity: 1e300 },
        EnergyAccounting::UpdatedCellsOnly,
    );

    let summary = sim.run_until_converged(None, |_| ControlFlow::Continue(()));

    assert_eq!(summary.blocks, 1);
    assert!(summary.final_delta.is_nan());
    assert!(!summary.converged);
}

#[test]
fn test_malformed_file_reports_bad_format() {
    let file = problem_file("3, 3\n----\n1, 1\n----\n0.1\n5\n0\n");
    let err = ProblemDescription::from_path(file.path()).unwrap_err();
    assert!(matches!(err, LoadError::BadFormat { line: 3, .. }));
    assert!(err.to_string().contains("Bad File Format"));
}
