use crate::error::{DefaultHeatRelaxError, HeatRelaxErrorCode};
use crate::helpers::handle_ffi_result_error;
use heat_relax_core::{
    BoundaryMode, ConvergenceCriterion, EnergyAccounting, GridShape, HeatEquationKernel,
    Relaxation, RelaxationParams, SourcePoint, SourceSet, UpdateKernel,
};
use std::slice;

/// Cell update callback: `(current, right, top, left, bottom) -> new value`.
pub type HeatRelaxUpdateFn = extern "C" fn(f64, f64, f64, f64, f64) -> f64;

/// A pinned heat source at `(row, col)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatRelaxSourcePoint {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

/// Standard heat-equation update with a diffusion coefficient of 0.25.
///
/// Suitable as the `update` argument of [`heat_relax_calculate`].
#[no_mangle]
pub extern "C" fn heat_relax_heat_eqn(
    current: f64,
    right: f64,
    top: f64,
    left: f64,
    bottom: f64,
) -> f64 {
    HeatEquationKernel::default().update(current, right, top, left, bottom)
}

/// Relax a caller-owned row-major grid in place.
///
/// Sweeps until the energy delta between consecutive sweeps drops below
/// `threshold` or `max_iterations` sweeps have run, then writes the final
/// delta to `out_delta`. Source cells are never written; their values in
/// `grid` are left as the caller set them.
///
/// Returns `Ok` on success. On failure the grid is untouched and the reason
/// is available from `heat_relax_get_last_error()`.
///
/// # Safety
/// - `grid` must point to `rows * cols` initialised doubles, valid for reads
///   and writes and not aliased for the duration of the call.
/// - `sources` must point to `num_sources` readable entries (may be null when
///   `num_sources` is 0).
/// - `out_delta` must be valid for a write of one double.
#[no_mangle]
#[allow(clippy::too_many_arguments)]
pub unsafe extern "C" fn heat_relax_calculate(
    update: Option<HeatRelaxUpdateFn>,
    grid: *mut f64,
    cols: usize,
    rows: usize,
    sources: *const HeatRelaxSourcePoint,
    num_sources: usize,
    threshold: f64,
    max_iterations: u32,
    is_cyclic: bool,
    out_delta: *mut f64,
) -> HeatRelaxErrorCode {
    handle_ffi_result_error(|| {
        let update = update.ok_or_else(|| DefaultHeatRelaxError::null_pointer("update"))?;
        if grid.is_null() {
            return Err(DefaultHeatRelaxError::null_pointer("grid"));
        }
        if out_delta.is_null() {
            return Err(DefaultHeatRelaxError::null_pointer("out_delta"));
        }
        if num_sources > 0 && sources.is_null() {
            return Err(DefaultHeatRelaxError::null_pointer("sources"));
        }

        if rows.checked_mul(cols).is_none() {
            return Err(DefaultHeatRelaxError::invalid_parameter(format!(
                "Grid of {rows}x{cols} cells overflows usize"
            )));
        }
        let shape = GridShape::new(rows, cols)?;
        let criterion = ConvergenceCriterion::new(threshold, max_iterations)?;

        let points = if num_sources == 0 {
            &[][..]
        } else {
            unsafe { slice::from_raw_parts(sources, num_sources) }
        };
        let source_set: SourceSet = points
            .iter()
            .map(|p| SourcePoint::new(p.row, p.col, p.value))
            .collect();
        source_set.check_within(shape)?;

        let relaxation = Relaxation::new(RelaxationParams {
            boundary: BoundaryMode::from_flag(i64::from(is_cyclic)),
            criterion,
            energy: EnergyAccounting::UpdatedCellsOnly,
        });

        let cells = unsafe { slice::from_raw_parts_mut(grid, shape.cell_count()) };
        let kernel = |current: f64, right: f64, top: f64, left: f64, bottom: f64| {
            update(current, right, top, left, bottom)
        };
        let outcome = relaxation.run(&kernel, cells, shape, &source_set);

        unsafe { out_delta.write(outcome.delta) };
        Ok(())
    })
}
