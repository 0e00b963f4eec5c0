//! Cell update kernels
//!
//! The engine is generic over [`UpdateKernel`]. Any closure taking
//! `(current, right, top, left, bottom)` works as a kernel.

use serde::{Deserialize, Serialize};

/// Computes a cell's next value from itself and its four neighbours
pub trait UpdateKernel {
    /// New value for a cell
    ///
    /// Argument order follows the input convention: self, right, top, left, bottom.
    fn update(&self, current: f64, right: f64, top: f64, left: f64, bottom: f64) -> f64;
}

impl<F> UpdateKernel for F
where
    F: Fn(f64, f64, f64, f64, f64) -> f64,
{
    #[inline]
    fn update(&self, current: f64, right: f64, top: f64, left: f64, bottom: f64) -> f64 {
        self(current, right, top, left, bottom)
    }
}

/// Explicit discrete heat equation step
///
/// ```text
/// T' = T + α (T_right + T_top + T_left + T_bottom - 4T)
/// ```
///
/// With the default `α = 0.25` this is the plain average of the four neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatEquationKernel {
    /// Diffusion coefficient α; stable for `0 < α <= 0.25`
    pub diffusivity: f64,
}

impl Default for HeatEquationKernel {
    fn default() -> Self {
        Self { diffusivity: 0.25 }
    }
}

impl UpdateKernel for HeatEquationKernel {
    #[inline]
    fn update(&self, current: f64, right: f64, top: f64, left: f64, bottom: f64) -> f64 {
        current + self.diffusivity * ((right + top + left + bottom) - 4.0 * current)
    }
}

/// Fixed-weight blend of a cell and its neighbours
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedAverageKernel {
    pub self_weight: f64,
    /// Weight applied to each of the four neighbours
    pub neighbor_weight: f64,
}

impl Default for WeightedAverageKernel {
    fn default() -> Self {
        Self {
            self_weight: 0.2,
            neighbor_weight: 0.2,
        }
    }
}

impl UpdateKernel for WeightedAverageKernel {
    #[inline]
    fn update(&self, current: f64, right: f64, top: f64, left: f64, bottom: f64) -> f64 {
        self.self_weight * current + self.neighbor_weight * (right + top + left + bottom)
    }
}
