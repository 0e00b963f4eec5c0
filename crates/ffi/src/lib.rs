//! C ABI for the heat relaxation core
//!
//! Callers own the grid buffer and pass a plain update callback. Every entry
//! point returns a [`HeatRelaxErrorCode`]; on failure the message is available
//! through [`heat_relax_get_last_error`] on the same thread.

mod error;
mod helpers;
mod relax;

pub use error::{heat_relax_get_last_error, heat_relax_get_last_error_code, HeatRelaxErrorCode};
pub use relax::{heat_relax_calculate, heat_relax_heat_eqn, HeatRelaxSourcePoint, HeatRelaxUpdateFn};
