use heat_relax_core::GeometryError;
use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;

/// Common interface for errors crossing the FFI boundary.
///
/// `code()` is what the caller gets back, `msg()` is stored for
/// [`heat_relax_get_last_error`].
pub(crate) trait HeatRelaxError {
    fn code(&self) -> HeatRelaxErrorCode;

    fn msg(&self) -> &str;
}

/// Default implementation of `HeatRelaxError` for the FFI entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultHeatRelaxError {
    code: HeatRelaxErrorCode,
    msg: String,
}

impl DefaultHeatRelaxError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"grid"`, `"out_delta"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: HeatRelaxErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for invalid parameter.
    pub fn invalid_parameter(message: String) -> Self {
        Self {
            code: HeatRelaxErrorCode::InvalidParameter,
            msg: message,
        }
    }
}

impl From<GeometryError> for DefaultHeatRelaxError {
    fn from(error: GeometryError) -> Self {
        let code = match error {
            GeometryError::EmptyGrid { .. } | GeometryError::SourceOutOfBounds { .. } => {
                HeatRelaxErrorCode::InvalidGeometry
            }
            GeometryError::InvalidThreshold(_) | GeometryError::ZeroIterationCap => {
                HeatRelaxErrorCode::InvalidParameter
            }
        };
        Self {
            code,
            msg: error.to_string(),
        }
    }
}

impl HeatRelaxError for DefaultHeatRelaxError {
    fn code(&self) -> HeatRelaxErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

/// FFI error codes returned by heat relaxation functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatRelaxErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Grid dimensions are zero or a source lies outside the grid.
    InvalidGeometry = 2,

    /// Invalid convergence parameter (threshold or iteration cap).
    InvalidParameter = 3,
}

impl From<DefaultHeatRelaxError> for HeatRelaxErrorCode {
    fn from(error: DefaultHeatRelaxError) -> Self {
        error.code
    }
}

thread_local! {
    /// Most recent FFI error on this thread (C string, error code).
    /// The `CString` lives here so pointers handed out stay valid.
    static LAST_ERROR: RefCell<(Option<CString>, HeatRelaxErrorCode)> =
        const { RefCell::new((None, HeatRelaxErrorCode::Ok)) };
}

pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, HeatRelaxErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, HeatRelaxErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns `null` if the last call on this thread succeeded.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// double delta;
/// if (heat_relax_calculate(heat_relax_heat_eqn, grid, cols, rows, NULL, 0,
///                          0.001, 1000, false, &delta) != Ok) {
///     const char* error = heat_relax_get_last_error();
///     if (error) {
///         fprintf(stderr, "relaxation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn heat_relax_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code (`Ok` if the last call succeeded).
#[no_mangle]
pub extern "C" fn heat_relax_get_last_error_code() -> HeatRelaxErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
