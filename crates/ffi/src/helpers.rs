use crate::error::{with_last_error_mut, DefaultHeatRelaxError, HeatRelaxError, HeatRelaxErrorCode};
use std::ffi::CString;

/// Store `msg` and `code` as this thread's last error.
pub(crate) fn set_last_error(msg: &str, code: HeatRelaxErrorCode) {
    // Interior NULs would make CString::new fail
    let cstring = CString::new(msg.replace('\0', " ")).ok();
    with_last_error_mut(|last| *last = (cstring, code));
}

/// Record `error` as the last error and hand back its code.
pub(crate) fn track_error<E: HeatRelaxError>(error: &E) -> HeatRelaxErrorCode {
    let code = error.code();
    set_last_error(error.msg(), code);
    code
}

pub(crate) fn clear_last_error() {
    with_last_error_mut(|last| *last = (None, HeatRelaxErrorCode::Ok));
}

/// Run an FFI body, translating its result into an error code and keeping
/// the thread-local error state in sync.
pub(crate) fn handle_ffi_result_error<F>(f: F) -> HeatRelaxErrorCode
where
    F: FnOnce() -> Result<(), DefaultHeatRelaxError>,
{
    match f() {
        Ok(()) => {
            clear_last_error();
            HeatRelaxErrorCode::Ok
        }
        Err(e) => track_error(&e),
    }
}
