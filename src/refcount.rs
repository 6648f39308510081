//! Reference count access for interpreter-owned objects
//!
//! Thin layer over CPython's own `Py_DECREF` / `Py_REFCNT`. Nothing here
//! tracks or validates ownership; the interpreter owns the count.

use pyo3::{ffi, AsPyPointer, PyAny};
use tracing::trace;

/// Current interpreter-visible reference count of `obj` (for debugging/testing)
#[inline]
pub fn count(obj: &PyAny) -> isize {
    obj.get_refcnt()
}

/// Release one reference to `obj` that the caller does not own.
///
/// # Safety
/// - Nothing is checked: dead, immortal, or already-freed objects are passed
///   straight to `Py_DECREF`
/// - If the count reaches zero the interpreter deallocates `obj` while other
///   holders still point at it; any later use of those references (`obj`
///   included) is a use-after-free
/// - Must be called with the GIL held, which `&PyAny` guarantees
#[inline]
pub unsafe fn release(obj: &PyAny) {
    trace!(
        event = "decref",
        address = ?obj.as_ptr(),
        type_name = obj.get_type().name().unwrap_or("<unknown>"),
        refcount = count(obj),
        "Releasing unowned reference"
    );

    ffi::Py_DECREF(obj.as_ptr());
}
