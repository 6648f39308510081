#![allow(dead_code)]

use pyo3::prelude::*;

/// Fresh `repro` module built in the embedded interpreter
pub fn repro_module(py: Python<'_>) -> PyResult<&PyModule> {
    let m = PyModule::new(py, repro::MODULE_NAME)?;
    repro::register(py, m)?;
    Ok(m)
}

/// Instance of a plain Python class (weak-referenceable), owned only by the
/// returned handle
pub fn probe(py: Python<'_>) -> PyResult<PyObject> {
    let class: PyObject = py.eval("type('Probe', (), {})", None, None)?.into();
    class.call0(py)
}
