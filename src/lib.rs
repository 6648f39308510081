//! `repro`: a CPython extension that drops a reference on demand.
//!
//! `repro.decref(obj)` releases one reference to `obj` that the caller never
//! owned. The resulting corruption is the product: it turns "some borrowed
//! reference outlives its owner" bugs into a deterministic crash.

pub mod logging;
pub mod refcount;

use std::fmt;

use pyo3::prelude::*;
use tracing::debug;

/// Name the module registers under.
pub const MODULE_NAME: &str = "repro";

/// Registration ABI compiled into this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbiVariant {
    /// Limited API (`abi3`), loadable by every CPython 3.7+
    Stable,
    /// Full C API of the interpreter found at build time
    VersionSpecific,
}

impl AbiVariant {
    #[cfg(Py_LIMITED_API)]
    pub const ACTIVE: AbiVariant = AbiVariant::Stable;

    #[cfg(not(Py_LIMITED_API))]
    pub const ACTIVE: AbiVariant = AbiVariant::VersionSpecific;
}

impl fmt::Display for AbiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stable => write!(f, "abi3"),
            Self::VersionSpecific => write!(f, "version-specific"),
        }
    }
}

/// Decrement ref count on obj
#[pyfunction]
#[pyo3(signature = (obj, /))]
fn decref(obj: &PyAny) {
    // The caller asked for an unmatched decrement; there is nothing to uphold.
    unsafe { refcount::release(obj) }
}

/// Add `decref` to `m`.
///
/// The `PyInit_repro` entry point goes through here, and so do the tests,
/// which build the module in an embedded interpreter.
pub fn register(_py: Python<'_>, m: &PyModule) -> PyResult<()> {
    debug!(
        module = MODULE_NAME,
        abi = %AbiVariant::ACTIVE,
        "Registering extension module"
    );

    m.add_function(wrap_pyfunction!(decref, m)?)?;
    Ok(())
}

/// Manually decrement reference counts to reproduce refcount bugs
#[pymodule]
pub fn repro(py: Python<'_>, m: &PyModule) -> PyResult<()> {
    if let Some(config) = logging::LogConfig::from_env() {
        logging::init(config);
    }

    register(py, m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_abi_matches_build() {
        if cfg!(Py_LIMITED_API) {
            assert_eq!(AbiVariant::ACTIVE, AbiVariant::Stable);
        } else {
            assert_eq!(AbiVariant::ACTIVE, AbiVariant::VersionSpecific);
        }
    }

    #[test]
    fn test_abi_display() {
        assert_eq!(AbiVariant::Stable.to_string(), "abi3");
        assert_eq!(AbiVariant::VersionSpecific.to_string(), "version-specific");
    }
}
