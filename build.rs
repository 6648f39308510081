fn main() {
    // Emits `Py_3_*` and `Py_LIMITED_API` cfgs for the interpreter being
    // built against, so the crate can tell which ABI variant is active.
    pyo3_build_config::use_pyo3_cfgs();

    println!("cargo:rerun-if-changed=build.rs");
}
