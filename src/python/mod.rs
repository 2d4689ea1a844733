#![cfg(feature = "python-bindings")]

use pyo3::types::PyModuleMethods;
use pyo3::{Bound, PyResult, Python, pymodule, types::PyModule};

pub mod py_table;

#[pymodule]
fn columnar_frame(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<py_table::PyTable>()?;
    m.add_class::<py_table::PyGroupedTable>()?;
    Ok(())
}
