use pyo3::exceptions::{PyIndexError, PyKeyError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict, PyFloat, PyInt, PyList, PyString};
use std::path::Path;

use crate::frame::{
    AggregateOp, AggregateResult, FrameError, Value, column_map::ColumnMap,
    group_by::GroupedTable, table::Table,
};
use crate::loader::{CsvOptions, load_csv};

/// Convert Rust errors to Python exceptions
impl From<FrameError> for PyErr {
    fn from(err: FrameError) -> PyErr {
        let msg = err.to_string();
        match err {
            FrameError::MissingColumn(_) => PyKeyError::new_err(msg),
            FrameError::IndexOutOfRange { .. } => PyIndexError::new_err(msg),
            FrameError::Io(_) | FrameError::Utf8(_) => PyRuntimeError::new_err(msg),
            _ => PyValueError::new_err(msg),
        }
    }
}

fn value_to_py(py: Python<'_>, value: &Value) -> Py<PyAny> {
    match value {
        Value::Null => py.None(),
        Value::Bool(b) => PyBool::new(py, *b).to_owned().into_any().unbind(),
        Value::Int(v) => PyInt::new(py, *v).into_any().unbind(),
        Value::Float(v) => PyFloat::new(py, *v).into_any().unbind(),
        Value::Str(s) => PyString::new(py, s).into_any().unbind(),
    }
}

fn py_to_value(obj: &Bound<'_, PyAny>) -> PyResult<Value> {
    if obj.is_none() {
        return Ok(Value::Null);
    }
    // bool is a subclass of int, check it first
    if let Ok(b) = obj.downcast::<PyBool>() {
        return Ok(Value::Bool(b.is_true()));
    }
    if let Ok(v) = obj.extract::<i64>() {
        return Ok(Value::Int(v));
    }
    if let Ok(v) = obj.extract::<f64>() {
        return Ok(Value::Float(v));
    }
    if let Ok(v) = obj.extract::<String>() {
        return Ok(Value::Str(v));
    }
    Err(PyValueError::new_err(format!(
        "unsupported cell type: {}",
        obj.get_type().name()?
    )))
}

/// Per-column results as a dict, keys in column order
fn column_dict<T>(
    py: Python<'_>,
    results: ColumnMap<T>,
    convert: impl Fn(Python<'_>, T) -> PyResult<Py<PyAny>>,
) -> PyResult<Py<PyAny>> {
    let py_dict = PyDict::new(py);
    for (key, value) in results {
        py_dict.set_item(key, convert(py, value)?)?;
    }
    Ok(py_dict.into_any().unbind())
}

fn results_to_dict(py: Python<'_>, results: ColumnMap<AggregateResult>) -> PyResult<Py<PyAny>> {
    column_dict(py, results, |py, r| Ok(value_to_py(py, &Value::from(r))))
}

fn counts_to_dict(py: Python<'_>, counts: ColumnMap<usize>) -> PyResult<Py<PyAny>> {
    column_dict(py, counts, |py, n| Ok(PyInt::new(py, n).into_any().unbind()))
}

#[pyclass(unsendable)]
pub struct PyTable {
    inner: Table,
}

#[pymethods]
impl PyTable {
    /// Build from a dict of column name -> list of values
    #[new]
    pub fn new(data: &Bound<'_, PyDict>) -> PyResult<Self> {
        let mut columns = Vec::with_capacity(data.len());
        for (name, values) in data.iter() {
            let name: String = name.extract()?;
            let cells: Vec<Bound<'_, PyAny>> = values.extract()?;
            let values = cells.iter().map(py_to_value).collect::<PyResult<Vec<_>>>()?;
            columns.push((name, values));
        }
        Ok(PyTable {
            inner: Table::new(columns)?,
        })
    }

    #[staticmethod]
    #[pyo3(signature = (path, delimiter=",", has_header=true))]
    pub fn from_csv(path: &str, delimiter: &str, has_header: bool) -> PyResult<Self> {
        let delimiter = delimiter
            .as_bytes()
            .first()
            .copied()
            .ok_or_else(|| PyValueError::new_err("delimiter must not be empty"))?;
        let options = CsvOptions::default()
            .with_delimiter(delimiter)
            .with_header(has_header);
        Ok(PyTable {
            inner: load_csv(Path::new(path), &options)?,
        })
    }

    pub fn row_count(&self) -> usize {
        self.inner.row_count()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.inner.column_names().to_vec()
    }

    #[pyo3(signature = (n=5))]
    pub fn head(&self, n: usize) -> PyTable {
        PyTable {
            inner: self.inner.head(n),
        }
    }

    #[pyo3(signature = (n=5))]
    pub fn tail(&self, n: usize) -> PyTable {
        PyTable {
            inner: self.inner.tail(n),
        }
    }

    pub fn select_columns(&self, names: Vec<String>) -> PyResult<PyTable> {
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        Ok(PyTable {
            inner: self.inner.select_columns(&names)?,
        })
    }

    pub fn dtype(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        column_dict(py, self.inner.dtype(), |py, dtype| {
            Ok(PyString::new(py, dtype.name()).into_any().unbind())
        })
    }

    pub fn sum(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        results_to_dict(py, self.inner.sum())
    }

    pub fn mean(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        results_to_dict(py, self.inner.mean())
    }

    pub fn min(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        results_to_dict(py, self.inner.min())
    }

    pub fn max(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        results_to_dict(py, self.inner.max())
    }

    pub fn count(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        counts_to_dict(py, self.inner.count())
    }

    pub fn count_nulls(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        counts_to_dict(py, self.inner.count_nulls())
    }

    pub fn fill_na(&self, value: &Bound<'_, PyAny>) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.fill_na(py_to_value(value)?),
        })
    }

    pub fn unique(&self, py: Python<'_>, column: &str) -> PyResult<Vec<Py<PyAny>>> {
        Ok(self
            .inner
            .unique(column)?
            .iter()
            .map(|v| value_to_py(py, v))
            .collect())
    }

    pub fn row(&self, indexes: Vec<usize>) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.row(&indexes)?,
        })
    }

    pub fn range(&self, start: usize, end: usize) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.range(start, end)?,
        })
    }

    pub fn group_by(&self, columns: Vec<String>) -> PyResult<PyGroupedTable> {
        let columns: Vec<&str> = columns.iter().map(String::as_str).collect();
        Ok(PyGroupedTable {
            inner: self.inner.group_by(&columns)?,
        })
    }

    /// Columns as a dict of lists
    pub fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let py_dict = PyDict::new(py);
        for (name, col) in self.inner.iter() {
            let items: Vec<Py<PyAny>> = col.iter().map(|v| value_to_py(py, &v)).collect();
            py_dict.set_item(name, PyList::new(py, items)?)?;
        }
        Ok(py_dict.into_any().unbind())
    }

    fn __len__(&self) -> usize {
        self.inner.row_count()
    }

    fn __repr__(&self) -> String {
        self.inner.to_string()
    }
}

#[pyclass(unsendable)]
pub struct PyGroupedTable {
    inner: GroupedTable,
}

#[pymethods]
impl PyGroupedTable {
    pub fn group_count(&self) -> usize {
        self.inner.group_count()
    }

    /// Reduces `column` per group; `op` is one of sum, mean, count, min, max
    pub fn aggregate(&self, column: &str, op: &str) -> PyResult<PyTable> {
        let op: AggregateOp = op.parse()?;
        Ok(PyTable {
            inner: self.inner.aggregate(column, op)?,
        })
    }

    pub fn sum(&self, column: &str) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.sum(column)?,
        })
    }

    pub fn min(&self, column: &str) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.min(column)?,
        })
    }

    pub fn max(&self, column: &str) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.max(column)?,
        })
    }

    pub fn mean(&self, column: &str) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.mean(column)?,
        })
    }

    pub fn count(&self, column: &str) -> PyResult<PyTable> {
        Ok(PyTable {
            inner: self.inner.count(column)?,
        })
    }
}
