use crate::frame::{DataType, Value};

/// Column storage, one variant per inferred type tag.
///
/// The variant is decided once when the column is built, so a column's
/// type tag always matches its own data. Typed variants never hold nulls:
/// a column mixing nulls with other values is `Mixed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int64(Vec<i64>),
    Float64(Vec<f64>),
    Str(Vec<String>),
    Bool(Vec<bool>),
    /// All values null; holds the length only
    Null(usize),
    Mixed(Vec<Value>),
}

/// Infers the type tag of a sequence of values.
///
/// Empty input is tagged `Null`.
pub fn infer_type(values: &[Value]) -> DataType {
    let mut iter = values.iter().map(Value::data_type);
    let first = match iter.next() {
        Some(t) => t,
        None => return DataType::Null,
    };
    if iter.all(|t| t == first) {
        first
    } else {
        DataType::Mixed
    }
}

impl Column {
    pub fn from_values(values: Vec<Value>) -> Self {
        match infer_type(&values) {
            DataType::Integer => Column::Int64(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Int(i) => Some(i),
                        _ => None,
                    })
                    .collect(),
            ),
            DataType::Double => Column::Float64(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Float(f) => Some(f),
                        _ => None,
                    })
                    .collect(),
            ),
            DataType::String => Column::Str(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Str(s) => Some(s),
                        _ => None,
                    })
                    .collect(),
            ),
            DataType::Boolean => Column::Bool(
                values
                    .into_iter()
                    .filter_map(|v| match v {
                        Value::Bool(b) => Some(b),
                        _ => None,
                    })
                    .collect(),
            ),
            DataType::Null => Column::Null(values.len()),
            DataType::Mixed => Column::Mixed(values),
        }
    }

    pub fn dtype(&self) -> DataType {
        match self {
            Column::Int64(_) => DataType::Integer,
            Column::Float64(_) => DataType::Double,
            Column::Str(_) => DataType::String,
            Column::Bool(_) => DataType::Boolean,
            Column::Null(_) => DataType::Null,
            Column::Mixed(_) => DataType::Mixed,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int64(v) => v.len(),
            Column::Float64(v) => v.len(),
            Column::Str(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Null(len) => *len,
            Column::Mixed(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Random access
    pub fn get(&self, idx: usize) -> Option<Value> {
        match self {
            Column::Int64(v) => v.get(idx).map(|&i| Value::Int(i)),
            Column::Float64(v) => v.get(idx).map(|&f| Value::Float(f)),
            Column::Str(v) => v.get(idx).map(|s| Value::Str(s.clone())),
            Column::Bool(v) => v.get(idx).map(|&b| Value::Bool(b)),
            Column::Null(len) => (idx < *len).then_some(Value::Null),
            Column::Mixed(v) => v.get(idx).cloned(),
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        match self {
            Column::Int64(v) => Box::new(v.iter().map(|&i| Value::Int(i))),
            Column::Float64(v) => Box::new(v.iter().map(|&f| Value::Float(f))),
            Column::Str(v) => Box::new(v.iter().map(|s| Value::Str(s.clone()))),
            Column::Bool(v) => Box::new(v.iter().map(|&b| Value::Bool(b))),
            Column::Null(len) => Box::new(std::iter::repeat_n(Value::Null, *len)),
            Column::Mixed(v) => Box::new(v.iter().cloned()),
        }
    }

    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    pub fn null_count(&self) -> usize {
        match self {
            Column::Null(len) => *len,
            Column::Mixed(v) => v.iter().filter(|v| v.is_null()).count(),
            _ => 0,
        }
    }

    /// Positional slice `[start, end)`. Bounds are clamped to the column length.
    pub fn slice(&self, start: usize, end: usize) -> Column {
        let end = end.min(self.len());
        let start = start.min(end);
        match self {
            Column::Int64(v) => Column::Int64(v[start..end].to_vec()),
            Column::Float64(v) => Column::Float64(v[start..end].to_vec()),
            Column::Str(v) => Column::Str(v[start..end].to_vec()),
            Column::Bool(v) => Column::Bool(v[start..end].to_vec()),
            Column::Null(_) => Column::Null(end - start),
            Column::Mixed(v) => Column::from_values(v[start..end].to_vec()),
        }
    }

    /// Gathers the given positions. Callers validate the indices first.
    pub(crate) fn take(&self, indices: &[usize]) -> Column {
        match self {
            Column::Int64(v) => Column::Int64(indices.iter().map(|&i| v[i]).collect()),
            Column::Float64(v) => Column::Float64(indices.iter().map(|&i| v[i]).collect()),
            Column::Str(v) => Column::Str(indices.iter().map(|&i| v[i].clone()).collect()),
            Column::Bool(v) => Column::Bool(indices.iter().map(|&i| v[i]).collect()),
            Column::Null(_) => Column::Null(indices.len()),
            Column::Mixed(v) => Column::from_values(indices.iter().map(|&i| v[i].clone()).collect()),
        }
    }

    /// Replaces every null with `fill`, re-inferring the variant.
    pub fn fill_null(&self, fill: &Value) -> Column {
        match self {
            Column::Null(len) => Column::from_values(vec![fill.clone(); *len]),
            Column::Mixed(v) => Column::from_values(
                v.iter()
                    .map(|item| if item.is_null() { fill.clone() } else { item.clone() })
                    .collect(),
            ),
            typed => typed.clone(),
        }
    }
}

impl From<Vec<Value>> for Column {
    fn from(values: Vec<Value>) -> Self {
        Column::from_values(values)
    }
}
