use std::collections::HashSet;

use crate::{
    frame::{
        AggregateOp, AggregateResult, DataType, FrameError, Value, column::Column,
        column_map::ColumnMap,
        group_by::{self, GroupedTable},
    },
    helpers::reduce::{aggregate_f64, aggregate_i64},
};

/// Immutable in-memory columnar table
///
/// Every column has the same length (the row count). This is a caller
/// precondition and is not re-checked by each operation. All operations
/// return new values and leave the receiver untouched.
///
/// # Examples
///
/// ```rust
/// # use columnar_frame::{Table, Value};
/// let table = Table::new(vec![
///     ("product".to_string(), vec!["A".into(), "A".into(), "B".into()]),
///     ("unit_price".to_string(), vec![10.into(), 20.into(), 30.into()]),
/// ])
/// .unwrap();
///
/// let totals = table.group_by(&["product"]).unwrap().sum("unit_price").unwrap();
/// assert_eq!(totals.column("unit_price").unwrap().to_values(), vec![Value::Int(30), Value::Int(30)]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    headers: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table from an ordered list of `(name, values)` pairs.
    ///
    /// Each column's type is inferred from its values.
    ///
    /// # Errors
    /// [`FrameError::DuplicateColumn`] if a name appears twice.
    pub fn new(data: Vec<(String, Vec<Value>)>) -> Result<Self, FrameError> {
        Self::from_columns(
            data.into_iter()
                .map(|(name, values)| (name, Column::from_values(values)))
                .collect(),
        )
    }

    /// Builds a table from already typed columns.
    pub fn from_columns(columns: Vec<(String, Column)>) -> Result<Self, FrameError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for (name, _) in &columns {
            if !seen.insert(name.as_str()) {
                return Err(FrameError::DuplicateColumn(name.clone()));
            }
        }

        let (headers, columns) = columns.into_iter().unzip();
        Ok(Table { headers, columns })
    }

    /// Table with no columns.
    pub fn empty() -> Self {
        Self::default()
    }

    // Derived tables reuse already unique headers.
    fn with_columns(&self, columns: Vec<Column>) -> Self {
        Table {
            headers: self.headers.clone(),
            columns,
        }
    }

    /// Number of rows, taken from the first column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.headers
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.position(name).map(|idx| &self.columns[idx])
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn get_col(&self, col_name: &str) -> Result<&Column, FrameError> {
        self.column(col_name)
            .ok_or_else(|| FrameError::MissingColumn(col_name.to_string()))
    }

    /// Iterates `(name, column)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> + '_ {
        self.headers.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// First `n` rows. Asking for more rows than exist yields the whole table.
    pub fn head(&self, n: usize) -> Table {
        self.with_columns(self.columns.iter().map(|c| c.slice(0, n)).collect())
    }

    /// Last `n` rows. Asking for more rows than exist yields the whole table.
    pub fn tail(&self, n: usize) -> Table {
        self.with_columns(
            self.columns
                .iter()
                .map(|c| c.slice(c.len().saturating_sub(n), c.len()))
                .collect(),
        )
    }

    /// Keeps the columns named in `names`, in this table's column order.
    ///
    /// Unknown names are ignored.
    ///
    /// # Errors
    /// [`FrameError::MissingColumn`] if none of `names` exists.
    pub fn select_columns(&self, names: &[&str]) -> Result<Table, FrameError> {
        let (headers, columns): (Vec<String>, Vec<Column>) = self
            .iter()
            .filter(|(name, _)| names.contains(name))
            .map(|(name, col)| (name.to_string(), col.clone()))
            .unzip();

        if headers.is_empty() {
            return Err(FrameError::MissingColumn(names.join(", ")));
        }

        Ok(Table { headers, columns })
    }

    /// Type tag of every column, derived from this table's own data.
    pub fn dtype(&self) -> ColumnMap<DataType> {
        self.iter()
            .map(|(name, col)| (name.to_string(), col.dtype()))
            .collect()
    }

    /// Applies `op` to every numeric column, in column order.
    ///
    /// Columns tagged anything other than `integer` or `double` are omitted.
    /// Numeric columns never contain nulls, since a null makes the column
    /// `mixed`; empty and all-null columns are tagged `null` and omitted too.
    pub fn aggregate(&self, op: AggregateOp) -> ColumnMap<AggregateResult> {
        self.iter()
            .filter_map(|(name, col)| {
                let result = match col {
                    Column::Int64(values) => aggregate_i64(values, op),
                    Column::Float64(values) => aggregate_f64(values, op),
                    _ => None,
                }?;
                Some((name.to_string(), result))
            })
            .collect()
    }

    pub fn sum(&self) -> ColumnMap<AggregateResult> {
        self.aggregate(AggregateOp::Sum)
    }

    pub fn mean(&self) -> ColumnMap<AggregateResult> {
        self.aggregate(AggregateOp::Mean)
    }

    pub fn min(&self) -> ColumnMap<AggregateResult> {
        self.aggregate(AggregateOp::Min)
    }

    pub fn max(&self) -> ColumnMap<AggregateResult> {
        self.aggregate(AggregateOp::Max)
    }

    /// Non-null values per column.
    pub fn count(&self) -> ColumnMap<usize> {
        self.iter()
            .map(|(name, col)| (name.to_string(), col.len() - col.null_count()))
            .collect()
    }

    /// Null values per column.
    pub fn count_nulls(&self) -> ColumnMap<usize> {
        self.iter()
            .map(|(name, col)| (name.to_string(), col.null_count()))
            .collect()
    }

    /// Replaces every null with `value`. Column types are re-inferred.
    pub fn fill_na(&self, value: impl Into<Value>) -> Table {
        let value = value.into();
        self.with_columns(self.columns.iter().map(|c| c.fill_null(&value)).collect())
    }

    /// Distinct values of a column in first-occurrence order.
    pub fn unique(&self, column: &str) -> Result<Vec<Value>, FrameError> {
        let col = self.get_col(column)?;
        let mut seen = HashSet::new();
        Ok(col.iter().filter(|v| seen.insert(v.clone())).collect())
    }

    fn check_index(&self, index: usize) -> Result<(), FrameError> {
        let len = self.row_count();
        if index >= len {
            return Err(FrameError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Rows at the given positions, in the given order, keeping column names.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] if any index is past the last row.
    pub fn row(&self, indexes: &[usize]) -> Result<Table, FrameError> {
        for &index in indexes {
            self.check_index(index)?;
        }
        Ok(self.with_columns(self.columns.iter().map(|c| c.take(indexes)).collect()))
    }

    /// Rows `start..=end`, keeping column names.
    ///
    /// `start > end` yields a table with no rows.
    ///
    /// # Errors
    /// [`FrameError::IndexOutOfRange`] if `end` is past the last row.
    pub fn range(&self, start: usize, end: usize) -> Result<Table, FrameError> {
        if start > end {
            return self.row(&[]);
        }
        self.check_index(end)?;
        Ok(self.with_columns(self.columns.iter().map(|c| c.slice(start, end + 1)).collect()))
    }

    /// Values of one row across all columns, in column order.
    pub fn row_values(&self, index: usize) -> Result<Vec<Value>, FrameError> {
        self.check_index(index)?;
        Ok(self
            .columns
            .iter()
            .map(|c| c.get(index).unwrap_or_default())
            .collect())
    }

    /// Iterates rows as value vectors.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.row_count()).map(move |i| {
            self.columns
                .iter()
                .map(|c| c.get(i).unwrap_or_default())
                .collect()
        })
    }

    /// Partitions rows by the composite value of `columns`.
    ///
    /// # Errors
    /// [`FrameError::InvalidGrouping`] if `columns` is empty,
    /// [`FrameError::MissingColumn`] if one of them does not exist.
    pub fn group_by(&self, columns: &[&str]) -> Result<GroupedTable, FrameError> {
        group_by::group(self, columns)
    }
}
