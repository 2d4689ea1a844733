//! Grouping engine and per-group reductions.
//!
//! Rows are partitioned by a composite [`GroupKey`] holding the values of the
//! group-by columns, compared component-wise. Groups are kept in
//! first-occurrence order and rows keep their original order inside a group.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::{
    frame::{AggregateOp, FrameError, Value, column::Column, table::Table},
    helpers::reduce::reduce_values,
};

/// Composite value of the group-by columns for one row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<Value>);

impl GroupKey {
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for GroupKey {
    fn from(values: Vec<Value>) -> Self {
        GroupKey(values)
    }
}

/// The rows of one group, stored column by column
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    key: GroupKey,
    columns: Vec<Vec<Value>>,
}

impl Group {
    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A table partitioned by one or more key columns, pending reduction
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTable {
    headers: Vec<String>,
    group_by_columns: Vec<String>,
    /// positions of the group-by columns in `headers`
    key_positions: Vec<usize>,
    groups: Vec<Group>,
}

/// Partitions `table` by `columns`. A name repeated in `columns` counts once.
pub(crate) fn group(table: &Table, columns: &[&str]) -> Result<GroupedTable, FrameError> {
    if columns.is_empty() {
        return Err(FrameError::InvalidGrouping);
    }

    let mut columns = columns.to_vec();
    let mut seen = HashSet::with_capacity(columns.len());
    columns.retain(|name| seen.insert(*name));

    let key_positions = columns
        .iter()
        .map(|name| {
            table
                .position(name)
                .ok_or_else(|| FrameError::MissingColumn(name.to_string()))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let all_columns = table.columns();
    let row_count = all_columns[key_positions[0]].len();

    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for row in 0..row_count {
        let key = GroupKey(
            key_positions
                .iter()
                .map(|&pos| all_columns[pos].get(row).unwrap_or_default())
                .collect(),
        );

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(Group {
                key,
                columns: vec![Vec::new(); all_columns.len()],
            });
            groups.len() - 1
        });

        for (values, col) in groups[slot].columns.iter_mut().zip(all_columns) {
            values.push(col.get(row).unwrap_or_default());
        }
    }

    debug!(
        "grouped {} rows by {:?} into {} groups",
        row_count,
        columns,
        groups.len()
    );

    Ok(GroupedTable {
        headers: table.column_names().to_vec(),
        group_by_columns: columns.iter().map(|c| c.to_string()).collect(),
        key_positions,
        groups,
    })
}

impl GroupedTable {
    pub fn group_by_columns(&self) -> &[String] {
        &self.group_by_columns
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Group keys in first-occurrence order.
    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> + '_ {
        self.groups.iter().map(Group::key)
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// The rows of one group as a table with every original column.
    pub fn group(&self, key: &GroupKey) -> Option<Table> {
        let group = self.groups.iter().find(|g| &g.key == key)?;
        Table::from_columns(
            self.headers
                .iter()
                .cloned()
                .zip(group.columns.iter().cloned().map(Column::from_values))
                .collect(),
        )
        .ok()
    }

    /// Reduces `column` within every group.
    ///
    /// The result has one row per group, in first-occurrence order. Its
    /// columns are the group-by columns followed by the reduced column. When
    /// `column` is itself a group-by column, the reduced values replace that
    /// key column in place and no column is appended.
    ///
    /// # Errors
    /// - [`FrameError::MissingColumn`] if `column` does not exist
    /// - [`FrameError::NonNumeric`] if a group's values do not support `op`
    pub fn aggregate(&self, column: &str, op: AggregateOp) -> Result<Table, FrameError> {
        let target = self
            .headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| FrameError::MissingColumn(column.to_string()))?;

        let mut key_columns: Vec<Vec<Value>> =
            vec![Vec::with_capacity(self.groups.len()); self.key_positions.len()];
        let mut reduced = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            // key components are read back from the group's own slice
            for (out, &pos) in key_columns.iter_mut().zip(&self.key_positions) {
                out.push(group.columns[pos].first().cloned().unwrap_or_default());
            }
            reduced.push(reduce_values(&group.columns[target], op, column)?);
        }

        let mut data: Vec<(String, Vec<Value>)> = self
            .group_by_columns
            .iter()
            .cloned()
            .zip(key_columns)
            .collect();
        match data.iter_mut().find(|(name, _)| name == column) {
            Some((_, values)) => *values = reduced,
            None => data.push((column.to_string(), reduced)),
        }

        debug!("{} of '{}' over {} groups", op, column, self.groups.len());
        Table::new(data)
    }

    pub fn sum(&self, column: &str) -> Result<Table, FrameError> {
        self.aggregate(column, AggregateOp::Sum)
    }

    pub fn min(&self, column: &str) -> Result<Table, FrameError> {
        self.aggregate(column, AggregateOp::Min)
    }

    pub fn max(&self, column: &str) -> Result<Table, FrameError> {
        self.aggregate(column, AggregateOp::Max)
    }

    pub fn mean(&self, column: &str) -> Result<Table, FrameError> {
        self.aggregate(column, AggregateOp::Mean)
    }

    pub fn count(&self, column: &str) -> Result<Table, FrameError> {
        self.aggregate(column, AggregateOp::Count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders() -> Table {
        Table::new(vec![
            ("product".into(), vec!["A".into(), "A".into(), "B".into()]),
            ("region".into(), vec!["EU".into(), "US".into(), "EU".into()]),
            ("unit_price".into(), vec![10.into(), 20.into(), 30.into()]),
        ])
        .unwrap()
    }

    #[test]
    fn test_group_keeps_first_occurrence_order() {
        let grouped = orders().group_by(&["product"]).unwrap();
        let keys: Vec<&GroupKey> = grouped.keys().collect();
        assert_eq!(keys, vec![
            &GroupKey::from(vec![Value::from("A")]),
            &GroupKey::from(vec![Value::from("B")]),
        ]);
        assert_eq!(grouped.groups()[0].len(), 2);
    }

    #[test]
    fn test_group_slice_holds_every_column() {
        let grouped = orders().group_by(&["product"]).unwrap();
        let a = grouped.group(&vec![Value::from("A")].into()).unwrap();
        assert_eq!(a.column_names(), orders().column_names());
        assert_eq!(a.get_col("region").unwrap(), &Column::Str(vec!["EU".into(), "US".into()]));
    }

    #[test]
    fn test_sum_per_group() {
        let result = orders().group_by(&["product"]).unwrap().sum("unit_price").unwrap();
        assert_eq!(result.column_names(), ["product", "unit_price"]);
        assert_eq!(result.get_col("product").unwrap(), &Column::Str(vec!["A".into(), "B".into()]));
        assert_eq!(result.get_col("unit_price").unwrap(), &Column::Int64(vec![30, 30]));
    }

    #[test]
    fn test_min_max_per_group() {
        let grouped = orders().group_by(&["product"]).unwrap();
        assert_eq!(
            grouped.max("unit_price").unwrap().get_col("unit_price").unwrap(),
            &Column::Int64(vec![20, 30])
        );
        assert_eq!(
            grouped.min("unit_price").unwrap().get_col("unit_price").unwrap(),
            &Column::Int64(vec![10, 30])
        );
    }

    #[test]
    fn test_composite_key() {
        let result = orders()
            .group_by(&["region", "product"])
            .unwrap()
            .sum("unit_price")
            .unwrap();
        assert_eq!(result.row_count(), 3);
        assert_eq!(result.column_names(), ["region", "product", "unit_price"]);
        assert_eq!(
            result.row_values(0).unwrap(),
            vec![Value::from("EU"), Value::from("A"), Value::Int(10)]
        );
    }

    #[test]
    fn test_key_with_separator_does_not_collide() {
        let t = Table::new(vec![
            ("a".into(), vec!["x_y".into(), "x".into()]),
            ("b".into(), vec!["z".into(), "y_z".into()]),
            ("n".into(), vec![1.into(), 2.into()]),
        ])
        .unwrap();
        assert_eq!(t.group_by(&["a", "b"]).unwrap().group_count(), 2);
    }

    #[test]
    fn test_null_is_its_own_group() {
        let t = Table::new(vec![
            ("k".into(), vec![Value::Null, "a".into(), Value::Null]),
            ("n".into(), vec![1.into(), 2.into(), 3.into()]),
        ])
        .unwrap();
        let result = t.group_by(&["k"]).unwrap().sum("n").unwrap();
        assert_eq!(result.get_col("n").unwrap(), &Column::Int64(vec![4, 2]));
    }

    #[test]
    fn test_mean_and_count() {
        let grouped = orders().group_by(&["product"]).unwrap();
        assert_eq!(
            grouped.mean("unit_price").unwrap().get_col("unit_price").unwrap(),
            &Column::Float64(vec![15.0, 30.0])
        );
        assert_eq!(
            grouped.count("region").unwrap().get_col("region").unwrap(),
            &Column::Int64(vec![2, 1])
        );
    }

    #[test]
    fn test_errors() {
        let t = orders();
        assert!(matches!(t.group_by(&["nope"]), Err(FrameError::MissingColumn(_))));
        let grouped = t.group_by(&["product"]).unwrap();
        assert!(matches!(grouped.sum("nope"), Err(FrameError::MissingColumn(_))));
        assert!(matches!(grouped.sum("region"), Err(FrameError::NonNumeric { .. })));
        assert!(matches!(grouped.sum("product"), Err(FrameError::NonNumeric { .. })));
    }

    #[test]
    fn test_reducing_a_key_column_replaces_it() {
        let grouped = orders().group_by(&["product"]).unwrap();

        let counts = grouped.count("product").unwrap();
        assert_eq!(counts.column_names(), ["product"]);
        assert_eq!(counts.get_col("product").unwrap(), &Column::Int64(vec![2, 1]));

        let max = grouped.max("product").unwrap();
        assert_eq!(max.column_names(), ["product"]);
        assert_eq!(max.get_col("product").unwrap(), &Column::Str(vec!["A".into(), "B".into()]));
    }

    #[test]
    fn test_reducing_one_of_several_keys() {
        let result = orders()
            .group_by(&["product", "region"])
            .unwrap()
            .count("region")
            .unwrap();
        assert_eq!(result.column_names(), ["product", "region"]);
        assert_eq!(result.get_col("region").unwrap(), &Column::Int64(vec![1, 1, 1]));
    }

    #[test]
    fn test_repeated_key_name_counts_once() {
        let grouped = orders().group_by(&["product", "product"]).unwrap();
        assert_eq!(grouped.group_by_columns(), ["product"]);
        assert_eq!(grouped.group_count(), 2);

        let result = grouped.sum("unit_price").unwrap();
        assert_eq!(result.column_names(), ["product", "unit_price"]);
        assert_eq!(result.get_col("unit_price").unwrap(), &Column::Int64(vec![30, 30]));
    }

    #[test]
    fn test_empty_table_yields_no_groups() {
        let t = Table::new(vec![("k".into(), vec![]), ("n".into(), vec![])]).unwrap();
        let result = t.group_by(&["k"]).unwrap().sum("n").unwrap();
        assert_eq!(result.row_count(), 0);
        assert_eq!(result.column_names(), ["k", "n"]);
    }
}
