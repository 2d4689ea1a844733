//! # ColumnarFrame
//!
//! `ColumnarFrame` is a small in-memory columnar table written in Rust.
//! It supports:
//!
//! - Column storage typed per column (integer, double, string, boolean, null, mixed)
//! - Type inference recomputed for every derived table
//! - Selection and slicing: head, tail, column selection, row and range access
//! - Null handling: per-column counts and fill
//! - Table-level reductions over numeric columns: sum, mean, min, max
//! - Group-by on one or more key columns with per-group sum, mean, min, max, count
//! - Memory-mapped delimited-text loading
//!
//! Tables are immutable: every operation returns a new table.
//!
//! # Example
//!
//! ```rust
//! use columnar_frame::{Table, Value};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let table = Table::new(vec![
//!         ("product".to_string(), vec!["A".into(), "A".into(), "B".into()]),
//!         ("unit_price".to_string(), vec![10.into(), 20.into(), 30.into()]),
//!     ])?;
//!
//!     // Table-level reduction over numeric columns
//!     println!("{:?}", table.sum());
//!
//!     // Group by product and keep the highest price of each
//!     let highest = table.group_by(&["product"])?.max("unit_price")?;
//!     assert_eq!(
//!         highest.row_values(0)?,
//!         vec![Value::from("A"), Value::Int(20)]
//!     );
//!     println!("{}", highest);
//!
//!     Ok(())
//! }
//! ```

mod helpers;
pub mod frame;
pub mod loader;

#[cfg(feature = "python-bindings")]
pub mod python;

pub use frame::{
    AggregateOp, AggregateResult, DataType, FrameError, Value,
    column::{Column, infer_type},
    column_map::ColumnMap,
    group_by::{Group, GroupKey, GroupedTable},
    table::Table,
};
pub use loader::{CsvOptions, load_csv, parse_csv};
