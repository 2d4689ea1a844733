use std::fmt;

use crate::frame::table::Table;

/// Spaces added after the widest cell of each column
const COLUMN_MARGIN: usize = 2;

/// Number of rows shown by `Display`
const PREVIEW_ROWS: usize = 5;

impl Table {
    /// Renders the first `n` rows as left-aligned text columns.
    ///
    /// Each column is padded to its widest header or value plus a fixed
    /// margin. The header line comes first, then one line per row.
    pub fn render(&self, n: usize) -> String {
        let head = self.head(n);

        let cells: Vec<Vec<String>> = head
            .columns()
            .iter()
            .map(|col| col.iter().map(|v| v.to_string()).collect())
            .collect();

        let widths: Vec<usize> = head
            .column_names()
            .iter()
            .zip(&cells)
            .map(|(name, values)| {
                values
                    .iter()
                    .map(|v| v.chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
                    + COLUMN_MARGIN
            })
            .collect();

        let mut out = String::new();
        for (name, &width) in head.column_names().iter().zip(&widths) {
            out.push_str(&format!("{:<width$}", name));
        }
        out.push('\n');

        for row in 0..head.row_count() {
            for (values, &width) in cells.iter().zip(&widths) {
                let cell = values.get(row).map(String::as_str).unwrap_or("");
                out.push_str(&format!("{:<width$}", cell));
            }
            out.push('\n');
        }

        out
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(PREVIEW_ROWS))
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::{Value, table::Table};

    #[test]
    fn test_render_pads_columns() {
        let t = Table::new(vec![
            ("id".into(), vec![1.into(), 100.into()]),
            ("name".into(), vec!["x".into(), Value::Null]),
        ])
        .unwrap();

        assert_eq!(t.render(5), "id   name  \n1    x     \n100  null  \n");
    }

    #[test]
    fn test_display_shows_five_rows() {
        let t = Table::new(vec![("n".into(), (0..8).map(Value::from).collect())]).unwrap();
        let text = t.to_string();
        assert_eq!(text.lines().count(), 6);
        assert!(text.starts_with("n  \n0  \n"));
    }
}
