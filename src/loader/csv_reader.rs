use std::{fs::File, path::Path, str};

use log::{debug, warn};
use memchr::memchr_iter;
use memmap2::Mmap;

use crate::{
    frame::{FrameError, Value, table::Table},
    loader::{CsvOptions, ParseError, ParseSummary},
};

/// Loads a delimited file into a table using memory mapping
///
/// Rows whose field count differs from the header are skipped.
///
/// # Errors
/// Returns a [`FrameError`] if:
/// - File cannot be opened or mapped
/// - A field is not valid UTF-8
/// - The header repeats a column name
///
/// # Example
/// ```rust,no_run
/// # use columnar_frame::loader::{load_csv, CsvOptions};
/// let table = load_csv("data/sales.csv".as_ref(), &CsvOptions::default()).unwrap();
/// println!("{}", table);
/// ```
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Table, FrameError> {
    load_csv_with_summary(path, options).map(|(table, _)| table)
}

/// Same as [`load_csv`], also reporting skipped rows.
pub fn load_csv_with_summary(
    path: &Path,
    options: &CsvOptions,
) -> Result<(Table, ParseSummary), FrameError> {
    let file = File::open(path)?;

    // zero-length files cannot be mapped on every platform
    if file.metadata()?.len() == 0 {
        return parse_csv_with_summary(&[], options);
    }

    let mmap = unsafe { Mmap::map(&file)? };
    let (table, summary) = parse_csv_with_summary(&mmap[..], options)?;
    debug!(
        "loaded {:?}: {} rows, {} columns, {} skipped",
        path,
        summary.rows_processed,
        table.column_count(),
        summary.errors.len()
    );
    Ok((table, summary))
}

/// Parses delimited text held in memory.
pub fn parse_csv(buf: &[u8], options: &CsvOptions) -> Result<Table, FrameError> {
    parse_csv_with_summary(buf, options).map(|(table, _)| table)
}

pub fn parse_csv_with_summary(
    buf: &[u8],
    options: &CsvOptions,
) -> Result<(Table, ParseSummary), FrameError> {
    let lines = split_lines(buf);

    // leading blank lines never name or shape the columns
    let first = match lines.iter().position(|(_, line)| !is_blank(line)) {
        Some(first) => first,
        None => return Ok((Table::empty(), ParseSummary::default())),
    };

    let (headers, data): (Vec<String>, &[(usize, &[u8])]) = if options.has_header {
        (parse_header(lines[first].1, options)?, &lines[first + 1..])
    } else {
        let width = memchr_iter(options.delimiter, lines[first].1).count() + 1;
        ((0..width).map(|i| format!("column_{}", i)).collect(), &lines[first..])
    };

    let num_cols = headers.len();
    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(data.len()); num_cols];
    let mut summary = ParseSummary::default();
    let mut fields = Vec::with_capacity(num_cols);

    for &(line_no, line) in data {
        // a blank line is an empty field when there is one column, else nothing
        if num_cols != 1 && is_blank(line) {
            continue;
        }
        split_fields(line, options.delimiter, &mut fields);

        if fields.len() != num_cols {
            warn!(
                "line {}: expected {} fields, got {}; row skipped",
                line_no,
                num_cols,
                fields.len()
            );
            summary.errors.push(ParseError {
                line: line_no,
                error: format!("Expected {} fields, got {}", num_cols, fields.len()),
            });
            continue;
        }

        for (col, field) in columns.iter_mut().zip(&fields) {
            col.push(parse_field(field, options)?);
        }
        summary.rows_processed += 1;
    }

    let table = Table::new(headers.into_iter().zip(columns).collect())?;
    Ok((table, summary))
}

/// Lines with their 1-based line numbers, `\r\n` tolerated.
fn split_lines(buf: &[u8]) -> Vec<(usize, &[u8])> {
    let mut raw = Vec::new();
    let mut start = 0;
    for newline_pos in memchr_iter(b'\n', buf) {
        raw.push(&buf[start..newline_pos]);
        start = newline_pos + 1;
    }
    if start < buf.len() {
        raw.push(&buf[start..]);
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, line)| (i + 1, line.strip_suffix(b"\r").unwrap_or(line)))
        .collect()
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

fn split_fields<'a>(line: &'a [u8], delimiter: u8, fields: &mut Vec<&'a [u8]>) {
    fields.clear();
    let mut field_start = 0;
    for pos in memchr_iter(delimiter, line) {
        fields.push(&line[field_start..pos]);
        field_start = pos + 1;
    }
    fields.push(&line[field_start..]);
}

fn parse_header(line: &[u8], options: &CsvOptions) -> Result<Vec<String>, FrameError> {
    let mut fields = Vec::new();
    split_fields(line, options.delimiter, &mut fields);
    fields
        .into_iter()
        .map(|field| -> Result<String, FrameError> {
            let field = if options.trim { field.trim_ascii() } else { field };
            Ok(str::from_utf8(field)?.to_string())
        })
        .collect()
}

fn parse_field(raw: &[u8], options: &CsvOptions) -> Result<Value, FrameError> {
    let field = if options.trim { raw.trim_ascii() } else { raw };
    let text = str::from_utf8(field)?;

    if options.null_values.iter().any(|null| null == text) {
        return Ok(Value::Null);
    }
    if !options.infer_types {
        return Ok(Value::Str(text.to_string()));
    }

    if let Ok(v) = atoi_simd::parse::<i64>(field) {
        return Ok(Value::Int(v));
    }
    // fast_float also accepts "inf" and "nan"; only digit-bearing text counts as a number
    if field.iter().any(u8::is_ascii_digit) {
        if let Ok(v) = fast_float::parse::<f64, _>(field) {
            return Ok(Value::Float(v));
        }
    }

    Ok(match text {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => Value::Str(text.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{DataType, column::Column};

    fn make_table_from_str(csv: &str) -> Table {
        use std::io::Write;
        use tempfile::NamedTempFile;

        // write CSV to temp file
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{}", csv).unwrap();

        load_csv(tmp.path(), &CsvOptions::default()).unwrap()
    }

    #[test]
    fn test_row_count() {
        let table = make_table_from_str("id,value\n1,10\n2,20\n3,30\n");
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.column_names(), ["id", "value"]);
    }

    #[test]
    fn test_field_types() {
        let table = make_table_from_str("i,f,s,b,n\n1,1.5,abc,true,\n-2,2,x y,false,NA\n");
        let types = table.dtype();
        assert_eq!(types["i"], DataType::Integer);
        assert_eq!(types["f"], DataType::Mixed);
        assert_eq!(types["s"], DataType::String);
        assert_eq!(types["b"], DataType::Boolean);
        assert_eq!(types["n"], DataType::Null);
        assert_eq!(table.get_col("s").unwrap(), &Column::Str(vec!["abc".into(), "x y".into()]));
    }

    #[test]
    fn test_nulls_make_column_mixed() {
        let table = make_table_from_str("v\n1\n\n2\nnull\n");
        // the empty line is an empty field of the only column
        assert_eq!(table.row_count(), 4);
        assert_eq!(table.count_nulls()["v"], 2);
        assert_eq!(table.dtype()["v"], DataType::Mixed);
        assert_eq!(
            table.get_col("v").unwrap().to_values(),
            vec![Value::Int(1), Value::Null, Value::Int(2), Value::Null]
        );
    }

    #[test]
    fn test_blank_lines_skipped_with_several_columns() {
        let (table, summary) =
            parse_csv_with_summary(b"\na,b\n1,2\n\n  \n3,4\n", &CsvOptions::default()).unwrap();
        assert_eq!(table.column_names(), ["a", "b"]);
        assert_eq!(table.get_col("b").unwrap(), &Column::Int64(vec![2, 4]));
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn test_crlf_and_no_trailing_newline() {
        let table = parse_csv(b"a,b\r\n1,2\r\n3,4", &CsvOptions::default()).unwrap();
        assert_eq!(table.get_col("b").unwrap(), &Column::Int64(vec![2, 4]));
    }

    #[test]
    fn test_ragged_rows_skipped() {
        let (table, summary) =
            parse_csv_with_summary(b"a,b\n1,2\n3\n5,6\n", &CsvOptions::default()).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(summary.rows_processed, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].line, 3);
    }

    #[test]
    fn test_options() {
        let options = CsvOptions::default()
            .with_delimiter(b';')
            .with_header(false)
            .with_type_inference(false);
        let table = parse_csv(b"1;x\n2;y\n", &options).unwrap();
        assert_eq!(table.column_names(), ["column_0", "column_1"]);
        assert_eq!(table.get_col("column_0").unwrap(), &Column::Str(vec!["1".into(), "2".into()]));
    }

    #[test]
    fn test_nan_text_stays_string() {
        let table = parse_csv(b"w\nnan\ninf\n", &CsvOptions::default()).unwrap();
        assert_eq!(table.dtype()["w"], DataType::String);
    }

    #[test]
    fn test_empty_input() {
        let table = make_table_from_str("");
        assert_eq!(table.column_count(), 0);
        let header_only = parse_csv(b"a,b\n", &CsvOptions::default()).unwrap();
        assert_eq!(header_only.column_count(), 2);
        assert_eq!(header_only.row_count(), 0);
    }

    #[test]
    fn test_duplicate_header() {
        assert!(matches!(
            parse_csv(b"a,a\n1,2\n", &CsvOptions::default()),
            Err(FrameError::DuplicateColumn(_))
        ));
    }
}
