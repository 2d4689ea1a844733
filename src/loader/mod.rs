//! Delimited-text loading into a [`Table`](crate::Table).

pub mod csv_reader;

pub use csv_reader::{load_csv, load_csv_with_summary, parse_csv, parse_csv_with_summary};

/// Options controlling how delimited text is read
///
/// Blank lines are skipped when rows have several fields. With a single
/// column a blank line is one empty field, read through `null_values`.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    /// Field separator byte
    pub delimiter: u8,
    /// Whether the first non-blank line names the columns
    pub has_header: bool,
    /// Strip ASCII whitespace around each field
    pub trim: bool,
    /// Field contents read as null
    pub null_values: Vec<String>,
    /// Parse integers, floats and booleans; otherwise every non-null field is a string
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_header: true,
            trim: true,
            null_values: ["", "NULL", "null", "NA"].map(String::from).to_vec(),
            infer_types: true,
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    pub fn with_null_values(mut self, null_values: Vec<String>) -> Self {
        self.null_values = null_values;
        self
    }

    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

#[derive(Debug, Default)]
pub struct ParseSummary {
    pub rows_processed: usize,
    pub errors: Vec<ParseError>,
}

/// A data row that was skipped
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// 1-based line number in the input
    pub line: usize,
    pub error: String,
}
