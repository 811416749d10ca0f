use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed or out-of-range values in the time columns of an input table.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{label}Non-numeric values in '{column}' at rows {rows:?}")]
    NonNumeric {
        label: String,
        column: String,
        rows: Vec<usize>,
    },

    #[error("{label}Non-integer values in '{column}' at rows {rows:?} (values {values:?})")]
    NonInteger {
        label: String,
        column: String,
        rows: Vec<usize>,
        values: Vec<f64>,
    },

    #[error("{label}'{column}' values out of range {min}-{max} at rows {rows:?} (values {values:?})")]
    OutOfRange {
        label: String,
        column: String,
        min: i64,
        max: i64,
        rows: Vec<usize>,
        values: Vec<i64>,
    },

    #[error("{label}Dates not in a non-leap year at rows {rows:?} (month/day {dates:?})")]
    InvalidDate {
        label: String,
        rows: Vec<usize>,
        dates: Vec<(i64, i64)>,
    },

    #[error("{label}Null values in '{column}' at rows {rows:?}")]
    NullValues {
        label: String,
        column: String,
        rows: Vec<usize>,
    },

    #[error("{label}Incomplete year for zone {zone}: missing {missing} entries: {sample}")]
    IncompleteYear {
        label: String,
        zone: String,
        missing: usize,
        sample: String,
    },
}

/// Structural problems with an input table: missing columns or unmappable months.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{label}Missing required column '{column}'")]
    MissingColumn { label: String, column: String },

    #[error("{label}Months {months:?} not found in seasons map")]
    UnmappedMonths { label: String, months: Vec<i64> },

    #[error("{label}No value column found")]
    NoValueColumn { label: String },
}

#[derive(Debug, Error)]
pub enum TimeSeriesError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Input file not found: '{0}'")]
    InputNotFound(PathBuf),

    #[error("Failed to read CSV file '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}

/// Formats an optional table label as a message prefix, e.g. `"[load] "`.
pub(crate) fn label_prefix(label: &str) -> String {
    if label.is_empty() {
        String::new()
    } else {
        format!("[{label}] ")
    }
}
