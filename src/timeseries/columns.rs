//! Typed access to DataFrame columns with the error reporting the normalizer needs.

use crate::timeseries::error::{label_prefix, SchemaError, TimeSeriesError, ValidationError};
use polars::prelude::*;

// Number of offending rows quoted in error messages.
const SAMPLE_ROWS: usize = 5;

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

pub(crate) fn require_column<'a>(
    df: &'a DataFrame,
    name: &str,
    label: &str,
) -> Result<&'a Column, SchemaError> {
    df.column(name).map_err(|_| SchemaError::MissingColumn {
        label: label_prefix(label),
        column: name.to_string(),
    })
}

pub(crate) fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Reads a column as floats. String columns are parsed; unparseable strings,
/// nulls and NaN all come back as `None`.
pub(crate) fn float_values(
    df: &DataFrame,
    name: &str,
    label: &str,
) -> Result<Vec<Option<f64>>, TimeSeriesError> {
    let column = require_column(df, name, label)?;
    let values = if matches!(column.dtype(), DataType::String) {
        column
            .str()?
            .into_iter()
            .map(|v| v.and_then(|s| s.trim().parse::<f64>().ok()))
            .collect::<Vec<_>>()
    } else {
        let cast = column.cast(&DataType::Float64)?;
        cast.f64()?.into_iter().collect::<Vec<_>>()
    };
    Ok(values
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect())
}

/// Reads a column as integers, failing on non-numeric or non-integral entries.
pub(crate) fn integer_values(
    df: &DataFrame,
    name: &str,
    label: &str,
) -> Result<Vec<i64>, TimeSeriesError> {
    let values = float_values(df, name, label)?;

    let non_numeric: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_none())
        .map(|(i, _)| i)
        .take(SAMPLE_ROWS)
        .collect();
    if !non_numeric.is_empty() {
        return Err(ValidationError::NonNumeric {
            label: label_prefix(label),
            column: name.to_string(),
            rows: non_numeric,
        }
        .into());
    }

    let non_integer: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.filter(|x| x.fract() != 0.0 || !x.is_finite()).map(|x| (i, x)))
        .take(SAMPLE_ROWS)
        .collect();
    if !non_integer.is_empty() {
        return Err(ValidationError::NonInteger {
            label: label_prefix(label),
            column: name.to_string(),
            rows: non_integer.iter().map(|(i, _)| *i).collect(),
            values: non_integer.iter().map(|(_, x)| *x).collect(),
        }
        .into());
    }

    Ok(values
        .into_iter()
        .map(|v| v.unwrap_or_default() as i64)
        .collect())
}

/// Reads a column as strings (non-string columns are cast). Nulls are rejected.
pub(crate) fn string_values(
    df: &DataFrame,
    name: &str,
    label: &str,
) -> Result<Vec<String>, TimeSeriesError> {
    let column = require_column(df, name, label)?;
    let cast = column.cast(&DataType::String)?;
    let values: Vec<Option<String>> = cast
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect();

    let nulls: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_none())
        .map(|(i, _)| i)
        .take(SAMPLE_ROWS)
        .collect();
    if !nulls.is_empty() {
        return Err(ValidationError::NullValues {
            label: label_prefix(label),
            column: name.to_string(),
            rows: nulls,
        }
        .into());
    }
    Ok(values.into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_numbers_are_parsed() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::new(vec![Column::new("month".into(), vec!["1", " 2", "12.0"])])?;
        assert_eq!(integer_values(&df, "month", "")?, vec![1, 2, 12]);
        Ok(())
    }

    #[test]
    fn fractional_values_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::new(vec![Column::new("hour".into(), vec![0.0, 1.5, 2.0])])?;
        let err = integer_values(&df, "hour", "load").unwrap_err();
        match err {
            TimeSeriesError::Validation(ValidationError::NonInteger { rows, label, .. }) => {
                assert_eq!(rows, vec![1]);
                assert_eq!(label, "[load] ");
            }
            other => panic!("unexpected error: {other}"),
        }
        Ok(())
    }

    #[test]
    fn missing_column_is_a_schema_error() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::new(vec![Column::new("day".into(), vec![1i64])])?;
        assert!(matches!(
            float_values(&df, "value", ""),
            Err(TimeSeriesError::Schema(SchemaError::MissingColumn { .. }))
        ));
        Ok(())
    }

    #[test]
    fn nan_reads_as_missing() -> Result<(), Box<dyn std::error::Error>> {
        let df = DataFrame::new(vec![Column::new("value".into(), vec![0.5, f64::NAN])])?;
        assert_eq!(float_values(&df, "value", "")?, vec![Some(0.5), None]);
        Ok(())
    }
}
