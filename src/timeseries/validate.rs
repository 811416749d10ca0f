use crate::timeseries::columns::integer_values;
use crate::timeseries::error::{label_prefix, TimeSeriesError, ValidationError};
use crate::timeseries::schema::{DAY, HOUR, MONTH, SEASON};
use crate::types::calendar::{day_of_year, is_leap_day};
use log::info;
use polars::prelude::{Column, DataFrame};
use std::collections::HashMap;

/// Default time columns checked by [`validate_time_columns`].
pub const TIME_COLUMNS: [&str; 3] = [MONTH, DAY, HOUR];

fn valid_range(column: &str) -> Option<(i64, i64)> {
    match column {
        MONTH | SEASON => Some((1, 12)),
        DAY => Some((1, 31)),
        HOUR => Some((0, 23)),
        _ => None,
    }
}

/// Coerces the given time columns to `Int64` and checks their ranges.
///
/// Month must lie in 1-12, day in 1-31 and hour in 0-23; other column names
/// are only coerced. When both `month` and `day` are checked, every pair must
/// also be a date of the non-leap year, Feb 29 excepted (it is removed later
/// by [`crate::drop_leap_day`]). This is a precondition check: nothing is
/// corrected.
///
/// # Errors
///
/// * [`crate::SchemaError::MissingColumn`] if a column is absent.
/// * [`ValidationError::NonNumeric`], [`ValidationError::NonInteger`] or
///   [`ValidationError::OutOfRange`] naming the first offending rows.
/// * [`ValidationError::InvalidDate`] for pairs such as Apr 31 or Feb 30.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use repdays::{validate_time_columns, TIME_COLUMNS};
///
/// let df = df!(
///     "month" => ["1", "1"],
///     "day" => [1.0, 1.0],
///     "hour" => [0i64, 24],
/// ).unwrap();
/// assert!(validate_time_columns(&df, &TIME_COLUMNS, "load").is_err());
/// ```
pub fn validate_time_columns(
    df: &DataFrame,
    columns: &[&str],
    label: &str,
) -> Result<DataFrame, TimeSeriesError> {
    let mut checked = df.clone();
    let mut coerced: HashMap<&str, Vec<i64>> = HashMap::new();

    for &name in columns {
        let values = integer_values(df, name, label)?;

        if let Some((min, max)) = valid_range(name) {
            let bad: Vec<(usize, i64)> = values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v < min || **v > max)
                .map(|(i, v)| (i, *v))
                .take(5)
                .collect();
            if !bad.is_empty() {
                return Err(ValidationError::OutOfRange {
                    label: label_prefix(label),
                    column: name.to_string(),
                    min,
                    max,
                    rows: bad.iter().map(|(i, _)| *i).collect(),
                    values: bad.iter().map(|(_, v)| *v).collect(),
                }
                .into());
            }
        }

        checked.with_column(Column::new(name.into(), values.clone()))?;
        coerced.insert(name, values);
    }

    if let (Some(months), Some(days)) = (coerced.get(MONTH), coerced.get(DAY)) {
        let bad: Vec<(usize, (i64, i64))> = months
            .iter()
            .zip(days)
            .enumerate()
            // Both columns are range-checked, so the casts cannot wrap.
            .filter(|(_, (m, d))| {
                !is_leap_day(**m, **d) && day_of_year(**m as u32, **d as u32).is_none()
            })
            .map(|(i, (m, d))| (i, (*m, *d)))
            .take(5)
            .collect();
        if !bad.is_empty() {
            return Err(ValidationError::InvalidDate {
                label: label_prefix(label),
                rows: bad.iter().map(|(i, _)| *i).collect(),
                dates: bad.iter().map(|(_, date)| *date).collect(),
            }
            .into());
        }
    }

    Ok(checked)
}

/// Shifts an hour column indexed 1-24 down to 0-23.
///
/// Applied only when the smallest hour is 1 and the largest is at most 24;
/// any other table is returned unchanged.
pub fn shift_one_based_hours(df: &DataFrame, label: &str) -> Result<DataFrame, TimeSeriesError> {
    let hours = integer_values(df, HOUR, label)?;
    let (Some(min), Some(max)) = (hours.iter().min(), hours.iter().max()) else {
        return Ok(df.clone());
    };
    if *min != 1 || *max > 24 {
        return Ok(df.clone());
    }

    info!("{}Shifting hour column from 1-24 to 0-23", label_prefix(label));
    let shifted: Vec<i64> = hours.iter().map(|h| h - 1).collect();
    let mut out = df.clone();
    out.with_column(Column::new(HOUR.into(), shifted))?;
    Ok(out)
}
