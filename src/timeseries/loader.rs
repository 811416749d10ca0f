//! Reads a raw month/day/hour CSV and runs the standard cleaning steps on it.

use crate::timeseries::completeness::{check_complete_year, CompletenessReport};
use crate::timeseries::error::TimeSeriesError;
use crate::timeseries::leap_day::{drop_leap_day, LeapDayReport};
use crate::timeseries::normalize::{normalize_value, NormalizeOutcome};
use crate::timeseries::schema::{ProfileSchema, DAY, HOUR, MONTH, SEASON, VALUE, ZONE};
use crate::timeseries::validate::{shift_one_based_hours, validate_time_columns};
use bon::builder;
use log::info;
use polars::prelude::*;
use std::path::Path;

/// A cleaned long-format table and what the cleaning steps did to it.
#[derive(Debug, Clone)]
pub struct CleanedTimeSeries {
    pub frame: DataFrame,
    /// Name of the value column in `frame` (after any rename).
    pub value_column: String,
    pub leap_days: LeapDayReport,
    /// `None` when normalization was disabled.
    pub normalization: Option<NormalizeOutcome>,
    /// `None` when the completeness check was disabled.
    pub completeness: Option<CompletenessReport>,
}

/// Loads and standardizes a raw month/day/hour time-series CSV.
///
/// Steps, in order: read the CSV, accept `season` as an alias for `month`,
/// validate the time columns (shifting 1-24 hours to 0-23 first), require
/// `zone` (unless `require_zone(false)`), resolve the value column, optionally
/// rename it, drop excluded zones, drop Feb 29, rescale values to `[0, 1]` and
/// check for a complete year.
///
/// This function uses a builder pattern.
///
/// # Arguments
///
/// * `.input_path(&Path)`: **Required.** CSV file with a header row.
/// * `.zones_to_exclude(&[String])`: Optional. Zones to remove.
/// * `.value_column(&str)`: Optional. Preferred value column. Defaults to `"value"`.
/// * `.rename_value_to(&str)`: Optional. New name for the value column.
/// * `.normalize(bool)`: Optional. Defaults to `true`.
/// * `.drop_feb_29(bool)`: Optional. Defaults to `true`.
/// * `.check_complete_year(bool)`: Optional. Defaults to `false`; incompleteness is
///   reported, not raised.
/// * `.require_zone(bool)`: Optional. Defaults to `true`.
///
/// # Errors
///
/// [`TimeSeriesError::InputNotFound`] for a missing file, [`TimeSeriesError::CsvRead`]
/// if polars cannot parse it, and any validation or schema error of the steps above.
///
/// # Examples
///
/// ```no_run
/// use repdays::load_and_clean_timeseries;
/// use std::path::Path;
///
/// let cleaned = load_and_clean_timeseries()
///     .input_path(Path::new("data/load_profiles.csv"))
///     .zones_to_exclude(&["Atlantis".to_string()])
///     .check_complete_year(true)
///     .call()
///     .unwrap();
/// println!("{}", cleaned.frame.head(Some(5)));
/// ```
#[builder]
pub fn load_and_clean_timeseries(
    input_path: &Path,
    zones_to_exclude: Option<&[String]>,
    value_column: Option<&str>,
    rename_value_to: Option<&str>,
    normalize: Option<bool>,
    drop_feb_29: Option<bool>,
    check_complete_year: Option<bool>,
    require_zone: Option<bool>,
) -> Result<CleanedTimeSeries, TimeSeriesError> {
    let label = input_path.display().to_string();
    if !input_path.exists() {
        return Err(TimeSeriesError::InputNotFound(input_path.to_path_buf()));
    }

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(input_path.to_path_buf()))
        .map_err(|e| TimeSeriesError::CsvRead {
            path: input_path.to_path_buf(),
            source: e,
        })?
        .finish()
        .map_err(|e| TimeSeriesError::CsvRead {
            path: input_path.to_path_buf(),
            source: e,
        })?;
    info!("[{}] Read {} rows", label, df.height());

    let schema = ProfileSchema::resolve(&df, value_column.unwrap_or(VALUE), &label)?;
    if schema.month == SEASON {
        df.rename(SEASON, MONTH.into())?;
    }
    // Hours are range-checked only after a possible 1-24 shift.
    let df = validate_time_columns(&df, &[MONTH, DAY], &label)?;
    let df = shift_one_based_hours(&df, &label)?;
    let mut df = validate_time_columns(&df, &[HOUR], &label)?;
    if require_zone.unwrap_or(true) {
        schema.require_zone(&label)?;
    }

    let mut value_col = schema.value.clone();
    if let Some(new_name) = rename_value_to {
        if new_name != value_col {
            df.rename(&value_col, new_name.into())?;
            value_col = new_name.to_string();
        }
    }

    if let Some(excluded) = zones_to_exclude.filter(|z| !z.is_empty()) {
        if schema.has_zone {
            let before = df.height();
            let excluded = Series::new("excluded".into(), excluded);
            df = df
                .lazy()
                .filter(col(ZONE).cast(DataType::String).is_in(lit(excluded)).not())
                .collect()?;
            info!("[{}] Excluded {} rows by zone", label, before - df.height());
        }
    }

    let (df, leap_days) = if drop_feb_29.unwrap_or(true) {
        drop_leap_day(&df, &label)?
    } else {
        (df, LeapDayReport::default())
    };

    let (df, normalization) = if normalize.unwrap_or(true) {
        let (df, outcome) = normalize_value(&df, &value_col, &label)?;
        (df, Some(outcome))
    } else {
        (df, None)
    };

    let completeness = if check_complete_year.unwrap_or(false) && schema.has_zone {
        Some(self::check_complete_year(&df, &label)?)
    } else {
        None
    };

    Ok(CleanedTimeSeries {
        frame: df,
        value_column: value_col,
        leap_days,
        normalization,
        completeness,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn cleans_a_raw_csv() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv(
            "zone,season,day,hour,2019,2020\n\
             A,2,28,1,10,100\n\
             A,2,29,1,10,200\n\
             A,3,1,24,10,50\n\
             B,3,1,1,10,80\n",
        );

        let cleaned = load_and_clean_timeseries()
            .input_path(file.path())
            .zones_to_exclude(&["B".to_string()])
            .rename_value_to("value")
            .call()?;

        assert_eq!(cleaned.value_column, "value");
        assert_eq!(cleaned.leap_days.total, 1);
        assert_eq!(
            cleaned.normalization,
            Some(NormalizeOutcome::Rescaled { max: 100.0 })
        );
        assert!(cleaned.completeness.is_none());

        let df = &cleaned.frame;
        assert_eq!(df.height(), 2);
        let hours: Vec<i64> = df.column("hour")?.i64()?.into_no_null_iter().collect();
        assert_eq!(hours, vec![0, 23]);
        let values: Vec<f64> = df.column("value")?.f64()?.into_no_null_iter().collect();
        assert_eq!(values, vec![1.0, 0.5]);
        assert!(df.column("month").is_ok());
        Ok(())
    }

    #[test]
    fn missing_file_is_reported() {
        let result = load_and_clean_timeseries()
            .input_path(Path::new("/definitely/not/here.csv"))
            .call();
        assert!(matches!(result, Err(TimeSeriesError::InputNotFound(_))));
    }

    #[test]
    fn zone_is_required_by_default() {
        let file = write_csv("month,day,hour,value\n1,1,0,0.5\n");
        assert!(load_and_clean_timeseries()
            .input_path(file.path())
            .call()
            .is_err());
        assert!(load_and_clean_timeseries()
            .input_path(file.path())
            .require_zone(false)
            .call()
            .is_ok());
    }

    #[test]
    fn completeness_is_reported_not_raised() -> Result<(), Box<dyn std::error::Error>> {
        let file = write_csv("zone,month,day,hour,value\nA,1,1,0,0.5\n");
        let cleaned = load_and_clean_timeseries()
            .input_path(file.path())
            .check_complete_year(true)
            .call()?;
        let report = cleaned.completeness.expect("completeness requested");
        assert_eq!(report.missing.get("A").map(Vec::len), Some(8759));
        Ok(())
    }
}
