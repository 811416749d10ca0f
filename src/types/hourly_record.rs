//! Row-level view of the long-format hourly table.

use crate::timeseries::columns::{float_values, integer_values, string_values};
use crate::timeseries::error::TimeSeriesError;
use polars::prelude::{Column, DataFrame, PolarsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One hourly observation of a zone in the long-format table.
///
/// # Examples
///
/// ```
/// use repdays::{frame_to_records, records_to_frame, HourlyRecord};
///
/// let records = vec![HourlyRecord::new("Testland", 1, 1, 0, 0.42)];
/// let frame = records_to_frame(&records).unwrap();
/// assert_eq!(frame.height(), 1);
/// assert_eq!(frame_to_records(&frame).unwrap(), records);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    pub zone: String,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub value: f64,
}

impl HourlyRecord {
    pub fn new(zone: impl Into<String>, month: u32, day: u32, hour: u32, value: f64) -> Self {
        Self {
            zone: zone.into(),
            month,
            day,
            hour,
            value,
        }
    }

    pub fn day_key(&self) -> DayKey {
        DayKey::new(self.month, self.day)
    }
}

/// A calendar day, identified by `(month, day)` in the non-leap year.
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayKey {
    pub month: u32,
    pub day: u32,
}

impl DayKey {
    pub fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// Builds a `zone, month, day, hour, value` DataFrame from records.
pub fn records_to_frame(records: &[HourlyRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            "zone".into(),
            records.iter().map(|r| r.zone.as_str()).collect::<Vec<_>>(),
        ),
        Column::new(
            "month".into(),
            records.iter().map(|r| r.month as i64).collect::<Vec<_>>(),
        ),
        Column::new(
            "day".into(),
            records.iter().map(|r| r.day as i64).collect::<Vec<_>>(),
        ),
        Column::new(
            "hour".into(),
            records.iter().map(|r| r.hour as i64).collect::<Vec<_>>(),
        ),
        Column::new(
            "value".into(),
            records.iter().map(|r| r.value).collect::<Vec<_>>(),
        ),
    ])
}

/// Reads `zone, month, day, hour, value` rows back into records.
///
/// Time columns must be integral and non-negative; missing values become `NaN`.
pub fn frame_to_records(df: &DataFrame) -> Result<Vec<HourlyRecord>, TimeSeriesError> {
    let zones = string_values(df, "zone", "")?;
    let months = integer_values(df, "month", "")?;
    let days = integer_values(df, "day", "")?;
    let hours = integer_values(df, "hour", "")?;
    let values = float_values(df, "value", "")?;

    Ok(zones
        .into_iter()
        .zip(months)
        .zip(days)
        .zip(hours)
        .zip(values)
        .map(|((((zone, month), day), hour), value)| HourlyRecord {
            zone,
            month: month.max(0) as u32,
            day: day.max(0) as u32,
            hour: hour.max(0) as u32,
            value: value.unwrap_or(f64::NAN),
        })
        .collect())
}
