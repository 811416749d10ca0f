use crate::timeseries::columns::{has_column, string_values};
use crate::timeseries::error::{label_prefix, TimeSeriesError};
use crate::timeseries::schema::{DAY, MONTH, ZONE};
use log::info;
use polars::prelude::*;
use std::collections::BTreeMap;

const DROPPED: &str = "dropped";

/// Rows removed by [`drop_leap_day`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeapDayReport {
    /// Dropped rows per zone. Tables without a zone column report under `""`.
    pub dropped_per_zone: BTreeMap<String, usize>,
    pub total: usize,
}

impl LeapDayReport {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Matches Feb 29 rows.
pub(crate) fn leap_day_expr() -> Expr {
    col(MONTH)
        .cast(DataType::Int64)
        .eq(lit(2i64))
        .and(col(DAY).cast(DataType::Int64).eq(lit(29i64)))
}

/// Removes every Feb 29 row, keeping the canonical 365-day calendar.
///
/// Idempotent, and a no-op when the table has no Feb 29 rows or lacks a
/// `month`/`day` column. The returned report carries the per-zone counts.
pub fn drop_leap_day(
    df: &DataFrame,
    label: &str,
) -> Result<(DataFrame, LeapDayReport), TimeSeriesError> {
    if !has_column(df, MONTH) || !has_column(df, DAY) {
        return Ok((df.clone(), LeapDayReport::default()));
    }

    let leap = df.clone().lazy().filter(leap_day_expr());
    let counts = if has_column(df, ZONE) {
        leap.group_by([col(ZONE).cast(DataType::String)])
            .agg([len().cast(DataType::Int64).alias(DROPPED)])
            .collect()?
    } else {
        leap.select([
            lit("").alias(ZONE),
            len().cast(DataType::Int64).alias(DROPPED),
        ])
        .collect()?
    };

    let zones = string_values(&counts, ZONE, label)?;
    let dropped: Vec<i64> = counts.column(DROPPED)?.i64()?.into_no_null_iter().collect();
    let dropped_per_zone: BTreeMap<String, usize> = zones
        .into_iter()
        .zip(dropped)
        .filter(|(_, n)| *n > 0)
        .map(|(zone, n)| (zone, n as usize))
        .collect();
    let total: usize = dropped_per_zone.values().sum();
    if total == 0 {
        return Ok((df.clone(), LeapDayReport::default()));
    }

    let zone_names: Vec<&str> = dropped_per_zone.keys().map(String::as_str).collect();
    info!(
        "{}Dropping {} Feb 29 entries for zones {}",
        label_prefix(label),
        total,
        zone_names.join(", ")
    );

    let filtered = df.clone().lazy().filter(leap_day_expr().not()).collect()?;
    Ok((
        filtered,
        LeapDayReport {
            dropped_per_zone,
            total,
        },
    ))
}
