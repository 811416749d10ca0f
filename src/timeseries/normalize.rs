use crate::timeseries::columns::float_values;
use crate::timeseries::error::{label_prefix, TimeSeriesError};
use log::{info, warn};
use polars::prelude::{Column, DataFrame};
use std::fmt;

/// Why [`normalize_value`] left a column untouched even though it could not
/// confirm the values were already in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Every value is missing.
    AllMissing,
    /// The maximum is zero or negative, so dividing by it cannot land in `[0, 1]`.
    NonPositiveMax,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AllMissing => write!(f, "all values are missing"),
            SkipReason::NonPositiveMax => write!(f, "max is not positive"),
        }
    }
}

/// What [`normalize_value`] did to the column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeOutcome {
    /// Values were divided by `max`.
    Rescaled { max: f64 },
    /// Values already lay within `[0, 1]`; the table is returned as is.
    AlreadyNormalized,
    /// The column could not be rescaled and was left as is.
    Skipped(SkipReason),
}

/// Rescales `column` to `[0, 1]` by dividing by its maximum, unless the
/// observed range is already inside `[0, 1]`.
///
/// This is a conditional, one-shot rescale rather than min-max scaling: a
/// column with values in `[0.2, 0.9]` is left alone, a column with values in
/// `[10, 50]` becomes `[0.2, 1.0]`. Missing values and NaN are ignored when
/// computing the range and stay missing. Running it twice is a no-op.
///
/// When the maximum is zero or negative, or every value is missing, the table is returned
/// unchanged with [`NormalizeOutcome::Skipped`] and a warning is logged.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use repdays::{normalize_value, NormalizeOutcome};
///
/// let df = df!("value" => [10.0, 25.0, 50.0]).unwrap();
/// let (out, outcome) = normalize_value(&df, "value", "").unwrap();
/// assert_eq!(outcome, NormalizeOutcome::Rescaled { max: 50.0 });
///
/// let (again, outcome) = normalize_value(&out, "value", "").unwrap();
/// assert_eq!(outcome, NormalizeOutcome::AlreadyNormalized);
/// assert!(again.equals(&out));
/// ```
pub fn normalize_value(
    df: &DataFrame,
    column: &str,
    label: &str,
) -> Result<(DataFrame, NormalizeOutcome), TimeSeriesError> {
    let values = float_values(df, column, label)?;
    let present = values.iter().flatten().copied();
    let (min, max) = present.fold((None::<f64>, None::<f64>), |(lo, hi), v| {
        (
            Some(lo.map_or(v, |lo| lo.min(v))),
            Some(hi.map_or(v, |hi| hi.max(v))),
        )
    });

    let (Some(min), Some(max)) = (min, max) else {
        warn!(
            "{}Cannot normalize '{}' because all values are missing",
            label_prefix(label),
            column
        );
        return Ok((df.clone(), NormalizeOutcome::Skipped(SkipReason::AllMissing)));
    };
    if max <= 0.0 {
        warn!(
            "{}Cannot normalize '{}' because max is {}",
            label_prefix(label),
            column,
            max
        );
        return Ok((df.clone(), NormalizeOutcome::Skipped(SkipReason::NonPositiveMax)));
    }
    if min >= 0.0 && max <= 1.0 {
        return Ok((df.clone(), NormalizeOutcome::AlreadyNormalized));
    }

    info!(
        "{}Normalizing '{}' to [0,1] (max={:.4})",
        label_prefix(label),
        column,
        max
    );
    let scaled: Vec<Option<f64>> = values.iter().map(|v| v.map(|x| x / max)).collect();
    let mut out = df.clone();
    out.with_column(Column::new(column.into(), scaled))?;
    Ok((out, NormalizeOutcome::Rescaled { max }))
}
