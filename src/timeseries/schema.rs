//! Column layout of an hourly profile table, resolved once per table.

use crate::timeseries::columns::{column_names, has_column};
use crate::timeseries::error::{label_prefix, SchemaError};
use polars::prelude::DataFrame;

pub const ZONE: &str = "zone";
pub const MONTH: &str = "month";
pub const DAY: &str = "day";
pub const HOUR: &str = "hour";
pub const SEASON: &str = "season";
pub const VALUE: &str = "value";

const TECHNOLOGY_COLUMNS: [&str; 2] = ["tech", "technology"];

/// Resolved column names of a long-format hourly table.
///
/// Source datasets disagree on naming (a `season` column standing in for
/// `month`, yearly value columns such as `"2019"`, `"2020"`, an optional
/// technology column). Resolving them once up front keeps the rest of the
/// pipeline free of column-presence checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSchema {
    /// Column holding the month number; `"season"` when the table uses that alias.
    pub month: String,
    pub has_zone: bool,
    pub value: String,
    pub technology: Option<String>,
}

impl ProfileSchema {
    /// Resolves the layout of `df`.
    ///
    /// The value column is `preferred_value` if present, otherwise the only
    /// non-key column, otherwise the year-like column with the latest year,
    /// otherwise the first non-key column.
    ///
    /// # Errors
    ///
    /// [`SchemaError::MissingColumn`] if `day`, `hour` or both `month` and `season` are
    /// absent, [`SchemaError::NoValueColumn`] if nothing is left to use as the value.
    pub fn resolve(
        df: &DataFrame,
        preferred_value: &str,
        label: &str,
    ) -> Result<Self, SchemaError> {
        let month = if has_column(df, MONTH) {
            MONTH
        } else if has_column(df, SEASON) {
            SEASON
        } else {
            return Err(SchemaError::MissingColumn {
                label: label_prefix(label),
                column: MONTH.to_string(),
            });
        };
        for required in [DAY, HOUR] {
            if !has_column(df, required) {
                return Err(SchemaError::MissingColumn {
                    label: label_prefix(label),
                    column: required.to_string(),
                });
            }
        }

        let technology = TECHNOLOGY_COLUMNS
            .iter()
            .find(|name| has_column(df, name))
            .map(|name| name.to_string());

        let candidates: Vec<String> = column_names(df)
            .into_iter()
            .filter(|name| {
                ![ZONE, MONTH, SEASON, DAY, HOUR].contains(&name.as_str())
                    && Some(name) != technology.as_ref()
            })
            .collect();

        let value = pick_value_column(&candidates, preferred_value).ok_or_else(|| {
            SchemaError::NoValueColumn {
                label: label_prefix(label),
            }
        })?;

        Ok(Self {
            month: month.to_string(),
            has_zone: has_column(df, ZONE),
            value,
            technology,
        })
    }

    pub fn require_zone(&self, label: &str) -> Result<(), SchemaError> {
        if self.has_zone {
            Ok(())
        } else {
            Err(SchemaError::MissingColumn {
                label: label_prefix(label),
                column: ZONE.to_string(),
            })
        }
    }
}

fn pick_value_column(candidates: &[String], preferred: &str) -> Option<String> {
    if candidates.iter().any(|c| c == preferred) {
        return Some(preferred.to_string());
    }
    if candidates.len() == 1 {
        return candidates.first().cloned();
    }
    let latest_year = candidates
        .iter()
        .filter_map(|c| c.trim().parse::<i32>().ok().map(|year| (year, c)))
        .max_by_key(|(year, _)| *year)
        .map(|(_, c)| c.clone());
    latest_year.or_else(|| candidates.first().cloned())
}
