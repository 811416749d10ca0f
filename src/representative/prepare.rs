//! Cleans an input profile table and indexes its hourly values by zone and day.

use crate::representative::error::{SelectionError, ShapeError};
use crate::timeseries::columns::{float_values, integer_values, string_values};
use crate::timeseries::error::TimeSeriesError;
use crate::timeseries::leap_day::drop_leap_day;
use crate::timeseries::normalize::normalize_value;
use crate::timeseries::schema::{ProfileSchema, DAY, HOUR, MONTH, SEASON, VALUE, ZONE};
use crate::timeseries::validate::{validate_time_columns, TIME_COLUMNS};
use crate::types::hourly_record::DayKey;
use log::{info, warn};
use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// A validated, normalized profile table keyed for feature construction.
#[derive(Debug, Clone)]
pub(crate) struct ProfileTable {
    pub label: String,
    /// Zones in order of first appearance.
    pub zones: Vec<String>,
    /// Every calendar day with at least one stored value in some zone.
    pub days: BTreeSet<DayKey>,
    /// Hour-sorted `(hour, value)` pairs per `(zone index, day)`. Missing values
    /// and duplicate hours are already removed.
    hours: BTreeMap<(usize, DayKey), Vec<(u32, f64)>>,
}

impl ProfileTable {
    /// Validates time columns, drops Feb 29 and rescales the value column to `[0, 1]`.
    ///
    /// With `technology` set and a technology column present, only rows of that
    /// technology (case-insensitive) are kept, before normalization.
    pub fn prepare(
        df: &DataFrame,
        label: &str,
        technology: Option<&str>,
    ) -> Result<Self, SelectionError> {
        if df.height() == 0 {
            return Err(ShapeError::Empty {
                label: label.to_string(),
            }
            .into());
        }

        let schema = ProfileSchema::resolve(df, VALUE, label).map_err(TimeSeriesError::from)?;
        schema.require_zone(label).map_err(TimeSeriesError::from)?;
        let mut df = df.clone();
        if schema.month == SEASON {
            df.rename(SEASON, MONTH.into())?;
        }
        let df = validate_time_columns(&df, &TIME_COLUMNS, label)?;

        let df = match (technology, schema.technology.as_deref()) {
            (Some(wanted), Some(column)) => {
                let filtered = df
                    .clone()
                    .lazy()
                    .filter(
                        col(column)
                            .cast(DataType::String)
                            .str()
                            .to_lowercase()
                            .eq(lit(wanted.to_lowercase())),
                    )
                    .collect()?;
                if filtered.height() == 0 {
                    return Err(ShapeError::NoTechnologyRows {
                        technology: wanted.to_string(),
                    }
                    .into());
                }
                info!(
                    "[{}] Kept {} of {} rows for technology '{}'",
                    label,
                    filtered.height(),
                    df.height(),
                    wanted
                );
                filtered
            }
            _ => df,
        };

        let (df, _) = drop_leap_day(&df, label)?;
        let (df, _) = normalize_value(&df, &schema.value, label)?;
        Self::index(&df, &schema.value, label)
    }

    fn index(df: &DataFrame, value_column: &str, label: &str) -> Result<Self, SelectionError> {
        let zone_col = string_values(df, ZONE, label)?;
        let months = integer_values(df, MONTH, label)?;
        let day_col = integer_values(df, DAY, label)?;
        let hour_col = integer_values(df, HOUR, label)?;
        let values = float_values(df, value_column, label)?;

        let mut zones: Vec<String> = Vec::new();
        let mut zone_index: HashMap<String, usize> = HashMap::new();
        let mut days = BTreeSet::new();
        let mut hours: BTreeMap<(usize, DayKey), Vec<(u32, f64)>> = BTreeMap::new();
        let mut seen = HashSet::new();
        let mut missing = 0usize;
        let mut duplicates = 0usize;

        for (i, zone) in zone_col.into_iter().enumerate() {
            let zone_idx = *zone_index.entry(zone).or_insert_with_key(|name| {
                zones.push(name.clone());
                zones.len() - 1
            });
            // Time columns are range-checked, so the casts cannot wrap.
            let day = DayKey::new(months[i] as u32, day_col[i] as u32);
            let hour = hour_col[i] as u32;

            let Some(value) = values[i] else {
                missing += 1;
                continue;
            };
            days.insert(day);
            if !seen.insert((zone_idx, day, hour)) {
                duplicates += 1;
                continue;
            }
            hours.entry((zone_idx, day)).or_default().push((hour, value));
        }

        if missing > 0 {
            warn!("[{}] Dropped {} rows with missing values", label, missing);
        }
        if duplicates > 0 {
            warn!(
                "[{}] Dropped {} duplicate (zone, month, day, hour) rows, keeping the first",
                label, duplicates
            );
        }
        for values in hours.values_mut() {
            values.sort_by_key(|(hour, _)| *hour);
        }

        Ok(Self {
            label: label.to_string(),
            zones,
            days,
            hours,
        })
    }

    pub fn day_values(&self, zone: usize, day: DayKey) -> Option<&[(u32, f64)]> {
        self.hours.get(&(zone, day)).map(Vec::as_slice)
    }

    /// Whether every zone has at least one stored value on `day`.
    pub fn is_complete(&self, day: DayKey) -> bool {
        (0..self.zones.len()).all(|zone| self.hours.contains_key(&(zone, day)))
    }

    /// Number of days in `index` for which `zone` has at least one value.
    pub fn covered_days(&self, zone: usize, index: &[DayKey]) -> usize {
        index
            .iter()
            .filter(|day| self.hours.contains_key(&(zone, **day)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn indexes_zones_in_first_appearance_order() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["B", "B", "A", "B"],
            "month" => [1i64, 1, 1, 1],
            "day" => [1i64, 1, 1, 2],
            "hour" => [1i64, 0, 0, 0],
            "value" => [0.2, 0.1, 0.5, 0.3],
        )?;
        let table = ProfileTable::prepare(&df, "load", None)?;
        assert_eq!(table.zones, vec!["B", "A"]);
        assert_eq!(table.days.len(), 2);
        assert_eq!(
            table.day_values(0, DayKey::new(1, 1)),
            Some(&[(0, 0.1), (1, 0.2)][..])
        );
        Ok(())
    }

    #[test]
    fn drops_missing_values_and_duplicates() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["A", "A", "A", "A"],
            "month" => [1i64, 1, 1, 1],
            "day" => [1i64, 1, 1, 2],
            "hour" => [0i64, 0, 1, 0],
            "value" => [Some(0.4), Some(0.9), Some(f64::NAN), None],
        )?;
        let table = ProfileTable::prepare(&df, "load", None)?;
        assert_eq!(table.day_values(0, DayKey::new(1, 1)), Some(&[(0, 0.4)][..]));
        assert_eq!(table.day_values(0, DayKey::new(1, 2)), None);
        // a day without any stored value is not part of the index
        assert!(!table.days.contains(&DayKey::new(1, 2)));
        Ok(())
    }

    #[test]
    fn complete_days_have_values_in_every_zone() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["A", "B", "A", "B"],
            "month" => [1i64, 1, 1, 1],
            "day" => [1i64, 1, 2, 2],
            "hour" => [0i64, 0, 0, 0],
            "value" => [Some(0.4), Some(0.6), Some(0.5), None],
        )?;
        let table = ProfileTable::prepare(&df, "load", None)?;
        assert!(table.is_complete(DayKey::new(1, 1)));
        assert!(table.days.contains(&DayKey::new(1, 2)));
        assert!(!table.is_complete(DayKey::new(1, 2)));
        Ok(())
    }

    #[test]
    fn rescales_and_drops_leap_day() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["A", "A"],
            "season" => [2i64, 2],
            "day" => [28i64, 29],
            "hour" => [0i64, 0],
            "2020" => [50.0, 100.0],
        )?;
        let table = ProfileTable::prepare(&df, "load", None)?;
        assert_eq!(table.days.len(), 1);
        assert_eq!(table.day_values(0, DayKey::new(2, 28)), Some(&[(0, 1.0)][..]));
        Ok(())
    }

    #[test]
    fn technology_filter() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["A", "A"],
            "tech" => ["Solar", "Wind"],
            "month" => [1i64, 1],
            "day" => [1i64, 1],
            "hour" => [0i64, 0],
            "value" => [0.3, 0.8],
        )?;
        let table = ProfileTable::prepare(&df, "re", Some("solar"))?;
        assert_eq!(table.day_values(0, DayKey::new(1, 1)), Some(&[(0, 0.3)][..]));

        assert!(matches!(
            ProfileTable::prepare(&df, "re", Some("hydro")),
            Err(SelectionError::Shape(ShapeError::NoTechnologyRows { .. }))
        ));
        Ok(())
    }

    #[test]
    fn empty_table_is_a_shape_error() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => Vec::<&str>::new(),
            "month" => Vec::<i64>::new(),
            "day" => Vec::<i64>::new(),
            "hour" => Vec::<i64>::new(),
            "value" => Vec::<f64>::new(),
        )?;
        assert!(matches!(
            ProfileTable::prepare(&df, "load", None),
            Err(SelectionError::Shape(ShapeError::Empty { .. }))
        ));
        Ok(())
    }
}
