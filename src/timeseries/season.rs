use crate::timeseries::columns::{column_names, has_column, integer_values};
use crate::timeseries::error::{label_prefix, SchemaError, TimeSeriesError};
use crate::timeseries::leap_day::leap_day_expr;
use crate::timeseries::schema::{DAY, HOUR, MONTH, SEASON};
use crate::timeseries::validate::{validate_time_columns, TIME_COLUMNS};
use crate::types::season::SeasonMap;
use polars::prelude::*;
use std::collections::BTreeSet;

/// Folds months into seasons and renumbers days within each season.
///
/// Every month is mapped through `seasons`; the `month` column is replaced by a
/// `season` column and the `day` column is renumbered `1..=N` within each
/// `(group_columns…, season)` partition. Feb 29 rows are dropped first.
///
/// Day numbers come from the calendar dates themselves: the distinct
/// `(month, day)` pairs of a partition are dense-ranked by calendar position,
/// so the result does not depend on input row order.
/// A table with only a `season` column (holding month numbers) is accepted in
/// place of `month`.
///
/// Output columns are `group_columns…, season, day, hour` followed by the
/// remaining columns, sorted by group, season code, day and hour.
///
/// # Errors
///
/// [`SchemaError::MissingColumn`] for a missing `month`/`day`/`hour` or group
/// column, [`SchemaError::UnmappedMonths`] if a month has no season, and the
/// [`validate_time_columns`] errors for malformed time columns.
///
/// # Examples
///
/// ```
/// use polars::prelude::*;
/// use repdays::{month_to_season, SeasonMap};
///
/// let df = df!(
///     "zone" => ["A", "A", "A"],
///     "month" => [12i64, 1, 2],
///     "day" => [31i64, 1, 1],
///     "hour" => [0i64, 0, 0],
///     "value" => [0.3, 0.1, 0.2],
/// ).unwrap();
/// let seasonal = month_to_season(&df, &SeasonMap::default(), &["zone"], "load").unwrap();
/// let days: Vec<i64> = seasonal.column("day").unwrap().i64().unwrap().into_no_null_iter().collect();
/// assert_eq!(days, vec![1, 2, 3]);
/// ```
pub fn month_to_season(
    df: &DataFrame,
    seasons: &SeasonMap,
    group_columns: &[&str],
    label: &str,
) -> Result<DataFrame, TimeSeriesError> {
    let mut df = df.clone();
    if !has_column(&df, MONTH) && has_column(&df, SEASON) {
        df.rename(SEASON, MONTH.into())?;
    } else if has_column(&df, SEASON) {
        df.drop_in_place(SEASON)?;
    }
    for required in group_columns {
        if !has_column(&df, required) {
            return Err(SchemaError::MissingColumn {
                label: label_prefix(label),
                column: required.to_string(),
            }
            .into());
        }
    }
    let df = validate_time_columns(&df, &TIME_COLUMNS, label)?;

    // Months are range-checked, so the casts cannot wrap.
    let unmapped: BTreeSet<i64> = integer_values(&df, MONTH, label)?
        .into_iter()
        .filter(|m| seasons.season_of(*m as u32).is_none())
        .collect();
    if !unmapped.is_empty() {
        return Err(SchemaError::UnmappedMonths {
            label: label_prefix(label),
            months: unmapped.into_iter().collect(),
        }
        .into());
    }

    let (lookup_months, lookup_seasons): (Vec<i64>, Vec<&str>) =
        seasons.iter().map(|(m, s)| (m as i64, s)).unzip();
    let lookup = df!(MONTH => lookup_months, SEASON => lookup_seasons)?;

    let partition: Vec<Expr> = group_columns
        .iter()
        .map(|c| col(*c))
        .chain([col(SEASON)])
        .collect();
    let mut sort_keys = partition.clone();
    sort_keys.extend([col(DAY), col(HOUR)]);

    let mut order: Vec<String> = group_columns.iter().map(|c| c.to_string()).collect();
    order.extend([SEASON, DAY, HOUR].map(String::from));
    let rest: Vec<String> = column_names(&df)
        .into_iter()
        .filter(|c| c != MONTH && !order.contains(c))
        .collect();
    order.extend(rest);
    let output: Vec<Expr> = order.iter().map(|c| col(c.as_str())).collect();

    let calendar_position = col(MONTH) * lit(32i64) + col(DAY);
    let out = df
        .lazy()
        .filter(leap_day_expr().not())
        .join(
            lookup.lazy(),
            [col(MONTH)],
            [col(MONTH)],
            JoinArgs::new(JoinType::Left),
        )
        .with_column(
            calendar_position
                .rank(
                    RankOptions {
                        method: RankMethod::Dense,
                        descending: false,
                    },
                    None,
                )
                .over(partition)
                .cast(DataType::Int64)
                .alias(DAY),
        )
        .sort_by_exprs(
            sort_keys,
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .select(output)
        .collect()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::calendar::calendar_days;
    use std::collections::BTreeMap;

    fn winter_fixture(months: &[i64]) -> DataFrame {
        let mut month_col = Vec::new();
        let mut day_col = Vec::new();
        let mut hour_col = Vec::new();
        let mut value_col = Vec::new();
        for &month in months {
            let days = if month == 2 { 29 } else { 31 };
            for day in 1..=days {
                for hour in 0..24i64 {
                    month_col.push(month);
                    day_col.push(day);
                    hour_col.push(hour);
                    value_col.push(month as f64 * 100.0 + day as f64 + hour as f64 / 100.0);
                }
            }
        }
        let zone = vec!["Testland"; month_col.len()];
        df!(
            "zone" => zone,
            "month" => month_col,
            "day" => day_col,
            "hour" => hour_col,
            "value" => value_col,
        )
        .unwrap()
    }

    #[test]
    fn djf_days_are_sequential_without_gaps() -> Result<(), Box<dyn std::error::Error>> {
        let df = winter_fixture(&[12, 1, 2]);
        let out = month_to_season(&df, &SeasonMap::default(), &["zone"], "load")?;

        // Dec 31 + Jan 31 + Feb 28 (Feb 29 dropped)
        assert_eq!(out.height(), 90 * 24);
        let seasons: BTreeSet<String> = out
            .column("season")?
            .str()?
            .into_no_null_iter()
            .map(String::from)
            .collect();
        assert_eq!(seasons, BTreeSet::from(["DJF".to_string()]));

        let days: BTreeSet<i64> = out.column("day")?.i64()?.into_no_null_iter().collect();
        assert_eq!(days, (1..=90).collect::<BTreeSet<_>>());

        let names = column_names(&out);
        assert_eq!(names, vec!["zone", "season", "day", "hour", "value"]);
        Ok(())
    }

    #[test]
    fn numbering_ignores_row_order() -> Result<(), Box<dyn std::error::Error>> {
        let df = winter_fixture(&[12, 1, 2]);
        let n = df.height() as IdxSize;
        let reversed = df.take(&IdxCa::from_vec("idx".into(), (0..n).rev().collect()))?;

        let forward = month_to_season(&df, &SeasonMap::default(), &["zone"], "load")?;
        let backward = month_to_season(&reversed, &SeasonMap::default(), &["zone"], "load")?;
        assert!(forward.equals_missing(&backward));
        Ok(())
    }

    #[test]
    fn january_starts_the_season_in_calendar_order() -> Result<(), Box<dyn std::error::Error>> {
        let df = winter_fixture(&[12, 1, 2]);
        let out = month_to_season(&df, &SeasonMap::default(), &["zone"], "load")?;
        let first = out.column("value")?.f64()?.get(0);
        // Jan 1, hour 0
        assert_eq!(first, Some(101.0));
        Ok(())
    }

    #[test]
    fn full_year_splits_into_four_seasons() -> Result<(), Box<dyn std::error::Error>> {
        let (months, days): (Vec<i64>, Vec<i64>) = calendar_days()
            .flat_map(|(m, d)| std::iter::repeat((m as i64, d as i64)).take(24))
            .unzip();
        let hours: Vec<i64> = (0..months.len() as i64).map(|i| i % 24).collect();
        let values = vec![0.5; months.len()];
        let df = df!("month" => months, "day" => days, "hour" => hours, "value" => values)?;

        let out = month_to_season(&df, &SeasonMap::default(), &[], "")?;
        let mut max_day: BTreeMap<String, i64> = BTreeMap::new();
        let seasons = out.column("season")?.str()?;
        let days = out.column("day")?.i64()?;
        for (season, day) in seasons.into_no_null_iter().zip(days.into_no_null_iter()) {
            let entry = max_day.entry(season.to_string()).or_default();
            *entry = (*entry).max(day);
        }
        assert_eq!(max_day.get("DJF"), Some(&90));
        assert_eq!(max_day.get("MAM"), Some(&92));
        assert_eq!(max_day.get("JJA"), Some(&92));
        assert_eq!(max_day.get("SON"), Some(&91));
        Ok(())
    }

    #[test]
    fn season_column_is_accepted_as_month() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!("season" => [6i64, 7], "day" => [30i64, 1], "hour" => [0i64, 0])?;
        let out = month_to_season(&df, &SeasonMap::default(), &[], "")?;
        let days: Vec<i64> = out.column("day")?.i64()?.into_no_null_iter().collect();
        assert_eq!(days, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn unmapped_month_is_a_schema_error() -> Result<(), Box<dyn std::error::Error>> {
        let df = winter_fixture(&[1, 3]);
        let partial = SeasonMap::from_pairs([(1, "wet"), (2, "wet")]);
        match month_to_season(&df, &partial, &["zone"], "load") {
            Err(TimeSeriesError::Schema(SchemaError::UnmappedMonths { label, months })) => {
                assert_eq!(months, vec![3]);
                assert_eq!(label, "[load] ");
            }
            other => panic!("expected UnmappedMonths, got {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn missing_group_column_is_a_schema_error() {
        let df = winter_fixture(&[1]);
        assert!(matches!(
            month_to_season(&df, &SeasonMap::default(), &["region"], ""),
            Err(TimeSeriesError::Schema(SchemaError::MissingColumn { .. }))
        ));
    }
}
