use crate::representative::prepare::ProfileTable;
use crate::representative::RepresentativeDay;
use polars::prelude::*;

/// Profile table of the representative days: `rep_day, zone, hour, value, weight`.
///
/// Values are the stored hourly rows of each source day, never padded or
/// filled ones. Rows are ordered by rep_day, zone (first appearance) and hour.
pub(crate) fn profile_frame(
    table: &ProfileTable,
    days: &[RepresentativeDay],
) -> PolarsResult<DataFrame> {
    let mut rep_day = Vec::new();
    let mut zone = Vec::new();
    let mut hour = Vec::new();
    let mut value = Vec::new();
    let mut weight = Vec::new();

    for day in days {
        for (zone_idx, name) in table.zones.iter().enumerate() {
            for (h, v) in table.day_values(zone_idx, day.source).unwrap_or_default() {
                rep_day.push(day.rep_day as i64);
                zone.push(name.as_str());
                hour.push(*h as i64);
                value.push(*v);
                weight.push(day.weight);
            }
        }
    }

    DataFrame::new(vec![
        Column::new("rep_day".into(), rep_day),
        Column::new("zone".into(), zone),
        Column::new("hour".into(), hour),
        Column::new("value".into(), value),
        Column::new("weight".into(), weight),
    ])
}

/// Weights table: `rep_day, original_month, original_day, weight`.
pub(crate) fn weights_frame(days: &[RepresentativeDay]) -> PolarsResult<DataFrame> {
    df!(
        "rep_day" => days.iter().map(|d| d.rep_day as i64).collect::<Vec<_>>(),
        "original_month" => days.iter().map(|d| d.source.month as i64).collect::<Vec<_>>(),
        "original_day" => days.iter().map(|d| d.source.day as i64).collect::<Vec<_>>(),
        "weight" => days.iter().map(|d| d.weight).collect::<Vec<_>>(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::columns::column_names;
    use crate::types::hourly_record::DayKey;

    #[test]
    fn emits_stored_rows_only() -> Result<(), Box<dyn std::error::Error>> {
        let df = df!(
            "zone" => ["A", "A", "B"],
            "month" => [3i64, 3, 3],
            "day" => [7i64, 7, 7],
            "hour" => [1i64, 0, 0],
            "value" => [0.2, 0.1, 0.9],
        )?;
        let table = ProfileTable::prepare(&df, "load", None)?;
        let days = [RepresentativeDay {
            rep_day: 1,
            source: DayKey::new(3, 7),
            weight: 365.0,
            cluster_size: 1,
        }];

        let profiles = profile_frame(&table, &days)?;
        assert_eq!(profiles.height(), 3);
        let hours: Vec<i64> = profiles.column("hour")?.i64()?.into_no_null_iter().collect();
        assert_eq!(hours, vec![0, 1, 0]);
        let values: Vec<f64> = profiles.column("value")?.f64()?.into_no_null_iter().collect();
        assert_eq!(values, vec![0.1, 0.2, 0.9]);

        let weights = weights_frame(&days)?;
        assert_eq!(
            column_names(&weights),
            vec!["rep_day", "original_month", "original_day", "weight"]
        );
        assert_eq!(weights.column("original_day")?.i64()?.get(0), Some(7));
        Ok(())
    }
}
