use crate::representative::error::ShapeError;
use crate::representative::prepare::ProfileTable;
use crate::types::calendar::{DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::types::hourly_record::DayKey;
use log::info;

/// Days a zone must cover in a full 365-day index.
const MIN_COVERED_DAYS: usize = 300;

/// One feature row per calendar day: the 24-hour curve of every load zone,
/// followed by every renewable zone.
#[derive(Debug, Clone)]
pub(crate) struct FeatureMatrix {
    pub days: Vec<DayKey>,
    pub rows: Vec<Vec<f64>>,
    /// Whether every zone of every table stored values for the day, so its row
    /// holds no mean-filled curve.
    pub complete: Vec<bool>,
}

impl FeatureMatrix {
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }
}

/// Minimum number of covered days for an index of `index_len` days, scaled
/// from 300 of 365.
pub(crate) fn required_days(index_len: usize) -> usize {
    (index_len * MIN_COVERED_DAYS).div_ceil(DAYS_PER_YEAR)
}

/// Fails with [`ShapeError::TruncatedZone`] for the first zone of `table`
/// covering too few days of `index`.
pub(crate) fn check_coverage(table: &ProfileTable, index: &[DayKey]) -> Result<(), ShapeError> {
    let required = required_days(index.len());
    for (zone_idx, zone) in table.zones.iter().enumerate() {
        let days = table.covered_days(zone_idx, index);
        if days < required {
            return Err(ShapeError::TruncatedZone {
                label: table.label.clone(),
                zone: zone.clone(),
                days,
                required,
            });
        }
    }
    Ok(())
}

/// Hour-sorted values of one day as exactly 24 numbers: extra hours are cut,
/// short days are padded by repeating the last value. `None` for an empty day.
pub(crate) fn day_curve(values: &[(u32, f64)]) -> Option<Vec<f64>> {
    let mut curve: Vec<f64> = values
        .iter()
        .map(|(_, v)| *v)
        .take(HOURS_PER_DAY)
        .collect();
    let last = *curve.last()?;
    curve.resize(HOURS_PER_DAY, last);
    Some(curve)
}

/// Average curve of a zone over the days of `index` it covers.
fn mean_curve(table: &ProfileTable, zone: usize, index: &[DayKey]) -> Vec<f64> {
    let mut sum = vec![0.0; HOURS_PER_DAY];
    let mut count = 0usize;
    for day in index {
        if let Some(curve) = table.day_values(zone, *day).and_then(day_curve) {
            sum.iter_mut().zip(&curve).for_each(|(s, v)| *s += v);
            count += 1;
        }
    }
    if count > 0 {
        sum.iter_mut().for_each(|s| *s /= count as f64);
    }
    sum
}

/// Builds the feature matrix over the calendar days of the load table.
///
/// A zone-day without any values is represented by the zone's mean curve so
/// the day keeps its place in the clustering; such days are flagged as not
/// complete and never emitted as representatives.
pub(crate) fn build_feature_matrix(
    load: &ProfileTable,
    re: Option<&ProfileTable>,
) -> FeatureMatrix {
    let days: Vec<DayKey> = load.days.iter().copied().collect();
    let tables: Vec<&ProfileTable> = std::iter::once(load).chain(re).collect();

    let means: Vec<Vec<Vec<f64>>> = tables
        .iter()
        .map(|table| {
            (0..table.zones.len())
                .map(|zone| mean_curve(table, zone, &days))
                .collect()
        })
        .collect();

    let rows: Vec<Vec<f64>> = days
        .iter()
        .map(|day| {
            let mut row = Vec::new();
            for (table, table_means) in tables.iter().zip(&means) {
                for (zone, mean) in table_means.iter().enumerate() {
                    match table.day_values(zone, *day).and_then(day_curve) {
                        Some(curve) => row.extend(curve),
                        None => row.extend_from_slice(mean),
                    }
                }
            }
            row
        })
        .collect();

    let complete: Vec<bool> = days
        .iter()
        .map(|day| tables.iter().all(|table| table.is_complete(*day)))
        .collect();

    let matrix = FeatureMatrix {
        days,
        rows,
        complete,
    };
    info!(
        "Built feature matrix: {} days x {} features",
        matrix.days.len(),
        matrix.width()
    );
    matrix
}
