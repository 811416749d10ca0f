use crate::timeseries::columns::{integer_values, string_values};
use crate::timeseries::error::{label_prefix, TimeSeriesError, ValidationError};
use crate::timeseries::schema::{DAY, HOUR, MONTH, ZONE};
use crate::types::calendar::{calendar_days, HOURS_PER_DAY};
use log::warn;
use polars::prelude::DataFrame;
use std::collections::{BTreeMap, HashSet};

/// Missing `(month, day, hour)` slots per zone against the 365-day calendar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletenessReport {
    label: String,
    /// Zones with at least one missing hour, mapped to the missing slots in
    /// calendar order. Complete zones are absent.
    pub missing: BTreeMap<String, Vec<(u32, u32, u32)>>,
}

impl CompletenessReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Turns the first incomplete zone into a [`ValidationError::IncompleteYear`].
    pub fn ensure_complete(&self) -> Result<(), ValidationError> {
        match self.missing.iter().next() {
            None => Ok(()),
            Some((zone, slots)) => Err(ValidationError::IncompleteYear {
                label: label_prefix(&self.label),
                zone: zone.clone(),
                missing: slots.len(),
                sample: describe_slots(slots),
            }),
        }
    }
}

fn describe_slots(slots: &[(u32, u32, u32)]) -> String {
    const SAMPLE: usize = 6;
    let shown: Vec<String> = slots
        .iter()
        .take(SAMPLE)
        .map(|(m, d, h)| format!("m{m} d{d} h{h}"))
        .collect();
    let extra = slots.len().saturating_sub(SAMPLE);
    if extra == 0 {
        shown.join("; ")
    } else {
        format!("{} ... (+{} more)", shown.join("; "), extra)
    }
}

/// Checks that every zone has all 8,760 hourly slots of a non-leap year.
///
/// Extra rows (duplicates, Feb 29) do not count against completeness. Each
/// incomplete zone is logged at `warn` level; use
/// [`CompletenessReport::ensure_complete`] to turn the report into an error.
pub fn check_complete_year(
    df: &DataFrame,
    label: &str,
) -> Result<CompletenessReport, TimeSeriesError> {
    let zones = string_values(df, ZONE, label)?;
    let months = integer_values(df, MONTH, label)?;
    let days = integer_values(df, DAY, label)?;
    let hours = integer_values(df, HOUR, label)?;

    let mut present: BTreeMap<&str, HashSet<(i64, i64, i64)>> = BTreeMap::new();
    for (i, zone) in zones.iter().enumerate() {
        present
            .entry(zone.as_str())
            .or_default()
            .insert((months[i], days[i], hours[i]));
    }

    let mut missing = BTreeMap::new();
    for (zone, slots) in present {
        let absent: Vec<(u32, u32, u32)> = calendar_days()
            .flat_map(|(m, d)| (0..HOURS_PER_DAY as u32).map(move |h| (m, d, h)))
            .filter(|(m, d, h)| !slots.contains(&(*m as i64, *d as i64, *h as i64)))
            .collect();
        if !absent.is_empty() {
            warn!(
                "{}Incomplete year for zone {}: missing {} entries: {}",
                label_prefix(label),
                zone,
                absent.len(),
                describe_slots(&absent)
            );
            missing.insert(zone.to_string(), absent);
        }
    }

    Ok(CompletenessReport {
        label: label.to_string(),
        missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::hourly_record::{frame_to_records, records_to_frame, HourlyRecord};

    fn full_year(zone: &str) -> Vec<HourlyRecord> {
        calendar_days()
            .flat_map(|(m, d)| (0..24).map(move |h| (m, d, h)))
            .map(|(m, d, h)| HourlyRecord::new(zone, m, d, h, 0.5))
            .collect()
    }

    #[test]
    fn complete_year_passes() -> Result<(), Box<dyn std::error::Error>> {
        let df = records_to_frame(&full_year("Testland"))?;
        assert_eq!(df.height(), 8760);
        let report = check_complete_year(&df, "")?;
        assert!(report.is_complete());
        assert!(report.ensure_complete().is_ok());
        Ok(())
    }

    #[test]
    fn leap_year_input_is_complete_after_cleaning() -> Result<(), Box<dyn std::error::Error>> {
        use crate::timeseries::leap_day::drop_leap_day;
        use crate::timeseries::validate::{validate_time_columns, TIME_COLUMNS};

        let mut records = full_year("Testland");
        records.extend((0..24).map(|h| HourlyRecord::new("Testland", 2, 29, h, 0.5)));
        let df = validate_time_columns(&records_to_frame(&records)?, &TIME_COLUMNS, "")?;
        let (df, report) = drop_leap_day(&df, "")?;

        assert_eq!(report.total, 24);
        assert_eq!(df.height(), 8760);
        assert!(check_complete_year(&df, "")?.is_complete());
        assert!(frame_to_records(&df)?
            .iter()
            .all(|r| !(r.month == 2 && r.day == 29)));
        Ok(())
    }

    #[test]
    fn missing_hours_are_listed_per_zone() -> Result<(), Box<dyn std::error::Error>> {
        let mut records = full_year("A");
        records.retain(|r| !(r.month == 3 && r.day == 5 && r.hour >= 20));
        records.extend(full_year("B"));
        let df = records_to_frame(&records)?;

        let report = check_complete_year(&df, "load")?;
        assert!(!report.is_complete());
        assert_eq!(
            report.missing.get("A"),
            Some(&vec![(3, 5, 20), (3, 5, 21), (3, 5, 22), (3, 5, 23)])
        );
        assert!(!report.missing.contains_key("B"));

        match report.ensure_complete() {
            Err(ValidationError::IncompleteYear { zone, missing, .. }) => {
                assert_eq!(zone, "A");
                assert_eq!(missing, 4);
            }
            other => panic!("expected IncompleteYear, got {other:?}"),
        }
        Ok(())
    }
}
