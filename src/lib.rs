mod config;
mod error;
mod regions;
mod representative;
mod timeseries;
mod types;

pub use config::RepDaysConfig;
pub use error::RepDaysError;
pub use regions::{resolve_country_name, similarity_ratio, DEFAULT_MATCH_THRESHOLD};

pub use representative::error::{ClusteringError, SelectionError, ShapeError};
pub use representative::{
    compute_representative_days, RepresentativeDay, RepresentativeDaySelector,
    RepresentativeDays, DEFAULT_MAX_ITER, DEFAULT_N_CLUSTERS, DEFAULT_N_DAYS, DEFAULT_N_INIT,
    DEFAULT_RANDOM_SEED,
};

pub use timeseries::completeness::{check_complete_year, CompletenessReport};
pub use timeseries::error::{SchemaError, TimeSeriesError, ValidationError};
pub use timeseries::leap_day::{drop_leap_day, LeapDayReport};
pub use timeseries::loader::{load_and_clean_timeseries, CleanedTimeSeries};
pub use timeseries::normalize::{normalize_value, NormalizeOutcome, SkipReason};
pub use timeseries::schema::ProfileSchema;
pub use timeseries::season::month_to_season;
pub use timeseries::validate::{shift_one_based_hours, validate_time_columns, TIME_COLUMNS};

pub use types::calendar::{calendar_days, day_of_year, days_in_month, DAYS_PER_YEAR, HOURS_PER_DAY};
pub use types::hourly_record::{frame_to_records, records_to_frame, DayKey, HourlyRecord};
pub use types::season::SeasonMap;
