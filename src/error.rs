use crate::representative::error::SelectionError;
use crate::timeseries::error::TimeSeriesError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepDaysError {
    #[error(transparent)]
    TimeSeries(#[from] TimeSeriesError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("Failed to read config file '{0}'")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config")]
    ConfigParse(#[source] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
