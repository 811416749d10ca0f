use crate::timeseries::error::TimeSeriesError;
use polars::error::PolarsError;
use thiserror::Error;

/// Zone data too sparse or inconsistent to build a well-formed feature matrix.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("[{label}] Profile table has no rows")]
    Empty { label: String },

    #[error("[{label}] Zone '{zone}' covers only {days} days, at least {required} required")]
    TruncatedZone {
        label: String,
        zone: String,
        days: usize,
        required: usize,
    },

    #[error("No day has stored values in every zone")]
    NoCompleteDays,

    #[error("No renewable rows for technology '{technology}'")]
    NoTechnologyRows { technology: String },
}

/// The requested clustering cannot be satisfied by the data.
#[derive(Debug, Error)]
pub enum ClusteringError {
    #[error("Only {days} distinct days available for {clusters} clusters")]
    InsufficientDays { days: usize, clusters: usize },

    #[error("Number of representative days must be at least 1")]
    InvalidDayCount,
}

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error(transparent)]
    TimeSeries(#[from] TimeSeriesError),

    #[error(transparent)]
    Shape(#[from] ShapeError),

    #[error(transparent)]
    Clustering(#[from] ClusteringError),

    #[error("Failed building representative-day table: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
