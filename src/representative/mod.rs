//! Representative-day reduction: clusters the days of a year of hourly
//! profiles and keeps one actual calendar day per cluster, weighted so the
//! weights add up to 365.

pub mod error;
mod features;
mod kmeans;
mod prepare;
mod profiles;
mod selection;

use crate::representative::error::{ClusteringError, SelectionError, ShapeError};
use crate::representative::features::{build_feature_matrix, check_coverage};
use crate::representative::kmeans::KMeans;
use crate::representative::prepare::ProfileTable;
use crate::representative::profiles::{profile_frame, weights_frame};
use crate::representative::selection::{day_weights, pick_representatives};
use crate::types::hourly_record::DayKey;
use bon::bon;
use log::{info, warn};
use polars::prelude::DataFrame;
use serde::Serialize;

pub const DEFAULT_N_DAYS: usize = 12;
pub const DEFAULT_N_CLUSTERS: usize = 20;
pub const DEFAULT_RANDOM_SEED: u64 = 42;
pub const DEFAULT_N_INIT: usize = 10;
pub const DEFAULT_MAX_ITER: usize = 300;

/// One selected day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RepresentativeDay {
    /// 1-based index, largest cluster first.
    pub rep_day: usize,
    /// The calendar day whose profile is emitted.
    pub source: DayKey,
    /// Days of the year this day stands for.
    pub weight: f64,
    /// Number of days in its cluster.
    pub cluster_size: usize,
}

/// Result of a representative-day selection.
#[derive(Debug, Clone)]
pub struct RepresentativeDays {
    pub days: Vec<RepresentativeDay>,
    /// `rep_day, zone, hour, value, weight` rows for the load zones.
    pub load: DataFrame,
    /// Same layout for the renewable zones, when a renewable table was given.
    pub re: Option<DataFrame>,
    /// `rep_day, original_month, original_day, weight`.
    pub weights: DataFrame,
}

impl RepresentativeDays {
    pub fn total_weight(&self) -> f64 {
        self.days.iter().map(|d| d.weight).sum()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Reduces a year of hourly load (and optionally renewable) profiles to a few
/// weighted representative days using seeded k-means.
///
/// # Examples
///
/// ```no_run
/// # use polars::prelude::DataFrame;
/// # fn run(load: DataFrame, re: DataFrame) -> Result<(), repdays::SelectionError> {
/// use repdays::RepresentativeDaySelector;
///
/// let selector = RepresentativeDaySelector::builder()
///     .n_days(12)
///     .n_clusters(20)
///     .re_technology("solar")
///     .build();
/// let result = selector.select(&load, Some(&re))?;
/// assert!((result.total_weight() - 365.0).abs() < 1e-6);
/// println!("{}", result.weights);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RepresentativeDaySelector {
    n_days: usize,
    n_clusters: usize,
    random_seed: u64,
    re_technology: Option<String>,
    n_init: usize,
    max_iter: usize,
}

#[bon]
impl RepresentativeDaySelector {
    /// Creates a selector.
    ///
    /// # Arguments
    ///
    /// * `n_days` - Representative days to output. Defaults to 12.
    /// * `n_clusters` - Clusters formed before keeping the `n_days` largest.
    ///   Defaults to 20; raised to `n_days` when smaller.
    /// * `random_seed` - Seed for k-means initialization. Defaults to 42.
    /// * `re_technology` - Renewable technology to keep when the renewable table
    ///   has a `tech`/`technology` column. Unset keeps every row.
    /// * `n_init` - Number of k-means restarts. Defaults to 10.
    /// * `max_iter` - Iteration cap per restart. Defaults to 300.
    #[builder]
    pub fn new(
        n_days: Option<usize>,
        n_clusters: Option<usize>,
        random_seed: Option<u64>,
        #[builder(into)] re_technology: Option<String>,
        n_init: Option<usize>,
        max_iter: Option<usize>,
    ) -> Self {
        Self {
            n_days: n_days.unwrap_or(DEFAULT_N_DAYS),
            n_clusters: n_clusters.unwrap_or(DEFAULT_N_CLUSTERS),
            random_seed: random_seed.unwrap_or(DEFAULT_RANDOM_SEED),
            re_technology,
            n_init: n_init.unwrap_or(DEFAULT_N_INIT),
            max_iter: max_iter.unwrap_or(DEFAULT_MAX_ITER),
        }
    }

    /// Selects representative days from `load` and, if given, `re`.
    ///
    /// Both tables are validated, stripped of Feb 29 and rescaled to `[0, 1]`
    /// independently. The feature vector of a day is the 24-hour curve of every
    /// load zone followed by every renewable zone; short days are padded with
    /// their last value. An empty renewable table is ignored.
    ///
    /// Only days with stored values in every zone can be representatives. Days
    /// without any load value are left out of the index; days missing a single
    /// zone are clustered with that zone's mean curve but never emitted.
    /// Clusters left empty by k-means, or holding no emittable day, are
    /// skipped, so fewer than `n_days` days may come back; the weights still
    /// sum to 365.
    ///
    /// # Errors
    ///
    /// * [`ClusteringError::InvalidDayCount`] if `n_days` is 0.
    /// * [`ClusteringError::InsufficientDays`] if the load table has fewer
    ///   distinct days than clusters.
    /// * [`error::ShapeError`] for an empty load table, a zone covering too
    ///   few days, no day covered by every zone, or no renewable rows for the
    ///   requested technology.
    /// * Validation and schema errors of either input table.
    pub fn select(
        &self,
        load: &DataFrame,
        re: Option<&DataFrame>,
    ) -> Result<RepresentativeDays, SelectionError> {
        if self.n_days == 0 {
            return Err(ClusteringError::InvalidDayCount.into());
        }
        let n_clusters = if self.n_clusters < self.n_days {
            info!("Adjusted n_clusters to {} to match n_days", self.n_days);
            self.n_days
        } else {
            self.n_clusters
        };

        let load_table = ProfileTable::prepare(load, "load", None)?;
        let re_table = re
            .filter(|df| df.height() > 0)
            .map(|df| ProfileTable::prepare(df, "re", self.re_technology.as_deref()))
            .transpose()?;

        let index: Vec<DayKey> = load_table.days.iter().copied().collect();
        if index.len() < n_clusters {
            return Err(ClusteringError::InsufficientDays {
                days: index.len(),
                clusters: n_clusters,
            }
            .into());
        }
        check_coverage(&load_table, &index)?;
        if let Some(table) = &re_table {
            check_coverage(table, &index)?;
        }

        let matrix = build_feature_matrix(&load_table, re_table.as_ref());
        if !matrix.complete.contains(&true) {
            return Err(ShapeError::NoCompleteDays.into());
        }
        info!(
            "Clustering {} days into {} clusters...",
            matrix.days.len(),
            n_clusters
        );
        let fit = KMeans {
            n_clusters,
            n_init: self.n_init,
            max_iter: self.max_iter,
            seed: self.random_seed,
        }
        .fit(&matrix.rows);

        let picks = pick_representatives(&matrix.rows, &matrix.complete, &fit, self.n_days);
        let weights = day_weights(&picks);
        let days: Vec<RepresentativeDay> = picks
            .iter()
            .zip(weights)
            .enumerate()
            .map(|(i, (pick, weight))| RepresentativeDay {
                rep_day: i + 1,
                source: matrix.days[pick.day],
                weight,
                cluster_size: pick.size,
            })
            .collect();

        if days.len() < self.n_days {
            warn!(
                "Only {} of {} representative days could be selected (empty or incomplete clusters)",
                days.len(),
                self.n_days
            );
        }

        let result = RepresentativeDays {
            load: profile_frame(&load_table, &days)?,
            re: re_table
                .as_ref()
                .map(|table| profile_frame(table, &days))
                .transpose()?,
            weights: weights_frame(&days)?,
            days,
        };
        info!(
            "Selected {} representative days (weights sum {:.1})",
            result.len(),
            result.total_weight()
        );
        Ok(result)
    }
}

impl Default for RepresentativeDaySelector {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Selects `n_days` representative days with the default restart settings.
///
/// Shorthand for [`RepresentativeDaySelector`] with the given counts and seed.
pub fn compute_representative_days(
    load: &DataFrame,
    re: Option<&DataFrame>,
    n_days: usize,
    n_clusters: usize,
    seed: u64,
) -> Result<RepresentativeDays, SelectionError> {
    RepresentativeDaySelector::builder()
        .n_days(n_days)
        .n_clusters(n_clusters)
        .random_seed(seed)
        .build()
        .select(load, re)
}
