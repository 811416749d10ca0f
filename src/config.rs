//! Caller-supplied options for a representative-day run.

use crate::error::RepDaysError;
use crate::representative::{
    RepresentativeDays, RepresentativeDaySelector, DEFAULT_MAX_ITER, DEFAULT_N_CLUSTERS,
    DEFAULT_N_DAYS, DEFAULT_N_INIT, DEFAULT_RANDOM_SEED,
};
use crate::types::season::SeasonMap;
use log::info;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options for [`RepresentativeDaySelector`] and the season folding step.
/// Every field is optional in JSON and falls back to its default.
///
/// # Examples
///
/// ```
/// use repdays::RepDaysConfig;
///
/// let config = RepDaysConfig::from_json_str(r#"{"n_days": 4, "include_re": true}"#).unwrap();
/// assert_eq!(config.n_days, 4);
/// assert_eq!(config.n_clusters, 20);
/// assert_eq!(config.re_technology, "solar");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepDaysConfig {
    pub n_days: usize,
    pub n_clusters: usize,
    /// Add renewable profiles to the clustering features.
    pub include_re: bool,
    pub re_technology: String,
    pub random_seed: u64,
    pub seasons_map: SeasonMap,
    pub n_init: usize,
    pub max_iter: usize,
}

impl Default for RepDaysConfig {
    fn default() -> Self {
        Self {
            n_days: DEFAULT_N_DAYS,
            n_clusters: DEFAULT_N_CLUSTERS,
            include_re: false,
            re_technology: "solar".to_string(),
            random_seed: DEFAULT_RANDOM_SEED,
            seasons_map: SeasonMap::default(),
            n_init: DEFAULT_N_INIT,
            max_iter: DEFAULT_MAX_ITER,
        }
    }
}

impl RepDaysConfig {
    pub fn from_json_str(json: &str) -> Result<Self, RepDaysError> {
        let config: Self = serde_json::from_str(json).map_err(RepDaysError::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, RepDaysError> {
        let json = fs::read_to_string(path)
            .map_err(|e| RepDaysError::ConfigRead(path.to_path_buf(), e))?;
        let config = Self::from_json_str(&json)?;
        info!("Loaded representative-day config from '{}'", path.display());
        Ok(config)
    }

    /// Rejects settings no run could satisfy. `n_clusters < n_days` is allowed;
    /// the selector raises the cluster count.
    pub fn validate(&self) -> Result<(), RepDaysError> {
        if self.n_days == 0 {
            return Err(RepDaysError::InvalidConfig(
                "n_days must be at least 1".to_string(),
            ));
        }
        if self.n_init == 0 || self.max_iter == 0 {
            return Err(RepDaysError::InvalidConfig(
                "n_init and max_iter must be at least 1".to_string(),
            ));
        }
        if self.include_re && self.re_technology.trim().is_empty() {
            return Err(RepDaysError::InvalidConfig(
                "re_technology must be set when include_re is true".to_string(),
            ));
        }
        let unmapped = self.seasons_map.unmapped_months();
        if !unmapped.is_empty() {
            return Err(RepDaysError::InvalidConfig(format!(
                "seasons_map has no season for months {unmapped:?}"
            )));
        }
        Ok(())
    }

    pub fn selector(&self) -> RepresentativeDaySelector {
        RepresentativeDaySelector::builder()
            .n_days(self.n_days)
            .n_clusters(self.n_clusters)
            .random_seed(self.random_seed)
            .re_technology(self.re_technology.clone())
            .n_init(self.n_init)
            .max_iter(self.max_iter)
            .build()
    }

    /// Runs the selector on `load`, adding `re` only when `include_re` is set.
    pub fn representative_days(
        &self,
        load: &DataFrame,
        re: Option<&DataFrame>,
    ) -> Result<RepresentativeDays, RepDaysError> {
        self.validate()?;
        let re = re.filter(|_| self.include_re);
        Ok(self.selector().select(load, re)?)
    }
}
