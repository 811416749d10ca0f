//! Month to season mapping used when folding monthly data into seasons.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Maps month numbers (1-12) to season codes such as `"DJF"`.
///
/// The default is the meteorological grouping:
/// DJF (Dec, Jan, Feb), MAM, JJA and SON.
///
/// Serializes as a JSON object keyed by month number:
///
/// ```
/// use repdays::SeasonMap;
///
/// let wet_dry: SeasonMap = serde_json::from_str(
///     r#"{"1":"wet","2":"wet","3":"wet","4":"wet","5":"dry","6":"dry",
///         "7":"dry","8":"dry","9":"dry","10":"dry","11":"wet","12":"wet"}"#,
/// ).unwrap();
/// assert_eq!(wet_dry.season_of(7), Some("dry"));
/// assert_eq!(SeasonMap::default().season_of(12), Some("DJF"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeasonMap(BTreeMap<u32, String>);

impl SeasonMap {
    /// Builds a mapping from `(month, season)` pairs. Later pairs override earlier ones.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (u32, S)>) -> Self {
        Self(pairs.into_iter().map(|(m, s)| (m, s.into())).collect())
    }

    pub fn season_of(&self, month: u32) -> Option<&str> {
        self.0.get(&month).map(String::as_str)
    }

    /// `(month, season)` pairs in month order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.0.iter().map(|(m, s)| (*m, s.as_str()))
    }

    /// Months in `1..=12` that have no season assigned.
    pub fn unmapped_months(&self) -> Vec<u32> {
        (1..=12).filter(|m| !self.0.contains_key(m)).collect()
    }

    /// Distinct season codes, sorted.
    pub fn seasons(&self) -> Vec<&str> {
        let mut seasons: Vec<&str> = self.0.values().map(String::as_str).collect();
        seasons.sort_unstable();
        seasons.dedup();
        seasons
    }
}

impl Default for SeasonMap {
    fn default() -> Self {
        Self::from_pairs([
            (1, "DJF"),
            (2, "DJF"),
            (3, "MAM"),
            (4, "MAM"),
            (5, "MAM"),
            (6, "JJA"),
            (7, "JJA"),
            (8, "JJA"),
            (9, "SON"),
            (10, "SON"),
            (11, "SON"),
            (12, "DJF"),
        ])
    }
}

impl fmt::Display for SeasonMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|(m, s)| format!("{m}:{s}")).collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}
