use crate::representative::kmeans::{squared_distance, KMeansFit};
use crate::types::calendar::DAYS_PER_YEAR;
use ordered_float::OrderedFloat;

/// The day standing in for one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClusterPick {
    pub cluster: usize,
    /// Row of the feature matrix (position in the day index).
    pub day: usize,
    pub size: usize,
}

/// Picks, for every cluster, the `eligible` member closest to its centroid,
/// then keeps the `n_days` largest clusters. Clusters without an eligible
/// member are skipped like empty ones; their size still counts members that
/// cannot be picked.
///
/// Rows are assumed to be in calendar order, so distance ties resolve to the
/// earliest day. Equal-size clusters keep cluster-index order.
pub(crate) fn pick_representatives(
    rows: &[Vec<f64>],
    eligible: &[bool],
    fit: &KMeansFit,
    n_days: usize,
) -> Vec<ClusterPick> {
    let mut picks: Vec<ClusterPick> = fit
        .centroids
        .iter()
        .enumerate()
        .filter_map(|(cluster, centroid)| {
            let members = fit
                .labels
                .iter()
                .enumerate()
                .filter(|(_, label)| **label == cluster)
                .map(|(row, _)| row);
            let size = members.clone().count();
            let day = members
                .filter(|row| eligible.get(*row).copied().unwrap_or(false))
                .min_by_key(|row| (OrderedFloat(squared_distance(&rows[*row], centroid)), *row))?;
            Some(ClusterPick { cluster, day, size })
        })
        .collect();

    picks.sort_by(|a, b| b.size.cmp(&a.size));
    picks.truncate(n_days);
    picks
}

/// Weights proportional to cluster size, summing to 365.
pub(crate) fn day_weights(picks: &[ClusterPick]) -> Vec<f64> {
    let year = DAYS_PER_YEAR as f64;
    let kept: usize = picks.iter().map(|p| p.size).sum();
    if kept == 0 {
        return Vec::new();
    }
    let raw: Vec<f64> = picks
        .iter()
        .map(|p| p.size as f64 * year / kept as f64)
        .collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w * year / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(centroids: Vec<Vec<f64>>, labels: Vec<usize>) -> KMeansFit {
        KMeansFit {
            centroids,
            labels,
            inertia: 0.0,
            n_iter: 1,
        }
    }

    #[test]
    fn closest_member_is_chosen() {
        let rows = vec![vec![0.0], vec![0.9], vec![1.2], vec![5.0]];
        let fit = fit(vec![vec![1.0], vec![5.0]], vec![0, 0, 0, 1]);
        let picks = pick_representatives(&rows, &[true; 4], &fit, 2);
        assert_eq!(
            picks,
            vec![
                ClusterPick { cluster: 0, day: 1, size: 3 },
                ClusterPick { cluster: 1, day: 3, size: 1 },
            ]
        );
    }

    #[test]
    fn distance_ties_pick_the_earliest_day() {
        let rows = vec![vec![0.0], vec![2.0]];
        let fit = fit(vec![vec![1.0]], vec![0, 0]);
        assert_eq!(pick_representatives(&rows, &[true; 2], &fit, 1)[0].day, 0);
    }

    #[test]
    fn keeps_largest_clusters_and_skips_empty_ones() {
        let rows = vec![vec![0.0], vec![1.0], vec![1.1], vec![3.0], vec![3.1]];
        let fit = fit(
            vec![vec![0.0], vec![9.0], vec![1.0], vec![3.0]],
            vec![0, 2, 2, 3, 3],
        );
        let picks = pick_representatives(&rows, &[true; 5], &fit, 3);
        let clusters: Vec<usize> = picks.iter().map(|p| p.cluster).collect();
        // cluster 1 is empty; 2 and 3 tie on size and keep index order
        assert_eq!(clusters, vec![2, 3, 0]);

        let picks = pick_representatives(&rows, &[true; 5], &fit, 2);
        assert_eq!(picks.len(), 2);
    }

    #[test]
    fn filled_rows_are_never_picked() {
        // row 1 sits on the centroid but was mean-filled
        let rows = vec![vec![0.8], vec![1.0], vec![1.3], vec![5.0]];
        let eligible = [true, false, true, false];
        let fit = fit(vec![vec![1.0], vec![5.0]], vec![0, 0, 0, 1]);
        let picks = pick_representatives(&rows, &eligible, &fit, 2);
        assert_eq!(picks, vec![ClusterPick { cluster: 0, day: 0, size: 3 }]);
    }

    #[test]
    fn weights_sum_to_a_year() {
        let picks = [
            ClusterPick { cluster: 0, day: 0, size: 100 },
            ClusterPick { cluster: 1, day: 1, size: 50 },
            ClusterPick { cluster: 2, day: 2, size: 7 },
        ];
        let weights = day_weights(&picks);
        assert!((weights.iter().sum::<f64>() - 365.0).abs() < 1e-9);
        assert!((weights[0] / weights[1] - 2.0).abs() < 1e-12);
    }
}
