//! Seeded k-means (Lloyd's algorithm with k-means++ initialization).
//!
//! Restarts run in parallel; each gets its own RNG seeded from a master seed,
//! so the chosen fit is the same whatever the thread count.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

/// Relative tolerance on the squared centroid shift, scaled by the mean
/// per-feature variance of the data.
const RELATIVE_TOLERANCE: f64 = 1e-4;

#[derive(Debug, Clone, Copy)]
pub(crate) struct KMeans {
    pub n_clusters: usize,
    pub n_init: usize,
    pub max_iter: usize,
    pub seed: u64,
}

#[derive(Debug, Clone)]
pub(crate) struct KMeansFit {
    pub centroids: Vec<Vec<f64>>,
    /// Cluster index of every point.
    pub labels: Vec<usize>,
    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,
    pub n_iter: usize,
}

impl KMeans {
    /// Clusters `points` into `n_clusters` groups, keeping the restart with the
    /// lowest inertia (the earliest restart on ties).
    ///
    /// `points` must be non-empty, of equal width, and hold at least
    /// `n_clusters` rows.
    pub fn fit(&self, points: &[Vec<f64>]) -> KMeansFit {
        let mut master = StdRng::seed_from_u64(self.seed);
        let seeds: Vec<u64> = (0..self.n_init.max(1)).map(|_| master.gen()).collect();
        let tolerance = RELATIVE_TOLERANCE * mean_variance(points);

        let fits: Vec<KMeansFit> = seeds
            .par_iter()
            .map(|seed| self.fit_once(points, *seed, tolerance))
            .collect();

        let mut best: Option<KMeansFit> = None;
        for (restart, fit) in fits.into_iter().enumerate() {
            debug!(
                "k-means restart {}: inertia {:.6} after {} iterations",
                restart, fit.inertia, fit.n_iter
            );
            if best.as_ref().map_or(true, |b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.unwrap_or_else(|| self.fit_once(points, self.seed, tolerance))
    }

    fn fit_once(&self, points: &[Vec<f64>], seed: u64, tolerance: f64) -> KMeansFit {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids = init_plus_plus(points, self.n_clusters, &mut rng);
        let mut labels = assign(points, &centroids);
        let mut n_iter = 0;

        while n_iter < self.max_iter {
            n_iter += 1;
            let updated = update_centroids(points, &labels, &centroids);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| squared_distance(old, new))
                .sum();
            centroids = updated;
            labels = assign(points, &centroids);
            if shift <= tolerance {
                break;
            }
        }

        let inertia = points
            .iter()
            .zip(&labels)
            .map(|(p, l)| squared_distance(p, &centroids[*l]))
            .sum();
        KMeansFit {
            centroids,
            labels,
            inertia,
            n_iter,
        }
    }
}

pub(crate) fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn mean_variance(points: &[Vec<f64>]) -> f64 {
    let n = points.len() as f64;
    let width = points.first().map_or(0, Vec::len);
    if width == 0 || points.is_empty() {
        return 0.0;
    }
    let total: f64 = (0..width)
        .map(|j| {
            let mean = points.iter().map(|p| p[j]).sum::<f64>() / n;
            points.iter().map(|p| (p[j] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / width as f64
}

/// k-means++ seeding: each new centroid is a point drawn with probability
/// proportional to its squared distance to the nearest chosen centroid.
fn init_plus_plus(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..n)].clone());

    let mut nearest: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.gen::<f64>() * total;
            let mut cumulative = 0.0;
            nearest
                .iter()
                .position(|d| {
                    cumulative += d;
                    cumulative > target
                })
                .or_else(|| nearest.iter().rposition(|d| *d > 0.0))
                .unwrap_or(0)
        } else {
            // All remaining points coincide with a centroid.
            rng.gen_range(0..n)
        };

        let chosen = points[pick].clone();
        for (d, p) in nearest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &chosen));
        }
        centroids.push(chosen);
    }
    centroids
}

/// Nearest centroid per point; ties go to the lowest cluster index.
fn assign(points: &[Vec<f64>], centroids: &[Vec<f64>]) -> Vec<usize> {
    points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (c, centroid) in centroids.iter().enumerate() {
                let d = squared_distance(p, centroid);
                if d < best_distance {
                    best = c;
                    best_distance = d;
                }
            }
            best
        })
        .collect()
}

/// Mean of each cluster's members. Empty clusters keep their centroid.
fn update_centroids(
    points: &[Vec<f64>],
    labels: &[usize],
    centroids: &[Vec<f64>],
) -> Vec<Vec<f64>> {
    let width = centroids.first().map_or(0, Vec::len);
    let mut sums = vec![vec![0.0; width]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (p, l) in points.iter().zip(labels) {
        counts[*l] += 1;
        sums[*l].iter_mut().zip(p).for_each(|(s, v)| *s += v);
    }
    sums.into_iter()
        .zip(counts)
        .zip(centroids)
        .map(|((sum, count), old)| {
            if count == 0 {
                old.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect()
}
