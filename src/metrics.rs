use ndarray::ArrayView1;
use statrs::statistics::{Data, OrderStatistics, RankTieBreaker, Statistics};

/// Root mean squared error between predictions and labels.
///
/// Returns NaN for empty inputs.
pub fn rmse(predictions: ArrayView1<'_, f32>, labels: ArrayView1<'_, f32>) -> f64 {
    debug_assert_eq!(predictions.len(), labels.len());
    if labels.is_empty() {
        return f64::NAN;
    }
    let sum_sq: f64 = predictions
        .iter()
        .zip(labels.iter())
        .map(|(&p, &y)| {
            let diff = p as f64 - y as f64;
            diff * diff
        })
        .sum();
    (sum_sq / labels.len() as f64).sqrt()
}

/// Pearson correlation of two equally long samples. NaN if either is constant.
pub fn pearson(a: &[f64], b: &[f64]) -> f64 {
    if a.len() < 2 || a.len() != b.len() {
        return f64::NAN;
    }
    let cov = a.iter().covariance(b.iter());
    let denom = a.iter().std_dev() * b.iter().std_dev();
    if denom == 0.0 {
        return f64::NAN;
    }
    cov / denom
}

/// Spearman rank correlation, with tied values sharing their average rank.
pub fn spearman(a: &[f32], b: &[f32]) -> f64 {
    let ranks = |values: &[f32]| {
        let mut data = Data::new(values.iter().map(|&v| v as f64).collect::<Vec<f64>>());
        data.ranks(RankTieBreaker::Average)
    };
    pearson(&ranks(a), &ranks(b))
}
