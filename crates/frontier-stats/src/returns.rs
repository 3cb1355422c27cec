//! Gap-normalized return series.
//!
//! Internal helpers shared by the statistics builder. All returns produced
//! here are simple percentage returns between consecutive valid
//! observations, divided by the number of calendar days spanned.

use frontier_core::types::Date;

/// Computes gap-normalized returns over the valid observations of a column.
pub(crate) fn normalized_returns(dates: &[Date], column: &[Option<f64>]) -> Vec<f64> {
    let valid: Vec<(Date, f64)> = dates
        .iter()
        .zip(column.iter())
        .filter_map(|(date, close)| close.map(|c| (*date, c)))
        .collect();
    normalized_from_valid(&valid)
}

/// Computes gap-normalized returns for a pair of columns over the rows
/// where both are valid.
pub(crate) fn pairwise_normalized_returns(
    dates: &[Date],
    a: &[Option<f64>],
    b: &[Option<f64>],
) -> (Vec<f64>, Vec<f64>) {
    let mut valid_a = Vec::new();
    let mut valid_b = Vec::new();
    for ((date, ca), cb) in dates.iter().zip(a.iter()).zip(b.iter()) {
        if let (Some(pa), Some(pb)) = (ca, cb) {
            valid_a.push((*date, *pa));
            valid_b.push((*date, *pb));
        }
    }
    (
        normalized_from_valid(&valid_a),
        normalized_from_valid(&valid_b),
    )
}

fn normalized_from_valid(valid: &[(Date, f64)]) -> Vec<f64> {
    valid
        .windows(2)
        .map(|w| {
            let (prev_date, prev_close) = w[0];
            let (date, close) = w[1];
            let days = prev_date.days_between(&date) as f64;
            (close / prev_close - 1.0) / days
        })
        .collect()
}

/// Sample mean.
pub(crate) fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample covariance with the (n - 1) denominator.
///
/// Returns `None` for fewer than two paired observations.
pub(crate) fn sample_covariance(xs: &[f64], ys: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.len() < 2 {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let acc: f64 = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    Some(acc / (xs.len() - 1) as f64)
}

/// Sample variance with the (n - 1) denominator.
pub(crate) fn sample_variance(xs: &[f64]) -> Option<f64> {
    sample_covariance(xs, xs)
}
