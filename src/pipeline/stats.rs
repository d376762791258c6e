//! Order statistics and moments shared by the stages
//!
//! Quantiles use linear interpolation between closest ranks at position
//! `q * (n - 1)`, the same convention used for the IQR fences and the
//! quantile bins.

/// Present values sorted ascending
pub fn sorted_present(values: &[Option<f64>]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Quantile of an ascending slice. `None` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let frac = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Median of an ascending slice
pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile(sorted, 0.5)
}

/// Population mean and standard deviation (ddof = 0) of present values
pub fn mean_std(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    Some((mean, variance.sqrt()))
}

/// Whether a standard deviation is too small to divide by.
///
/// The threshold is relative to the mean, so a column on a tiny scale that
/// still varies is scalable.
pub fn is_degenerate(mean: f64, std: f64) -> bool {
    !std.is_finite() || std == 0.0 || std <= f64::EPSILON * mean.abs()
}
