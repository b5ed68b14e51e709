//! Scalar statistics shared by the aggregation and bivariate modules.
//!
//! Every function here is total over its input slice: empty or all-NaN
//! input produces `None` (or an empty bound set), never a panic. Callers
//! choose the sentinel for the empty case and document it at the call site.

/// Arithmetic mean over the finite values of the slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    Some(finite.iter().sum::<f64>() / finite.len() as f64)
}

/// Linear-interpolation quantile (the R-7 estimator) over an ascending
/// sorted slice. `q` is clamped to `[0, 1]`; when the interpolation rank
/// lands exactly on an index, that lower index's value is returned.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let q = q.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let frac = h - lo as f64;
    Some(sorted[lo] + frac * (sorted[hi] - sorted[lo]))
}

/// Population standard deviation (divide by `n`, not `n - 1`).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let n = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / n;
    let sum_sq: f64 = finite.iter().map(|v| (v - mean) * (v - mean)).sum();
    Some((sum_sq / n).sqrt())
}

/// Tukey whisker bounds: the whiskers are clamped to the observed extrema,
/// so `lower >= min` and `upper <= max` always hold.
pub fn whiskers(min: f64, max: f64, q1: f64, q3: f64) -> (f64, f64) {
    let iqr = q3 - q1;
    let lower = min.max(q1 - 1.5 * iqr);
    let upper = max.min(q3 + 1.5 * iqr);
    (lower, upper)
}

/// Simpson's diversity index `1 - sum(p_i^2)` over category counts.
///
/// `0.0` for an empty or single-category input; approaches but never
/// reaches `1.0` as categories multiply under a uniform distribution.
pub fn simpson_diversity(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let sum_sq: f64 = counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_sq
}

/// Sort a value set ascending, dropping non-finite entries first.
pub fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    finite.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    finite
}
