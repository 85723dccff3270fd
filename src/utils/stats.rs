//! Statistical utility functions.

/// Returns the value at the given quantile using linear interpolation.
///
/// The position of quantile `q` over the ascending-sorted values is
/// `q * (n - 1)`; fractional positions interpolate between the two
/// neighbouring order statistics.
///
/// # Arguments
/// * `values` - Input values (any order)
/// * `q` - Quantile (0.0 to 1.0, clamped)
///
/// # Example
/// ```
/// use bikeshare_insights::utils::quantile;
///
/// let totals = vec![10.0, 20.0, 30.0, 40.0, 50.0];
/// assert_eq!(quantile(&totals, 0.5), 30.0);
/// assert_eq!(quantile(&totals, 0.25), 20.0);
/// ```
pub fn quantile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let q = q.clamp(0.0, 1.0);
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let pos = q * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;

    if lower == upper {
        sorted[lower]
    } else {
        sorted[lower] + (sorted[upper] - sorted[lower]) * frac
    }
}

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the mean of the finite values in a slice, skipping NaN.
pub fn nan_mean(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    mean(&finite)
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Least-squares line through `(x, y)` pairs.
///
/// Returns `(intercept, slope)`, or `None` when fewer than two points are
/// given or all `x` are equal.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let x_mean = mean(&xs[..n]);
    let y_mean = mean(&ys[..n]);

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    for (x, y) in xs.iter().zip(ys.iter()) {
        sxy += (x - x_mean) * (y - y_mean);
        sxx += (x - x_mean).powi(2);
    }

    if sxx < 1e-12 {
        return None;
    }
    let slope = sxy / sxx;
    Some((y_mean - slope * x_mean, slope))
}
