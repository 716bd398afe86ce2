//! Sample statistics used for start values and interval widths.

use statrs::distribution::{ContinuousCDF, Normal};

/// Two-sided standard normal critical value for a coverage `level`.
///
/// # Example
/// ```
/// use caseload_forecast::utils::stats::normal_critical_value;
///
/// // 90% coverage -> z ≈ 1.645
/// let z = normal_critical_value(0.90);
/// assert!((z - 1.645).abs() < 1e-3);
/// ```
pub fn normal_critical_value(level: f64) -> f64 {
    if !(level > 0.0 && level < 1.0) {
        return f64::NAN;
    }
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.inverse_cdf((1.0 + level) / 2.0),
        Err(_) => f64::NAN,
    }
}

/// Arithmetic mean, NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    match values.len() {
        0 => f64::NAN,
        n => values.iter().sum::<f64>() / n as f64,
    }
}

/// Unbiased sample variance, NaN for fewer than two values.
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let centre = mean(values);
    let ss = values.iter().fold(0.0, |acc, x| acc + (x - centre) * (x - centre));
    ss / (values.len() - 1) as f64
}

/// Sample autocorrelation at `lag`, normalised by the lag-0 sum of squares.
///
/// A constant series has zero autocorrelation at every lag.
pub fn autocorrelation(values: &[f64], lag: usize) -> f64 {
    if lag >= values.len() {
        return f64::NAN;
    }
    let centre = mean(values);
    let dev: Vec<f64> = values.iter().map(|x| x - centre).collect();

    let c0: f64 = dev.iter().map(|d| d * d).sum();
    if c0 == 0.0 {
        return 0.0;
    }
    let ck: f64 = dev.iter().zip(&dev[lag..]).map(|(a, b)| a * b).sum();
    ck / c0
}

/// Sample partial autocorrelations at lags `1..=max_lag` (Durbin-Levinson).
///
/// Returns fewer values if the recursion breaks down on a degenerate series.
pub fn partial_autocorrelation(values: &[f64], max_lag: usize) -> Vec<f64> {
    let rho: Vec<f64> = (0..=max_lag).map(|k| autocorrelation(values, k)).collect();
    if rho.iter().any(|r| !r.is_finite()) {
        return Vec::new();
    }

    let mut phi: Vec<f64> = Vec::with_capacity(max_lag);
    let mut pacf = Vec::with_capacity(max_lag);

    for k in 1..=max_lag {
        let numerator = rho[k] - (0..k - 1).map(|j| phi[j] * rho[k - 1 - j]).sum::<f64>();
        let denominator = 1.0 - (0..k - 1).map(|j| phi[j] * rho[j + 1]).sum::<f64>();
        if denominator.abs() < 1e-12 {
            break;
        }
        let phi_kk = numerator / denominator;

        let mut next: Vec<f64> = (0..k - 1).map(|j| phi[j] - phi_kk * phi[k - 2 - j]).collect();
        next.push(phi_kk);
        phi = next;
        pacf.push(phi_kk);
    }

    pacf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_critical_value_known_levels() {
        assert_relative_eq!(normal_critical_value(0.95), 1.959964, epsilon = 1e-5);
        assert_relative_eq!(normal_critical_value(0.80), 1.281552, epsilon = 1e-5);
        assert!(normal_critical_value(1.0).is_nan());
        assert!(normal_critical_value(0.0).is_nan());
    }

    #[test]
    fn mean_and_variance() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert_relative_eq!(variance(&values), 32.0 / 7.0, epsilon = 1e-12);
        assert!(mean(&[]).is_nan());
        assert!(variance(&[7.0]).is_nan());
    }

    #[test]
    fn acf_at_zero_lag_and_for_constants() {
        let values = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        assert_relative_eq!(autocorrelation(&values, 0), 1.0, epsilon = 1e-12);
        // deviations -2, 0, -1, 2, 1: lag-1 products sum to 0 - 0 - 2 + 2 = 0
        assert_relative_eq!(autocorrelation(&values, 1), 0.0, epsilon = 1e-12);
        assert_eq!(autocorrelation(&[3.0, 3.0, 3.0], 1), 0.0);
        assert!(autocorrelation(&values, 5).is_nan());
    }

    #[test]
    fn pacf_lag_1_equals_acf_lag_1() {
        let values = vec![1.0, 3.0, 2.0, 5.0, 4.0, 6.0, 5.0, 8.0];
        let pacf = partial_autocorrelation(&values, 2);
        assert_eq!(pacf.len(), 2);
        assert_relative_eq!(pacf[0], autocorrelation(&values, 1), epsilon = 1e-12);
    }

    #[test]
    fn pacf_of_ar1_cuts_off_after_lag_1() {
        let mut values = vec![1.0];
        for i in 1..400 {
            let x = (i as f64 * 12.9898).sin() * 43758.5453;
            let shock = x - x.floor() - 0.5;
            values.push(0.6 * values[i - 1] + shock);
        }
        let pacf = partial_autocorrelation(&values, 3);
        assert!(pacf[0] > 0.4);
        assert!(pacf[1].abs() < 0.2);
        assert!(pacf[2].abs() < 0.2);
    }
}
