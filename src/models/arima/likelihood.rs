//! Exact Gaussian likelihood of an ARMA process via the Kalman filter.
//!
//! The process `(x_t - μ) = Σ φ_i (x_{t-i} - μ) + ε_t + Σ θ_j ε_{t-j}` is cast
//! in Harvey's state-space form with state dimension `r = max(p, q + 1)`:
//!
//! ```text
//! α_{t+1} = T α_t + R ε_{t+1},   x_t - μ = Z α_t,   Z = [1, 0, …, 0]
//! ```
//!
//! The filter starts from the stationary state covariance and runs with unit
//! shock variance; `σ²` is then concentrated out in closed form.

use crate::utils::linalg::stationary_covariance;
use std::f64::consts::PI;

/// One-step prediction errors and their scaled variances.
#[derive(Debug, Clone, PartialEq)]
pub struct Innovations {
    /// `v_t = x_t - E[x_t | x_1..x_{t-1}]`
    pub errors: Vec<f64>,
    /// `F_t`, the variance of `v_t` in units of `σ²`.
    pub variances: Vec<f64>,
}

impl Innovations {
    /// Maximum-likelihood `σ²` given these innovations.
    pub fn sigma2(&self) -> f64 {
        let n = self.errors.len() as f64;
        self.errors
            .iter()
            .zip(&self.variances)
            .map(|(v, f)| v * v / f)
            .sum::<f64>()
            / n
    }

    /// Negative concentrated log-likelihood without additive constants.
    ///
    /// This is the quantity the optimizer minimizes.
    pub fn objective(&self) -> f64 {
        let n = self.errors.len() as f64;
        let sigma2 = self.sigma2();
        if !(sigma2 > 0.0) {
            return f64::INFINITY;
        }
        let log_det: f64 = self.variances.iter().map(|f| f.ln()).sum();
        0.5 * (n * sigma2.ln() + log_det)
    }

    /// Full Gaussian log-likelihood at the concentrated `σ²`.
    pub fn log_likelihood(&self) -> f64 {
        let n = self.errors.len() as f64;
        let log_det: f64 = self.variances.iter().map(|f| f.ln()).sum();
        -0.5 * n * ((2.0 * PI).ln() + 1.0 + self.sigma2().ln()) - 0.5 * log_det
    }
}

/// Transition matrix `T` and shock loading `R` for the given coefficients.
fn state_space(ar: &[f64], ma: &[f64]) -> (Vec<Vec<f64>>, Vec<f64>) {
    let r = ar.len().max(ma.len() + 1);

    let mut transition = vec![vec![0.0; r]; r];
    for (i, row) in transition.iter_mut().enumerate() {
        if let Some(&phi) = ar.get(i) {
            row[0] = phi;
        }
        if i + 1 < r {
            row[i + 1] = 1.0;
        }
    }

    let mut loading = vec![0.0; r];
    loading[0] = 1.0;
    for (j, &theta) in ma.iter().enumerate() {
        loading[j + 1] = theta;
    }

    (transition, loading)
}

fn mat_vec(m: &[Vec<f64>], v: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(v).map(|(a, b)| a * b).sum())
        .collect()
}

/// Run the Kalman filter over `series` and collect its innovations.
///
/// Returns `None` if the AR part is non-stationary or a prediction variance
/// collapses to zero.
pub fn kalman_filter(series: &[f64], ar: &[f64], ma: &[f64], mean: f64) -> Option<Innovations> {
    let (t, r) = state_space(ar, ma);
    let k = r.len();
    let mut p = stationary_covariance(&t, &r)?;
    let mut a = vec![0.0; k];

    let mut errors = Vec::with_capacity(series.len());
    let mut variances = Vec::with_capacity(series.len());

    for &x in series {
        let v = x - mean - a[0];
        let f = p[0][0];
        if !(f > 0.0 && f.is_finite()) {
            return None;
        }
        errors.push(v);
        variances.push(f);

        // Gain K = T P Z' / F
        let p_col: Vec<f64> = p.iter().map(|row| row[0]).collect();
        let gain: Vec<f64> = mat_vec(&t, &p_col).into_iter().map(|g| g / f).collect();

        let ta = mat_vec(&t, &a);
        a = ta.iter().zip(&gain).map(|(ta, g)| ta + g * v).collect();

        // P = T P T' + R R' - K K' F
        let tp: Vec<Vec<f64>> = (0..k)
            .map(|i| (0..k).map(|j| (0..k).map(|m| t[i][m] * p[m][j]).sum()).collect())
            .collect();
        p = (0..k)
            .map(|i| {
                (0..k)
                    .map(|j| {
                        let tpt: f64 = (0..k).map(|m| tp[i][m] * t[j][m]).sum();
                        tpt + r[i] * r[j] - gain[i] * gain[j] * f
                    })
                    .collect()
            })
            .collect();
    }

    Some(Innovations { errors, variances })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn white_noise_innovations_are_the_demeaned_series() {
        let x = vec![1.0, -2.0, 0.5, 3.0];
        let innov = kalman_filter(&x, &[], &[], 0.5).unwrap();

        assert_eq!(innov.errors, vec![0.5, -2.5, 0.0, 2.5]);
        assert!(innov.variances.iter().all(|&f| f == 1.0));
        assert_relative_eq!(innov.sigma2(), (0.25 + 6.25 + 6.25) / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn ar1_innovations_match_closed_form() {
        // Exact AR(1): first error has variance 1/(1-phi^2), then x_t - phi x_{t-1}
        let phi = 0.5;
        let x = vec![2.0, 1.0, 1.5, -0.5];
        let innov = kalman_filter(&x, &[phi], &[], 0.0).unwrap();

        assert_relative_eq!(innov.variances[0], 1.0 / (1.0 - phi * phi), epsilon = 1e-12);
        assert_relative_eq!(innov.errors[0], 2.0, epsilon = 1e-12);
        for t in 1..x.len() {
            assert_relative_eq!(innov.errors[t], x[t] - phi * x[t - 1], epsilon = 1e-12);
            assert_relative_eq!(innov.variances[t], 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn ma1_prediction_variance_decreases_towards_one() {
        let x: Vec<f64> = (0..40).map(|i| ((i * 37 % 11) as f64) - 5.0).collect();
        let innov = kalman_filter(&x, &[], &[0.6], 0.0).unwrap();

        assert_relative_eq!(innov.variances[0], 1.0 + 0.36, epsilon = 1e-12);
        for w in innov.variances.windows(2) {
            assert!(w[1] <= w[0] + 1e-12);
        }
        assert!(innov.variances.last().unwrap() - 1.0 < 1e-6);
    }

    #[test]
    fn explosive_ar_is_rejected() {
        assert!(kalman_filter(&[1.0, 2.0, 3.0], &[1.0], &[], 0.0).is_none());
    }

    #[test]
    fn log_likelihood_of_standard_white_noise() {
        let x = vec![1.0, -1.0, 1.0, -1.0];
        let innov = kalman_filter(&x, &[], &[], 0.0).unwrap();

        // sigma2 = 1, so ll = -n/2 (ln 2pi + 1)
        let expected = -2.0 * ((2.0 * PI).ln() + 1.0);
        assert_relative_eq!(innov.log_likelihood(), expected, epsilon = 1e-12);
        assert_relative_eq!(innov.objective(), 0.0, epsilon = 1e-12);
    }
}
