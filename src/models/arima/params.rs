//! Parameter transforms and starting values for ARMA estimation.
//!
//! The optimizer works on an unconstrained vector laid out as
//! `[ar (p), ma (q), drift (0 or 1)]`. AR and MA blocks are mapped through
//! partial autocorrelations so every point the optimizer visits is a
//! stationary, invertible model.

use crate::models::arima::ArimaOrder;
use crate::utils::stats::{mean, partial_autocorrelation};

/// Largest starting partial autocorrelation magnitude.
const MAX_START_PACF: f64 = 0.95;

/// Map unconstrained reals to the coefficients of a stationary AR polynomial.
///
/// Each input is squashed into `(-1, 1)` as a partial autocorrelation and
/// the Durbin-Levinson recursion turns those into AR coefficients.
pub fn constrain_stationary(unconstrained: &[f64]) -> Vec<f64> {
    let n = unconstrained.len();
    if n == 0 {
        return Vec::new();
    }

    let pacf: Vec<f64> = unconstrained
        .iter()
        .map(|u| u / (1.0 + u * u).sqrt())
        .collect();

    let mut coefs: Vec<f64> = Vec::with_capacity(n);
    for (k, &r) in pacf.iter().enumerate() {
        let mut next: Vec<f64> = (0..k).map(|i| coefs[i] - r * coefs[k - 1 - i]).collect();
        next.push(r);
        coefs = next;
    }
    coefs
}

/// Map unconstrained reals to the coefficients of an invertible MA polynomial
/// `1 + θ₁B + … + θ_qB^q`.
pub fn constrain_invertible(unconstrained: &[f64]) -> Vec<f64> {
    constrain_stationary(unconstrained)
        .into_iter()
        .map(|c| -c)
        .collect()
}

/// Partial autocorrelations of an AR polynomial; the inverse of the
/// Durbin-Levinson step in [`constrain_stationary`].
///
/// Stops early at a partial of magnitude one, where the polynomial sits on
/// the unit circle and lower orders are undefined.
pub fn partial_coefficients(coefs: &[f64]) -> Vec<f64> {
    let mut current = coefs.to_vec();
    let mut partials = Vec::with_capacity(coefs.len());
    while let Some(&r) = current.last() {
        partials.push(r);
        let k = current.len();
        let denom = 1.0 - r * r;
        if denom <= 0.0 {
            break;
        }
        current = (0..k - 1)
            .map(|i| (current[i] + r * current[k - 2 - i]) / denom)
            .collect();
    }
    partials.reverse();
    partials
}

/// Whether an MA polynomial `1 + θ₁B + … + θ_qB^q` is within `margin` of
/// losing invertibility.
pub fn near_invertibility_boundary(ma: &[f64], margin: f64) -> bool {
    let negated: Vec<f64> = ma.iter().map(|c| -c).collect();
    partial_coefficients(&negated)
        .iter()
        .any(|r| r.abs() >= 1.0 - margin)
}

/// Unconstrained value whose partial autocorrelation is `r`.
fn unconstrain_pacf(r: f64) -> f64 {
    let r = r.clamp(-MAX_START_PACF, MAX_START_PACF);
    r / (1.0 - r * r).sqrt()
}

/// Model parameters decoded from an optimizer vector.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaParams {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub drift: f64,
}

impl ArmaParams {
    /// Decode an unconstrained optimizer vector.
    pub fn decode(raw: &[f64], order: &ArimaOrder, include_drift: bool) -> Self {
        let (p, q) = (order.p, order.q);
        Self {
            ar: constrain_stationary(&raw[..p]),
            ma: constrain_invertible(&raw[p..p + q]),
            drift: if include_drift { raw[p + q] } else { 0.0 },
        }
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.ar
            .iter()
            .chain(&self.ma)
            .chain(std::iter::once(&self.drift))
            .all(|c| c.is_finite())
    }
}

/// Deterministic starting point for the optimizer.
///
/// AR terms start at the sample partial autocorrelations, MA terms at zero
/// and the drift at the sample mean of the differenced series.
pub fn start_params(differenced: &[f64], order: &ArimaOrder, include_drift: bool) -> Vec<f64> {
    let mut start = Vec::with_capacity(order.num_coefficients() + 1);

    let pacf = partial_autocorrelation(differenced, order.p);
    start.extend((0..order.p).map(|k| pacf.get(k).copied().map_or(0.0, unconstrain_pacf)));
    start.extend(std::iter::repeat(0.0).take(order.q));

    if include_drift {
        start.push(mean(differenced));
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn is_stationary_ar2(phi: &[f64]) -> bool {
        phi[1].abs() < 1.0 && phi[0] + phi[1] < 1.0 && phi[1] - phi[0] < 1.0
    }

    #[test]
    fn constrain_ar1_stays_inside_unit_interval() {
        for u in [-1e6, -3.0, -0.5, 0.0, 0.5, 3.0, 1e6] {
            let phi = constrain_stationary(&[u]);
            assert_eq!(phi.len(), 1);
            assert!(phi[0].abs() < 1.0, "u = {u} gave {}", phi[0]);
        }
        assert_relative_eq!(constrain_stationary(&[0.75])[0], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn constrain_ar2_is_stationary_across_grid() {
        for a in [-5.0, -1.0, -0.2, 0.0, 0.3, 2.0, 8.0] {
            for b in [-6.0, -0.7, 0.0, 0.4, 1.5, 7.0] {
                let phi = constrain_stationary(&[a, b]);
                assert!(is_stationary_ar2(&phi), "({a}, {b}) -> {phi:?}");
            }
        }
    }

    #[test]
    fn partial_coefficients_invert_the_constraint() {
        let raw = [0.4, -1.3, 2.2];
        let partials = partial_coefficients(&constrain_stationary(&raw));
        assert_eq!(partials.len(), 3);
        for (r, u) in partials.iter().zip(raw) {
            assert_relative_eq!(*r, u / (1.0 + u * u).sqrt(), epsilon = 1e-10);
        }
        assert!(partial_coefficients(&[]).is_empty());
    }

    #[test]
    fn flags_ma_near_unit_root() {
        assert!(near_invertibility_boundary(&[-0.99998], 1e-3));
        assert!(near_invertibility_boundary(&[0.9995], 1e-3));
        assert!(!near_invertibility_boundary(&[-0.6], 1e-3));
        assert!(!near_invertibility_boundary(&[], 1e-3));

        let almost = constrain_invertible(&[0.3, 200.0]);
        assert!(near_invertibility_boundary(&almost, 1e-3));
        assert!(!near_invertibility_boundary(&constrain_invertible(&[0.3, 1.0]), 1e-3));
    }

    #[test]
    fn invertible_ma1_is_negated_pacf() {
        let theta = constrain_invertible(&[0.75]);
        assert_relative_eq!(theta[0], -0.6, epsilon = 1e-12);
    }

    #[test]
    fn decode_splits_blocks() {
        let order = ArimaOrder::new(1, 1, 1);
        let params = ArmaParams::decode(&[0.0, 0.75, 2.5], &order, true);
        assert_eq!(params.ar, vec![0.0]);
        assert_relative_eq!(params.ma[0], -0.6, epsilon = 1e-12);
        assert_eq!(params.drift, 2.5);
        assert!(params.is_finite());

        let params = ArmaParams::decode(&[0.0, 0.75], &order, false);
        assert_eq!(params.drift, 0.0);
    }

    #[test]
    fn start_params_are_deterministic_and_sized() {
        let diffs = vec![2.0, -1.0, 2.0, 1.0, 1.0, -2.0, 3.0, 1.0, 1.0, -2.0];
        let order = ArimaOrder::new(2, 1, 1);

        let start = start_params(&diffs, &order, true);
        assert_eq!(start.len(), 4);
        assert_eq!(start, start_params(&diffs, &order, true));
        assert_eq!(start[2], 0.0);
        assert_relative_eq!(start[3], mean(&diffs), epsilon = 1e-12);

        assert_eq!(start_params(&diffs, &order, false).len(), 3);
    }
}
