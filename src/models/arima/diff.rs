//! Differencing and its inverses.
//!
//! `difference` removes `d` orders of trend. `undifference` rebuilds a
//! series from its start, `integrate` continues one from its end.

/// Difference `series` `d` times.
///
/// The result is `d` values shorter, or empty if `series` has no more than
/// `d` values.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    (0..d).fold(series.to_vec(), |level, _| {
        level.windows(2).map(|w| w[1] - w[0]).collect()
    })
}

/// First value at each differencing level `0..d`; the seeds for
/// [`undifference`].
pub fn initial_values(series: &[f64], d: usize) -> Vec<f64> {
    (0..d)
        .filter_map(|level| difference(series, level).first().copied())
        .collect()
}

/// `seed` followed by the running totals of `seed + steps`.
fn accumulate(seed: f64, steps: &[f64], keep_seed: bool) -> Vec<f64> {
    let mut out = Vec::with_capacity(steps.len() + usize::from(keep_seed));
    if keep_seed {
        out.push(seed);
    }
    let mut total = seed;
    for step in steps {
        total += step;
        out.push(total);
    }
    out
}

/// Rebuild a series from its `d`-th differences and [`initial_values`].
///
/// `undifference(&difference(x, d), &initial_values(x, d)) == x` for
/// integer-valued `x`.
pub fn undifference(differenced: &[f64], initial: &[f64]) -> Vec<f64> {
    initial
        .iter()
        .rev()
        .fold(differenced.to_vec(), |level, &seed| accumulate(seed, &level, true))
}

/// Carry differenced-scale forecasts back to the level of `original`,
/// continuing from its last value at every differencing level.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    (0..d).rev().fold(differenced.to_vec(), |level, order| {
        let anchor = difference(original, order).last().copied().unwrap_or(0.0);
        accumulate(anchor, &level, false)
    })
}
