//! Derivative-free minimisation for likelihood fitting.

/// Outcome of a [`nelder_mead`] run.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// Best vertex found.
    pub point: Vec<f64>,
    /// Objective at `point`.
    pub value: f64,
    /// Iterations used.
    pub iterations: usize,
    /// Stopped on tolerance rather than on the iteration budget.
    pub converged: bool,
}

/// Simplex coefficients and stopping rules.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    /// Stop once the spread of objective values or the simplex diameter
    /// falls below this.
    pub tolerance: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
    /// Relative offset of the initial vertices (absolute for zero coordinates).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 1000,
            tolerance: 1e-8,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
            initial_step: 0.05,
        }
    }
}

/// `n + 1` vertices with their objective values.
struct Simplex {
    vertices: Vec<Vec<f64>>,
    values: Vec<f64>,
}

impl Simplex {
    /// Axis-aligned simplex with `initial` as its first vertex.
    fn around(initial: &[f64], step: f64, eval: impl Fn(&[f64]) -> f64) -> Self {
        let mut vertices = vec![initial.to_vec()];
        for (axis, &x) in initial.iter().enumerate() {
            let mut vertex = initial.to_vec();
            vertex[axis] += if x.abs() > 1e-10 { step * x.abs() } else { step };
            vertices.push(vertex);
        }
        let values = vertices.iter().map(|v| eval(v)).collect();
        Self { vertices, values }
    }

    /// Indices of the best, second-worst and worst vertices.
    fn rank(&self) -> (usize, usize, usize) {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        let last = order.len() - 1;
        (order[0], order[last - 1], order[last])
    }

    /// Mean of every vertex except `skip`.
    fn centroid_without(&self, skip: usize) -> Vec<f64> {
        let dim = self.vertices[0].len();
        let count = (self.vertices.len() - 1) as f64;
        let mut sum = vec![0.0; dim];
        for vertex in self
            .vertices
            .iter()
            .enumerate()
            .filter_map(|(i, v)| (i != skip).then_some(v))
        {
            for (s, x) in sum.iter_mut().zip(vertex) {
                *s += x;
            }
        }
        sum.into_iter().map(|s| s / count).collect()
    }

    /// Largest distance from `center` to any vertex.
    fn radius(&self, center: &[f64]) -> f64 {
        self.vertices
            .iter()
            .map(|v| {
                v.iter()
                    .zip(center)
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum::<f64>()
                    .sqrt()
            })
            .fold(0.0, f64::max)
    }

    fn replace(&mut self, index: usize, vertex: Vec<f64>, value: f64) {
        self.vertices[index] = vertex;
        self.values[index] = value;
    }

    /// Pull every vertex halfway (or by `factor`) towards vertex `keep`.
    fn shrink_towards(&mut self, keep: usize, factor: f64, eval: impl Fn(&[f64]) -> f64) {
        let anchor = self.vertices[keep].clone();
        for i in (0..self.vertices.len()).filter(|&i| i != keep) {
            self.vertices[i] = lerp(&anchor, &self.vertices[i], factor);
            self.values[i] = eval(&self.vertices[i]);
        }
    }

    fn into_best(self) -> (Vec<f64>, f64) {
        let best = (0..self.values.len())
            .min_by(|&a, &b| self.values[a].total_cmp(&self.values[b]))
            .unwrap_or(0);
        let value = self.values[best];
        (self.vertices.into_iter().nth(best).unwrap_or_default(), value)
    }
}

/// `from + t * (to - from)`; a negative `t` reflects `to` through `from`.
fn lerp(from: &[f64], to: &[f64], t: f64) -> Vec<f64> {
    from.iter().zip(to).map(|(f, x)| f + t * (x - f)).collect()
}

/// Minimize `objective` with the Nelder-Mead simplex method.
///
/// NaN objective values count as `+inf`, so an objective can rule out a
/// region by returning `f64::INFINITY`. The run is fully determined by
/// `initial` and `config`.
///
/// # Example
/// ```
/// use caseload_forecast::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Booth function, minimum at (1, 3)
/// let result = nelder_mead(
///     |x| (x[0] + 2.0 * x[1] - 7.0).powi(2) + (2.0 * x[0] + x[1] - 5.0).powi(2),
///     &[0.0, 0.0],
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.point[0] - 1.0).abs() < 0.01);
/// assert!((result.point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(objective: F, initial: &[f64], config: &NelderMeadConfig) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let eval = |x: &[f64]| match objective(x) {
        v if v.is_nan() => f64::INFINITY,
        v => v,
    };

    if initial.is_empty() {
        return NelderMeadResult {
            point: Vec::new(),
            value: eval(&[]),
            iterations: 0,
            converged: true,
        };
    }

    let mut simplex = Simplex::around(initial, config.initial_step, eval);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;

        let (best, second_worst, worst) = simplex.rank();
        let f_best = simplex.values[best];
        let f_worst = simplex.values[worst];

        if f_best.is_finite() && f_worst - f_best < config.tolerance {
            converged = true;
            break;
        }

        let centroid = simplex.centroid_without(worst);
        if simplex.radius(&centroid) < config.tolerance {
            converged = f_best.is_finite();
            break;
        }

        let reflected = lerp(&centroid, &simplex.vertices[worst], -config.reflection);
        let f_reflected = eval(&reflected);

        if f_reflected < f_best {
            let expanded = lerp(&centroid, &reflected, config.expansion);
            let f_expanded = eval(&expanded);
            if f_expanded < f_reflected {
                simplex.replace(worst, expanded, f_expanded);
            } else {
                simplex.replace(worst, reflected, f_reflected);
            }
            continue;
        }

        if f_reflected < simplex.values[second_worst] {
            simplex.replace(worst, reflected, f_reflected);
            continue;
        }

        let (contracted, accept) = if f_reflected < f_worst {
            // Outside: between centroid and reflected point
            let point = lerp(&centroid, &reflected, config.contraction);
            let value = eval(&point);
            ((point, value), value <= f_reflected)
        } else {
            // Inside: between centroid and worst vertex
            let point = lerp(&centroid, &simplex.vertices[worst], config.contraction);
            let value = eval(&point);
            ((point, value), value < f_worst)
        };
        if accept {
            simplex.replace(worst, contracted.0, contracted.1);
            continue;
        }

        simplex.shrink_towards(best, config.shrink, eval);
    }

    let (point, value) = simplex.into_best();
    NelderMeadResult {
        point,
        value,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rosenbrock(x: &[f64]) -> f64 {
        (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2)
    }

    #[test]
    fn finds_minimum_of_shifted_bowl() {
        let result = nelder_mead(
            |x| (x[0] + 1.5).powi(2) + 2.0 * (x[1] - 0.5).powi(2) + 3.0,
            &[1.0, 1.0],
            &NelderMeadConfig::default(),
        );

        assert!(result.converged);
        assert_relative_eq!(result.point[0], -1.5, epsilon = 1e-3);
        assert_relative_eq!(result.point[1], 0.5, epsilon = 1e-3);
        assert_relative_eq!(result.value, 3.0, epsilon = 1e-6);
    }

    #[test]
    fn walks_the_rosenbrock_valley() {
        let config = NelderMeadConfig {
            max_iter: 5000,
            tolerance: 1e-10,
            ..Default::default()
        };
        let result = nelder_mead(rosenbrock, &[0.0, 0.0], &config);

        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-2);
        assert_relative_eq!(result.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn stays_out_of_infinite_region() {
        // Unconstrained minimum at 2 lies beyond the wall at 1
        let result = nelder_mead(
            |x| {
                if x[0] > 1.0 {
                    f64::INFINITY
                } else {
                    (x[0] - 2.0).powi(2)
                }
            },
            &[0.0],
            &NelderMeadConfig::default(),
        );

        assert!(result.value.is_finite());
        assert!(result.point[0] <= 1.0);
        assert_relative_eq!(result.point[0], 1.0, epsilon = 1e-3);
    }

    #[test]
    fn nan_counts_as_infinite() {
        let result = nelder_mead(
            |x| if x[0] < 0.0 { f64::NAN } else { (x[0] - 0.5).powi(2) },
            &[1.0],
            &NelderMeadConfig::default(),
        );

        assert!(result.value.is_finite());
        assert_relative_eq!(result.point[0], 0.5, epsilon = 1e-3);
    }

    #[test]
    fn small_budget_is_not_converged() {
        let config = NelderMeadConfig {
            max_iter: 3,
            ..Default::default()
        };
        let result = nelder_mead(rosenbrock, &[-1.2, 1.0], &config);

        assert!(!result.converged);
        assert_eq!(result.iterations, 3);
    }

    #[test]
    fn identical_inputs_take_identical_paths() {
        let objective = |x: &[f64]| (x[0] - 0.3).powi(2) + (x[1] + 0.7).powi(4) + x[0] * x[1];
        let a = nelder_mead(objective, &[0.1, 0.1], &NelderMeadConfig::default());
        let b = nelder_mead(objective, &[0.1, 0.1], &NelderMeadConfig::default());

        assert_eq!(a.point, b.point);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn zero_dimensional_problem() {
        let result = nelder_mead(|_| 4.0, &[], &NelderMeadConfig::default());
        assert!(result.converged);
        assert_eq!(result.value, 4.0);
    }
}
