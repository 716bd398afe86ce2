//! Small dense linear-algebra helpers for state-space recursions.

/// Solve `A x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` if `A` is not square, sizes disagree, or a pivot is
/// numerically zero.
pub fn solve_linear(a: &[Vec<f64>], b: &[f64]) -> Option<Vec<f64>> {
    let n = b.len();
    if n == 0 || a.len() != n || a.iter().any(|row| row.len() != n) {
        return None;
    }

    // Augmented matrix [A | b]
    let mut m: Vec<Vec<f64>> = a
        .iter()
        .zip(b)
        .map(|(row, &bi)| {
            let mut r = row.clone();
            r.push(bi);
            r
        })
        .collect();

    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot][col].abs() < 1e-12 {
            return None;
        }
        m.swap(col, pivot);

        let pivot_row = m[col].clone();
        for row in m.iter_mut().skip(col + 1) {
            let factor = row[col] / pivot_row[col];
            if factor != 0.0 {
                for k in col..=n {
                    row[k] -= factor * pivot_row[k];
                }
            }
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| m[row][k] * x[k]).sum();
        x[row] = (m[row][n] - tail) / m[row][row];
    }
    Some(x)
}

/// Stationary covariance `P` of `a_{t+1} = T a_t + R e_t` with unit noise
/// variance, i.e. the solution of `P = T P T' + R R'`.
///
/// Solved through the Kronecker form `(I - T ⊗ T) vec(P) = vec(R R')`.
/// Returns `None` when `T` has an eigenvalue on or outside the unit circle
/// to within numerical precision.
pub fn stationary_covariance(t: &[Vec<f64>], r: &[f64]) -> Option<Vec<Vec<f64>>> {
    let k = r.len();
    let k2 = k * k;

    let mut system = vec![vec![0.0; k2]; k2];
    for i in 0..k {
        for j in 0..k {
            let row = i * k + j;
            for a in 0..k {
                for b in 0..k {
                    let col = a * k + b;
                    let identity = if row == col { 1.0 } else { 0.0 };
                    system[row][col] = identity - t[i][a] * t[j][b];
                }
            }
        }
    }
    let rhs: Vec<f64> = (0..k)
        .flat_map(|i| (0..k).map(move |j| r[i] * r[j]))
        .collect();

    let vec_p = solve_linear(&system, &rhs)?;
    Some((0..k).map(|i| vec_p[i * k..(i + 1) * k].to_vec()).collect())
}
