//! Dense linear-system solve for the small systems built from a model.
//!
//! **Not part of the public API.**

use ndarray::{Array1, Array2};

/// Relative pivot magnitude below which the matrix is treated as singular.
const PIVOT_TOL: f64 = 1e-12;

/// Solves `a * x = b` by Gaussian elimination with partial pivoting.
///
/// Returns `None` when `a` is (numerically) singular or the solution is not
/// finite. An empty system yields an empty solution.
pub(crate) fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    debug_assert_eq!(a.dim(), (n, n));
    if n == 0 {
        return Some(b);
    }

    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs())).max(1.0);

    for col in 0..n {
        // Partial pivoting: largest magnitude in this column at or below the diagonal.
        let (pivot_row, pivot_abs) = (col..n)
            .map(|r| (r, a[[r, col]].abs()))
            .fold((col, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });
        if pivot_abs < PIVOT_TOL * scale {
            return None;
        }
        if pivot_row != col {
            for k in 0..n {
                a.swap([col, k], [pivot_row, k]);
            }
            b.swap(col, pivot_row);
        }

        let pivot = a[[col, col]];
        for r in (col + 1)..n {
            let factor = a[[r, col]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[r, k]] -= factor * a[[col, k]];
            }
            b[r] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = Array1::<f64>::zeros(n);
    for r in (0..n).rev() {
        let mut acc = b[r];
        for k in (r + 1)..n {
            acc -= a[[r, k]] * x[k];
        }
        x[r] = acc / a[[r, r]];
    }

    x.iter().all(|v| v.is_finite()).then_some(x)
}

/// Returns `I - scale * m` for a square matrix.
pub(crate) fn identity_minus(m: &Array2<f64>, scale: f64) -> Array2<f64> {
    let n = m.nrows();
    let mut out = m.mapv(|v| -scale * v);
    for i in 0..n {
        out[[i, i]] += 1.0;
    }
    out
}
