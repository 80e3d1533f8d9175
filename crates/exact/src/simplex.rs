//! Dense two-phase simplex method for the reachability linear programs.
//!
//! Solves `minimize c·x` subject to rows `a·x <= b` or `a·x >= b` and
//! `x >= 0`. Pivoting follows Bland's rule, so degenerate problems (common
//! here: most right-hand sides are zero) terminate.
//!
//! **Not part of the public API.**

use ndarray::Array2;
use tracing::trace;

use crate::error::ExactError;

/// Tolerance for reduced costs and pivot elements.
const TOL: f64 = 1e-9;

/// Largest phase-one objective still accepted as feasible.
const FEASIBILITY_TOL: f64 = 1e-7;

/// Upper bound on pivots across both phases.
const MAX_PIVOTS: usize = 100_000;

/// Direction of a constraint row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sense {
    /// `a·x <= b`
    Le,
    /// `a·x >= b`
    Ge,
}

/// One constraint row in dense form.
#[derive(Debug, Clone)]
pub(crate) struct Constraint {
    pub(crate) coeffs: Vec<f64>,
    pub(crate) sense: Sense,
    pub(crate) rhs: f64,
}

/// A minimization problem over non-negative variables.
#[derive(Debug, Clone)]
pub(crate) struct LinearProgram {
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

impl LinearProgram {
    /// Creates a problem minimizing `objective · x`.
    pub(crate) fn minimize(objective: Vec<f64>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    /// Adds a constraint row; `coeffs` must have one entry per variable.
    pub(crate) fn add(&mut self, coeffs: Vec<f64>, sense: Sense, rhs: f64) {
        debug_assert_eq!(coeffs.len(), self.objective.len());
        self.constraints.push(Constraint { coeffs, sense, rhs });
    }

    /// Number of constraint rows.
    pub(crate) fn n_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Returns an optimal point.
    ///
    /// # Errors
    ///
    /// [`ExactError::LpInfeasible`], [`ExactError::LpUnbounded`],
    /// [`ExactError::LpPivotLimit`].
    pub(crate) fn solve(&self) -> Result<Vec<f64>, ExactError> {
        let n = self.objective.len();
        let m = self.constraints.len();
        if m == 0 {
            // Only x >= 0: optimal at the origin unless some cost is negative.
            if self.objective.iter().any(|&c| c < 0.0) {
                return Err(ExactError::LpUnbounded);
            }
            return Ok(vec![0.0; n]);
        }

        // Non-negative right-hand sides.
        let rows: Vec<Constraint> = self
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    Constraint {
                        coeffs: c.coeffs.iter().map(|v| -v).collect(),
                        sense: match c.sense {
                            Sense::Le => Sense::Ge,
                            Sense::Ge => Sense::Le,
                        },
                        rhs: -c.rhs,
                    }
                } else {
                    c.clone()
                }
            })
            .collect();

        // Columns: originals | one slack or surplus per row | artificials for >= rows | rhs.
        let n_art = rows.iter().filter(|r| r.sense == Sense::Ge).count();
        let first_art = n + m;
        let rhs_col = first_art + n_art;
        let mut tab = Tableau {
            t: Array2::zeros((m + 1, rhs_col + 1)),
            basis: vec![0; m],
            rhs_col,
            pivots: 0,
        };

        let mut art = first_art;
        for (i, row) in rows.iter().enumerate() {
            for (j, &v) in row.coeffs.iter().enumerate() {
                tab.t[[i, j]] = v;
            }
            tab.t[[i, rhs_col]] = row.rhs;
            match row.sense {
                Sense::Le => {
                    tab.t[[i, n + i]] = 1.0;
                    tab.basis[i] = n + i;
                }
                Sense::Ge => {
                    tab.t[[i, n + i]] = -1.0;
                    tab.t[[i, art]] = 1.0;
                    tab.basis[i] = art;
                    art += 1;
                }
            }
        }

        // Phase one: minimize the sum of artificials.
        if n_art > 0 {
            for j in first_art..rhs_col {
                tab.t[[m, j]] = 1.0;
            }
            for i in 0..m {
                if tab.basis[i] >= first_art {
                    tab.subtract_row_from_objective(i, 1.0);
                }
            }
            tab.run(rhs_col)?;
            let infeasibility = -tab.t[[m, rhs_col]];
            if infeasibility > FEASIBILITY_TOL {
                return Err(ExactError::LpInfeasible);
            }
            // Drive remaining zero-valued artificials out of the basis.
            for i in 0..m {
                if tab.basis[i] < first_art {
                    continue;
                }
                if let Some(j) = (0..first_art).find(|&j| tab.t[[i, j]].abs() > TOL) {
                    tab.pivot(i, j);
                }
            }
        }

        // Phase two: original objective, artificials barred from entering.
        for j in 0..=rhs_col {
            tab.t[[m, j]] = if j < n { self.objective[j] } else { 0.0 };
        }
        for i in 0..m {
            let b = tab.basis[i];
            if b < n && self.objective[b] != 0.0 {
                tab.subtract_row_from_objective(i, self.objective[b]);
            }
        }
        tab.run(first_art)?;
        trace!(pivots = tab.pivots, n, m, "simplex solved");

        let mut x = vec![0.0; n];
        for i in 0..m {
            if tab.basis[i] < n {
                x[tab.basis[i]] = tab.t[[i, rhs_col]];
            }
        }
        Ok(x)
    }
}

/// Simplex tableau; the last row holds reduced costs and minus the objective.
struct Tableau {
    t: Array2<f64>,
    basis: Vec<usize>,
    rhs_col: usize,
    pivots: usize,
}

impl Tableau {
    fn objective_row(&self) -> usize {
        self.basis.len()
    }

    fn subtract_row_from_objective(&mut self, row: usize, factor: f64) {
        let obj = self.objective_row();
        for j in 0..=self.rhs_col {
            let v = self.t[[row, j]];
            self.t[[obj, j]] -= factor * v;
        }
    }

    /// Pivots until no column below `col_limit` has a negative reduced cost.
    fn run(&mut self, col_limit: usize) -> Result<(), ExactError> {
        let obj = self.objective_row();
        loop {
            // Bland: lowest-index improving column.
            let Some(enter) = (0..col_limit).find(|&j| self.t[[obj, j]] < -TOL) else {
                return Ok(());
            };

            // Ratio test; ties broken by lowest basic variable index.
            let mut leave: Option<(usize, f64)> = None;
            for i in 0..obj {
                let a = self.t[[i, enter]];
                if a > TOL {
                    let ratio = self.t[[i, self.rhs_col]] / a;
                    leave = match leave {
                        None => Some((i, ratio)),
                        Some((best, best_ratio)) => {
                            if ratio < best_ratio - TOL
                                || (ratio <= best_ratio + TOL && self.basis[i] < self.basis[best])
                            {
                                Some((i, ratio))
                            } else {
                                Some((best, best_ratio))
                            }
                        }
                    };
                }
            }
            let Some((leave_row, _)) = leave else {
                return Err(ExactError::LpUnbounded);
            };

            self.pivot(leave_row, enter);
            if self.pivots >= MAX_PIVOTS {
                return Err(ExactError::LpPivotLimit {
                    pivots: self.pivots,
                });
            }
        }
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let width = self.rhs_col + 1;
        let p = self.t[[row, col]];
        for j in 0..width {
            self.t[[row, j]] /= p;
        }
        for r in 0..self.t.nrows() {
            if r == row {
                continue;
            }
            let factor = self.t[[r, col]];
            if factor != 0.0 {
                for j in 0..width {
                    let v = self.t[[row, j]];
                    self.t[[r, j]] -= factor * v;
                }
            }
        }
        self.basis[row] = col;
        self.pivots += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn textbook_maximization() {
        // max 3x + 5y  s.t. x <= 4, 2y <= 12, 3x + 2y <= 18  ->  (2, 6)
        let mut lp = LinearProgram::minimize(vec![-3.0, -5.0]);
        lp.add(vec![1.0, 0.0], Sense::Le, 4.0);
        lp.add(vec![0.0, 2.0], Sense::Le, 12.0);
        lp.add(vec![3.0, 2.0], Sense::Le, 18.0);
        let x = lp.solve().unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 6.0, epsilon = 1e-9);
    }

    #[test]
    fn greater_equal_rows_need_phase_one() {
        // min x + y  s.t. x + 2y >= 4, 3x + y >= 6  ->  (1.6, 1.2)
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        lp.add(vec![1.0, 2.0], Sense::Ge, 4.0);
        lp.add(vec![3.0, 1.0], Sense::Ge, 6.0);
        let x = lp.solve().unwrap();
        assert_abs_diff_eq!(x[0], 1.6, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 1.2, epsilon = 1e-9);
    }

    #[test]
    fn negative_rhs_is_flipped() {
        // -x <= -2 is x >= 2
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.add(vec![-1.0], Sense::Le, -2.0);
        let x = lp.solve().unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn infeasible_detected() {
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.add(vec![1.0], Sense::Ge, 2.0);
        lp.add(vec![1.0], Sense::Le, 1.0);
        assert!(matches!(lp.solve(), Err(ExactError::LpInfeasible)));
    }

    #[test]
    fn unbounded_detected() {
        let mut lp = LinearProgram::minimize(vec![-1.0]);
        lp.add(vec![1.0], Sense::Ge, 1.0);
        assert!(matches!(lp.solve(), Err(ExactError::LpUnbounded)));
    }

    #[test]
    fn degenerate_zero_rhs() {
        // min x + y  s.t. x - y >= 0, y - x >= 0, x <= 1  ->  (0, 0)
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        lp.add(vec![1.0, -1.0], Sense::Ge, 0.0);
        lp.add(vec![-1.0, 1.0], Sense::Ge, 0.0);
        lp.add(vec![1.0, 0.0], Sense::Le, 1.0);
        assert_eq!(lp.n_constraints(), 3);
        let x = lp.solve().unwrap();
        assert_abs_diff_eq!(x[0], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(x[1], 0.0, epsilon = 1e-9);
    }
}
