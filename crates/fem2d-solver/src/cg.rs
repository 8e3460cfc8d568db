//! Iterative solution of the compressed global system.

use nalgebra::DVector;
use nalgebra_sparse::CsrMatrix;
use serde::{Deserialize, Serialize};

/// Default minimum residual ratio `m`; the iteration stops once the
/// squared residual falls to `m²` of its initial value.
pub const DEFAULT_RESIDUAL_RATIO: f64 = 1e-3;

/// Out-of-band convergence status of a solve. The solution vector is
/// kept either way; callers observing implausible results should
/// re-solve with better conditioning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolveSummary {
    pub converged: bool,
    pub iterations: usize,
    /// `‖r‖ / ‖b‖` at exit; zero for a zero right-hand side.
    pub residual_ratio: f64,
}

/// Sparse row-vector product `out = A · p`.
fn spmv(matrix: &CsrMatrix<f64>, p: &DVector<f64>, out: &mut DVector<f64>) {
    for (i, row) in matrix.row_iter().enumerate() {
        let mut sum = 0.0;
        for (&j, &value) in row.col_indices().iter().zip(row.values()) {
            sum += value * p[j];
        }
        out[i] = sum;
    }
}

/// Conjugate-gradient style iteration over the compressed rows.
///
/// Starts from `x = 0` with `r = p = b` and caps the iteration count at
/// the system size. The search-direction weight is the ratio of the
/// post-update to the pre-update squared residual.
pub fn conjugate_gradient(
    matrix: &CsrMatrix<f64>,
    b: &DVector<f64>,
    min_residual_ratio: f64,
) -> (DVector<f64>, SolveSummary) {
    let size = b.len();
    let mut x = DVector::zeros(size);
    let mut r = b.clone();
    let mut p = b.clone();
    let mut ap = DVector::zeros(size);

    let rho_initial = r.dot(&r);
    let threshold = min_residual_ratio * min_residual_ratio * rho_initial;
    let mut rho = rho_initial;
    let mut iterations = 0;

    for _ in 0..size {
        if rho <= threshold {
            break;
        }
        spmv(matrix, &p, &mut ap);
        let denominator = p.dot(&ap);
        if denominator == 0.0 {
            // Singular direction; keep the partial solution.
            break;
        }
        let alpha = rho / denominator;
        x.axpy(alpha, &p, 1.0);
        r.axpy(-alpha, &ap, 1.0);
        let rho_next = r.dot(&r);
        let beta = rho_next / rho;
        // p = r + beta * p
        p.axpy(1.0, &r, beta);
        rho = rho_next;
        iterations += 1;
    }

    let summary = SolveSummary {
        converged: rho <= threshold,
        iterations,
        residual_ratio: if rho_initial > 0.0 {
            (rho / rho_initial).sqrt()
        } else {
            0.0
        },
    };
    (x, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// K = [4 -1 0; -1 4 -1; 0 -1 4], symmetric positive definite.
    fn tridiagonal() -> CsrMatrix<f64> {
        let row_offsets = vec![0, 2, 5, 7];
        let col_indices = vec![0, 1, 0, 1, 2, 1, 2];
        let values = vec![4.0, -1.0, -1.0, 4.0, -1.0, -1.0, 4.0];
        CsrMatrix::try_from_csr_data(3, 3, row_offsets, col_indices, values).unwrap()
    }

    #[test]
    fn solves_a_small_spd_system() {
        let matrix = tridiagonal();
        let b = DVector::from_vec(vec![1.0, 2.0, 1.0]);
        let (x, summary) = conjugate_gradient(&matrix, &b, DEFAULT_RESIDUAL_RATIO);

        assert!(summary.converged);
        assert!(summary.iterations <= 3);
        assert!(summary.residual_ratio <= DEFAULT_RESIDUAL_RATIO);

        // Residual check: K·x ≈ b.
        let mut kx = DVector::zeros(3);
        spmv(&matrix, &x, &mut kx);
        for i in 0..3 {
            assert_relative_eq!(kx[i], b[i], max_relative = 1e-2);
        }
    }

    #[test]
    fn force_balance_within_the_residual_budget() {
        let matrix = tridiagonal();
        let b = DVector::from_vec(vec![3.0, -1.0, 2.0]);
        let (x, summary) = conjugate_gradient(&matrix, &b, DEFAULT_RESIDUAL_RATIO);
        assert!(summary.converged);

        let mut kx = DVector::zeros(3);
        spmv(&matrix, &x, &mut kx);
        let residual = (&kx - &b).norm();
        assert!(residual <= DEFAULT_RESIDUAL_RATIO * b.norm());
    }

    #[test]
    fn zero_rhs_converges_immediately() {
        let matrix = tridiagonal();
        let b = DVector::zeros(3);
        let (x, summary) = conjugate_gradient(&matrix, &b, DEFAULT_RESIDUAL_RATIO);

        assert!(summary.converged);
        assert_eq!(summary.iterations, 0);
        assert_relative_eq!(summary.residual_ratio, 0.0);
        assert!(x.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn identity_system_solves_in_one_step() {
        let row_offsets = vec![0, 1, 2];
        let col_indices = vec![0, 1];
        let values = vec![1.0, 1.0];
        let matrix = CsrMatrix::try_from_csr_data(2, 2, row_offsets, col_indices, values).unwrap();
        let b = DVector::from_vec(vec![5.0, -3.0]);

        let (x, summary) = conjugate_gradient(&matrix, &b, DEFAULT_RESIDUAL_RATIO);
        assert!(summary.converged);
        assert_relative_eq!(x[0], 5.0, max_relative = 1e-9);
        assert_relative_eq!(x[1], -3.0, max_relative = 1e-9);
    }
}
