//! Linear least squares solver.
//!
//! Model fitting solves many small linear problems of the form:
//!
//! ```text
//! minimize ‖A x - b‖²
//! ```
//!
//! - the regression start value for the exogenous coefficient (one column)
//! - each damped Gauss–Newton step of the SARIMAX fit (Jacobian stacked on a
//!   scaled identity)
//!
//! We solve via SVD so tall and rank-deficient systems are handled without
//! panicking. Rank deficiency is expected: seasonal coefficients whose lags
//! never reach back into the sample have all-zero Jacobian columns.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if no finite solution is found.
pub fn solve_least_squares(a: &DMatrix<f64>, b: &DVector<f64>) -> Option<DVector<f64>> {
    if a.nrows() != b.len() || a.ncols() == 0 {
        return None;
    }

    let svd = a.clone().svd(true, true);

    // Try progressively looser singular-value cutoffs.
    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(x) = svd.solve(b, tol) {
            if x.iter().all(|v| v.is_finite()) {
                return Some(x);
            }
        }
    }

    None
}
