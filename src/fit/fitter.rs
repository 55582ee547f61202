//! Conditional least squares fitting for the SARIMAX model.
//!
//! Given:
//! - a response series `y_t` (weekly cost)
//! - one exogenous regressor `x_t` (weekly km)
//! - fixed orders (`SarimaxOrder`)
//!
//! we minimize the conditional sum of squared innovations
//!
//! ```text
//! SSE(β, φ, θ, Φ, Θ) = Σ_{t ≥ p} ε_t²
//! ```
//!
//! with damped Gauss–Newton (Levenberg) steps. Each step solves the stacked
//! system `[J; √λ·I] δ = [−r; 0]` with the SVD least-squares helper, so
//! coefficients that the sample cannot identify (seasonal lags longer than the
//! series) simply keep their starting value. No stationarity or invertibility
//! constraint is applied.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;
use crate::math::solve_least_squares;
use crate::models::{ArmaPolynomials, SarimaxOrder, SarimaxParams, innovations};

/// Optimizer settings.
#[derive(Debug, Clone)]
pub struct FitOptions {
    pub max_iter: usize,
    /// Relative SSE improvement below which the fit is considered converged.
    pub tol: f64,
    /// Starting damping factor.
    pub lambda0: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 200,
            tol: 1e-10,
            lambda0: 1e-3,
        }
    }
}

/// A fitted model.
#[derive(Debug, Clone)]
pub struct SarimaxFit {
    pub order: SarimaxOrder,
    pub params: SarimaxParams,
    /// Innovations over the full training sample (leading conditioned ones are zero).
    pub innovations: Vec<f64>,
    pub sse: f64,
    /// Innovation variance, `SSE / n_obs`.
    pub sigma2: f64,
    /// Number of innovations in the sum of squares.
    pub n_obs: usize,
    pub iterations: usize,
    pub converged: bool,
}

const LAMBDA_MAX: f64 = 1e12;

/// Fit the model to `response` with regressor `exog`.
pub fn fit_sarimax(
    order: SarimaxOrder,
    response: &[f64],
    exog: &[f64],
    opts: &FitOptions,
) -> Result<SarimaxFit, AppError> {
    validate_inputs(&order, response, exog)?;

    let conditioning = order.p;
    let n_obs = response.len() - conditioning;

    let objective = |v: &[f64]| -> Option<DVector<f64>> {
        let params = SarimaxParams::from_slice(&order, v);
        let polys = ArmaPolynomials::expand(&order, &params);
        let eps = innovations(&polys, params.exog, response, exog, conditioning);
        let r = DVector::from_iterator(n_obs, eps.into_iter().skip(conditioning));
        r.iter().all(|e| e.is_finite()).then_some(r)
    };

    let mut theta = start_values(&order, response, exog).to_vec();
    let mut resid = objective(&theta)
        .ok_or_else(|| AppError::model("Non-finite innovations at the starting values."))?;
    let mut sse = resid.norm_squared();

    let mut lambda = opts.lambda0;
    let mut converged = false;
    let mut iterations = 0;

    while iterations < opts.max_iter {
        iterations += 1;

        let jac = jacobian(&objective, &theta, &resid);
        let gradient = jac.transpose() * &resid;
        if gradient.amax() <= opts.tol * (1.0 + sse) {
            converged = true;
            break;
        }

        // Inner loop: raise damping until the step improves the SSE.
        let mut accepted = None;
        while lambda <= LAMBDA_MAX {
            if let Some(step) = damped_step(&jac, &resid, lambda) {
                let candidate: Vec<f64> = theta.iter().zip(step.iter()).map(|(t, d)| t + d).collect();
                if let Some(r) = objective(&candidate) {
                    let candidate_sse = r.norm_squared();
                    if candidate_sse < sse {
                        accepted = Some((candidate, r, candidate_sse));
                        break;
                    }
                }
            }
            lambda *= 10.0;
        }

        let Some((candidate, r, candidate_sse)) = accepted else {
            // No damping level improves the objective: we are at a (local) minimum.
            converged = true;
            break;
        };

        let improvement = (sse - candidate_sse) / sse.max(f64::MIN_POSITIVE);
        theta = candidate;
        resid = r;
        sse = candidate_sse;
        lambda = (lambda / 10.0).max(1e-12);

        log::debug!("iter {iterations}: sse={sse:.6} lambda={lambda:.1e}");

        if improvement < opts.tol {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "SARIMAX fit did not converge after {} iterations (sse={sse:.4}); using best parameters found.",
            opts.max_iter
        );
    }

    let params = SarimaxParams::from_slice(&order, &theta);
    let polys = ArmaPolynomials::expand(&order, &params);
    let eps = innovations(&polys, params.exog, response, exog, conditioning);

    Ok(SarimaxFit {
        order,
        params,
        innovations: eps,
        sse,
        sigma2: sse / n_obs as f64,
        n_obs,
        iterations,
        converged,
    })
}

fn validate_inputs(order: &SarimaxOrder, response: &[f64], exog: &[f64]) -> Result<(), AppError> {
    if response.len() != exog.len() {
        return Err(AppError::model(format!(
            "Response and regressor lengths differ ({} vs {}).",
            response.len(),
            exog.len()
        )));
    }
    if response.iter().chain(exog).any(|v| !v.is_finite()) {
        return Err(AppError::model("Training data contains non-finite values."));
    }

    let required = order.p + order.param_len() + 1;
    if response.len() < required {
        return Err(AppError::model(format!(
            "Not enough training observations for SARIMAX{}: need at least {required}, got {}.",
            order.label(),
            response.len()
        )));
    }

    let first = response[0];
    if response.iter().all(|&v| (v - first).abs() < 1e-12) {
        return Err(AppError::model("Training response series is constant."));
    }

    Ok(())
}

/// Regression coefficient from OLS of `y` on `x` (no intercept), AR terms from the
/// lag-1 autocorrelation of the regression residuals, everything else zero.
fn start_values(order: &SarimaxOrder, response: &[f64], exog: &[f64]) -> SarimaxParams {
    let mut params = SarimaxParams::zeros(order);

    let a = DMatrix::from_column_slice(exog.len(), 1, exog);
    let b = DVector::from_column_slice(response);
    params.exog = solve_least_squares(&a, &b).map(|x| x[0]).unwrap_or(0.0);

    let u: Vec<f64> = response
        .iter()
        .zip(exog)
        .map(|(&y, &x)| y - params.exog * x)
        .collect();
    let denom: f64 = u.iter().map(|v| v * v).sum();
    if let Some(first) = params.ar.first_mut() {
        if denom > 1e-12 {
            let lag1: f64 = u.windows(2).map(|w| w[0] * w[1]).sum();
            *first = (lag1 / denom).clamp(-0.99, 0.99);
        }
    }

    params
}

/// Central-difference Jacobian of the innovation vector.
///
/// A column whose perturbed evaluation is non-finite is left at zero.
fn jacobian<F>(objective: &F, theta: &[f64], resid: &DVector<f64>) -> DMatrix<f64>
where
    F: Fn(&[f64]) -> Option<DVector<f64>>,
{
    let mut jac = DMatrix::zeros(resid.len(), theta.len());
    let mut probe = theta.to_vec();

    for k in 0..theta.len() {
        let h = 1e-6 * theta[k].abs().max(1.0);

        probe[k] = theta[k] + h;
        let plus = objective(&probe);
        probe[k] = theta[k] - h;
        let minus = objective(&probe);
        probe[k] = theta[k];

        if let (Some(plus), Some(minus)) = (plus, minus) {
            jac.set_column(k, &((plus - minus) / (2.0 * h)));
        }
    }

    jac
}

/// Levenberg step over the parameters the sample can move.
///
/// Parameters with an all-zero Jacobian column get an exact zero step.
fn damped_step(jac: &DMatrix<f64>, resid: &DVector<f64>, lambda: f64) -> Option<DVector<f64>> {
    let (m, n_params) = jac.shape();
    let active: Vec<usize> = (0..n_params)
        .filter(|&c| jac.column(c).iter().any(|&v| v != 0.0))
        .collect();

    let mut step = DVector::zeros(n_params);
    let k = active.len();
    if k == 0 {
        return Some(step);
    }

    let mut a = DMatrix::zeros(m + k, k);
    let damping = lambda.sqrt();
    for (i, &c) in active.iter().enumerate() {
        for r in 0..m {
            a[(r, i)] = jac[(r, c)];
        }
        a[(m + i, i)] = damping;
    }

    let mut b = DVector::zeros(m + k);
    b.rows_mut(0, m).copy_from(&(-resid));

    let reduced = solve_least_squares(&a, &b)?;
    for (i, &c) in active.iter().enumerate() {
        step[c] = reduced[i];
    }
    Some(step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand_distr::{Distribution, Normal};

    fn simulate(n: usize, beta: f64, phi: f64, theta: f64, seed: u64) -> (Vec<f64>, Vec<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let x: Vec<f64> = (0..n).map(|i| if i % 3 == 0 { 0.0 } else { 10.0 + (i % 7) as f64 * 5.0 }).collect();

        let mut y = Vec::with_capacity(n);
        let (mut prev_u, mut prev_e) = (0.0, 0.0);
        for &xi in &x {
            let e = noise.sample(&mut rng);
            let u = phi * prev_u + e + theta * prev_e;
            y.push(beta * xi + u);
            prev_u = u;
            prev_e = e;
        }
        (y, x)
    }

    #[test]
    fn recovers_regression_and_ar_coefficients() {
        let (y, x) = simulate(400, 0.12, 0.6, 0.0, 11);
        let fit = fit_sarimax(SarimaxOrder::WEEKLY, &y, &x, &FitOptions::default()).unwrap();

        assert!((fit.params.exog - 0.12).abs() < 0.02, "beta={}", fit.params.exog);
        assert!((fit.params.ar[0] - 0.6).abs() < 0.15, "phi={}", fit.params.ar[0]);
        assert!(fit.sigma2 > 0.5 && fit.sigma2 < 1.5, "sigma2={}", fit.sigma2);
        assert_eq!(fit.n_obs, 399);
        assert_eq!(fit.innovations.len(), 400);
    }

    #[test]
    fn fit_never_increases_sse_from_start() {
        let (y, x) = simulate(60, 0.5, 0.3, 0.4, 3);
        let order = SarimaxOrder::WEEKLY;
        let start = start_values(&order, &y, &x);
        let polys = ArmaPolynomials::expand(&order, &start);
        let start_sse: f64 = innovations(&polys, start.exog, &y, &x, order.p)
            .iter()
            .map(|e| e * e)
            .sum();

        let fit = fit_sarimax(order, &y, &x, &FitOptions::default()).unwrap();
        assert!(fit.sse <= start_sse + 1e-9);
        assert!(fit.sse.is_finite());
    }

    #[test]
    fn seasonal_terms_stay_at_zero_on_short_series() {
        let (y, x) = simulate(30, 0.12, 0.5, 0.2, 5);
        let fit = fit_sarimax(SarimaxOrder::WEEKLY, &y, &x, &FitOptions::default()).unwrap();
        assert_eq!(fit.params.seasonal_ar, vec![0.0]);
        assert_eq!(fit.params.seasonal_ma, vec![0.0]);
    }

    #[test]
    fn too_short_series_is_rejected() {
        let y = [1.0, 2.0, 3.0];
        let x = [0.0, 1.0, 0.0];
        let err = fit_sarimax(SarimaxOrder::WEEKLY, &y, &x, &FitOptions::default()).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_MODEL);
    }

    #[test]
    fn constant_response_is_rejected() {
        let y = [5.0; 20];
        let x: Vec<f64> = (0..20).map(f64::from).collect();
        assert!(fit_sarimax(SarimaxOrder::WEEKLY, &y, &x, &FitOptions::default()).is_err());
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let y = [1.0; 20];
        let x = [1.0; 19];
        assert!(fit_sarimax(SarimaxOrder::WEEKLY, &y, &x, &FitOptions::default()).is_err());
    }

    #[test]
    fn damped_step_solves_gauss_newton_for_small_lambda() {
        // r(θ) = θ - 2, J = 1: Gauss-Newton step from θ=0 is +2.
        let jac = DMatrix::from_element(1, 1, 1.0);
        let resid = DVector::from_element(1, -2.0);
        let step = damped_step(&jac, &resid, 1e-12).unwrap();
        assert!((step[0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn damped_step_leaves_unidentified_parameters_untouched() {
        // Second column is all zeros: that parameter cannot move.
        let jac = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 2.0, 0.0, -1.0, 0.0]);
        let resid = DVector::from_row_slice(&[0.5, -1.0, 0.25]);
        for lambda in [1e-12, 1e-3, 10.0] {
            let step = damped_step(&jac, &resid, lambda).unwrap();
            assert_eq!(step.len(), 2);
            assert_eq!(step[1], 0.0);
            assert!(step[0].is_finite());
        }

        let zero_jac = DMatrix::zeros(3, 2);
        let step = damped_step(&zero_jac, &resid, 1e-3).unwrap();
        assert_eq!(step, DVector::zeros(2));
    }
}
