//! Seasonal ARMA with one exogenous regressor (SARIMAX with zero differencing).
//!
//! ```text
//! y_t = β · x_t + u_t
//! φ(L) Φ(L^s) u_t = θ(L) Θ(L^s) ε_t
//! ```
//!
//! with `φ(L) = 1 − φ₁L − …`, `Φ(L^s) = 1 − Φ₁L^s − …`, `θ(L) = 1 + θ₁L + …`,
//! `Θ(L^s) = 1 + Θ₁L^s + …`. There is no trend/intercept term.
//!
//! Everything here is a pure function of the parameters; fitting lives in
//! `crate::fit`. The lag polynomials are multiplied out once
//! (`ArmaPolynomials`) and the recursions below work on the expanded
//! coefficients, so any (p, q, P, Q, s) combination is supported.

use serde::{Deserialize, Serialize};

/// Model orders. Differencing orders are fixed at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SarimaxOrder {
    pub p: usize,
    pub q: usize,
    pub seasonal_p: usize,
    pub seasonal_q: usize,
    /// Seasonal period in observations.
    pub period: usize,
}

impl SarimaxOrder {
    /// (1,0,1)x(1,0,1,52): the weekly configuration used by the pipeline.
    pub const WEEKLY: Self = Self {
        p: 1,
        q: 1,
        seasonal_p: 1,
        seasonal_q: 1,
        period: 52,
    };

    /// Number of estimated coefficients: exog + AR + MA + seasonal AR + seasonal MA.
    pub fn param_len(&self) -> usize {
        1 + self.p + self.q + self.seasonal_p + self.seasonal_q
    }

    /// Compact notation, e.g. `(1,0,1)x(1,0,1,52)`.
    pub fn label(&self) -> String {
        format!(
            "({},0,{})x({},0,{},{})",
            self.p, self.q, self.seasonal_p, self.seasonal_q, self.period
        )
    }
}

/// Model coefficients in the same order as the optimizer's parameter vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaxParams {
    /// Coefficient on weekly km.
    #[serde(rename = "exog_km")]
    pub exog: f64,
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaxParams {
    pub fn zeros(order: &SarimaxOrder) -> Self {
        Self {
            exog: 0.0,
            ar: vec![0.0; order.p],
            ma: vec![0.0; order.q],
            seasonal_ar: vec![0.0; order.seasonal_p],
            seasonal_ma: vec![0.0; order.seasonal_q],
        }
    }

    /// Unpack `[β, φ…, θ…, Φ…, Θ…]`.
    ///
    /// # Panics
    /// Panics if `v.len() != order.param_len()`.
    pub fn from_slice(order: &SarimaxOrder, v: &[f64]) -> Self {
        assert_eq!(v.len(), order.param_len(), "parameter vector length mismatch");
        let mut rest = &v[1..];
        let mut take = |k: usize| {
            let (head, tail) = rest.split_at(k);
            rest = tail;
            head.to_vec()
        };
        let ar = take(order.p);
        let ma = take(order.q);
        let seasonal_ar = take(order.seasonal_p);
        let seasonal_ma = take(order.seasonal_q);
        Self {
            exog: v[0],
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        }
    }

    pub fn to_vec(&self) -> Vec<f64> {
        let len = 1 + self.ar.len() + self.ma.len() + self.seasonal_ar.len() + self.seasonal_ma.len();
        let mut v = Vec::with_capacity(len);
        v.push(self.exog);
        v.extend_from_slice(&self.ar);
        v.extend_from_slice(&self.ma);
        v.extend_from_slice(&self.seasonal_ar);
        v.extend_from_slice(&self.seasonal_ma);
        v
    }
}

/// Expanded lag coefficients.
///
/// `ar[i]` multiplies `u_{t-i}` and `ma[j]` multiplies `ε_{t-j}` on the right-hand
/// side of `u_t = Σ ar[i]·u_{t-i} + Σ ma[j]·ε_{t-j} + ε_t`. Index 0 is unused (0.0).
#[derive(Debug, Clone, PartialEq)]
pub struct ArmaPolynomials {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
}

impl ArmaPolynomials {
    pub fn expand(order: &SarimaxOrder, params: &SarimaxParams) -> Self {
        let s = order.period;

        // φ(L) and Φ(L^s) in "1 − …" form; the product's tail is negated.
        let nonseasonal_ar = lag_polynomial(&params.ar, 1, -1.0);
        let seasonal_ar = lag_polynomial(&params.seasonal_ar, s, -1.0);
        let mut ar = poly_mul(&nonseasonal_ar, &seasonal_ar);
        ar[0] = 0.0;
        ar.iter_mut().skip(1).for_each(|c| *c = -*c);

        // θ(L) and Θ(L^s) in "1 + …" form.
        let nonseasonal_ma = lag_polynomial(&params.ma, 1, 1.0);
        let seasonal_ma = lag_polynomial(&params.seasonal_ma, s, 1.0);
        let mut ma = poly_mul(&nonseasonal_ma, &seasonal_ma);
        ma[0] = 0.0;

        Self { ar, ma }
    }

    /// MA(∞) weights `ψ_0 … ψ_{n-1}` (with `ψ_0 = 1`).
    ///
    /// The h-step forecast error variance is `σ² · Σ_{j<h} ψ_j²`.
    pub fn psi_weights(&self, n: usize) -> Vec<f64> {
        let mut psi = Vec::with_capacity(n);
        for j in 0..n {
            if j == 0 {
                psi.push(1.0);
                continue;
            }
            let mut v = self.ma.get(j).copied().unwrap_or(0.0);
            for i in 1..self.ar.len().min(j + 1) {
                v += self.ar[i] * psi[j - i];
            }
            psi.push(v);
        }
        psi
    }
}

/// `1 + sign·(c₁L^step + c₂L^{2·step} + …)` as a dense coefficient vector.
fn lag_polynomial(coeffs: &[f64], step: usize, sign: f64) -> Vec<f64> {
    let mut poly = vec![0.0; coeffs.len() * step + 1];
    poly[0] = 1.0;
    for (k, &c) in coeffs.iter().enumerate() {
        poly[(k + 1) * step] = sign * c;
    }
    poly
}

fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0.0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// One-step-ahead innovations `ε_t` for the whole sample.
///
/// The first `conditioning` innovations are fixed at zero (the sum of squares
/// is conditioned on those observations) and pre-sample values are zero.
pub fn innovations(
    polys: &ArmaPolynomials,
    exog_coef: f64,
    response: &[f64],
    exog: &[f64],
    conditioning: usize,
) -> Vec<f64> {
    let u: Vec<f64> = response
        .iter()
        .zip(exog)
        .map(|(&y, &x)| y - exog_coef * x)
        .collect();

    let mut eps = vec![0.0; u.len()];
    for t in conditioning..u.len() {
        let predicted = arma_prediction(polys, &u, &eps, t);
        eps[t] = u[t] - predicted;
    }
    eps
}

/// Conditional expectation of `u_t` given `u` and `ε` before `t`.
fn arma_prediction(polys: &ArmaPolynomials, u: &[f64], eps: &[f64], t: usize) -> f64 {
    let ar: f64 = polys
        .ar
        .iter()
        .enumerate()
        .skip(1)
        .take_while(|(i, _)| *i <= t)
        .map(|(i, &a)| a * u[t - i])
        .sum();
    let ma: f64 = polys
        .ma
        .iter()
        .enumerate()
        .skip(1)
        .take_while(|(j, _)| *j <= t)
        .map(|(j, &b)| b * eps[t - j])
        .sum();
    ar + ma
}

/// Point forecasts for `future_exog.len()` steps past the end of the sample.
///
/// `innovations` must come from [`innovations`] on the same sample. Future
/// innovations are set to zero.
pub fn forecast_mean(
    polys: &ArmaPolynomials,
    exog_coef: f64,
    response: &[f64],
    exog: &[f64],
    innovations: &[f64],
    future_exog: &[f64],
) -> Vec<f64> {
    let n = response.len();
    let mut u: Vec<f64> = response
        .iter()
        .zip(exog)
        .map(|(&y, &x)| y - exog_coef * x)
        .collect();
    let mut eps = innovations.to_vec();

    let mut out = Vec::with_capacity(future_exog.len());
    for (h, &x) in future_exog.iter().enumerate() {
        let t = n + h;
        let u_hat = arma_prediction(polys, &u, &eps, t);
        u.push(u_hat);
        eps.push(0.0);
        out.push(exog_coef * x + u_hat);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(exog: f64, ar: f64, ma: f64, sar: f64, sma: f64) -> SarimaxParams {
        SarimaxParams {
            exog,
            ar: vec![ar],
            ma: vec![ma],
            seasonal_ar: vec![sar],
            seasonal_ma: vec![sma],
        }
    }

    #[test]
    fn weekly_order_label_and_len() {
        assert_eq!(SarimaxOrder::WEEKLY.label(), "(1,0,1)x(1,0,1,52)");
        assert_eq!(SarimaxOrder::WEEKLY.param_len(), 5);
    }

    #[test]
    fn param_vector_roundtrip_order() {
        let order = SarimaxOrder::WEEKLY;
        let p = SarimaxParams::from_slice(&order, &[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(p, params(0.1, 0.2, 0.3, 0.4, 0.5));
        assert_eq!(p.to_vec(), vec![0.1, 0.2, 0.3, 0.4, 0.5]);
    }

    #[test]
    fn expanded_polynomials_cross_terms() {
        let order = SarimaxOrder { period: 4, ..SarimaxOrder::WEEKLY };
        let polys = ArmaPolynomials::expand(&order, &params(0.0, 0.5, 0.3, 0.2, 0.1));

        // (1 − 0.5L)(1 − 0.2L⁴) = 1 − 0.5L − 0.2L⁴ + 0.1L⁵
        assert_eq!(polys.ar.len(), 6);
        assert!((polys.ar[1] - 0.5).abs() < 1e-12);
        assert!((polys.ar[4] - 0.2).abs() < 1e-12);
        assert!((polys.ar[5] + 0.1).abs() < 1e-12);
        assert_eq!(polys.ar[2], 0.0);

        // (1 + 0.3L)(1 + 0.1L⁴) = 1 + 0.3L + 0.1L⁴ + 0.03L⁵
        assert!((polys.ma[1] - 0.3).abs() < 1e-12);
        assert!((polys.ma[4] - 0.1).abs() < 1e-12);
        assert!((polys.ma[5] - 0.03).abs() < 1e-12);
    }

    #[test]
    fn psi_weights_of_ar1_are_powers() {
        let order = SarimaxOrder {
            p: 1,
            q: 0,
            seasonal_p: 0,
            seasonal_q: 0,
            period: 52,
        };
        let p = SarimaxParams {
            exog: 0.0,
            ar: vec![0.5],
            ma: vec![],
            seasonal_ar: vec![],
            seasonal_ma: vec![],
        };
        let psi = ArmaPolynomials::expand(&order, &p).psi_weights(5);
        assert_eq!(psi, vec![1.0, 0.5, 0.25, 0.125, 0.0625]);
    }

    #[test]
    fn psi_weights_of_arma11() {
        // ψ_1 = φ + θ, ψ_j = φ ψ_{j-1}
        let polys = ArmaPolynomials::expand(&SarimaxOrder::WEEKLY, &params(0.0, 0.6, 0.2, 0.0, 0.0));
        let psi = polys.psi_weights(4);
        assert!((psi[1] - 0.8).abs() < 1e-12);
        assert!((psi[2] - 0.48).abs() < 1e-12);
        assert!((psi[3] - 0.288).abs() < 1e-12);
    }

    #[test]
    fn innovations_recover_white_noise() {
        // Simulate u_t = 0.5 u_{t-1} + e_t + 0.3 e_{t-1} with known shocks.
        let shocks = [1.0, -0.5, 0.25, 2.0, -1.0, 0.5, 0.0, 1.5];
        let (phi, theta, beta) = (0.5, 0.3, 0.1);
        let x: Vec<f64> = (0..shocks.len()).map(|i| 100.0 * i as f64).collect();
        let mut u = vec![0.0; shocks.len()];
        for t in 0..shocks.len() {
            let prev_u = if t > 0 { u[t - 1] } else { 0.0 };
            let prev_e = if t > 0 { shocks[t - 1] } else { 0.0 };
            u[t] = phi * prev_u + shocks[t] + theta * prev_e;
        }
        let y: Vec<f64> = u.iter().zip(&x).map(|(u, x)| u + beta * x).collect();

        let polys = ArmaPolynomials::expand(&SarimaxOrder::WEEKLY, &params(beta, phi, theta, 0.0, 0.0));
        let eps = innovations(&polys, beta, &y, &x, 0);
        for (e, s) in eps.iter().zip(shocks) {
            assert!((e - s).abs() < 1e-9, "{e} vs {s}");
        }
    }

    #[test]
    fn conditioning_zeroes_leading_innovations() {
        let polys = ArmaPolynomials::expand(&SarimaxOrder::WEEKLY, &params(0.0, 0.9, 0.0, 0.0, 0.0));
        let y = [10.0, 11.0, 12.0];
        let eps = innovations(&polys, 0.0, &y, &[0.0; 3], 1);
        assert_eq!(eps[0], 0.0);
        assert!((eps[1] - (11.0 - 9.0)).abs() < 1e-12);
    }

    #[test]
    fn forecast_uses_future_exog_and_decays() {
        let polys = ArmaPolynomials::expand(&SarimaxOrder::WEEKLY, &params(2.0, 0.5, 0.0, 0.0, 0.0));
        let y = [4.0, 6.0];
        let x = [1.0, 1.0];
        let eps = innovations(&polys, 2.0, &y, &x, 1);

        // u = [2, 4]; û = 2, 1; means = 2·x + û.
        let f = forecast_mean(&polys, 2.0, &y, &x, &eps, &[3.0, 0.0]);
        assert!((f[0] - 8.0).abs() < 1e-12);
        assert!((f[1] - 1.0).abs() < 1e-12);
    }
}
