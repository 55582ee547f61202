//! Standard normal quantile function.
//!
//! Used to turn a confidence level into the `z` multiplier of a forecast
//! interval. Implements Acklam's rational approximation (relative error below
//! `1.2e-9` over the whole open interval), which is plenty for interval bounds.

const A: [f64; 6] = [
    -3.969683028665376e+01,
    2.209460984245205e+02,
    -2.759285104469687e+02,
    1.383577518672690e+02,
    -3.066479806614716e+01,
    2.506628277459239e+00,
];
const B: [f64; 5] = [
    -5.447609879822406e+01,
    1.615858368580409e+02,
    -1.556989798598866e+02,
    6.680131188771972e+01,
    -1.328068155288572e+01,
];
const C: [f64; 6] = [
    -7.784894002430293e-03,
    -3.223964580411365e-01,
    -2.400758277161838e+00,
    -2.549732539343734e+00,
    4.374664141464968e+00,
    2.938163982698783e+00,
];
const D: [f64; 4] = [
    7.784695709041462e-03,
    3.224671290700398e-01,
    2.445134137142996e+00,
    3.754408661907416e+00,
];

const P_LOW: f64 = 0.02425;

/// Inverse CDF of the standard normal distribution.
///
/// Returns `None` unless `0 < p < 1`.
pub fn normal_quantile(p: f64) -> Option<f64> {
    if !(p > 0.0 && p < 1.0) {
        return None;
    }

    let z = if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    };

    Some(z)
}

/// Two-sided interval multiplier for a confidence level in `(0, 1)`.
///
/// `0.8` gives `z ≈ 1.2816`, `0.95` gives `z ≈ 1.96`.
pub fn two_sided_z(confidence: f64) -> Option<f64> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return None;
    }
    normal_quantile(1.0 - (1.0 - confidence) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn known_quantiles() {
        assert_relative_eq!(normal_quantile(0.5).unwrap(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(normal_quantile(0.9).unwrap(), 1.2815515655446004, epsilon = 1e-8);
        assert_relative_eq!(normal_quantile(0.975).unwrap(), 1.959963984540054, epsilon = 1e-8);
        assert_relative_eq!(normal_quantile(0.01).unwrap(), -2.3263478740408408, epsilon = 1e-8);
        assert_relative_eq!(normal_quantile(0.999).unwrap(), 3.090232306167813, epsilon = 1e-7);
    }

    #[test]
    fn quantile_is_odd_around_half() {
        for &p in &[0.001, 0.02, 0.1, 0.3, 0.45] {
            let lo = normal_quantile(p).unwrap();
            let hi = normal_quantile(1.0 - p).unwrap();
            assert_relative_eq!(lo, -hi, epsilon = 1e-8);
        }
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(normal_quantile(0.0).is_none());
        assert!(normal_quantile(1.0).is_none());
        assert!(normal_quantile(f64::NAN).is_none());
        assert!(two_sided_z(1.5).is_none());
    }

    #[test]
    fn eighty_percent_interval() {
        assert_relative_eq!(two_sided_z(0.8).unwrap(), 1.2815515655446004, epsilon = 1e-8);
    }
}
