//! Student's t distribution for parameter significance tests.
//!
//! The CDF goes through the regularized incomplete beta function, evaluated
//! with the continued fraction from Numerical Recipes (modified Lentz).

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

const CF_MAX_ITERATIONS: usize = 300;
const CF_EPSILON: f64 = 3.0e-16;
const CF_TINY: f64 = 1.0e-300;

/// Natural logarithm of the gamma function for `x > 0`.
#[must_use]
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // reflection
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut sum = LANCZOS_COEFFS[0];
    for (i, c) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }
    let t = x + LANCZOS_G + 0.5;
    0.5 * std::f64::consts::TAU.ln() + (x + 0.5) * t.ln() - t + sum.ln()
}

/// Regularized incomplete beta function `I_x(a, b)`.
#[must_use]
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_front = ln_gamma(a + b) - ln_gamma(a) - ln_gamma(b) + a * x.ln() + b * (1.0 - x).ln();
    let front = ln_front.exp();

    // The continued fraction converges fast on this side of the mean.
    if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_continued_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_continued_fraction(1.0 - x, b, a) / b
    }
}

fn beta_continued_fraction(x: f64, a: f64, b: f64) -> f64 {
    let guard = |v: f64| if v.abs() < CF_TINY { CF_TINY } else { v };

    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 / guard(1.0 - qab * x / qap);
    let mut h = d;

    for m in 1..=CF_MAX_ITERATIONS {
        let m = m as f64;
        let m2 = 2.0 * m;

        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        h *= d * c;

        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = 1.0 / guard(1.0 + aa * d);
        c = guard(1.0 + aa / c);
        let delta = d * c;
        h *= delta;

        if (delta - 1.0).abs() < CF_EPSILON {
            break;
        }
    }
    h
}

/// CDF of Student's t distribution with `dof` degrees of freedom.
///
/// # Example
///
/// ```
/// use marker_merge::stats::distribution::student_t_cdf;
///
/// assert!((student_t_cdf(0.0, 5.0) - 0.5).abs() < 1e-12);
/// // one degree of freedom is the Cauchy distribution
/// assert!((student_t_cdf(1.0, 1.0) - 0.75).abs() < 1e-10);
/// ```
#[must_use]
pub fn student_t_cdf(t: f64, dof: f64) -> f64 {
    if t.is_nan() || dof.is_nan() || dof <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }
    let x = dof / (dof + t * t);
    let tail = 0.5 * regularized_incomplete_beta(x, dof / 2.0, 0.5);
    if t > 0.0 { 1.0 - tail } else { tail }
}

/// Two-sided p-value of a t statistic: `2 · (1 − CDF(|t|))`.
#[must_use]
pub fn two_sided_p_value(t: f64, dof: f64) -> f64 {
    if t.is_nan() || dof.is_nan() || dof <= 0.0 {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    // Same as 2·(1 − CDF(|t|)) without the cancellation for large |t|.
    regularized_incomplete_beta(dof / (dof + t * t), dof / 2.0, 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ln_gamma_factorials() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_incomplete_beta_edges_and_symmetry() {
        assert_eq!(regularized_incomplete_beta(0.0, 2.0, 3.0), 0.0);
        assert_eq!(regularized_incomplete_beta(1.0, 2.0, 3.0), 1.0);
        // I_x(1, 1) = x
        assert!((regularized_incomplete_beta(0.3, 1.0, 1.0) - 0.3).abs() < 1e-12);
        // I_x(a, b) = 1 - I_{1-x}(b, a)
        let lhs = regularized_incomplete_beta(0.2, 2.5, 4.0);
        let rhs = 1.0 - regularized_incomplete_beta(0.8, 4.0, 2.5);
        assert!((lhs - rhs).abs() < 1e-12);
    }

    #[test]
    fn test_student_t_closed_form_two_dof() {
        // F(t) = 1/2 + t / (2 sqrt(2 + t^2)) for two degrees of freedom
        for t in [-3.0_f64, -0.5, 0.7, 2.0, 10.0] {
            let expected = 0.5 + t / (2.0 * (2.0 + t * t).sqrt());
            assert!((student_t_cdf(t, 2.0) - expected).abs() < 1e-10, "t = {t}");
        }
    }

    #[test]
    fn test_two_sided_critical_values() {
        // 97.5% quantiles from standard tables
        assert!((two_sided_p_value(2.228_139, 10.0) - 0.05).abs() < 1e-5);
        assert!((two_sided_p_value(12.706_205, 1.0) - 0.05).abs() < 1e-5);
        assert!((two_sided_p_value(-2.228_139, 10.0) - 0.05).abs() < 1e-5);
        assert!((two_sided_p_value(0.0, 10.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_large_t_keeps_precision() {
        let p = two_sided_p_value(50.0, 15.0);
        assert!(p > 0.0 && p < 1e-15);
        assert!(student_t_cdf(1.0, 0.0).is_nan());
    }
}
