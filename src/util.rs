//! Small numeric helpers shared by the distribution and parameter math.

use std::f64::consts::PI;

/// Natural log of n! via exact accumulation for small n, Stirling above.
pub fn ln_factorial(n: f64) -> f64 {
    if n < 0.0 {
        return f64::NAN;
    }
    if n < 2.0 {
        return 0.0;
    }
    if n < 64.0 {
        let mut acc = 0.0;
        let mut i = 2.0;
        while i <= n {
            acc += i.ln();
            i += 1.0;
        }
        return acc;
    }
    // Stirling series, first correction term. Error < 1e-8 for n >= 64.
    n * n.ln() - n + 0.5 * (2.0 * PI * n).ln() + 1.0 / (12.0 * n)
}

/// Natural log of the binomial coefficient C(n, k).
pub fn ln_binomial(n: f64, k: f64) -> f64 {
    if k < 0.0 || k > n {
        return f64::NEG_INFINITY;
    }
    if k == 0.0 || k == n {
        return 0.0;
    }
    ln_factorial(n) - ln_factorial(k) - ln_factorial(n - k)
}

/// C(n, k) as a float; overflows to infinity for astronomically large counts.
pub fn binomial(n: f64, k: f64) -> f64 {
    ln_binomial(n, k).exp()
}

/// Base-2 log of C(n, k).
pub fn log2_binomial(n: f64, k: f64) -> f64 {
    ln_binomial(n, k) / std::f64::consts::LN_2
}

/// Gauss error function, Abramowitz & Stegun 7.1.26. Max absolute error
/// 1.5e-7, which is far below the precision of any cost formula using it.
pub fn erf(x: f64) -> f64 {
    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + 0.3275911 * x);
    let poly = t
        * (0.254829592
            + t * (-0.284496736 + t * (1.421413741 + t * (-1.453152027 + t * 1.061405429))));
    sign * (1.0 - poly * (-x * x).exp())
}
