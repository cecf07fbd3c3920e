use std::f64::consts::PI;

/// Number of independent trials needed to lift a per-trial success
/// probability `p` to `target` for a computational problem: any single
/// success suffices, so `target = 1 - (1 - p)^trials`.
pub fn amplify(target: f64, p: f64) -> f64 {
    if target < p {
        return 1.0;
    }
    if p <= 0.0 {
        return f64::INFINITY;
    }
    // ln_1p keeps the denominator nonzero for per-trial probabilities
    // below the f64 rounding floor of 1 - p.
    ((1.0 - target).ln() / (-p).ln_1p()).ceil()
}

/// Number of samples for a majority vote to decide a distinguishing
/// problem with advantage `advantage` at confidence `target`.
pub fn amplify_majority(target: f64, advantage: f64) -> f64 {
    if advantage <= 0.0 {
        return f64::INFINITY;
    }
    let eps = advantage / 2.0;
    (2.0 * (2.0 / (1.0 - target)).ln() / (eps * eps)).ceil()
}

/// Samples needed to distinguish a mod-q Gaussian of width parameter
/// `sigma` from uniform with confidence `target`. The one-sample
/// advantage is exp(-pi (sigma/q)^2); for wide noise it underflows to
/// zero and the count is infinite.
pub fn amplify_sigma(target: f64, sigma: f64, q: f64) -> f64 {
    let ratio = sigma / q;
    let advantage = (-PI * ratio * ratio).exp();
    amplify_majority(target, advantage)
}

/// Standard deviation to Gaussian width parameter: sigma = stddev * sqrt(2 pi).
pub fn sigmaf(stddev: f64) -> f64 {
    stddev * (2.0 * PI).sqrt()
}
