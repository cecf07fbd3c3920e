//! Meet-in-the-middle attack.

use std::f64::consts::LOG2_E;

use tracing::debug;

use crate::config::EstimateOpts;
use crate::cost::Cost;
use crate::error::{LfResult, LweForgeError};
use crate::estimates::MitmOpt;
use crate::nd::{gaussian_tail_prob, NoiseDistribution};
use crate::params::LweParameters;
use crate::prob::amplify;
use crate::search::{Eval, LocalMinimum};
use crate::util::{binomial, ln_binomial};

const TAG: &str = "mitm";

/// Relative width of the sample-count window refined around the analytical
/// starting point.
const LOCALITY: f64 = 0.05;

/// Per-coordinate range of a distribution together with the probability
/// mass that range covers. Gaussians are truncated at the tail bound and
/// the lost mass is charged to the success probability.
fn x_range(nd: &NoiseDistribution) -> (f64, f64) {
    if nd.is_bounded() {
        (nd.span(), 1.0)
    } else {
        let rng = nd.support_size(1, 0.0).unwrap_or(f64::INFINITY);
        (rng, gaussian_tail_prob())
    }
}

fn local_range(center: f64) -> (i64, i64) {
    (
        ((1.0 - LOCALITY) * center).floor() as i64,
        ((1.0 + LOCALITY) * center).ceil() as i64,
    )
}

/// Fraction of secrets whose hamming weight splits across the two halves
/// exactly as assumed; a mismatch is recovered by re-randomizing, which the
/// repeat factor accounts for.
fn split_probability(n: f64, k: f64, h: f64, split_h: f64) -> f64 {
    (ln_binomial(k, split_h) + ln_binomial(n - k, h - split_h) - ln_binomial(n, h)).exp()
}

fn analytical(params: &LweParameters, success_probability: f64) -> LfResult<Cost> {
    let (nd_rng, nd_p) = x_range(&params.xe);
    let delta = nd_rng / params.q as f64;
    let (sd_rng, sd_p) = x_range(&params.xs);

    let n = f64::from(params.n);
    let k = (n / (2.0 - delta)).round();

    let (success_probability_, log_t) = if params.xs.is_sparse() {
        let h = params.xs.hamming_weight(params.n);
        let split_h = (h * k / n).round();
        let mut log_t = h * (n.log2() - h.log2() + (sd_rng - 1.0).log2() + LOG2_E) / (2.0 - delta);
        log_t -= h.log2() / 2.0;
        log_t -= h * h * LOG2_E / (2.0 * n * (2.0 - delta) * (2.0 - delta));
        (split_probability(n, k, h, split_h), log_t)
    } else {
        (1.0, k * sd_rng.log2())
    };

    let m = (log_t + log_t.log2()).round().max(1.0);
    if params.m < m {
        return Err(LweForgeError::InsufficientSamples { required: m });
    }

    // m = logT + log logT and rop = T*m, so rop = 2^m
    let ret = Cost {
        rop: 2f64.powf(m),
        mem: 2f64.powf(log_t) * m,
        m,
        k: k as u32,
        tag: TAG.into(),
        ..Default::default()
    };
    let repeat = amplify(
        success_probability,
        sd_p.powf(n) * nd_p.powf(m) * success_probability_,
    );
    Ok(ret.repeat(repeat))
}

/// Cost at a fixed splitting dimension `k`, with the sample count optimized
/// numerically in a window around its analytical starting point.
fn cost(params: &LweParameters, k: i64, success_probability: f64) -> LfResult<Cost> {
    let (nd_rng, nd_p) = x_range(&params.xe);
    let delta = nd_rng / params.q as f64;
    let (sd_rng, sd_p) = x_range(&params.xs);

    let n = f64::from(params.n);
    let kf = k as f64;

    let (size_tab, size_sea, success_probability_) = if params.xs.is_sparse() {
        let h = params.xs.hamming_weight(params.n);
        // assume the weight splits evenly over the halves; re-randomize
        // and retry otherwise
        let split_h = (h * kf / n).round();
        let size_tab = (sd_rng - 1.0).powf(split_h) * binomial(kf, split_h);
        let size_sea = (sd_rng - 1.0).powf(h - split_h) * binomial(n - kf, h - split_h);
        (size_tab, size_sea, split_probability(n, kf, h, split_h))
    } else {
        (sd_rng.powf(kf), sd_rng.powf(n - kf), 1.0)
    };

    // starting point approximately minimizing the per-query search cost
    let m0 = (size_tab.log2() + size_tab.log2().log2()).max(1.0).ceil();
    if !m0.is_finite() {
        return Ok(Cost {
            rop: f64::INFINITY,
            mem: f64::INFINITY,
            m: 0.0,
            k: k as u32,
            tag: TAG.into(),
            ..Default::default()
        });
    }
    let (a, b) = local_range(m0);

    let mut search =
        LocalMinimum::with_comparator(a, b, |x: &(i64, f64), best: &(i64, f64)| x.1 <= best.1)?;
    while let Some(m) = search.next_candidate() {
        let mf = m as f64;
        // per search entry: 2^(delta*m) table lookups plus an l_oo check
        // costing m for each of the size_tab/2^m expected hits
        let lookups = 2f64.powf(delta * mf) * (1.0 + size_tab * mf / 2f64.powf(mf));
        search.update(Eval::Feasible((m, size_sea * (2.0 * mf + lookups))));
    }
    let (m, search_cost) = search
        .into_best()
        .and_then(|(_, y)| y.feasible())
        .ok_or(LweForgeError::SearchRange { start: a, stop: b })?;

    let m = (m as f64).min(params.m);

    // building the table costs 2*T*m via the recursion of [ia.cr/2021/152]
    let cost_table = size_tab * 2.0 * m;

    let ret = Cost {
        rop: cost_table + search_cost,
        mem: size_tab * (kf + m) + size_sea * (n - kf + m),
        m,
        k: k as u32,
        tag: TAG.into(),
        ..Default::default()
    };
    let repeat = amplify(
        success_probability,
        sd_p.powf(n) * nd_p.powf(m) * success_probability_,
    );
    Ok(ret.repeat(repeat))
}

/// Cost of solving LWE by meeting table and search halves of the secret in
/// the middle.
pub fn mitm(params: &LweParameters, opts: &EstimateOpts) -> LfResult<Cost> {
    let optimization = opts.mitm_opt()?;
    let params = params.normalize()?;

    let (nd_rng, _) = x_range(&params.xe);
    if nd_rng >= params.q as f64 {
        // the truncated error range wraps the modulus, collisions carry no
        // information
        return Ok(Cost {
            rop: f64::INFINITY,
            mem: f64::INFINITY,
            m: 0.0,
            k: 0,
            tag: TAG.into(),
            ..Default::default()
        });
    }

    match optimization {
        MitmOpt::Analytical => analytical(&params, opts.success_probability),
        MitmOpt::Numerical => {
            let mut search = LocalMinimum::new(1, i64::from(params.n) - 1)?;
            while let Some(k) = search.next_candidate() {
                search.update(Eval::Feasible(cost(&params, k, opts.success_probability)?));
            }
            let best = search.into_best().and_then(|(_, y)| y.feasible());
            debug!("splitting dimension walk settled on k={:?}", best.as_ref().map(|c| c.k));
            // large noise can break convexity; the true minimum then tends
            // to sit at k=1
            let edge = cost(&params, 1, opts.success_probability)?;
            Ok(match best {
                Some(best) if best <= edge => best,
                _ => edge,
            })
        }
    }
}
