//! LWE parameter sets consumed by the attack models.

use std::f64::consts::LN_2;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cost::fmt_magnitude;
use crate::error::{LfResult, LweForgeError};
use crate::nd::NoiseDistribution;
use crate::util::ln_binomial;

/// An LWE instance: secret dimension `n`, modulus `q`, secret and error
/// distributions, and the number of samples `m` the attacker may consume
/// (`f64::INFINITY` for an unbounded oracle).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LweParameters {
    pub n: u32,
    pub q: u64,
    pub xs: NoiseDistribution,
    pub xe: NoiseDistribution,
    pub m: f64,
    pub tag: String,
}

impl LweParameters {
    pub fn new(
        n: u32,
        q: u64,
        xs: NoiseDistribution,
        xe: NoiseDistribution,
        m: f64,
        tag: impl Into<String>,
    ) -> Self {
        Self {
            n,
            q,
            xs: xs.resize(n),
            xe,
            m,
            tag: tag.into(),
        }
    }

    /// Same instance with a different sample allowance.
    pub fn with_m(&self, m: f64) -> Self {
        Self {
            m,
            ..self.clone()
        }
    }

    /// Gaussian normal form: when the secret is wider than the error and at
    /// least `n` extra samples are available, `n` samples are spent to
    /// re-express the instance with the secret drawn from the error
    /// distribution. Anything else passes through unchanged.
    pub fn normalize(&self) -> LfResult<Self> {
        if self.m < 1.0 {
            return Err(LweForgeError::InsufficientSamples { required: 1.0 });
        }
        if self.xe.stddev() < self.xs.stddev() && self.m >= 2.0 * f64::from(self.n) {
            return Ok(Self {
                xs: self.xe,
                m: self.m - f64::from(self.n),
                ..self.clone()
            });
        }
        Ok(self.clone())
    }

    /// Produces `target` samples by signed k-sums of the existing ones: the
    /// smallest k ≥ 2 with `C(m, k) * 2^k >= target` determines the noise
    /// growth, and the error becomes a Gaussian of `sqrt(k)` times its
    /// stddev. An unbounded oracle needs no amplification.
    pub fn amplify_m(&self, target: f64) -> LfResult<Self> {
        if self.m.is_infinite() {
            return Ok(self.clone());
        }
        let ln_target = target.ln();
        let mut k = 2.0;
        while k < self.m {
            if ln_binomial(self.m, k) + k * LN_2 >= ln_target {
                let xe = NoiseDistribution::gaussian(k.sqrt() * self.xe.stddev());
                return Ok(Self {
                    xe,
                    m: target,
                    ..self.clone()
                });
            }
            // C(m, k) 2^k peaks near k = 2m/3; past it no k can catch up.
            if k > 2.0 * self.m / 3.0 + 1.0 {
                break;
            }
            k += 1.0;
        }
        Err(LweForgeError::InsufficientSamples { required: target })
    }
}

impl fmt::Display for LweParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LweParameters(n={}, q={}, Xs={}, Xe={}, m={}, tag='{}')",
            self.n,
            self.q,
            self.xs,
            self.xe,
            fmt_magnitude(self.m),
            self.tag
        )
    }
}
