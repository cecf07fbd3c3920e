//! Noise distributions for LWE secrets and errors.
//!
//! Every variant answers the handful of queries the attack models need:
//! moments, bounds, per-coordinate density and the size of the search space
//! covering a given probability mass. Gaussians are unbounded; whenever a
//! model needs a finite range for one, it is cut off at
//! [`GAUSSIAN_TAIL_BOUND`] width-parameter tails and the lost mass is
//! charged to the per-draw success probability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LweForgeError;
use crate::prob::sigmaf;
use crate::util::{binomial, ln_binomial};

/// Tail cutoff in width-parameter units (sigma = stddev * sqrt(2 pi)).
pub const GAUSSIAN_TAIL_BOUND: f64 = 2.0;

/// Probability that a single Gaussian draw lands inside the tail bound.
pub fn gaussian_tail_prob() -> f64 {
    1.0 - 2.0 * (-std::f64::consts::PI * GAUSSIAN_TAIL_BOUND * GAUSSIAN_TAIL_BOUND).exp()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseDistribution {
    /// Discrete Gaussian with the given standard deviation per coordinate.
    DiscreteGaussian { stddev: f64, mean: f64 },
    /// Uniform over the centered representatives of Z_q.
    UniformMod { q: u64 },
    /// Uniform over the inclusive integer range [a, b].
    Uniform { a: i64, b: i64 },
    /// Sum of eta coin differences, bounded by ±eta.
    CenteredBinomial { eta: u32 },
    /// Ternary vector with exactly p ones and m minus-ones among n
    /// coordinates. The dimension is part of the distribution; parameter
    /// sets rebind it via [`NoiseDistribution::resize`].
    SparseTernary { n: u32, p: u32, m: u32 },
}

impl NoiseDistribution {
    pub fn gaussian(stddev: f64) -> Self {
        Self::DiscreteGaussian { stddev, mean: 0.0 }
    }

    pub fn uniform_mod(q: u64) -> Self {
        Self::UniformMod { q }
    }

    pub fn binomial(eta: u32) -> Self {
        Self::CenteredBinomial { eta }
    }

    /// Sparse ternary with a placeholder dimension of `p + m`; callers that
    /// know the ambient dimension fix it up with [`NoiseDistribution::resize`].
    pub fn sparse_ternary(p: u32, m: u32) -> Self {
        Self::SparseTernary {
            n: p.saturating_add(m),
            p,
            m,
        }
    }

    /// Inclusive per-coordinate bounds; infinite for Gaussians.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::DiscreteGaussian { .. } => (f64::NEG_INFINITY, f64::INFINITY),
            Self::UniformMod { q } => (-((q / 2) as f64), ((q - 1) / 2) as f64),
            Self::Uniform { a, b } => (a as f64, b as f64),
            Self::CenteredBinomial { eta } => (-f64::from(eta), f64::from(eta)),
            Self::SparseTernary { .. } => (-1.0, 1.0),
        }
    }

    pub fn stddev(&self) -> f64 {
        match *self {
            Self::DiscreteGaussian { stddev, .. } => stddev,
            Self::UniformMod { .. } | Self::Uniform { .. } => {
                let s = self.span();
                ((s * s - 1.0) / 12.0).sqrt()
            }
            Self::CenteredBinomial { eta } => (f64::from(eta) / 2.0).sqrt(),
            Self::SparseTernary { n, p, m } => (f64::from(p + m) / f64::from(n)).sqrt(),
        }
    }

    pub fn mean(&self) -> f64 {
        match *self {
            Self::DiscreteGaussian { mean, .. } => mean,
            Self::UniformMod { .. } | Self::Uniform { .. } => {
                let (a, b) = self.bounds();
                (a + b) / 2.0
            }
            Self::CenteredBinomial { .. } => 0.0,
            Self::SparseTernary { n, p, m } => (f64::from(p) - f64::from(m)) / f64::from(n),
        }
    }

    /// Number of integers a single coordinate can take; infinite for
    /// Gaussians.
    pub fn span(&self) -> f64 {
        let (a, b) = self.bounds();
        b - a + 1.0
    }

    pub fn is_bounded(&self) -> bool {
        self.span().is_finite()
    }

    /// Expected fraction of nonzero coordinates.
    pub fn density(&self) -> f64 {
        match *self {
            Self::DiscreteGaussian { .. } => 1.0,
            Self::UniformMod { .. } | Self::Uniform { .. } => {
                let (a, b) = self.bounds();
                if a <= 0.0 && 0.0 <= b {
                    1.0 - 1.0 / self.span()
                } else {
                    1.0
                }
            }
            Self::CenteredBinomial { eta } => {
                1.0 - binomial(2.0 * f64::from(eta), f64::from(eta)) / 4f64.powi(eta as i32)
            }
            Self::SparseTernary { n, p, m } => f64::from(p + m) / f64::from(n),
        }
    }

    pub fn is_sparse(&self) -> bool {
        self.density() < 0.5
    }

    /// Gaussians and centered binomials concentrate like Gaussians; the
    /// models clamp their enumeration ranges to a few standard deviations.
    pub fn is_gaussian_like(&self) -> bool {
        matches!(
            self,
            Self::DiscreteGaussian { .. } | Self::CenteredBinomial { .. }
        )
    }

    /// Expected number of nonzero coordinates of an n-dimensional draw.
    pub fn hamming_weight(&self, n: u32) -> f64 {
        match *self {
            Self::SparseTernary { p, m, .. } => f64::from(p + m),
            _ => (f64::from(n) * self.density()).round(),
        }
    }

    /// Rebinds the dimension of a sparse ternary; identity elsewhere.
    pub fn resize(&self, n: u32) -> Self {
        match *self {
            Self::SparseTernary { p, m, .. } => Self::SparseTernary { n, p, m },
            other => other,
        }
    }

    /// Number of candidate vectors that must be enumerated to cover
    /// `fraction` of the probability mass of an n-dimensional draw.
    ///
    /// Gaussians are truncated at the tail bound; when the joint tail
    /// success over n coordinates cannot reach `fraction`, the support is
    /// unsupported and `None` is returned.
    pub fn support_size(&self, n: u32, fraction: f64) -> Option<f64> {
        match *self {
            Self::DiscreteGaussian { stddev, .. } => {
                if gaussian_tail_prob().powi(n as i32) < fraction {
                    return None;
                }
                let per_coord = 2.0 * GAUSSIAN_TAIL_BOUND * sigmaf(stddev) + 1.0;
                Some(per_coord.powi(n as i32))
            }
            Self::SparseTernary { p, m, .. } => {
                let h = f64::from(p + m);
                Some(fraction * binomial(f64::from(n), h) * 2f64.powf(h))
            }
            _ => Some(fraction * self.span().powi(n as i32)),
        }
    }

    /// Natural log of [`NoiseDistribution::support_size`], usable when the
    /// plain size overflows an f64.
    pub fn ln_support_size(&self, n: u32, fraction: f64) -> Option<f64> {
        match *self {
            Self::DiscreteGaussian { stddev, .. } => {
                if f64::from(n) * gaussian_tail_prob().ln() < fraction.ln() {
                    return None;
                }
                let per_coord = 2.0 * GAUSSIAN_TAIL_BOUND * sigmaf(stddev) + 1.0;
                Some(f64::from(n) * per_coord.ln())
            }
            Self::SparseTernary { p, m, .. } => {
                let h = f64::from(p + m);
                Some(fraction.ln() + ln_binomial(f64::from(n), h) + h * std::f64::consts::LN_2)
            }
            _ => Some(fraction.ln() + f64::from(n) * self.span().ln()),
        }
    }

}

impl fmt::Display for NoiseDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mean() == 0.0 {
            write!(f, "D(σ={:.2})", self.stddev())
        } else {
            write!(f, "D(σ={:.2}, μ={:.2})", self.stddev(), self.mean())
        }
    }
}

impl FromStr for NoiseDistribution {
    type Err = LweForgeError;

    /// Parses the CLI shorthand: `gaussian:3.19`, `uniformmod:3329`,
    /// `uniform:-1:1`, `binomial:2`, `sparseternary:16:16`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || LweForgeError::Config(format!("invalid noise distribution spec '{s}'"));
        let mut parts = s.split(':');
        let kind = parts.next().ok_or_else(bad)?;
        let args: Vec<&str> = parts.collect();
        match (kind, args.as_slice()) {
            ("gaussian", [stddev]) => {
                let stddev: f64 = stddev.parse().map_err(|_| bad())?;
                if !(stddev > 0.0) {
                    return Err(bad());
                }
                Ok(Self::gaussian(stddev))
            }
            ("uniformmod", [q]) => {
                let q: u64 = q.parse().map_err(|_| bad())?;
                if q < 2 {
                    return Err(bad());
                }
                Ok(Self::uniform_mod(q))
            }
            ("uniform", [a, b]) => {
                let a: i64 = a.parse().map_err(|_| bad())?;
                let b: i64 = b.parse().map_err(|_| bad())?;
                if b < a {
                    return Err(bad());
                }
                Ok(Self::Uniform { a, b })
            }
            ("binomial", [eta]) => {
                let eta: u32 = eta.parse().map_err(|_| bad())?;
                if eta == 0 {
                    return Err(bad());
                }
                Ok(Self::binomial(eta))
            }
            ("sparseternary", [p, m]) => {
                let p: u32 = p.parse().map_err(|_| bad())?;
                let m: u32 = m.parse().map_err(|_| bad())?;
                match p.checked_add(m) {
                    Some(h) if h > 0 => Ok(Self::sparse_ternary(p, m)),
                    _ => Err(bad()),
                }
            }
            _ => Err(bad()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_mod_bounds() {
        assert_eq!(NoiseDistribution::uniform_mod(2).bounds(), (-1.0, 0.0));
        assert_eq!(NoiseDistribution::uniform_mod(3).bounds(), (-1.0, 1.0));
        assert_eq!(NoiseDistribution::uniform_mod(4).bounds(), (-2.0, 1.0));
        assert_eq!(NoiseDistribution::uniform_mod(3329).span(), 3329.0);
    }

    #[test]
    fn test_stddev_values() {
        assert_eq!(NoiseDistribution::uniform_mod(2).stddev(), 0.5);
        let cb3 = NoiseDistribution::binomial(3);
        assert!((cb3.stddev() - 1.5f64.sqrt()).abs() < 1e-12);
        let st = NoiseDistribution::sparse_ternary(16, 16).resize(1024);
        assert!((st.stddev() - (32.0f64 / 1024.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_sparseness_and_weight() {
        let st = NoiseDistribution::sparse_ternary(16, 16).resize(1024);
        assert!(st.is_sparse());
        assert_eq!(st.hamming_weight(1024), 32.0);
        assert!(!NoiseDistribution::uniform_mod(2).is_sparse());
        assert!(!NoiseDistribution::gaussian(3.2).is_sparse());
    }

    #[test]
    fn test_bounded_support_size() {
        let xs = NoiseDistribution::uniform_mod(2);
        assert_eq!(xs.support_size(64, 1.0), Some(2f64.powi(64)));
        let ln = xs.ln_support_size(64, 1.0).unwrap();
        assert!((ln - 64.0 * 2f64.ln()).abs() < 1e-9);
    }

    #[test]
    fn test_sparse_support_size() {
        // C(8, 2) * 2^2 = 112 candidate vectors.
        let st = NoiseDistribution::sparse_ternary(1, 1).resize(8);
        let size = st.support_size(8, 1.0).unwrap();
        assert!((size - 112.0).abs() < 1e-9);
    }

    #[test]
    fn test_gaussian_support_gate() {
        let xe = NoiseDistribution::gaussian(3.2);
        // One coordinate, no mass requirement: the truncated span.
        let rng = xe.support_size(1, 0.0).unwrap();
        assert!((rng - (4.0 * sigmaf(3.2) + 1.0)).abs() < 1e-9);
        // The joint tail success over a million draws cannot reach 0.99.
        assert_eq!(xe.support_size(1_000_000, 0.99), None);
        assert_eq!(xe.ln_support_size(1_000_000, 0.99), None);
    }

    #[test]
    fn test_parse_round_trip() {
        let cases = [
            ("gaussian:3.19", NoiseDistribution::gaussian(3.19)),
            ("uniformmod:3329", NoiseDistribution::uniform_mod(3329)),
            ("uniform:-1:1", NoiseDistribution::Uniform { a: -1, b: 1 }),
            ("binomial:2", NoiseDistribution::binomial(2)),
            (
                "sparseternary:16:16",
                NoiseDistribution::sparse_ternary(16, 16),
            ),
        ];
        for (spec, expected) in cases {
            assert_eq!(spec.parse::<NoiseDistribution>().unwrap(), expected);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for spec in [
            "",
            "gaussian",
            "gaussian:-1.0",
            "uniformmod:1",
            "uniform:3:-3",
            "binomial:0",
            "sparseternary:16",
            "triangular:4",
        ] {
            assert!(spec.parse::<NoiseDistribution>().is_err(), "{spec}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(NoiseDistribution::binomial(3).to_string(), "D(σ=1.22)");
        assert_eq!(
            NoiseDistribution::uniform_mod(2).to_string(),
            "D(σ=0.50, μ=-0.50)"
        );
    }
}
