use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::nd::NoiseDistribution;
use crate::params::LweParameters;

/// Built-in LWE parameter sets.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Scheme {
    Kyber512,
    Kyber768,
    Kyber1024,
    RegevToy,
    Tfhe630,
}

impl Scheme {
    pub fn parameters(&self) -> LweParameters {
        let tag = self.to_string();
        match self {
            // Round-3 Kyber, MLWE flattened to plain LWE over Z_q.
            Self::Kyber512 => LweParameters::new(
                512,
                3329,
                NoiseDistribution::binomial(3),
                NoiseDistribution::binomial(2),
                1024.0,
                tag,
            ),
            Self::Kyber768 => LweParameters::new(
                768,
                3329,
                NoiseDistribution::binomial(2),
                NoiseDistribution::binomial(2),
                1536.0,
                tag,
            ),
            Self::Kyber1024 => LweParameters::new(
                1024,
                3329,
                NoiseDistribution::binomial(2),
                NoiseDistribution::binomial(2),
                2048.0,
                tag,
            ),
            Self::RegevToy => LweParameters::new(
                64,
                1 << 40,
                NoiseDistribution::uniform_mod(2),
                NoiseDistribution::gaussian(3.2),
                f64::INFINITY,
                tag,
            ),
            Self::Tfhe630 => LweParameters::new(
                630,
                1 << 32,
                NoiseDistribution::uniform_mod(2),
                NoiseDistribution::gaussian(2f64.powi(17)),
                f64::INFINITY,
                tag,
            ),
        }
    }
}

pub fn all() -> Vec<LweParameters> {
    Scheme::iter().map(|s| s.parameters()).collect()
}
