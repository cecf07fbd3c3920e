use clap::Args;

use crate::error::{LfResult, LweForgeError};
use crate::estimates::MitmOpt;
use crate::nd::NoiseDistribution;
use crate::params::LweParameters;
use crate::schemes::Scheme;

/// Knobs shared by all attack models.
#[derive(Args, Debug, Clone)]
pub struct EstimateOpts {
    /// Targeted success probability of the attack.
    #[arg(long, default_value_t = 0.99)]
    pub success_probability: f64,

    /// Square-root search spaces where a model admits a Grover speedup.
    #[arg(long, default_value_t = false)]
    pub quantum: bool,

    /// MITM split selection: "analytical" (fast) or "numerical" (accurate).
    #[arg(long, default_value = "analytical")]
    pub mitm_optimization: String,

    /// Worker threads for fanning estimates out.
    #[arg(long, default_value_t = 1)]
    pub jobs: usize,
}

impl Default for EstimateOpts {
    fn default() -> Self {
        Self {
            success_probability: 0.99,
            quantum: false,
            mitm_optimization: "analytical".to_string(),
            jobs: 1,
        }
    }
}

impl EstimateOpts {
    pub fn mitm_opt(&self) -> LfResult<MitmOpt> {
        self.mitm_optimization.parse().map_err(|_| {
            LweForgeError::Config(format!(
                "unknown mitm optimization '{}', expected analytical or numerical",
                self.mitm_optimization
            ))
        })
    }

    pub fn validate(&self) -> LfResult<()> {
        if !(self.success_probability > 0.0 && self.success_probability < 1.0) {
            return Err(LweForgeError::Config(format!(
                "success probability must lie strictly between 0 and 1, got {}",
                self.success_probability
            )));
        }
        self.mitm_opt()?;
        if self.jobs == 0 {
            return Err(LweForgeError::Config("jobs must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Parameter selection: a named scheme, or an explicit instance.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Built-in scheme name (see `lweforge schemes`).
    #[arg(long)]
    pub scheme: Option<String>,

    /// Secret dimension.
    #[arg(long)]
    pub n: Option<u32>,

    /// Ciphertext modulus.
    #[arg(long)]
    pub q: Option<u64>,

    /// Secret distribution, e.g. "binomial:3" or "sparseternary:16:16".
    #[arg(long)]
    pub secret: Option<String>,

    /// Error distribution, e.g. "gaussian:3.19".
    #[arg(long)]
    pub error: Option<String>,

    /// Sample allowance; omit for an unbounded oracle.
    #[arg(long)]
    pub samples: Option<f64>,

    /// Label for report rows of an explicit instance.
    #[arg(long)]
    pub tag: Option<String>,
}

impl ParamArgs {
    pub fn resolve(&self) -> LfResult<LweParameters> {
        if let Some(name) = &self.scheme {
            let scheme: Scheme = name
                .parse()
                .map_err(|_| LweForgeError::Config(format!("unknown scheme '{name}'")))?;
            return Ok(scheme.parameters());
        }
        match (self.n, self.q, self.secret.as_deref(), self.error.as_deref()) {
            (Some(n), Some(q), Some(secret), Some(error)) => {
                let xs: NoiseDistribution = secret.parse()?;
                let xe: NoiseDistribution = error.parse()?;
                let m = self.samples.unwrap_or(f64::INFINITY);
                let tag = self.tag.as_deref().unwrap_or("custom");
                Ok(LweParameters::new(n, q, xs, xe, m, tag))
            }
            _ => Err(LweForgeError::Config(
                "either --scheme or all of --n, --q, --secret, --error are required".to_string(),
            )),
        }
    }
}
