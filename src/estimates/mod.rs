//! Attack cost models.
//!
//! Every model is a pure function from an [`LweParameters`] instance and the
//! shared [`EstimateOpts`] to a [`Cost`] record, and can be wrapped into a
//! named [`Algorithm`] for batch fan-out.

pub mod bkw;
pub mod exhaustive;
pub mod mitm;

pub use self::bkw::coded_bkw;
pub use self::exhaustive::exhaustive_search;
pub use self::mitm::mitm;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::config::EstimateOpts;
use crate::cost::Cost;
use crate::error::{LfResult, LweForgeError};
use crate::params::LweParameters;
use crate::search::Algorithm;

/// MITM split-dimension selection strategy.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum MitmOpt {
    /// Closed-form split, fast and reasonably accurate.
    Analytical,
    /// Search over split dimension and sample count.
    Numerical,
}

#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum AttackModel {
    ExhaustiveSearch,
    Mitm,
    CodedBkw,
}

impl AttackModel {
    pub fn estimate(&self, params: &LweParameters, opts: &EstimateOpts) -> LfResult<Cost> {
        match self {
            Self::ExhaustiveSearch => exhaustive_search(params, opts),
            Self::Mitm => mitm(params, opts),
            Self::CodedBkw => coded_bkw(params, opts),
        }
    }

    /// Wraps the model into a named batch task carrying its own copy of the
    /// options.
    pub fn algorithm(&self, opts: &EstimateOpts) -> Algorithm<LweParameters, Cost> {
        let model = *self;
        let opts = opts.clone();
        Algorithm::new(self.to_string(), move |p: &LweParameters| {
            model.estimate(p, &opts)
        })
    }
}

/// Resolves a comma-separated model selection into batch algorithms; `None`
/// or `"all"` selects every model.
pub fn select(
    names: Option<&str>,
    opts: &EstimateOpts,
) -> LfResult<Vec<Algorithm<LweParameters, Cost>>> {
    let models: Vec<AttackModel> = match names {
        None | Some("all") => AttackModel::iter().collect(),
        Some(names) => names
            .split(',')
            .map(|name| {
                name.trim().parse().map_err(|_| {
                    LweForgeError::Config(format!("unknown attack model '{}'", name.trim()))
                })
            })
            .collect::<LfResult<_>>()?,
    };
    Ok(models.iter().map(|m| m.algorithm(opts)).collect())
}
