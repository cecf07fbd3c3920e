//! Discrete local-minimum search over integer parameter ranges.
//!
//! Attack cost functions are expensive black boxes that are (assumed)
//! unimodal in their integer tuning parameters. [`LocalMinimum`] drives a
//! hybrid probe/bisection walk over such a range, [`binary_search`] and
//! [`binary_search_robust`] wrap it into one-shot drivers, and
//! [`batch_estimate`] fans whole (algorithm × parameter-set) grids out over
//! a worker pool.

pub mod batch;
pub mod binary;
pub mod local_minimum;

pub use self::batch::{batch_estimate, Algorithm, EstimateTable};
pub use self::binary::{
    binary_search, binary_search_robust, binary_search_robust_with, binary_search_with,
};
pub use self::local_minimum::LocalMinimum;

/// Outcome of a single cost-function evaluation.
///
/// `Infeasible` marks a candidate that produced no usable estimate; it never
/// compares as an improvement over any feasible result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eval<T> {
    Feasible(T),
    Infeasible,
}

impl<T> Eval<T> {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Eval::Feasible(_))
    }

    /// The feasible value, if any.
    pub fn feasible(self) -> Option<T> {
        match self {
            Eval::Feasible(y) => Some(y),
            Eval::Infeasible => None,
        }
    }

    pub fn as_ref(&self) -> Eval<&T> {
        match self {
            Eval::Feasible(y) => Eval::Feasible(y),
            Eval::Infeasible => Eval::Infeasible,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Eval<U> {
        match self {
            Eval::Feasible(y) => Eval::Feasible(f(y)),
            Eval::Infeasible => Eval::Infeasible,
        }
    }
}

impl<T> From<Option<T>> for Eval<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(y) => Eval::Feasible(y),
            None => Eval::Infeasible,
        }
    }
}
