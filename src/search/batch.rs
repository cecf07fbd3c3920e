use std::fmt;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::LfResult;

/// A named cost function suitable for batch fan-out. The name is the task
/// identity used as the column key of the result table, so it must be unique
/// within one batch.
pub struct Algorithm<P, R> {
    name: String,
    f: Box<dyn Fn(&P) -> LfResult<R> + Send + Sync>,
}

impl<P, R> Algorithm<P, R> {
    pub fn new(
        name: impl Into<String>,
        f: impl Fn(&P) -> LfResult<R> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            f: Box::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn run(&self, param: &P) -> LfResult<R> {
        (self.f)(param)
    }
}

impl<P, R> fmt::Debug for Algorithm<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Algorithm").field("name", &self.name).finish()
    }
}

/// Two-level result table: one row per parameter instance (input order),
/// one keyed cell per algorithm identity.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimateTable<P, R> {
    rows: Vec<(P, Vec<(String, R)>)>,
}

impl<P, R> EstimateTable<P, R> {
    pub fn rows(&self) -> impl Iterator<Item = (&P, &[(String, R)])> {
        self.rows.iter().map(|(p, cells)| (p, cells.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Algorithm identities in column order.
    pub fn algorithms(&self) -> Vec<&str> {
        match self.rows.first() {
            Some((_, cells)) => cells.iter().map(|(name, _)| name.as_str()).collect(),
            None => Vec::new(),
        }
    }
}

impl<P: PartialEq, R> EstimateTable<P, R> {
    pub fn get(&self, param: &P) -> Option<&[(String, R)]> {
        self.rows
            .iter()
            .find(|(p, _)| p == param)
            .map(|(_, cells)| cells.as_slice())
    }

    pub fn value(&self, param: &P, algorithm: &str) -> Option<&R> {
        self.get(param)?
            .iter()
            .find(|(name, _)| name == algorithm)
            .map(|(_, y)| y)
    }
}

struct Task<'a, P, R> {
    algorithm: &'a Algorithm<P, R>,
    param: &'a P,
    param_idx: usize,
}

/// Runs every (algorithm, parameter) pair of the cross product and collects
/// the results into an [`EstimateTable`].
///
/// With `jobs <= 1` tasks run sequentially on the calling thread; otherwise
/// they fan out over a rayon pool of exactly `jobs` threads whose lifetime
/// is scoped to this call. Tasks are independent and must not mutate shared
/// state; results are assembled in task order, so the table is identical for
/// any job count. The first task error aborts the batch and discards all
/// partial results.
pub fn batch_estimate<P, R>(
    params: &[P],
    algorithms: &[Algorithm<P, R>],
    jobs: usize,
) -> LfResult<EstimateTable<P, R>>
where
    P: Clone + Sync + fmt::Debug,
    R: Send + fmt::Debug,
{
    let mut tasks = Vec::with_capacity(params.len() * algorithms.len());
    for algorithm in algorithms {
        for (param_idx, param) in params.iter().enumerate() {
            tasks.push(Task {
                algorithm,
                param,
                param_idx,
            });
        }
    }
    info!(
        "batch: {} tasks ({} algorithms x {} parameter sets) on {} worker(s)",
        tasks.len(),
        algorithms.len(),
        params.len(),
        jobs.max(1)
    );

    let run = |task: &Task<'_, P, R>| -> LfResult<R> {
        let y = task.algorithm.run(task.param)?;
        debug!(
            "f: {}, x: {:?}, f(x): {:?}",
            task.algorithm.name(),
            task.param,
            y
        );
        Ok(y)
    };

    let results: Vec<R> = if jobs <= 1 {
        tasks.iter().map(run).collect::<LfResult<_>>()?
    } else {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
        pool.install(|| tasks.par_iter().map(run).collect::<LfResult<_>>())?
    };

    let mut rows: Vec<(P, Vec<(String, R)>)> = params
        .iter()
        .map(|p| (p.clone(), Vec::with_capacity(algorithms.len())))
        .collect();
    for (task, y) in tasks.iter().zip(results) {
        rows[task.param_idx]
            .1
            .push((task.algorithm.name().to_string(), y));
    }
    Ok(EstimateTable { rows })
}
