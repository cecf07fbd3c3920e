//! High-level estimation services shared by the CLI subcommands.

use std::path::Path;

use tracing::info;

use crate::config::EstimateOpts;
use crate::cost::Cost;
use crate::error::{LfResult, LweForgeError};
use crate::estimates;
use crate::nd::NoiseDistribution;
use crate::params::LweParameters;
use crate::search::{batch_estimate, Algorithm, EstimateTable};

/// Runs the selected attack models (comma-separated names, `None` for all)
/// against every parameter set. Each table cell carries the model's own
/// verdict, so one sample-starved model does not void the others; only
/// infrastructure failures abort the run as a whole.
pub fn run_estimates(
    params: &[LweParameters],
    models: Option<&str>,
    opts: &EstimateOpts,
) -> LfResult<EstimateTable<LweParameters, LfResult<Cost>>> {
    opts.validate()?;
    let algorithms: Vec<Algorithm<LweParameters, LfResult<Cost>>> =
        estimates::select(models, opts)?
            .into_iter()
            .map(|algorithm| {
                let name = algorithm.name().to_string();
                Algorithm::new(name, move |p: &LweParameters| Ok(algorithm.run(p)))
            })
            .collect();
    batch_estimate(params, &algorithms, opts.jobs)
}

/// Loads LWE parameter sets from a CSV file with an `n,q,secret,error,m,tag`
/// header. Column order is free. The `m` and `tag` columns may be absent or
/// empty: an empty `m` means an unbounded oracle, an empty `tag` falls back
/// to the row number.
pub fn load_params_csv(path: impl AsRef<Path>) -> LfResult<Vec<LweParameters>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_path(path)?;

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };
    let required = |name: &str| {
        column(name).ok_or_else(|| {
            LweForgeError::Config(format!(
                "{}: missing required column '{name}'",
                path.display()
            ))
        })
    };
    let n_col = required("n")?;
    let q_col = required("q")?;
    let secret_col = required("secret")?;
    let error_col = required("error")?;
    let m_col = column("m");
    let tag_col = column("tag");

    let mut params = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let field = |col: usize| record.get(col).unwrap_or("").trim();
        let bad = |what: &str, value: &str| {
            LweForgeError::Config(format!(
                "{} row {}: bad {what} '{value}'",
                path.display(),
                row + 2
            ))
        };

        let n: u32 = field(n_col).parse().map_err(|_| bad("n", field(n_col)))?;
        let q: u64 = field(q_col).parse().map_err(|_| bad("q", field(q_col)))?;
        let xs: NoiseDistribution = field(secret_col).parse()?;
        let xe: NoiseDistribution = field(error_col).parse()?;
        let m = match m_col.map(field) {
            None | Some("") => f64::INFINITY,
            Some(s) => s.parse().map_err(|_| bad("m", s))?,
        };
        let tag = match tag_col.map(field) {
            None | Some("") => format!("row{}", row + 1),
            Some(s) => s.to_string(),
        };
        params.push(LweParameters::new(n, q, xs, xe, m, tag));
    }
    if params.is_empty() {
        return Err(LweForgeError::Config(format!(
            "{}: no parameter rows",
            path.display()
        )));
    }
    info!(
        "loaded {} parameter set(s) from {}",
        params.len(),
        path.display()
    );
    Ok(params)
}
