pub mod batch;
pub mod estimate;

use lweforge::cost::Cost;
use lweforge::error::LfResult;
use lweforge::params::LweParameters;
use lweforge::search::EstimateTable;

/// JSON shape shared by the subcommands' `--json` dumps: one object per
/// parameter set with the per-model verdicts keyed by model name.
pub(crate) fn dump_json(table: &EstimateTable<LweParameters, LfResult<Cost>>) -> serde_json::Value {
    let rows: Vec<serde_json::Value> = table
        .rows()
        .map(|(params, cells)| {
            let estimates: serde_json::Map<String, serde_json::Value> = cells
                .iter()
                .map(|(name, outcome)| {
                    let value = match outcome {
                        Ok(cost) => serde_json::json!(cost),
                        Err(e) => serde_json::json!({ "error": e.to_string() }),
                    };
                    (name.clone(), value)
                })
                .collect();
            serde_json::json!({ "params": params, "estimates": estimates })
        })
        .collect();
    serde_json::Value::Array(rows)
}
