use clap::Args;
use lweforge::api;
use lweforge::config::{EstimateOpts, ParamArgs};
use lweforge::error::LfResult;

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub params: ParamArgs,

    #[command(flatten)]
    pub opts: EstimateOpts,

    /// Comma-separated attack models to run (default: all).
    #[arg(long)]
    pub models: Option<String>,

    /// Dump the estimates as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: EstimateArgs) -> LfResult<()> {
    let params = args.params.resolve()?;
    let table = api::run_estimates(
        std::slice::from_ref(&params),
        args.models.as_deref(),
        &args.opts,
    )?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&super::dump_json(&table))?);
        return Ok(());
    }

    println!("\n{params}");
    reports::print_summary(&table);
    for (_, cells) in table.rows() {
        for (name, outcome) in cells {
            match outcome {
                Ok(cost) => reports::print_cost_detail(name, cost),
                Err(e) => println!("{name}: {e}"),
            }
        }
    }
    Ok(())
}
