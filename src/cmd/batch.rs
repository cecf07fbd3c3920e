use std::path::PathBuf;

use clap::Args;
use lweforge::api;
use lweforge::config::EstimateOpts;
use lweforge::error::LfResult;

use crate::reports;

#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// CSV file with an `n,q,secret,error,m,tag` header.
    #[arg(short, long)]
    pub file: PathBuf,

    #[command(flatten)]
    pub opts: EstimateOpts,

    /// Comma-separated attack models to run (default: all).
    #[arg(long)]
    pub models: Option<String>,

    /// Dump the estimates as JSON instead of tables.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

pub fn run(args: BatchArgs) -> LfResult<()> {
    let params = api::load_params_csv(&args.file)?;
    let table = api::run_estimates(&params, args.models.as_deref(), &args.opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&super::dump_json(&table))?);
        return Ok(());
    }

    reports::print_summary(&table);
    Ok(())
}
