//! CLI to inspect validator eligibility, redelegation plans, withdrawals and the notice ledger.

mod cli;
mod handlers;
mod snapshot;

use anyhow::{Context, Result};
use clap::Parser;
use lsd_common::logging::{self, LoggerConfig};
use lsd_params::{default::NOTICE_CAPACITY, Params};
use tracing::debug;

use crate::{
    cli::{Cli, Commands},
    handlers::{eligible, notices, plan, print_json, withdraw_info},
    snapshot::ChainSnapshot,
};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init(LoggerConfig::with_base_name("lsd-cli"));

    let cli = Cli::parse();
    let params = cli
        .params
        .as_deref()
        .map(Params::load)
        .transpose()
        .context("failed to load params")?;
    debug!(?cli.command, has_params = params.is_some(), "parsed arguments");

    match cli.command {
        Commands::Eligible(args) => {
            let snapshot = ChainSnapshot::load(&args.snapshot)?;
            let selection =
                eligible::handle_eligible(&snapshot, args.amount, &mut rand::thread_rng())?;
            print_json(&selection)
        }
        Commands::Plan(args) => {
            let snapshot = ChainSnapshot::load(&args.snapshot)?;
            let staking_denom = params.as_ref().map(|p| p.source.staking_denom.as_str());
            let output = plan::handle_plan(
                &snapshot,
                &args,
                staking_denom,
                &mut rand::thread_rng(),
            )?;
            print_json(&output)
        }
        Commands::WithdrawInfo(args) => {
            let snapshot = ChainSnapshot::load(&args.snapshot)?;
            print_json(&withdraw_info::handle_withdraw_info(&snapshot)?)
        }
        Commands::Notices(args) => {
            let capacity = params.map_or(NOTICE_CAPACITY, |p| p.notice_capacity);
            print_json(&notices::handle_notices(&args.db, capacity).await?)
        }
    }
}
