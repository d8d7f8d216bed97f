use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lsd_primitives::types::{Address, Amount};

#[derive(Parser, Debug)]
#[command(
    name = "lsd-cli",
    about = "Inspect liquid-staking plans and the notice ledger",
    version
)]
pub(crate) struct Cli {
    #[arg(long, global = true, env = "LSD_PARAMS", help = "the path to the params file")]
    pub(crate) params: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Commands {
    Eligible(EligibleArgs),

    Plan(PlanArgs),

    WithdrawInfo(WithdrawInfoArgs),

    Notices(NoticesArgs),
}

#[derive(Parser, Debug, Clone)]
#[command(about = "List the validators able to accept an amount of liquid stake")]
pub(crate) struct EligibleArgs {
    #[arg(long, help = "the path to a JSON chain snapshot")]
    pub(crate) snapshot: PathBuf,

    #[arg(long, help = "the amount to stake, in atomic units")]
    pub(crate) amount: Amount,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Plan the redelegation and tokenization of a delegator's stake")]
pub(crate) struct PlanArgs {
    #[arg(long, help = "the path to a JSON chain snapshot")]
    pub(crate) snapshot: PathBuf,

    #[arg(long, help = "the amount to redelegate, in atomic units")]
    pub(crate) amount: Amount,

    #[arg(long, help = "the delegator whose delegations are consumed")]
    pub(crate) delegator: Address,

    #[arg(long, help = "redelegate to this validator instead of a random eligible one")]
    pub(crate) target: Option<Address>,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "Show which unstake records can be withdrawn")]
pub(crate) struct WithdrawInfoArgs {
    #[arg(long, help = "the path to a JSON chain snapshot")]
    pub(crate) snapshot: PathBuf,
}

#[derive(Parser, Debug, Clone)]
#[command(about = "List the notices persisted in a SQLite notice ledger")]
pub(crate) struct NoticesArgs {
    #[arg(long, help = "the path to the SQLite database")]
    pub(crate) db: PathBuf,
}
