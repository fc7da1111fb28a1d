//! cex - command line for the demand-note ledger

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod context;
mod logger;

use cli::Cli;
use commands::{actual_cost, budget, dn_master, draft, init, po, process, reconcile};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.global.verbose);

    match &cli.command {
        cli::Commands::Init(args) => init::execute(args, &cli.global).await,
        cli::Commands::Budget(args) => budget::execute(args, &cli.global).await,
        cli::Commands::DnMaster(args) => dn_master::execute(args, &cli.global).await,
        cli::Commands::Po(args) => po::execute(args, &cli.global).await,
        cli::Commands::Reconcile(args) => reconcile::execute(args, &cli.global).await,
        cli::Commands::Draft(args) => draft::execute(args, &cli.global).await,
        cli::Commands::ActualCost(args) => actual_cost::execute(args, &cli.global).await,
        cli::Commands::Process(args) => process::execute(args, &cli.global).await,
    }
}
