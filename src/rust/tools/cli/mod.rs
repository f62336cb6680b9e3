mod commands;
pub mod state;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::init::InitCommand;
use commands::run::RunCommand;
use state::CliContext;

#[derive(Parser, Debug)]
#[command(name = "esquire")]
#[command(
    version,
    about = "📦 esquire – resolve named modules and deferred requests from manifests."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a manifest and resolve everything it defines, requires and includes
    Run(RunCommand),
    /// Write a default esquire.toml and a sample manifest
    Init(InitCommand),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let ctx = CliContext::new();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    // the resolver is single-threaded; everything runs on one local task set
    let local = tokio::task::LocalSet::new();

    local.block_on(&runtime, async move {
        match cli.command {
            Commands::Run(command) => command.execute(&ctx).await?,
            Commands::Init(command) => command.execute(&ctx).await?,
        }
        Ok(())
    })
}
