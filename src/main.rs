use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod discovery;
mod error;
mod github;
mod output;
mod runner;
mod tool;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - only show debug logs with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("pmdgate=debug")
    } else {
        EnvFilter::new("pmdgate=info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run(args) => cli::run::execute(args).await,
        Commands::ChangedFiles(args) => cli::changed_files::execute(args).await,
        Commands::Resolve(args) => cli::resolve::execute(args).await,
        Commands::Schema => cli::schema::execute(),
    }
}
