//! ssrs-cli - Command-line interface for SQL Server Reporting Services.
//!
//! Responsibilities:
//! - Parse command-line arguments and environment variables.
//! - Execute report server operations via the shared client library.
//!
//! Does NOT handle:
//! - Core logic or the SOAP surface (see `crates/client`).
//!
//! Invariants:
//! - `load_dotenv()` is called BEFORE CLI parsing so `.env` can provide
//!   clap env defaults.

mod args;
mod commands;
mod context;

use args::{Cli, Commands};
use clap::Parser;
use ssrs_config::ConfigLoader;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() {
    // Load .env before parsing so clap env defaults can read .env values.
    if let Err(e) = ConfigLoader::new().load_dotenv() {
        eprintln!("Failed to load environment: {e}");
        std::process::exit(1);
    }

    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = run(cli).await;
    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = context::build_client(&cli)?;
    match cli.command {
        Commands::List {
            ref folder,
            recursive,
            all,
        } => commands::list::run(&client, folder, recursive, all).await,
        Commands::Render {
            ref report,
            ref format,
            ref params,
            ref output,
            strict,
        } => {
            commands::render::run(
                &client,
                report,
                format.as_deref(),
                params,
                output.as_deref(),
                strict,
            )
            .await
        }
        Commands::Upload {
            ref source,
            ref target,
            overwrite,
            delete_existing,
            keep_data_sources,
            fix_references,
            ref exclude,
        } => {
            commands::upload::run(
                &client,
                source,
                target,
                overwrite,
                delete_existing,
                keep_data_sources,
                fix_references,
                exclude,
            )
            .await
        }
        Commands::Download {
            ref folders,
            ref target,
        } => commands::download::run(&client, folders, target).await,
        Commands::FixRefs { ref folder } => commands::fix_refs::run(&client, folder).await,
        Commands::Jobs { ref cancel } => commands::jobs::run(&client, cancel.as_deref()).await,
        Commands::Extensions => commands::extensions::run(&client).await,
    }
}
