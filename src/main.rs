mod cli;
mod commands;
mod error;
mod interactive;
mod mcp;
mod naming;
mod ops;
mod page_range;
mod pdf;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            interactive::run()?;
        }
        Some(Commands::Mcp) => {
            mcp::run_server().await?;
        }
        Some(Commands::Extract { path, pages }) => {
            commands::extract::set(&path, &pages)?;
        }
        Some(Commands::Range { path, start, end }) => {
            commands::extract::range(&path, start, end)?;
        }
        Some(Commands::Page { path, page }) => {
            commands::extract::page(&path, page)?;
        }
        Some(Commands::Merge { inputs, output }) => {
            commands::merge::run(&inputs, &output)?;
        }
    }

    Ok(())
}
