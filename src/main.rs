mod config;
mod db;
mod deletion;
mod error;
mod input;
mod models;
mod references;
mod session;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, DEFAULT_LOG_FILTER};
use crate::db::Database;
use crate::input::StdConsole;
use crate::session::Session;

fn init_tracing(cli: &Cli) {
    // Logs go to stderr so they never interleave with prompts on stdout
    let filter = match &cli.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    // Load configuration
    let config = config::init(&cli).context("DATABASE_URL must be set in the environment or .env")?;
    println!("Initializing Poised Project Management System...");

    // One connection for the whole session
    let db = Database::connect(&config)
        .await
        .context("could not connect to the database")?;
    println!("Database connection established");

    let mut session = Session::new(db, StdConsole::stdio());
    let result = ui::run(&mut session).await;

    // Close the connection whatever happened in the menu
    session.into_store().close().await?;
    info!("shutdown complete");

    result.context("session ended with an error")?;
    Ok(())
}
