use clap::Parser;
use dotenvy::dotenv;
use serde::Deserialize;

/// Default tracing filter when neither `--log-filter` nor `RUST_LOG` is set
pub const DEFAULT_LOG_FILTER: &str = "poised_pms=info";

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "poised-pms", version, about = "Record manager for construction projects")]
pub struct Cli {
    /// Database connection URL, overrides DATABASE_URL
    #[arg(long)]
    pub database_url: Option<String>,

    /// Tracing filter directive, overrides RUST_LOG
    #[arg(long)]
    pub log_filter: Option<String>,
}

/// Configuration for the application
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,
}

impl Config {
    /// Read `DATABASE_URL` from the process environment, after merging in a
    /// `.env` file from the working directory when one is present. Used only
    /// when `--database-url` was not given.
    pub fn load() -> Result<Self, envy::Error> {
        dotenv().ok();
        envy::from_env::<Config>()
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

/// Resolve configuration, letting command-line values win over the environment
pub fn init(cli: &Cli) -> Result<Config, envy::Error> {
    match &cli.database_url {
        Some(url) => Ok(Config {
            database_url: url.clone(),
        }),
        None => Config::load(),
    }
}
