//! Ranksurge Server Binary
//!
//! Serves the chunked top-rankings endpoint over a deliberately small
//! connection pool.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use ranksurge_config::{ConfigLoader, RanksurgeConfig};
use ranksurge_server::Server;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Server bind address
    #[arg(short, long)]
    bind: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Database URL
    #[arg(long)]
    database_url: Option<String>,

    /// Number of pooled connections
    #[arg(long)]
    pool_size: Option<u32>,

    /// Synthetic score rows to insert into an empty table
    #[arg(long)]
    seed_rows: Option<u32>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration, then override with CLI arguments
    let mut config = ConfigLoader::new().load(cli.config.as_ref())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate_all()?;

    if cli.print_config {
        println!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    // Create and start server
    let server = Server::new(config).await?;
    server.start().await
}

/// Apply CLI argument overrides to configuration
fn apply_cli_overrides(config: &mut RanksurgeConfig, cli: &Cli) {
    if let Some(bind) = &cli.bind {
        config.server.bind_address = bind.clone();
    }

    if let Some(port) = cli.port {
        config.server.port = port;
    }

    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }

    if let Some(pool_size) = cli.pool_size {
        config.database.max_connections = pool_size;
    }

    if let Some(seed_rows) = cli.seed_rows {
        config.database.seed_rows = seed_rows;
    }
}
