mod config;
mod demo;
mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lifecycle_db::lifecycle::LifecycleConn;
use lifecycle_db::{ConnectOpts, connect};
use sea_orm_migration::MigratorTrait;
use tenant_admin::{Migrator, lifecycle_registry};

use crate::config::AppConfig;

/// Tenant administration backend on lifecycle-managed storage
#[derive(Parser)]
#[command(name = "tenant-admin")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load configuration and build the lifecycle registry, then exit
    Check,
    /// Run the tenant/team/user lifecycle walkthrough against the configured database
    Demo,
    /// Print the effective configuration (JSON) and exit
    PrintConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.config.as_deref()
        && !path.is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_verbosity(cli.verbose);
    if cli.json {
        config.logging.json = true;
    }
    logging::init(&config.logging);

    match cli.command {
        Commands::Check => check(config),
        Commands::Demo => run_demo(config).await,
        Commands::PrintConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn check(config: AppConfig) -> Result<()> {
    tracing::info!("Checking lifecycle wiring...");
    let registry = lifecycle_registry(config.lifecycle).context("invalid lifecycle wiring")?;
    println!("Lifecycle wiring is valid");
    for table in registry.tables() {
        if let Some(entity) = registry.descriptor_for_table(table) {
            println!("  {table}: soft delete {}", entity.soft_delete().name());
        }
    }
    println!("  interceptors: {}", registry.chain().names().join(", "));
    Ok(())
}

async fn run_demo(config: AppConfig) -> Result<()> {
    let registry = lifecycle_registry(config.lifecycle).context("invalid lifecycle wiring")?;

    let conn = connect(
        &config.database.url,
        ConnectOpts {
            max_conns: config.database.max_conns,
            ..Default::default()
        },
    )
    .await
    .with_context(|| format!("failed to connect to {}", config.database.url))?;
    Migrator::up(&conn, None).await.context("migrations failed")?;

    let db = LifecycleConn::new(conn, Arc::new(registry));
    demo::run(&db).await
}
