//! Command-line entry point for school-seed.

use anyhow::Context;
use clap::Parser;
use school_seed::store::mem::MemStore;
use school_seed::store::postgres::PgStore;
use school_seed::{SeedArgs, Seeder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Stage progress is reported at info level; RUST_LOG still overrides.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = SeedArgs::parse();
    let config = args.resolve()?;

    if args.dry_run {
        tracing::info!("dry run: seeding an in-memory store, PostgreSQL untouched");
        let mut seeder = Seeder::new(MemStore::new(), config);
        let summary = seeder.run().await?;
        tracing::info!("dry run complete: {} rows would be inserted", summary.total_rows());
        return Ok(());
    }

    // Configuration problems (including missing env values) surface here,
    // before any database access.
    let pg_config = args.pg_config()?;
    let store = PgStore::connect(&pg_config)
        .await
        .context("failed to connect to PostgreSQL")?;

    let mut seeder = Seeder::new(store, config);
    let summary = seeder.run().await?;
    tracing::info!("done: {} rows inserted", summary.total_rows());
    Ok(())
}
