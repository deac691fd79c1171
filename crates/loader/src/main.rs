use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fazenda_loader::{config, load, LoadOptions};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Load a rural-registry parcel shapefile into PostGIS",
    long_about = "Load a rural-registry parcel shapefile into the PostGIS `fazendas` table.\n\nThe table is dropped and recreated unless --keep-existing is given. After the rows are in, the geography column is filled and the spatial indexes are built."
)]
struct Args {
    /// Path to the .shp file (the .shx and .dbf must sit next to it)
    #[arg(short, long, env = "SHAPEFILE", default_value = "data/AREA_IMOVEL_1.shp")]
    shapefile: PathBuf,

    /// Postgres URL; composed from POSTGRES_* variables when omitted
    #[arg(long)]
    database_url: Option<String>,

    /// Rows per insert transaction
    #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
    batch_size: u64,

    /// SRID of the shapefile coordinates
    #[arg(long, default_value_t = 4674)]
    source_srid: i32,

    /// Append to the existing table instead of recreating it
    #[arg(long)]
    keep_existing: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let url = args
        .database_url
        .clone()
        .unwrap_or_else(|| config::database_url(|key| std::env::var(key).ok()));

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;

    let options = LoadOptions {
        shapefile: args.shapefile,
        batch_size: args.batch_size as usize,
        source_srid: args.source_srid,
        keep_existing: args.keep_existing,
    };

    tracing::info!("Loading {}", options.shapefile.display());
    let summary = load(&pool, &options).await?;

    let secs = summary.elapsed.as_secs_f64();
    tracing::info!(
        "{} records loaded, {} skipped in {:.2}s ({:.2} min)",
        summary.loaded,
        summary.skipped,
        secs,
        secs / 60.0
    );

    pool.close().await;
    Ok(())
}
