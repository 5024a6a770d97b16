//! Import incident records from a CSV file into the database.
//!
//! Usage: `cargo run --bin import -- [path/to/incidents.csv] [--replace]`
//!
//! Requires `DATABASE_URL` (reads .env). Without `--replace` the import only
//! runs against an empty `incidents` table.

use std::path::PathBuf;

use clap::Parser;
use incident_atlas::db;
use incident_atlas::services::import;

const DEFAULT_CSV_PATH: &str = "data/incidents.csv";

#[derive(Parser)]
#[command(name = "import", about = "Load incident records from a CSV file")]
struct Cli {
    /// CSV file with the canonical incident header
    #[arg(default_value = DEFAULT_CSV_PATH)]
    path: PathBuf,

    /// Clear the incidents table before loading
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "incident_atlas=info,import=info".into()),
        )
        .init();

    let db_url = std::env::var("DATABASE_URL")?;
    let pool = db::create_pool(&db_url, 5).await?;
    db::run_migrations(&pool).await?;

    let (incidents, report) = import::read_file(&cli.path)?;
    tracing::info!(
        path = %cli.path.display(),
        read = report.read,
        duplicates = report.duplicates,
        "Parsed incident CSV"
    );

    let inserted = import::load(&pool, &incidents, cli.replace).await?;
    tracing::info!(inserted, replace = cli.replace, "Import complete");

    Ok(())
}
