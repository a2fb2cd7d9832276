use anyhow::{Context, Result};
use runtime::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const MEMORY_URL: &str = "sqlite::memory:";
const DEFAULT_MAX_CONNS: u32 = 10;
const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;

/// Open the configured database. `mock` (or a missing `database` section)
/// selects a private in-memory SQLite database.
pub async fn connect(
    cfg: Option<&DatabaseConfig>,
    home_dir: &Path,
    mock: bool,
) -> Result<DatabaseConnection> {
    let url = match cfg {
        _ if mock => MEMORY_URL.to_string(),
        Some(cfg) => cfg.resolved_url(home_dir, true)?,
        None => {
            tracing::warn!("No database configuration found, using an in-memory database");
            MEMORY_URL.to_string()
        }
    };
    let max_conns = cfg.and_then(|c| c.max_conns).unwrap_or(DEFAULT_MAX_CONNS);

    if url.starts_with("sqlite:") {
        let busy = cfg
            .and_then(|c| c.busy_timeout_ms)
            .unwrap_or(DEFAULT_BUSY_TIMEOUT_MS);
        return connect_sqlite(&url, max_conns, Duration::from_millis(busy.into())).await;
    }

    tracing::info!("Connecting to database server");
    let mut opts = ConnectOptions::new(url);
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    Database::connect(opts)
        .await
        .context("failed to connect to database")
}

async fn connect_sqlite(url: &str, max_conns: u32, busy: Duration) -> Result<DatabaseConnection> {
    let memory = url == MEMORY_URL;
    let mut opts = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid sqlite url '{url}'"))?
        .busy_timeout(busy)
        .foreign_keys(true)
        .create_if_missing(true);

    // Every pooled connection to :memory: would be its own database.
    let pool_opts = if memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        opts = opts
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        SqlitePoolOptions::new()
            .max_connections(max_conns)
            .acquire_timeout(Duration::from_secs(5))
    };

    let pool = pool_opts
        .connect_with(opts)
        .await
        .with_context(|| format!("failed to open sqlite database '{url}'"))?;
    tracing::info!(memory, "Connected to SQLite database");
    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}
