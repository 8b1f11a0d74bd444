pub mod api;
pub mod database_ops;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalization;

pub mod util {
    pub mod env;
}

use anyhow::{Context, Result};

use database_ops::db::Db;
use database_ops::sync::{MovieSync, SyncConfig};
use database_ops::tmdb::{TmdbConfig, TmdbProvider};
use database_ops::watchmode::{WatchmodeConfig, WatchmodeProvider};
use database_ops::LiveSync;

/// Build the live engine from environment configuration.
pub fn live_sync_from_env(db: Db) -> Result<LiveSync> {
    util::env::preflight_check(
        "movie-sync",
        &["TMDB_API_TOKEN", "WATCHMODE_API_KEY"],
        &["TMDB_BASE_URL", "WATCHMODE_BASE_URL", "SYNC_REGION", "PLATFORM_PRICING"],
    )?;
    let catalog = TmdbProvider::new(&TmdbConfig::from_env().context("catalog config")?)?;
    let availability =
        WatchmodeProvider::new(&WatchmodeConfig::from_env().context("availability config")?)?;
    Ok(MovieSync::new(db, catalog, availability, SyncConfig::from_env()))
}

/// Default pool size when `DB_MAX_CONNS` is unset.
pub const DEFAULT_MAX_CONNS: u32 = 10;

/// Connect using `db_url_override` or `DATABASE_URL`/`DB_URL`, sized by
/// `DB_MAX_CONNS`.
pub async fn connect_from_env(db_url_override: Option<&str>) -> Result<Db> {
    let database_url = match db_url_override {
        Some(url) => url.to_string(),
        None => util::env::db_url()?,
    };
    tracing::info!(
        url = %util::env::redact_value("DATABASE_URL", &database_url),
        "connecting"
    );
    let max_connections: u32 = util::env::env_parse("DB_MAX_CONNS", DEFAULT_MAX_CONNS);
    Db::connect(&database_url, max_connections).await
}
