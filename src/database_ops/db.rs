use anyhow::{Context, Result};
use sqlx::{
    any::{install_default_drivers, AnyPoolOptions},
    AnyPool, Row,
};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, instrument};

/// Migrations compiled into the binary, applied in version order.
const MIGRATIONS: &[(i64, &str, &str)] = &[(
    1,
    "init",
    include_str!("../../migrations/0001_init.sql"),
)];

#[derive(Clone)]
pub struct Db {
    pub pool: AnyPool,
}

impl Db {
    // SECURITY: never include raw DSNs in tracing spans (they may contain credentials).
    #[instrument(skip(database_url))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let db = Self::connect_no_migrate(database_url, max_connections).await?;

        // Optional auto-migrate gate (default: OFF).
        if crate::util::env::env_flag("AUTO_MIGRATE", false) {
            info!("running migrations (AUTO_MIGRATE=on)");
            db.run_migrations().await?;
        } else {
            info!("AUTO_MIGRATE disabled; skipping migrations");
        }
        Ok(db)
    }

    // Variant that NEVER runs migrations regardless of env.
    #[instrument(skip(database_url))]
    pub async fn connect_no_migrate(database_url: &str, max_connections: u32) -> Result<Self> {
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .context("connect to database")?;
        info!("connected to db");
        Ok(Self { pool })
    }

    /// Private SQLite database living in a single pooled connection, migrated.
    pub async fn in_memory() -> Result<Self> {
        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("open in-memory sqlite")?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Apply embedded migrations not yet recorded in `_schema_migrations`.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _schema_migrations (
                version BIGINT PRIMARY KEY,
                description TEXT NOT NULL
             )",
        )
        .execute(&self.pool)
        .await?;

        let applied: HashSet<i64> = sqlx::query("SELECT version FROM _schema_migrations")
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(|r| r.try_get::<i64, _>(0))
            .collect::<Result<_, _>>()?;

        for &(version, desc, sql) in MIGRATIONS {
            if applied.contains(&version) {
                continue;
            }
            info!(version, desc, "applying migration");
            sqlx::raw_sql(sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("migration {version}_{desc}"))?;
            sqlx::query("INSERT INTO _schema_migrations (version, description) VALUES ($1, $2)")
                .bind(version)
                .bind(desc)
                .execute(&self.pool)
                .await?;
        }
        info!(latest = MIGRATIONS.len(), "migrations up-to-date");
        Ok(())
    }

    /// Cheap connectivity probe for health checks.
    pub async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}
