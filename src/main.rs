use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use movie_sync::database_ops::providers::AvailabilityApi;
use movie_sync::database_ops::sync::SyncOutcome;
use movie_sync::util::env as env_util;
use movie_sync::{connect_from_env, live_sync_from_env, logging};
use tracing::{error, warn};

#[derive(Parser, Debug)]
#[command(name = "movie-sync", version, about = "Movie catalog synchronization CLI")]
struct Cli {
    /// Optional override for the database URL
    #[arg(long, global = true)]
    db_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Synchronize one or more titles from the catalog and availability providers
    Sync {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Import the catalog genre vocabulary
    Genres,
    /// List every source the availability provider knows for a region
    Sources {
        /// Two-letter region; defaults to SYNC_REGION
        #[arg(long)]
        region: Option<String>,
    },
    /// Print a stored movie with its genres and platforms
    Show { id: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    logging::init_tracing("info,sqlx=warn")?;

    let cli = Cli::parse();
    let db = connect_from_env(cli.db_url.as_deref()).await.context("database connect failed")?;

    match cli.command {
        Commands::Migrate => {
            db.run_migrations().await?;
        }
        Commands::Sync { titles } => {
            let sync = live_sync_from_env(db)?;
            let mut failures = 0usize;
            for (title, result) in sync.sync_titles(&titles).await {
                match result {
                    Ok(SyncOutcome::Synced(report)) => {
                        println!("{}", serde_json::to_string_pretty(&report)?);
                    }
                    Ok(SyncOutcome::NotFound { stage }) => {
                        warn!(title = %title, ?stage, "nothing to sync");
                    }
                    Err(e) => {
                        failures += 1;
                        error!(title = %title, error = %e, "sync failed");
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} title(s) failed to sync", titles.len());
            }
        }
        Commands::Genres => {
            let sync = live_sync_from_env(db)?;
            let created = sync.sync_genre_vocabulary().await?;
            println!("created {created} genre(s)");
        }
        Commands::Sources { region } => {
            let sync = live_sync_from_env(db)?;
            let region = region
                .map(|r| r.to_ascii_uppercase())
                .unwrap_or_else(|| sync.region().to_string());
            let sources = sync.availability().all_sources(&region).await;
            println!("{}", serde_json::to_string_pretty(&sources)?);
        }
        Commands::Show { id } => match db.fetch_movie(&id).await? {
            Some(detail) => println!("{}", serde_json::to_string_pretty(&detail)?),
            None => bail!("movie {id} not found"),
        },
    }
    Ok(())
}
