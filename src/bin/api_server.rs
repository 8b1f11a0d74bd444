// HTTP API server binary for movie-sync

use anyhow::Result;
use movie_sync::api::ApiServer;
use movie_sync::util::env as env_util;
use movie_sync::{connect_from_env, live_sync_from_env, logging};

#[actix_web::main]
async fn main() -> Result<()> {
    env_util::init_env();
    logging::init_tracing("info,sqlx=warn")?;

    tracing::info!("initializing movie-sync API server");

    let server = ApiServer::from_env()?;
    let db = connect_from_env(None).await?;
    tracing::info!("database connected");

    let sync = live_sync_from_env(db)?;
    server.run(sync).await?;

    Ok(())
}
