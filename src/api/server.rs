// API server implementation using actix-web

use crate::api::{auth, middleware, routes};
use crate::database_ops::tmdb::TmdbProvider;
use crate::database_ops::watchmode::WatchmodeProvider;
use crate::database_ops::LiveSync;
use crate::util::env::{env_opt, env_req, init_env};
use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};

pub struct ApiServer {
    pub host: String,
    pub port: u16,
    pub api_secret: String,
    pub allowed_origins: String,
}

impl ApiServer {
    /// Create server from environment variables
    pub fn from_env() -> Result<Self> {
        init_env();

        let host = env_opt("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = env_opt("API_PORT")
            .map(|raw| raw.trim().parse())
            .transpose()
            .context("Invalid API_PORT")?
            .unwrap_or(8080);
        let api_secret = env_req("API_SECRET").context("API_SECRET is required")?;
        let allowed_origins = env_opt("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000,http://localhost:8000".to_string());

        Ok(Self {
            host,
            port,
            api_secret,
            allowed_origins,
        })
    }

    /// Start the HTTP server
    pub async fn run(self, sync: LiveSync) -> Result<()> {
        let bind_addr = format!("{}:{}", self.host, self.port);

        tracing::info!(
            host = %self.host,
            port = %self.port,
            region = %sync.region(),
            "starting movie-sync API server"
        );

        let db_data = web::Data::new(sync.db().clone());
        let sync_data = web::Data::new(sync);
        let api_secret = self.api_secret.clone();
        let allowed_origins = self.allowed_origins.clone();

        HttpServer::new(move || {
            let (logger, compress) = middleware::setup_middleware();
            let cors = middleware::setup_cors(&allowed_origins);
            let auth = auth::Auth::new(api_secret.clone());

            App::new()
                .app_data(db_data.clone())
                .app_data(sync_data.clone())
                .wrap(auth)
                .wrap(cors)
                .wrap(compress)
                .wrap(logger)
                .configure(routes::configure_routes::<TmdbProvider, WatchmodeProvider>)
        })
        .bind(&bind_addr)
        .with_context(|| format!("Failed to bind to {}", bind_addr))?
        .run()
        .await
        .context("HTTP server error")?;

        Ok(())
    }
}
