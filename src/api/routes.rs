// API route configuration

use crate::api::handlers;
use crate::database_ops::providers::{AvailabilityApi, CatalogApi};
use actix_web::web;

/// Mount every route. `C` and `A` are the provider types held by the
/// `MovieSync` registered as app data.
pub fn configure_routes<C, A>(cfg: &mut web::ServiceConfig)
where
    C: CatalogApi + 'static,
    A: AvailabilityApi + 'static,
{
    cfg
        // Health check (no auth required)
        .route("/health", web::get().to(handlers::health_check))
        // API v1 routes (all require authentication)
        .service(
            web::scope("/api/v1")
                // Synchronization
                .route("/sync", web::post().to(handlers::sync_titles::<C, A>))
                .route("/genres/sync", web::post().to(handlers::sync_genres::<C, A>))
                // Stored data
                .route("/movies", web::get().to(handlers::list_movies))
                .route("/movies/{id}", web::get().to(handlers::get_movie))
                .route("/platforms", web::get().to(handlers::list_platforms))
                // Provider passthrough
                .route("/sources", web::get().to(handlers::list_sources::<C, A>)),
        );
}
