// HTTP request handlers for API endpoints

use crate::api::models::*;
use crate::database_ops::db::Db;
use crate::database_ops::providers::{AvailabilityApi, CatalogApi};
use crate::database_ops::sync::MovieSync;
use actix_web::{web, HttpResponse, Result};

/// Health check endpoint
pub async fn health_check(db: web::Data<Db>) -> Result<HttpResponse> {
    let database = if db.ping().await {
        "connected"
    } else {
        tracing::warn!("health: database ping failed");
        "disconnected"
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        database: database.to_string(),
    })))
}

/// Synchronize one or more titles; each title commits or rolls back on its own.
pub async fn sync_titles<C, A>(
    payload: web::Json<SyncRequest>,
    sync: web::Data<MovieSync<C, A>>,
) -> Result<HttpResponse>
where
    C: CatalogApi + 'static,
    A: AvailabilityApi + 'static,
{
    let titles = payload.into_inner().into_titles();
    if titles.is_empty() {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::<()>::error("expected \"title\" or \"titles\"")));
    }
    tracing::info!(count = titles.len(), "sync requested");

    let results: Vec<SyncResult> = sync
        .sync_titles(&titles)
        .await
        .into_iter()
        .map(|(title, result)| match result {
            Ok(outcome) => SyncResult {
                title,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => SyncResult {
                title,
                outcome: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        let mut body = ApiResponse::success(results);
        body.success = false;
        body.error = Some(format!("{failed} title(s) failed to synchronize"));
        return Ok(HttpResponse::BadGateway().json(body));
    }
    Ok(HttpResponse::Ok().json(ApiResponse::success(results)))
}

/// Import the catalog genre vocabulary
pub async fn sync_genres<C, A>(sync: web::Data<MovieSync<C, A>>) -> Result<HttpResponse>
where
    C: CatalogApi + 'static,
    A: AvailabilityApi + 'static,
{
    match sync.sync_genre_vocabulary().await {
        Ok(created) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            serde_json::json!({ "genres_created": created }),
        ))),
        Err(e) => Ok(HttpResponse::BadGateway().json(ApiResponse::<()>::error(e.to_string()))),
    }
}

pub async fn list_movies(
    query: web::Query<MovieListQuery>,
    db: web::Data<Db>,
) -> Result<HttpResponse> {
    match db.list_movies(query.limit, query.offset).await {
        Ok(movies) => Ok(HttpResponse::Ok().json(ApiResponse::success(movies))),
        Err(e) => Ok(internal_error("list movies", e)),
    }
}

pub async fn get_movie(path: web::Path<String>, db: web::Data<Db>) -> Result<HttpResponse> {
    let id = path.into_inner();
    match db.fetch_movie(&id).await {
        Ok(Some(detail)) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail))),
        Ok(None) => Ok(HttpResponse::NotFound()
            .json(ApiResponse::<()>::error(format!("movie {id} not found")))),
        Err(e) => Ok(internal_error("fetch movie", e)),
    }
}

pub async fn list_platforms(db: web::Data<Db>) -> Result<HttpResponse> {
    match db.list_platforms().await {
        Ok(platforms) => Ok(HttpResponse::Ok().json(ApiResponse::success(platforms))),
        Err(e) => Ok(internal_error("list platforms", e)),
    }
}

/// Every source the availability provider lists for a region
pub async fn list_sources<C, A>(
    query: web::Query<SourcesQuery>,
    sync: web::Data<MovieSync<C, A>>,
) -> Result<HttpResponse>
where
    C: CatalogApi + 'static,
    A: AvailabilityApi + 'static,
{
    let region = query
        .region
        .as_deref()
        .map(|r| r.trim().to_ascii_uppercase())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| sync.region().to_string());
    let sources = sync.availability().all_sources(&region).await;
    Ok(HttpResponse::Ok().json(ApiResponse::success(sources)))
}

fn internal_error(what: &str, e: anyhow::Error) -> HttpResponse {
    tracing::error!(error = %e, "{what} failed");
    HttpResponse::InternalServerError().json(ApiResponse::<()>::error(format!("{what} failed")))
}
