//! Seams between the reconciliation engine and the two metadata providers.
//!
//! Both traits are infallible: implementations log network and decoding
//! failures and hand back `None` or an empty list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Best search hit for a title query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMatch {
    pub id: i64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGenre {
    pub id: i64,
    pub name: String,
}

/// Full catalog record for one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogMovie {
    pub id: i64,
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    /// Raw release date as the provider formatted it.
    pub release_date: Option<String>,
    /// Best-effort parse of `release_date`; `None` when unparsable.
    pub release_year: Option<i32>,
    pub vote_average: Option<f64>,
    pub genres: Vec<CatalogGenre>,
}

/// One availability row for a title in a region, as the provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source_id: i64,
    pub name: String,
    /// Raw commercial type code ("sub", "rent", "buy", "free", ...).
    pub type_code: String,
    pub region: Option<String>,
    pub web_url: Option<String>,
    pub price: Option<f64>,
}

/// Entry of the provider's global source listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    pub id: i64,
    pub name: String,
    pub type_code: String,
    pub regions: Vec<String>,
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Highest-ranked match for `title`, or `None` when nothing matches.
    async fn search_by_title(&self, title: &str) -> Option<CatalogMatch>;

    async fn movie_details(&self, catalog_id: i64) -> Option<CatalogMovie>;

    async fn genre_vocabulary(&self) -> Vec<CatalogGenre>;
}

#[async_trait]
pub trait AvailabilityApi: Send + Sync {
    /// Provider-specific title id cross-referenced from a catalog id.
    async fn resolve_external_id(&self, catalog_id: i64) -> Option<i64>;

    async fn sources(&self, provider_id: i64, region: &str) -> Vec<SourceRecord>;

    async fn platform_pricing(&self, platform_name: &str) -> Option<f64>;

    async fn all_sources(&self, region: &str) -> Vec<SourceSummary>;
}
