//! Title synchronization: catalog lookup, then genres, movie and platforms
//! written in one transaction.
//!
//! Flow per title:
//! 1. catalog search, 2. detail fetch (either missing ends the run quietly),
//! 3. begin transaction, 4. movie upsert, 5. genre reconciliation,
//! 6. availability lookup (no cross-reference ends the run quietly, nothing
//! kept), 7. platform reconciliation, 8. commit.
//!
//! The transaction guard rolls back on drop, so every early return between
//! steps 3 and 8 leaves the store untouched.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::AnyConnection;
use tracing::{debug, error, info, instrument, warn};

use crate::database_ops::db::Db;
use crate::database_ops::movies;
use crate::database_ops::providers::{AvailabilityApi, CatalogApi, CatalogMovie};
use crate::error::SyncError;
use crate::normalization::catalog::{distinct_genres, movie_from_catalog};
use crate::normalization::platform::{
    dedupe_sources, movie_platform_from_source, near_duplicates, platform_from_source,
};
use crate::util::env::env_opt;

/// Region used for availability lookups when none is configured.
pub const DEFAULT_REGION: &str = "US";

#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub region: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
        }
    }
}

impl SyncConfig {
    pub fn from_env() -> Self {
        let region = env_opt("SYNC_REGION")
            .map(|r| r.trim().to_ascii_uppercase())
            .filter(|r| r.len() == 2)
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        Self { region }
    }
}

/// Lookup stage at which a title dropped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStage {
    Search,
    Details,
    CrossReference,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub movie_id: String,
    pub title: String,
    pub genres_created: usize,
    pub genre_links_created: usize,
    pub platforms_created: usize,
    pub platform_links_created: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    NotFound { stage: MissingStage },
    Synced(SyncReport),
}

pub struct MovieSync<C, A> {
    db: Db,
    catalog: C,
    availability: A,
    config: SyncConfig,
}

impl<C, A> MovieSync<C, A>
where
    C: CatalogApi,
    A: AvailabilityApi,
{
    pub fn new(db: Db, catalog: C, availability: A, config: SyncConfig) -> Self {
        Self {
            db,
            catalog,
            availability,
            config,
        }
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn availability(&self) -> &A {
        &self.availability
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Synchronize one title. Missing catalog data is a quiet `NotFound`;
    /// any store failure rolls the whole run back and is returned.
    #[instrument(skip(self))]
    pub async fn sync_title(&self, title: &str) -> Result<SyncOutcome, SyncError> {
        let Some(hit) = self.catalog.search_by_title(title).await else {
            warn!(title, "sync: no catalog match");
            return Ok(SyncOutcome::NotFound {
                stage: MissingStage::Search,
            });
        };
        let Some(details) = self.catalog.movie_details(hit.id).await else {
            warn!(title, catalog_id = hit.id, "sync: catalog details missing");
            return Ok(SyncOutcome::NotFound {
                stage: MissingStage::Details,
            });
        };

        let mut tx = self
            .db
            .pool
            .begin()
            .await
            .map_err(|e| SyncError::persistence(title, e))?;

        let report = match self.reconcile(&mut tx, &details).await {
            Ok(Some(report)) => report,
            Ok(None) => {
                warn!(
                    title,
                    catalog_id = details.id,
                    "sync: no availability cross-reference; discarding run"
                );
                return Ok(SyncOutcome::NotFound {
                    stage: MissingStage::CrossReference,
                });
            }
            Err(e) => {
                error!(title, error = %e, "sync: failed; rolling back");
                return Err(SyncError::persistence(title, e));
            }
        };

        if let Err(e) = tx.commit().await {
            error!(title, error = %e, "sync: commit failed");
            return Err(SyncError::persistence(title, e));
        }

        info!(
            title,
            movie_id = %report.movie_id,
            genres_created = report.genres_created,
            genre_links_created = report.genre_links_created,
            platforms_created = report.platforms_created,
            platform_links_created = report.platform_links_created,
            "sync: synced"
        );
        Ok(SyncOutcome::Synced(report))
    }

    /// Synchronize several titles one after another; each is its own unit.
    pub async fn sync_titles(
        &self,
        titles: &[String],
    ) -> Vec<(String, Result<SyncOutcome, SyncError>)> {
        let mut out = Vec::with_capacity(titles.len());
        for title in titles {
            let title = title.trim();
            if title.is_empty() {
                continue;
            }
            out.push((title.to_string(), self.sync_title(title).await));
        }
        out
    }

    /// Create genre rows for every catalog genre name not yet stored.
    #[instrument(skip(self))]
    pub async fn sync_genre_vocabulary(&self) -> Result<usize, SyncError> {
        let genres = distinct_genres(&self.catalog.genre_vocabulary().await);
        if genres.is_empty() {
            warn!("sync: catalog returned no genres");
            return Ok(0);
        }
        let mut tx = self
            .db
            .pool
            .begin()
            .await
            .map_err(|source| SyncError::Vocabulary { source })?;
        let names: Vec<String> = genres.iter().map(|g| g.name.clone()).collect();
        let existing = movies::find_genres_by_name(&mut tx, &names)
            .await
            .map_err(|source| SyncError::Vocabulary { source })?;
        let known: HashSet<&str> = existing.iter().map(|g| g.name.as_str()).collect();

        let mut created = 0;
        for genre in genres.iter().filter(|g| !known.contains(g.name.as_str())) {
            if movies::insert_genre(&mut tx, genre)
                .await
                .map_err(|source| SyncError::Vocabulary { source })?
            {
                created += 1;
            }
        }
        tx.commit()
            .await
            .map_err(|source| SyncError::Vocabulary { source })?;
        info!(created, total = genres.len(), "sync: genre vocabulary imported");
        Ok(created)
    }

    /// `Ok(None)` when the availability provider has no cross-reference;
    /// the caller must not commit.
    async fn reconcile(
        &self,
        conn: &mut AnyConnection,
        details: &CatalogMovie,
    ) -> Result<Option<SyncReport>, sqlx::Error> {
        let movie = movie_from_catalog(details);
        movies::upsert_movie(conn, &movie).await?;

        let mut report = SyncReport {
            movie_id: movie.id.clone(),
            title: movie.title.clone(),
            ..SyncReport::default()
        };
        self.reconcile_genres(conn, &movie.id, details, &mut report)
            .await?;

        let Some(provider_id) = self.availability.resolve_external_id(details.id).await else {
            return Ok(None);
        };
        self.reconcile_platforms(conn, &movie.id, provider_id, &mut report)
            .await?;
        Ok(Some(report))
    }

    async fn reconcile_genres(
        &self,
        conn: &mut AnyConnection,
        movie_id: &str,
        details: &CatalogMovie,
        report: &mut SyncReport,
    ) -> Result<(), sqlx::Error> {
        let incoming = distinct_genres(&details.genres);
        if incoming.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = incoming.iter().map(|g| g.name.clone()).collect();
        let mut linked = movies::find_genres_by_name(conn, &names).await?;
        let known: HashSet<String> = linked.iter().map(|g| g.name.clone()).collect();

        for genre in incoming.into_iter().filter(|g| !known.contains(&g.name)) {
            if movies::insert_genre(conn, &genre).await? {
                report.genres_created += 1;
                linked.push(genre);
                continue;
            }
            // Id taken under another name: link the stored row.
            match movies::find_genre_by_id(conn, &genre.id).await? {
                Some(stored) => {
                    warn!(
                        genre_id = %genre.id,
                        incoming = %genre.name,
                        stored = %stored.name,
                        "genre id already stored under a different name"
                    );
                    if !linked.iter().any(|g| g.id == stored.id) {
                        linked.push(stored);
                    }
                }
                None => warn!(genre_id = %genre.id, name = %genre.name, "genre insert skipped"),
            }
        }

        for genre in &linked {
            if movies::link_movie_genre(conn, movie_id, &genre.id).await? {
                report.genre_links_created += 1;
            }
        }
        Ok(())
    }

    async fn reconcile_platforms(
        &self,
        conn: &mut AnyConnection,
        movie_id: &str,
        provider_id: i64,
        report: &mut SyncReport,
    ) -> Result<(), sqlx::Error> {
        let sources = dedupe_sources(
            self.availability
                .sources(provider_id, &self.config.region)
                .await,
        );
        if sources.is_empty() {
            debug!(provider_id, region = %self.config.region, "no availability sources");
            return Ok(());
        }
        let names: Vec<String> = sources.iter().map(|s| s.name.clone()).collect();
        let mut by_name: HashMap<String, String> = movies::find_platforms_by_name(conn, &names)
            .await?
            .into_iter()
            .map(|p| (p.name, p.id))
            .collect();
        let mut all_names: Option<Vec<String>> = None;

        for source in &sources {
            let platform_id = match by_name.get(&source.name).cloned() {
                Some(id) => id,
                None => {
                    let platform = platform_from_source(source, uuid::Uuid::new_v4().to_string());
                    if all_names.is_none() {
                        all_names = Some(movies::platform_names(conn).await?);
                    }
                    let similar = near_duplicates(&platform.name, all_names.as_deref().unwrap_or(&[]));
                    if !similar.is_empty() {
                        warn!(
                            name = %platform.name,
                            similar = ?similar,
                            "creating platform whose name resembles an existing one"
                        );
                    }
                    movies::insert_platform(conn, &platform).await?;
                    report.platforms_created += 1;
                    if let Some(names) = all_names.as_mut() {
                        names.push(platform.name.clone());
                    }
                    by_name.insert(platform.name.clone(), platform.id.clone());
                    platform.id
                }
            };

            if movies::movie_platform_exists(conn, movie_id, &platform_id).await? {
                continue;
            }
            let price = self.availability.platform_pricing(&source.name).await;
            let link = movie_platform_from_source(movie_id, &platform_id, source, price);
            movies::insert_movie_platform(conn, &link).await?;
            report.platform_links_created += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_ops::providers::{
        CatalogGenre, CatalogMatch, SourceRecord, SourceSummary,
    };
    use crate::models::PlatformType;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeCatalog {
        movies: Vec<CatalogMovie>,
        vocabulary: Vec<CatalogGenre>,
        searches: AtomicUsize,
        hide_details: bool,
    }

    #[async_trait]
    impl CatalogApi for FakeCatalog {
        async fn search_by_title(&self, title: &str) -> Option<CatalogMatch> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            self.movies
                .iter()
                .find(|m| m.title.eq_ignore_ascii_case(title))
                .map(|m| CatalogMatch {
                    id: m.id,
                    title: m.title.clone(),
                })
        }

        async fn movie_details(&self, catalog_id: i64) -> Option<CatalogMovie> {
            if self.hide_details {
                return None;
            }
            self.movies.iter().find(|m| m.id == catalog_id).cloned()
        }

        async fn genre_vocabulary(&self) -> Vec<CatalogGenre> {
            self.vocabulary.clone()
        }
    }

    #[derive(Default)]
    struct FakeAvailability {
        cross_refs: HashMap<i64, i64>,
        sources: HashMap<i64, Vec<SourceRecord>>,
        prices: HashMap<String, f64>,
    }

    #[async_trait]
    impl AvailabilityApi for FakeAvailability {
        async fn resolve_external_id(&self, catalog_id: i64) -> Option<i64> {
            self.cross_refs.get(&catalog_id).copied()
        }

        async fn sources(&self, provider_id: i64, _region: &str) -> Vec<SourceRecord> {
            self.sources.get(&provider_id).cloned().unwrap_or_default()
        }

        async fn platform_pricing(&self, platform_name: &str) -> Option<f64> {
            self.prices.get(platform_name).copied()
        }

        async fn all_sources(&self, _region: &str) -> Vec<SourceSummary> {
            Vec::new()
        }
    }

    fn genre(id: i64, name: &str) -> CatalogGenre {
        CatalogGenre {
            id,
            name: name.to_string(),
        }
    }

    fn source(name: &str, code: &str) -> SourceRecord {
        SourceRecord {
            source_id: 203,
            name: name.to_string(),
            type_code: code.to_string(),
            region: Some("US".into()),
            web_url: Some(format!("https://{}.example/{code}", name.to_lowercase())),
            price: None,
        }
    }

    fn inception() -> CatalogMovie {
        CatalogMovie {
            id: 27205,
            title: "Inception".into(),
            overview: Some("Cobb steals secrets from dreams.".into()),
            poster_path: Some("/inception.jpg".into()),
            release_date: Some("2010-07-15".into()),
            release_year: Some(2010),
            vote_average: Some(8.4),
            genres: vec![genre(28, "Action"), genre(878, "Science Fiction")],
        }
    }

    fn inception_availability(sources: Vec<SourceRecord>) -> FakeAvailability {
        FakeAvailability {
            cross_refs: HashMap::from([(27205, 337401)]),
            sources: HashMap::from([(337401, sources)]),
            prices: HashMap::new(),
        }
    }

    async fn engine(
        catalog: FakeCatalog,
        availability: FakeAvailability,
    ) -> MovieSync<FakeCatalog, FakeAvailability> {
        let db = Db::in_memory().await.unwrap();
        MovieSync::new(db, catalog, availability, SyncConfig::default())
    }

    async fn count(db: &Db, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&db.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn inception_scenario_creates_movie_genres_and_platform() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, inception_availability(vec![source("Netflix", "sub")])).await;

        let outcome = sync.sync_title("Inception").await.unwrap();
        let SyncOutcome::Synced(report) = outcome else {
            panic!("expected synced outcome");
        };
        assert_eq!(report.movie_id, "27205");
        assert_eq!(report.genres_created, 2);
        assert_eq!(report.genre_links_created, 2);
        assert_eq!(report.platforms_created, 1);
        assert_eq!(report.platform_links_created, 1);

        let detail = sync.db().fetch_movie("27205").await.unwrap().unwrap();
        assert_eq!(detail.movie.external_id, 27205);
        assert_eq!(detail.movie.release_year, Some(2010));
        let genre_ids: Vec<&str> = detail.genres.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(genre_ids, vec!["28", "878"]);
        assert_eq!(detail.platforms.len(), 1);
        assert_eq!(detail.platforms[0].name, "Netflix");
        assert_eq!(detail.platforms[0].kind, PlatformType::Subscription);
        assert_eq!(detail.platforms[0].price, 0.0);

        let platforms = sync.db().list_platforms().await.unwrap();
        assert_eq!(platforms[0].kind, PlatformType::Subscription);
    }

    #[tokio::test]
    async fn resync_is_idempotent() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(
            catalog,
            inception_availability(vec![source("Netflix", "sub"), source("Apple TV", "rent")]),
        )
        .await;

        sync.sync_title("Inception").await.unwrap();
        let second = sync.sync_title("Inception").await.unwrap();

        let SyncOutcome::Synced(report) = second else {
            panic!("expected synced outcome");
        };
        assert_eq!(report.genres_created, 0);
        assert_eq!(report.genre_links_created, 0);
        assert_eq!(report.platforms_created, 0);
        assert_eq!(report.platform_links_created, 0);

        let db = sync.db();
        assert_eq!(count(db, "movies").await, 1);
        assert_eq!(count(db, "genres").await, 2);
        assert_eq!(count(db, "movie_genres").await, 2);
        assert_eq!(count(db, "platforms").await, 2);
        assert_eq!(count(db, "movie_platforms").await, 2);
    }

    #[tokio::test]
    async fn existing_genres_and_platforms_are_reused_by_name() {
        let mut heat = inception();
        heat.id = 949;
        heat.title = "Heat".into();
        heat.genres = vec![genre(28, "Action"), genre(80, "Crime")];
        let catalog = FakeCatalog {
            movies: vec![inception(), heat],
            ..FakeCatalog::default()
        };
        let mut availability = inception_availability(vec![source("Netflix", "sub")]);
        availability.cross_refs.insert(949, 1001);
        availability
            .sources
            .insert(1001, vec![source("Netflix", "sub")]);
        let sync = engine(catalog, availability).await;

        sync.sync_title("Inception").await.unwrap();
        let SyncOutcome::Synced(report) = sync.sync_title("Heat").await.unwrap() else {
            panic!("expected synced outcome");
        };
        assert_eq!(report.genres_created, 1);
        assert_eq!(report.genre_links_created, 2);
        assert_eq!(report.platforms_created, 0);
        assert_eq!(report.platform_links_created, 1);

        let db = sync.db();
        assert_eq!(count(db, "genres").await, 3);
        assert_eq!(count(db, "platforms").await, 1);
        assert_eq!(count(db, "movie_platforms").await, 2);
    }

    #[tokio::test]
    async fn failed_platform_link_rolls_back_everything() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, inception_availability(vec![source("Netflix", "sub")])).await;
        sqlx::raw_sql(
            "CREATE TRIGGER reject_platform_links BEFORE INSERT ON movie_platforms
             BEGIN SELECT RAISE(ABORT, 'platform link rejected'); END;",
        )
        .execute(&sync.db().pool)
        .await
        .unwrap();

        let err = sync.sync_title("Inception").await.unwrap_err();
        let SyncError::Persistence { title, .. } = &err else {
            panic!("expected persistence error, got {err:?}");
        };
        assert_eq!(title, "Inception");
        assert!(err.to_string().contains("Inception"));

        let db = sync.db();
        for table in ["movies", "genres", "movie_genres", "platforms", "movie_platforms"] {
            assert_eq!(count(db, table).await, 0, "{table} should be empty");
        }
    }

    #[tokio::test]
    async fn subscription_row_wins_over_purchase_row() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(
            catalog,
            inception_availability(vec![source("X", "buy"), source("X", "sub")]),
        )
        .await;

        sync.sync_title("Inception").await.unwrap();
        let detail = sync.db().fetch_movie("27205").await.unwrap().unwrap();
        assert_eq!(detail.platforms.len(), 1);
        assert_eq!(detail.platforms[0].kind, PlatformType::Subscription);
        assert_eq!(detail.platforms[0].link_url.as_deref(), Some("https://x.example/sub"));
    }

    #[tokio::test]
    async fn resolved_price_is_stored_and_missing_price_is_zero() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let mut availability = inception_availability(vec![
            source("Netflix", "sub"),
            source("Tubi", "free"),
            source("Vudu", "tvod"),
        ]);
        availability.prices.insert("Netflix".into(), 15.49);
        let sync = engine(catalog, availability).await;

        sync.sync_title("Inception").await.unwrap();
        let detail = sync.db().fetch_movie("27205").await.unwrap().unwrap();
        let by_name: HashMap<&str, (f64, PlatformType)> = detail
            .platforms
            .iter()
            .map(|p| (p.name.as_str(), (p.price, p.kind)))
            .collect();
        assert_eq!(by_name["Netflix"], (15.49, PlatformType::Subscription));
        assert_eq!(by_name["Tubi"], (0.0, PlatformType::Free));
        assert_eq!(by_name["Vudu"], (0.0, PlatformType::Other));
    }

    #[tokio::test]
    async fn unknown_title_writes_nothing() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, FakeAvailability::default()).await;

        let outcome = sync.sync_title("Nonexistent Film 12345").await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::NotFound {
                stage: MissingStage::Search
            }
        );
        assert_eq!(count(sync.db(), "movies").await, 0);
        assert_eq!(count(sync.db(), "genres").await, 0);
    }

    #[tokio::test]
    async fn missing_cross_reference_writes_nothing() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, FakeAvailability::default()).await;

        let outcome = sync.sync_title("Inception").await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::NotFound {
                stage: MissingStage::CrossReference
            }
        );
        let db = sync.db();
        for table in ["movies", "genres", "movie_genres", "platforms", "movie_platforms"] {
            assert_eq!(count(db, table).await, 0, "{table} should be empty");
        }
    }

    #[tokio::test]
    async fn missing_details_writes_nothing() {
        let mut catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        catalog.hide_details = true;
        let sync = engine(catalog, inception_availability(vec![source("Netflix", "sub")])).await;

        let outcome = sync.sync_title("Inception").await.unwrap();
        assert_eq!(
            outcome,
            SyncOutcome::NotFound {
                stage: MissingStage::Details
            }
        );
        let db = sync.db();
        for table in ["movies", "genres", "movie_genres", "platforms", "movie_platforms"] {
            assert_eq!(count(db, table).await, 0, "{table} should be empty");
        }
    }

    #[tokio::test]
    async fn provider_price_is_used_when_pricing_table_has_none() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let mut itunes = source("iTunes", "buy");
        itunes.price = Some(14.99);
        let mut netflix = source("Netflix", "sub");
        netflix.price = Some(3.0);
        let mut availability = inception_availability(vec![itunes, netflix]);
        availability.prices.insert("Netflix".into(), 15.49);
        let sync = engine(catalog, availability).await;

        sync.sync_title("Inception").await.unwrap();
        let detail = sync.db().fetch_movie("27205").await.unwrap().unwrap();
        let by_name: HashMap<&str, (f64, PlatformType)> = detail
            .platforms
            .iter()
            .map(|p| (p.name.as_str(), (p.price, p.kind)))
            .collect();
        assert_eq!(by_name["iTunes"], (14.99, PlatformType::Purchase));
        assert_eq!(by_name["Netflix"], (15.49, PlatformType::Subscription));
    }

    #[tokio::test]
    async fn reused_genre_id_links_the_stored_genre() {
        let mut renamed = inception();
        renamed.genres = vec![genre(28, "Action & Adventure")];
        let catalog = FakeCatalog {
            movies: vec![renamed],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, inception_availability(Vec::new())).await;
        sqlx::raw_sql("INSERT INTO genres (id, name) VALUES ('28', 'Action')")
            .execute(&sync.db().pool)
            .await
            .unwrap();

        let SyncOutcome::Synced(report) = sync.sync_title("Inception").await.unwrap() else {
            panic!("expected synced outcome");
        };
        assert_eq!(report.genres_created, 0);
        assert_eq!(report.genre_links_created, 1);
        let detail = sync.db().fetch_movie("27205").await.unwrap().unwrap();
        assert_eq!(detail.genres.len(), 1);
        assert_eq!(detail.genres[0].name, "Action");
        assert_eq!(count(sync.db(), "genres").await, 1);
    }

    #[tokio::test]
    async fn batch_sync_reports_each_title() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, inception_availability(Vec::new())).await;

        let results = sync
            .sync_titles(&["Inception".into(), "  ".into(), "Unknown".into()])
            .await;
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Ok(SyncOutcome::Synced(_))));
        assert!(matches!(
            results[1].1,
            Ok(SyncOutcome::NotFound {
                stage: MissingStage::Search
            })
        ));
        assert_eq!(sync.catalog.searches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn genre_vocabulary_only_adds_unseen_names() {
        let catalog = FakeCatalog {
            movies: vec![inception()],
            vocabulary: vec![genre(28, "Action"), genre(35, "Comedy"), genre(18, "Drama")],
            ..FakeCatalog::default()
        };
        let sync = engine(catalog, inception_availability(Vec::new())).await;
        sync.sync_title("Inception").await.unwrap();

        assert_eq!(sync.sync_genre_vocabulary().await.unwrap(), 2);
        assert_eq!(sync.sync_genre_vocabulary().await.unwrap(), 0);
        assert_eq!(count(sync.db(), "genres").await, 4);
    }

    #[test]
    fn region_defaults_to_two_letter_code() {
        assert_eq!(SyncConfig::default().region, DEFAULT_REGION);
        assert_eq!(DEFAULT_REGION.len(), 2);
    }
}
