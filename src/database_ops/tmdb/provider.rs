use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use crate::database_ops::providers::{CatalogApi, CatalogGenre, CatalogMatch, CatalogMovie};
use crate::normalization::release::parse_release_year;
use crate::util::env::{env_opt, env_parse, env_req};

pub(crate) fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub base_url: String,
    pub api_token: String,
    pub language: String,
    pub timeout_secs: u64,
}

impl TmdbConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env_opt("TMDB_BASE_URL")
                .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string()),
            api_token: env_req("TMDB_API_TOKEN")?,
            language: env_opt("TMDB_LANGUAGE").unwrap_or_else(|| "en-US".to_string()),
            timeout_secs: env_parse("TMDB_TIMEOUT_SECS", 15u64),
        })
    }
}

/// TMDB catalog client.
///
/// Endpoints used:
/// - GET /search/movie?query=... - ranked title search
/// - GET /movie/{id} - detail record with genres
/// - GET /genre/movie/list - genre vocabulary
///
/// Every request carries the bearer token and the configured `language`.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    base_url: String,
    http: Client,
    api_token: String,
    language: String,
}

// ---------- TMDB API shapes (minimal) ----------

#[derive(Debug, Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: i64,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    id: i64,
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    release_date: Option<String>,
    vote_average: Option<f64>,
    #[serde(default)]
    genres: Vec<GenreEntry>,
}

#[derive(Debug, Deserialize)]
struct GenreEntry {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<GenreEntry>,
}

fn first_match(page: SearchPage) -> Option<CatalogMatch> {
    page.results.into_iter().next().map(|r| CatalogMatch {
        id: r.id,
        title: r.title.unwrap_or_default(),
    })
}

fn into_catalog_genre(g: GenreEntry) -> CatalogGenre {
    CatalogGenre {
        id: g.id,
        name: g.name,
    }
}

fn into_catalog_movie(d: MovieDetails) -> CatalogMovie {
    let release_year = d.release_date.as_deref().and_then(parse_release_year);
    CatalogMovie {
        id: d.id,
        title: d.title.unwrap_or_default(),
        overview: d.overview,
        poster_path: d.poster_path,
        release_date: d.release_date,
        release_year,
        vote_average: d.vote_average,
        genres: d.genres.into_iter().map(into_catalog_genre).collect(),
    }
}

impl TmdbProvider {
    pub fn new(config: &TmdbConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("movie-sync/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("tmdb: build http client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            api_token: config.api_token.clone(),
            language: config.language.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Accept", "application/json")
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = truncate_for_log(resp.text().await.unwrap_or_default(), 2000);
            return Err(anyhow!("TMDB request failed: {status} url={url} body={body}"));
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("TMDB decode failed url={url}"))
    }
}

#[async_trait]
impl CatalogApi for TmdbProvider {
    async fn search_by_title(&self, title: &str) -> Option<CatalogMatch> {
        match self
            .get_json::<SearchPage>("/search/movie", &[("query", title)])
            .await
        {
            Ok(page) => {
                debug!(title, results = page.results.len(), "tmdb: search");
                first_match(page)
            }
            Err(e) => {
                warn!(title, error = %e, "tmdb: search failed");
                None
            }
        }
    }

    async fn movie_details(&self, catalog_id: i64) -> Option<CatalogMovie> {
        match self
            .get_json::<MovieDetails>(&format!("/movie/{catalog_id}"), &[])
            .await
        {
            Ok(details) => Some(into_catalog_movie(details)),
            Err(e) => {
                warn!(catalog_id, error = %e, "tmdb: detail fetch failed");
                None
            }
        }
    }

    async fn genre_vocabulary(&self) -> Vec<CatalogGenre> {
        match self.get_json::<GenreList>("/genre/movie/list", &[]).await {
            Ok(list) => list.genres.into_iter().map(into_catalog_genre).collect(),
            Err(e) => {
                warn!(error = %e, "tmdb: genre list failed");
                Vec::new()
            }
        }
    }
}
