use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::database_ops::providers::{AvailabilityApi, SourceRecord, SourceSummary};
use crate::database_ops::tmdb::provider::truncate_for_log;
use crate::util::env::{env_opt, env_parse, env_req};

#[derive(Debug, Clone)]
pub struct WatchmodeConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    /// Monthly or flat price per platform name, from `PLATFORM_PRICING`.
    pub pricing: HashMap<String, f64>,
}

impl WatchmodeConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: env_opt("WATCHMODE_BASE_URL")
                .unwrap_or_else(|| "https://api.watchmode.com/v1".to_string()),
            api_key: env_req("WATCHMODE_API_KEY")?,
            timeout_secs: env_parse("WATCHMODE_TIMEOUT_SECS", 15u64),
            pricing: env_opt("PLATFORM_PRICING")
                .map(|raw| parse_pricing_table(&raw))
                .unwrap_or_default(),
        })
    }
}

/// Parse `Name=price;Name=price`. Malformed entries are skipped with a warning.
pub fn parse_pricing_table(raw: &str) -> HashMap<String, f64> {
    let mut out = HashMap::new();
    for entry in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let parsed = entry
            .rsplit_once('=')
            .and_then(|(name, price)| Some((name.trim(), price.trim().parse::<f64>().ok()?)))
            .filter(|(name, price)| !name.is_empty() && price.is_finite() && *price >= 0.0);
        match parsed {
            Some((name, price)) => {
                out.insert(name.to_string(), price);
            }
            None => warn!(entry, "PLATFORM_PRICING: ignoring malformed entry"),
        }
    }
    out
}

/// Watchmode availability client.
///
/// Endpoints used:
/// - GET /search/?search_field=tmdb_movie_id&search_value=... - cross-reference
/// - GET /title/{id}/sources/?regions=.. - per-title sources
/// - GET /sources/?regions=.. - every source known for a region
///
/// Every request carries the `apiKey` query parameter.
#[derive(Debug, Clone)]
pub struct WatchmodeProvider {
    base_url: String,
    http: Client,
    api_key: String,
    pricing: HashMap<String, f64>,
}

// ---------- Watchmode API shapes (minimal) ----------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    title_results: Vec<TitleResult>,
}

#[derive(Debug, Deserialize)]
struct TitleResult {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TitleSource {
    source_id: i64,
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    region: Option<String>,
    web_url: Option<String>,
    price: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SourceEntry {
    id: i64,
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    regions: Vec<String>,
}

fn into_source_record(s: TitleSource) -> SourceRecord {
    SourceRecord {
        source_id: s.source_id,
        name: s.name,
        type_code: s.kind.unwrap_or_default(),
        region: s.region,
        web_url: s.web_url,
        price: s.price,
    }
}

fn into_source_summary(s: SourceEntry) -> SourceSummary {
    SourceSummary {
        id: s.id,
        name: s.name,
        type_code: s.kind.unwrap_or_default(),
        regions: s.regions,
    }
}

impl WatchmodeProvider {
    pub fn new(config: &WatchmodeConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent("movie-sync/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("watchmode: build http client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            api_key: config.api_key.clone(),
            pricing: config.pricing.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .header("Accept", "application/json")
            .query(&[("apiKey", self.api_key.as_str())])
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = truncate_for_log(resp.text().await.unwrap_or_default(), 2000);
            return Err(anyhow!("Watchmode request failed: {status} path={path} body={body}"));
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("Watchmode decode failed path={path}"))
    }
}

#[async_trait]
impl AvailabilityApi for WatchmodeProvider {
    async fn resolve_external_id(&self, catalog_id: i64) -> Option<i64> {
        let id = catalog_id.to_string();
        match self
            .get_json::<SearchResponse>(
                "/search/",
                &[("search_field", "tmdb_movie_id"), ("search_value", id.as_str())],
            )
            .await
        {
            Ok(resp) => resp.title_results.first().map(|t| t.id),
            Err(e) => {
                warn!(catalog_id, error = %e, "watchmode: cross-reference failed");
                None
            }
        }
    }

    async fn sources(&self, provider_id: i64, region: &str) -> Vec<SourceRecord> {
        match self
            .get_json::<Vec<TitleSource>>(
                &format!("/title/{provider_id}/sources/"),
                &[("regions", region)],
            )
            .await
        {
            Ok(rows) => {
                debug!(provider_id, region, rows = rows.len(), "watchmode: sources");
                rows.into_iter().map(into_source_record).collect()
            }
            Err(e) => {
                warn!(provider_id, region, error = %e, "watchmode: sources failed");
                Vec::new()
            }
        }
    }

    async fn platform_pricing(&self, platform_name: &str) -> Option<f64> {
        self.pricing.get(platform_name).copied()
    }

    async fn all_sources(&self, region: &str) -> Vec<SourceSummary> {
        match self
            .get_json::<Vec<SourceEntry>>("/sources/", &[("regions", region)])
            .await
        {
            Ok(rows) => rows.into_iter().map(into_source_summary).collect(),
            Err(e) => {
                warn!(region, error = %e, "watchmode: source listing failed");
                Vec::new()
            }
        }
    }
}
