// Local persisted entities (rows of the movie store)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Commercial model a platform offers a title under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformType {
    Subscription,
    Rental,
    Purchase,
    Free,
    Other,
}

impl PlatformType {
    /// Stable text form stored in the `kind` columns.
    pub fn as_str(self) -> &'static str {
        match self {
            PlatformType::Subscription => "subscription",
            PlatformType::Rental => "rental",
            PlatformType::Purchase => "purchase",
            PlatformType::Free => "free",
            PlatformType::Other => "other",
        }
    }

    /// Inverse of `as_str`; unknown column values read back as `Other`.
    pub fn from_column(raw: &str) -> Self {
        match raw {
            "subscription" => PlatformType::Subscription,
            "rental" => PlatformType::Rental,
            "purchase" => PlatformType::Purchase,
            "free" => PlatformType::Free,
            _ => PlatformType::Other,
        }
    }
}

impl fmt::Display for PlatformType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// String form of `external_id`.
    pub id: String,
    pub external_id: i64,
    pub title: String,
    pub synopsis: Option<String>,
    pub release_year: Option<i32>,
    pub poster_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: String,
    pub name: String,
    pub kind: PlatformType,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePlatform {
    pub movie_id: String,
    pub platform_id: String,
    pub kind: PlatformType,
    pub price: f64,
    pub link_url: Option<String>,
}

/// A platform association joined with its platform name, for read paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformListing {
    pub platform_id: String,
    pub name: String,
    pub kind: PlatformType,
    pub price: f64,
    pub link_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub synced_at: String,
    pub genres: Vec<Genre>,
    pub platforms: Vec<PlatformListing>,
}
