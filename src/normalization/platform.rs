use std::collections::HashMap;

use strsim::jaro_winkler;

use crate::database_ops::providers::SourceRecord;
use crate::models::{MoviePlatform, Platform, PlatformType};

/// Minimum similarity score (Jaro-Winkler) at which two differently spelled
/// platform names are reported as a likely duplicate.
pub const MIN_PLATFORM_SIMILARITY: f64 = 0.92;

/// Total mapping from the availability provider's type codes.
pub fn platform_type_from_code(code: &str) -> PlatformType {
    match code.trim().to_ascii_lowercase().as_str() {
        "sub" => PlatformType::Subscription,
        "rent" => PlatformType::Rental,
        "buy" => PlatformType::Purchase,
        "free" => PlatformType::Free,
        _ => PlatformType::Other,
    }
}

/// Dedup rank of a raw type code; lower wins.
pub fn type_priority(code: &str) -> u8 {
    match platform_type_from_code(code) {
        PlatformType::Subscription => 1,
        PlatformType::Free => 2,
        PlatformType::Rental => 3,
        PlatformType::Purchase => 4,
        PlatformType::Other => 5,
    }
}

/// Collapse rows sharing a platform name into the single best-ranked row.
///
/// Output keeps the order in which names first appeared; on equal rank the
/// earlier row stays.
pub fn dedupe_sources(records: Vec<SourceRecord>) -> Vec<SourceRecord> {
    let mut slot_by_name: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<SourceRecord> = Vec::with_capacity(records.len());
    for mut record in records {
        record.name = record.name.trim().to_string();
        if record.name.is_empty() {
            continue;
        }
        match slot_by_name.get(&record.name) {
            Some(&idx) => {
                if type_priority(&record.type_code) < type_priority(&out[idx].type_code) {
                    out[idx] = record;
                }
            }
            None => {
                slot_by_name.insert(record.name.clone(), out.len());
                out.push(record);
            }
        }
    }
    out
}

/// New shared platform row for a source not seen before.
pub fn platform_from_source(record: &SourceRecord, id: String) -> Platform {
    Platform {
        id,
        name: record.name.trim().to_string(),
        kind: platform_type_from_code(&record.type_code),
        link_url: None,
    }
}

/// Movie–platform association; the type is a snapshot of this row's code.
///
/// `price` from the pricing lookup wins over the row's own price; zero when
/// neither is known.
pub fn movie_platform_from_source(
    movie_id: &str,
    platform_id: &str,
    record: &SourceRecord,
    price: Option<f64>,
) -> MoviePlatform {
    MoviePlatform {
        movie_id: movie_id.to_string(),
        platform_id: platform_id.to_string(),
        kind: platform_type_from_code(&record.type_code),
        price: price.or(record.price).unwrap_or(0.0),
        link_url: record.web_url.clone().filter(|u| !u.trim().is_empty()),
    }
}

/// Canonicalized platform key used for fuzzy comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformKey {
    normalized: String,
    numeric_sig: Option<String>,
}

impl PlatformKey {
    /// Lowercase, drop punctuation/whitespace, spell out a trailing `+` as
    /// "plus" and record digits so "Channel 4" never matches "Channel 5".
    pub fn new(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase().replace('+', "plus");
        let normalized: String = lowered.chars().filter(|c| c.is_alphanumeric()).collect();
        let digits: String = normalized.chars().filter(|c| c.is_ascii_digit()).collect();
        let numeric_sig = if digits.is_empty() { None } else { Some(digits) };
        Self {
            normalized,
            numeric_sig,
        }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// Whether the numeric signatures are compatible (both empty or equal).
    pub fn numeric_compatible(&self, other: &Self) -> bool {
        self.numeric_sig == other.numeric_sig
    }

    /// Jaro-Winkler similarity between two normalized keys.
    pub fn similarity(&self, other: &Self) -> f64 {
        jaro_winkler(self.normalized(), other.normalized())
    }

    pub fn likely_same(&self, other: &Self) -> bool {
        self.numeric_compatible(other) && self.similarity(other) >= MIN_PLATFORM_SIMILARITY
    }
}

/// Existing names that look like spelling variants of `candidate`.
pub fn near_duplicates<'a>(candidate: &str, existing: &'a [String]) -> Vec<&'a str> {
    let key = PlatformKey::new(candidate);
    existing
        .iter()
        .filter(|name| name.as_str() != candidate)
        .filter(|name| key.likely_same(&PlatformKey::new(name)))
        .map(|name| name.as_str())
        .collect()
}
