//! Failure surface of the reconciliation engine.

use thiserror::Error;

/// Errors a synchronization run hands back to its caller.
///
/// "Not found" outcomes are not errors; see `SyncOutcome`.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A store write or the commit failed; nothing from the run was kept.
    #[error("synchronization of \"{title}\" failed: {source}")]
    Persistence {
        /// Title the caller asked to synchronize.
        title: String,
        #[source]
        source: sqlx::Error,
    },

    /// Importing the catalog genre list failed; nothing was kept.
    #[error("genre vocabulary import failed: {source}")]
    Vocabulary {
        #[source]
        source: sqlx::Error,
    },
}

impl SyncError {
    pub fn persistence(title: &str, source: sqlx::Error) -> Self {
        SyncError::Persistence {
            title: title.to_string(),
            source,
        }
    }
}
