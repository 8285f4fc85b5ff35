use std::path::PathBuf;

use medallion_model::Stage;
use thiserror::Error;

/// Errors raised by the stage store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Stage table not present in the store.
    #[error("stage '{stage}' not present in store")]
    MissingStage { stage: Stage },

    /// Upstream layer missing when a dependent stage was invoked.
    #[error("stage '{upstream}' not present in store (required by '{stage}')")]
    MissingUpstream { stage: Stage, upstream: Stage },

    /// Stage with no upstream asked for one.
    #[error("stage '{stage}' has no upstream layer")]
    NoUpstream { stage: Stage },

    /// Filesystem failure underneath the store.
    #[error("store i/o failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted table could not be encoded or decoded.
    #[error("stage '{stage}' serialization failed: {source}")]
    Serde {
        stage: Stage,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;
