use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("need at least two datasets to {operation} (got {found})")]
    NotEnoughDatasets { operation: &'static str, found: usize },

    #[error("no summary available for {dataset}: {reason}")]
    SummaryUnavailable { dataset: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a trackfile identifier could not be split into its parts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackfileError {
    #[error("missing session marker `_s001_` in {0:?}")]
    MissingSessionMarker(String),

    #[error("missing clip marker `_s60_` in {0:?}")]
    MissingClipMarker(String),
}
