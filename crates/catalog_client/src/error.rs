use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("invalid catalog service url {url:?}: {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("catalog service responded with status {status}")]
    Status { status: u16 },
    #[error("catalog response body is unusable: {0}")]
    Body(String),
}

/// A single response entry that was dropped from the baseline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {index} (id {id:?}) skipped: {reason}")]
pub struct MalformedRecordError {
    pub index: usize,
    pub id: Option<i64>,
    pub reason: String,
}
