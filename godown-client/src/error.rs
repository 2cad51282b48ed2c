//! Client error types

use reqwest::StatusCode;
use serde::Serialize;
use shared::RecordError;
use thiserror::Error;

use crate::analytics::aggregate::TotalOverflow;
use crate::feed::Feed;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, broken body)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Body is not a JSON array of the expected shape
    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record decoded but lacks a field the aggregation needs
    #[error("Malformed {feed} record at index {index}: {source}")]
    MalformedRecord {
        feed: Feed,
        index: usize,
        #[source]
        source: RecordError,
    },

    /// Records are valid one by one but their totals do not fit a `Decimal`
    #[error("Aggregation failed: {0}")]
    Overflow(#[from] TotalOverflow),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse classification of a [`ClientError`], kept in feed status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Status,
    Decode,
    MalformedRecord,
    Overflow,
    Config,
}

impl ClientError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ClientError::Http(e) if e.is_decode() => FailureKind::Decode,
            ClientError::Http(_) => FailureKind::Transport,
            ClientError::Status { .. } => FailureKind::Status,
            ClientError::Decode(_) => FailureKind::Decode,
            ClientError::MalformedRecord { .. } => FailureKind::MalformedRecord,
            ClientError::Overflow(_) => FailureKind::Overflow,
            ClientError::Config(_) => FailureKind::Config,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
