// src/services/error.rs
use crate::models::ZodiacSign;
use thiserror::Error;

/// A call to the horoscope provider that did not yield a usable payload.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),

    #[error("provider reported status {status}: {message}")]
    Provider { status: i64, message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("{payload} payload is missing '{field}'")]
    MissingField {
        payload: &'static str,
        field: String,
    },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record key field '{0}' is empty")]
    InvalidKey(&'static str),

    /// The backend could not be reached or dropped the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("redis error: {0}")]
    Redis(#[source] redis::RedisError),

    #[error("failed to (de)serialise record: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<redis::RedisError> for StoreError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() || err.is_timeout() {
            StoreError::Unavailable(err.to_string())
        } else {
            StoreError::Redis(err)
        }
    }
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("fetching {zodiac} failed: {source}")]
    Fetch {
        zodiac: ZodiacSign,
        #[source]
        source: ProviderError,
    },

    #[error("assembling {zodiac} failed: {source}")]
    Assembly {
        zodiac: ZodiacSign,
        #[source]
        source: AssemblyError,
    },

    #[error("storing {zodiac} failed: {source}")]
    Persistence {
        zodiac: ZodiacSign,
        #[source]
        source: StoreError,
    },

    #[error("{} of 12 signs failed: {}", .0.len(), join_errors(.0))]
    Failures(Vec<JobError>),

    #[error("a horoscope run is already in progress")]
    AlreadyRunning,
}

impl JobError {
    /// The sign a per-sign error belongs to.
    pub fn zodiac(&self) -> Option<ZodiacSign> {
        match self {
            JobError::Fetch { zodiac, .. }
            | JobError::Assembly { zodiac, .. }
            | JobError::Persistence { zodiac, .. } => Some(*zodiac),
            JobError::Failures(_) | JobError::AlreadyRunning => None,
        }
    }
}

fn join_errors(errors: &[JobError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
