use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("oracle error: {0}")]
    Oracle(#[from] OracleError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Failure of a single round-trip to the classification oracle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    #[error("http status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("response envelope could not be read: {0}")]
    InvalidEnvelope(String),

    #[error("no response from model")]
    EmptyResponse,

    #[error("oracle configuration error: {0}")]
    Config(String),
}
