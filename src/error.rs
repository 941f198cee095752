use thiserror::Error;

/// Main error type for the recommendation pipeline
#[derive(Error, Debug)]
pub enum TravelError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limit exceeded: retry after {retry_after}s")]
    RateLimit { retry_after: u64 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Model text that could not be read as the JSON object it was asked for.
    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),

    /// Well-formed JSON that does not match the expected shape.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Stream transport error: {0}")]
    StreamTransport(String),

    #[error("Timeout error: {0}")]
    Timeout(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, TravelError>;

impl TravelError {
    /// Whether a caller could reasonably try the same request again.
    ///
    /// Advisory only: nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            TravelError::Http(_) => true,
            TravelError::Api { status, .. } => *status >= 500,
            TravelError::RateLimit { .. } => true,
            TravelError::StreamTransport(_) => true,
            TravelError::Timeout(_) => true,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            TravelError::Config(_) => "CONFIG_ERROR",
            TravelError::Http(_) => "HTTP_ERROR",
            TravelError::Api { .. } => "UPSTREAM_API_ERROR",
            TravelError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            TravelError::Serialization(_) => "SERIALIZATION_ERROR",
            TravelError::UpstreamFormat(_) => "UPSTREAM_FORMAT_ERROR",
            TravelError::Validation(_) => "VALIDATION_ERROR",
            TravelError::StreamTransport(_) => "STREAM_TRANSPORT_ERROR",
            TravelError::Timeout(_) => "TIMEOUT_ERROR",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
