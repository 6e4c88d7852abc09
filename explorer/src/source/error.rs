//! Error types for backend fetches.

/// Result type for [`FilmSource`](super::FilmSource) operations.
pub type SourceResult<T> = Result<T, SourceError>;

/// Error type for backend fetches.
///
/// Every variant renders as a message fit to show inline next to a chart.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// Request never produced a response (DNS, connect, timeout).
    #[error("Network error while fetching {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// Backend answered with a non-success status.
    #[error("Backend returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body did not match the expected shape.
    #[error("Could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    /// Source could not be built from the given settings.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Source is deliberately offline (local dataset toggled to fail).
    #[error("Data source unavailable: {0}")]
    Unavailable(String),
}

impl SourceError {
    pub fn transport(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    pub fn decode(endpoint: impl Into<String>, message: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.to_string(),
        }
    }

    /// Whether retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Transport { .. } | SourceError::Unavailable(_) => true,
            SourceError::Status { status, .. } => *status >= 500 || *status == 429,
            SourceError::Decode { .. } | SourceError::Configuration(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_are_readable() {
        let err = SourceError::Status {
            endpoint: "/meta".into(),
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.to_string(), "Backend returned 503 for /meta: maintenance");
        assert!(err.is_retryable());
        assert!(!SourceError::decode("/meta", "missing field `genres`").is_retryable());
    }
}
