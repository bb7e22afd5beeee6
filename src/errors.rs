use thiserror::Error;

/// Result type alias for events API operations
pub type Result<T> = std::result::Result<T, EventsError>;

/// Errors that can occur when building or sending an event
#[derive(Debug, Error)]
pub enum EventsError {
    /// An event field violates a static constraint
    ///
    /// Raised at the setter call site, never deferred to send time.
    #[error("{reason}")]
    Validation {
        /// Why the value was rejected
        reason: &'static str,
    },

    /// A field required by the requested event type is not set
    ///
    /// Raised before any network I/O is attempted.
    #[error("{field} must be provided before sending this event")]
    MissingField {
        /// Wire-format name of the missing field
        field: &'static str,
    },

    /// Failed to build HTTP client
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Failed to serialize the event payload
    #[error("Failed to serialize event: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The HTTP exchange failed below the protocol level
    /// (DNS failure, connection refused, timeout)
    #[error("HTTP transport error: {message}")]
    Transport {
        /// Text of the underlying network error
        message: String,
    },

    /// The events API answered with a status code other than 200
    #[error("Unexpected HTTP response code: {status}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
    },

    /// The response body did not decode to a usable JSON object
    #[error("Invalid JSON response format: {body}")]
    InvalidResponse {
        /// Raw response body, kept for diagnostics
        body: String,
    },
}

impl EventsError {
    /// Check if the error is retryable
    ///
    /// Returns `true` for:
    /// - Network/connection errors
    /// - Timeout errors
    /// - Server errors (5xx status codes)
    ///
    /// The client itself never retries; this is guidance for callers that
    /// implement their own retry policy.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::UnexpectedStatus { status } => *status >= 500,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_retryable_5xx() {
        assert!(EventsError::UnexpectedStatus { status: 500 }.is_retryable());
        assert!(EventsError::UnexpectedStatus { status: 502 }.is_retryable());
        assert!(EventsError::UnexpectedStatus { status: 503 }.is_retryable());
    }

    #[test]
    fn test_status_error_not_retryable_4xx() {
        assert!(!EventsError::UnexpectedStatus { status: 400 }.is_retryable());
        assert!(!EventsError::UnexpectedStatus { status: 401 }.is_retryable());
        assert!(!EventsError::UnexpectedStatus { status: 404 }.is_retryable());
    }

    #[test]
    fn test_transport_error_retryable() {
        let error = EventsError::Transport {
            message: "connection refused".to_string(),
        };
        assert!(error.is_retryable());
    }

    #[test]
    fn test_payload_errors_not_retryable() {
        let error = EventsError::Validation {
            reason: "service key must be a 32 character GUID string",
        };
        assert!(!error.is_retryable());

        let error = EventsError::MissingField {
            field: "service_key",
        };
        assert!(!error.is_retryable());

        let error = EventsError::InvalidResponse {
            body: "<html>".to_string(),
        };
        assert!(!error.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let error = EventsError::UnexpectedStatus { status: 403 };
        assert_eq!(error.to_string(), "Unexpected HTTP response code: 403");

        let error = EventsError::MissingField {
            field: "incident_key",
        };
        assert_eq!(
            error.to_string(),
            "incident_key must be provided before sending this event"
        );

        let error = EventsError::InvalidResponse {
            body: "not json".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid JSON response format: not json");
    }
}
