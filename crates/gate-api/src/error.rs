//! API error types.

use thiserror::Error;

/// Errors from the exchange REST client.
///
/// Everything here maps to the adapter's "upstream unavailable"
/// category; validation happens above this layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: status {status}, {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("API credentials not configured")]
    MissingCredentials,
}

impl ApiError {
    /// The upstream error text, for callers that absorb specific
    /// exchange responses ("already set", "order not found").
    pub fn body(&self) -> &str {
        match self {
            Self::Http(msg) | Self::Decode(msg) => msg,
            Self::Status { body, .. } => body,
            Self::MissingCredentials => "",
        }
    }

    /// True if the exchange reported the requested state is already in
    /// effect (leverage or margin mode already at target).
    pub fn is_already_in_state(&self) -> bool {
        let body = self.body();
        body.contains("already") || body.contains("same")
    }

    /// True if the exchange reported there was nothing to act on
    /// (cancelling with no resting orders).
    pub fn is_not_found(&self) -> bool {
        let body = self.body();
        body.contains("not found") || body.contains("no order")
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_in_state_detection() {
        let err = ApiError::Status {
            status: 400,
            body: "leverage is already 10".to_string(),
        };
        assert!(err.is_already_in_state());

        let err = ApiError::Status {
            status: 400,
            body: "margin mode is the same".to_string(),
        };
        assert!(err.is_already_in_state());

        let err = ApiError::Http("connection refused".to_string());
        assert!(!err.is_already_in_state());
    }

    #[test]
    fn test_not_found_detection() {
        let err = ApiError::Status {
            status: 404,
            body: "order not found".to_string(),
        };
        assert!(err.is_not_found());
    }
}
