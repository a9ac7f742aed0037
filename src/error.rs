use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// The main error type for webhook processing.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// One or more of the `svix-id`/`svix-timestamp`/`svix-signature` headers
    /// is missing or not valid UTF-8.
    #[error("missing svix headers")]
    MissingHeaders,

    #[error("signature verification failed: {0}")]
    InvalidSignature(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("user store error: {0}")]
    Store(String),

    #[error("identity provider error: {0}")]
    Provider(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SyncError {
    pub fn invalid_signature(msg: impl Into<String>) -> Self {
        Self::InvalidSignature(msg.into())
    }

    pub fn malformed_payload(msg: impl Into<String>) -> Self {
        Self::MalformedPayload(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeaders | Self::InvalidSignature(_) | Self::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Config(_) | Self::Store(_) | Self::Provider(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the plain-text body sent to the webhook sender.
    ///
    /// Server errors (5xx) get a generic message so that store or provider
    /// details are never disclosed to the caller; the full error is logged
    /// server-side when the response is built.
    fn safe_message(&self) -> &'static str {
        match self {
            Self::MissingHeaders => "missing svix headers",
            Self::InvalidSignature(_) => "webhook verification failed",
            Self::MalformedPayload(_) => "malformed webhook payload",
            Self::Config(_) | Self::Store(_) | Self::Provider(_) | Self::Internal(_) => {
                "error processing webhook event"
            }
        }
    }
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Full error message for server logs; clients get safe_message only.
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "webhook request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "webhook request rejected");
        }

        (status, self.safe_message()).into_response()
    }
}

/// Result type alias for webhook processing.
pub type Result<T> = std::result::Result<T, SyncError>;

impl From<serde_json::Error> for SyncError {
    fn from(err: serde_json::Error) -> Self {
        SyncError::MalformedPayload(err.to_string())
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SyncError::Provider("request timed out".to_string())
        } else if err.is_connect() {
            SyncError::Provider(format!("connection error: {}", err))
        } else if let Some(status) = err.status() {
            SyncError::Provider(format!("upstream returned {}", status))
        } else {
            SyncError::Provider(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============ status code mapping tests ============

    #[test]
    fn test_missing_headers_is_bad_request() {
        let err = SyncError::MissingHeaders;
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "missing svix headers");
    }

    #[test]
    fn test_invalid_signature_is_bad_request() {
        let err = SyncError::invalid_signature("no matching signature");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "signature verification failed: no matching signature"
        );
    }

    #[test]
    fn test_malformed_payload_is_bad_request() {
        let err = SyncError::malformed_payload("no email addresses");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_error_is_server_error() {
        let err = SyncError::store("connection refused");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_provider_error_is_server_error() {
        let err = SyncError::provider("upstream returned 401");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_internal_error_is_server_error() {
        let err = SyncError::internal("oops");
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ============ safe_message tests (information disclosure) ============

    #[test]
    fn test_safe_message_hides_store_details() {
        let err = SyncError::store("mongodb://db-prod-01 connection refused");
        assert_eq!(err.safe_message(), "error processing webhook event");
    }

    #[test]
    fn test_safe_message_hides_provider_details() {
        let err = SyncError::provider("bearer token sk_live_xyz rejected");
        assert_eq!(err.safe_message(), "error processing webhook event");
    }

    #[test]
    fn test_safe_message_client_errors() {
        assert_eq!(
            SyncError::MissingHeaders.safe_message(),
            "missing svix headers"
        );
        assert_eq!(
            SyncError::invalid_signature("detail").safe_message(),
            "webhook verification failed"
        );
        assert_eq!(
            SyncError::malformed_payload("detail").safe_message(),
            "malformed webhook payload"
        );
    }

    // ============ From conversions ============

    #[test]
    fn test_from_serde_json_error() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ not json");
        let err: SyncError = result.unwrap_err().into();
        assert!(matches!(err, SyncError::MalformedPayload(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    // ============ IntoResponse tests ============

    #[tokio::test]
    async fn test_into_response_bad_request_body() {
        let response = SyncError::MissingHeaders.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"missing svix headers");
    }

    #[tokio::test]
    async fn test_into_response_server_error_body_is_generic() {
        let response = SyncError::store("secret detail").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(text, "error processing webhook event");
        assert!(!text.contains("secret detail"));
    }
}
