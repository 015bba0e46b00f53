//! Relay error type and its mapping onto HTTP responses.
//!
//! Every failure inside the request handler funnels into [`RelayError`]. The
//! caller only ever sees two failure statuses: 400 when the target parameter
//! is missing, 500 for everything else with the error text as the body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Body returned when the `u` query parameter is absent.
pub const MISSING_TARGET_BODY: &str = "Missing url param";

/// Errors raised while relaying a request.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No (or an empty) `u` query parameter on the inbound request.
    #[error("{}", MISSING_TARGET_BODY)]
    MissingTarget,

    /// The target could not be parsed as an absolute URL.
    #[error("invalid target URL: {0}")]
    InvalidTarget(#[from] url::ParseError),

    /// Building the client, connecting, or reading the upstream body failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;

impl RelayError {
    /// HTTP status reported to the caller for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::MissingTarget => StatusCode::BAD_REQUEST,
            RelayError::InvalidTarget(_) | RelayError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingTarget => "missing_target",
            RelayError::InvalidTarget(_) => "invalid_target",
            RelayError::Upstream(_) => "upstream",
        }
    }

    /// Plain-text body sent to the caller.
    pub fn body(&self) -> String {
        match self {
            RelayError::MissingTarget => MISSING_TARGET_BODY.to_string(),
            other => format!("Proxy Error: {}", other),
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status_code(), self.body()).into_response()
    }
}
