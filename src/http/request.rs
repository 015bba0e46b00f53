//! Inbound request inspection.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for each request
//! - Pull the target URL out of the `u` query parameter
//! - Work out the proxy base used as the rewrite prefix

use axum::http::{header::HOST, request::Parts, HeaderName, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use url::form_urlencoded;
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Header a TLS-terminating front end uses to report the original scheme.
pub const X_FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Query parameter naming the target URL.
pub const TARGET_PARAM: &str = "u";

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        id.parse().ok().map(RequestId::new)
    }
}

/// Request ID of `parts`, or `"unknown"` when none was assigned.
pub fn request_id(parts: &Parts) -> String {
    parts
        .headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// First `u` value in `query`, percent- and form-decoded.
///
/// An empty value counts as missing.
pub fn target_param(query: Option<&str>) -> Option<String> {
    form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == TARGET_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// `scheme://host/path` of the inbound request, query dropped.
pub fn proxy_base(parts: &Parts) -> String {
    let scheme = parts
        .uri
        .scheme_str()
        .map(str::to_string)
        .or_else(|| {
            parts
                .headers
                .get(X_FORWARDED_PROTO)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(|v| v.trim().to_ascii_lowercase())
                .filter(|v| !v.is_empty())
        })
        .unwrap_or_else(|| "http".to_string());

    let host = parts
        .uri
        .authority()
        .map(|a| a.as_str().to_string())
        .or_else(|| {
            parts
                .headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
        .unwrap_or_else(|| "localhost".to_string());

    format!("{}://{}{}", scheme, host, parts.uri.path())
}
