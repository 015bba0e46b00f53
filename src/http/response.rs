//! Response construction for the two success shapes.
//!
//! Both answer 200 whatever status the origin returned.

use axum::{
    body::{Body, Bytes},
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Content type sent with rewritten HTML.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=UTF-8";

/// True when `content_type` names an HTML document.
pub fn is_html(content_type: &[u8]) -> bool {
    String::from_utf8_lossy(content_type)
        .to_ascii_lowercase()
        .contains("text/html")
}

/// 200 with rewritten HTML.
pub fn html(body: String) -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE))],
        body,
    )
        .into_response()
}

/// 200 with the origin's bytes and content type, untouched. A missing
/// content type becomes an empty header value.
pub fn passthrough(content_type: Option<HeaderValue>, body: Bytes) -> Response {
    let content_type = content_type.unwrap_or_else(|| HeaderValue::from_static(""));
    let mut response = Response::new(Body::from(body));
    response.headers_mut().insert(CONTENT_TYPE, content_type);
    response
}
