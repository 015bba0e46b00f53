//! The relay request handler.
//!
//! One call per inbound request, any method, any path. The inbound method,
//! headers and body are ignored: only the `u` query parameter and the request
//! location (for the proxy base) matter.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use std::time::Instant;
use url::Url;

use crate::error::{RelayError, RelayResult};
use crate::http::request::{proxy_base, request_id, target_param};
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::relay::rewrite::rewrite_links;
use crate::relay::upstream::host_key;

/// Entry point wired into the router for every route.
pub async fn relay_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, _body) = request.into_parts();
    let request_id = request_id(&parts);

    let Some(target) = target_param(parts.uri.query()) else {
        tracing::warn!(request_id = %request_id, uri = %parts.uri, "Missing target parameter");
        let err = RelayError::MissingTarget;
        metrics::record_request(err.kind(), err.status_code().as_u16(), start_time);
        return err.into_response();
    };

    let base = proxy_base(&parts);
    tracing::debug!(request_id = %request_id, target = %target, proxy_base = %base, "Relaying request");

    match relay(&state, &target, &base).await {
        Ok(response) => {
            metrics::record_request("ok", StatusCode::OK.as_u16(), start_time);
            response
        }
        Err(err) => {
            tracing::error!(
                request_id = %request_id,
                target = %target,
                error = %err,
                "Relay failed"
            );
            metrics::record_request(err.kind(), err.status_code().as_u16(), start_time);
            err.into_response()
        }
    }
}

/// Fetch `target`, relay cookies for its host and shape the response.
pub async fn relay(state: &AppState, target: &str, proxy_base: &str) -> RelayResult<Response> {
    let target_url = Url::parse(target)?;
    let host = host_key(&target_url);

    let cookie = state.cookies.get(&host);
    let upstream = state.upstream.fetch(target_url, cookie.as_deref()).await?;

    if let Some(set_cookie) = upstream.set_cookie() {
        tracing::debug!(host = %host, "Storing upstream cookie");
        state.cookies.set(host.clone(), set_cookie);
    }

    let content_type = upstream.content_type();
    tracing::debug!(
        host = %host,
        upstream_status = %upstream.status(),
        content_type = ?content_type,
        "Upstream responded"
    );

    let is_html = content_type
        .as_ref()
        .map(|v| response::is_html(v.as_bytes()))
        .unwrap_or(false);

    if is_html {
        let html = upstream.text().await?;
        metrics::record_rewrite();
        Ok(response::html(rewrite_links(&html, proxy_base)))
    } else {
        let body = upstream.bytes().await?;
        Ok(response::passthrough(content_type, body))
    }
}
