//! Outbound fetch to the target origin.

use axum::body::Bytes;
use axum::http::{
    header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
    HeaderValue, StatusCode,
};
use reqwest::{redirect, Client};
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::RelayResult;

/// Cookie-store key for a target: host, plus `:port` when the port is not
/// the scheme default.
pub fn host_key(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

/// HTTP client used for every upstream fetch.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Build the client from configuration. No request timeout is set; the
    /// transport's own defaults apply.
    pub fn new(config: &UpstreamConfig) -> RelayResult<Self> {
        let policy = if config.follow_redirects {
            redirect::Policy::limited(config.max_redirects)
        } else {
            redirect::Policy::none()
        };

        let mut builder = Client::builder().redirect(policy);
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// GET `url`, sending `cookie` as the only request header when present.
    pub async fn fetch(&self, url: Url, cookie: Option<&str>) -> RelayResult<UpstreamResponse> {
        let mut request = self.client.get(url);
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }
        let inner = request.send().await?;
        Ok(UpstreamResponse { inner })
    }
}

/// Response from the origin, exposing only what the relay inspects.
#[derive(Debug)]
pub struct UpstreamResponse {
    inner: reqwest::Response,
}

impl UpstreamResponse {
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// All `Set-Cookie` lines joined with `", "`, or `None` if there were none.
    pub fn set_cookie(&self) -> Option<String> {
        let values: Vec<String> = self
            .inner
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect();

        if values.is_empty() {
            None
        } else {
            Some(values.join(", "))
        }
    }

    /// The raw `Content-Type` header, if the origin sent one.
    pub fn content_type(&self) -> Option<HeaderValue> {
        self.inner.headers().get(CONTENT_TYPE).cloned()
    }

    /// Decode the body as text, honouring the charset the origin declared.
    pub async fn text(self) -> RelayResult<String> {
        Ok(self.inner.text().await?)
    }

    /// Read the body as raw bytes.
    pub async fn bytes(self) -> RelayResult<Bytes> {
        Ok(self.inner.bytes().await?)
    }
}
