//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use relay_proxy::{CookieStore, HttpServer, ProxyConfig, Shutdown};

/// Canned response served by a mock upstream.
#[derive(Clone, Debug)]
pub struct MockResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

#[allow(dead_code)]
impl MockResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn html(body: &str) -> Self {
        Self::new(200).header("Content-Type", "text/html").body(body)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }
}

/// A running mock upstream that records every request head it receives.
pub struct MockBackend {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockBackend {
    /// Absolute URL for `path` on this backend.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Number of requests received so far.
    pub fn hits(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Raw head (request line + headers) of the `index`-th request.
    pub fn request(&self, index: usize) -> String {
        self.requests.lock().unwrap()[index].clone()
    }

    /// Value of `name` in the `index`-th request, matched case-insensitively.
    pub fn request_header(&self, index: usize, name: &str) -> Option<String> {
        let head = self.request(index);
        head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

/// Start a mock upstream on an ephemeral port. `respond` maps the `n`-th
/// request (0-based) to the response to send.
pub async fn start_backend<F>(respond: F) -> MockBackend
where
    F: Fn(usize) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();
    let respond = Arc::new(respond);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let recorded = recorded.clone();
            let respond = respond.clone();
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut chunk).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => buf.extend_from_slice(&chunk[..n]),
                    }
                }

                let index = {
                    let mut recorded = recorded.lock().unwrap();
                    recorded.push(String::from_utf8_lossy(&buf).into_owned());
                    recorded.len() - 1
                };
                let response = respond(index);

                let mut head = format!("HTTP/1.1 {} Mock\r\n", response.status);
                for (name, value) in &response.headers {
                    head.push_str(&format!("{}: {}\r\n", name, value));
                }
                head.push_str(&format!(
                    "Content-Length: {}\r\nConnection: close\r\n\r\n",
                    response.body.len()
                ));

                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(&response.body).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockBackend { addr, requests }
}

/// A relay server running on an ephemeral port.
pub struct RelayHandle {
    pub addr: SocketAddr,
    pub cookies: CookieStore,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl RelayHandle {
    /// Proxy base the relay computes for requests to `/`.
    pub fn base(&self) -> String {
        format!("http://{}/", self.addr)
    }

    /// GET `/` on the relay with `u` set to `target`.
    pub async fn fetch(&self, target: &str) -> reqwest::Response {
        self.client
            .get(self.base())
            .query(&[("u", target)])
            .send()
            .await
            .expect("relay unreachable")
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the relay with outbound system proxies disabled.
pub async fn start_relay() -> RelayHandle {
    let mut config = ProxyConfig::default();
    config.upstream.use_system_proxy = false;

    let server = HttpServer::new(config).unwrap();
    let cookies = server.cookies().clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .no_proxy()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();

    RelayHandle {
        addr,
        cookies,
        client,
        shutdown,
    }
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}
