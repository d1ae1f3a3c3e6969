//! Content Fetchers
//!
//! A fetcher turns a catalog identifier into text. The reel issues exactly
//! one fetch per scheduled cycle: no retry, no caching. Whatever comes back
//! is treated as plain text regardless of its declared content type.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Default request timeout for sample files
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Errors raised while fetching a sample file
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, timeout or body decoding failure
    #[error("Request for {url} failed: {source}")]
    Request {
        /// The URL that was requested
        url: String,
        /// The underlying HTTP client error
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status {
        /// The URL that was requested
        url: String,
        /// The HTTP status code
        status: u16,
    },

    /// The identifier is not known to this fetcher
    #[error("No content for {0}")]
    NotFound(String),

    /// The HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// Source of sample file contents
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Get the fetcher name (for logs)
    fn name(&self) -> &str;

    /// Fetch the text behind a catalog identifier
    async fn fetch(&self, identifier: &str) -> Result<String, FetchError>;
}

/// Fetches identifiers over HTTP with a single GET each
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    /// Base URL relative identifiers are resolved against
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            base_url: base_url.into(),
            http_client,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve an identifier to a full URL
    ///
    /// Absolute `http://` and `https://` identifiers are used as-is.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> String {
        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            return identifier.to_string();
        }

        let base = self.base_url.trim_end_matches('/');
        let path = identifier.trim_start_matches('/');
        format!("{}/{}", base, path)
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        let url = self.resolve(identifier);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| FetchError::Request { url, source })
    }
}

/// Serves identifiers from memory
///
/// Used for offline demos and in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticFetcher {
    files: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the contents of one identifier
    #[must_use]
    pub fn with_file(mut self, identifier: impl Into<String>, contents: impl Into<String>) -> Self {
        self.files.insert(identifier.into(), contents.into());
        self
    }

    /// Built-in snippets for every entry of the default catalog
    #[must_use]
    pub fn samples() -> Self {
        SAMPLES
            .iter()
            .fold(Self::new(), |fetcher, (id, body)| fetcher.with_file(*id, *body))
    }
}

#[async_trait]
impl ContentFetcher for StaticFetcher {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch(&self, identifier: &str) -> Result<String, FetchError> {
        self.files
            .get(identifier)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(identifier.to_string()))
    }
}

const SAMPLES: &[(&str, &str)] = &[
    (
        "/files/samples/index",
        "<!DOCTYPE html>\n<html>\n  <head>\n    <title>Portfolio</title>\n  </head>\n  <body>\n    <pre id=\"code\"></pre>\n  </body>\n</html>\n",
    ),
    (
        "/files/samples/main",
        "fn main() {\n    let greeting = \"hello\";\n    println!(\"{}, world\", greeting);\n}\n",
    ),
    (
        "/files/samples/network",
        "public class Network {\n    private final int port;\n\n    public Network(int port) {\n        this.port = port;\n    }\n}\n",
    ),
    (
        "/files/samples/raspberry",
        "from machine import Pin, Timer\n\nled = Pin(25, Pin.OUT)\nTimer().init(freq=2, callback=lambda t: led.toggle())\n",
    ),
    (
        "/files/samples/cache",
        "struct Cache {\n    entries: HashMap<String, Vec<u8>>,\n    capacity: usize,\n}\n",
    ),
    (
        "/files/samples/style",
        "#code {\n    font-family: monospace;\n    white-space: pre-wrap;\n}\n",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn fetcher(base: &str) -> HttpFetcher {
        HttpFetcher::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_resolve_relative() {
        let f = fetcher("http://localhost:8000/");
        assert_eq!(
            f.resolve("/files/samples/main"),
            "http://localhost:8000/files/samples/main"
        );
        assert_eq!(
            fetcher("http://localhost:8000").resolve("files/samples/main"),
            "http://localhost:8000/files/samples/main"
        );
    }

    #[test]
    fn test_resolve_absolute_passthrough() {
        let f = fetcher("http://localhost:8000");
        let url = "https://raw.githubusercontent.com/example/repo/master/Network.java";
        assert_eq!(f.resolve(url), url);
    }

    #[tokio::test]
    async fn test_static_fetcher_hit_and_miss() {
        let f = StaticFetcher::new().with_file("/a", "alpha");
        assert_eq!(f.fetch("/a").await.unwrap(), "alpha");

        let err = f.fetch("/missing").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound(id) if id == "/missing"));
    }

    #[tokio::test]
    async fn test_samples_cover_default_catalog() {
        let f = StaticFetcher::samples();
        for id in Catalog::default().iter() {
            assert!(f.fetch(id).await.is_ok(), "missing sample for {}", id);
        }
    }

    #[tokio::test]
    async fn test_http_fetch_connection_refused() {
        // Port 9 (discard) on localhost is closed in test environments
        let f = fetcher("http://127.0.0.1:9");
        let err = f.fetch("/files/samples/main").await.unwrap_err();
        assert!(matches!(err, FetchError::Request { .. }));
    }

    /// Serve one canned HTTP response on a local port; returns the base URL
    async fn serve_once(response: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_non_success_is_status_error() {
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        )
        .await;
        let f = fetcher(&base);

        let err = f.fetch("/files/samples/gone").await.unwrap_err();
        match err {
            FetchError::Status { url, status } => {
                assert_eq!(status, 404);
                assert_eq!(url, format!("{}/files/samples/gone", base));
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_http_body_read_as_text_regardless_of_content_type() {
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: 12\r\nConnection: close\r\n\r\nfn main() {}",
        )
        .await;
        let f = fetcher(&base);

        assert_eq!(f.fetch("/files/samples/main").await.unwrap(), "fn main() {}");
    }
}
