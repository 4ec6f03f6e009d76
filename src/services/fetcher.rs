// src/services/fetcher.rs

//! Source page fetcher.
//!
//! One GET per call with a browser User-Agent. Non-success statuses are
//! errors, never partial results. Retrying is left to the next cycle.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::SourceConfig;
use crate::utils::http::create_async_client;

/// Anything that can produce the raw markup of the source page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body.
    async fn fetch(&self) -> Result<String>;

    /// URL the page is fetched from, used to resolve relative links.
    fn url(&self) -> &str;
}

/// Fetches the source page over HTTP.
pub struct HttpFetcher {
    url: String,
    client: Client,
}

impl HttpFetcher {
    /// Build a fetcher with a client configured from `config`.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        Ok(Self {
            url: config.url.clone(),
            client: create_async_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String> {
        log::debug!("Fetching {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        log::debug!("Fetched {} bytes from {}", body.len(), self.url);
        Ok(body)
    }

    fn url(&self) -> &str {
        &self.url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one HTTP response and hand back the raw request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "{status_line}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{addr}/hn/?tags=+ai"), handle)
    }

    /// Accept one connection and never answer it.
    async fn serve_silence() -> (String, JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut chunk = [0u8; 1024];
            // Hold the socket open until the client gives up.
            while let Ok(n) = socket.read(&mut chunk).await {
                if n == 0 {
                    break;
                }
            }
        });

        (format!("http://{addr}/hn/?tags=+ai"), handle)
    }

    fn source(url: String) -> SourceConfig {
        SourceConfig {
            url,
            user_agent: "postwatch-test/1.0".to_string(),
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_sends_user_agent() {
        let (url, server) = serve_once("HTTP/1.1 200 OK", "<html>ok</html>").await;
        let fetcher = HttpFetcher::new(&source(url)).unwrap();

        let body = fetcher.fetch().await.unwrap();
        assert_eq!(body, "<html>ok</html>");

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /hn/?tags=+ai"));
        assert!(request.contains("user-agent: postwatch-test/1.0"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_non_success_status() {
        let (url, server) = serve_once("HTTP/1.1 503 Service Unavailable", "busy").await;
        let fetcher = HttpFetcher::new(&source(url.clone())).unwrap();

        match fetcher.fetch().await.unwrap_err() {
            AppError::Status { url: failed, status } => {
                assert_eq!(status, 503);
                assert_eq!(failed, url);
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(&source(format!("http://{addr}/"))).unwrap();
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }

    #[tokio::test]
    async fn test_fetch_times_out_on_silent_server() {
        let (url, server) = serve_silence().await;
        let config = SourceConfig {
            timeout_secs: 1,
            ..source(url)
        };
        let fetcher = HttpFetcher::new(&config).unwrap();

        let started = std::time::Instant::now();
        let err = fetcher.fetch().await.unwrap_err();
        assert!(matches!(err, AppError::Http(ref e) if e.is_timeout()), "{err}");
        assert!(started.elapsed() < std::time::Duration::from_secs(5));
        server.await.unwrap();
    }
}
