//! Outbound HTTP with bounded retries, shared by page scraping, search and the
//! insight client.

use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned status {status}")]
    Status { url: String, status: u16, body: String },

    #[error("unsupported URL '{0}': only http and https pages can be fetched")]
    InvalidUrl(String),

    #[error("gave up after {retries} retries")]
    RetriesExhausted { retries: u32 },
}

/// Retries transport errors, 429 and 5xx responses with exponential backoff.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Backoff before retry number `retry` (1-based): base, 2×base, 4×base, ...
    fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(retry.saturating_sub(1))
    }
}

/// Sends the request built by `build`, retrying per `policy`.
///
/// Any non-2xx response that is not retried (or is still failing after the last
/// retry) is returned as [`FetchError::Status`].
pub async fn send_with_retry<F>(policy: &RetryPolicy, build: F) -> Result<Response, FetchError>
where
    F: Fn() -> RequestBuilder,
{
    let mut last_error: Option<FetchError> = None;

    for attempt in 0..=policy.max_retries {
        if attempt > 0 {
            let delay = policy.delay_for(attempt);
            if let Some(err) = &last_error {
                warn!(
                    "Request attempt {} failed ({}), retrying after {}ms...",
                    attempt,
                    err,
                    delay.as_millis()
                );
            }
            tokio::time::sleep(delay).await;
        }

        let response = match build().send().await {
            Ok(r) => r,
            Err(e) => {
                last_error = Some(FetchError::Http(e));
                continue;
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        let err = FetchError::Status {
            url,
            status: status.as_u16(),
            body,
        };
        if status.as_u16() == 429 || status.is_server_error() {
            last_error = Some(err);
            continue;
        }
        return Err(err);
    }

    Err(last_error.unwrap_or(FetchError::RetriesExhausted {
        retries: policy.max_retries,
    }))
}

/// A response body read up to a byte cap.
#[derive(Debug)]
pub struct CappedBody {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Reads at most `max_bytes` of the body, chunk by chunk, and stops there.
pub async fn read_capped(mut response: Response, max_bytes: usize) -> Result<CappedBody, FetchError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        if bytes.len().saturating_add(chunk.len()) > max_bytes {
            let can_take = max_bytes.saturating_sub(bytes.len());
            bytes.extend_from_slice(&chunk[..can_take]);
            return Ok(CappedBody {
                bytes,
                truncated: true,
            });
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(CappedBody {
        bytes,
        truncated: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use axum::{http::StatusCode, routing::get, Router};

    async fn spawn_fixture(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn fast_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_success() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/flaky",
            get(move || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                        (StatusCode::SERVICE_UNAVAILABLE, "busy")
                    } else {
                        (StatusCode::OK, "ok")
                    }
                }
            }),
        );
        let base = spawn_fixture(router).await;
        let client = reqwest::Client::new();

        let response = send_with_retry(&fast_policy(2), || client.get(format!("{base}/flaky")))
            .await
            .unwrap();
        assert_eq!(response.text().await.unwrap(), "ok");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = hits.clone();
        let router = Router::new().fallback(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::NOT_FOUND
            }
        });
        let base = spawn_fixture(router).await;
        let client = reqwest::Client::new();

        let err = send_with_retry(&fast_policy(3), || client.get(format!("{base}/gone")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 404, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_exhausted_returns_last_status() {
        let router = Router::new().fallback(|| async { StatusCode::BAD_GATEWAY });
        let base = spawn_fixture(router).await;
        let client = reqwest::Client::new();

        let err = send_with_retry(&fast_policy(1), || client.get(base.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_status_error_keeps_response_body() {
        let router = Router::new().fallback(|| async { (StatusCode::FORBIDDEN, "quota exceeded") });
        let base = spawn_fixture(router).await;
        let client = reqwest::Client::new();

        let err = send_with_retry(&fast_policy(0), || client.get(base.clone()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FetchError::Status { status: 403, ref body, .. } if body == "quota exceeded"
        ));
    }

    #[tokio::test]
    async fn test_read_capped_stops_at_limit() {
        let router = Router::new().fallback(|| async { "a".repeat(100_000) });
        let base = spawn_fixture(router).await;
        let client = reqwest::Client::new();

        let response = client.get(base.clone()).send().await.unwrap();
        let body = read_capped(response, 1000).await.unwrap();
        assert_eq!(body.bytes.len(), 1000);
        assert!(body.truncated);

        let response = client.get(base).send().await.unwrap();
        let body = read_capped(response, 200_000).await.unwrap();
        assert_eq!(body.bytes.len(), 100_000);
        assert!(!body.truncated);
    }
}
