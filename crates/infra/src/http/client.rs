//! Retrying HTTP client shared by the sheet store and portal adapters.
//!
//! Both backends sit behind flaky upstreams (a rate-limited values API and a
//! headless-browser service), so transient failures get a couple of retries
//! with a doubling delay. Anything the server answered definitively, 2xx or
//! 4xx alike, is handed straight back to the caller.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response};
use salgspuls_domain::{Result, SalgspulsError};
use tracing::warn;

use crate::errors::InfraError;

/// Tuning knobs for [`HttpClient`]. The defaults suit production; tests dial
/// the delay down.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    /// Per-request timeout enforced by the underlying client
    pub timeout: Duration,
    /// Retries after the first attempt, so `retries: 2` means three tries
    pub retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub backoff: Duration,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), retries: 2, backoff: Duration::from_millis(250) }
    }
}

/// HTTP client wrapper that retries transient failures.
#[derive(Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

impl HttpClient {
    /// Client with default [`HttpOptions`].
    pub fn new() -> Result<Self> {
        Self::with_options(HttpOptions::default())
    }

    pub fn with_options(options: HttpOptions) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(options.timeout)
            .build()
            .map_err(|err| SalgspulsError::from(InfraError::from(err)))?;
        Ok(Self { inner, retries: options.retries, backoff: options.backoff })
    }

    /// Start a request against this client.
    pub fn request<U>(&self, method: Method, url: U) -> RequestBuilder
    where
        U: reqwest::IntoUrl,
    {
        self.inner.request(method, url)
    }

    /// Send the request, retrying 5xx answers and transport failures.
    ///
    /// The final outcome is returned as-is: a still-failing 5xx comes back as
    /// a `Response` for the caller's status handling, not as an error. The
    /// request body must be cloneable (buffered, not streamed) so that the
    /// request can be re-issued.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let mut delay = self.backoff;
        let mut retries_left = self.retries;

        loop {
            let attempt = request.try_clone().ok_or_else(|| {
                SalgspulsError::Internal("streaming request bodies cannot be retried".into())
            })?;

            match attempt.send().await {
                Ok(response) if response.status().is_server_error() && retries_left > 0 => {
                    warn!(status = %response.status(), retries_left, "server error, retrying");
                }
                Ok(response) => return Ok(response),
                Err(err) if retries_left > 0 && is_transient(&err) => {
                    warn!(error = %err, retries_left, "transport failure, retrying");
                }
                Err(err) => return Err(SalgspulsError::from(InfraError::from(err))),
            }

            retries_left -= 1;
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            delay = delay.saturating_mul(2);
        }
    }
}

/// Worth retrying: the request may never have reached the server, or the
/// server never answered. A decode error means a definitive (broken) answer.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Method, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn fast_client(retries: u32) -> HttpClient {
        HttpClient::with_options(HttpOptions {
            retries,
            backoff: Duration::from_millis(5),
            ..HttpOptions::default()
        })
        .expect("http client")
    }

    async fn get(client: &HttpClient, server: &MockServer) -> Result<Response> {
        client.send(client.request(Method::GET, server.uri())).await
    }

    #[tokio::test]
    async fn first_success_needs_no_retry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = get(&fast_client(2), &server).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn retries_until_the_server_recovers() {
        let server = MockServer::start().await;
        // Two 5xx answers, then wiremock falls through to the 200 mock
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = get(&fast_client(2), &server).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn exhausted_retries_hand_back_the_failing_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;

        let response = get(&fast_client(1), &server).await.expect("response");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn definitive_client_errors_are_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let response = get(&fast_client(2), &server).await.expect("response");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unreachable_host_becomes_a_network_error() {
        // Bind and drop a port so connecting to it is refused
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let client = fast_client(1);
        let result = client.send(client.request(Method::GET, &url)).await;
        assert!(matches!(result, Err(SalgspulsError::Network(_))));
    }
}
