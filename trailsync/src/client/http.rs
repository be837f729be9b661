//! HTTP client abstraction for testability

use super::types::ClientError;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Trait for asynchronous HTTP client operations.
///
/// All collaborator clients talk HTTP through this trait, which allows
/// a mock transport in tests. Header slices are `(name, value)` pairs.
pub trait AsyncHttpClient: Send + Sync {
    /// Performs an HTTP GET request with custom headers.
    fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    /// Performs an HTTP POST request with a JSON body.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Extra headers (authentication)
    /// * `json_body` - JSON body as a string
    fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    /// Performs an HTTP PUT request with a JSON body.
    fn put_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;

    /// Performs an HTTP POST request with an `application/x-www-form-urlencoded` body.
    fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        fields: &[(&str, &str)],
    ) -> impl Future<Output = Result<Vec<u8>, ClientError>> + Send;
}

/// Default User-Agent string for HTTP requests.
const DEFAULT_USER_AGENT: &str = concat!("trailsync/", env!("CARGO_PKG_VERSION"));

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Async HTTP client implementation using reqwest.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct AsyncReqwestClient {
    client: reqwest::Client,
}

impl AsyncReqwestClient {
    /// Creates a new AsyncReqwestClient with default configuration.
    pub fn new() -> Result<Self, ClientError> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    /// Creates a new AsyncReqwestClient with custom timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .build()
            .map_err(|e| ClientError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        method: &'static str,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, ClientError> {
        trace!(method, url, "HTTP request starting");

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    method,
                    url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    method,
                    url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(ClientError::Http(format!("{} request failed: {}", method, e)));
            }
        };

        // Check HTTP status
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(method, url, status = status.as_u16(), body = %body, "HTTP error status");
            return Err(ClientError::Http(format!(
                "HTTP {} from {} {}",
                status, method, url
            )));
        }

        // Read response body
        match response.bytes().await {
            Ok(bytes) => {
                trace!(url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => {
                warn!(url, error = %e, "Failed to read response body");
                Err(ClientError::Http(format!("Failed to read response: {}", e)))
            }
        }
    }
}

fn with_headers(
    mut request: reqwest::RequestBuilder,
    headers: &[(&str, &str)],
) -> reqwest::RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

impl AsyncHttpClient for AsyncReqwestClient {
    async fn get_with_headers(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Vec<u8>, ClientError> {
        let request = with_headers(self.client.get(url), headers);
        self.send("GET", url, request).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let request = with_headers(self.client.post(url), headers)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.send("POST", url, request).await
    }

    async fn put_json(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        json_body: &str,
    ) -> Result<Vec<u8>, ClientError> {
        let request = with_headers(self.client.put(url), headers)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.send("PUT", url, request).await
    }

    async fn post_form(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        fields: &[(&str, &str)],
    ) -> Result<Vec<u8>, ClientError> {
        let request = with_headers(self.client.post(url), headers).form(fields);
        self.send("POST", url, request).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// A request captured by [`MockAsyncHttpClient`].
    #[derive(Debug, Clone, PartialEq)]
    pub struct RecordedRequest {
        pub method: &'static str,
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: String,
    }

    /// Mock async HTTP client for testing.
    ///
    /// Replays queued responses in order and records every request.
    /// Once the queue is empty every call returns `{}`.
    #[derive(Clone, Default)]
    pub struct MockAsyncHttpClient {
        responses: Arc<Mutex<VecDeque<Result<Vec<u8>, ClientError>>>>,
        requests: Arc<Mutex<Vec<RecordedRequest>>>,
    }

    impl MockAsyncHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond_json(self, body: serde_json::Value) -> Self {
            self.push(Ok(body.to_string().into_bytes()))
        }

        pub fn respond_error(self, error: ClientError) -> Self {
            self.push(Err(error))
        }

        fn push(self, response: Result<Vec<u8>, ClientError>) -> Self {
            self.responses.lock().unwrap().push_back(response);
            self
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        fn record(
            &self,
            method: &'static str,
            url: &str,
            headers: &[(&str, &str)],
            body: String,
        ) -> Result<Vec<u8>, ClientError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                method,
                url: url.to_string(),
                headers: headers
                    .iter()
                    .map(|(n, v)| (n.to_string(), v.to_string()))
                    .collect(),
                body,
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(b"{}".to_vec()))
        }
    }

    impl AsyncHttpClient for MockAsyncHttpClient {
        async fn get_with_headers(
            &self,
            url: &str,
            headers: &[(&str, &str)],
        ) -> Result<Vec<u8>, ClientError> {
            self.record("GET", url, headers, String::new())
        }

        async fn post_json(
            &self,
            url: &str,
            headers: &[(&str, &str)],
            json_body: &str,
        ) -> Result<Vec<u8>, ClientError> {
            self.record("POST", url, headers, json_body.to_string())
        }

        async fn put_json(
            &self,
            url: &str,
            headers: &[(&str, &str)],
            json_body: &str,
        ) -> Result<Vec<u8>, ClientError> {
            self.record("PUT", url, headers, json_body.to_string())
        }

        async fn post_form(
            &self,
            url: &str,
            headers: &[(&str, &str)],
            fields: &[(&str, &str)],
        ) -> Result<Vec<u8>, ClientError> {
            let body = fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            self.record("POST", url, headers, body)
        }
    }

    #[tokio::test]
    async fn test_mock_async_client_replays_in_order() {
        let mock = MockAsyncHttpClient::new()
            .respond_json(serde_json::json!({ "n": 1 }))
            .respond_error(ClientError::Http("Test error".to_string()));

        let first = mock.get_with_headers("http://example.com/a", &[]).await;
        assert_eq!(first.unwrap(), br#"{"n":1}"#.to_vec());

        let second = mock.post_json("http://example.com/b", &[], "{}").await;
        assert!(second.is_err());

        let third = mock.put_json("http://example.com/c", &[], "{}").await;
        assert_eq!(third.unwrap(), b"{}".to_vec());

        let methods: Vec<_> = mock.requests().iter().map(|r| r.method).collect();
        assert_eq!(methods, vec!["GET", "POST", "PUT"]);
    }

    #[test]
    fn test_reqwest_client_builds() {
        assert!(AsyncReqwestClient::new().is_ok());
        assert!(AsyncReqwestClient::with_timeout(5).is_ok());
    }
}
