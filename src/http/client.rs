// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Client;

use super::request::Request;
use super::response::Response;
use super::DEFAULT_USER_AGENT;
use crate::error::{Error, Result};
use crate::network::{Fetch, ReadyState, ReadyStateListener, XhrEvent, XhrTransport};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout
    pub timeout: Duration,
    /// Default headers
    pub default_headers: HeaderMap,
    /// Proxy URL
    pub proxy: Option<String>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "accept",
            HeaderValue::from_static("application/json, text/plain, */*"),
        );

        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            default_headers,
            proxy: None,
        }
    }
}

/// reqwest-backed client serving both the fetch and the XHR surface
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .default_headers(config.default_headers.clone());

        if let Some(ref proxy_url) = config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Execute a request
    pub async fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();

        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        if let Some(ref body) = request.body {
            builder = builder.body(body.to_bytes());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let response_time = start.elapsed().as_millis() as u64;

        Ok(Response::new(status, headers, body, final_url, response_time))
    }

    /// Execute multiple requests concurrently
    pub async fn execute_all(&self, requests: Vec<Request>) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.into_iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }

    /// Get client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl Fetch for HttpClient {
    async fn fetch(&self, request: Request) -> Result<Response> {
        self.execute(request).await
    }
}

#[async_trait]
impl XhrTransport for HttpClient {
    async fn send(&self, request: Request, listener: Arc<dyn ReadyStateListener>) {
        listener.on_ready_state_change(&XhrEvent::state(ReadyState::Opened));

        match self.execute(request).await {
            Ok(response) => {
                listener.on_ready_state_change(&XhrEvent::state(ReadyState::HeadersReceived));
                listener.on_ready_state_change(&XhrEvent::state(ReadyState::Loading));
                listener.on_ready_state_change(&XhrEvent::done(response));
            }
            Err(e) => {
                listener.on_ready_state_change(&XhrEvent::failed(e.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::XhrEventLog;
    use wiremock::matchers::{body_string, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = HttpClient::new().unwrap();
        assert_eq!(client.config().user_agent, DEFAULT_USER_AGENT);
    }

    #[tokio::test]
    async fn test_fetch_sends_encoded_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/users.profile.get"))
            .and(body_string("user=U42"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let request = Request::post(format!("{}/api/users.profile.get", server.uri()))
            .unwrap()
            .form([("user", "U42")]);
        let response = client.fetch(request).await.unwrap();

        assert_eq!(response.status_code(), 200);
    }

    #[tokio::test]
    async fn test_xhr_reports_ready_states_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let log = Arc::new(XhrEventLog::default());
        let request = Request::get(server.uri()).unwrap();
        client.send(request, log.clone()).await;

        let states: Vec<ReadyState> = log.events().iter().map(|e| e.ready_state).collect();
        assert_eq!(
            states,
            vec![
                ReadyState::Opened,
                ReadyState::HeadersReceived,
                ReadyState::Loading,
                ReadyState::Done
            ]
        );
        assert_eq!(log.done().unwrap().response.unwrap().status_code(), 204);
    }

    #[tokio::test]
    async fn test_xhr_network_failure_ends_in_done_with_error() {
        let client = HttpClient::new().unwrap();
        let log = Arc::new(XhrEventLog::default());
        // Port 9 (discard) on localhost is expected to refuse connections.
        let request = Request::get("http://127.0.0.1:9/api/users.info").unwrap();
        client.send(request, log.clone()).await;

        let done = log.done().unwrap();
        assert!(done.response.is_none());
        assert!(done.error.is_some());
    }
}
