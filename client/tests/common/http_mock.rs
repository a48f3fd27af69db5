//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing. Use it to mock backend responses in integration tests.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/users")
//!         .respond_with_json(json!([]))
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)`
//! - **Error response**: `.respond_with_status(500)` plus optional `.with_json_response(value)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` to assert call count

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Wrapper around a running `wiremock` server.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the server, without trailing slash.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying server, for matchers this wrapper does not cover.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Assert all `expect_times` expectations were met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    /// Every request the server has seen so far.
    pub async fn received_requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    pub fn expect_get(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "GET", path)
    }

    pub fn expect_post(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "POST", path)
    }

    pub fn expect_put(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "PUT", path)
    }

    pub fn expect_delete(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder::new(&self.server, "DELETE", path)
    }
}

/// Fluent description of one stubbed endpoint.
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    method: &'static str,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    status: u16,
    body: Option<Value>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl<'a> StubBuilder<'a> {
    fn new(server: &'a MockServer, method: &'static str, path: &str) -> Self {
        Self {
            server,
            method,
            path: path.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            status: 200,
            body: None,
            delay: None,
            times: None,
        }
    }

    /// Only match requests carrying this header value.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Only match requests carrying this query parameter.
    pub fn with_query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Respond 200 with a JSON body.
    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// JSON body to send alongside a non-default status.
    pub fn with_json_response(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut mock = Mock::given(method(self.method)).and(path(self.path.as_str()));
        for (name, value) in &self.headers {
            mock = mock.and(header(name.as_str(), value.as_str()));
        }
        for (name, value) in &self.query {
            mock = mock.and(query_param(name.as_str(), value.as_str()));
        }

        let mut template = ResponseTemplate::new(self.status);
        if let Some(body) = self.body {
            template = template.set_body_json(body);
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = mock.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
