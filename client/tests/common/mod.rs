//! Common test utilities for integration tests.
//!
//! - [`http_mock::MockHttpServer`] - Declarative HTTP stubs for the backend
//! - [`fixtures`] - JSON bodies shaped like the backend's responses
//! - [`token_api`] / [`anonymous_api`] - `HttpTeamApi` wired to a mock server

#![allow(dead_code)]

pub mod fixtures;
pub mod http_mock;

use std::sync::Arc;

use teammeet_client::api::HttpTeamApi;
use teammeet_client::session::MemorySessionStore;

pub const TEST_TOKEN: &str = "test-token";

/// Client whose session holds [`TEST_TOKEN`].
pub fn token_api(server: &http_mock::MockHttpServer) -> HttpTeamApi {
    HttpTeamApi::new(
        server.url(),
        Arc::new(MemorySessionStore::with_token(TEST_TOKEN)),
    )
}

/// Client with an empty session.
pub fn anonymous_api(server: &http_mock::MockHttpServer) -> HttpTeamApi {
    HttpTeamApi::new(server.url(), Arc::new(MemorySessionStore::new()))
}
