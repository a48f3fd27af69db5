//! teammeet API client module.
//!
//! Provides the HTTP client abstraction for the meeting and user endpoints
//! of the teammeet backend.
//!
//! # Architecture
//!
//! - [`TeamApi`] - Trait defining API operations
//! - [`HttpTeamApi`] - Real HTTP implementation using reqwest
//! - [`mock::MockTeamApi`] - Mock for unit tests (behind `test-utils` feature)
//!
//! Every request reads the bearer token from the [`SessionStore`] handed to
//! the client and sends `Authorization: Bearer <token>` when one is present.
//! Failures are returned as [`ApiError`]; nothing is retried and nothing is
//! logged above `debug`.
//!
//! # Testing Patterns
//!
//! ## Unit Tests (Mock Implementation)
//!
//! ```ignore
//! use teammeet_client::api::mock::MockTeamApi;
//!
//! let mock = MockTeamApi::new();
//! mock.set_get_users_result(Ok(vec![user]));
//!
//! let roster = my_screen.load_roster(&mock).await?;
//! assert_eq!(roster.len(), 1);
//! ```
//!
//! ## Integration Tests (HTTP Stubbing)
//!
//! ```ignore
//! let server = MockHttpServer::start().await;
//!
//! server
//!     .expect_get("/api/users/u1")
//!     .with_header("Authorization", "Bearer test-token")
//!     .respond_with_json(json!({ "id": "u1", "nama": "Sari" }))
//!     .mount()
//!     .await;
//!
//! let session = Arc::new(MemorySessionStore::with_token("test-token"));
//! let api = HttpTeamApi::new(server.url(), session);
//! assert_eq!(api.get_user_by_id("u1").await?.name, "Sari");
//! ```
//!
//! [`SessionStore`]: crate::session::SessionStore

mod client;
mod dates;
mod types;

pub use client::{resolve_image_url, ApiError, HttpTeamApi, TeamApi, PROFILE_IMAGE_FIELD};
pub use dates::{format_query_date, parse_date, IntoMeetingDate, QUERY_DATE_FORMAT};
pub use types::{
    Acknowledgement, AuthResponse, Credentials, Meeting, MeetingCreated, MeetingInput,
    MeetingQuery, MeetingResponse, MeetingStatus, MeetingsResponse, ProfileImage,
    ProfileImageUploaded, Registered, Registration, User, UserUpdate, UserUpdated,
};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
