//! teammeet REST client.
//!
//! [`TeamApi`] declares every backend operation; [`HttpTeamApi`] performs
//! them over HTTP with the bearer token read from a [`SessionStore`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use teammeet_client::api::{HttpTeamApi, MeetingQuery, TeamApi};
//! use teammeet_client::session::FileSessionStore;
//!
//! let session = Arc::new(FileSessionStore::new(".teammeet/session.json"));
//! let api = HttpTeamApi::new("http://localhost:8080", session);
//! let query = MeetingQuery::default().on("2025-07-22")?;
//! for meeting in api.get_meetings(&query).await? {
//!     println!("{} at {}", meeting.title, meeting.time());
//! }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{
    Acknowledgement, AuthResponse, Credentials, Meeting, MeetingCreated, MeetingInput,
    MeetingQuery, MeetingResponse, MeetingsResponse, ProfileImage, ProfileImageUploaded,
    Registered, Registration, User, UserUpdate, UserUpdated,
};
use crate::config::ApiConfig;
use crate::session::{SessionError, SessionStore};

/// Multipart field name the backend reads the uploaded image from.
pub const PROFILE_IMAGE_FIELD: &str = "profileImage";

/// Errors that can occur when calling the teammeet API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure, timeout, or undecodable response body
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status; `body` is passed through untouched
    #[error("API error: {status} - {body}")]
    Status { status: u16, body: String },

    /// Bearer token could not be read
    #[error("Session unavailable: {0}")]
    Session(#[from] SessionError),

    /// Caller-supplied value could not be turned into a request
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ApiError {
    /// HTTP status of a rejected request, if the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(err) => err.status().map(|s| s.as_u16()),
            Self::Session(_) | Self::InvalidInput(_) => None,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Operations offered by the teammeet backend.
///
/// Use [`HttpTeamApi`] for real HTTP calls, or [`mock::MockTeamApi`] in tests.
#[async_trait]
pub trait TeamApi: Send + Sync {
    /// Create a meeting and return the stored record.
    async fn create_meeting(&self, meeting: &MeetingInput) -> Result<Meeting, ApiError>;

    /// List meetings visible to the session user, optionally filtered.
    async fn get_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ApiError>;

    async fn get_meeting_by_id(&self, id: &str) -> Result<Meeting, ApiError>;

    async fn update_meeting(
        &self,
        id: &str,
        meeting: &MeetingInput,
    ) -> Result<Acknowledgement, ApiError>;

    async fn delete_meeting(&self, id: &str) -> Result<Acknowledgement, ApiError>;

    /// List the team roster. Profile images come back as absolute URLs.
    async fn get_users(&self) -> Result<Vec<User>, ApiError>;

    /// Fetch one user. The profile image comes back as an absolute URL.
    async fn get_user_by_id(&self, id: &str) -> Result<User, ApiError>;

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<UserUpdated, ApiError>;

    /// Upload a new profile image as multipart form data.
    async fn upload_profile_image(
        &self,
        id: &str,
        image: ProfileImage,
    ) -> Result<ProfileImageUploaded, ApiError>;

    /// Exchange credentials for a bearer token. The token is returned, not stored.
    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    async fn register(&self, registration: &Registration) -> Result<Registered, ApiError>;

    /// Plain-text liveness banner served at the backend root.
    async fn health(&self) -> Result<String, ApiError>;
}

/// Turn a relative image path into an absolute URL under `base_url`.
///
/// Values already starting with `http` and empty values are returned as-is.
#[must_use]
pub fn resolve_image_url(base_url: &str, image: &str) -> String {
    if image.is_empty() || image.starts_with("http") {
        return image.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if image.starts_with('/') {
        format!("{base}{image}")
    } else {
        format!("{base}/{image}")
    }
}

/// HTTP-based implementation of [`TeamApi`].
pub struct HttpTeamApi {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpTeamApi {
    /// Create a client with the given base URL and session store.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn SessionStore>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, session)
    }

    /// Create a client with a custom `reqwest::Client` (timeouts, proxies, tests).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            session,
        }
    }

    /// Create a client honoring the configured base URL and timeout.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn from_config(config: &ApiConfig, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(client, &config.base_url, session))
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn normalize_user(&self, mut user: User) -> User {
        if let Some(image) = user.profile_image.as_mut() {
            *image = resolve_image_url(&self.base_url, image);
        }
        user
    }

    /// Start a request, attaching the bearer token when the session has one.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.url(path);
        let token = self.session.token().await?;
        tracing::debug!(%method, %url, authenticated = token.is_some(), "teammeet request");

        let builder = self.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn json_request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self
            .request(method, path)
            .await?
            .header(CONTENT_TYPE, "application/json"))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::debug!(%status, error = %err, "could not read error response body");
                    format!("<unreadable body: {err}>")
                }
            };
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::send(builder).await?;
        Ok(response.json().await?)
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

#[async_trait]
impl TeamApi for HttpTeamApi {
    async fn create_meeting(&self, meeting: &MeetingInput) -> Result<Meeting, ApiError> {
        let request = self.json_request(Method::POST, "/api/meetings").await?;
        let created: MeetingCreated = Self::send_json(request.json(meeting)).await?;
        Ok(created.meeting)
    }

    async fn get_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ApiError> {
        let request = self.json_request(Method::GET, "/api/meetings").await?;
        let params = query.to_params();
        let request = if params.is_empty() {
            request
        } else {
            request.query(&params)
        };

        let response: MeetingsResponse = Self::send_json(request).await?;
        Ok(response.meetings)
    }

    async fn get_meeting_by_id(&self, id: &str) -> Result<Meeting, ApiError> {
        let path = format!("/api/meetings/{}", segment(id));
        let request = self.json_request(Method::GET, &path).await?;
        let response: MeetingResponse = Self::send_json(request).await?;
        Ok(response.meeting)
    }

    async fn update_meeting(
        &self,
        id: &str,
        meeting: &MeetingInput,
    ) -> Result<Acknowledgement, ApiError> {
        let path = format!("/api/meetings/{}", segment(id));
        let request = self.json_request(Method::PUT, &path).await?;
        Self::send_json(request.json(meeting)).await
    }

    async fn delete_meeting(&self, id: &str) -> Result<Acknowledgement, ApiError> {
        let path = format!("/api/meetings/{}", segment(id));
        let request = self.json_request(Method::DELETE, &path).await?;
        Self::send_json(request).await
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        let request = self.json_request(Method::GET, "/users").await?;
        let users: Option<Vec<User>> = Self::send_json(request).await?;
        Ok(users
            .unwrap_or_default()
            .into_iter()
            .map(|user| self.normalize_user(user))
            .collect())
    }

    async fn get_user_by_id(&self, id: &str) -> Result<User, ApiError> {
        let path = format!("/api/users/{}", segment(id));
        let request = self.json_request(Method::GET, &path).await?;
        let user: User = Self::send_json(request).await?;
        Ok(self.normalize_user(user))
    }

    async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<UserUpdated, ApiError> {
        let path = format!("/api/users/{}", segment(id));
        let request = self.json_request(Method::PUT, &path).await?;
        let mut updated: UserUpdated = Self::send_json(request.json(update)).await?;
        updated.user = updated.user.map(|user| self.normalize_user(user));
        Ok(updated)
    }

    async fn upload_profile_image(
        &self,
        id: &str,
        image: ProfileImage,
    ) -> Result<ProfileImageUploaded, ApiError> {
        let path = format!("/api/users/{}/profile-image", segment(id));
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.mime_type)?;
        let form = Form::new().part(PROFILE_IMAGE_FIELD, part);

        // multipart() sets its own boundary-carrying content type
        let request = self.request(Method::POST, &path).await?;
        Self::send_json(request.multipart(form)).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let request = self.json_request(Method::POST, "/login").await?;
        let mut response: AuthResponse = Self::send_json(request.json(credentials)).await?;
        response.user = self.normalize_user(response.user);
        Ok(response)
    }

    async fn register(&self, registration: &Registration) -> Result<Registered, ApiError> {
        let request = self.json_request(Method::POST, "/register").await?;
        Self::send_json(request.json(registration)).await
    }

    async fn health(&self) -> Result<String, ApiError> {
        let request = self.json_request(Method::GET, "/").await?;
        let response = Self::send(request).await?;
        Ok(response.text().await?)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{
        Acknowledgement, ApiError, AuthResponse, Credentials, Meeting, MeetingInput, MeetingQuery,
        ProfileImage, ProfileImageUploaded, Registered, Registration, TeamApi, User, UserUpdate,
        UserUpdated,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    type Slot<T> = Mutex<Option<Result<T, ApiError>>>;

    /// A call received by [`MockTeamApi`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockCall {
        CreateMeeting(MeetingInput),
        GetMeetings(MeetingQuery),
        GetMeetingById(String),
        UpdateMeeting(String, MeetingInput),
        DeleteMeeting(String),
        GetUsers,
        GetUserById(String),
        UpdateUser(String, UserUpdate),
        UploadProfileImage { id: String, file_name: String },
        Login { email: String },
        Register { email: String },
        Health,
    }

    /// Mock implementation of [`TeamApi`] for unit tests.
    ///
    /// Configure one-shot responses with `set_*_result` methods and inspect
    /// received calls with `calls()`. Unconfigured lookups answer 404,
    /// unconfigured lists answer empty, unconfigured mutations succeed.
    #[derive(Default)]
    pub struct MockTeamApi {
        create_meeting_result: Slot<Meeting>,
        get_meetings_result: Slot<Vec<Meeting>>,
        get_meeting_result: Slot<Meeting>,
        get_users_result: Slot<Vec<User>>,
        get_user_result: Slot<User>,
        upload_result: Slot<ProfileImageUploaded>,
        login_result: Slot<AuthResponse>,
        register_result: Slot<Registered>,
        mutation_result: Slot<Acknowledgement>,
        calls: Mutex<Vec<MockCall>>,
    }

    fn take<T>(slot: &Slot<T>, fallback: impl FnOnce() -> Result<T, ApiError>) -> Result<T, ApiError> {
        slot.lock().unwrap().take().unwrap_or_else(fallback)
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            body: format!(r#"{{"error":"{what} not found"}}"#),
        }
    }

    impl MockTeamApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_create_meeting_result(&self, result: Result<Meeting, ApiError>) {
            *self.create_meeting_result.lock().unwrap() = Some(result);
        }

        pub fn set_get_meetings_result(&self, result: Result<Vec<Meeting>, ApiError>) {
            *self.get_meetings_result.lock().unwrap() = Some(result);
        }

        pub fn set_get_meeting_result(&self, result: Result<Meeting, ApiError>) {
            *self.get_meeting_result.lock().unwrap() = Some(result);
        }

        pub fn set_get_users_result(&self, result: Result<Vec<User>, ApiError>) {
            *self.get_users_result.lock().unwrap() = Some(result);
        }

        pub fn set_get_user_result(&self, result: Result<User, ApiError>) {
            *self.get_user_result.lock().unwrap() = Some(result);
        }

        pub fn set_upload_result(&self, result: Result<ProfileImageUploaded, ApiError>) {
            *self.upload_result.lock().unwrap() = Some(result);
        }

        pub fn set_login_result(&self, result: Result<AuthResponse, ApiError>) {
            *self.login_result.lock().unwrap() = Some(result);
        }

        pub fn set_register_result(&self, result: Result<Registered, ApiError>) {
            *self.register_result.lock().unwrap() = Some(result);
        }

        /// Result for the next update or delete call.
        pub fn set_mutation_result(&self, result: Result<Acknowledgement, ApiError>) {
            *self.mutation_result.lock().unwrap() = Some(result);
        }

        /// All calls received so far, in order.
        pub fn calls(&self) -> Vec<MockCall> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: MockCall) {
            self.calls.lock().unwrap().push(call);
        }

        fn acknowledge(&self, message: &str) -> Result<Acknowledgement, ApiError> {
            take(&self.mutation_result, || {
                Ok(Acknowledgement {
                    message: message.to_string(),
                })
            })
        }
    }

    #[async_trait]
    impl TeamApi for MockTeamApi {
        async fn create_meeting(&self, meeting: &MeetingInput) -> Result<Meeting, ApiError> {
            self.record(MockCall::CreateMeeting(meeting.clone()));
            take(&self.create_meeting_result, || {
                Err(ApiError::Status {
                    status: 500,
                    body: "no create result configured".into(),
                })
            })
        }

        async fn get_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ApiError> {
            self.record(MockCall::GetMeetings(query.clone()));
            take(&self.get_meetings_result, || Ok(Vec::new()))
        }

        async fn get_meeting_by_id(&self, id: &str) -> Result<Meeting, ApiError> {
            self.record(MockCall::GetMeetingById(id.to_string()));
            take(&self.get_meeting_result, || Err(not_found("Meeting")))
        }

        async fn update_meeting(
            &self,
            id: &str,
            meeting: &MeetingInput,
        ) -> Result<Acknowledgement, ApiError> {
            self.record(MockCall::UpdateMeeting(id.to_string(), meeting.clone()));
            self.acknowledge("Meeting updated")
        }

        async fn delete_meeting(&self, id: &str) -> Result<Acknowledgement, ApiError> {
            self.record(MockCall::DeleteMeeting(id.to_string()));
            self.acknowledge("Meeting deleted")
        }

        async fn get_users(&self) -> Result<Vec<User>, ApiError> {
            self.record(MockCall::GetUsers);
            take(&self.get_users_result, || Ok(Vec::new()))
        }

        async fn get_user_by_id(&self, id: &str) -> Result<User, ApiError> {
            self.record(MockCall::GetUserById(id.to_string()));
            take(&self.get_user_result, || Err(not_found("User")))
        }

        async fn update_user(
            &self,
            id: &str,
            update: &UserUpdate,
        ) -> Result<UserUpdated, ApiError> {
            self.record(MockCall::UpdateUser(id.to_string(), update.clone()));
            self.acknowledge("User updated successfully")
                .map(|ack| UserUpdated {
                    message: ack.message,
                    user: None,
                })
        }

        async fn upload_profile_image(
            &self,
            id: &str,
            image: ProfileImage,
        ) -> Result<ProfileImageUploaded, ApiError> {
            self.record(MockCall::UploadProfileImage {
                id: id.to_string(),
                file_name: image.file_name.clone(),
            });
            take(&self.upload_result, || {
                Ok(ProfileImageUploaded {
                    message: "Profile image uploaded successfully".into(),
                    image_url: format!("/uploads/profiles/{}", image.file_name),
                })
            })
        }

        async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
            self.record(MockCall::Login {
                email: credentials.email.clone(),
            });
            take(&self.login_result, || {
                Err(ApiError::Status {
                    status: 401,
                    body: r#"{"error":"invalid credentials"}"#.into(),
                })
            })
        }

        async fn register(&self, registration: &Registration) -> Result<Registered, ApiError> {
            self.record(MockCall::Register {
                email: registration.email.clone(),
            });
            take(&self.register_result, || {
                Err(ApiError::Status {
                    status: 500,
                    body: "no register result configured".into(),
                })
            })
        }

        async fn health(&self) -> Result<String, ApiError> {
            self.record(MockCall::Health);
            Ok("API Server is running".into())
        }
    }
}
