//! Data types for teammeet API requests and responses.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_default_from_null;

use super::client::ApiError;
use super::dates::{format_query_date, IntoMeetingDate};

/// A team member as returned by the user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: String,
    /// Display name. The backend calls this field `nama`.
    #[serde(rename = "nama", default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Relative (`/uploads/...`) or absolute image URL. The HTTP client
    /// always hands out absolute URLs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Presence indicator (e.g. "Online"), only present on list results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_active: Option<DateTime<Utc>>,
}

/// Partial update for a user. Unset fields are left untouched by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(rename = "nama", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Derived lifecycle state of a meeting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Upcoming,
    Completed,
}

/// A scheduled meeting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_time: DateTime<Utc>,
    /// Length in minutes.
    #[serde(default)]
    pub duration: i64,
    #[serde(default)]
    pub created_by: String,
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub participants: Vec<String>,
    #[serde(default)]
    pub emotion_tracking: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Meeting {
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.start_time.time()
    }

    /// Start plus duration, saturating at the latest representable instant.
    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        TimeDelta::try_minutes(self.duration.max(0))
            .and_then(|length| self.start_time.checked_add_signed(length))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// `Completed` once the meeting has ended relative to `now`.
    #[must_use]
    pub fn status_at(&self, now: DateTime<Utc>) -> MeetingStatus {
        if self.end_time() <= now {
            MeetingStatus::Completed
        } else {
            MeetingStatus::Upcoming
        }
    }

    #[must_use]
    pub fn status(&self) -> MeetingStatus {
        self.status_at(Utc::now())
    }
}

/// Payload for creating or updating a meeting.
///
/// The backend writes `emotionTracking` on every update, so callers editing
/// an existing meeting should carry its current value over.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeetingInput {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// Minutes. The backend applies 60 when omitted on create.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion_tracking: Option<bool>,
}

impl MeetingInput {
    /// True when no field would be sent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Filters for listing meetings. Unset filters are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingQuery {
    pub user_id: Option<String>,
    pub date: Option<NaiveDate>,
}

impl MeetingQuery {
    #[must_use]
    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Restrict to meetings starting on the calendar day named by `date`.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidInput`] when `date` is not a recognizable date.
    pub fn on(mut self, date: impl IntoMeetingDate) -> Result<Self, ApiError> {
        self.date = Some(date.into_meeting_date()?);
        Ok(self)
    }

    /// Query parameters in wire form (`userId`, `date` as `YYYY-MM-DD`).
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(user_id) = self.user_id.as_deref().filter(|id| !id.is_empty()) {
            params.push(("userId", user_id.to_string()));
        }
        if let Some(date) = self.date {
            params.push(("date", format_query_date(date)));
        }
        params
    }
}

/// Response from the meeting create endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingCreated {
    #[serde(default)]
    pub message: String,
    pub meeting: Meeting,
}

/// Response from the meeting list endpoint. The backend sends `null` for an
/// empty result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingsResponse {
    #[serde(default, deserialize_with = "deserialize_default_from_null")]
    pub meetings: Vec<Meeting>,
}

/// Response from the meeting detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingResponse {
    pub meeting: Meeting,
}

/// Acknowledgement returned by update and delete endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: String,
}

/// Response from the user update endpoint. Some backends echo the stored
/// record alongside the message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserUpdated {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Binary image content sent as the `profileImage` multipart field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ProfileImage {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_for(&file_name).to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk, taking the file name and MIME type from the path.
    ///
    /// # Errors
    /// Returns [`ApiError::InvalidInput`] when the file cannot be read.
    pub async fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            ApiError::InvalidInput(format!("cannot read {}: {err}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    #[must_use]
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }
}

fn mime_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Response from the profile image upload endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageUploaded {
    #[serde(default)]
    pub message: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Registration {
    #[serde(rename = "nama")]
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Response from the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: String,
    pub token: String,
    pub user: User,
}

/// Response from the registration endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registered {
    #[serde(default)]
    pub message: String,
    pub user: User,
}
