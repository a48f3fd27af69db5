//! Response bodies in the shapes the backend produces.

use serde_json::{json, Value};

pub fn meeting_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": "Weekly sync",
        "startTime": "2025-07-22T09:00:00Z",
        "duration": 30,
        "createdBy": "u1",
        "participants": ["u1", "u2"],
        "emotionTracking": false,
        "createdAt": "2025-07-01T08:00:00Z",
        "updatedAt": "2025-07-01T08:00:00Z"
    })
}

pub fn user_json(id: &str, name: &str, profile_image: Option<&str>) -> Value {
    let mut user = json!({
        "id": id,
        "nama": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "role": "Member"
    });
    if let Some(image) = profile_image {
        user["profileImage"] = json!(image);
    }
    user
}
