//! Entity and payload types.
//!
//! [`User`] and [`Post`] are the stored rows; the remaining types are the
//! request payload shapes. Required fields are plain, optional fields are
//! `Option` — a missing required field fails deserialization and surfaces
//! as a 422.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder profile image assigned when a create payload omits one.
pub const DEFAULT_IMAGE: &str = "default.jpg";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-generated, immutable.
    pub id: i64,
    /// Unique across all users.
    pub username: String,
    /// Unique across all users.
    pub email: String,
    pub image_file: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Server-generated, immutable.
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Assigned by the server at creation; never changed by updates.
    pub date_posted: DateTime<Utc>,
    /// Must reference an existing [`User`].
    pub user_id: i64,
}

/// `POST /api/users` payload.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub image_file: Option<String>,
}

/// `PATCH /api/users/{id}` payload. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_file: Option<String>,
}

/// `POST /api/posts` payload.
#[derive(Debug, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

/// `PUT /api/posts/{id}` payload — a full replace, every mutable field
/// required.
#[derive(Debug, Deserialize)]
pub struct PostReplace {
    pub title: String,
    pub content: String,
    pub user_id: i64,
}

/// `PATCH /api/posts/{id}` payload. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub user_id: Option<i64>,
}
