//! Profile response DTOs.

use mentormatch_common::UserId;
use serde::Serialize;

/// Public profile response (safe to return to any authenticated caller)
#[derive(Debug, Serialize)]
pub struct UserProfileResponse {
    pub id: UserId,
    pub email: String,
    pub role: String,
    pub profile: ProfileData,
}

/// Nested profile payload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub bio: String,
    pub image_url: String,
    /// Present only for mentors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}
