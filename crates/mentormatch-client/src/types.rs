//! Wire types mirroring the MentorMatch API contract.

use mentormatch_common::{MatchRequestId, MatchStatus, UserId, UserRole};
use serde::{Deserialize, Serialize};

/// Signup payload
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

/// Login payload
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Public profile as returned by `/api/me`, `/api/mentors`, and profile updates
#[derive(Debug, Clone, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub role: UserRole,
    pub profile: ProfileData,
}

/// Nested profile payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileData {
    pub name: String,
    pub bio: String,
    pub image_url: String,
    /// Present only for mentors
    pub skills: Option<Vec<String>>,
}

/// Profile update payload
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProfileRequest {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
    pub bio: String,
    /// Base64-encoded image payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Ordered skill list, mentors only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
}

/// Create match request payload
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub message: String,
}

/// Match request as seen by the mentor (incoming view and mutations)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub id: MatchRequestId,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub message: String,
    pub status: MatchStatus,
}

/// Match request as seen by the mentee (outgoing view, no message)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMatchRequest {
    pub id: MatchRequestId,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub status: MatchStatus,
}

/// Error envelope returned by the API on failure
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}
