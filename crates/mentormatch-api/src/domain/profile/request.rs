//! Profile request DTOs.

use mentormatch_common::UserId;
use serde::Deserialize;
use validator::Validate;

/// Update profile request.
///
/// `id` must match the authenticated caller; `skills` is honored only for
/// mentors; `image` is a base64-encoded payload replacing the stored bytes.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub id: UserId,

    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: String,

    /// Echoed from the client contract; the stored role is immutable
    pub role: String,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Bio must be at most 2000 characters"))]
    pub bio: String,

    /// Base64-encoded image payload
    pub image: Option<String>,

    /// Ordered skill list, mentors only
    pub skills: Option<Vec<String>>,
}
