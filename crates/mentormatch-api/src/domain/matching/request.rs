//! Match request request DTOs.

use mentormatch_common::UserId;
use serde::Deserialize;
use validator::Validate;

/// Create match request payload
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub mentor_id: UserId,

    pub mentee_id: UserId,

    #[serde(default)]
    #[validate(length(max = 2000, message = "Message must be at most 2000 characters"))]
    pub message: String,
}
