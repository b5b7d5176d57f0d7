//! Mentor directory request DTOs.

use serde::Deserialize;

/// Query parameters for the mentor listing
#[derive(Debug, Deserialize, Default)]
pub struct MentorListQuery {
    /// Case-insensitive substring filter against the skill list
    pub skill: Option<String>,
    /// "name" | "skill" | anything else falls back to id order
    pub order_by: Option<String>,
}
