//! Authentication response DTOs.

use serde::Serialize;

/// Login response carrying the bearer token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}
