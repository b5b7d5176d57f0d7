//! Authorization helpers for role- and ownership-restricted endpoints.

use mentormatch_common::{UserId, UserRole};

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;

/// Check that the caller is a mentor.
pub fn require_mentor(user: &AuthUser) -> ApiResult<()> {
    match user.role {
        UserRole::Mentor => Ok(()),
        UserRole::Mentee => Err(ApiError::Forbidden),
    }
}

/// Check that the caller is a mentee.
pub fn require_mentee(user: &AuthUser) -> ApiResult<()> {
    match user.role {
        UserRole::Mentee => Ok(()),
        UserRole::Mentor => Err(ApiError::Forbidden),
    }
}

/// Check that the caller is acting on their own resource.
pub fn require_self(user: &AuthUser, target: UserId) -> ApiResult<()> {
    if user.id == target {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
