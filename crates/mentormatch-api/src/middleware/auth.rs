//! Authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use mentormatch_common::{UserId, UserRole};

use crate::domain::auth::JwtManager;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

/// Authentication middleware.
///
/// Extracts and validates the bearer JWT from the Authorization header.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Extract bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let jwt_manager = JwtManager::from_config(&state.config);
    let claims = jwt_manager.verify_token(token)?;

    let user_id: UserId = claims
        .sub
        .parse()
        .map_err(|_| ApiError::Token("Invalid subject claim".to_string()))?;
    let role: UserRole = claims
        .role
        .parse()
        .map_err(|_| ApiError::Token("Invalid role claim".to_string()))?;

    // Add user info to request extensions
    let auth_user = AuthUser {
        id: user_id,
        name: claims.name,
        email: claims.email,
        role,
    };
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}
