//! Authentication handlers.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use mentormatch_common::{UserId, UserRole};
use sqlx::FromRow;
use validator::Validate;

use super::{
    jwt::JwtManager,
    request::{LoginRequest, SignupRequest},
    response::LoginResponse,
};
use crate::error::{conflict_on_unique, ApiError, ApiResult};
use crate::state::AppState;

/// Credential row fetched for login
#[derive(Debug, FromRow)]
struct CredentialRow {
    id: UserId,
    email: String,
    password_hash: String,
    name: String,
    role: String,
}

/// POST /api/signup
///
/// Register a new user account. The role is fixed at registration.
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<StatusCode> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let role: UserRole = payload
        .role
        .parse()
        .map_err(|_| ApiError::Validation("Role must be 'mentor' or 'mentee'".to_string()))?;

    // Check if email exists
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(&payload.email)
        .fetch_one(&state.db)
        .await?;

    if exists.0 {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    // Hash password
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))?
        .to_string();

    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO users (email, password_hash, name, role, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        "#,
    )
    .bind(&payload.email)
    .bind(&password_hash)
    .bind(&payload.name)
    .bind(role.as_str())
    .bind(now)
    .execute(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "Email already registered"))?;

    tracing::info!(email = %payload.email, role = %role, "user registered");

    Ok(StatusCode::CREATED)
}

/// POST /api/login
///
/// Authenticate with email and password; returns a signed bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user: CredentialRow = sqlx::query_as(
        "SELECT id, email, password_hash, name, role FROM users WHERE email = $1",
    )
    .bind(&payload.email)
    .fetch_optional(&state.db)
    .await?
    .ok_or(ApiError::InvalidCredentials)?;

    // Verify password (constant-time via argon2)
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| ApiError::Internal("Invalid password hash".to_string()))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let role: UserRole = user
        .role
        .parse()
        .map_err(|_| ApiError::Internal(format!("Unrecognized stored role: {}", user.role)))?;

    let jwt_manager = JwtManager::from_config(&state.config);
    let token = jwt_manager.generate_token(user.id, &user.name, &user.email, role)?;

    Ok(Json(LoginResponse { token }))
}
