//! Profile handlers: own-profile read/update and profile image serving.

use axum::{
    extract::{Extension, Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::Utc;
use mentormatch_common::{UserId, UserRole};
use sqlx::FromRow;
use validator::Validate;

use super::{
    request::UpdateProfileRequest,
    response::{ProfileData, UserProfileResponse},
};
use crate::domain::authorization::require_self;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Maximum decoded profile image size: 1 MiB
const MAX_IMAGE_BYTES: usize = 1024 * 1024;

const MENTOR_PLACEHOLDER: &str = "https://placehold.co/500x500.jpg?text=MENTOR";
const MENTEE_PLACEHOLDER: &str = "https://placehold.co/500x500.jpg?text=MENTEE";

/// Profile row from database
#[derive(Debug, FromRow)]
struct ProfileRow {
    id: UserId,
    email: String,
    name: String,
    role: String,
    bio: String,
    skills_json: Option<String>,
}

/// Build the public image URL for a user, keyed by role and id.
pub(crate) fn image_url(role: UserRole, id: UserId) -> String {
    format!("/images/{}/{}", role, id)
}

/// Deserialize the stored skill list; absent or corrupt columns read as empty.
pub(crate) fn decode_skills(skills_json: Option<&str>) -> Vec<String> {
    skills_json
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default()
}

/// Decode a base64 image payload, enforcing the 1 MiB size cap.
pub(crate) fn decode_profile_image(encoded: &str) -> ApiResult<Vec<u8>> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| ApiError::Validation("Image must be valid base64".to_string()))?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ApiError::Validation(
            "Image exceeds the 1 MiB size limit".to_string(),
        ));
    }

    Ok(bytes)
}

fn to_public_profile(row: ProfileRow) -> ApiResult<UserProfileResponse> {
    let role: UserRole = row
        .role
        .parse()
        .map_err(|_| ApiError::Internal(format!("Unrecognized stored role: {}", row.role)))?;

    // Skills are part of the public profile for mentors only
    let skills = match role {
        UserRole::Mentor => Some(decode_skills(row.skills_json.as_deref())),
        UserRole::Mentee => None,
    };

    Ok(UserProfileResponse {
        id: row.id,
        email: row.email,
        role: role.to_string(),
        profile: ProfileData {
            name: row.name,
            bio: row.bio,
            image_url: image_url(role, row.id),
            skills,
        },
    })
}

async fn fetch_profile(state: &AppState, user_id: UserId) -> ApiResult<UserProfileResponse> {
    let row: ProfileRow = sqlx::query_as(
        "SELECT id, email, name, role, bio, skills_json FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    to_public_profile(row)
}

/// GET /api/me
///
/// Get the authenticated user's own profile.
pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<UserProfileResponse>> {
    let profile = fetch_profile(&state, auth_user.id).await?;
    Ok(Json(profile))
}

/// PUT /api/profile
///
/// Update the caller's own profile. Name and bio are always updated; skills
/// only when the caller is a mentor and a list was supplied; the image only
/// when a payload was supplied.
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> ApiResult<Json<UserProfileResponse>> {
    require_self(&auth_user, payload.id)?;

    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let skills_json = match (auth_user.role, &payload.skills) {
        (UserRole::Mentor, Some(skills)) => Some(
            serde_json::to_string(skills)
                .map_err(|e| ApiError::Internal(format!("Skill serialization failed: {}", e)))?,
        ),
        _ => None,
    };

    let image_bytes = payload
        .image
        .as_deref()
        .filter(|encoded| !encoded.is_empty())
        .map(decode_profile_image)
        .transpose()?;

    let updated = sqlx::query(
        r#"
        UPDATE users
        SET name = $1,
            bio = $2,
            skills_json = COALESCE($3, skills_json),
            profile_image = COALESCE($4, profile_image),
            updated_at = $5
        WHERE id = $6
        "#,
    )
    .bind(&payload.name)
    .bind(&payload.bio)
    .bind(&skills_json)
    .bind(&image_bytes)
    .bind(Utc::now())
    .bind(auth_user.id)
    .execute(&state.db)
    .await?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let profile = fetch_profile(&state, auth_user.id).await?;
    Ok(Json(profile))
}

/// GET /images/{role}/{id}
///
/// Serve the stored profile image, or redirect to the role-keyed placeholder
/// when the user is missing, the role segment does not match, or no image
/// has been uploaded.
pub async fn profile_image(
    State(state): State<AppState>,
    Path((role, user_id)): Path<(String, UserId)>,
) -> ApiResult<Response> {
    let row: Option<(String, Option<Vec<u8>>)> =
        sqlx::query_as("SELECT role, profile_image FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;

    if let Some((stored_role, Some(bytes))) = row {
        if stored_role.eq_ignore_ascii_case(&role) {
            return Ok(([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response());
        }
    }

    // Placeholder is keyed by the requested role segment
    let placeholder = match role.to_ascii_lowercase().as_str() {
        "mentor" => MENTOR_PLACEHOLDER,
        _ => MENTEE_PLACEHOLDER,
    };

    Ok(Redirect::temporary(placeholder).into_response())
}
