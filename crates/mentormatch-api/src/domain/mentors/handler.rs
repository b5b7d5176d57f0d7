//! Mentor directory handlers.

use axum::{
    extract::{Extension, Query, State},
    Json,
};
use mentormatch_common::{UserId, UserRole};
use sqlx::FromRow;

use super::request::MentorListQuery;
use crate::domain::authorization::require_mentee;
use crate::domain::profile::{decode_skills, image_url, ProfileData, UserProfileResponse};
use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Mentor row from database
#[derive(Debug, FromRow)]
struct MentorRow {
    id: UserId,
    email: String,
    name: String,
    bio: String,
    skills_json: Option<String>,
}

/// Resolve the ORDER BY clause for a mentor listing.
///
/// "name" and "skill" sort ascending on those columns; anything else,
/// including an absent parameter, falls back to ascending id order.
fn order_clause(order_by: Option<&str>) -> &'static str {
    match order_by.map(str::to_ascii_lowercase).as_deref() {
        Some("name") => "name ASC, id ASC",
        Some("skill") => "skills_json ASC, id ASC",
        _ => "id ASC",
    }
}

/// Build an ILIKE pattern that matches the filter text literally.
///
/// `\`, `%`, and `_` are LIKE metacharacters; escape them so a filter of
/// `_` does not match every non-empty skill column.
fn like_pattern(skill: &str) -> String {
    let escaped = skill
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// GET /api/mentors
///
/// List mentor public profiles with optional skill filter and sort order.
/// Mentee-only.
pub async fn list_mentors(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<MentorListQuery>,
) -> ApiResult<Json<Vec<UserProfileResponse>>> {
    require_mentee(&auth_user)?;

    let sql = format!(
        "SELECT id, email, name, bio, skills_json FROM users WHERE role = 'mentor'{} ORDER BY {}",
        if query.skill.is_some() {
            " AND skills_json ILIKE $1"
        } else {
            ""
        },
        order_clause(query.order_by.as_deref()),
    );

    let mentors: Vec<MentorRow> = match &query.skill {
        Some(skill) => {
            sqlx::query_as(&sql)
                .bind(like_pattern(skill))
                .fetch_all(&state.db)
                .await?
        }
        None => sqlx::query_as(&sql).fetch_all(&state.db).await?,
    };

    let responses = mentors
        .into_iter()
        .map(|mentor| UserProfileResponse {
            id: mentor.id,
            email: mentor.email,
            role: UserRole::Mentor.to_string(),
            profile: ProfileData {
                name: mentor.name,
                bio: mentor.bio,
                image_url: image_url(UserRole::Mentor, mentor.id),
                skills: Some(decode_skills(mentor.skills_json.as_deref())),
            },
        })
        .collect();

    Ok(Json(responses))
}
