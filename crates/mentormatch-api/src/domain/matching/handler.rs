//! Match request handlers: the request lifecycle state machine.
//!
//! Creation and every transition re-check ownership and current status in
//! the WHERE clause of the mutating statement; the partial unique indexes on
//! `match_requests` reject the loser of any racing create or accept.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use mentormatch_common::{MatchRequestId, MatchStatus, UserId, UserRole};
use sqlx::FromRow;
use validator::Validate;

use super::{
    request::CreateMatchRequest,
    response::{MatchRequestResponse, OutgoingMatchRequestResponse},
};
use crate::domain::authorization::{require_mentee, require_mentor, require_self};
use crate::error::{conflict_on_unique, ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Match request row from database
#[derive(Debug, FromRow)]
struct MatchRequestRow {
    id: MatchRequestId,
    mentor_id: UserId,
    mentee_id: UserId,
    message: String,
    status: String,
}

impl MatchRequestRow {
    fn into_response(self) -> MatchRequestResponse {
        MatchRequestResponse {
            id: self.id,
            mentor_id: self.mentor_id,
            mentee_id: self.mentee_id,
            message: self.message,
            status: self.status,
        }
    }

    fn into_outgoing_response(self) -> OutgoingMatchRequestResponse {
        OutgoingMatchRequestResponse {
            id: self.id,
            mentor_id: self.mentor_id,
            mentee_id: self.mentee_id,
            status: self.status,
        }
    }
}

/// POST /api/match-requests
///
/// Create a pending request from the calling mentee to a mentor. Rejected
/// when the target is not a mentor, or the mentee already has any request
/// in an active (pending or accepted) state, regardless of mentor.
pub async fn create_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateMatchRequest>,
) -> ApiResult<Json<MatchRequestResponse>> {
    require_mentee(&auth_user)?;
    require_self(&auth_user, payload.mentee_id)?;

    payload
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    // Target must exist and actually be a mentor
    let mentor_exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = $2)")
            .bind(payload.mentor_id)
            .bind(UserRole::Mentor.as_str())
            .fetch_one(&state.db)
            .await?;

    if !mentor_exists.0 {
        return Err(ApiError::Validation("Mentor not found".to_string()));
    }

    // One outstanding request per mentee, across all mentors
    let has_active: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM match_requests WHERE mentee_id = $1 AND status IN ($2, $3))",
    )
    .bind(auth_user.id)
    .bind(MatchStatus::Pending.as_str())
    .bind(MatchStatus::Accepted.as_str())
    .fetch_one(&state.db)
    .await?;

    if has_active.0 {
        return Err(ApiError::Conflict(
            "You already have a pending or accepted match request".to_string(),
        ));
    }

    let now = Utc::now();
    let row: MatchRequestRow = sqlx::query_as(
        r#"
        INSERT INTO match_requests (mentor_id, mentee_id, message, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $5)
        RETURNING id, mentor_id, mentee_id, message, status
        "#,
    )
    .bind(payload.mentor_id)
    .bind(auth_user.id)
    .bind(&payload.message)
    .bind(MatchStatus::Pending.as_str())
    .bind(now)
    .fetch_one(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "You already have a pending or accepted match request"))?;

    tracing::info!(
        request_id = row.id,
        mentor_id = row.mentor_id,
        mentee_id = row.mentee_id,
        "match request created"
    );

    Ok(Json(row.into_response()))
}

/// GET /api/match-requests/incoming
///
/// Requests addressed to the calling mentor, newest first.
pub async fn incoming_requests(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<MatchRequestResponse>>> {
    require_mentor(&auth_user)?;

    let rows: Vec<MatchRequestRow> = sqlx::query_as(
        r#"
        SELECT id, mentor_id, mentee_id, message, status
        FROM match_requests
        WHERE mentor_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(rows.into_iter().map(MatchRequestRow::into_response).collect()))
}

/// GET /api/match-requests/outgoing
///
/// Requests sent by the calling mentee, newest first. The outgoing view
/// omits the message.
pub async fn outgoing_requests(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Json<Vec<OutgoingMatchRequestResponse>>> {
    require_mentee(&auth_user)?;

    let rows: Vec<MatchRequestRow> = sqlx::query_as(
        r#"
        SELECT id, mentor_id, mentee_id, message, status
        FROM match_requests
        WHERE mentee_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(auth_user.id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(
        rows.into_iter()
            .map(MatchRequestRow::into_outgoing_response)
            .collect(),
    ))
}

/// PUT /api/match-requests/{id}/accept
///
/// Accept a pending request addressed to the calling mentor. A mentor can
/// hold at most one accepted request at a time.
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(request_id): Path<MatchRequestId>,
) -> ApiResult<Json<MatchRequestResponse>> {
    require_mentor(&auth_user)?;

    let current: Option<(String,)> = sqlx::query_as(
        "SELECT status FROM match_requests WHERE id = $1 AND mentor_id = $2",
    )
    .bind(request_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?;

    let status: MatchStatus = current
        .ok_or_else(|| ApiError::NotFound("Match request not found".to_string()))?
        .0
        .parse()
        .map_err(|_| ApiError::Internal("Unrecognized stored status".to_string()))?;

    if !status.can_accept() {
        return Err(ApiError::NotFound(
            "Match request not found or cannot be accepted".to_string(),
        ));
    }

    // One accepted request per mentor at a time
    let already_accepted: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM match_requests WHERE mentor_id = $1 AND status = $2)",
    )
    .bind(auth_user.id)
    .bind(MatchStatus::Accepted.as_str())
    .fetch_one(&state.db)
    .await?;

    if already_accepted.0 {
        return Err(ApiError::Conflict(
            "You already have an accepted match request".to_string(),
        ));
    }

    // Status re-checked at write time; the accepted-mentor index backstops races
    let row: MatchRequestRow = sqlx::query_as(
        r#"
        UPDATE match_requests
        SET status = $1, updated_at = $2
        WHERE id = $3 AND mentor_id = $4 AND status = $5
        RETURNING id, mentor_id, mentee_id, message, status
        "#,
    )
    .bind(MatchStatus::Accepted.as_str())
    .bind(Utc::now())
    .bind(request_id)
    .bind(auth_user.id)
    .bind(MatchStatus::Pending.as_str())
    .fetch_optional(&state.db)
    .await
    .map_err(|e| conflict_on_unique(e, "You already have an accepted match request"))?
    .ok_or_else(|| ApiError::NotFound("Match request not found or cannot be accepted".to_string()))?;

    Ok(Json(row.into_response()))
}

/// PUT /api/match-requests/{id}/reject
///
/// Reject a pending request addressed to the calling mentor.
pub async fn reject_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(request_id): Path<MatchRequestId>,
) -> ApiResult<Json<MatchRequestResponse>> {
    require_mentor(&auth_user)?;

    let row: MatchRequestRow = sqlx::query_as(
        r#"
        UPDATE match_requests
        SET status = $1, updated_at = $2
        WHERE id = $3 AND mentor_id = $4 AND status = $5
        RETURNING id, mentor_id, mentee_id, message, status
        "#,
    )
    .bind(MatchStatus::Rejected.as_str())
    .bind(Utc::now())
    .bind(request_id)
    .bind(auth_user.id)
    .bind(MatchStatus::Pending.as_str())
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Match request not found or cannot be rejected".to_string()))?;

    Ok(Json(row.into_response()))
}

/// DELETE /api/match-requests/{id}
///
/// Cancel a request owned by the calling mentee. Cancellation is permitted
/// from any prior status.
pub async fn cancel_request(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(request_id): Path<MatchRequestId>,
) -> ApiResult<Json<MatchRequestResponse>> {
    require_mentee(&auth_user)?;

    let row: MatchRequestRow = sqlx::query_as(
        r#"
        UPDATE match_requests
        SET status = $1, updated_at = $2
        WHERE id = $3 AND mentee_id = $4
        RETURNING id, mentor_id, mentee_id, message, status
        "#,
    )
    .bind(MatchStatus::Cancelled.as_str())
    .bind(Utc::now())
    .bind(request_id)
    .bind(auth_user.id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound("Match request not found".to_string()))?;

    Ok(Json(row.into_response()))
}
