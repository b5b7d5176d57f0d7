//! Match request response DTOs.

use mentormatch_common::{MatchRequestId, UserId};
use serde::Serialize;

/// Match request representation (incoming view and mutations)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequestResponse {
    pub id: MatchRequestId,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub message: String,
    pub status: String,
}

/// Outgoing view of a match request; omits the message by contract.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMatchRequestResponse {
    pub id: MatchRequestId,
    pub mentor_id: UserId,
    pub mentee_id: UserId,
    pub status: String,
}
