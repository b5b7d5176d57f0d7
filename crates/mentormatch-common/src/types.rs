//! Core domain types for the mentorship matching system.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// User ID type
pub type UserId = i32;

/// Match request ID type
pub type MatchRequestId = i32;

/// Error returned when parsing a role or status from its wire form fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized value: {0}")]
pub struct ParseEnumError(pub String);

/// User role in the system.
///
/// The role is fixed at registration and every permission decision
/// branches exhaustively on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Discoverable in the mentor directory; accepts or rejects requests
    Mentor,
    /// Browses mentors; initiates and cancels match requests
    Mentee,
}

impl UserRole {
    /// Lower-case wire and storage form of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Mentor => "mentor",
            UserRole::Mentee => "mentee",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mentor" => Ok(UserRole::Mentor),
            "mentee" => Ok(UserRole::Mentee),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}

/// Lifecycle status of a match request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Created by a mentee, awaiting the mentor's decision
    Pending,
    /// Accepted by the mentor
    Accepted,
    /// Rejected by the mentor
    Rejected,
    /// Cancelled by the mentee
    Cancelled,
}

impl MatchStatus {
    /// Lower-case wire and storage form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::Accepted => "accepted",
            MatchStatus::Rejected => "rejected",
            MatchStatus::Cancelled => "cancelled",
        }
    }

    /// Whether the request still occupies the mentee's single outstanding
    /// slot and the (mentor, mentee) pair uniqueness window.
    pub fn is_active(&self) -> bool {
        matches!(self, MatchStatus::Pending | MatchStatus::Accepted)
    }

    /// A mentor may accept only a pending request.
    pub fn can_accept(&self) -> bool {
        matches!(self, MatchStatus::Pending)
    }

    /// A mentor may reject only a pending request.
    pub fn can_reject(&self) -> bool {
        matches!(self, MatchStatus::Pending)
    }

    /// A mentee may cancel a request in any state, including one that was
    /// already accepted, rejected, or cancelled.
    pub fn can_cancel(&self) -> bool {
        match self {
            MatchStatus::Pending
            | MatchStatus::Accepted
            | MatchStatus::Rejected
            | MatchStatus::Cancelled => true,
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(MatchStatus::Pending),
            "accepted" => Ok(MatchStatus::Accepted),
            "rejected" => Ok(MatchStatus::Rejected),
            "cancelled" => Ok(MatchStatus::Cancelled),
            other => Err(ParseEnumError(other.to_string())),
        }
    }
}
