//! State machine for public listing moderation
//!
//! Moderation states: not reviewed → approved; in review → approved
//! Approved is a terminal state. Nothing transitions into `in review`; the
//! value is only carried for rows that already hold it.

use serde::{Deserialize, Serialize};

use autspaces_common::StateError;

/// Moderation status of a public listing row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "moderation_status")]
pub enum ModerationStatus {
    #[default]
    #[serde(rename = "not reviewed")]
    #[sqlx(rename = "not reviewed")]
    NotReviewed,
    #[serde(rename = "in review")]
    #[sqlx(rename = "in review")]
    InReview,
    #[serde(rename = "approved")]
    #[sqlx(rename = "approved")]
    Approved,
}

impl ModerationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved)
    }

    pub fn valid_transitions(&self) -> &'static [ModerationStatus] {
        match self {
            Self::NotReviewed | Self::InReview => &[Self::Approved],
            Self::Approved => &[],
        }
    }
}

impl std::fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReviewed => write!(f, "not reviewed"),
            Self::InReview => write!(f, "in review"),
            Self::Approved => write!(f, "approved"),
        }
    }
}

/// Events that trigger moderation transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModerationEvent {
    /// A moderator accepted the experience for the public listing
    Approve,
}

impl std::fmt::Display for ModerationEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
        }
    }
}

/// Moderation state machine
pub struct ModerationStateMachine;

impl ModerationStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ModerationStatus,
        event: ModerationEvent,
    ) -> Result<ModerationStatus, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (current, event) {
            (ModerationStatus::NotReviewed, ModerationEvent::Approve)
            | (ModerationStatus::InReview, ModerationEvent::Approve) => ModerationStatus::Approved,
            (ModerationStatus::Approved, _) => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ModerationStatus, event: &ModerationEvent) -> bool {
        Self::transition(current, *event).is_ok()
    }
}
