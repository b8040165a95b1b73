//! Content lifecycle state machine.
//!
//! Every status change in the system goes through [`ensure_transition`].
//! The transition table is static configuration: handlers may layer stricter
//! preconditions on top of it, but none of them can invent an edge that is
//! not listed here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a content item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentStatus {
    /// Created by topic expansion, nothing generated yet.
    TopicIngested,
    /// A generator call is in flight for this item.
    Generating,
    /// Draft text exists but has not entered review.
    DraftReady,
    /// Waiting for a human approve/reject decision.
    PendingApproval,
    /// Approved for scheduling.
    Approved,
    /// Rejected in review; eligible for regeneration.
    Rejected,
    /// Has a publication slot assigned.
    Scheduled,
    /// Handed to the publish queue, awaiting dispatch.
    Queued,
    /// Live on the target platform (terminal).
    Published,
    /// A generation or publish attempt failed; retryable.
    Failed,
}

impl ContentStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [ContentStatus; 10] = [
        ContentStatus::TopicIngested,
        ContentStatus::Generating,
        ContentStatus::DraftReady,
        ContentStatus::PendingApproval,
        ContentStatus::Approved,
        ContentStatus::Rejected,
        ContentStatus::Scheduled,
        ContentStatus::Queued,
        ContentStatus::Published,
        ContentStatus::Failed,
    ];

    /// The wire/storage form of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::TopicIngested => "TOPIC_INGESTED",
            ContentStatus::Generating => "GENERATING",
            ContentStatus::DraftReady => "DRAFT_READY",
            ContentStatus::PendingApproval => "PENDING_APPROVAL",
            ContentStatus::Approved => "APPROVED",
            ContentStatus::Rejected => "REJECTED",
            ContentStatus::Scheduled => "SCHEDULED",
            ContentStatus::Queued => "QUEUED",
            ContentStatus::Published => "PUBLISHED",
            ContentStatus::Failed => "FAILED",
        }
    }

    /// Returns true if no outgoing transitions exist from this status.
    pub fn is_terminal(&self) -> bool {
        allowed_targets(*self).is_empty()
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentStatus::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| TransitionError::UnknownState(s.to_string()))
    }
}

/// Error produced by the transition validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// A status string is not a member of the taxonomy.
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// The requested move is not in the transition table.
    #[error("invalid transition: {from} -> {to}")]
    IllegalTransition {
        from: ContentStatus,
        to: ContentStatus,
    },
}

/// The legal targets reachable from `from`.
pub fn allowed_targets(from: ContentStatus) -> &'static [ContentStatus] {
    use ContentStatus::*;
    match from {
        TopicIngested => &[Generating, PendingApproval],
        Generating => &[DraftReady, Failed],
        DraftReady => &[PendingApproval, Failed],
        PendingApproval => &[Approved, Rejected, Failed],
        Approved => &[Scheduled, Failed],
        Rejected => &[Generating, Failed],
        // SCHEDULED -> PUBLISHED is a deliberate fast path: a publish receipt
        // can land for an item whose QUEUED hop was undone concurrently.
        Scheduled => &[Queued, Failed, Published],
        Queued => &[Published, Scheduled, Failed],
        Published => &[],
        Failed => &[Scheduled],
    }
}

/// Validate a status change against the transition table.
///
/// Pure check, no side effects; the caller applies the new status only after
/// this returns `Ok`.
pub fn ensure_transition(
    current: ContentStatus,
    target: ContentStatus,
) -> Result<(), TransitionError> {
    if allowed_targets(current).contains(&target) {
        Ok(())
    } else {
        Err(TransitionError::IllegalTransition {
            from: current,
            to: target,
        })
    }
}

/// String-boundary form of [`ensure_transition`].
///
/// Parses both sides first, so an out-of-taxonomy value surfaces as
/// `UnknownState` rather than being conflated with an illegal move.
pub fn validate(
    current: &str,
    target: &str,
) -> Result<(ContentStatus, ContentStatus), TransitionError> {
    let current = current.parse::<ContentStatus>()?;
    let target = target.parse::<ContentStatus>()?;
    ensure_transition(current, target)?;
    Ok((current, target))
}
