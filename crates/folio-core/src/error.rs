//! Error types for Folio Core
//!
//! Provides error handling for:
//! - Missing colleges, prompts, essays and values
//! - Operations called on an essay of the wrong kind
//! - Store failures, before or part-way through a multi-step workflow
//! - Stored documents that no longer decode

use crate::workflow::{Step, Workflow};
use folio_store::StoreError;
use std::fmt;

/// Entity kinds addressed by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// College
    College,
    /// Prompt
    Prompt,
    /// Essay
    Essay,
    /// Value tag
    Value,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::College => "college",
            EntityKind::Prompt => "prompt",
            EntityKind::Essay => "essay",
            EntityKind::Value => "value",
        })
    }
}

/// Main Folio error type
#[derive(Debug, thiserror::Error)]
pub enum FolioError {
    /// Referenced id does not exist
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Operation not valid for the entity's current shape
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Store call failed before anything was written
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    /// A later write of a multi-step workflow failed
    #[error("partial completion: {0}")]
    PartialCompletion(Box<PartialCompletion>),

    /// Stored document does not decode into its entity
    #[error("corrupt {kind} document {id}: {reason}")]
    CorruptDocument {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    /// Idea source failed
    #[error("idea source failed: {0}")]
    IdeaSource(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl FolioError {
    /// Create not-found error
    #[inline]
    pub fn not_found(kind: EntityKind, id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Create invalid-state error
    #[inline]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Check if error is retryable
    ///
    /// A partially completed workflow is retryable when its cause is; every
    /// workflow is safe to re-run from the top.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable(e) => e.is_transient(),
            Self::PartialCompletion(partial) => partial.source.is_retryable(),
            _ => false,
        }
    }

    /// Check if error means a referenced entity is missing
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Writes that landed before the failure
    #[must_use]
    pub fn completed_steps(&self) -> &[Step] {
        match self {
            Self::PartialCompletion(partial) => &partial.completed,
            _ => &[],
        }
    }
}

/// Failure part-way through a workflow
#[derive(Debug, thiserror::Error)]
#[error("{workflow} stopped after {} completed step(s): {source}", .completed.len())]
pub struct PartialCompletion {
    /// Workflow that was running
    pub workflow: Workflow,
    /// Writes that landed, in order
    pub completed: Vec<Step>,
    /// Failure that stopped it
    pub source: FolioError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EssayId;

    #[test]
    fn not_found_display() {
        let err = FolioError::not_found(EntityKind::Prompt, "01ABC");
        assert_eq!(err.to_string(), "prompt not found: 01ABC");
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
    }

    #[test]
    fn store_errors_are_retryable() {
        let err: FolioError = StoreError::unavailable("timeout").into();
        assert!(err.is_retryable());
        assert!(err.completed_steps().is_empty());
        assert_eq!(err.to_string(), "store unavailable: timeout");
    }

    #[test]
    fn partial_completion_reports_steps() {
        let essay = EssayId::new();
        let err = FolioError::PartialCompletion(Box::new(PartialCompletion {
            workflow: Workflow::BranchEssay,
            completed: vec![Step::CreatedEssay(essay)],
            source: StoreError::unavailable("reset").into(),
        }));

        assert!(err.is_retryable());
        assert_eq!(err.completed_steps(), &[Step::CreatedEssay(essay)]);
        assert!(err.to_string().contains("branch essay stopped after 1 completed step(s)"));
    }

    #[test]
    fn invalid_state_is_not_retryable() {
        let err = FolioError::invalid_state("already a branch");
        assert!(!err.is_retryable());
    }
}
