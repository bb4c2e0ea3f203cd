//! Step logs for multi-step workflows
//!
//! The store has no multi-document transaction, so operations such as
//! branch-then-link or toggle-then-propagate are ordered sequences of single
//! writes. Each workflow records every write that landed. On success the log
//! is returned in an [`Outcome`]; on failure after at least one write it is
//! carried by [`FolioError::PartialCompletion`]. Every workflow is idempotent,
//! so the caller resumes by re-running the same operation.

use crate::error::{FolioError, PartialCompletion};
use crate::types::{CollegeId, EssayId, PromptId, ValueId};
use std::fmt;

/// Multi-step operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    /// Link an essay to a prompt
    LinkEssay,
    /// Fork a base essay for a prompt
    BranchEssay,
    /// Write a custom essay for a prompt
    WriteCustom,
    /// Unlink a prompt's essay
    UnlinkEssay,
    /// Assign or remove a value, propagating from a base
    AssignValue,
    /// Rewrite branch values from their base
    ResyncBranches,
    /// Delete a value and sweep it from every essay
    DeleteValue,
}

impl fmt::Display for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Workflow::LinkEssay => "link essay",
            Workflow::BranchEssay => "branch essay",
            Workflow::WriteCustom => "write custom essay",
            Workflow::UnlinkEssay => "unlink essay",
            Workflow::AssignValue => "assign value",
            Workflow::ResyncBranches => "resync branches",
            Workflow::DeleteValue => "delete value",
        })
    }
}

/// One write issued against the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// New essay document written
    CreatedEssay(EssayId),
    /// `Prompt.linkedEssayId` set
    LinkedPrompt { prompt: PromptId, essay: EssayId },
    /// College added to `Essay.assignedColleges`
    AssignedCollege { essay: EssayId, college: CollegeId },
    /// `Essay.assignedValues` rewritten
    WroteValues(EssayId),
    /// Essay document removed
    DeletedEssay(EssayId),
    /// `Prompt.linkedEssayId` cleared
    ClearedLink(PromptId),
    /// Value document removed
    DeletedValue(ValueId),
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::CreatedEssay(id) => write!(f, "created essay {id}"),
            Step::LinkedPrompt { prompt, essay } => write!(f, "linked prompt {prompt} to {essay}"),
            Step::AssignedCollege { essay, college } => {
                write!(f, "assigned college {college} to essay {essay}")
            }
            Step::WroteValues(id) => write!(f, "wrote values of essay {id}"),
            Step::DeletedEssay(id) => write!(f, "deleted essay {id}"),
            Step::ClearedLink(id) => write!(f, "cleared link of prompt {id}"),
            Step::DeletedValue(id) => write!(f, "deleted value {id}"),
        }
    }
}

/// Ordered record of the writes a workflow issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLog {
    workflow: Workflow,
    steps: Vec<Step>,
}

impl StepLog {
    /// Start an empty log
    #[inline]
    #[must_use]
    pub fn new(workflow: Workflow) -> Self {
        Self {
            workflow,
            steps: Vec::new(),
        }
    }

    /// Record a landed write
    #[inline]
    pub fn record(&mut self, step: Step) {
        tracing::debug!(workflow = %self.workflow, step = %step, "workflow step");
        self.steps.push(step);
    }

    /// Workflow this log belongs to
    #[inline]
    #[must_use]
    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    /// Landed writes, in order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of landed writes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing was written
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Wrap a failure
    ///
    /// With nothing written yet the error is returned unchanged; otherwise it
    /// becomes a partial completion carrying the steps so far.
    #[must_use]
    pub fn fail(&self, source: FolioError) -> FolioError {
        if self.steps.is_empty() {
            return source;
        }
        tracing::warn!(
            workflow = %self.workflow,
            completed = self.steps.len(),
            error = %source,
            "workflow stopped part-way"
        );
        FolioError::PartialCompletion(Box::new(PartialCompletion {
            workflow: self.workflow,
            completed: self.steps.clone(),
            source,
        }))
    }
}

/// Result of a workflow together with its step log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<T> {
    /// Workflow result
    pub value: T,
    /// Writes issued
    pub log: StepLog,
}

impl<T> Outcome<T> {
    /// Pair a value with its log
    #[inline]
    #[must_use]
    pub fn new(value: T, log: StepLog) -> Self {
        Self { value, log }
    }

    /// Discard the log
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// Number of writes issued
    #[inline]
    #[must_use]
    pub fn steps_completed(&self) -> usize {
        self.log.len()
    }

    /// Whether the workflow found nothing to change
    #[inline]
    #[must_use]
    pub fn was_noop(&self) -> bool {
        self.log.is_empty()
    }
}
