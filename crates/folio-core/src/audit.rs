//! Integrity audit
//!
//! Read-only scan for the states that deletes without cascade and
//! interrupted workflows leave behind. Each finding names the operation that
//! clears it.

use crate::error::FolioError;
use crate::repository::Repository;
use crate::types::{Essay, EssayId, Prompt, PromptId};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single inconsistency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntegrityIssue {
    /// Forked branch whose base was deleted
    OrphanedBranch { essay: EssayId, base: EssayId },
    /// Prompt linked to an essay that no longer exists
    DanglingLink { prompt: PromptId, essay: EssayId },
    /// Branch answering a prompt that no longer exists
    StalePromptRef { essay: EssayId, prompt: PromptId },
    /// Forked branch that its prompt does not link to
    UnlinkedFork { essay: EssayId, prompt: PromptId },
    /// Forked branch whose values differ from its base
    DivergedBranch { essay: EssayId, base: EssayId },
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrphanedBranch { essay, base } => {
                write!(f, "branch {essay} was forked from missing base {base}")
            }
            Self::DanglingLink { prompt, essay } => {
                write!(f, "prompt {prompt} links missing essay {essay}; unlink it")
            }
            Self::StalePromptRef { essay, prompt } => {
                write!(f, "branch {essay} answers missing prompt {prompt}")
            }
            Self::UnlinkedFork { essay, prompt } => {
                write!(f, "fork {essay} is not linked from prompt {prompt}; re-run branch")
            }
            Self::DivergedBranch { essay, base } => {
                write!(f, "branch {essay} values differ from base {base}; resync the base")
            }
        }
    }
}

/// Findings of one audit run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    issues: Vec<IntegrityIssue>,
}

impl IntegrityReport {
    /// Whether nothing was found
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings in scan order
    #[inline]
    #[must_use]
    pub fn issues(&self) -> &[IntegrityIssue] {
        &self.issues
    }

    /// Number of findings
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether there are no findings
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Bases whose branches need a resync
    pub fn diverged_bases(&self) -> impl Iterator<Item = EssayId> + '_ {
        let mut seen = HashSet::new();
        self.issues.iter().filter_map(move |issue| match issue {
            IntegrityIssue::DivergedBranch { base, .. } if seen.insert(*base) => Some(*base),
            _ => None,
        })
    }
}

/// Scan every prompt and essay of the student
pub(crate) async fn audit(repo: &Repository) -> Result<IntegrityReport, FolioError> {
    let prompts: HashMap<PromptId, Prompt> = repo
        .list::<Prompt>()
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();
    let essays: HashMap<EssayId, Essay> = repo
        .list::<Essay>()
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let mut issues = Vec::new();

    let mut prompt_ids: Vec<&PromptId> = prompts.keys().collect();
    prompt_ids.sort();
    for prompt in prompt_ids.into_iter().map(|id| &prompts[id]) {
        if let Some(essay) = prompt.linked_essay_id {
            if !essays.contains_key(&essay) {
                issues.push(IntegrityIssue::DanglingLink {
                    prompt: prompt.id,
                    essay,
                });
            }
        }
    }

    let mut essay_ids: Vec<&EssayId> = essays.keys().collect();
    essay_ids.sort();
    for essay in essay_ids.into_iter().map(|id| &essays[id]) {
        let Some(prompt_id) = essay.prompt_id() else {
            continue;
        };

        match prompts.get(&prompt_id) {
            None => issues.push(IntegrityIssue::StalePromptRef {
                essay: essay.id,
                prompt: prompt_id,
            }),
            Some(prompt) if essay.is_forked() && prompt.linked_essay_id != Some(essay.id) => {
                issues.push(IntegrityIssue::UnlinkedFork {
                    essay: essay.id,
                    prompt: prompt_id,
                });
            }
            Some(_) => {}
        }

        let Some(base_id) = essay.source_essay_id() else {
            continue;
        };
        match essays.get(&base_id) {
            None => issues.push(IntegrityIssue::OrphanedBranch {
                essay: essay.id,
                base: base_id,
            }),
            Some(base) if base.assigned_values != essay.assigned_values => {
                issues.push(IntegrityIssue::DivergedBranch {
                    essay: essay.id,
                    base: base_id,
                });
            }
            Some(_) => {}
        }
    }

    if !issues.is_empty() {
        tracing::warn!(issues = issues.len(), "integrity audit found issues");
    }
    Ok(IntegrityReport { issues })
}
